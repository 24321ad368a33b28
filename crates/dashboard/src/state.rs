//! The dashboard's application state.
//!
//! Each field has one writer: the methods below. Every mutation that can
//! move the active date, tab or species ends in [`AppState::derive`], which
//! rebuilds the time-step list and retags the overlays at most once.

use api::query::{MaxPointQuery, ReanalysisQuery, Sea};
use api::state::QueryState;
use api::types::{FishInfo, Reanalysis};
use chrono::NaiveDate;
use foundation::geo::LonLat;
use foundation::time::Time;
use globe::overlay::{Overlay, OverlayRegistry};
use globe::zoom;
use layers::LayerKind;
use layers::symbology::{LegendRamp, legend};
use layers::wms::{ImageryLayerDescriptor, make_layer};
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::player::{PlayState, TimeStepPlayer};
use crate::time_steps::{compact, time_steps};
use crate::toolbar::{Tool, tool};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tab {
    DailyFish,
    Reanalysis,
}

/// What a derivation pass changed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Derivation {
    pub steps_changed: bool,
    pub retagged: bool,
}

/// Serializable view handed to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub tab: Tab,
    pub species: &'a str,
    pub analys_date: &'a str,
    pub sea: Sea,
    pub time_steps: &'a [String],
    pub index: usize,
    pub hover: Option<usize>,
    pub play_state: PlayState,
    pub progress: f64,
    pub hover_progress: Option<f64>,
    pub zoom_percent: f64,
    pub selected_layers: &'a [LayerKind],
    pub currents: bool,
    pub legend_visible: bool,
    pub last_selected: &'a str,
    pub overlays: &'a [Overlay],
}

pub const DEFAULT_LAYERS: [LayerKind; 2] = [LayerKind::Grid, LayerKind::Fish];
pub const DEFAULT_LEGEND: &str = "fish";

#[derive(Debug)]
pub struct AppState {
    tab: Tab,
    max_point_query: MaxPointQuery,
    reanalysis_query: ReanalysisQuery,
    max_points: QueryState<Vec<FishInfo>>,
    reanalysis: QueryState<Reanalysis>,
    selected_layers: Vec<LayerKind>,
    currents: bool,
    zoom_percent: f64,
    focused_position: Option<LonLat>,
    legend_visible: bool,
    last_selected: String,
    overlays: OverlayRegistry,
    time_steps: Vec<String>,
    player: TimeStepPlayer,
    /// (time, species) the overlays were last tagged with.
    tagged: Option<(Option<String>, String)>,
}

impl AppState {
    pub fn new(today: NaiveDate, config: &DashboardConfig) -> Self {
        let date = compact(today);
        let species = config.default_species.clone();
        let mut state = Self {
            tab: Tab::DailyFish,
            max_point_query: MaxPointQuery {
                species: species.clone(),
                analys_date: date.clone(),
                sea: Sea::East,
            },
            reanalysis_query: ReanalysisQuery {
                species,
                analys_date: date,
            },
            max_points: QueryState::new(),
            reanalysis: QueryState::new(),
            selected_layers: DEFAULT_LAYERS.to_vec(),
            currents: false,
            zoom_percent: zoom::DEFAULT_ZOOM_PERCENT,
            focused_position: None,
            legend_visible: true,
            last_selected: DEFAULT_LEGEND.to_owned(),
            overlays: OverlayRegistry::new(),
            time_steps: Vec::new(),
            player: TimeStepPlayer::with_delay(0, config.player_delay_s()),
            tagged: None,
        };
        state.derive();
        state
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn max_point_query(&self) -> &MaxPointQuery {
        &self.max_point_query
    }

    pub fn reanalysis_query(&self) -> &ReanalysisQuery {
        &self.reanalysis_query
    }

    pub fn max_points(&self) -> &QueryState<Vec<FishInfo>> {
        &self.max_points
    }

    pub fn max_points_mut(&mut self) -> &mut QueryState<Vec<FishInfo>> {
        &mut self.max_points
    }

    pub fn reanalysis(&self) -> &QueryState<Reanalysis> {
        &self.reanalysis
    }

    pub fn reanalysis_mut(&mut self) -> &mut QueryState<Reanalysis> {
        &mut self.reanalysis
    }

    pub fn selected_layers(&self) -> &[LayerKind] {
        &self.selected_layers
    }

    pub fn currents(&self) -> bool {
        self.currents
    }

    pub fn zoom_percent(&self) -> f64 {
        self.zoom_percent
    }

    pub fn overlays(&self) -> &OverlayRegistry {
        &self.overlays
    }

    pub fn player(&self) -> &TimeStepPlayer {
        &self.player
    }

    pub fn time_steps(&self) -> &[String] {
        &self.time_steps
    }

    pub fn legend_visible(&self) -> bool {
        self.legend_visible
    }

    pub fn last_selected(&self) -> &str {
        &self.last_selected
    }

    pub fn active_species(&self) -> &str {
        match self.tab {
            Tab::DailyFish => &self.max_point_query.species,
            Tab::Reanalysis => &self.reanalysis_query.species,
        }
    }

    pub fn active_date(&self) -> &str {
        match self.tab {
            Tab::DailyFish => &self.max_point_query.analys_date,
            Tab::Reanalysis => &self.reanalysis_query.analys_date,
        }
    }

    /// Display date of the current step, `None` while the list is empty.
    pub fn active_time(&self) -> Option<&str> {
        self.time_steps.get(self.player.index()).map(String::as_str)
    }

    /// Switching tabs drops every overlay.
    pub fn set_tab(&mut self, tab: Tab) -> Derivation {
        if tab == self.tab {
            return Derivation::default();
        }
        self.tab = tab;
        self.overlays.clear();
        self.derive()
    }

    /// Species of the active tab's query.
    pub fn set_species(&mut self, species: &str) -> Derivation {
        match self.tab {
            Tab::DailyFish => self.max_point_query.species = species.to_owned(),
            Tab::Reanalysis => self.reanalysis_query.species = species.to_owned(),
        }
        self.derive()
    }

    /// Analysis date of the active tab's query, `YYYYMMDD` or `YYYY-MM-DD`.
    pub fn set_analysis_date(&mut self, date: &str) -> Derivation {
        match self.tab {
            Tab::DailyFish => self.max_point_query.analys_date = date.to_owned(),
            Tab::Reanalysis => self.reanalysis_query.analys_date = date.to_owned(),
        }
        self.derive()
    }

    pub fn set_sea(&mut self, sea: Sea) {
        self.max_point_query.sea = sea;
    }

    pub fn toggle_play(&mut self, now: Time) {
        self.player.toggle(now);
    }

    pub fn tick(&mut self, now: Time) -> Derivation {
        if self.player.tick(now) {
            self.derive()
        } else {
            Derivation::default()
        }
    }

    pub fn step_forward(&mut self) -> Derivation {
        if self.player.step_forward() {
            self.derive()
        } else {
            Derivation::default()
        }
    }

    pub fn step_backward(&mut self) -> Derivation {
        if self.player.step_backward() {
            self.derive()
        } else {
            Derivation::default()
        }
    }

    pub fn jump(&mut self, index: usize) -> Derivation {
        if self.player.jump(index) {
            self.derive()
        } else {
            Derivation::default()
        }
    }

    pub fn hover_step(&mut self, index: Option<usize>) {
        match index {
            Some(i) => self.player.set_hover(i),
            None => self.player.clear_hover(),
        }
    }

    /// Pins an overlay at a clicked position, tagged with the current step
    /// and species. Ignored while there are no time steps.
    pub fn add_overlay(&mut self, position: LonLat) -> Option<Overlay> {
        let time = self.active_time()?.to_owned();
        let species = self.active_species().to_owned();
        Some(self.overlays.add(position, &time, &species))
    }

    pub fn remove_overlay(&mut self, id: &str) -> bool {
        self.overlays.remove_by_id(id)
    }

    /// "Go to max point": pins the point and asks the globe to centre on it.
    pub fn focus_point(&mut self, position: LonLat) -> Option<Overlay> {
        if !position.is_finite() {
            return None;
        }
        self.focused_position = Some(position);
        self.add_overlay(position)
    }

    /// The pending focus request, cleared once the globe has flown there.
    pub fn take_focus(&mut self) -> Option<LonLat> {
        self.focused_position.take()
    }

    /// Toolbar click. Returns `false` for unknown ids.
    pub fn toggle_tool(&mut self, id: &str) -> bool {
        let Some(tool) = tool(id) else {
            return false;
        };
        let enabled = match tool {
            Tool::Layer(kind) => {
                if let Some(pos) = self.selected_layers.iter().position(|k| *k == kind) {
                    self.selected_layers.remove(pos);
                    false
                } else {
                    self.selected_layers.push(kind);
                    true
                }
            }
            Tool::Streamline => {
                self.currents = !self.currents;
                self.currents
            }
        };
        if enabled {
            self.last_selected = id.to_owned();
        }
        if self.has_selection() {
            self.legend_visible = true;
        }
        true
    }

    /// Keeps first occurrences in order.
    pub fn set_selected_layers(&mut self, layers: &[LayerKind]) {
        self.selected_layers.clear();
        for kind in layers {
            if !self.selected_layers.contains(kind) {
                self.selected_layers.push(*kind);
            }
        }
        if self.has_selection() {
            self.legend_visible = true;
        }
    }

    /// Returns the applied (rounded, clamped) percentage.
    pub fn set_zoom_percent(&mut self, percent: f64) -> f64 {
        self.zoom_percent = zoom::normalize_percent(percent);
        self.zoom_percent
    }

    pub fn select_legend(&mut self, id: &str) -> bool {
        if tool(id).is_none() {
            return false;
        }
        self.last_selected = id.to_owned();
        true
    }

    pub fn close_legend(&mut self) {
        self.legend_visible = false;
    }

    /// Ramp for the legend panel, if it is open and has one.
    pub fn legend(&self) -> Option<&'static LegendRamp> {
        if !self.legend_visible || !self.has_selection() {
            return None;
        }
        match tool(&self.last_selected)? {
            Tool::Layer(kind) => legend(kind),
            Tool::Streamline => None,
        }
    }

    /// Selected layers filtered by the current step and species.
    pub fn desired_layers(&self) -> Vec<ImageryLayerDescriptor> {
        let time = self.active_time();
        let species = Some(self.active_species());
        self.selected_layers
            .iter()
            .map(|kind| make_layer(*kind, time, species))
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let (species, analys_date) = (self.active_species(), self.active_date());
        Snapshot {
            tab: self.tab,
            species,
            analys_date,
            sea: self.max_point_query.sea,
            time_steps: &self.time_steps,
            index: self.player.index(),
            hover: self.player.hover(),
            play_state: self.player.state(),
            progress: self.player.progress(),
            hover_progress: self.player.hover_progress(),
            zoom_percent: self.zoom_percent,
            selected_layers: &self.selected_layers,
            currents: self.currents,
            legend_visible: self.legend_visible,
            last_selected: &self.last_selected,
            overlays: self.overlays.as_slice(),
        }
    }

    fn has_selection(&self) -> bool {
        !self.selected_layers.is_empty() || self.currents
    }

    /// Recomputes the time-step list from the active tab's date, then
    /// retags overlays if the effective (time, species) moved.
    fn derive(&mut self) -> Derivation {
        let steps = time_steps(self.active_date()).unwrap_or_else(|err| {
            tracing::warn!(%err, "no time steps");
            Vec::new()
        });
        let steps_changed = steps != self.time_steps;
        if steps_changed {
            self.time_steps = steps;
            self.player.set_len(self.time_steps.len());
        }

        let key = (
            self.active_time().map(str::to_owned),
            self.active_species().to_owned(),
        );
        let retagged = self.tagged.as_ref() != Some(&key);
        if retagged {
            if let Some(time) = &key.0 {
                self.overlays.retag_all(time);
            }
            self.overlays.retag_species(&key.1);
            self.tagged = Some(key);
        }

        Derivation {
            steps_changed,
            retagged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppState, Derivation, Tab};
    use crate::config::DashboardConfig;
    use chrono::NaiveDate;
    use foundation::geo::LonLat;
    use foundation::time::Time;
    use layers::LayerKind;
    use pretty_assertions::assert_eq;

    fn state() -> AppState {
        let today = NaiveDate::from_ymd_opt(2024, 11, 28).expect("date");
        AppState::new(today, &DashboardConfig::default())
    }

    fn times(state: &AppState) -> Vec<&str> {
        state.overlays().iter().map(|o| o.time.as_str()).collect()
    }

    #[test]
    fn starts_on_today_with_default_layers() {
        let s = state();
        assert_eq!(s.tab(), Tab::DailyFish);
        assert_eq!(s.active_date(), "20241128");
        assert_eq!(
            s.time_steps(),
            ["2024-11-28", "2024-11-29", "2024-11-30", "2024-12-01"]
        );
        assert_eq!(s.active_time(), Some("2024-11-28"));
        assert_eq!(s.selected_layers(), [LayerKind::Grid, LayerKind::Fish]);
        assert_eq!(s.zoom_percent(), 50.0);
    }

    #[test]
    fn a_step_change_retags_exactly_once() {
        let mut s = state();
        s.add_overlay(LonLat::new(126.0, 37.0)).expect("overlay");
        s.add_overlay(LonLat::new(127.0, 36.0)).expect("overlay");
        let ids_before: Vec<String> = s.overlays().ids().iter().map(|id| id.to_string()).collect();

        assert_eq!(
            s.jump(2),
            Derivation {
                steps_changed: false,
                retagged: true
            }
        );
        assert_eq!(times(&s), ["2024-11-30", "2024-11-30"]);
        assert_eq!(s.overlays().ids(), ids_before);

        // Same step again: nothing to do.
        assert_eq!(s.jump(2), Derivation::default());
    }

    #[test]
    fn date_change_rebuilds_steps_and_retags_once() {
        let mut s = state();
        s.jump(3);
        s.add_overlay(LonLat::new(126.0, 37.0)).expect("overlay");

        let d = s.set_analysis_date("2024-12-25");
        assert_eq!(
            d,
            Derivation {
                steps_changed: true,
                retagged: true
            }
        );
        assert_eq!(s.active_time(), Some("2024-12-28"));
        assert_eq!(times(&s), ["2024-12-28"]);

        // Same date in the other accepted form yields the same list.
        let d = s.set_analysis_date("20241225");
        assert_eq!(d, Derivation::default());
    }

    #[test]
    fn species_change_retags_species_only() {
        let mut s = state();
        s.add_overlay(LonLat::new(126.0, 37.0)).expect("overlay");
        let d = s.set_species("mackerel");
        assert!(d.retagged && !d.steps_changed);
        let overlay = s.overlays().get("overlay_1").expect("overlay");
        assert_eq!(overlay.species, "mackerel");
        assert_eq!(overlay.time, "2024-11-28");
    }

    #[test]
    fn tab_switch_clears_overlays_and_uses_its_own_query() {
        let mut s = state();
        s.add_overlay(LonLat::new(126.0, 37.0)).expect("overlay");
        s.set_species("anchovy");
        s.set_tab(Tab::Reanalysis);
        assert!(s.overlays().is_empty());
        assert_eq!(s.active_species(), "squid");
        assert_eq!(s.set_tab(Tab::Reanalysis), Derivation::default());
        s.set_tab(Tab::DailyFish);
        assert_eq!(s.active_species(), "anchovy");
    }

    #[test]
    fn bad_date_disables_player_and_overlays() {
        let mut s = state();
        let d = s.set_analysis_date("not a date");
        assert!(d.steps_changed);
        assert!(!s.player().is_enabled());
        assert_eq!(s.active_time(), None);
        assert!(s.add_overlay(LonLat::new(126.0, 37.0)).is_none());
        // Layers still render, filtered by species only.
        assert_eq!(s.desired_layers()[1].parameters.viewparams, "species:squid");
    }

    #[test]
    fn playback_retags_on_every_advance() {
        let mut s = state();
        s.add_overlay(LonLat::new(126.0, 37.0)).expect("overlay");
        s.toggle_play(Time(0.0));

        let mut retags = 0;
        for step in 1..=4 {
            if s.tick(Time(step as f64 * 0.5)).retagged {
                retags += 1;
            }
        }
        assert_eq!(retags, 4);
        assert_eq!(s.player().index(), 0);
        assert!(!s.player().is_playing());
        assert_eq!(times(&s), ["2024-11-28"]);
    }

    #[test]
    fn desired_layers_follow_selection_time_and_species() {
        let mut s = state();
        s.jump(1);
        assert!(s.toggle_tool("sst"));
        let desired = s.desired_layers();
        let identities: Vec<String> = desired.iter().map(|d| d.identity().to_string()).collect();
        assert_eq!(desired.len(), 3);
        assert_eq!(desired[0].parameters.viewparams, "");
        assert_eq!(
            desired[2].parameters.viewparams,
            "ctsh_rprt_ymd:2024-11-29;species:squid"
        );
        assert_eq!(identities.len(), 3);
        assert_eq!(s.last_selected(), "sst");
    }

    #[test]
    fn legend_follows_toolbar() {
        let mut s = state();
        assert!(s.legend().is_some());
        s.close_legend();
        assert!(s.legend().is_none());

        assert!(s.toggle_tool("current"));
        assert!(s.currents());
        assert!(s.legend_visible());
        assert_eq!(s.last_selected(), "current");
        assert!(s.legend().is_none());

        assert!(s.select_legend("chl"));
        assert!(s.legend().is_some());
        assert!(!s.select_legend("wind"));
        assert!(!s.toggle_tool("wind"));

        s.toggle_tool("current");
        s.set_selected_layers(&[]);
        assert!(s.legend().is_none());
    }

    #[test]
    fn focus_pins_and_is_taken_once() {
        let mut s = state();
        let overlay = s.focus_point(LonLat::new(129.1, 35.2)).expect("overlay");
        assert_eq!(overlay.id, "overlay_1");
        assert_eq!(s.take_focus(), Some(LonLat::new(129.1, 35.2)));
        assert_eq!(s.take_focus(), None);
        assert!(s.focus_point(LonLat::new(f64::NAN, 35.0)).is_none());
    }

    #[test]
    fn zoom_is_normalized() {
        let mut s = state();
        assert_eq!(s.set_zoom_percent(54.6), 55.0);
        assert_eq!(s.set_zoom_percent(-3.0), 0.0);
        assert_eq!(s.set_zoom_percent(1e6), 100.0);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let mut s = state();
        s.add_overlay(LonLat::new(126.5, 37.25)).expect("overlay");
        let json = serde_json::to_value(s.snapshot()).expect("json");
        assert_eq!(json["tab"], "dailyFish");
        assert_eq!(json["playState"], "paused");
        assert_eq!(json["selectedLayers"][1], "fish");
        assert_eq!(json["overlays"][0]["position"]["lon"], 126.5);
        assert_eq!(json["timeSteps"][3], "2024-12-01");
    }
}
