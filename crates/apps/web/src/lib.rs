//! Browser bindings for the catch dashboard.
//!
//! The page owns the markup; this module owns the state. Every exported
//! function mutates [`AppState`] and then pushes the result to the globe
//! (layers, markers, currents, zoom, pending focus).

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use api::{ApiClient, MaxPointQuery, PointInfoQuery, ReanalysisQuery, RequestId, Sea};
use chrono::NaiveDate;
use dashboard::config::{
    API_URL_VAR, ION_TOKEN_VAR, LOG_VAR, PLAYER_DELAY_VAR, SPECIES_VAR, WMS_URL_VAR,
};
use dashboard::{AppState, DashboardConfig, Tab};
use foundation::geo::{LonLat, dms_label};
use foundation::math::Vec2;
use foundation::time::Time;
use globe::controller::{ClickCallback, GlobeViewController};
use globe::zoom;
use layers::streamline::CurrentVector;
use layers::symbology::catch_color;
use layers::wms::FeatureInfoRequest;
use scene::viewer::Container;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod dom;
mod log;
use dom::DomPopups;

// Guard to prevent double-initialization of global state (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

#[derive(Default)]
struct WebState {
    config: DashboardConfig,
    app: Option<AppState>,
    globe: Option<GlobeViewController<DomPopups>>,
    client: Option<ApiClient>,
    /// Filled by the click callback during dispatch, drained right after.
    clicks: Rc<RefCell<Vec<LonLat>>>,
    on_click: Option<ClickCallback>,
    /// Set when a drag ends; the click the browser fires next is dropped.
    suppress_click: bool,
}

thread_local! {
    static STATE: RefCell<WebState> = RefCell::new(WebState::default());
}

/// Safe TLS access helper that returns a default on teardown instead of panicking.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<WebState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

fn try_with_state<F, R>(f: F) -> Result<R, JsValue>
where
    F: FnOnce(&mut WebState) -> Result<R, JsValue>,
{
    match STATE.try_with(|state| f(&mut state.borrow_mut())) {
        Ok(result) => result,
        Err(_) => Err(JsValue::from_str("dashboard state is gone")),
    }
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = info.to_string();
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn not_started() -> JsValue {
    JsValue::from_str("dashboard not started")
}

fn to_json(value: &impl Serialize) -> Result<JsValue, JsValue> {
    serde_json::to_string(value)
        .map(|s| JsValue::from_str(&s))
        .map_err(js_err)
}

/// Build-time values first, then the page origin for the API.
fn load_config() -> Result<DashboardConfig, JsValue> {
    let origin = web_sys::window().and_then(|w| w.location().origin().ok());
    DashboardConfig::from_lookup(|key| {
        let baked = match key {
            API_URL_VAR => option_env!("ATLAS_API_URL"),
            WMS_URL_VAR => option_env!("ATLAS_WMS_URL"),
            ION_TOKEN_VAR => option_env!("ATLAS_ION_TOKEN"),
            PLAYER_DELAY_VAR => option_env!("ATLAS_PLAYER_DELAY_MS"),
            SPECIES_VAR => option_env!("ATLAS_DEFAULT_SPECIES"),
            LOG_VAR => option_env!("ATLAS_LOG"),
            _ => None,
        };
        match baked {
            Some(value) => Some(value.to_owned()),
            None if key == API_URL_VAR => origin.clone(),
            None => None,
        }
    })
    .map_err(js_err)
}

fn today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}

/// Brings the globe in line with the app state. Every step is a no-op when
/// nothing changed.
fn push_to_globe(
    globe: &mut GlobeViewController<DomPopups>,
    app: &mut AppState,
) -> Result<(), JsValue> {
    globe.sync_layers(app.desired_layers());
    globe.sync_overlays(app.overlays().as_slice()).map_err(js_err)?;
    globe.set_currents_visible(app.currents()).map_err(js_err)?;
    if globe.zoom_percent().is_some_and(|p| p != app.zoom_percent()) {
        globe.set_zoom_percent(app.zoom_percent()).map_err(js_err)?;
    }
    if globe.viewer().is_some() {
        if let Some(target) = app.take_focus() {
            globe.fly_to(target).map_err(js_err)?;
        }
    }
    Ok(())
}

fn update<R>(f: impl FnOnce(&mut AppState) -> R) -> Result<R, JsValue> {
    try_with_state(|s| {
        let app = s.app.as_mut().ok_or_else(not_started)?;
        let out = f(app);
        if let Some(globe) = s.globe.as_mut() {
            push_to_globe(globe, app)?;
        }
        Ok(out)
    })
}

enum Fetch {
    MaxPoints(RequestId, MaxPointQuery),
    Reanalysis(RequestId, ReanalysisQuery),
}

/// Starts the side-panel query for the active tab. A newer call supersedes
/// any answer still in flight.
fn refresh_queries() {
    let Some((client, fetch)) = with_state(|state| {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let client = s.client.clone()?;
        let app = s.app.as_mut()?;
        let fetch = match app.tab() {
            Tab::DailyFish => {
                let id = app.max_points_mut().begin();
                Fetch::MaxPoints(id, app.max_point_query().clone())
            }
            Tab::Reanalysis => {
                let id = app.reanalysis_mut().begin();
                Fetch::Reanalysis(id, app.reanalysis_query().clone())
            }
        };
        Some((client, fetch))
    }) else {
        return;
    };

    spawn_local(async move {
        match fetch {
            Fetch::MaxPoints(id, query) => {
                let result = client.max_points(&query).await;
                with_state(|state| {
                    if let Some(app) = state.borrow_mut().app.as_mut() {
                        app.max_points_mut().resolve(id, result);
                    }
                });
            }
            Fetch::Reanalysis(id, query) => {
                let result = client.reanalysis(&query).await;
                with_state(|state| {
                    if let Some(app) = state.borrow_mut().app.as_mut() {
                        app.reanalysis_mut().resolve(id, result);
                    }
                });
            }
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Avoid double-initialization (can happen during hot-reload edge cases).
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();

    let config = load_config()?;
    log::init(&config.log_filter);
    let today = today().ok_or_else(|| JsValue::from_str("browser clock gave an invalid date"))?;
    let mut client = ApiClient::new(&config.api_base_url).map_err(js_err)?;
    if let Some(url) = &config.wms_url {
        client = client.with_wms_url(url.clone());
    }

    with_state(|state| {
        let mut s = state.borrow_mut();
        s.app = Some(AppState::new(today, &config));
        s.client = Some(client);
        s.config = config;
    });
    refresh_queries();
    Ok(())
}

/// Creates the viewer inside the element `container_id`. Call again after
/// [`unmount_globe`] to re-create it.
#[wasm_bindgen]
pub fn mount_globe(container_id: &str, width: f64, height: f64) -> Result<(), JsValue> {
    try_with_state(|s| {
        let token = s.config.ion_access_token.clone();
        let globe = s
            .globe
            .get_or_insert_with(|| GlobeViewController::new(Rc::new(RefCell::new(DomPopups))));
        globe
            .mount(Container::new(container_id, width, height), token)
            .map_err(js_err)?;

        let on_click = match &s.on_click {
            Some(cb) => Rc::clone(cb),
            None => {
                let clicks = Rc::clone(&s.clicks);
                let cb: ClickCallback = Rc::new(move |p: LonLat| clicks.borrow_mut().push(p));
                s.on_click = Some(Rc::clone(&cb));
                cb
            }
        };
        globe.set_click_callback(Some(on_click));

        let app = s.app.as_mut().ok_or_else(not_started)?;
        push_to_globe(globe, app)
    })
}

#[wasm_bindgen]
pub fn unmount_globe() {
    with_state(|state| {
        if let Some(globe) = state.borrow_mut().globe.as_mut() {
            globe.unmount();
        }
    });
}

#[wasm_bindgen]
pub fn resize_globe(width: f64, height: f64) {
    with_state(|state| {
        if let Some(globe) = state.borrow_mut().globe.as_mut() {
            globe.resize(width, height);
        }
    });
}

/// One animation frame: advances the player, renders (which moves the
/// popups) and returns the frame's draw list as JSON: camera, tile URLs per
/// imagery layer, markers and current trails. `null` while unmounted.
#[wasm_bindgen]
pub fn render_frame(now_ms: f64) -> Result<JsValue, JsValue> {
    let now = Time::from_millis(now_ms);
    update(|app| app.tick(now))?;
    try_with_state(|s| match s.globe.as_mut() {
        Some(globe) if globe.viewer().is_some() => {
            globe.render(now).map_err(js_err)?;
            match globe.frame_view() {
                Some(view) => to_json(&view),
                None => Ok(JsValue::NULL),
            }
        }
        _ => Ok(JsValue::NULL),
    })
}

#[wasm_bindgen]
pub fn pointer_down(x: f64, y: f64) {
    with_state(|state| {
        let mut s = state.borrow_mut();
        s.suppress_click = false;
        if let Some(globe) = s.globe.as_mut() {
            globe.pointer_down(Vec2::new(x, y));
        }
    });
}

/// Returns `true` if the camera moved and the page should redraw.
#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64) -> bool {
    with_state(|state| {
        state
            .borrow_mut()
            .globe
            .as_mut()
            .is_some_and(|globe| globe.pointer_move(Vec2::new(x, y)))
    })
}

#[wasm_bindgen]
pub fn pointer_up() {
    with_state(|state| {
        let mut s = state.borrow_mut();
        let dragged = s.globe.as_mut().is_some_and(|globe| globe.pointer_up());
        if dragged {
            tracing::debug!("drag ended, next click dropped");
        }
        s.suppress_click = dragged;
    });
}

/// Left click at container pixel `(x, y)`. Pins an overlay when the globe
/// was hit. The release of a drag is not a click.
#[wasm_bindgen]
pub fn globe_click(x: f64, y: f64) -> Result<(), JsValue> {
    let picked = try_with_state(|s| {
        if std::mem::take(&mut s.suppress_click) {
            return Ok(Vec::new());
        }
        if let Some(globe) = s.globe.as_mut() {
            globe.handle_click(Vec2::new(x, y)).map_err(js_err)?;
        }
        Ok(std::mem::take(&mut *s.clicks.borrow_mut()))
    })?;
    update(|app| {
        for position in picked {
            app.add_overlay(position);
        }
    })
}

#[wasm_bindgen]
pub fn close_overlay(id: &str) -> Result<bool, JsValue> {
    update(|app| app.remove_overlay(id))
}

#[wasm_bindgen]
pub fn set_tab(tab: &str) -> Result<(), JsValue> {
    let tab = match tab {
        "dailyFish" => Tab::DailyFish,
        "reanalysis" => Tab::Reanalysis,
        other => return Err(JsValue::from_str(&format!("unknown tab {other:?}"))),
    };
    update(|app| app.set_tab(tab))?;
    refresh_queries();
    Ok(())
}

#[wasm_bindgen]
pub fn set_species(species: &str) -> Result<(), JsValue> {
    update(|app| app.set_species(species))?;
    refresh_queries();
    Ok(())
}

/// Accepts `YYYY-MM-DD` from the date input or `YYYYMMDD`.
#[wasm_bindgen]
pub fn set_analysis_date(date: &str) -> Result<(), JsValue> {
    update(|app| app.set_analysis_date(date))?;
    refresh_queries();
    Ok(())
}

#[wasm_bindgen]
pub fn set_sea(sea: &str) -> Result<(), JsValue> {
    let sea = Sea::parse(sea).ok_or_else(|| JsValue::from_str(&format!("unknown sea {sea:?}")))?;
    update(|app| app.set_sea(sea))?;
    refresh_queries();
    Ok(())
}

#[wasm_bindgen]
pub fn toggle_play(now_ms: f64) -> Result<(), JsValue> {
    update(|app| app.toggle_play(Time::from_millis(now_ms)))
}

#[wasm_bindgen]
pub fn step_forward() -> Result<(), JsValue> {
    update(|app| {
        app.step_forward();
    })
}

#[wasm_bindgen]
pub fn step_backward() -> Result<(), JsValue> {
    update(|app| {
        app.step_backward();
    })
}

#[wasm_bindgen]
pub fn jump_to_step(index: usize) -> Result<(), JsValue> {
    update(|app| {
        app.jump(index);
    })
}

/// A negative index clears the hover.
#[wasm_bindgen]
pub fn hover_step(index: i32) -> Result<(), JsValue> {
    update(|app| app.hover_step(usize::try_from(index).ok()))
}

#[wasm_bindgen]
pub fn toggle_tool(id: &str) -> Result<bool, JsValue> {
    update(|app| app.toggle_tool(id))
}

#[wasm_bindgen]
pub fn select_legend(id: &str) -> Result<bool, JsValue> {
    update(|app| app.select_legend(id))
}

#[wasm_bindgen]
pub fn close_legend() -> Result<(), JsValue> {
    update(|app| app.close_legend())
}

#[wasm_bindgen]
pub fn set_zoom_percent(percent: f64) -> Result<f64, JsValue> {
    update(|app| app.set_zoom_percent(percent))
}

#[wasm_bindgen]
pub fn zoom_wheel(delta_px: f64) -> Result<f64, JsValue> {
    update(|app| app.set_zoom_percent(zoom::percent_after_wheel(app.zoom_percent(), delta_px)))
}

/// Slider click or drag at `offset_px` from the top of a `track_px` track.
#[wasm_bindgen]
pub fn zoom_slider(offset_px: f64, track_px: f64) -> Result<f64, JsValue> {
    update(|app| app.set_zoom_percent(zoom::percent_from_slider(offset_px, track_px)))
}

#[wasm_bindgen]
pub fn zoom_step(zoom_in: bool) -> Result<f64, JsValue> {
    update(|app| {
        let next = if zoom_in {
            zoom::step_in(app.zoom_percent())
        } else {
            zoom::step_out(app.zoom_percent())
        };
        app.set_zoom_percent(next)
    })
}

/// "Go to point" on the best-ranked max point. Returns `false` when the
/// list is empty or carries no coordinates.
#[wasm_bindgen]
pub fn focus_max_point() -> Result<bool, JsValue> {
    update(|app| {
        let target = app
            .max_points()
            .data()
            .and_then(|points| points.first())
            .and_then(|best| best.position());
        match target {
            Some((lon, lat)) => app.focus_point(LonLat::new(lon, lat)).is_some(),
            None => false,
        }
    })
}

/// JSON array of `{x, y, u, v}` current vectors.
#[wasm_bindgen]
pub fn set_current_vectors(json: &str) -> Result<(), JsValue> {
    let vectors: Vec<CurrentVector> = serde_json::from_str(json).map_err(js_err)?;
    try_with_state(|s| {
        let globe = s.globe.as_mut().ok_or_else(not_started)?;
        globe.set_current_vectors(vectors).map_err(js_err)
    })
}

#[wasm_bindgen]
pub fn get_state() -> Result<JsValue, JsValue> {
    try_with_state(|s| {
        let app = s.app.as_ref().ok_or_else(not_started)?;
        to_json(&app.snapshot())
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryView<'a, T: Serialize> {
    data: Option<&'a T>,
    error: Option<String>,
    is_loading: bool,
}

/// `{data, error, isLoading}` of the active tab's side-panel query.
#[wasm_bindgen]
pub fn get_panel_query() -> Result<JsValue, JsValue> {
    try_with_state(|s| {
        let app = s.app.as_ref().ok_or_else(not_started)?;
        match app.tab() {
            Tab::DailyFish => {
                let q = app.max_points();
                to_json(&QueryView {
                    data: q.data(),
                    error: q.error().map(ToString::to_string),
                    is_loading: q.is_loading(),
                })
            }
            Tab::Reanalysis => {
                let q = app.reanalysis();
                to_json(&QueryView {
                    data: q.data(),
                    error: q.error().map(ToString::to_string),
                    is_loading: q.is_loading(),
                })
            }
        }
    })
}

#[wasm_bindgen]
pub fn get_legend() -> Result<JsValue, JsValue> {
    try_with_state(|s| {
        let app = s.app.as_ref().ok_or_else(not_started)?;
        let legend = app.legend().map(|ramp| {
            serde_json::json!({
                "id": app.last_selected(),
                "colors": ramp.colors,
                "values": ramp.values,
                "opacity": ramp.opacity,
            })
        });
        to_json(&legend)
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PopupData {
    lon: String,
    lat: String,
    time: String,
    grid_id: Option<String>,
    predict_catch: Option<f64>,
    sst: Option<f64>,
    ssh: Option<f64>,
    wave: Option<f64>,
    chl: Option<f64>,
    color: &'static str,
}

/// Popup contents for one overlay, queried for its own position, time and
/// species. Failures render as "no data".
#[wasm_bindgen]
pub async fn popup_info(overlay_id: String) -> Result<JsValue, JsValue> {
    let (client, overlay) = try_with_state(|s| {
        let client = s.client.clone().ok_or_else(not_started)?;
        let app = s.app.as_ref().ok_or_else(not_started)?;
        let overlay = app
            .overlays()
            .get(&overlay_id)
            .cloned()
            .ok_or_else(|| JsValue::from_str(&format!("unknown overlay {overlay_id}")))?;
        Ok((client, overlay))
    })?;

    let query = PointInfoQuery::new(
        overlay.position.lon,
        overlay.position.lat,
        &overlay.time,
        overlay.species.clone(),
    );
    let info = client.point_info(&query).await.unwrap_or_else(|err| {
        tracing::warn!(overlay = %overlay.id, error = %err, "point info failed");
        None
    });
    let feature = client
        .wms_point_info(&FeatureInfoRequest::new(
            overlay.position.lon,
            overlay.position.lat,
            overlay.time.clone(),
        ))
        .await
        .unwrap_or_else(|err| {
            tracing::warn!(overlay = %overlay.id, error = %err, "feature info failed");
            None
        });
    let predicted = feature.as_ref().and_then(|f| f.first()).and_then(|p| p.predicted_catch);

    let label = dms_label(overlay.position);
    let predict_catch = info.as_ref().and_then(|i| i.predict_catch).or(predicted);
    to_json(&PopupData {
        lon: label.lon,
        lat: label.lat,
        time: overlay.time,
        grid_id: info.as_ref().map(|i| i.grid_id.clone()),
        predict_catch,
        sst: info.as_ref().and_then(|i| i.sst),
        ssh: info.as_ref().and_then(|i| i.ssh),
        wave: info.as_ref().and_then(|i| i.wave),
        chl: info.as_ref().and_then(|i| i.chl),
        color: catch_color(predict_catch),
    })
}
