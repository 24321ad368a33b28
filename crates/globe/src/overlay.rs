//! Pinned points on the globe, each with its own popup.
//!
//! An overlay's id doubles as the id of its popup element and of its marker
//! entity, so it must stay stable for the overlay's whole life.

use foundation::geo::LonLat;
use foundation::ids::SequentialIds;
use serde::Serialize;

pub const OVERLAY_IDS: SequentialIds = SequentialIds::new("overlay_");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub id: String,
    #[serde(serialize_with = "serialize_lon_lat")]
    pub position: LonLat,
    /// Display date, `YYYY-MM-DD`.
    pub time: String,
    pub species: String,
}

fn serialize_lon_lat<S: serde::Serializer>(p: &LonLat, s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;
    let mut st = s.serialize_struct("LonLat", 2)?;
    st.serialize_field("lon", &p.lon)?;
    st.serialize_field("lat", &p.lat)?;
    st.end()
}

/// Ordered overlay list. Append order is display order.
///
/// Ids are never handed out twice until [`OverlayRegistry::clear`]: the
/// highest suffix ever issued is remembered, so removing the newest overlay
/// does not free its id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayRegistry {
    overlays: Vec<Overlay>,
    issued: u64,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new overlay with the next free id and returns a copy of it.
    pub fn add(&mut self, position: LonLat, time: &str, species: &str) -> Overlay {
        let live = self
            .overlays
            .iter()
            .filter_map(|o| OVERLAY_IDS.suffix(&o.id))
            .max()
            .unwrap_or(0);
        self.issued = self.issued.max(live).saturating_add(1);
        let overlay = Overlay {
            id: OVERLAY_IDS.format(self.issued),
            position,
            time: time.to_owned(),
            species: species.to_owned(),
        };
        tracing::debug!(id = %overlay.id, lon = position.lon, lat = position.lat, "overlay added");
        self.overlays.push(overlay.clone());
        overlay
    }

    /// Returns `true` if an overlay was removed. Unknown ids are ignored.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|o| o.id != id);
        self.overlays.len() != before
    }

    /// Restamps every overlay with `time`. Ids, positions and order stay.
    pub fn retag_all(&mut self, time: &str) {
        for overlay in &mut self.overlays {
            if overlay.time != time {
                overlay.time = time.to_owned();
            }
        }
    }

    pub fn retag_species(&mut self, species: &str) {
        for overlay in &mut self.overlays {
            if overlay.species != species {
                overlay.species = species.to_owned();
            }
        }
    }

    /// Drops every overlay and restarts ids at `overlay_1`.
    pub fn clear(&mut self) {
        self.overlays.clear();
        self.issued = 0;
    }

    pub fn get(&self, id: &str) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }

    pub fn as_slice(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn ids(&self) -> Vec<&str> {
        self.overlays.iter().map(|o| o.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}
