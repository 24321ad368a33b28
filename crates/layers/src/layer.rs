use serde::{Deserialize, Serialize};

/// Raster layers the dashboard can overlay on the globe, keyed by the
/// toolbar id used in the UI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Grid,
    Fish,
    Sst,
    Wave,
    Ssh,
    Chl,
}

impl LayerKind {
    pub const ALL: [LayerKind; 6] = [
        LayerKind::Grid,
        LayerKind::Fish,
        LayerKind::Sst,
        LayerKind::Wave,
        LayerKind::Ssh,
        LayerKind::Chl,
    ];

    pub fn id(self) -> &'static str {
        match self {
            LayerKind::Grid => "grid",
            LayerKind::Fish => "fish",
            LayerKind::Sst => "sst",
            LayerKind::Wave => "wave",
            LayerKind::Ssh => "ssh",
            LayerKind::Chl => "chl",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Layer name on the map server, without the workspace prefix.
    pub fn server_name(self) -> String {
        match self {
            LayerKind::Grid => "grid2".to_owned(),
            LayerKind::Fish => "catch_predict_view".to_owned(),
            other => format!("catch_predict_{}", other.id()),
        }
    }

    /// The grid is static; every other layer is filtered by date and species.
    pub fn is_filtered(self) -> bool {
        self != LayerKind::Grid
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::LayerKind;

    #[test]
    fn ids_round_trip() {
        for kind in LayerKind::ALL {
            assert_eq!(LayerKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(LayerKind::from_id("current"), None);
    }

    #[test]
    fn server_names() {
        assert_eq!(LayerKind::Grid.server_name(), "grid2");
        assert_eq!(LayerKind::Fish.server_name(), "catch_predict_view");
        assert_eq!(LayerKind::Sst.server_name(), "catch_predict_sst");
        assert_eq!(LayerKind::Chl.server_name(), "catch_predict_chl");
    }
}
