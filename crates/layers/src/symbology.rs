//! Legend ramps for the raster layers and the popup colour for predicted catch.

use scene::color::Color;

use crate::layer::LayerKind;

/// Colour ramp of a raster layer. `values` holds the class breaks, one more
/// than the number of colours (the last is the open upper bound label).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LegendRamp {
    pub colors: &'static [&'static str],
    pub values: &'static [&'static str],
    pub opacity: f32,
}

impl LegendRamp {
    /// Swatch colours with the legend opacity applied.
    pub fn swatches(&self) -> Vec<Color> {
        self.colors
            .iter()
            .filter_map(|hex| Color::from_css_hex(hex))
            .map(|c| c.with_alpha(self.opacity))
            .collect()
    }
}

const FISH: LegendRamp = LegendRamp {
    colors: &[
        "#B3E5FC", "#81D4FA", "#4FC3F7", "#81C784", "#66BB6A", "#FFF176", "#FFD54F", "#FFB74D",
        "#FF8A65", "#F44336", "#C62828",
    ],
    values: &["0", "10", "20", "30", "40", "50", "60", "70", "80", "90", "300~", " "],
    opacity: 0.8,
};

const CHL: LegendRamp = LegendRamp {
    colors: &[
        "#F7FCF5", "#E5F5E0", "#C7E9C0", "#A1D99B", "#74C476", "#41AB5D", "#238B45", "#006D2C",
        "#00441B", "#002910",
    ],
    values: &["0.1", "0.2", "0.3", "1", "2", "3", "4", "6", "8", "10", "12"],
    opacity: 0.7,
};

const SSH: LegendRamp = LegendRamp {
    colors: &[
        "#006D6F", "#2E8B8C", "#5CAAAA", "#8AC9C8", "#B8E8E6", "#E6D5E8", "#D5B0D6", "#C48BC4",
        "#B366B2", "#A141A1",
    ],
    values: &[
        "-0.45", "-0.35", "-0.25", "-0.15", "-0.05", "0.05", "0.15", "0.25", "0.35", "0.45", "0.61",
    ],
    opacity: 0.7,
};

const SST: LegendRamp = LegendRamp {
    colors: &[
        "#362B71", "#3465A0", "#68A8CE", "#86C993", "#C8DDA4", "#F7DF89", "#EB7F33", "#E05B30",
        "#BF363C", "#981D22",
    ],
    values: &["0", "3", "6", "9", "12", "15", "18", "21", "24", "30", "35"],
    opacity: 0.7,
};

const WAVE: LegendRamp = LegendRamp {
    colors: &[
        "#FFFFFF", "#E8E8E8", "#D1D1D1", "#BABABF", "#A3A3AD", "#8C8C9B", "#757589", "#5E5E77",
        "#474765", "#303053",
    ],
    values: &["0.0", "0.3", "1.0", "1.5", "2.0", "2.5", "3.0", "3.5", "4.0", "4.5", "5.2"],
    opacity: 0.7,
};

/// Ramp shown in the legend panel. The grid has none.
pub fn legend(kind: LayerKind) -> Option<&'static LegendRamp> {
    match kind {
        LayerKind::Grid => None,
        LayerKind::Fish => Some(&FISH),
        LayerKind::Chl => Some(&CHL),
        LayerKind::Ssh => Some(&SSH),
        LayerKind::Sst => Some(&SST),
        LayerKind::Wave => Some(&WAVE),
    }
}

pub const NO_DATA_COLOR: &str = "#cccccc";

const CATCH_CLASSES: [(f64, &str); 10] = [
    (90.0, "#ff0000"),
    (80.0, "#f78d26"),
    (70.0, "#c2dafd"),
    (60.0, "#a3b8fd"),
    (50.0, "#8595fd"),
    (40.0, "#6673fe"),
    (30.0, "#4750fe"),
    (20.0, "#292eff"),
    (10.0, "#0a0cff"),
    (0.0, "#0000ff"),
];

/// Popup badge colour for a predicted catch value.
pub fn catch_color(value: Option<f64>) -> &'static str {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return NO_DATA_COLOR;
    };
    CATCH_CLASSES
        .iter()
        .find(|(floor, _)| value >= *floor)
        .map_or(NO_DATA_COLOR, |(_, color)| *color)
}
