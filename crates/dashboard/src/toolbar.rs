//! Toolbar buttons: raster layers plus the ocean-current toggle.

use layers::LayerKind;

pub const CURRENT_ID: &str = "current";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tool {
    Layer(LayerKind),
    /// Animated ocean currents drawn as entities, not imagery.
    Streamline,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    pub id: &'static str,
    pub label: &'static str,
    pub tool: Tool,
}

const fn layer(kind: LayerKind, id: &'static str, label: &'static str) -> ToolbarButton {
    ToolbarButton { id, label, tool: Tool::Layer(kind) }
}

/// Button groups in display order.
pub const TOOLBAR: [&[ToolbarButton]; 2] = [
    &[
        layer(LayerKind::Grid, "grid", "격자"),
        layer(LayerKind::Fish, "fish", "어획량"),
    ],
    &[
        ToolbarButton { id: CURRENT_ID, label: "해류", tool: Tool::Streamline },
        layer(LayerKind::Sst, "sst", "수온"),
        layer(LayerKind::Wave, "wave", "파고"),
        layer(LayerKind::Ssh, "ssh", "수위"),
        layer(LayerKind::Chl, "chl", "클로로필"),
    ],
];

pub fn buttons() -> impl Iterator<Item = &'static ToolbarButton> {
    TOOLBAR.iter().flat_map(|group| group.iter())
}

pub fn tool(id: &str) -> Option<Tool> {
    buttons().find(|b| b.id == id).map(|b| b.tool)
}
