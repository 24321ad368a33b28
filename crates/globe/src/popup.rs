use foundation::math::Vec2;

/// Gap between a popup's bottom edge and its anchor point.
pub const POPUP_MARGIN_PX: f64 = 20.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PopupSize {
    pub width: f64,
    pub height: f64,
}

/// CSS `top`/`left` in pixels relative to the globe container.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PopupPlacement {
    pub top: f64,
    pub left: f64,
}

/// Where popups live. The browser implementation measures and moves DOM
/// elements; tests use an in-memory host.
pub trait PopupHost {
    /// Current rendered size, or `None` if the popup is not mounted yet.
    fn measure(&self, id: &str) -> Option<PopupSize>;

    fn place(&mut self, id: &str, placement: PopupPlacement);
}

/// Bottom-centre of the popup sits `POPUP_MARGIN_PX` above `anchor`.
pub fn placement(anchor: Vec2, size: PopupSize) -> PopupPlacement {
    PopupPlacement {
        top: anchor.y - (size.height + POPUP_MARGIN_PX),
        left: anchor.x - size.width / 2.0,
    }
}
