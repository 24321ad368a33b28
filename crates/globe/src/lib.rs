//! Interactive core of the catch globe: pinned overlays, the view controller
//! that owns the viewer, imagery reconciliation, zoom mapping, pointer
//! dragging and the per-frame draw list handed to the page.

pub mod controller;
pub mod drag;
pub mod frame_view;
pub mod imagery;
pub mod overlay;
pub mod popup;
pub mod zoom;

pub use controller::*;
pub use drag::CameraDrag;
pub use frame_view::FrameView;
pub use imagery::*;
pub use overlay::*;
pub use popup::*;
