use globe::popup::{PopupHost, PopupPlacement, PopupSize};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Popups are page elements whose id equals the overlay id.
#[derive(Debug, Default)]
pub struct DomPopups;

fn element(id: &str) -> Option<HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

impl PopupHost for DomPopups {
    fn measure(&self, id: &str) -> Option<PopupSize> {
        let el = element(id)?;
        Some(PopupSize {
            width: el.offset_width() as f64,
            height: el.offset_height() as f64,
        })
    }

    fn place(&mut self, id: &str, placement: PopupPlacement) {
        let Some(el) = element(id) else {
            return;
        };
        let style = el.style();
        let _ = style.set_property("top", &format!("{}px", placement.top));
        let _ = style.set_property("left", &format!("{}px", placement.left));
    }
}
