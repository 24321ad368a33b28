use std::collections::BTreeMap;

use foundation::math::Vec2;

use crate::viewer::Scene;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScreenSpaceEventType {
    LeftClick,
    LeftDoubleClick,
    RightClick,
    MouseMove,
    Wheel,
}

/// Callback for one screen-space gesture. Receives the scene as it is when the
/// gesture is dispatched and the window position in pixels.
pub type InputAction = Box<dyn FnMut(&Scene, Vec2)>;

/// At most one action per event type; setting a new one replaces the old.
#[derive(Default)]
pub struct ScreenSpaceEventHandler {
    actions: BTreeMap<ScreenSpaceEventType, InputAction>,
}

impl std::fmt::Debug for ScreenSpaceEventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenSpaceEventHandler")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ScreenSpaceEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input_action(
        &mut self,
        kind: ScreenSpaceEventType,
        action: impl FnMut(&Scene, Vec2) + 'static,
    ) {
        self.actions.insert(kind, Box::new(action));
    }

    /// Returns `true` if an action was registered.
    pub fn remove_input_action(&mut self, kind: ScreenSpaceEventType) -> bool {
        self.actions.remove(&kind).is_some()
    }

    pub fn has_input_action(&self, kind: ScreenSpaceEventType) -> bool {
        self.actions.contains_key(&kind)
    }

    /// Runs the registered action, if any. Returns whether one ran.
    pub fn dispatch(&mut self, kind: ScreenSpaceEventType, scene: &Scene, position: Vec2) -> bool {
        match self.actions.get_mut(&kind) {
            Some(action) => {
                action(scene, position);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{ScreenSpaceEventHandler, ScreenSpaceEventType};
    use crate::viewer::Scene;
    use foundation::math::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn replacing_an_action_drops_the_old_one() {
        let scene = Scene::new(800.0, 600.0);
        let hits = Rc::new(Cell::new(0));
        let mut handler = ScreenSpaceEventHandler::new();

        let h = Rc::clone(&hits);
        handler.set_input_action(ScreenSpaceEventType::LeftClick, move |_, _| h.set(h.get() + 1));
        let h = Rc::clone(&hits);
        handler.set_input_action(ScreenSpaceEventType::LeftClick, move |_, _| h.set(h.get() + 10));

        assert!(handler.dispatch(ScreenSpaceEventType::LeftClick, &scene, Vec2::new(1.0, 1.0)));
        assert_eq!(hits.get(), 10);
        assert!(!handler.dispatch(ScreenSpaceEventType::RightClick, &scene, Vec2::new(1.0, 1.0)));

        assert!(handler.remove_input_action(ScreenSpaceEventType::LeftClick));
        assert!(!handler.has_input_action(ScreenSpaceEventType::LeftClick));
        assert!(!handler.remove_input_action(ScreenSpaceEventType::LeftClick));
    }
}
