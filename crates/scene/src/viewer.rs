use foundation::math::Vec2;
use foundation::time::Time;
use runtime::event_bus::Event;
use runtime::frame::Frame;

use crate::camera::Camera;
use crate::entity::EntityCollection;
use crate::error::SceneError;
use crate::globe::Globe;
use crate::imagery::ImageryLayerCollection;
use crate::input::{ScreenSpaceEventHandler, ScreenSpaceEventType};

/// Host element the viewer renders into.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

/// Widget and chrome switches. Everything defaults to on, like a stock viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    pub animation: bool,
    pub base_layer_picker: bool,
    pub fullscreen_button: bool,
    pub geocoder: bool,
    pub home_button: bool,
    pub info_box: bool,
    pub scene_mode_picker: bool,
    pub selection_indicator: bool,
    pub timeline: bool,
    pub navigation_help_button: bool,
    pub navigation_instructions_initially_visible: bool,
    pub default_base_layer: bool,
    /// Element id that receives credits instead of the built-in credit bar.
    pub credit_container: Option<String>,
    pub ion_access_token: Option<String>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            animation: true,
            base_layer_picker: true,
            fullscreen_button: true,
            geocoder: true,
            home_button: true,
            info_box: true,
            scene_mode_picker: true,
            selection_indicator: true,
            timeline: true,
            navigation_help_button: true,
            navigation_instructions_initially_visible: true,
            default_base_layer: true,
            credit_container: None,
            ion_access_token: None,
        }
    }
}

impl ViewerOptions {
    /// No widgets, no default imagery, credits routed to a detached element.
    pub fn bare() -> Self {
        Self {
            animation: false,
            base_layer_picker: false,
            fullscreen_button: false,
            geocoder: false,
            home_button: false,
            info_box: false,
            scene_mode_picker: false,
            selection_indicator: false,
            timeline: false,
            navigation_help_button: false,
            navigation_instructions_initially_visible: false,
            default_base_layer: false,
            credit_container: Some("credits-hidden".to_owned()),
            ion_access_token: None,
        }
    }

    pub fn with_ion_access_token(mut self, token: Option<String>) -> Self {
        self.ion_access_token = token.filter(|t| !t.is_empty());
        self
    }
}

/// Everything a frame listener may read.
#[derive(Debug)]
pub struct Scene {
    pub camera: Camera,
    pub globe: Globe,
    pub entities: EntityCollection,
    pub imagery_layers: ImageryLayerCollection,
    pub frame: Frame,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            camera: Camera::new(width, height),
            globe: Globe::default(),
            entities: EntityCollection::new(),
            imagery_layers: ImageryLayerCollection::new(),
            frame: Frame::first(Time::ZERO),
        }
    }
}

/// Owns the scene plus its input and frame signals.
///
/// The signals live beside `scene`, not inside it, so a listener can borrow
/// the scene while the signal itself is borrowed mutably.
#[derive(Debug)]
pub struct Viewer {
    container: Container,
    options: ViewerOptions,
    scene: Scene,
    screen_space: ScreenSpaceEventHandler,
    post_render: Event<Scene>,
    rendered_once: bool,
    destroyed: bool,
}

impl Viewer {
    pub fn new(container: Container, options: ViewerOptions) -> Result<Self, SceneError> {
        if container.id.trim().is_empty() {
            return Err(SceneError::InvalidContainer("empty element id".to_owned()));
        }
        if !(container.width > 0.0 && container.height > 0.0) {
            return Err(SceneError::InvalidContainer(format!(
                "{} has no area ({}x{})",
                container.id, container.width, container.height
            )));
        }

        tracing::debug!(container = %container.id, "creating viewer");
        let scene = Scene::new(container.width, container.height);
        Ok(Self {
            container,
            options,
            scene,
            screen_space: ScreenSpaceEventHandler::new(),
            post_render: Event::new(),
            rendered_once: false,
            destroyed: false,
        })
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn screen_space_event_handler(&mut self) -> &mut ScreenSpaceEventHandler {
        &mut self.screen_space
    }

    pub fn post_render(&mut self) -> &mut Event<Scene> {
        &mut self.post_render
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.container.width = width;
        self.container.height = height;
        self.scene.camera.set_viewport(width, height);
    }

    /// Delivers a pointer gesture. Ignored once destroyed.
    pub fn dispatch(&mut self, kind: ScreenSpaceEventType, position: Vec2) -> bool {
        if self.destroyed {
            return false;
        }
        self.screen_space.dispatch(kind, &self.scene, position)
    }

    pub fn click(&mut self, position: Vec2) -> bool {
        self.dispatch(ScreenSpaceEventType::LeftClick, position)
    }

    /// Renders one frame at host time `now` and raises `post_render`.
    pub fn render(&mut self, now: Time) -> Result<Frame, SceneError> {
        if self.destroyed {
            return Err(SceneError::Destroyed);
        }
        self.scene.frame = if self.rendered_once {
            self.scene.frame.advance_to(now)
        } else {
            self.rendered_once = true;
            Frame::first(now)
        };
        self.post_render.raise(&self.scene);
        Ok(self.scene.frame)
    }

    /// Releases every listener, entity and layer. Safe to call twice.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        tracing::debug!(container = %self.container.id, "destroying viewer");
        self.post_render.clear();
        self.screen_space.clear();
        self.scene.entities.clear();
        self.scene.imagery_layers.remove_all();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
