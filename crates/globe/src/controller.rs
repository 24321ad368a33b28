//! Owns the viewer for the lifetime of the globe panel.
//!
//! Lifecycle: `Uninitialized -> Active -> Destroyed`, and back to `Active`
//! on re-mount with a fresh viewer. While active the controller holds one
//! left-click action, one post-render listener, the imagery layers it
//! attached and one marker entity per tracked overlay. Unmount releases all
//! of them before the viewer is destroyed.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::geo::LonLat;
use foundation::math::{Vec2, Vec3, geodetic_to_ecef};
use foundation::time::Time;
use layers::basemap::base_map_provider;
use layers::streamline::{CurrentAnimation, CurrentVector};
use layers::wms::ImageryLayerDescriptor;
use runtime::event_bus::ListenerId;
use runtime::frame::Frame;
use scene::color::Color;
use scene::entity::{Entity, EntityCollection, PointGraphics};
use scene::error::SceneError;
use scene::input::ScreenSpaceEventType;
use scene::viewer::{Container, Scene, Viewer, ViewerOptions};

use crate::drag::CameraDrag;
use crate::frame_view::FrameView;
use crate::imagery::{ImageryLayerSynchronizer, SyncReport};
use crate::overlay::Overlay;
use crate::popup::{PopupHost, placement};
use crate::zoom;

/// Initial camera target over the Yellow Sea coast.
pub const HOME_POSITION: LonLat = LonLat::new(126.43916, 37.4625);
pub const HOME_HEIGHT_M: f64 = 2_000_000.0;

/// Entity name shared by every overlay marker.
pub const MARKER_NAME: &str = "arbit_marker";

pub const CURRENTS_SEED: u64 = 0x5eed;

pub fn marker_graphics() -> PointGraphics {
    PointGraphics {
        pixel_size: 6.0,
        color: Color::STEELBLUE,
        outline_color: Color::WHITE,
        outline_width: 2.0,
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Active,
    Destroyed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    NotMounted,
    AlreadyMounted,
    Scene(SceneError),
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerError::NotMounted => write!(f, "globe is not mounted"),
            ControllerError::AlreadyMounted => write!(f, "globe is already mounted"),
            ControllerError::Scene(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<SceneError> for ControllerError {
    fn from(err: SceneError) -> Self {
        ControllerError::Scene(err)
    }
}

/// Receives the picked position of a left click. Compared by pointer, so
/// hand the same `Rc` back to keep the registration.
pub type ClickCallback = Rc<dyn Fn(LonLat)>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

pub struct GlobeViewController<H: PopupHost + 'static> {
    state: ControllerState,
    viewer: Option<Viewer>,
    popups: Rc<RefCell<H>>,
    tracked: Rc<RefCell<Vec<Overlay>>>,
    click_callback: Option<ClickCallback>,
    post_render_listener: Option<ListenerId>,
    base_layers: ImageryLayerSynchronizer,
    data_layers: ImageryLayerSynchronizer,
    desired_layers: Vec<ImageryLayerDescriptor>,
    currents: CurrentAnimation,
    currents_visible: bool,
    drag: CameraDrag,
}

impl<H: PopupHost + 'static> GlobeViewController<H> {
    pub fn new(popups: Rc<RefCell<H>>) -> Self {
        Self {
            state: ControllerState::Uninitialized,
            viewer: None,
            popups,
            tracked: Rc::new(RefCell::new(Vec::new())),
            click_callback: None,
            post_render_listener: None,
            base_layers: ImageryLayerSynchronizer::new(),
            data_layers: ImageryLayerSynchronizer::new(),
            desired_layers: Vec::new(),
            currents: CurrentAnimation::new(Vec::new(), CURRENTS_SEED),
            currents_visible: false,
            drag: CameraDrag::new(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    pub fn popups(&self) -> &Rc<RefCell<H>> {
        &self.popups
    }

    /// Creates the viewer with every widget off and the camera at
    /// [`HOME_POSITION`], then re-applies the current click callback,
    /// overlays, layers and currents.
    pub fn mount(
        &mut self,
        container: Container,
        ion_access_token: Option<String>,
    ) -> Result<(), ControllerError> {
        if self.state == ControllerState::Active {
            return Err(ControllerError::AlreadyMounted);
        }

        let options = ViewerOptions::bare().with_ion_access_token(ion_access_token);
        let mut viewer = Viewer::new(container, options)?;
        viewer
            .scene_mut()
            .camera
            .set_view(HOME_POSITION.to_geodetic(HOME_HEIGHT_M));

        let tracked = Rc::clone(&self.tracked);
        let popups = Rc::clone(&self.popups);
        let listener = viewer.post_render().add_listener(move |scene: &Scene| {
            project_popups(scene, &tracked.borrow(), &mut *popups.borrow_mut());
        });
        self.post_render_listener = Some(listener);

        if let Some(callback) = &self.click_callback {
            register_click(&mut viewer, Rc::clone(callback));
        }

        let scene = viewer.scene_mut();
        self.base_layers
            .sync(&mut scene.imagery_layers, &[base_map_provider()]);
        self.data_layers
            .sync(&mut scene.imagery_layers, &self.desired_layers);
        reconcile_markers(&mut scene.entities, &self.tracked.borrow())?;
        if self.currents_visible {
            self.currents.start(&mut scene.entities)?;
        }

        tracing::info!(container = %viewer.container().id, "globe mounted");
        self.viewer = Some(viewer);
        self.state = ControllerState::Active;
        Ok(())
    }

    /// Releases the click action, frame listener, layers and entities, then
    /// destroys the viewer. Safe to call in any state.
    pub fn unmount(&mut self) {
        let Some(mut viewer) = self.viewer.take() else {
            return;
        };
        viewer
            .screen_space_event_handler()
            .remove_input_action(ScreenSpaceEventType::LeftClick);
        if let Some(listener) = self.post_render_listener.take() {
            viewer.post_render().remove_listener(listener);
        }

        let scene = viewer.scene_mut();
        self.currents.clear(&mut scene.entities);
        self.data_layers.detach_all(&mut scene.imagery_layers);
        self.base_layers.detach_all(&mut scene.imagery_layers);

        self.drag = CameraDrag::new();
        viewer.destroy();
        self.state = ControllerState::Destroyed;
        tracing::info!("globe unmounted");
    }

    /// Returns `true` when the registration changed. Passing the same `Rc`
    /// again is a no-op.
    pub fn set_click_callback(&mut self, callback: Option<ClickCallback>) -> bool {
        let unchanged = match (&self.click_callback, &callback) {
            (Some(old), Some(new)) => Rc::ptr_eq(old, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return false;
        }

        if let Some(viewer) = self.viewer.as_mut() {
            viewer
                .screen_space_event_handler()
                .remove_input_action(ScreenSpaceEventType::LeftClick);
            if let Some(callback) = &callback {
                register_click(viewer, Rc::clone(callback));
            }
        }
        self.click_callback = callback;
        true
    }

    /// Forwards a left click at window pixel `position`.
    pub fn handle_click(&mut self, position: Vec2) -> Result<bool, ControllerError> {
        let viewer = self.viewer.as_mut().ok_or(ControllerError::NotMounted)?;
        Ok(viewer.click(position))
    }

    pub fn render(&mut self, now: Time) -> Result<Frame, ControllerError> {
        let viewer = self.viewer.as_mut().ok_or(ControllerError::NotMounted)?;
        Ok(viewer.render(now)?)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.resize(width, height);
        }
    }

    /// Replaces the tracked overlay list and, when mounted, brings the
    /// marker entities in line with it.
    pub fn sync_overlays(&mut self, overlays: &[Overlay]) -> Result<MarkerReport, ControllerError> {
        *self.tracked.borrow_mut() = overlays.to_vec();
        match self.viewer.as_mut() {
            Some(viewer) => reconcile_markers(&mut viewer.scene_mut().entities, overlays),
            None => Ok(MarkerReport::default()),
        }
    }

    /// Remembers `desired` and, when mounted, reconciles the data layers.
    pub fn sync_layers(&mut self, desired: Vec<ImageryLayerDescriptor>) -> SyncReport {
        self.desired_layers = desired;
        match self.viewer.as_mut() {
            Some(viewer) => self
                .data_layers
                .sync(&mut viewer.scene_mut().imagery_layers, &self.desired_layers),
            None => SyncReport::default(),
        }
    }

    /// Centres the camera over `position` at the current height.
    pub fn fly_to(&mut self, position: LonLat) -> Result<(), ControllerError> {
        let viewer = self.viewer.as_mut().ok_or(ControllerError::NotMounted)?;
        let camera = &mut viewer.scene_mut().camera;
        let height = camera.height();
        camera.set_view(position.to_geodetic(height));
        Ok(())
    }

    pub fn zoom_percent(&self) -> Option<f64> {
        let viewer = self.viewer.as_ref()?;
        Some(zoom::percent_for_height(viewer.scene().camera.height()))
    }

    /// Moves the camera to the height for `percent`; returns the applied
    /// (rounded, clamped) percentage.
    pub fn set_zoom_percent(&mut self, percent: f64) -> Result<f64, ControllerError> {
        let viewer = self.viewer.as_mut().ok_or(ControllerError::NotMounted)?;
        let percent = zoom::normalize_percent(percent);
        viewer
            .scene_mut()
            .camera
            .set_height(zoom::height_for_percent(percent));
        Ok(percent)
    }

    pub fn wheel(&mut self, delta_px: f64) -> Result<f64, ControllerError> {
        let current = self.zoom_percent().ok_or(ControllerError::NotMounted)?;
        self.set_zoom_percent(zoom::percent_after_wheel(current, delta_px))
    }

    /// Starts a camera drag at window pixel `position`.
    pub fn pointer_down(&mut self, position: Vec2) {
        if let Some(viewer) = self.viewer.as_ref() {
            self.drag.on_pointer_down(position, &viewer.scene().camera);
        }
    }

    /// Returns `true` if the camera moved.
    pub fn pointer_move(&mut self, position: Vec2) -> bool {
        match self.viewer.as_mut() {
            Some(viewer) => self
                .drag
                .on_pointer_move(position, &mut viewer.scene_mut().camera),
            None => false,
        }
    }

    /// Ends a drag. `true` means the pointer travelled and the click that
    /// follows the release should be dropped.
    pub fn pointer_up(&mut self) -> bool {
        self.drag.on_pointer_up()
    }

    /// What the page has to draw for the last rendered frame.
    pub fn frame_view(&self) -> Option<FrameView> {
        let viewer = self.viewer.as_ref()?;
        Some(FrameView::of(viewer.scene()))
    }

    /// New current field. A running animation is rebuilt from it.
    pub fn set_current_vectors(&mut self, vectors: Vec<CurrentVector>) -> Result<(), ControllerError> {
        self.currents.set_vectors(vectors);
        if let Some(viewer) = self.viewer.as_mut() {
            let entities = &mut viewer.scene_mut().entities;
            if self.currents.is_running() {
                self.currents.clear(entities);
                self.currents.start(entities)?;
            }
        }
        Ok(())
    }

    pub fn set_currents_visible(&mut self, visible: bool) -> Result<(), ControllerError> {
        self.currents_visible = visible;
        if let Some(viewer) = self.viewer.as_mut() {
            let entities = &mut viewer.scene_mut().entities;
            if visible {
                self.currents.start(entities)?;
            } else {
                self.currents.clear(entities);
            }
        }
        Ok(())
    }
}

impl<H: PopupHost + 'static> Drop for GlobeViewController<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Globe position under window pixel `pixel`, or `None` for a sky hit.
pub fn pick_lon_lat(scene: &Scene, pixel: Vec2) -> Option<LonLat> {
    let ray = scene.camera.pick_ray(pixel)?;
    let geo = scene.globe.pick_geodetic(&ray)?;
    Some(LonLat::from_geodetic(geo))
}

fn register_click(viewer: &mut Viewer, callback: ClickCallback) {
    viewer.screen_space_event_handler().set_input_action(
        ScreenSpaceEventType::LeftClick,
        move |scene, pixel| {
            if let Some(position) = pick_lon_lat(scene, pixel) {
                callback(position);
            }
        },
    );
}

/// Moves each tracked popup above its overlay's screen position. Popups not
/// mounted yet and points on the far side of the globe are skipped.
fn project_popups<H: PopupHost>(scene: &Scene, overlays: &[Overlay], host: &mut H) {
    for overlay in overlays {
        let Some(size) = host.measure(&overlay.id) else {
            continue;
        };
        let world = surface_point(overlay.position);
        if !scene.globe.is_visible_from(scene.camera.position, world) {
            continue;
        }
        let Some(pixel) = scene.camera.world_to_window(world) else {
            continue;
        };
        host.place(&overlay.id, placement(pixel, size));
    }
}

fn surface_point(position: LonLat) -> Vec3 {
    geodetic_to_ecef(position.to_geodetic(0.0)).as_vec3()
}

fn reconcile_markers(
    entities: &mut EntityCollection,
    overlays: &[Overlay],
) -> Result<MarkerReport, ControllerError> {
    let wanted: BTreeMap<&str, Vec3> = overlays
        .iter()
        .map(|o| (o.id.as_str(), surface_point(o.position)))
        .collect();
    // A marker whose id came back at another position is replaced too.
    let stale: Vec<String> = entities
        .values()
        .filter(|e| e.name.as_deref() == Some(MARKER_NAME))
        .filter(|e| wanted.get(e.id.as_str()).copied() != e.position)
        .map(|e| e.id.clone())
        .collect();

    let mut report = MarkerReport::default();
    for id in stale {
        entities.remove_by_id(&id);
        report.removed.push(id);
    }
    for overlay in overlays {
        if entities.contains(&overlay.id) {
            continue;
        }
        entities.add(
            Entity::new(overlay.id.clone())
                .with_name(MARKER_NAME)
                .at_lon_lat(overlay.position)
                .with_point(marker_graphics()),
        )?;
        report.added.push(overlay.id.clone());
    }
    if !report.added.is_empty() || !report.removed.is_empty() {
        tracing::debug!(
            added = report.added.len(),
            removed = report.removed.len(),
            "markers reconciled"
        );
    }
    Ok(report)
}
