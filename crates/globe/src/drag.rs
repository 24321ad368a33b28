//! Pointer-drag orbiting. The ground under the pointer follows it while the
//! camera keeps its height and stays north-up.

use foundation::geo::LonLat;
use foundation::math::{Geodetic, Vec2, WGS84_A};
use scene::camera::Camera;

/// Pointer travel below this still counts as a click.
pub const CLICK_SLOP_PX: f64 = 3.0;
/// The camera target never gets closer to a pole than this.
pub const MAX_TARGET_LAT: f64 = 85.0;

#[derive(Debug, Copy, Clone, PartialEq)]
struct Grab {
    start_px: Vec2,
    start_target: LonLat,
    moved: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraDrag {
    grab: Option<Grab>,
}

impl CameraDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    pub fn on_pointer_down(&mut self, pos_px: Vec2, camera: &Camera) {
        if !pos_px.is_finite() {
            return;
        }
        self.grab = Some(Grab {
            start_px: pos_px,
            start_target: LonLat::from_geodetic(camera.position_geodetic()),
            moved: false,
        });
    }

    /// Returns `true` if the camera moved.
    pub fn on_pointer_move(&mut self, pos_px: Vec2, camera: &mut Camera) -> bool {
        let Some(grab) = self.grab.as_mut() else {
            return false;
        };
        if !pos_px.is_finite() {
            return false;
        }
        let delta = pos_px - grab.start_px;
        if !grab.moved && delta.x.hypot(delta.y) < CLICK_SLOP_PX {
            return false;
        }
        grab.moved = true;

        let start = grab.start_target;
        let step = degrees_per_pixel(camera);
        let lat = (start.lat + delta.y * step).clamp(-MAX_TARGET_LAT, MAX_TARGET_LAT);
        let cos_lat = start.lat.to_radians().cos().max(0.1);
        let lon = wrap_lon(start.lon - delta.x * step / cos_lat);
        let height = camera.height();
        camera.set_view(Geodetic::from_degrees(lon, lat, height));
        true
    }

    /// Ends the drag. Returns `true` when the pointer travelled far enough
    /// that the release must not count as a click.
    pub fn on_pointer_up(&mut self) -> bool {
        self.grab.take().is_some_and(|g| g.moved)
    }
}

/// Ground degrees covered by one pixel at the centre of the view.
pub fn degrees_per_pixel(camera: &Camera) -> f64 {
    let metres =
        2.0 * camera.height().max(0.0) * (0.5 * camera.fov_y_rad).tan() / camera.viewport().y;
    (metres / WGS84_A).to_degrees()
}

fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::{CameraDrag, MAX_TARGET_LAT};
    use foundation::math::{Geodetic, Vec2, geodetic_to_ecef};
    use scene::camera::Camera;

    fn camera() -> Camera {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_view(Geodetic::from_degrees(126.43916, 37.4625, 2_000_000.0));
        camera
    }

    fn home_ground() -> foundation::math::Vec3 {
        geodetic_to_ecef(Geodetic::from_degrees(126.43916, 37.4625, 0.0)).as_vec3()
    }

    #[test]
    fn ground_follows_the_pointer() {
        let mut camera = camera();
        let mut drag = CameraDrag::new();
        drag.on_pointer_down(Vec2::new(400.0, 300.0), &camera);
        assert!(drag.on_pointer_move(Vec2::new(500.0, 300.0), &mut camera));
        let px = camera.world_to_window(home_ground()).expect("visible");
        assert!((px.x - 500.0).abs() < 2.0, "{px:?}");
        assert!((px.y - 300.0).abs() < 2.0, "{px:?}");

        assert!(drag.on_pointer_move(Vec2::new(400.0, 380.0), &mut camera));
        let px = camera.world_to_window(home_ground()).expect("visible");
        assert!((px.x - 400.0).abs() < 2.0, "{px:?}");
        assert!((px.y - 380.0).abs() < 2.0, "{px:?}");
        assert!((camera.height() - 2_000_000.0).abs() < 1e-3);

        assert!(drag.on_pointer_up());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn jitter_is_still_a_click() {
        let mut camera = camera();
        let before = camera;
        let mut drag = CameraDrag::new();
        drag.on_pointer_down(Vec2::new(400.0, 300.0), &camera);
        assert!(!drag.on_pointer_move(Vec2::new(401.0, 301.0), &mut camera));
        assert_eq!(camera, before);
        assert!(!drag.on_pointer_up());
    }

    #[test]
    fn moves_without_a_press_are_ignored() {
        let mut camera = camera();
        let before = camera;
        let mut drag = CameraDrag::new();
        assert!(!drag.on_pointer_move(Vec2::new(10.0, 10.0), &mut camera));
        assert_eq!(camera, before);
        assert!(!drag.on_pointer_up());
    }

    #[test]
    fn target_stays_off_the_poles_and_wraps_longitude() {
        let mut camera = camera();
        let mut drag = CameraDrag::new();
        drag.on_pointer_down(Vec2::new(400.0, 300.0), &camera);
        drag.on_pointer_move(Vec2::new(-40_000.0, 90_000.0), &mut camera);
        let geo = camera.position_geodetic();
        assert!((geo.lat_deg() - MAX_TARGET_LAT).abs() < 1e-6);
        assert!((-180.0..=180.0).contains(&geo.lon_deg()));
    }
}
