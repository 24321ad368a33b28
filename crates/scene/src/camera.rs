use foundation::math::{
    Ecef, Geodetic, Vec2, Vec3, ecef_to_geodetic, enu_frame, geodetic_to_ecef,
};

use crate::picking::Ray;

/// Default vertical field of view (60 degrees).
pub const DEFAULT_FOV_Y_RAD: f64 = std::f64::consts::FRAC_PI_3;

/// Perspective camera in ECEF space.
///
/// `direction`, `up` and `right` form an orthonormal, right-handed basis
/// (`right = direction x up`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub fov_y_rad: f64,
    pub near_m: f64,
    viewport: Vec2,
}

impl Camera {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            direction: Vec3::new(-1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 0.0, 1.0),
            right: Vec3::new(0.0, -1.0, 0.0),
            fov_y_rad: DEFAULT_FOV_Y_RAD,
            near_m: 1.0,
            viewport: Vec2::new(1.0, 1.0),
        };
        camera.set_viewport(viewport_width, viewport_height);
        camera.set_view(Geodetic::from_degrees(0.0, 0.0, 20_000_000.0));
        camera
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Place the camera above `destination`, looking straight down with north up.
    pub fn set_view(&mut self, destination: Geodetic) {
        let frame = enu_frame(destination);
        self.position = geodetic_to_ecef(destination).as_vec3();
        self.direction = -frame.up;
        self.up = frame.north;
        self.right = self.direction.cross(self.up);
    }

    pub fn position_geodetic(&self) -> Geodetic {
        ecef_to_geodetic(Ecef::from(self.position))
    }

    /// Height above the ellipsoid in meters.
    pub fn height(&self) -> f64 {
        self.position_geodetic().alt_m
    }

    /// Keep the current ground point, change the height.
    pub fn set_height(&mut self, height_m: f64) {
        let geo = self.position_geodetic();
        self.set_view(Geodetic::new(geo.lat_rad, geo.lon_rad, height_m));
    }

    fn tan_half_fov(&self) -> f64 {
        (0.5 * self.fov_y_rad).tan()
    }

    fn aspect(&self) -> f64 {
        self.viewport.x / self.viewport.y
    }

    /// Ray from the eye through the window pixel `pixel` (origin top-left).
    pub fn pick_ray(&self, pixel: Vec2) -> Option<Ray> {
        if !pixel.is_finite() {
            return None;
        }
        let ndc_x = 2.0 * pixel.x / self.viewport.x - 1.0;
        let ndc_y = 1.0 - 2.0 * pixel.y / self.viewport.y;
        let t = self.tan_half_fov();

        let dir = self.direction
            + self.right.scale(ndc_x * t * self.aspect())
            + self.up.scale(ndc_y * t);
        Ray::new(self.position, dir)
    }

    /// Window pixel of a world point, or `None` behind the near plane.
    pub fn world_to_window(&self, point: Vec3) -> Option<Vec2> {
        let v = point - self.position;
        let depth = v.dot(self.direction);
        if depth <= self.near_m {
            return None;
        }
        let t = self.tan_half_fov();
        let ndc_x = v.dot(self.right) / (depth * t * self.aspect());
        let ndc_y = v.dot(self.up) / (depth * t);

        let px = Vec2::new(
            (ndc_x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc_y) * 0.5 * self.viewport.y,
        );
        px.is_finite().then_some(px)
    }
}
