use foundation::math::{Ecef, Geodetic, Vec3, WGS84_A, WGS84_B, ecef_to_geodetic};

use crate::picking::{Ray, ray_ellipsoid_hit_t};

/// The WGS84 globe surface used for picking and horizon culling.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Globe {
    pub radii: Vec3,
}

impl Default for Globe {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Globe {
    pub fn wgs84() -> Self {
        Self {
            radii: Vec3::new(WGS84_A, WGS84_A, WGS84_B),
        }
    }

    /// First intersection of `ray` with the globe surface, in ECEF meters.
    pub fn pick(&self, ray: &Ray) -> Option<Vec3> {
        let t = ray_ellipsoid_hit_t(ray, self.radii)?;
        Some(ray.at(t))
    }

    /// Like [`Globe::pick`], converted to geodetic coordinates.
    pub fn pick_geodetic(&self, ray: &Ray) -> Option<Geodetic> {
        self.pick(ray).map(|p| ecef_to_geodetic(Ecef::from(p)))
    }

    /// Horizon test for a point on (or near) the surface.
    ///
    /// In the space scaled by the inverse radii the globe is a unit sphere and
    /// a surface point is visible iff the viewer lies above its tangent plane.
    pub fn is_visible_from(&self, viewer: Vec3, point: Vec3) -> bool {
        let scale = |v: Vec3| Vec3::new(v.x / self.radii.x, v.y / self.radii.y, v.z / self.radii.z);
        let v = scale(viewer);
        let p = scale(point);
        (v - p).dot(p) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::Globe;
    use crate::picking::Ray;
    use foundation::math::{Geodetic, Vec3, WGS84_A, geodetic_to_ecef};

    #[test]
    fn picks_surface_point_below_camera() {
        let globe = Globe::wgs84();
        let above = geodetic_to_ecef(Geodetic::from_degrees(126.0, 37.0, 1_000_000.0)).as_vec3();
        let ray = Ray::new(above, -above).expect("ray");
        let hit = globe.pick_geodetic(&ray).expect("hit");
        // Geocentric ray, so latitude shifts slightly; altitude must be ~0.
        assert!(hit.alt_m.abs() < 1e-2);
        assert!((hit.lon_deg() - 126.0).abs() < 1e-9);
        assert!((hit.lat_deg() - 37.0).abs() < 0.2);
    }

    #[test]
    fn far_side_is_hidden() {
        let globe = Globe::wgs84();
        let viewer = Vec3::new(3.0 * WGS84_A, 0.0, 0.0);
        let near = geodetic_to_ecef(Geodetic::from_degrees(0.0, 0.0, 0.0)).as_vec3();
        let far = geodetic_to_ecef(Geodetic::from_degrees(180.0, 0.0, 0.0)).as_vec3();
        assert!(globe.is_visible_from(viewer, near));
        assert!(!globe.is_visible_from(viewer, far));
    }
}
