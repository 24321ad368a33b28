use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length when built through [`Ray::new`].
    pub dir: Vec3,
}

impl Ray {
    /// Returns `None` when `dir` has no usable direction.
    pub fn new(origin: Vec3, dir: Vec3) -> Option<Self> {
        Some(Self {
            origin,
            dir: dir.normalize()?,
        })
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir.scale(t)
    }
}

/// Entry distance of `ray` into the axis-aligned ellipsoid with the given
/// semi-axes, centred at the origin.
///
/// Works in the scaled space where the ellipsoid becomes the unit sphere.
/// A ray starting inside the ellipsoid reports the exit point.
pub fn ray_ellipsoid_hit_t(ray: &Ray, radii: Vec3) -> Option<f64> {
    let inv = Vec3::new(1.0 / radii.x, 1.0 / radii.y, 1.0 / radii.z);
    let o = Vec3::new(ray.origin.x * inv.x, ray.origin.y * inv.y, ray.origin.z * inv.z);
    let d = Vec3::new(ray.dir.x * inv.x, ray.dir.y * inv.y, ray.dir.z * inv.z);

    let a = d.dot(d);
    let b = 2.0 * o.dot(d);
    let c = o.dot(o) - 1.0;
    if a <= 0.0 {
        return None;
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);

    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{Ray, ray_ellipsoid_hit_t};
    use foundation::math::Vec3;

    const UNIT: Vec3 = Vec3::new(1.0, 1.0, 1.0);

    #[test]
    fn ray_hits_near_side_of_sphere() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)).expect("ray");
        let t = ray_ellipsoid_hit_t(&ray, UNIT).expect("hit");
        assert!((t - 4.0).abs() < 1e-12);
        assert!((ray.at(t) - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).expect("ray");
        assert!(ray_ellipsoid_hit_t(&ray, UNIT).is_none());
    }

    #[test]
    fn ray_passing_beside_misses() {
        let ray = Ray::new(Vec3::new(5.0, 2.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)).expect("ray");
        assert!(ray_ellipsoid_hit_t(&ray, UNIT).is_none());
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }
}
