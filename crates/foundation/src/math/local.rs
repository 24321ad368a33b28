use super::{Geodetic, Vec3, geodetic_surface_normal};

/// Local East-North-Up unit axes expressed in ECEF.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnuFrame {
    pub east: Vec3,
    pub north: Vec3,
    pub up: Vec3,
}

/// Tangent frame at `origin`. Used to orient a camera looking straight down.
pub fn enu_frame(origin: Geodetic) -> EnuFrame {
    let sin_lat = origin.lat_rad.sin();
    let cos_lat = origin.lat_rad.cos();
    let sin_lon = origin.lon_rad.sin();
    let cos_lon = origin.lon_rad.cos();

    EnuFrame {
        east: Vec3::new(-sin_lon, cos_lon, 0.0),
        north: Vec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat),
        up: geodetic_surface_normal(origin),
    }
}
