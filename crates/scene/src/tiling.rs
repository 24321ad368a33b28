use std::f64::consts::PI;

/// Tile coordinate in ZXY scheme (`y` counts down from the north edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

/// Geographic rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Rectangle {
    pub const MAX: Rectangle = Rectangle::from_degrees(-180.0, -90.0, 180.0, 90.0);

    pub const fn from_degrees(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.west < other.east
            && other.west < self.east
            && self.south < other.north
            && other.south < self.north
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TilingScheme {
    /// EPSG:4326, two root tiles side by side.
    #[default]
    Geographic,
    /// EPSG:3857, one root tile.
    WebMercator,
}

/// Latitude limit of the square Web Mercator world.
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Deepest level whose tile counts fit in `u32` for both schemes.
pub const MAX_LEVEL: u8 = 30;

impl TilingScheme {
    /// Columns at level `z`, or `None` above [`MAX_LEVEL`].
    pub fn tiles_x(&self, z: u8) -> Option<u32> {
        if z > MAX_LEVEL {
            return None;
        }
        Some(match self {
            TilingScheme::Geographic => 2u32 << z,
            TilingScheme::WebMercator => 1u32 << z,
        })
    }

    /// Rows at level `z`, or `None` above [`MAX_LEVEL`].
    pub fn tiles_y(&self, z: u8) -> Option<u32> {
        (z <= MAX_LEVEL).then(|| 1u32 << z)
    }

    fn extent(&self, z: u8) -> (f64, f64) {
        let ny = 2f64.powi(z as i32);
        match self {
            TilingScheme::Geographic => (2.0 * ny, ny),
            TilingScheme::WebMercator => (ny, ny),
        }
    }

    pub fn tile_rectangle(&self, tile: TileCoord) -> Rectangle {
        let (nx, ny) = self.extent(tile.z);
        let west = (tile.x as f64 / nx) * 360.0 - 180.0;
        let east = ((tile.x as f64 + 1.0) / nx) * 360.0 - 180.0;
        match self {
            TilingScheme::Geographic => {
                let north = 90.0 - (tile.y as f64 / ny) * 180.0;
                let south = 90.0 - ((tile.y as f64 + 1.0) / ny) * 180.0;
                Rectangle::from_degrees(west, south, east, north)
            }
            TilingScheme::WebMercator => Rectangle::from_degrees(
                west,
                mercator_tile_y_to_lat(tile.y as f64 + 1.0, ny),
                east,
                mercator_tile_y_to_lat(tile.y as f64, ny),
            ),
        }
    }

    /// Tile containing `(lon, lat)` at level `z`, or `None` above
    /// [`MAX_LEVEL`].
    pub fn position_to_tile(&self, z: u8, lon: f64, lat: f64) -> Option<TileCoord> {
        let nx = self.tiles_x(z)?;
        let ny = self.tiles_y(z)?;
        let fx = ((lon + 180.0) / 360.0).clamp(0.0, 1.0);
        let fy = match self {
            TilingScheme::Geographic => ((90.0 - lat) / 180.0).clamp(0.0, 1.0),
            TilingScheme::WebMercator => {
                let lat = lat.clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT).to_radians();
                let merc = (PI / 4.0 + lat / 2.0).tan().ln();
                ((1.0 - merc / PI) / 2.0).clamp(0.0, 1.0)
            }
        };
        let x = ((fx * nx as f64) as u32).min(nx - 1);
        let y = ((fy * ny as f64) as u32).min(ny - 1);
        Some(TileCoord::new(z, x, y))
    }

    /// All tiles at level `z` overlapping `rect`, row-major from north-west.
    /// Empty above [`MAX_LEVEL`].
    pub fn tiles_in_rectangle(&self, z: u8, rect: &Rectangle) -> Vec<TileCoord> {
        let (Some(nw), Some(se)) = (
            self.position_to_tile(z, rect.west, rect.north),
            self.position_to_tile(z, rect.east, rect.south),
        ) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for y in nw.y..=se.y {
            for x in nw.x..=se.x {
                let tile = TileCoord::new(z, x, y);
                if self.tile_rectangle(tile).intersects(rect) {
                    out.push(tile);
                }
            }
        }
        out
    }
}

fn mercator_tile_y_to_lat(y: f64, ny: f64) -> f64 {
    let n = PI - 2.0 * PI * y / ny;
    n.sinh().atan().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::{MAX_LEVEL, Rectangle, TileCoord, TilingScheme, WEB_MERCATOR_MAX_LAT};

    #[test]
    fn geographic_root_tiles_split_hemispheres() {
        let scheme = TilingScheme::Geographic;
        assert_eq!(scheme.tiles_x(0), Some(2));
        let west = scheme.tile_rectangle(TileCoord::new(0, 0, 0));
        assert_eq!(west, Rectangle::from_degrees(-180.0, -90.0, 0.0, 90.0));
    }

    #[test]
    fn web_mercator_root_tile_spans_world() {
        let r = TilingScheme::WebMercator.tile_rectangle(TileCoord::new(0, 0, 0));
        assert!((r.north - WEB_MERCATOR_MAX_LAT).abs() < 1e-9);
        assert!((r.south + WEB_MERCATOR_MAX_LAT).abs() < 1e-9);
    }

    #[test]
    fn position_round_trips_through_tile_rectangle() {
        for scheme in [TilingScheme::Geographic, TilingScheme::WebMercator] {
            let tile = scheme.position_to_tile(7, 126.43916, 37.4625).expect("tile");
            let r = scheme.tile_rectangle(tile);
            assert!(r.contains(126.43916, 37.4625), "{scheme:?} {tile:?} {r:?}");
        }
    }

    #[test]
    fn lists_tiles_covering_korean_waters() {
        let rect = Rectangle::from_degrees(120.0, 30.0, 138.0, 45.0);
        let tiles = TilingScheme::WebMercator.tiles_in_rectangle(5, &rect);
        assert!(!tiles.is_empty());
        for t in &tiles {
            assert!(TilingScheme::WebMercator.tile_rectangle(*t).intersects(&rect));
        }
    }

    #[test]
    fn levels_past_the_limit_are_rejected() {
        for scheme in [TilingScheme::Geographic, TilingScheme::WebMercator] {
            assert!(scheme.tiles_x(MAX_LEVEL).is_some());
            assert_eq!(scheme.tiles_x(MAX_LEVEL + 1), None);
            assert_eq!(scheme.tiles_y(u8::MAX), None);
            assert_eq!(scheme.position_to_tile(MAX_LEVEL + 1, 126.0, 37.0), None);
            assert!(scheme.tiles_in_rectangle(40, &Rectangle::MAX).is_empty());
        }
        assert_eq!(TilingScheme::Geographic.tiles_x(MAX_LEVEL), Some(1u32 << 31));
        let deep = TilingScheme::Geographic
            .position_to_tile(MAX_LEVEL, 180.0, -90.0)
            .expect("tile");
        assert_eq!(deep.x, (1u32 << 31) - 1);
        assert_eq!(deep.y, (1u32 << 30) - 1);
    }
}
