//! Per-frame draw list for the page's globe renderer: where the camera is,
//! which tiles each imagery layer needs, and every marker and current trail
//! with its colours. The page diffs entities by id.

use std::f64::consts::PI;

use foundation::geo::LonLat;
use foundation::math::{Ecef, Vec2, Vec3, WGS84_A, ecef_to_geodetic};
use layers::streamline::trail_alpha;
use scene::camera::Camera;
use scene::imagery::ImageryLayer;
use scene::tiling::{MAX_LEVEL, Rectangle};
use scene::viewer::Scene;
use serde::Serialize;

/// Tile edge the level choice assumes.
pub const TILE_SIZE_PX: f64 = 256.0;
/// A layer drops to coarser levels until its request list fits.
pub const MAX_TILES_PER_LAYER: usize = 64;
/// Pick samples per viewport axis when estimating the visible area.
const VIEW_SAMPLES: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraView {
    pub lon: f64,
    pub lat: f64,
    pub height_m: f64,
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub up: [f64; 3],
    pub fov_y_deg: f64,
}

impl CameraView {
    pub fn of(camera: &Camera) -> Self {
        let geo = camera.position_geodetic();
        Self {
            lon: geo.lon_deg(),
            lat: geo.lat_deg(),
            height_m: geo.alt_m,
            position: xyz(camera.position),
            direction: xyz(camera.direction),
            up: xyz(camera.up),
            fov_y_deg: camera.fov_y_rad.to_degrees(),
        }
    }
}

/// Tiles for one imagery layer, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerTiles {
    pub level: u8,
    pub alpha: f32,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
    pub pixel_size: f64,
    pub color: String,
    pub outline_color: String,
    pub outline_width: f64,
}

/// A current line with the opacity of each vertex at this frame's time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailView {
    pub id: String,
    pub positions: Vec<[f64; 2]>,
    pub width: f64,
    pub color: String,
    pub alphas: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameView {
    pub time_s: f64,
    pub camera: CameraView,
    pub layers: Vec<LayerTiles>,
    pub markers: Vec<MarkerView>,
    pub trails: Vec<TrailView>,
}

impl FrameView {
    pub fn of(scene: &Scene) -> Self {
        let view = view_rectangle(scene);
        let level = tile_level(&scene.camera);
        let layers = scene
            .imagery_layers
            .iter()
            .filter(|layer| layer.show)
            .map(|layer| layer_tiles(layer, level, view.as_ref()))
            .collect();

        let time_s = scene.frame.time.seconds();
        let mut markers = Vec::new();
        let mut trails = Vec::new();
        for entity in scene.entities.values() {
            if let (Some(point), Some(position)) = (entity.point, entity.position) {
                let at = lon_lat(position);
                markers.push(MarkerView {
                    id: entity.id.clone(),
                    lon: at.lon,
                    lat: at.lat,
                    pixel_size: point.pixel_size,
                    color: point.color.to_css(),
                    outline_color: point.outline_color.to_css(),
                    outline_width: point.outline_width,
                });
            }
            if let Some(line) = &entity.polyline {
                let last = line.positions.len().saturating_sub(1).max(1) as f64;
                trails.push(TrailView {
                    id: entity.id.clone(),
                    positions: line
                        .positions
                        .iter()
                        .map(|p| {
                            let at = lon_lat(*p);
                            [at.lon, at.lat]
                        })
                        .collect(),
                    width: line.width,
                    color: line.material.color.to_css(),
                    alphas: (0..line.positions.len())
                        .map(|i| trail_alpha(&line.material, i as f64 / last, time_s))
                        .collect(),
                });
            }
        }

        Self {
            time_s,
            camera: CameraView::of(&scene.camera),
            layers,
            markers,
            trails,
        }
    }
}

/// Level whose tiles are roughly [`TILE_SIZE_PX`] on screen at the centre
/// of the view.
pub fn tile_level(camera: &Camera) -> u8 {
    let metres_per_px =
        2.0 * camera.height().max(1.0) * (0.5 * camera.fov_y_rad).tan() / camera.viewport().y;
    let level = (2.0 * PI * WGS84_A / (TILE_SIZE_PX * metres_per_px)).log2().floor();
    if level.is_nan() || level < 0.0 {
        0
    } else {
        (level as u8).min(MAX_LEVEL)
    }
}

/// Bounding box of the globe points under a grid of window samples, or
/// `None` when the globe is off screen. A box wider than half the world
/// becomes full width.
pub fn view_rectangle(scene: &Scene) -> Option<Rectangle> {
    let size = scene.camera.viewport();
    let step = |extent: f64, i: usize| extent * i as f64 / (VIEW_SAMPLES - 1) as f64;
    let mut bounds: Option<Rectangle> = None;
    for row in 0..VIEW_SAMPLES {
        for col in 0..VIEW_SAMPLES {
            let pixel = Vec2::new(step(size.x, col), step(size.y, row));
            let Some(ray) = scene.camera.pick_ray(pixel) else {
                continue;
            };
            let Some(hit) = scene.globe.pick_geodetic(&ray) else {
                continue;
            };
            let (lon, lat) = (hit.lon_deg(), hit.lat_deg());
            bounds = Some(match bounds {
                None => Rectangle::from_degrees(lon, lat, lon, lat),
                Some(r) => Rectangle::from_degrees(
                    r.west.min(lon),
                    r.south.min(lat),
                    r.east.max(lon),
                    r.north.max(lat),
                ),
            });
        }
    }
    bounds.map(|r| {
        if r.east - r.west > 180.0 {
            Rectangle::from_degrees(-180.0, r.south, 180.0, r.north)
        } else {
            r
        }
    })
}

fn layer_tiles(layer: &ImageryLayer, level: u8, view: Option<&Rectangle>) -> LayerTiles {
    let provider = layer.provider();
    let min = provider.minimum_level();
    let max = provider.maximum_level().unwrap_or(MAX_LEVEL).max(min);
    let mut z = level.clamp(min, max);
    let urls = match view {
        None => Vec::new(),
        Some(view) => loop {
            let urls = layer.tile_requests(z, view);
            if urls.len() <= MAX_TILES_PER_LAYER || z == min {
                break urls;
            }
            z -= 1;
        },
    };
    LayerTiles {
        level: z,
        alpha: layer.alpha,
        urls,
    }
}

fn lon_lat(p: Vec3) -> LonLat {
    LonLat::from_geodetic(ecef_to_geodetic(Ecef::from(p)))
}

fn xyz(v: Vec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

#[cfg(test)]
mod tests {
    use super::{FrameView, MAX_TILES_PER_LAYER, tile_level, view_rectangle};
    use foundation::math::Geodetic;
    use scene::camera::Camera;
    use scene::viewer::Scene;

    fn scene_at(height_m: f64) -> Scene {
        let mut scene = Scene::new(800.0, 600.0);
        scene
            .camera
            .set_view(Geodetic::from_degrees(126.43916, 37.4625, height_m));
        scene
    }

    #[test]
    fn level_grows_as_the_camera_descends() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_view(Geodetic::from_degrees(126.0, 37.0, 2_000_000.0));
        assert_eq!(tile_level(&camera), 5);
        camera.set_height(200_000.0);
        assert_eq!(tile_level(&camera), 8);
        camera.set_height(1e9);
        assert_eq!(tile_level(&camera), 0);
    }

    #[test]
    fn view_rectangle_covers_the_centre() {
        let scene = scene_at(2_000_000.0);
        let r = view_rectangle(&scene).expect("globe in view");
        assert!(r.contains(126.43916, 37.4625));
        assert!(r.east - r.west < 60.0);
    }

    #[test]
    fn empty_scene_lists_only_the_camera() {
        let view = FrameView::of(&scene_at(2_000_000.0));
        assert!((view.camera.lon - 126.43916).abs() < 1e-9);
        assert!((view.camera.height_m - 2_000_000.0).abs() < 1e-3);
        assert!(view.layers.is_empty() && view.markers.is_empty() && view.trails.is_empty());
        assert!(MAX_TILES_PER_LAYER > 0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let view = FrameView::of(&scene_at(2_000_000.0));
        let json = serde_json::to_value(&view).expect("json");
        assert_eq!(json["timeS"], serde_json::json!(0.0));
        assert!(json["camera"]["heightM"].is_number());
        assert!(json["camera"]["fovYDeg"].is_number());
        assert_eq!(json["camera"]["position"].as_array().map(Vec::len), Some(3));
        assert!(json["layers"].as_array().is_some_and(Vec::is_empty));
    }
}
