use scene::imagery::ImageryProvider;
use scene::tiling::{Rectangle, TileCoord, TilingScheme};

/// Replacement for a `{name}` placeholder beyond the built-in `{z}`, `{x}`, `{y}`.
pub type CustomTag = fn(TileCoord) -> String;

/// Imagery from a `{z}/{x}/{y}` style URL template.
#[derive(Debug, Clone)]
pub struct UrlTemplateImageryProvider {
    pub template: String,
    pub custom_tags: Vec<(&'static str, CustomTag)>,
    pub tiling_scheme: TilingScheme,
    pub rectangle: Rectangle,
    pub minimum_level: u8,
    pub maximum_level: Option<u8>,
    pub credit: Option<String>,
}

impl UrlTemplateImageryProvider {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            custom_tags: Vec::new(),
            tiling_scheme: TilingScheme::WebMercator,
            rectangle: Rectangle::MAX,
            minimum_level: 0,
            maximum_level: None,
            credit: None,
        }
    }

    pub fn with_custom_tag(mut self, name: &'static str, tag: CustomTag) -> Self {
        self.custom_tags.push((name, tag));
        self
    }
}

impl ImageryProvider for UrlTemplateImageryProvider {
    fn tile_url(&self, tile: TileCoord) -> String {
        let mut url = self.template.clone();
        for (name, tag) in &self.custom_tags {
            url = url.replace(&format!("{{{name}}}"), &tag(tile));
        }
        url.replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    fn tiling_scheme(&self) -> TilingScheme {
        self.tiling_scheme
    }

    fn rectangle(&self) -> Rectangle {
        self.rectangle
    }

    fn minimum_level(&self) -> u8 {
        self.minimum_level
    }

    fn maximum_level(&self) -> Option<u8> {
        self.maximum_level
    }
}

pub const BASE_MAP_TEMPLATE: &str = "/geo-proxy/tile/DL_USR3857/{customZ}/{x}/{y}";
pub const BASE_MAP_MIN_LEVEL: u8 = 5;
pub const BASE_MAP_MAX_LEVEL: u8 = 16;
pub const BASE_MAP_CREDIT: &str = "khoa";
/// Coverage of the coastal base map around the Korean peninsula.
pub const BASE_MAP_RECTANGLE: Rectangle = Rectangle::from_degrees(120.0, 30.0, 138.0, 45.0);

/// Level directory, e.g. `L07`.
fn padded_level(tile: TileCoord) -> String {
    format!("L{:02}", tile.z)
}

/// The national coastal base map, served through the same proxy as WMS.
pub fn base_map_provider() -> UrlTemplateImageryProvider {
    UrlTemplateImageryProvider {
        tiling_scheme: TilingScheme::WebMercator,
        rectangle: BASE_MAP_RECTANGLE,
        minimum_level: BASE_MAP_MIN_LEVEL,
        maximum_level: Some(BASE_MAP_MAX_LEVEL),
        credit: Some(BASE_MAP_CREDIT.to_owned()),
        ..UrlTemplateImageryProvider::new(BASE_MAP_TEMPLATE)
    }
    .with_custom_tag("customZ", padded_level)
}
