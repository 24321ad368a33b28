//! WMS descriptors for the catch-prediction map server.
//!
//! A descriptor is pure data: the proxy URL, the server layer name and the
//! GetMap parameters. Two descriptors with the same [`LayerIdentity`] render
//! the same tiles, which is what layer reconciliation keys on.

use scene::imagery::ImageryProvider;
use scene::tiling::{Rectangle, TileCoord, TilingScheme};
use url::form_urlencoded;

use crate::layer::LayerKind;

/// Same-origin proxy in front of the map server.
pub const WMS_PROXY_URL: &str = "/geo-proxy";
pub const WMS_WORKSPACE: &str = "mdtwin";
pub const TIME_FILTER_KEY: &str = "ctsh_rprt_ymd";
pub const SPECIES_FILTER_KEY: &str = "species";

pub const TILE_SIZE_PX: u32 = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmsParameters {
    pub service: String,
    pub version: String,
    pub request: String,
    pub styles: String,
    pub format: String,
    pub transparent: bool,
    pub viewparams: String,
}

impl Default for WmsParameters {
    fn default() -> Self {
        Self {
            service: "WMS".to_owned(),
            version: "1.1.1".to_owned(),
            request: "GetMap".to_owned(),
            styles: String::new(),
            format: "image/png".to_owned(),
            transparent: true,
            viewparams: String::new(),
        }
    }
}

/// Reconciliation key: `(layers, viewparams)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerIdentity {
    pub layers: String,
    pub viewparams: String,
}

impl std::fmt::Display for LayerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.viewparams.is_empty() {
            f.write_str(&self.layers)
        } else {
            write!(f, "{}[{}]", self.layers, self.viewparams)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageryLayerDescriptor {
    pub url: String,
    pub layers: String,
    pub parameters: WmsParameters,
}

impl ImageryLayerDescriptor {
    pub fn identity(&self) -> LayerIdentity {
        LayerIdentity {
            layers: self.layers.clone(),
            viewparams: self.parameters.viewparams.clone(),
        }
    }

    /// GetMap query pairs in request order; `viewparams` only when set.
    pub fn query_pairs(&self, bbox: &Rectangle, width: u32, height: u32) -> Vec<(&'static str, String)> {
        let p = &self.parameters;
        let mut pairs = vec![
            ("service", p.service.clone()),
            ("version", p.version.clone()),
            ("request", p.request.clone()),
            ("layers", self.layers.clone()),
            ("styles", p.styles.clone()),
            ("format", p.format.clone()),
            ("transparent", p.transparent.to_string()),
            ("srs", "EPSG:4326".to_owned()),
            ("bbox", format!("{},{},{},{}", bbox.west, bbox.south, bbox.east, bbox.north)),
            ("width", width.to_string()),
            ("height", height.to_string()),
        ];
        if !p.viewparams.is_empty() {
            pairs.push(("viewparams", p.viewparams.clone()));
        }
        pairs
    }

    /// GetMap request for an EPSG:4326 bounding box, form-encoded.
    pub fn get_map_url(&self, bbox: &Rectangle, width: u32, height: u32) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs(bbox, width, height))
            .finish();
        format!("{}?{}", self.url, query)
    }

    pub fn into_provider(self) -> WmsImageryProvider {
        WmsImageryProvider { descriptor: self }
    }
}

/// `ctsh_rprt_ymd:<date>` and `species:<name>`, joined by `;`. Absent or
/// empty filters are left out.
pub fn view_params(time: Option<&str>, species: Option<&str>) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(time) = time.filter(|t| !t.is_empty()) {
        parts.push(format!("{TIME_FILTER_KEY}:{time}"));
    }
    if let Some(species) = species.filter(|s| !s.is_empty()) {
        parts.push(format!("{SPECIES_FILTER_KEY}:{species}"));
    }
    parts.join(";")
}

/// Descriptor for `kind` filtered by date and species. The grid ignores both.
pub fn make_layer(kind: LayerKind, time: Option<&str>, species: Option<&str>) -> ImageryLayerDescriptor {
    let viewparams = if kind.is_filtered() {
        view_params(time, species)
    } else {
        String::new()
    };
    ImageryLayerDescriptor {
        url: WMS_PROXY_URL.to_owned(),
        layers: format!("{WMS_WORKSPACE}:{}", kind.server_name()),
        parameters: WmsParameters {
            viewparams,
            ..WmsParameters::default()
        },
    }
}

/// Static grid drawn under every other layer.
pub fn base_grid_layer() -> ImageryLayerDescriptor {
    make_layer(LayerKind::Grid, None, None)
}

/// Tiled WMS source in the geographic tiling scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmsImageryProvider {
    descriptor: ImageryLayerDescriptor,
}

impl WmsImageryProvider {
    pub fn descriptor(&self) -> &ImageryLayerDescriptor {
        &self.descriptor
    }
}

impl ImageryProvider for WmsImageryProvider {
    fn tile_url(&self, tile: TileCoord) -> String {
        let bbox = self.tiling_scheme().tile_rectangle(tile);
        self.descriptor.get_map_url(&bbox, TILE_SIZE_PX, TILE_SIZE_PX)
    }

    fn tiling_scheme(&self) -> TilingScheme {
        TilingScheme::Geographic
    }
}

/// Half-width in degrees of the box a point query is centred in.
pub const FEATURE_INFO_HALF_SPAN_DEG: f64 = 0.05;
pub const FEATURE_INFO_SIZE_PX: u32 = 101;
pub const FEATURE_INFO_COUNT: u32 = 50;

/// GetFeatureInfo query for the predicted catch under a point.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureInfoRequest {
    pub lon: f64,
    pub lat: f64,
    pub time: String,
}

impl FeatureInfoRequest {
    pub fn new(lon: f64, lat: f64, time: impl Into<String>) -> Self {
        Self {
            lon,
            lat,
            time: time.into(),
        }
    }

    pub fn bbox(&self) -> Rectangle {
        let h = FEATURE_INFO_HALF_SPAN_DEG;
        Rectangle::from_degrees(self.lon - h, self.lat - h, self.lon + h, self.lat + h)
    }

    /// Query pairs in request order. The queried pixel is the box centre.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let layer = make_layer(LayerKind::Fish, None, None).layers;
        let bbox = self.bbox();
        let centre = FEATURE_INFO_SIZE_PX / 2;
        vec![
            ("SERVICE", "WMS".to_owned()),
            ("VERSION", "1.1.1".to_owned()),
            ("REQUEST", "GetFeatureInfo".to_owned()),
            ("FORMAT", "image/png".to_owned()),
            ("TRANSPARENT", "true".to_owned()),
            ("QUERY_LAYERS", layer.clone()),
            ("LAYERS", layer),
            ("exceptions", "application/vnd.ogc.se_inimage".to_owned()),
            ("INFO_FORMAT", "application/json".to_owned()),
            ("FEATURE_COUNT", FEATURE_INFO_COUNT.to_string()),
            ("X", centre.to_string()),
            ("Y", centre.to_string()),
            ("SRS", "EPSG:4326".to_owned()),
            ("WIDTH", FEATURE_INFO_SIZE_PX.to_string()),
            ("HEIGHT", FEATURE_INFO_SIZE_PX.to_string()),
            ("BBOX", format!("{},{},{},{}", bbox.west, bbox.south, bbox.east, bbox.north)),
            ("viewparams", view_params(Some(&self.time), None)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureInfoRequest, base_grid_layer, make_layer, view_params};
    use crate::layer::LayerKind;
    use pretty_assertions::assert_eq;
    use scene::imagery::ImageryProvider;
    use scene::tiling::{Rectangle, TileCoord};

    #[test]
    fn viewparams_compose_time_and_species() {
        let sst = make_layer(LayerKind::Sst, Some("2024-11-28"), Some("squid"));
        assert_eq!(sst.parameters.viewparams, "ctsh_rprt_ymd:2024-11-28;species:squid");
        assert_eq!(sst.layers, "mdtwin:catch_predict_sst");

        let grid = make_layer(LayerKind::Grid, Some("2024-11-28"), Some("squid"));
        assert_eq!(grid.parameters.viewparams, "");
        assert_eq!(grid.layers, "mdtwin:grid2");

        let fish = make_layer(LayerKind::Fish, None, Some("squid"));
        assert_eq!(fish.parameters.viewparams, "species:squid");
        assert_eq!(fish.layers, "mdtwin:catch_predict_view");

        assert_eq!(view_params(Some("2024-11-28"), None), "ctsh_rprt_ymd:2024-11-28");
        assert_eq!(view_params(Some(""), Some("")), "");
    }

    #[test]
    fn base_parameters() {
        let grid = base_grid_layer();
        assert_eq!(grid.url, "/geo-proxy");
        assert_eq!(grid.parameters.service, "WMS");
        assert_eq!(grid.parameters.version, "1.1.1");
        assert_eq!(grid.parameters.request, "GetMap");
        assert_eq!(grid.parameters.styles, "");
        assert_eq!(grid.parameters.format, "image/png");
        assert!(grid.parameters.transparent);
    }

    #[test]
    fn identity_ignores_url_but_not_filters() {
        let a = make_layer(LayerKind::Fish, Some("2024-11-28"), Some("squid"));
        let mut b = a.clone();
        b.url = "/elsewhere".to_owned();
        assert_eq!(a.identity(), b.identity());

        let c = make_layer(LayerKind::Fish, Some("2024-11-29"), Some("squid"));
        assert!(a.identity() != c.identity());
    }

    #[test]
    fn tile_url_carries_bbox_and_filters() {
        let provider = make_layer(LayerKind::Fish, Some("2024-11-28"), None).into_provider();
        let url = provider.tile_url(TileCoord::new(0, 1, 0));
        assert_eq!(
            url,
            "/geo-proxy?service=WMS&version=1.1.1&request=GetMap&layers=mdtwin%3Acatch_predict_view\
             &styles=&format=image%2Fpng&transparent=true&srs=EPSG%3A4326&bbox=0%2C-90%2C180%2C90\
             &width=256&height=256&viewparams=ctsh_rprt_ymd%3A2024-11-28"
        );

        let grid = base_grid_layer().get_map_url(&Rectangle::from_degrees(120.0, 30.0, 138.0, 45.0), 10, 10);
        assert!(!grid.contains("viewparams"));
    }

    #[test]
    fn filter_values_are_percent_encoded() {
        let layer = make_layer(LayerKind::Fish, Some("2024-11-28"), Some("살오징어 a&x=1"));
        let url = layer.get_map_url(&Rectangle::from_degrees(120.0, 30.0, 138.0, 45.0), 256, 256);
        assert!(url.ends_with(
            "&viewparams=ctsh_rprt_ymd%3A2024-11-28%3Bspecies%3A\
             %EC%82%B4%EC%98%A4%EC%A7%95%EC%96%B4+a%26x%3D1"
        ));
        assert!(!url.contains("&x="));
        assert!(!url.contains(' '));

        let pairs = layer.query_pairs(&Rectangle::from_degrees(120.0, 30.0, 138.0, 45.0), 256, 256);
        assert_eq!(
            pairs.last(),
            Some(&("viewparams", "ctsh_rprt_ymd:2024-11-28;species:살오징어 a&x=1".to_owned()))
        );
    }

    #[test]
    fn feature_info_targets_box_centre() {
        let request = FeatureInfoRequest::new(126.5, 37.0, "2024-11-28");
        let pairs = request.query_pairs();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
                .expect("key present")
        };
        assert_eq!(get("REQUEST"), "GetFeatureInfo");
        assert_eq!(get("QUERY_LAYERS"), "mdtwin:catch_predict_view");
        assert_eq!(get("INFO_FORMAT"), "application/json");
        assert_eq!(get("X"), "50");
        assert_eq!(get("Y"), "50");
        assert_eq!(get("WIDTH"), "101");
        assert_eq!(get("viewparams"), "ctsh_rprt_ymd:2024-11-28");

        let bbox = request.bbox();
        assert!((bbox.west - 126.45).abs() < 1e-9);
        assert!((bbox.north - 37.05).abs() < 1e-9);
    }
}
