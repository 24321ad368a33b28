use crate::tiling::{MAX_LEVEL, Rectangle, TileCoord, TilingScheme};

/// Source of raster tiles for an [`ImageryLayer`].
pub trait ImageryProvider: std::fmt::Debug {
    /// Request URL for one tile.
    fn tile_url(&self, tile: TileCoord) -> String;

    fn tiling_scheme(&self) -> TilingScheme {
        TilingScheme::Geographic
    }

    fn rectangle(&self) -> Rectangle {
        Rectangle::MAX
    }

    fn minimum_level(&self) -> u8 {
        0
    }

    fn maximum_level(&self) -> Option<u8> {
        None
    }
}

/// Handle to an attached layer. Never reused within one collection, so it
/// doubles as the layer's object identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageryLayerId(u64);

#[derive(Debug)]
pub struct ImageryLayer {
    id: ImageryLayerId,
    provider: Box<dyn ImageryProvider>,
    pub alpha: f32,
    pub show: bool,
}

impl ImageryLayer {
    pub fn id(&self) -> ImageryLayerId {
        self.id
    }

    pub fn provider(&self) -> &dyn ImageryProvider {
        self.provider.as_ref()
    }

    /// Tile requests needed to cover `view` at level `z`, honoring the
    /// provider's level range and rectangle. Nothing past [`MAX_LEVEL`].
    pub fn tile_requests(&self, z: u8, view: &Rectangle) -> Vec<String> {
        let p = self.provider.as_ref();
        if !self.show
            || z > MAX_LEVEL
            || z < p.minimum_level()
            || p.maximum_level().is_some_and(|max| z > max)
        {
            return Vec::new();
        }
        let bounds = p.rectangle();
        if !bounds.intersects(view) {
            return Vec::new();
        }
        let clipped = Rectangle::from_degrees(
            view.west.max(bounds.west),
            view.south.max(bounds.south),
            view.east.min(bounds.east),
            view.north.min(bounds.north),
        );
        p.tiling_scheme()
            .tiles_in_rectangle(z, &clipped)
            .into_iter()
            .map(|t| p.tile_url(t))
            .collect()
    }
}

/// Ordered stack of imagery layers; later layers draw on top.
#[derive(Debug, Default)]
pub struct ImageryLayerCollection {
    next_id: u64,
    layers: Vec<ImageryLayer>,
}

impl ImageryLayerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_imagery_provider(&mut self, provider: Box<dyn ImageryProvider>) -> ImageryLayerId {
        let id = ImageryLayerId(self.next_id);
        self.next_id += 1;
        self.layers.push(ImageryLayer {
            id,
            provider,
            alpha: 1.0,
            show: true,
        });
        id
    }

    /// Returns `true` if the layer was attached.
    pub fn remove(&mut self, id: ImageryLayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|l| l.id != id);
        self.layers.len() != before
    }

    pub fn contains(&self, id: ImageryLayerId) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    pub fn get(&self, id: ImageryLayerId) -> Option<&ImageryLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: ImageryLayerId) -> Option<&mut ImageryLayer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageryLayer> {
        self.layers.iter()
    }

    pub fn ids(&self) -> Vec<ImageryLayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn remove_all(&mut self) {
        self.layers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageryLayerCollection, ImageryProvider};
    use crate::tiling::{Rectangle, TileCoord};

    #[derive(Debug)]
    struct Fixed(&'static str);

    impl ImageryProvider for Fixed {
        fn tile_url(&self, tile: TileCoord) -> String {
            format!("{}/{}/{}/{}", self.0, tile.z, tile.x, tile.y)
        }

        fn rectangle(&self) -> Rectangle {
            Rectangle::from_degrees(120.0, 30.0, 138.0, 45.0)
        }

        fn minimum_level(&self) -> u8 {
            2
        }
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut layers = ImageryLayerCollection::new();
        let a = layers.add_imagery_provider(Box::new(Fixed("a")));
        let b = layers.add_imagery_provider(Box::new(Fixed("b")));
        assert_ne!(a, b);
        assert_eq!(layers.ids(), vec![a, b]);

        assert!(layers.remove(a));
        assert!(!layers.remove(a));
        let c = layers.add_imagery_provider(Box::new(Fixed("c")));
        assert_ne!(c, a);
        assert_eq!(layers.ids(), vec![b, c]);
    }

    #[test]
    fn tile_requests_respect_level_and_rectangle() {
        let mut layers = ImageryLayerCollection::new();
        let id = layers.add_imagery_provider(Box::new(Fixed("t")));
        let layer = layers.get(id).expect("layer");

        assert!(layer.tile_requests(1, &Rectangle::MAX).is_empty());
        let outside = Rectangle::from_degrees(-10.0, -10.0, 10.0, 10.0);
        assert!(layer.tile_requests(4, &outside).is_empty());

        assert!(layer.tile_requests(31, &Rectangle::MAX).is_empty());
        assert!(layer.tile_requests(u8::MAX, &Rectangle::MAX).is_empty());

        let urls = layer.tile_requests(4, &Rectangle::MAX);
        assert!(!urls.is_empty());
        assert!(urls.iter().all(|u| u.starts_with("t/4/")));
    }
}
