use std::collections::BTreeMap;

use foundation::geo::LonLat;
use foundation::math::{Vec3, geodetic_to_ecef};

use crate::color::Color;
use crate::error::SceneError;

/// Screen-space point marker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointGraphics {
    pub pixel_size: f64,
    pub color: Color,
    pub outline_color: Color,
    pub outline_width: f64,
}

/// Animated trail along a polyline: `alpha(s, t)` is evaluated by the
/// renderer from these parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrailMaterial {
    pub color: Color,
    pub trail_length: f64,
    pub period_s: f64,
    pub speed: f64,
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineGraphics {
    pub positions: Vec<Vec3>,
    pub width: f64,
    pub material: TrailMaterial,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub name: Option<String>,
    pub position: Option<Vec3>,
    pub point: Option<PointGraphics>,
    pub polyline: Option<PolylineGraphics>,
}

impl Entity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            position: None,
            point: None,
            polyline: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Position on the ellipsoid surface.
    pub fn at_lon_lat(mut self, position: LonLat) -> Self {
        self.position = Some(geodetic_to_ecef(position.to_geodetic(0.0)).as_vec3());
        self
    }

    pub fn with_point(mut self, point: PointGraphics) -> Self {
        self.point = Some(point);
        self
    }

    pub fn with_polyline(mut self, polyline: PolylineGraphics) -> Self {
        self.polyline = Some(polyline);
        self
    }
}

/// Entities keyed by id, iterated in insertion order.
#[derive(Debug, Default)]
pub struct EntityCollection {
    next_order: u64,
    order: BTreeMap<u64, String>,
    by_id: BTreeMap<String, (u64, Entity)>,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) -> Result<(), SceneError> {
        if self.by_id.contains_key(&entity.id) {
            return Err(SceneError::DuplicateEntityId(entity.id));
        }
        let order = self.next_order;
        self.next_order += 1;
        self.order.insert(order, entity.id.clone());
        self.by_id.insert(entity.id.clone(), (order, entity));
        Ok(())
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Entity> {
        self.by_id.get(id).map(|(_, e)| e)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns `true` if an entity was removed.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        match self.by_id.remove(id) {
            Some((order, _)) => {
                self.order.remove(&order);
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.values().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Entity> {
        self.order
            .values()
            .filter_map(|id| self.by_id.get(id).map(|(_, e)| e))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.by_id.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Entity, EntityCollection};
    use crate::error::SceneError;

    #[test]
    fn iterates_in_insertion_order() {
        let mut entities = EntityCollection::new();
        entities.add(Entity::new("b")).expect("add b");
        entities.add(Entity::new("a")).expect("add a");
        entities.add(Entity::new("c")).expect("add c");
        assert_eq!(entities.ids().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut entities = EntityCollection::new();
        entities.add(Entity::new("overlay_1")).expect("first");
        assert_eq!(
            entities.add(Entity::new("overlay_1")),
            Err(SceneError::DuplicateEntityId("overlay_1".to_string()))
        );
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn remove_by_id_reports_presence() {
        let mut entities = EntityCollection::new();
        entities.add(Entity::new("x")).expect("add");
        assert!(entities.remove_by_id("x"));
        assert!(!entities.remove_by_id("x"));
        assert!(entities.is_empty());
        entities.add(Entity::new("x")).expect("re-add after removal");
    }
}
