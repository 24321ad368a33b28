//! Animated ocean-current arrows.
//!
//! Each current vector becomes a short curved polyline starting at the sample
//! point and bending to the left of the flow. A trail material sweeps along
//! it; its parameters are randomised per line so the field does not pulse in
//! lockstep.

use foundation::geo::LonLat;
use foundation::ids::SequentialIds;
use foundation::math::geodetic_to_ecef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene::color::Color;
use scene::entity::{Entity, EntityCollection, PolylineGraphics, TrailMaterial};
use scene::error::SceneError;
use serde::{Deserialize, Serialize};

/// Arrow length in degrees, independent of speed.
pub const ARROW_LENGTH_DEG: f64 = 0.5;
pub const CURVE_BEND: f64 = 0.3;
pub const CURVE_SEGMENTS: usize = 20;
/// Speed (m/s) at which the colour saturates.
pub const FULL_SPEED: f64 = 0.5;
pub const TRAIL_SPEED: f64 = 0.2;
pub const LINE_WIDTH: f64 = 2.0;

const IDS: SequentialIds = SequentialIds::new("current_");

/// One current sample: position in degrees and eastward/northward velocity.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentVector {
    pub x: f64,
    pub y: f64,
    pub u: f64,
    pub v: f64,
}

impl CurrentVector {
    pub fn magnitude(&self) -> f64 {
        self.u.hypot(self.v)
    }

    /// Arrow tip, or `None` for still water.
    pub fn end_point(&self) -> Option<LonLat> {
        let m = self.magnitude();
        if m == 0.0 || !m.is_finite() {
            return None;
        }
        Some(LonLat::new(
            self.x + self.u / m * ARROW_LENGTH_DEG,
            self.y + self.v / m * ARROW_LENGTH_DEG,
        ))
    }
}

/// Quadratic Bezier from `start` to `end` whose control point sits off the
/// midpoint along the left-hand perpendicular. Returns `segments + 1` points.
pub fn curved_points(start: LonLat, end: LonLat, segments: usize) -> Vec<LonLat> {
    let control = LonLat::new(
        (start.lon + end.lon) * 0.5 - (end.lat - start.lat) * CURVE_BEND,
        (start.lat + end.lat) * 0.5 + (end.lon - start.lon) * CURVE_BEND,
    );
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let a = (1.0 - t) * (1.0 - t);
            let b = 2.0 * (1.0 - t) * t;
            let c = t * t;
            LonLat::new(
                a * start.lon + b * control.lon + c * end.lon,
                a * start.lat + b * control.lat + c * end.lat,
            )
        })
        .collect()
}

/// Blue that lightens with speed.
pub fn current_color(magnitude: f64) -> Color {
    let normalized = (magnitude / FULL_SPEED).min(1.0) as f32;
    Color::from_hsl(0.6, 1.0, 0.5 + normalized * 0.3)
}

fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Opacity at arc-length fraction `s` in `[0, 1]` and host time `time_s`.
pub fn trail_alpha(material: &TrailMaterial, s: f64, time_s: f64) -> f64 {
    let t = 2.0 * material.speed * time_s.rem_euclid(material.period_s);
    let l = material.trail_length;
    smoothstep(s - l, s, t) * (1.0 - smoothstep(s, s + l, t))
}

/// Owns the polylines it adds to an [`EntityCollection`].
#[derive(Debug)]
pub struct CurrentAnimation {
    vectors: Vec<CurrentVector>,
    rng: StdRng,
    entity_ids: Vec<String>,
    running: bool,
}

impl CurrentAnimation {
    /// `seed` fixes the per-line trail parameters.
    pub fn new(vectors: Vec<CurrentVector>, seed: u64) -> Self {
        Self {
            vectors,
            rng: StdRng::seed_from_u64(seed),
            entity_ids: Vec::new(),
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn entity_ids(&self) -> &[String] {
        &self.entity_ids
    }

    pub fn set_vectors(&mut self, vectors: Vec<CurrentVector>) {
        self.vectors = vectors;
    }

    /// Adds one polyline per moving vector. No-op while running.
    pub fn start(&mut self, entities: &mut EntityCollection) -> Result<(), SceneError> {
        if self.running {
            return Ok(());
        }
        self.clear(entities);

        for vector in &self.vectors {
            let Some(end) = vector.end_point() else {
                continue;
            };
            let start = LonLat::new(vector.x, vector.y);
            let positions = curved_points(start, end, CURVE_SEGMENTS)
                .into_iter()
                .map(|p| geodetic_to_ecef(p.to_geodetic(0.0)).as_vec3())
                .collect();
            let material = TrailMaterial {
                color: current_color(vector.magnitude()),
                trail_length: self.rng.gen_range(0.3..0.5),
                period_s: self.rng.gen_range(2.0..4.0),
                speed: TRAIL_SPEED,
                offset: self.rng.gen_range(0.0..1.0),
            };

            let id = IDS.next(
                self.entity_ids
                    .iter()
                    .map(String::as_str)
                    .chain(entities.ids()),
            );
            entities.add(Entity::new(id.clone()).with_polyline(PolylineGraphics {
                positions,
                width: LINE_WIDTH,
                material,
            }))?;
            self.entity_ids.push(id);
        }

        tracing::debug!(lines = self.entity_ids.len(), "current animation started");
        self.running = true;
        Ok(())
    }

    /// Removes every polyline this animation added.
    pub fn clear(&mut self, entities: &mut EntityCollection) {
        for id in self.entity_ids.drain(..) {
            entities.remove_by_id(&id);
        }
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CURVE_SEGMENTS, CurrentAnimation, CurrentVector, current_color, curved_points, trail_alpha,
    };
    use foundation::geo::LonLat;
    use scene::color::Color;
    use scene::entity::{EntityCollection, TrailMaterial};

    fn sample() -> Vec<CurrentVector> {
        vec![
            CurrentVector { x: 126.0, y: 35.0, u: 0.3, v: 0.4 },
            CurrentVector { x: 127.0, y: 35.0, u: 0.0, v: 0.0 },
            CurrentVector { x: 128.0, y: 35.0, u: -1.0, v: 0.0 },
        ]
    }

    #[test]
    fn arrow_has_fixed_length() {
        let tip = sample()[0].end_point().expect("moving");
        assert!((tip.lon - 126.3).abs() < 1e-12);
        assert!((tip.lat - 35.4).abs() < 1e-12);
        assert!(sample()[1].end_point().is_none());
    }

    #[test]
    fn curve_bends_left_of_flow() {
        let start = LonLat::new(0.0, 0.0);
        let end = LonLat::new(1.0, 0.0);
        let points = curved_points(start, end, CURVE_SEGMENTS);
        assert_eq!(points.len(), CURVE_SEGMENTS + 1);
        assert_eq!(points[0], start);
        assert_eq!(points[CURVE_SEGMENTS], end);
        // Control point is (0.5, 0.3); the curve peaks at half of that.
        let mid = points[CURVE_SEGMENTS / 2];
        assert!((mid.lon - 0.5).abs() < 1e-12);
        assert!((mid.lat - 0.15).abs() < 1e-12);
    }

    #[test]
    fn colour_saturates_at_full_speed() {
        assert_eq!(current_color(1.0), current_color(0.5));
        assert_eq!(current_color(0.0), Color::from_hsl(0.6, 1.0, 0.5));
    }

    #[test]
    fn trail_peaks_at_head() {
        let material = TrailMaterial {
            color: Color::WHITE,
            trail_length: 0.4,
            period_s: 3.0,
            speed: 0.2,
            offset: 0.0,
        };
        // t' = 2 * 0.2 * 1.0 = 0.4
        assert!((trail_alpha(&material, 0.4, 1.0) - 1.0).abs() < 1e-12);
        assert!((trail_alpha(&material, 0.6, 1.0) - 0.5).abs() < 1e-12);
        assert_eq!(trail_alpha(&material, 0.0, 1.0), 0.0);
        assert_eq!(trail_alpha(&material, 0.95, 1.0), 0.0);
        // Wraps with the period.
        assert_eq!(trail_alpha(&material, 0.6, 4.0), trail_alpha(&material, 0.6, 1.0));
    }

    #[test]
    fn start_is_idempotent_and_clear_removes_lines() {
        let mut entities = EntityCollection::new();
        let mut animation = CurrentAnimation::new(sample(), 7);

        animation.start(&mut entities).expect("start");
        assert!(animation.is_running());
        assert_eq!(entities.len(), 2);
        animation.start(&mut entities).expect("second start");
        assert_eq!(entities.len(), 2);

        for entity in entities.values() {
            let line = entity.polyline.as_ref().expect("polyline");
            assert_eq!(line.positions.len(), CURVE_SEGMENTS + 1);
            assert!((0.3..0.5).contains(&line.material.trail_length));
            assert!((2.0..4.0).contains(&line.material.period_s));
            assert!((0.0..1.0).contains(&line.material.offset));
        }

        animation.clear(&mut entities);
        assert!(!animation.is_running());
        assert!(entities.is_empty());
    }

    #[test]
    fn same_seed_same_trails() {
        let mut a = EntityCollection::new();
        let mut b = EntityCollection::new();
        CurrentAnimation::new(sample(), 42).start(&mut a).expect("a");
        CurrentAnimation::new(sample(), 42).start(&mut b).expect("b");
        let materials = |c: &EntityCollection| {
            c.values()
                .map(|e| e.polyline.as_ref().map(|p| p.material))
                .collect::<Vec<_>>()
        };
        assert_eq!(materials(&a), materials(&b));
    }
}
