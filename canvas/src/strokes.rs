//! Stroke data model: ordered collection of drawn polylines.
//!
//! Insertion order is draw order: later strokes paint over earlier ones.
//! Every bulk operation touches each point once, so per-frame cost grows
//! linearly with the total number of points in the session.  There is no
//! decimation.

use std::fmt;

use tracing::debug;

use crate::config::Rgba;
use crate::error::StrokeError;
use crate::geometry::Point;

/// Unique stroke identifier within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrokeId(pub u64);

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single drawn polyline.
#[derive(Debug, Clone)]
pub struct Stroke {
    pub id: StrokeId,
    /// Points in surface pixels, in drawing order.
    pub points: Vec<Point>,
    pub color: Rgba,
    /// Frame timestamp (ms) at which the stroke was started.
    pub created_at_ms: f64,
}

impl Stroke {
    /// Strokes with fewer than two points have no line to paint.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// Result of one eraser pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EraseSummary {
    pub points_removed: usize,
    pub strokes_removed: usize,
}

/// Ordered stroke collection.  Ids are unique.
#[derive(Debug, Default)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty stroke on top of the others.
    pub fn create_stroke(
        &mut self,
        id: StrokeId,
        color: Rgba,
        created_at_ms: f64,
    ) -> Result<(), StrokeError> {
        if self.get(id).is_some() {
            return Err(StrokeError::DuplicateId(id));
        }
        self.strokes.push(Stroke {
            id,
            points: Vec::new(),
            color,
            created_at_ms,
        });
        debug!("Stroke {} created ({} total)", id, self.strokes.len());
        Ok(())
    }

    /// Append a point to a stroke.  Returns the stroke's new point count.
    pub fn append_point(&mut self, id: StrokeId, point: Point) -> Result<usize, StrokeError> {
        // The growing stroke is almost always the newest one.
        let stroke = self
            .strokes
            .iter_mut()
            .rev()
            .find(|s| s.id == id)
            .ok_or(StrokeError::NotFound(id))?;
        stroke.points.push(point);
        Ok(stroke.points.len())
    }

    /// Offset every point of every stroke by `(dx, dy)`.
    pub fn translate_all(&mut self, dx: f32, dy: f32) {
        for point in self.strokes.iter_mut().flat_map(|s| s.points.iter_mut()) {
            point.x += dx;
            point.y += dy;
        }
    }

    /// Remove every point within `radius` of `center`, then drop any
    /// stroke left with one point or none.
    pub fn erase_near(&mut self, center: Point, radius: f32) -> EraseSummary {
        let mut summary = EraseSummary::default();
        let before = self.strokes.len();

        self.strokes.retain_mut(|stroke| {
            let count = stroke.points.len();
            stroke.points.retain(|p| p.distance(&center) > radius);
            summary.points_removed += count - stroke.points.len();
            stroke.points.len() > 1
        });

        summary.strokes_removed = before - self.strokes.len();
        if summary.points_removed > 0 || summary.strokes_removed > 0 {
            debug!(
                "Erased {} point(s), removed {} stroke(s) at ({:.1}, {:.1})",
                summary.points_removed, summary.strokes_removed, center.x, center.y,
            );
        }
        summary
    }

    /// Remove all strokes.  Returns how many there were.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.strokes.len();
        self.strokes.clear();
        removed
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id == id)
    }

    /// Strokes in draw order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total number of points across all strokes.
    pub fn total_points(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
fn store_with(strokes: &[&[(f32, f32)]]) -> StrokeStore {
    let mut store = StrokeStore::new();
    for (i, points) in strokes.iter().enumerate() {
        let id = StrokeId(i as u64 + 1);
        store
            .create_stroke(id, crate::config::palette::NEON_CYAN, 0.0)
            .unwrap();
        for &(x, y) in points.iter() {
            store.append_point(id, Point::new(x, y)).unwrap();
        }
    }
    store
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::palette;

    #[test]
    fn test_create_and_append() {
        let mut store = StrokeStore::new();
        store.create_stroke(StrokeId(7), palette::NEON_CYAN, 12.0).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get(StrokeId(7)).unwrap().points.is_empty());

        assert_eq!(store.append_point(StrokeId(7), Point::new(1.0, 2.0)), Ok(1));
        assert_eq!(store.append_point(StrokeId(7), Point::new(3.0, 4.0)), Ok(2));
        let stroke = store.get(StrokeId(7)).unwrap();
        assert_eq!(stroke.points[1], Point::new(3.0, 4.0));
        assert_eq!(stroke.created_at_ms, 12.0);
        assert!(stroke.is_drawable());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = StrokeStore::new();
        store.create_stroke(StrokeId(1), palette::NEON_CYAN, 0.0).unwrap();
        assert_eq!(
            store.create_stroke(StrokeId(1), palette::NEON_CYAN, 5.0),
            Err(StrokeError::DuplicateId(StrokeId(1))),
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_append_unknown_stroke() {
        let mut store = StrokeStore::new();
        assert_eq!(
            store.append_point(StrokeId(3), Point::new(0.0, 0.0)),
            Err(StrokeError::NotFound(StrokeId(3))),
        );
    }

    #[test]
    fn test_translate_all() {
        let mut store = store_with(&[&[(0.0, 0.0), (10.0, 10.0)], &[(5.0, 5.0)]]);
        store.translate_all(-3.0, 2.0);
        let s = store.strokes();
        assert_eq!(s[0].points, vec![Point::new(-3.0, 2.0), Point::new(7.0, 12.0)]);
        assert_eq!(s[1].points, vec![Point::new(2.0, 7.0)]);
    }

    #[test]
    fn test_erase_removes_points_in_radius() {
        let mut store = store_with(&[&[(0.0, 0.0), (10.0, 0.0), (100.0, 0.0), (200.0, 0.0)]]);
        let summary = store.erase_near(Point::new(0.0, 0.0), 25.0);
        assert_eq!(summary.points_removed, 2);
        assert_eq!(summary.strokes_removed, 0);
        assert_eq!(
            store.strokes()[0].points,
            vec![Point::new(100.0, 0.0), Point::new(200.0, 0.0)]
        );
    }

    #[test]
    fn test_erase_boundary_is_inclusive() {
        let mut store = store_with(&[&[(25.0, 0.0), (100.0, 0.0), (150.0, 0.0)]]);
        let summary = store.erase_near(Point::new(0.0, 0.0), 25.0);
        assert_eq!(summary.points_removed, 1);
    }

    #[test]
    fn test_erase_prunes_short_strokes() {
        let mut store = store_with(&[
            &[(0.0, 0.0), (10.0, 0.0), (100.0, 0.0)],
            &[(500.0, 500.0), (510.0, 500.0)],
        ]);
        let summary = store.erase_near(Point::new(5.0, 0.0), 25.0);
        assert_eq!(summary.points_removed, 2);
        assert_eq!(summary.strokes_removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.strokes()[0].id, StrokeId(2));
    }

    #[test]
    fn test_erase_never_grows_strokes() {
        let mut store = store_with(&[
            &[(0.0, 0.0), (30.0, 0.0), (60.0, 0.0), (90.0, 0.0)],
            &[(0.0, 50.0), (30.0, 50.0), (60.0, 50.0)],
        ]);
        let before: Vec<(StrokeId, usize)> =
            store.strokes().iter().map(|s| (s.id, s.points.len())).collect();

        store.erase_near(Point::new(30.0, 25.0), 30.0);

        for stroke in store.strokes() {
            let (_, count) = before.iter().find(|(id, _)| *id == stroke.id).unwrap();
            assert!(stroke.points.len() <= *count);
            assert!(stroke.points.len() > 1);
        }
    }

    #[test]
    fn test_clear_all() {
        let mut store = store_with(&[&[(0.0, 0.0), (1.0, 1.0)], &[(2.0, 2.0)]]);
        assert_eq!(store.total_points(), 3);
        assert_eq!(store.clear_all(), 2);
        assert!(store.is_empty());
        assert_eq!(store.total_points(), 0);
    }

    #[test]
    fn test_draw_order_is_insertion_order() {
        let store = store_with(&[&[(0.0, 0.0)], &[(1.0, 1.0)], &[(2.0, 2.0)]]);
        let ids: Vec<u64> = store.strokes().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
