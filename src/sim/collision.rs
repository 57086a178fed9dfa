//! Collision rules shared by every engine
//!
//! Pure geometric and grid predicates with no per-engine state. Grid engines
//! (Snake, Tetris) gate every board access through `grid_in_bounds` and
//! `cell_occupied`; the continuous engines (Brick Breaker, Asteroids) use the
//! rectangle and circle tests plus toroidal wrapping.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict interior test: points on the edge are outside
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x > self.min.x && point.x < max.x && point.y > self.min.y && point.y < max.y
    }
}

/// Check whether a point lies strictly inside a rectangle
#[inline]
pub fn rect_contains_point(rect: &Rect, point: Vec2) -> bool {
    rect.contains_point(point)
}

/// Two circles overlap iff the distance between centers is below the sum of radii
#[inline]
pub fn circle_overlap(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    c1.distance(c2) < r1 + r2
}

/// Check if a grid cell lies inside a `width` x `height` grid
#[inline]
pub fn grid_in_bounds(cell: IVec2, width: i32, height: i32) -> bool {
    cell.x >= 0 && cell.x < width && cell.y >= 0 && cell.y < height
}

/// Check if a cell of a row-major grid is filled
///
/// Cells outside the grid (including negative rows above a board) are never
/// occupied, so callers can probe freely without indexing out of range.
pub fn cell_occupied<T, R: AsRef<[Option<T>]>>(grid: &[R], cell: IVec2) -> bool {
    if cell.x < 0 || cell.y < 0 {
        return false;
    }
    grid.get(cell.y as usize)
        .and_then(|row| row.as_ref().get(cell.x as usize))
        .is_some_and(Option::is_some)
}

/// Wrap a position onto a torus of size `world`, independently per axis
pub fn wrap_toroidal(pos: Vec2, world: Vec2) -> Vec2 {
    Vec2::new(wrap_axis(pos.x, world.x), wrap_axis(pos.y, world.y))
}

#[inline]
fn wrap_axis(v: f32, extent: f32) -> f32 {
    let wrapped = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_contains_point_is_strict() {
        let rect = Rect::new(15.0, 30.0, 55.0, 20.0);

        assert!(rect_contains_point(&rect, Vec2::new(40.0, 40.0)));
        // Edges don't count
        assert!(!rect_contains_point(&rect, Vec2::new(15.0, 40.0)));
        assert!(!rect_contains_point(&rect, Vec2::new(70.0, 40.0)));
        assert!(!rect_contains_point(&rect, Vec2::new(40.0, 50.0)));
        assert!(!rect_contains_point(&rect, Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_circle_overlap() {
        let a = Vec2::new(0.0, 0.0);

        assert!(circle_overlap(a, 10.0, Vec2::new(15.0, 0.0), 10.0));
        // Exactly touching is not an overlap
        assert!(!circle_overlap(a, 10.0, Vec2::new(20.0, 0.0), 10.0));
        assert!(!circle_overlap(a, 3.0, Vec2::new(30.0, 40.0), 40.0));
    }

    #[test]
    fn test_grid_in_bounds() {
        assert!(grid_in_bounds(IVec2::new(0, 0), 20, 20));
        assert!(grid_in_bounds(IVec2::new(19, 19), 20, 20));
        assert!(!grid_in_bounds(IVec2::new(20, 5), 20, 20));
        assert!(!grid_in_bounds(IVec2::new(5, -1), 20, 20));
        assert!(!grid_in_bounds(IVec2::new(-1, 0), 10, 20));
    }

    #[test]
    fn test_cell_occupied_guards_bounds() {
        let mut grid = vec![[None::<u8>; 3]; 2];
        grid[1][2] = Some(7);

        assert!(cell_occupied(&grid, IVec2::new(2, 1)));
        assert!(!cell_occupied(&grid, IVec2::new(1, 1)));
        assert!(!cell_occupied(&grid, IVec2::new(2, -1)));
        assert!(!cell_occupied(&grid, IVec2::new(3, 1)));
        assert!(!cell_occupied(&grid, IVec2::new(0, 5)));
    }

    #[test]
    fn test_wrap_toroidal() {
        let world = Vec2::new(600.0, 400.0);

        let p = wrap_toroidal(Vec2::new(601.0, -1.0), world);
        assert!((p.x - 1.0).abs() < 1e-3);
        assert!((p.y - 399.0).abs() < 1e-3);

        let p = wrap_toroidal(Vec2::new(300.0, 200.0), world);
        assert_eq!(p, Vec2::new(300.0, 200.0));
    }

    proptest! {
        #[test]
        fn wrap_stays_in_world(x in -5000.0f32..5000.0, y in -5000.0f32..5000.0) {
            let world = Vec2::new(600.0, 400.0);
            let p = wrap_toroidal(Vec2::new(x, y), world);
            prop_assert!(p.x >= 0.0 && p.x < world.x);
            prop_assert!(p.y >= 0.0 && p.y < world.y);
        }

        #[test]
        fn wrap_is_invariant_under_whole_turns(x in 0.0f32..600.0, turns in -4i32..4) {
            let world = Vec2::new(600.0, 400.0);
            let shifted = Vec2::new(x + turns as f32 * world.x, 10.0);
            let p = wrap_toroidal(shifted, world);
            let d = (p.x - x).abs();
            // Same point on the torus (allowing wrap at the seam)
            prop_assert!(d < 1e-2 || (world.x - d) < 1e-2);
        }
    }
}
