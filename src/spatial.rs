//! Proximity queries used while bonding nodes by distance.
//!
//! Queries only run during topology construction; stepping never touches them.

use crate::float::Float;
use crate::vec::{Vec, Vec3};
use alloc::collections::BTreeMap;
use alloc::vec::Vec as AllocVec;

/// Finds indexed points near a location.
pub trait ProximityQuery<F: Float> {
    /// Push the index of every point within `radius` of `center` into `out`,
    /// in ascending index order. The point at `center` itself is included
    /// when it is part of the set; callers skip it.
    fn within(&self, center: Vec3<F>, radius: F, out: &mut AllocVec<usize>);
}

/// Linear scan over all points. Reference implementation for small sets.
pub struct BruteForce<'a, F: Float> {
    points: &'a [Vec3<F>],
}

impl<'a, F: Float> BruteForce<'a, F> {
    pub fn new(points: &'a [Vec3<F>]) -> Self {
        BruteForce { points }
    }
}

impl<F: Float> ProximityQuery<F> for BruteForce<'_, F> {
    fn within(&self, center: Vec3<F>, radius: F, out: &mut AllocVec<usize>) {
        let radius_sq = radius * radius;
        for (index, point) in self.points.iter().enumerate() {
            if point.distance_sq(center) <= radius_sq {
                out.push(index);
            }
        }
    }
}

type Cell = (i64, i64, i64);

/// Uniform hash grid over a fixed point set.
///
/// Cells are keyed in a `BTreeMap`, so bucket iteration order (and thus the
/// result order before sorting) is deterministic.
pub struct UniformGrid<F: Float> {
    points: AllocVec<Vec3<F>>,
    cell_size: F,
    cells: BTreeMap<Cell, AllocVec<usize>>,
}

impl<F: Float> UniformGrid<F> {
    /// Bucket `points` into cubes of edge `cell_size`. Non-positive sizes
    /// fall back to one unit.
    pub fn new(points: &[Vec3<F>], cell_size: F) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > F::zero() {
            cell_size
        } else {
            F::one()
        };
        let mut grid = UniformGrid {
            points: points.to_vec(),
            cell_size,
            cells: BTreeMap::new(),
        };
        for (index, &point) in points.iter().enumerate() {
            let cell = grid.cell_of(point);
            grid.cells.entry(cell).or_default().push(index);
        }
        grid
    }

    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn cell_size(&self) -> F { self.cell_size }

    fn coord(&self, v: F) -> i64 {
        (v / self.cell_size).floor().to_i64()
    }

    fn cell_of(&self, p: Vec3<F>) -> Cell {
        (self.coord(p.x), self.coord(p.y), self.coord(p.z))
    }
}

impl<F: Float> ProximityQuery<F> for UniformGrid<F> {
    fn within(&self, center: Vec3<F>, radius: F, out: &mut AllocVec<usize>) {
        let start = out.len();
        let radius_sq = radius * radius;
        let offset = Vec3::new(radius, radius, radius);
        let lo = self.cell_of(center - offset);
        let hi = self.cell_of(center + offset);
        for cx in lo.0..=hi.0 {
            for cy in lo.1..=hi.1 {
                for cz in lo.2..=hi.2 {
                    let Some(bucket) = self.cells.get(&(cx, cy, cz)) else {
                        continue;
                    };
                    for &index in bucket {
                        if self.points[index].distance_sq(center) <= radius_sq {
                            out.push(index);
                        }
                    }
                }
            }
        }
        out[start..].sort_unstable();
    }
}
