//! Rectangular and hexagonal membrane sheets.

use crate::config::JointConfig;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::joint::JointId;
use crate::node::NodeId;
use crate::softbody::SoftBody;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// In-plane node placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridLayout {
    /// Node `(i, j)` sits at `(i * spacing, 0, j * spacing)`.
    Square,
    /// Odd `j` rows are shifted by `-spacing / 2` along X.
    Hex,
}

/// Which neighbours get bonded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridWiring {
    /// Right (`j + 1`) and below (`i + 1`) neighbours.
    Axis,
    /// Axis bonds plus one diagonal per cell, alternating with the parity of `i`.
    Hex,
    /// Axis bonds plus both diagonals of every cell.
    Braced,
}

/// Where a joint's rest length comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RestLength {
    /// Separation at placement time; the sheet starts at equilibrium.
    Placement,
    /// `JointConfig::rest_length` for every bond.
    Config,
}

/// Configuration for a membrane sheet.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig<F: Float> {
    /// Node count along X (index `i`).
    pub width: usize,
    /// Node count along Z (index `j`).
    pub height: usize,
    pub spacing: F,
    /// Centre of the sheet; every node shares its Y.
    pub origin: Vec3<F>,
    pub layout: GridLayout,
    pub wiring: GridWiring,
    pub rest_length: RestLength,
    pub node_mass: F,
    pub joint: JointConfig<F>,
}

impl<F: Float> GridConfig<F> {
    pub fn new(width: usize, height: usize, spacing: F) -> Self {
        GridConfig {
            width,
            height,
            spacing,
            origin: Vec3::new(F::zero(), F::zero(), F::zero()),
            layout: GridLayout::Square,
            wiring: GridWiring::Hex,
            rest_length: RestLength::Placement,
            node_mass: F::one(),
            joint: JointConfig::new(),
        }
    }

    pub fn with_origin(mut self, origin: Vec3<F>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_wiring(mut self, wiring: GridWiring) -> Self {
        self.wiring = wiring;
        self
    }

    pub fn with_rest_length(mut self, rest_length: RestLength) -> Self {
        self.rest_length = rest_length;
        self
    }

    pub fn with_node_mass(mut self, mass: F) -> Self {
        self.node_mass = mass;
        self
    }

    pub fn with_joint(mut self, joint: JointConfig<F>) -> Self {
        self.joint = joint;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.width < 2 || self.height < 2 {
            return Err(PhysicsError::invalid("grid must be at least 2x2"));
        }
        if !self.spacing.is_finite() || self.spacing <= F::zero() {
            return Err(PhysicsError::invalid("grid spacing must be positive"));
        }
        self.joint.validate()
    }
}

/// Number of joints [`MembraneGrid::wire`] creates for a `width x height` sheet.
///
/// `Braced` gives `(X-1)(Y-1)*4 + (X-1) + (Y-1)`.
pub fn expected_joint_count(width: usize, height: usize, wiring: GridWiring) -> usize {
    if width == 0 || height == 0 {
        return 0;
    }
    let axis = width * (height - 1) + (width - 1) * height;
    let cells = (width - 1) * (height - 1);
    match wiring {
        GridWiring::Axis => axis,
        GridWiring::Hex => axis + cells,
        GridWiring::Braced => axis + 2 * cells,
    }
}

/// Unordered `(i, j)` neighbour pairs for a sheet, in wiring order.
///
/// Node `(i, j)` has flat index `i * height + j`.
pub fn grid_bonds(width: usize, height: usize, wiring: GridWiring) -> AllocVec<(usize, usize)> {
    let mut bonds = AllocVec::with_capacity(expected_joint_count(width, height, wiring));
    for i in 0..width {
        for j in 0..height {
            let index = i * height + j;
            if j + 1 < height {
                bonds.push((index, index + 1));
            }
            if i + 1 < width {
                bonds.push((index, index + height));
            }
            if i + 1 >= width {
                continue;
            }
            match wiring {
                GridWiring::Axis => {}
                GridWiring::Hex => {
                    if i % 2 == 0 {
                        if j + 1 < height {
                            bonds.push((index, index + height + 1));
                        }
                    } else if j > 0 {
                        bonds.push((index, index + height - 1));
                    }
                }
                GridWiring::Braced => {
                    if j + 1 < height {
                        bonds.push((index, index + height + 1));
                        bonds.push((index + 1, index + height));
                    }
                }
            }
        }
    }
    bonds
}

/// Placement of node `(i, j)` relative to the sheet centre.
pub(crate) fn grid_position<F: Float>(
    i: usize,
    j: usize,
    width: usize,
    height: usize,
    pitch_x: F,
    pitch_z: F,
    layout: GridLayout,
) -> Vec3<F> {
    let half = F::half();
    let mut x = (F::from_usize(i) - F::from_usize(width - 1) * half) * pitch_x;
    let z = (F::from_usize(j) - F::from_usize(height - 1) * half) * pitch_z;
    if layout == GridLayout::Hex && j % 2 == 1 {
        x = x - pitch_x * half;
    }
    Vec3::new(x, F::zero(), z)
}

/// A membrane sheet registered with a soft body.
#[derive(Clone, Debug)]
pub struct MembraneGrid {
    nodes: AllocVec<NodeId>,
    joints: AllocVec<JointId>,
    width: usize,
    height: usize,
}

impl MembraneGrid {
    /// Place and wire a sheet.
    pub fn build<F: Float>(body: &mut SoftBody<Vec3<F>>, config: &GridConfig<F>) -> Result<Self> {
        let mut grid = Self::place(body, config, config.spacing, config.spacing)?;
        grid.wire(body, config.wiring, config.rest_length, config.joint)?;
        tracing::debug!(
            width = grid.width,
            height = grid.height,
            joints = grid.joints.len(),
            "membrane grid built"
        );
        Ok(grid)
    }

    /// Create the nodes only, with separate pitches along X and Z.
    pub(crate) fn place<F: Float>(
        body: &mut SoftBody<Vec3<F>>,
        config: &GridConfig<F>,
        pitch_x: F,
        pitch_z: F,
    ) -> Result<Self> {
        config.validate()?;
        let (width, height) = (config.width, config.height);
        let mut nodes = AllocVec::with_capacity(width * height);
        for i in 0..width {
            for j in 0..height {
                let local = grid_position(i, j, width, height, pitch_x, pitch_z, config.layout);
                nodes.push(body.spawn_node(config.origin + local, config.node_mass)?);
            }
        }
        Ok(MembraneGrid { nodes, joints: AllocVec::new(), width, height })
    }

    /// Bond the sheet's nodes. Pairs that are already wired are skipped, so
    /// calling this again adds nothing. Returns the number of new joints.
    pub fn wire<F: Float>(
        &mut self,
        body: &mut SoftBody<Vec3<F>>,
        wiring: GridWiring,
        rest_length: RestLength,
        joint: JointConfig<F>,
    ) -> Result<usize> {
        let before = body.joint_count();
        for (a, b) in grid_bonds(self.width, self.height, wiring) {
            let (a, b) = (self.nodes[a], self.nodes[b]);
            let id = match rest_length {
                RestLength::Placement => body.connect_at_rest(a, b, joint)?,
                RestLength::Config => body.connect(a, b, joint)?,
            };
            if id.index() >= before {
                self.joints.push(id);
            }
        }
        Ok(body.joint_count() - before)
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// All node handles in `i * height + j` order.
    pub fn nodes(&self) -> &[NodeId] { &self.nodes }

    /// Joints created by this sheet's wiring passes.
    pub fn joints(&self) -> &[JointId] { &self.joints }

    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.height + j
    }

    pub fn node(&self, i: usize, j: usize) -> Result<NodeId> {
        if i >= self.width || j >= self.height {
            return Err(PhysicsError::OutOfRange {
                index: self.index(i, j),
                count: self.nodes.len(),
            });
        }
        Ok(self.nodes[self.index(i, j)])
    }

    /// Node by flat index.
    pub fn node_at(&self, index: usize) -> Result<NodeId> {
        self.nodes
            .get(index)
            .copied()
            .ok_or(PhysicsError::OutOfRange { index, count: self.nodes.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braced_count_formula() {
        for (x, y) in [(2, 2), (3, 5), (6, 4)] {
            let expected = (x - 1) * (y - 1) * 4 + (x - 1) + (y - 1);
            assert_eq!(expected_joint_count(x, y, GridWiring::Braced), expected);
            assert_eq!(grid_bonds(x, y, GridWiring::Braced).len(), expected);
        }
    }

    #[test]
    fn bond_lists_match_counts() {
        for wiring in [GridWiring::Axis, GridWiring::Hex] {
            assert_eq!(grid_bonds(5, 4, wiring).len(), expected_joint_count(5, 4, wiring));
        }
    }

    #[test]
    fn hex_rows_are_offset() {
        let even = grid_position::<f64>(1, 0, 3, 3, 1.0, 1.0, GridLayout::Hex);
        let odd = grid_position::<f64>(1, 1, 3, 3, 1.0, 1.0, GridLayout::Hex);
        assert_eq!(even.x - odd.x, 0.5);
    }

    #[test]
    fn rejects_degenerate_grid() {
        let mut body = SoftBody::<Vec3<f32>>::new();
        let err = MembraneGrid::build(&mut body, &GridConfig::new(1, 4, 1.0)).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidParameter { .. }));
        assert_eq!(body.node_count(), 0);
    }
}
