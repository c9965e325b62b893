//! Auxiliary force models injected into every substep.

use crate::float::Float;
use crate::node::{Node, NodeId};
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Universal gas constant in J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;

/// A per-substep force source registered on a [`SoftBody`](crate::SoftBody).
///
/// Fields run before the joint force pass of every substep. A constant
/// force adds the same impulse per tick for any substep count.
pub trait ForceField<V: Vec> {
    fn apply(&mut self, nodes: &mut [Node<V>]);
}

/// Uniform acceleration on every node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gravity<V: Vec> {
    pub acceleration: V,
}

impl<V: Vec> Gravity<V> {
    pub fn new(acceleration: V) -> Self {
        Gravity { acceleration }
    }
}

impl<V: Vec> ForceField<V> for Gravity<V> {
    fn apply(&mut self, nodes: &mut [Node<V>]) {
        for node in nodes.iter_mut() {
            node.apply_acceleration(self.acceleration);
        }
    }
}

/// Constant force on a single node, e.g. the weight pulling a rupture anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeForce<V: Vec> {
    pub node: NodeId,
    pub force: V,
}

impl<V: Vec> ForceField<V> for NodeForce<V> {
    fn apply(&mut self, nodes: &mut [Node<V>]) {
        if let Some(node) = nodes.get_mut(self.node.index()) {
            node.apply_force(self.force);
        }
    }
}

/// Velocity-proportional drag, independent of node mass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Drag<F: Float> {
    pub coefficient: F,
}

impl<F: Float> Drag<F> {
    pub fn new(coefficient: F) -> Self {
        Drag { coefficient }
    }
}

impl<V: Vec> ForceField<V> for Drag<V::Scalar> {
    fn apply(&mut self, nodes: &mut [Node<V>]) {
        for node in nodes.iter_mut() {
            node.apply_acceleration(node.velocity().scale(-self.coefficient));
        }
    }
}

/// Ideal-gas parameters for [`Pressure`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PressureConfig<F: Float> {
    /// Gas temperature in kelvin. Default: 300.
    pub temperature: F,
    /// Scale applied to the ideal-gas magnitude. Default: 0.001.
    pub coefficient: F,
}

impl<F: Float> PressureConfig<F> {
    pub fn new() -> Self {
        PressureConfig {
            temperature: F::from_f64(300.0),
            coefficient: F::from_f64(0.001),
        }
    }

    pub fn with_temperature(mut self, temperature: F) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_coefficient(mut self, coefficient: F) -> Self {
        self.coefficient = coefficient;
        self
    }
}

impl<F: Float> Default for PressureConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal gas pressure on a closed shell.
///
/// The shell is treated as a sphere whose radius is the mean node distance
/// from the centroid. Every node is pushed along its rest-state outward
/// normal with magnitude `(area * T * R / volume) * coefficient`, where
/// `area = π r²` and `volume = 4/3 π r³`.
pub struct Pressure<F: Float> {
    nodes: AllocVec<NodeId>,
    normals: AllocVec<Vec3<F>>,
    config: PressureConfig<F>,
}

impl<F: Float> Pressure<F> {
    /// `nodes` and `normals` are paired by position; extra entries on either
    /// side are ignored.
    pub fn new(nodes: AllocVec<NodeId>, normals: AllocVec<Vec3<F>>, config: PressureConfig<F>) -> Self {
        Pressure { nodes, normals, config }
    }

    pub fn config(&self) -> &PressureConfig<F> {
        &self.config
    }

    /// Per-node force magnitude for a sphere of `radius`. Zero when the
    /// radius has collapsed to nothing.
    pub fn magnitude(&self, radius: F) -> F {
        if radius.is_near_zero(F::from_f32(1e-10)) {
            return F::zero();
        }
        let pi = F::pi();
        let area = pi * radius * radius;
        let volume = F::from_f64(4.0) / F::from_f64(3.0) * pi * radius * radius * radius;
        area * self.config.temperature * F::from_f64(GAS_CONSTANT) / volume * self.config.coefficient
    }

    fn measure_radius(&self, nodes: &[Node<Vec3<F>>]) -> F {
        let mut centroid = Vec3::zero();
        let mut count = 0usize;
        for id in &self.nodes {
            if let Some(node) = nodes.get(id.index()) {
                centroid += node.position();
                count += 1;
            }
        }
        if count == 0 {
            return F::zero();
        }
        let centroid = centroid.scale(F::one() / F::from_usize(count));
        let mut total = F::zero();
        for id in &self.nodes {
            if let Some(node) = nodes.get(id.index()) {
                total = total + node.position().distance(centroid);
            }
        }
        total / F::from_usize(count)
    }
}

impl<F: Float> ForceField<Vec3<F>> for Pressure<F> {
    fn apply(&mut self, nodes: &mut [Node<Vec3<F>>]) {
        let magnitude = self.magnitude(self.measure_radius(nodes));
        if magnitude == F::zero() {
            return;
        }
        for (id, normal) in self.nodes.iter().zip(self.normals.iter()) {
            if let Some(node) = nodes.get_mut(id.index()) {
                node.apply_force(normal.scale(magnitude));
            }
        }
    }
}
