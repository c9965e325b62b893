//! Point masses integrated with a semi-implicit Euler step and Verlet-style
//! velocity reconciliation.

use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::vec::Vec;

/// Opaque handle to a node owned by a [`SoftBody`](crate::SoftBody).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the body's insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A point mass.
///
/// Velocity is measured as displacement per tick. Nodes are moved into a
/// body and never handed back mutably, so hosts only ever read them.
#[derive(Debug, PartialEq)]
pub struct Node<V: Vec> {
    pos: V,
    prev_pos: V,
    velocity: V,
    acceleration: V,
    mass: V::Scalar,
    inv_mass: V::Scalar,
}

impl<V: Vec> Node<V> {
    /// Create a node at rest. `mass` must be positive and finite.
    pub fn new(pos: V, mass: V::Scalar) -> Result<Self> {
        if !mass.is_finite() || mass <= V::Scalar::zero() {
            return Err(PhysicsError::invalid("mass must be positive and finite"));
        }
        Ok(Node {
            pos,
            prev_pos: pos,
            velocity: V::zero(),
            acceleration: V::zero(),
            mass,
            inv_mass: V::Scalar::one() / mass,
        })
    }

    /// Give the node an initial velocity.
    pub fn with_velocity(mut self, velocity: V) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn position(&self) -> V { self.pos }
    pub fn previous_position(&self) -> V { self.prev_pos }
    pub fn velocity(&self) -> V { self.velocity }
    pub fn mass(&self) -> V::Scalar { self.mass }
    pub fn inv_mass(&self) -> V::Scalar { self.inv_mass }

    /// Acceleration gathered since the last integration.
    pub fn accumulated_acceleration(&self) -> V { self.acceleration }

    /// `0.5 * m * |v|^2`.
    pub fn kinetic_energy(&self) -> V::Scalar {
        V::Scalar::half() * self.mass * self.velocity.length_sq()
    }

    pub fn apply_force(&mut self, force: V) {
        self.acceleration = self.acceleration + force.scale(self.inv_mass);
    }

    pub fn apply_acceleration(&mut self, accel: V) {
        self.acceleration = self.acceleration + accel;
    }

    /// Advance one of `sub_steps` equal slices of a tick and clear the
    /// accumulated acceleration.
    pub fn integrate(&mut self, sub_steps: usize) {
        let inv_steps = V::Scalar::one() / V::Scalar::from_usize(sub_steps.max(1));
        self.prev_pos = self.pos;
        self.velocity = self.velocity + self.acceleration.scale(inv_steps);
        self.pos = self.pos + self.velocity.scale(inv_steps);
        self.acceleration = V::zero();
    }

    /// Rebuild velocity from the displacement of the last substep so that
    /// positional corrections carry into the next one.
    pub fn recover_velocity(&mut self, sub_steps: usize) {
        let steps = V::Scalar::from_usize(sub_steps.max(1));
        self.velocity = (self.pos - self.prev_pos).scale(steps);
    }

    pub(crate) fn translate(&mut self, offset: V) {
        self.pos = self.pos + offset;
    }
}
