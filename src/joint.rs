//! Breakable spring links with min/max distance limits.

use crate::config::JointConfig;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::node::{Node, NodeId};
use crate::vec::Vec;

/// Opaque handle to a joint owned by a [`SoftBody`](crate::SoftBody).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JointId(pub(crate) usize);

impl JointId {
    /// Position of the joint in the body's insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Outcome of a force pass over one joint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JointForce {
    /// Joint is disabled; nothing was applied.
    Inactive,
    /// Spring and damping forces were applied to both ends.
    Applied,
    /// Separation exceeded the break length; the joint is now disabled.
    Broken,
}

/// A spring plus distance constraint between two distinct nodes.
///
/// Physical parameters are fixed at construction. The only mutable state is
/// the `enabled` flag, and a joint that broke stays disabled.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint<V: Vec> {
    a: NodeId,
    b: NodeId,
    config: JointConfig<V::Scalar>,
    enabled: bool,
    broken: bool,
}

impl<V: Vec> Joint<V> {
    /// Create an enabled joint.
    pub fn new(a: NodeId, b: NodeId, config: JointConfig<V::Scalar>) -> Result<Self> {
        config.validate()?;
        if a == b {
            return Err(PhysicsError::invalid("joint endpoints must be distinct nodes"));
        }
        Ok(Joint { a, b, config, enabled: true, broken: false })
    }

    /// Create a joint that starts disabled.
    pub fn dormant(a: NodeId, b: NodeId, config: JointConfig<V::Scalar>) -> Result<Self> {
        let mut joint = Self::new(a, b, config)?;
        joint.enabled = false;
        Ok(joint)
    }

    pub fn a(&self) -> NodeId { self.a }
    pub fn b(&self) -> NodeId { self.b }
    pub fn config(&self) -> &JointConfig<V::Scalar> { &self.config }
    pub fn is_enabled(&self) -> bool { self.enabled }
    pub fn is_broken(&self) -> bool { self.broken }

    /// Current separation of the endpoints.
    ///
    /// # Panics
    ///
    /// If `nodes` is not the slice of the body that owns this joint and is
    /// too short for either endpoint. [`SoftBody::joint_length`] is the
    /// checked form.
    ///
    /// [`SoftBody::joint_length`]: crate::SoftBody::joint_length
    pub fn length(&self, nodes: &[Node<V>]) -> V::Scalar {
        nodes[self.a.0].position().distance(nodes[self.b.0].position())
    }

    /// Unordered endpoint pair, used for duplicate detection.
    pub(crate) fn key(&self) -> (usize, usize) {
        let (a, b) = (self.a.0, self.b.0);
        if a < b { (a, b) } else { (b, a) }
    }

    /// Returns false if the joint broke and cannot come back.
    pub(crate) fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.broken && enabled {
            return false;
        }
        self.enabled = enabled;
        true
    }

    /// Accumulate the spring-damper force into both endpoints.
    ///
    /// Half the spring force goes to each end, each reduced by its own
    /// damped velocity. Degenerate (coincident) endpoints get a zero
    /// direction, so only damping acts.
    ///
    /// # Panics
    ///
    /// If `nodes` has no entry for either endpoint.
    pub fn compute_force(&mut self, nodes: &mut [Node<V>]) -> JointForce {
        if !self.enabled {
            return JointForce::Inactive;
        }
        let (ia, ib) = (self.a.0, self.b.0);
        let delta = nodes[ib].position() - nodes[ia].position();
        let dist = delta.length();
        if dist > self.config.break_length {
            self.enabled = false;
            self.broken = true;
            return JointForce::Broken;
        }

        let magnitude =
            self.config.effective_stiffness() * (dist - self.config.rest_length) * V::Scalar::half();
        let force = delta.normalize().scale(magnitude);
        let damping = self.config.damping;

        let va = nodes[ia].velocity();
        let vb = nodes[ib].velocity();
        nodes[ia].apply_force(force - va.scale(damping));
        nodes[ib].apply_force(-force - vb.scale(damping));
        JointForce::Applied
    }

    /// Single-pass positional correction into `[min_distance, max_distance]`.
    ///
    /// Both ends move by half the violation. Chains of joints only settle
    /// approximately within one pass.
    ///
    /// # Panics
    ///
    /// If `nodes` has no entry for either endpoint.
    pub fn project_constraint(&self, nodes: &mut [Node<V>]) {
        if !self.enabled {
            return;
        }
        let (ia, ib) = (self.a.0, self.b.0);
        let delta = nodes[ib].position() - nodes[ia].position();
        let dist = delta.length();
        let dir = delta.normalize();

        if dist > self.config.max_distance {
            let offset = dir.scale((dist - self.config.max_distance) * V::Scalar::half());
            nodes[ia].translate(offset);
            nodes[ib].translate(-offset);
        } else if dist < self.config.min_distance {
            let offset = dir.scale((self.config.min_distance - dist) * V::Scalar::half());
            nodes[ia].translate(-offset);
            nodes[ib].translate(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec3;
    use alloc::vec;

    fn pair(distance: f64) -> alloc::vec::Vec<Node<Vec3<f64>>> {
        vec![
            Node::new(Vec3::zero(), 1.0).unwrap(),
            Node::new(Vec3::new(distance, 0.0, 0.0), 1.0).unwrap(),
        ]
    }

    #[test]
    fn identical_endpoints_rejected() {
        let result = Joint::<Vec3<f32>>::new(NodeId(1), NodeId(1), JointConfig::new());
        assert!(matches!(result, Err(PhysicsError::InvalidParameter { .. })));
    }

    #[test]
    fn stretched_spring_pulls_ends_together() {
        let mut nodes = pair(3.0);
        let config = JointConfig::new().with_stiffness(2.0).with_rest_length(1.0);
        let mut joint = Joint::new(NodeId(0), NodeId(1), config).unwrap();
        assert_eq!(joint.compute_force(&mut nodes), JointForce::Applied);
        // 2 * (3 - 1) * 0.5 = 2 on each end
        assert_eq!(nodes[0].accumulated_acceleration(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(nodes[1].accumulated_acceleration(), Vec3::new(-2.0, 0.0, 0.0));
    }

    #[test]
    fn break_is_one_shot() {
        let mut nodes = pair(5.0);
        let config = JointConfig::new().with_break_length(4.0);
        let mut joint = Joint::new(NodeId(0), NodeId(1), config).unwrap();
        assert_eq!(joint.compute_force(&mut nodes), JointForce::Broken);
        assert!(!joint.is_enabled());
        assert!(!joint.set_enabled(true));
        assert_eq!(joint.compute_force(&mut nodes), JointForce::Inactive);
        assert_eq!(nodes[0].accumulated_acceleration(), Vec3::zero());
    }

    #[test]
    fn projection_clamps_to_max() {
        let mut nodes = pair(4.0);
        let config = JointConfig::new().with_distance_limits(0.5, 2.0);
        let joint = Joint::new(NodeId(0), NodeId(1), config).unwrap();
        joint.project_constraint(&mut nodes);
        assert!((joint.length(&nodes) - 2.0).abs() < 1e-12);
        assert!((nodes[0].position().x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn projection_pushes_to_min() {
        let mut nodes = pair(0.2);
        let config = JointConfig::new().with_distance_limits(1.0, 2.0);
        let joint = Joint::new(NodeId(0), NodeId(1), config).unwrap();
        joint.project_constraint(&mut nodes);
        assert!((joint.length(&nodes) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn coincident_nodes_stay_finite() {
        let mut nodes = pair(0.0);
        let config = JointConfig::new().with_distance_limits(1.0, 2.0);
        let mut joint = Joint::new(NodeId(0), NodeId(1), config).unwrap();
        joint.compute_force(&mut nodes);
        joint.project_constraint(&mut nodes);
        let p = nodes[1].position();
        assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
    }
}
