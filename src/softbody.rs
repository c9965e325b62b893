//! Node and joint arena with the fixed-step substep loop.

use crate::config::JointConfig;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::force::{ForceField, NodeForce};
use crate::joint::{Joint, JointForce, JointId};
use crate::node::{Node, NodeId};
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::vec::Vec;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec as AllocVec;

/// A deformable body made of nodes and joints.
///
/// Nodes and joints keep insertion order, which is also the iteration order
/// of every pass. The body starts disabled; `step` does nothing until the
/// host calls [`SoftBody::enable`] after construction is finished.
pub struct SoftBody<V: Vec> {
    nodes: AllocVec<Node<V>>,
    joints: AllocVec<Joint<V>>,
    bonds: BTreeMap<(usize, usize), JointId>,
    fields: AllocVec<Box<dyn ForceField<V>>>,
    enabled: bool,
    show_debug: bool,
}

impl<V: Vec> SoftBody<V> {
    pub fn new() -> Self {
        SoftBody {
            nodes: AllocVec::new(),
            joints: AllocVec::new(),
            bonds: BTreeMap::new(),
            fields: AllocVec::new(),
            enabled: false,
            show_debug: false,
        }
    }

    /// Take ownership of a node and return its handle.
    pub fn add_node(&mut self, node: Node<V>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Create and register a node at rest.
    pub fn spawn_node(&mut self, pos: V, mass: V::Scalar) -> Result<NodeId> {
        Ok(self.add_node(Node::new(pos, mass)?))
    }

    /// Register a joint.
    ///
    /// If the same unordered node pair is already wired, the existing handle
    /// is returned and nothing is added.
    pub fn add_joint(&mut self, joint: Joint<V>) -> Result<JointId> {
        self.check_node(joint.a())?;
        self.check_node(joint.b())?;
        let key = joint.key();
        if let Some(&existing) = self.bonds.get(&key) {
            return Ok(existing);
        }
        let id = JointId(self.joints.len());
        self.joints.push(joint);
        self.bonds.insert(key, id);
        Ok(id)
    }

    /// Wire `a` to `b` with an enabled joint.
    pub fn connect(&mut self, a: NodeId, b: NodeId, config: JointConfig<V::Scalar>) -> Result<JointId> {
        self.add_joint(Joint::new(a, b, config)?)
    }

    /// Wire `a` to `b` with a joint whose rest length is their current
    /// separation, so it starts at equilibrium.
    pub fn connect_at_rest(
        &mut self,
        a: NodeId,
        b: NodeId,
        config: JointConfig<V::Scalar>,
    ) -> Result<JointId> {
        let rest = self.node_ref(a)?.position().distance(self.node_ref(b)?.position());
        self.connect(a, b, config.with_rest_length(rest))
    }

    pub fn register_force<T: ForceField<V> + 'static>(&mut self, field: T) {
        self.fields.push(Box::new(field));
    }

    /// Push `node` with a constant force on every substep.
    pub fn add_node_force(&mut self, node: NodeId, force: V) -> Result<()> {
        self.check_node(node)?;
        self.register_force(NodeForce { node, force });
        Ok(())
    }

    /// One-shot force, consumed by the next integration.
    pub fn apply_force(&mut self, node: NodeId, force: V) -> Result<()> {
        self.check_node(node)?;
        self.nodes[node.0].apply_force(force);
        Ok(())
    }

    pub fn enable(&mut self) {
        self.set_enabled(true);
    }

    pub fn disable(&mut self) {
        self.set_enabled(false);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            tracing::debug!(
                enabled,
                nodes = self.nodes.len(),
                joints = self.joints.len(),
                "soft body state changed"
            );
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool { self.enabled }

    /// Debug segments are reported to the step observer. Physics is unaffected.
    pub fn set_show_debug(&mut self, show_debug: bool) {
        self.show_debug = show_debug;
    }

    pub fn show_debug(&self) -> bool { self.show_debug }

    /// Enable or disable a joint. Returns false for a broken joint, which
    /// stays disabled.
    pub fn set_joint_enabled(&mut self, joint: JointId, enabled: bool) -> Result<bool> {
        let count = self.joints.len();
        let joint = self
            .joints
            .get_mut(joint.0)
            .ok_or(PhysicsError::OutOfRange { index: joint.0, count })?;
        Ok(joint.set_enabled(enabled))
    }

    /// Advance one tick split into `sub_steps` substeps.
    pub fn step(&mut self, sub_steps: usize) {
        self.step_observed(sub_steps, &mut NoOpStepObserver);
    }

    /// Advance one tick, reporting progress to `observer`.
    ///
    /// Each substep runs: force fields, joint forces, integration, constraint
    /// projection, velocity recovery. Inert while the body is disabled.
    pub fn step_observed<O: StepObserver<V>>(&mut self, sub_steps: usize, observer: &mut O) {
        if !self.enabled {
            return;
        }
        let sub_steps = sub_steps.max(1);

        for sub in 0..sub_steps {
            for field in self.fields.iter_mut() {
                field.apply(&mut self.nodes);
            }
            for (index, joint) in self.joints.iter_mut().enumerate() {
                if joint.compute_force(&mut self.nodes) == JointForce::Broken {
                    tracing::debug!(joint = index, "joint exceeded break length");
                    observer.on_joint_broken(JointId(index));
                }
            }
            observer.on_forces(sub);

            for node in self.nodes.iter_mut() {
                node.integrate(sub_steps);
            }
            observer.on_integrate(sub);

            for joint in self.joints.iter() {
                joint.project_constraint(&mut self.nodes);
            }
            observer.on_projection(sub);

            for node in self.nodes.iter_mut() {
                node.recover_velocity(sub_steps);
            }
        }

        if self.show_debug {
            for joint in self.joints.iter().filter(|j| j.is_enabled()) {
                observer.on_debug_segment(
                    self.nodes[joint.a().0].position(),
                    self.nodes[joint.b().0].position(),
                );
            }
        }
        observer.on_step_complete();
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.nodes.get(id.0)
    }

    pub fn position(&self, id: NodeId) -> Option<V> {
        self.node(id).map(Node::position)
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint<V>> {
        self.joints.get(id.0)
    }

    /// Current separation of a joint's endpoints.
    pub fn joint_length(&self, id: JointId) -> Option<V::Scalar> {
        self.joint(id).map(|joint| joint.length(&self.nodes))
    }

    /// Handle of the joint wiring `a` and `b`, in either order.
    pub fn find_joint(&self, a: NodeId, b: NodeId) -> Option<JointId> {
        let key = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        self.bonds.get(&key).copied()
    }

    pub fn nodes(&self) -> &[Node<V>] { &self.nodes }
    pub fn joints(&self) -> &[Joint<V>] { &self.joints }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn joint_ids(&self) -> impl Iterator<Item = JointId> + '_ {
        (0..self.joints.len()).map(JointId)
    }

    pub fn positions(&self) -> AllocVec<V> {
        self.nodes.iter().map(Node::position).collect()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn joint_count(&self) -> usize { self.joints.len() }

    pub fn enabled_joint_count(&self) -> usize {
        self.joints.iter().filter(|j| j.is_enabled()).count()
    }

    /// Total `0.5 * m * |v|^2` over all nodes.
    pub fn kinetic_energy(&self) -> V::Scalar {
        self.nodes
            .iter()
            .fold(V::Scalar::zero(), |sum, n| sum + n.kinetic_energy())
    }

    /// Average node position.
    pub fn centroid(&self) -> V {
        if self.nodes.is_empty() {
            return V::zero();
        }
        let n = V::Scalar::from_usize(self.nodes.len());
        let mut sum = V::zero();
        for node in &self.nodes {
            sum = sum + node.position();
        }
        sum.scale(V::Scalar::one() / n)
    }

    /// Mean node distance from the centroid.
    pub fn mean_radius(&self) -> V::Scalar {
        if self.nodes.is_empty() {
            return V::Scalar::zero();
        }
        let centroid = self.centroid();
        let total = self
            .nodes
            .iter()
            .fold(V::Scalar::zero(), |sum, n| sum + n.position().distance(centroid));
        total / V::Scalar::from_usize(self.nodes.len())
    }

    pub(crate) fn check_node(&self, id: NodeId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(PhysicsError::OutOfRange { index: id.0, count: self.nodes.len() })
        }
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> Result<&Node<V>> {
        self.check_node(id)?;
        Ok(&self.nodes[id.0])
    }

    pub(crate) fn joints_mut(&mut self) -> &mut [Joint<V>] {
        &mut self.joints
    }
}

impl<V: Vec> Default for SoftBody<V> {
    fn default() -> Self {
        Self::new()
    }
}
