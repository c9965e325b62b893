//! Quasi-uniform spherical shells bonded by proximity.

use crate::config::JointConfig;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::force::{Pressure, PressureConfig};
use crate::joint::JointId;
use crate::node::NodeId;
use crate::softbody::SoftBody;
use crate::spatial::{ProximityQuery, UniformGrid};
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Place roughly `count` points on a sphere so each covers about the same area.
///
/// Rings of constant polar angle are spaced `dθ` apart and each ring gets as
/// many points as fit at spacing `dφ`, following Deserno's equal-area
/// construction on the unit sphere. Points are then scaled by `radius`.
/// Tiny counts are coarse (a request for 1 yields two points on the
/// equator); from a few dozen points up the total is within a few percent.
pub fn sphere_points<F: Float>(count: usize, radius: F) -> Result<AllocVec<Vec3<F>>> {
    if count == 0 {
        return Err(PhysicsError::invalid("sphere point count must be positive"));
    }
    if !radius.is_finite() || radius <= F::zero() {
        return Err(PhysicsError::invalid("sphere radius must be positive"));
    }
    let pi = F::pi();
    let two_pi = F::two() * pi;
    let alpha = F::from_f32(4.0) * pi / F::from_usize(count);
    let d = alpha.sqrt();
    let rings = (pi / d).round().to_usize().max(1);
    let d_theta = pi / F::from_usize(rings);
    let d_phi = alpha / d_theta;

    let mut points = AllocVec::with_capacity(count + count / 8);
    for i in 0..rings {
        let theta = pi * (F::from_usize(i) + F::half()) / F::from_usize(rings);
        let per_ring = (two_pi * theta.sin() / d_phi).round().to_usize();
        for j in 0..per_ring {
            let phi = two_pi * F::from_usize(j) / F::from_usize(per_ring);
            let (st, ct) = (theta.sin(), theta.cos());
            points.push(Vec3::new(st * phi.cos(), st * phi.sin(), ct).scale(radius));
        }
    }
    Ok(points)
}

/// Configuration for a spherical shell.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShellConfig<F: Float> {
    /// Requested node count; the placement lands close to it.
    pub target_count: usize,
    pub radius: F,
    pub center: Vec3<F>,
    /// Nodes closer than this at placement time get bonded.
    pub bond_radius: F,
    pub node_mass: F,
    /// Rest length is overridden with each pair's placement distance.
    pub joint: JointConfig<F>,
}

impl<F: Float> ShellConfig<F> {
    /// Shell with a bonding radius of 1.5x the nominal point spacing.
    pub fn new(target_count: usize, radius: F) -> Self {
        let spacing = if target_count == 0 {
            radius
        } else {
            radius * (F::from_f32(4.0) * F::pi() / F::from_usize(target_count)).sqrt()
        };
        ShellConfig {
            target_count,
            radius,
            center: Vec3::new(F::zero(), F::zero(), F::zero()),
            bond_radius: spacing * F::from_f32(1.5),
            node_mass: F::one(),
            joint: JointConfig::new(),
        }
    }

    pub fn with_center(mut self, center: Vec3<F>) -> Self {
        self.center = center;
        self
    }

    pub fn with_bond_radius(mut self, bond_radius: F) -> Self {
        self.bond_radius = bond_radius;
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
}

/// Bond every node in `nodes` to each other node the query reports within
/// `radius`. Query indices refer to positions in `nodes`.
///
/// Rest lengths are the current separations, so the bonded set starts at
/// equilibrium. Pairs are wired once; returns the number of new joints.
pub fn bond_by_proximity<F, Q>(
    body: &mut SoftBody<Vec3<F>>,
    nodes: &[NodeId],
    query: &Q,
    radius: F,
    joint: JointConfig<F>,
) -> Result<AllocVec<JointId>>
where
    F: Float,
    Q: ProximityQuery<F> + ?Sized,
{
    check_bonding(radius, &joint)?;
    let mut created = AllocVec::new();
    let mut neighbours = AllocVec::new();
    let mut isolated = 0usize;

    for (local, &node) in nodes.iter().enumerate() {
        let center = body.node_ref(node)?.position();
        neighbours.clear();
        query.within(center, radius, &mut neighbours);
        let mut bonded = false;
        for &other in &neighbours {
            if other == local {
                continue;
            }
            let partner = *nodes
                .get(other)
                .ok_or(PhysicsError::OutOfRange { index: other, count: nodes.len() })?;
            let count = body.joint_count();
            let id = body.connect_at_rest(node, partner, joint)?;
            if body.joint_count() > count {
                created.push(id);
            }
            bonded = true;
        }
        if !bonded {
            isolated += 1;
        }
    }

    if isolated > 0 {
        tracing::warn!(isolated, radius = ?radius, "shell nodes found no bonding partner");
    }
    Ok(created)
}

fn check_bonding<F: Float>(radius: F, joint: &JointConfig<F>) -> Result<()> {
    if !radius.is_finite() || radius <= F::zero() {
        return Err(PhysicsError::invalid("bonding radius must be positive"));
    }
    joint.validate()
}

/// A spherical shell registered with a soft body.
#[derive(Clone, Debug)]
pub struct Shell<F: Float> {
    nodes: AllocVec<NodeId>,
    joints: AllocVec<JointId>,
    normals: AllocVec<Vec3<F>>,
    center: Vec3<F>,
    radius: F,
}

impl<F: Float> Shell<F> {
    /// Place nodes with [`sphere_points`] and bond them through a
    /// [`UniformGrid`].
    /// Nothing is added to `body` when the configuration is rejected.
    pub fn build(body: &mut SoftBody<Vec3<F>>, config: &ShellConfig<F>) -> Result<Self> {
        check_bonding(config.bond_radius, &config.joint)?;
        let points = sphere_points(config.target_count, config.radius)?;
        let grid = UniformGrid::new(&points, config.bond_radius);
        Self::build_with_query(body, config, &points, &grid)
    }

    /// Like [`Shell::build`] with a caller-supplied proximity query over
    /// `points` (unit-sphere points scaled by the radius, centred on the origin).
    pub fn build_with_query<Q: ProximityQuery<F> + ?Sized>(
        body: &mut SoftBody<Vec3<F>>,
        config: &ShellConfig<F>,
        points: &[Vec3<F>],
        query: &Q,
    ) -> Result<Self> {
        check_bonding(config.bond_radius, &config.joint)?;
        let mut nodes = AllocVec::with_capacity(points.len());
        let mut normals = AllocVec::with_capacity(points.len());
        for &point in points {
            nodes.push(body.spawn_node(config.center + point, config.node_mass)?);
            normals.push(point.normalize());
        }

        // The query indexes the origin-centred points, so bond through
        // positions shifted back by the centre.
        let shifted = Shifted { inner: query, offset: config.center };
        let joints = bond_by_proximity(body, &nodes, &shifted, config.bond_radius, config.joint)?;

        tracing::debug!(
            requested = config.target_count,
            nodes = nodes.len(),
            joints = joints.len(),
            "shell built"
        );
        Ok(Shell {
            nodes,
            joints,
            normals,
            center: config.center,
            radius: config.radius,
        })
    }

    pub fn nodes(&self) -> &[NodeId] { &self.nodes }
    pub fn joints(&self) -> &[JointId] { &self.joints }

    /// Placement-time outward unit normals, paired with [`Shell::nodes`].
    pub fn normals(&self) -> &[Vec3<F>] { &self.normals }

    pub fn center(&self) -> Vec3<F> { self.center }
    pub fn radius(&self) -> F { self.radius }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Internal-pressure field for this shell, ready for
    /// [`SoftBody::register_force`].
    pub fn pressure(&self, config: PressureConfig<F>) -> Pressure<F> {
        Pressure::new(self.nodes.clone(), self.normals.clone(), config)
    }
}

struct Shifted<'a, F: Float, Q: ?Sized> {
    inner: &'a Q,
    offset: Vec3<F>,
}

impl<F: Float, Q: ProximityQuery<F> + ?Sized> ProximityQuery<F> for Shifted<'_, F, Q> {
    fn within(&self, center: Vec3<F>, radius: F, out: &mut AllocVec<usize>) {
        self.inner.within(center - self.offset, radius, out);
    }
}
