//! Scripted membrane rupture around a falling anchor.
//!
//! A membrane grid hangs below an anchor node. Every membrane node is tied to
//! the anchor by a wrap joint that starts disabled. Once the anchor sinks to
//! the break height the rig cuts the sheet along a horizontal plane, switches
//! on the wrap joints that are short enough (or already under the cut), and
//! stitches a configured set of node pairs back together.

use crate::config::JointConfig;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::grid::{GridConfig, MembraneGrid};
use crate::joint::{Joint, JointId};
use crate::node::NodeId;
use crate::softbody::SoftBody;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Configuration for a [`RuptureRig`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuptureConfig<F: Float> {
    /// Membrane sheet; its joint config is used for the structural bonds.
    pub grid: GridConfig<F>,
    /// Anchor start height above the sheet origin. Default: 2.5.
    pub anchor_height: F,
    /// Constant downward force on the anchor, applied every substep.
    /// Default: 0 (the host drives the anchor).
    pub anchor_pull: F,
    /// The rig fires once the anchor is at or below this height.
    pub break_height: F,
    /// Height of the horizontal cut plane.
    pub cut_height: F,
    /// Wrap joints shorter than this are enabled when the rig fires.
    pub wrap_distance: F,
    pub wrap_joint: JointConfig<F>,
    /// Joint used for the stitches; the membrane multiplier is forced on.
    pub stitch_joint: JointConfig<F>,
    /// Flat grid index pairs (`i * height + j`) joined after the cut.
    pub stitches: AllocVec<(usize, usize)>,
}

impl<F: Float> RuptureConfig<F> {
    pub fn new(grid: GridConfig<F>) -> Self {
        let y = grid.origin.y;
        RuptureConfig {
            grid,
            anchor_height: F::from_f32(2.5),
            anchor_pull: F::zero(),
            break_height: y,
            cut_height: y,
            wrap_distance: F::one(),
            wrap_joint: JointConfig::new(),
            stitch_joint: JointConfig::new().with_membrane(true),
            stitches: AllocVec::new(),
        }
    }

    pub fn with_anchor_height(mut self, height: F) -> Self {
        self.anchor_height = height;
        self
    }

    pub fn with_anchor_pull(mut self, pull: F) -> Self {
        self.anchor_pull = pull;
        self
    }

    pub fn with_break_height(mut self, height: F) -> Self {
        self.break_height = height;
        self
    }

    pub fn with_cut_height(mut self, height: F) -> Self {
        self.cut_height = height;
        self
    }

    pub fn with_wrap_distance(mut self, distance: F) -> Self {
        self.wrap_distance = distance;
        self
    }

    pub fn with_wrap_joint(mut self, joint: JointConfig<F>) -> Self {
        self.wrap_joint = joint;
        self
    }

    pub fn with_stitch_joint(mut self, joint: JointConfig<F>) -> Self {
        self.stitch_joint = joint;
        self
    }

    pub fn with_stitches(mut self, stitches: AllocVec<(usize, usize)>) -> Self {
        self.stitches = stitches;
        self
    }
}

/// What a rupture changed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RuptureReport {
    /// Joints disabled because they crossed the cut plane.
    pub severed: usize,
    pub wraps_enabled: usize,
    /// Stitch joints that were newly created.
    pub stitches_added: usize,
}

/// Membrane, anchor and wrap joints, plus the one-shot cut.
#[derive(Clone, Debug)]
pub struct RuptureRig<F: Float> {
    grid: MembraneGrid,
    anchor: NodeId,
    wraps: AllocVec<JointId>,
    stitch_pairs: AllocVec<(NodeId, NodeId)>,
    stitched: AllocVec<JointId>,
    break_height: F,
    cut_height: F,
    wrap_distance: F,
    stitch_joint: JointConfig<F>,
    fired: bool,
}

impl<F: Float> RuptureRig<F> {
    /// Build the sheet, the anchor (twice the node mass) and the dormant wrap
    /// joints. Stitch indices are checked against the sheet before anything
    /// is added to `body`.
    pub fn build(body: &mut SoftBody<Vec3<F>>, config: &RuptureConfig<F>) -> Result<Self> {
        config.wrap_joint.validate()?;
        let stitch_joint = config.stitch_joint.with_membrane(true);
        stitch_joint.validate()?;
        let count = config.grid.width * config.grid.height;
        for &(a, b) in &config.stitches {
            if let Some(index) = [a, b].into_iter().find(|&i| i >= count) {
                return Err(PhysicsError::OutOfRange { index, count });
            }
            if a == b {
                return Err(PhysicsError::invalid("stitch pair joins a node to itself"));
            }
        }

        let grid = MembraneGrid::build(body, &config.grid)?;
        let stitch_pairs = config
            .stitches
            .iter()
            .map(|&(a, b)| -> Result<(NodeId, NodeId)> { Ok((grid.node_at(a)?, grid.node_at(b)?)) })
            .collect::<Result<AllocVec<_>>>()?;

        let anchor_pos = config.grid.origin + Vec3::vertical(config.anchor_height);
        let anchor = body.spawn_node(anchor_pos, config.grid.node_mass * F::two())?;
        if config.anchor_pull != F::zero() {
            body.add_node_force(anchor, Vec3::vertical(-config.anchor_pull))?;
        }

        let mut wraps = AllocVec::with_capacity(grid.len());
        for &node in grid.nodes() {
            wraps.push(body.add_joint(Joint::dormant(anchor, node, config.wrap_joint)?)?);
        }

        tracing::debug!(
            nodes = grid.len(),
            structural = grid.joints().len(),
            wraps = wraps.len(),
            stitches = stitch_pairs.len(),
            "rupture rig built"
        );
        Ok(RuptureRig {
            grid,
            anchor,
            wraps,
            stitch_pairs,
            stitched: AllocVec::new(),
            break_height: config.break_height,
            cut_height: config.cut_height,
            wrap_distance: config.wrap_distance,
            stitch_joint,
            fired: false,
        })
    }

    /// Check the trigger and fire if the anchor has sunk far enough.
    /// Call once per tick after stepping.
    pub fn update(&mut self, body: &mut SoftBody<Vec3<F>>) -> Result<Option<RuptureReport>> {
        if self.fired {
            return Ok(None);
        }
        let anchor_y = body.node_ref(self.anchor)?.position().y;
        if anchor_y > self.break_height {
            return Ok(None);
        }
        self.fire(body)
    }

    /// Cut, wrap and stitch now, regardless of the anchor. Returns `None` if
    /// the rig already fired.
    pub fn fire(&mut self, body: &mut SoftBody<Vec3<F>>) -> Result<Option<RuptureReport>> {
        if self.fired {
            return Ok(None);
        }
        self.fired = true;
        let h = self.cut_height;
        let mut report = RuptureReport {
            severed: body.disable_straddling(h),
            ..RuptureReport::default()
        };

        for &wrap in &self.wraps {
            let (length, far_y) = {
                let joint = body.joint(wrap).ok_or(PhysicsError::OutOfRange {
                    index: wrap.index(),
                    count: body.joint_count(),
                })?;
                (joint.length(body.nodes()), body.node_ref(joint.b())?.position().y)
            };
            if (length < self.wrap_distance || far_y < h) && body.set_joint_enabled(wrap, true)? {
                report.wraps_enabled += 1;
            }
        }

        for &(a, b) in &self.stitch_pairs {
            let before = body.joint_count();
            let id = body.connect(a, b, self.stitch_joint)?;
            if body.joint_count() > before {
                self.stitched.push(id);
                report.stitches_added += 1;
            } else {
                tracing::warn!(a = a.index(), b = b.index(), "stitch pair already wired");
            }
        }

        tracing::info!(
            severed = report.severed,
            wraps_enabled = report.wraps_enabled,
            stitches = report.stitches_added,
            "membrane ruptured"
        );
        Ok(Some(report))
    }

    pub fn has_fired(&self) -> bool { self.fired }
    pub fn grid(&self) -> &MembraneGrid { &self.grid }
    pub fn anchor(&self) -> NodeId { self.anchor }

    /// Wrap joints in grid node order.
    pub fn wraps(&self) -> &[JointId] { &self.wraps }

    /// Stitch joints created when the rig fired.
    pub fn stitched(&self) -> &[JointId] { &self.stitched }
}

impl<F: Float> SoftBody<Vec3<F>> {
    /// Disable every enabled joint whose endpoints lie strictly on opposite
    /// sides of the plane `y = height`. Returns how many were disabled.
    pub fn disable_straddling(&mut self, height: F) -> usize {
        let crossing: AllocVec<usize> = self
            .joints()
            .iter()
            .enumerate()
            .filter(|(_, joint)| joint.is_enabled())
            .filter(|(_, joint)| {
                let y1 = self.nodes()[joint.a().index()].position().y;
                let y2 = self.nodes()[joint.b().index()].position().y;
                (y1 > height && y2 < height) || (y1 < height && y2 > height)
            })
            .map(|(index, _)| index)
            .collect();
        let joints = self.joints_mut();
        for &index in &crossing {
            joints[index].set_enabled(false);
        }
        crossing.len()
    }
}
