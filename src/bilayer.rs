//! Two parallel membrane sheets tied together by stiff transversal joints.

use crate::config::SimulationProfile;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::grid::{GridConfig, GridLayout, GridWiring, MembraneGrid, RestLength};
use crate::joint::JointId;
use crate::softbody::SoftBody;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Configuration for a dual-sheet membrane.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BilayerConfig<F: Float> {
    pub width: usize,
    pub height: usize,
    /// Base spacing; in-plane node pitch is `spacing * sqrt(3)`.
    pub spacing: F,
    /// Distance between the sheets along -Y. Default: 1.
    pub gap: F,
    /// Centre of the upper sheet.
    pub origin: Vec3<F>,
    pub wiring: GridWiring,
    pub rest_length: RestLength,
    pub profile: SimulationProfile<F>,
}

impl<F: Float> BilayerConfig<F> {
    pub fn new(width: usize, height: usize, spacing: F) -> Self {
        BilayerConfig {
            width,
            height,
            spacing,
            gap: F::one(),
            origin: Vec3::new(F::zero(), F::zero(), F::zero()),
            wiring: GridWiring::Hex,
            rest_length: RestLength::Config,
            profile: SimulationProfile::new(),
        }
    }

    pub fn with_gap(mut self, gap: F) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_origin(mut self, origin: Vec3<F>) -> Self {
        self.origin = origin;
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

    pub fn with_profile(mut self, profile: SimulationProfile<F>) -> Self {
        self.profile = profile;
        self
    }

    /// Node pitch inside each sheet.
    pub fn pitch(&self) -> F {
        self.spacing * F::from_f32(3.0).sqrt()
    }

    fn sheet(&self, origin: Vec3<F>) -> GridConfig<F> {
        GridConfig::new(self.width, self.height, self.pitch())
            .with_origin(origin)
            .with_layout(GridLayout::Square)
            .with_wiring(self.wiring)
            .with_rest_length(self.rest_length)
            .with_node_mass(self.profile.node_mass)
            .with_joint(self.profile.lipid_joint)
    }
}

/// Upper and lower sheet plus the transversal links between them.
#[derive(Clone, Debug)]
pub struct Bilayer {
    upper: MembraneGrid,
    lower: MembraneGrid,
    links: AllocVec<JointId>,
}

impl Bilayer {
    /// Build both sheets and link node `k` of the upper sheet to node `k` of
    /// the lower one. Links always use the doubled membrane stiffness.
    pub fn build<F: Float>(body: &mut SoftBody<Vec3<F>>, config: &BilayerConfig<F>) -> Result<Self> {
        if !config.gap.is_finite() || config.gap <= F::zero() {
            return Err(PhysicsError::invalid("bilayer gap must be positive"));
        }
        let link = config.profile.membrane_joint.with_membrane(true);
        link.validate()?;
        let lower_origin = config.origin - Vec3::vertical(config.gap);
        let upper = MembraneGrid::build(body, &config.sheet(config.origin))?;
        let lower = MembraneGrid::build(body, &config.sheet(lower_origin))?;

        let mut links = AllocVec::with_capacity(upper.len());
        for (&a, &b) in upper.nodes().iter().zip(lower.nodes()) {
            let id = match config.rest_length {
                RestLength::Placement => body.connect_at_rest(a, b, link)?,
                RestLength::Config => body.connect(a, b, link)?,
            };
            links.push(id);
        }

        tracing::debug!(
            nodes = upper.len() + lower.len(),
            sheet_joints = upper.joints().len() + lower.joints().len(),
            links = links.len(),
            "bilayer built"
        );
        Ok(Bilayer { upper, lower, links })
    }

    pub fn upper(&self) -> &MembraneGrid { &self.upper }
    pub fn lower(&self) -> &MembraneGrid { &self.lower }

    /// Transversal joints, one per node pair.
    pub fn links(&self) -> &[JointId] { &self.links }
}
