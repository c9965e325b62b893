//! Joint parameters and per-scene simulation profiles.

use crate::error::{PhysicsError, Result};
use crate::float::Float;

/// Physical parameters shared by every joint built from it.
///
/// # Builder Pattern
/// ```
/// use softcell::config::JointConfig;
///
/// let joint: JointConfig<f32> = JointConfig::new()
///     .with_stiffness(0.5)
///     .with_rest_length(1.0)
///     .with_distance_limits(0.5, 1.5)
///     .with_damping(0.2)
///     .with_break_length(3.0);
/// assert!(joint.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointConfig<F: Float> {
    /// Spring constant `k`. Default: 1.
    pub stiffness: F,
    /// Separation at which the spring exerts no force. Default: 1.
    pub rest_length: F,
    /// Lower positional limit. Default: 0.
    pub min_distance: F,
    /// Upper positional limit. Default: unbounded.
    pub max_distance: F,
    /// Velocity damping applied at both ends. Default: 0.
    pub damping: F,
    /// Separation past which the joint disables itself for good. Default: unbounded.
    pub break_length: F,
    /// Cross-sheet link; doubles the effective stiffness. Default: false.
    pub membrane: bool,
}

impl<F: Float> JointConfig<F> {
    pub fn new() -> Self {
        JointConfig {
            stiffness: F::one(),
            rest_length: F::one(),
            min_distance: F::zero(),
            max_distance: F::infinity(),
            damping: F::zero(),
            break_length: F::infinity(),
            membrane: false,
        }
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_rest_length(mut self, rest_length: F) -> Self {
        self.rest_length = rest_length;
        self
    }

    pub fn with_distance_limits(mut self, min: F, max: F) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_break_length(mut self, break_length: F) -> Self {
        self.break_length = break_length;
        self
    }

    pub fn with_membrane(mut self, membrane: bool) -> Self {
        self.membrane = membrane;
        self
    }

    /// Spring constant after the cross-sheet multiplier.
    pub fn effective_stiffness(&self) -> F {
        if self.membrane {
            self.stiffness * F::two()
        } else {
            self.stiffness
        }
    }

    /// Reject inverted distance limits.
    pub fn validate(&self) -> Result<()> {
        // NaN limits compare false both ways; reject them here as well.
        if !(self.min_distance <= self.max_distance) {
            return Err(PhysicsError::invalid("min_distance must not exceed max_distance"));
        }
        Ok(())
    }
}

impl<F: Float> Default for JointConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameter bundle shared by the nodes and joints of one scene.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationProfile<F: Float> {
    /// Mass of every membrane node. Default: 1.
    pub node_mass: F,
    /// In-sheet structural bonds.
    pub lipid_joint: JointConfig<F>,
    /// Bonds between the two sheets of a bilayer, and rupture stitches.
    pub membrane_joint: JointConfig<F>,
    /// Anchor-to-membrane bonds of the rupture rig.
    pub wrap_joint: JointConfig<F>,
}

impl<F: Float> SimulationProfile<F> {
    pub fn new() -> Self {
        SimulationProfile {
            node_mass: F::one(),
            lipid_joint: JointConfig::new(),
            membrane_joint: JointConfig::new().with_membrane(true),
            wrap_joint: JointConfig::new(),
        }
    }

    pub fn with_node_mass(mut self, mass: F) -> Self {
        self.node_mass = mass;
        self
    }

    pub fn with_lipid_joint(mut self, joint: JointConfig<F>) -> Self {
        self.lipid_joint = joint;
        self
    }

    pub fn with_membrane_joint(mut self, joint: JointConfig<F>) -> Self {
        self.membrane_joint = joint;
        self
    }

    pub fn with_wrap_joint(mut self, joint: JointConfig<F>) -> Self {
        self.wrap_joint = joint;
        self
    }
}

impl<F: Float> Default for SimulationProfile<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_limits_rejected() {
        let config = JointConfig::<f32>::new().with_distance_limits(2.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(PhysicsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn membrane_doubles_stiffness() {
        let config = JointConfig::<f64>::new().with_stiffness(3.0).with_membrane(true);
        assert_eq!(config.effective_stiffness(), 6.0);
    }

    #[test]
    fn defaults_are_unbounded() {
        let config = JointConfig::<f32>::default();
        assert!(config.validate().is_ok());
        assert!(!config.max_distance.is_finite());
        assert!(!config.break_length.is_finite());
    }
}
