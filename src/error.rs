//! Error types for topology construction.

use thiserror::Error;

/// Errors raised while building nodes, joints and topologies.
///
/// Stepping never fails: joint breaks and zero-length bonds are modelled
/// state, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// A construction parameter is outside its valid domain.
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: &'static str },
    /// A node or grid index does not refer to a registered node.
    #[error("index {index} out of range (count: {count})")]
    OutOfRange { index: usize, count: usize },
}

impl PhysicsError {
    pub(crate) fn invalid(reason: &'static str) -> Self {
        PhysicsError::InvalidParameter { reason }
    }
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, PhysicsError>;
