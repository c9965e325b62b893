//! Step observer trait for monitoring soft-body simulation progress.

use crate::joint::JointId;
use crate::vec::Vec;

/// Trait for observing soft-body steps.
///
/// Implement this trait to monitor solver progress (debug drawing, break
/// statistics, profiling). All methods have default no-op implementations.
pub trait StepObserver<V: Vec> {
    /// Called after force fields and joint forces were accumulated.
    fn on_forces(&mut self, _substep: usize) {}

    /// Called after every node was integrated.
    fn on_integrate(&mut self, _substep: usize) {}

    /// Called after the constraint projection pass.
    fn on_projection(&mut self, _substep: usize) {}

    /// Called the moment a joint exceeds its break length.
    fn on_joint_broken(&mut self, _joint: JointId) {}

    /// Called once per enabled joint after a tick, only while the body's
    /// debug flag is set.
    fn on_debug_segment(&mut self, _a: V, _b: V) {}

    /// End of the tick, after velocities were recovered for the last substep.
    fn on_step_complete(&mut self) {}
}

/// Observer used by [`SoftBody::step`](crate::SoftBody::step).
pub struct NoOpStepObserver;

impl<V: Vec> StepObserver<V> for NoOpStepObserver {}
