//! Pass failures.

use crate::device::DeviceError;

/// Why a hoisting pass aborted.
///
/// Per-cluster conditions are never errors: a cluster whose head closure
/// is empty is simply left alone. The only fatal condition is module-level
/// metadata being unavailable, which aborts before any cluster is touched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HoistError {
    #[error("device metadata resolution failed: {0}")]
    DeviceResolution(#[from] DeviceError),
}
