//! Shared region analysis utilities.
//!
//! Generic queries over [`Module`] that more than one pass needs. They live
//! here rather than in a specific pass crate so that passes do not import
//! from each other.

use rustc_hash::FxHashSet;

use crate::graph::{Module, OpKind};
use crate::{OpId, RegionId, ValueId};

/// Values defined outside `region` but used by an operation directly
/// inside it, in first-encountered order, deduplicated.
///
/// Operations reference outer values directly (no block arguments), so a
/// region's external inputs are exactly its free values. Order follows
/// program order of the consuming operations and their operand slots,
/// which makes the result reproducible across runs.
pub fn captured_inputs(module: &Module, region: RegionId) -> Vec<ValueId> {
    let mut seen = FxHashSet::default();
    let mut captured = Vec::new();
    for &op in module.region(region).ops() {
        for &operand in module.op(op).operands() {
            if module.defining_region(operand) != region && seen.insert(operand) {
                captured.push(operand);
            }
        }
    }
    captured
}

/// All cluster operations in the module, outermost first.
///
/// Walks every region reachable from the root. Callers snapshot this list
/// before mutating, so rewrites cannot invalidate the traversal.
pub fn clusters(module: &Module) -> Vec<OpId> {
    let mut found = Vec::new();
    let mut pending = vec![module.root()];
    while let Some(region) = pending.pop() {
        for &op in module.region(region).ops() {
            if matches!(module.op(op).kind, OpKind::Cluster) {
                found.push(op);
            }
            if let Some(body) = module.op(op).body() {
                pending.push(body);
            }
        }
    }
    found
}
