//! Launch materialization.
//!
//! Splits a computed head closure out of its cluster: a new host launch
//! region is created immediately before the cluster, every data dependency
//! crossing the new boundary is rewired onto the launch's results, and the
//! closure operations are relocated into the launch body. Nothing is
//! deleted; relocated operations keep their IDs and result values.

use smallvec::SmallVec;

use skein_ir::{Module, OpId, OpKind, Ty, Use};

use crate::ordered::OrderedSet;
use crate::outputs::head_closure_outputs;

/// Hoist `closure` out of `cluster` into a fresh launch region.
///
/// Returns the launch operation, or `None` (leaving the module untouched)
/// when the closure is empty. The launch ends up positioned immediately
/// before the cluster, with one result per boundary output.
///
/// All redirection targets are computed before any mutation, and the
/// mutation sequence never exposes a value without a definition:
///
/// 1. create the launch with its result values;
/// 2. redirect escaping uses of each output to the matching launch result
///    (uses by closure operations stay internal wiring);
/// 3. append the launch terminator, returning the outputs in order;
/// 4. move each closure operation, in admission order, to just before the
///    terminator. Admission order is def-before-use: every operand of a
///    moved operation is either external to the cluster or the result of
///    an operation admitted earlier.
///
/// The terminator is created only after step 2 so that its own operands
/// keep referencing the hoisted operations' results.
pub fn isolate_head_closure(
    module: &mut Module,
    cluster: OpId,
    closure: &OrderedSet<OpId>,
) -> Option<OpId> {
    if closure.is_empty() {
        return None;
    }

    let outputs = head_closure_outputs(module, closure);
    let result_tys: Vec<Ty> = outputs
        .iter()
        .map(|&output| module.value(output).ty.clone())
        .collect();

    let launch = module.insert_op_before(cluster, OpKind::Launch, Vec::new(), &result_tys);
    let body = module.attach_body(launch);

    for (index, &output) in outputs.iter().enumerate() {
        let replacement = module.op(launch).results()[index];
        let uses: SmallVec<[Use; 4]> = SmallVec::from_slice(module.value(output).uses());
        for user in uses {
            if !closure.contains(&user.op) {
                module.set_operand(user.op, user.operand, replacement);
            }
        }
    }

    let terminator = module.push_op(body, OpKind::Return, outputs, &[]);
    for &op in closure {
        module.move_op_before(op, terminator);
    }

    Some(launch)
}
