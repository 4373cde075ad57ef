//! Head closure computation.
//!
//! Finds the maximal set of host-eligible operations sitting at the front
//! of an accelerator cluster: operations reachable from the cluster's
//! captured inputs through a chain of host-eligible operations only. This
//! set is data-closed by construction, so it can execute on the host before
//! the cluster runs.
//!
//! # Algorithm
//!
//! Monotone fixed-point over the cluster body's def/use edges:
//!
//! 1. **Covered values** `S` start as the cluster's captured inputs (values
//!    the body consumes but does not define).
//! 2. For each captured input in order, admit its eligible users as the
//!    initial frontier; an admitted operation's results join `S`
//!    immediately, so later candidates in the same wave see them.
//! 3. **Wave expansion**: users of the freshly admitted results are tested
//!    against the updated `S`; the wave repeats until no operation is
//!    admitted.
//!
//! `S` only grows and the operation count is finite, so the iteration
//! terminates. All iteration follows use-list order, so the admitted order
//! (and therefore launch output order downstream) is reproducible.
//!
//! Operations already hoisted out of the cluster are not candidates: only
//! users still inside the cluster body are considered, which is what makes
//! the rewrite idempotent.

use smallvec::SmallVec;

use skein_ir::analysis::captured_inputs;
use skein_ir::{Module, OpId, RegionId, Use, ValueId};

use crate::ordered::OrderedSet;

/// Can `op` join the extracted set, given the values currently known to
/// the host side?
///
/// True iff the operation carries the host-eligibility marker and every
/// operand is already covered. Pure test, no side effects.
pub fn is_extractable(module: &Module, op: OpId, covered: &OrderedSet<ValueId>) -> bool {
    module.op(op).is_host_eligible()
        && module
            .op(op)
            .operands()
            .iter()
            .all(|operand| covered.contains(operand))
}

/// Compute the head closure of `cluster`.
///
/// Returns the admitted operations in admission order. Empty when the
/// cluster has no host-eligible operations at its front.
pub fn collect_head_closure(module: &Module, cluster: OpId) -> OrderedSet<OpId> {
    let mut closure = OrderedSet::new();
    let Some(body) = module.op(cluster).body() else {
        return closure;
    };

    let inputs = captured_inputs(module, body);
    let mut covered = OrderedSet::new();
    for &input in &inputs {
        covered.insert(input);
    }

    for &input in &inputs {
        grow_from_value(module, body, input, &mut covered, &mut closure);
    }

    tracing::debug!(
        cluster = cluster.raw(),
        inputs = inputs.len(),
        admitted = closure.len(),
        "collected head closure"
    );
    closure
}

/// Expand the closure wave by wave, starting from the users of `seed`.
fn grow_from_value(
    module: &Module,
    body: RegionId,
    seed: ValueId,
    covered: &mut OrderedSet<ValueId>,
    closure: &mut OrderedSet<OpId>,
) {
    let mut frontier = admit_users(module, body, module.value(seed).uses(), covered, closure);
    while !frontier.is_empty() {
        let mut next = SmallVec::new();
        for &op in &frontier {
            for &result in module.op(op).results() {
                next.extend(admit_users(
                    module,
                    body,
                    module.value(result).uses(),
                    covered,
                    closure,
                ));
            }
        }
        frontier = next;
    }
}

/// Test each user against the eligibility predicate, admitting those that
/// pass. An admitted operation's results are covered immediately.
fn admit_users(
    module: &Module,
    body: RegionId,
    uses: &[Use],
    covered: &mut OrderedSet<ValueId>,
    closure: &mut OrderedSet<OpId>,
) -> SmallVec<[OpId; 4]> {
    let mut admitted = SmallVec::new();
    for user in uses {
        let op = user.op;
        // Only operations still inside the cluster body are candidates.
        if module.op(op).parent() != body || closure.contains(&op) {
            continue;
        }
        if is_extractable(module, op, covered) {
            closure.insert(op);
            for &result in module.op(op).results() {
                covered.insert(result);
            }
            admitted.push(op);
        }
    }
    admitted
}
