//! Boundary outputs of a head closure.

use skein_ir::{Module, OpId, ValueId};

use crate::ordered::OrderedSet;

/// Values the closure must expose once it is hoisted.
///
/// For each closure operation in admission order: if any of its results is
/// consumed by an operation outside the closure, **all** of its results are
/// appended. The cut is made at operation granularity, not per result, so
/// a multi-result operation exports everything as soon as one result
/// escapes.
pub fn head_closure_outputs(module: &Module, closure: &OrderedSet<OpId>) -> Vec<ValueId> {
    let mut outputs = Vec::new();
    for &op in closure {
        let escapes = module.op(op).results().iter().any(|&result| {
            module
                .value(result)
                .uses()
                .iter()
                .any(|user| !closure.contains(&user.op))
        });
        if escapes {
            outputs.extend_from_slice(module.op(op).results());
        }
    }
    outputs
}

#[cfg(test)]
mod tests {
    use skein_ir::ModuleBuilder;

    use crate::closure::collect_head_closure;
    use crate::test_helpers::{chain_module, escape_module, only_cluster, t4};

    use super::head_closure_outputs;

    #[test]
    fn only_escaping_values_are_exposed() {
        let m = chain_module();
        let cluster = only_cluster(&m);
        let closure = collect_head_closure(&m, cluster);
        let outputs = head_closure_outputs(&m, &closure);

        // Of cast → pad → tile, only tile's result feeds the matmul left
        // behind; the inner chain wiring stays private.
        assert_eq!(outputs.len(), 1);
        let tile = closure.as_slice()[2];
        assert_eq!(outputs[0], m.op(tile).results()[0]);
    }

    #[test]
    fn escaping_op_exports_all_results() {
        let m = escape_module();
        let cluster = only_cluster(&m);
        let closure = collect_head_closure(&m, cluster);
        let outputs = head_closure_outputs(&m, &closure);

        // split escapes through its second result, so both halves are
        // exported, followed by neg's escaping result.
        let split = closure.as_slice()[0];
        let neg = closure.as_slice()[1];
        assert_eq!(
            outputs,
            vec![
                m.op(split).results()[0],
                m.op(split).results()[1],
                m.op(neg).results()[0],
            ]
        );
    }

    #[test]
    fn unused_results_produce_no_outputs() {
        let mut b = ModuleBuilder::new();
        let x = b.input(t4());
        b.begin_cluster();
        let _side = b.host("checksum", &[x], t4());
        let y = b.compute("mul", &[x, x], t4());
        let outs = b.end_cluster(&[y]);
        b.ret(&outs);
        let m = b.finish();

        let cluster = only_cluster(&m);
        let closure = collect_head_closure(&m, cluster);
        assert_eq!(closure.len(), 1);
        assert!(head_closure_outputs(&m, &closure).is_empty());
    }
}
