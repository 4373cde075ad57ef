//! Shared test fixtures for the hoisting passes.
//!
//! Builds the small cluster shapes the closure, output, extraction, and
//! driver tests all exercise. Only compiled in test builds.

use skein_ir::analysis::clusters;
use skein_ir::{DType, Module, ModuleBuilder, OpId, RegionId, Ty};

pub(crate) fn t4() -> Ty {
    Ty::tensor(DType::F32, &[4])
}

/// The module's single cluster operation.
pub(crate) fn only_cluster(module: &Module) -> OpId {
    let found = clusters(module);
    assert_eq!(found.len(), 1, "fixture must contain exactly one cluster");
    found[0]
}

/// Body region of a cluster operation.
pub(crate) fn body_of(module: &Module, cluster: OpId) -> RegionId {
    let Some(body) = module.op(cluster).body() else {
        panic!("cluster has no body region");
    };
    body
}

/// Operations in a cluster body, in program order.
pub(crate) fn body_ops(module: &Module, cluster: OpId) -> Vec<OpId> {
    module.region(body_of(module, cluster)).ops().to_vec()
}

/// One eligible head op feeding a device op that also reads the input:
///
/// ```text
/// cluster { h = host scale(x); y = matmul(h, x); return y }
/// ```
pub(crate) fn single_head_module() -> Module {
    let mut b = ModuleBuilder::new();
    let x = b.input(t4());
    b.begin_cluster();
    let h = b.host("scale", &[x], t4());
    let y = b.compute("matmul", &[h, x], t4());
    let outs = b.end_cluster(&[y]);
    b.ret(&outs);
    b.finish()
}

/// Three chained eligible ops ahead of a device op:
///
/// ```text
/// cluster { a = host cast(x); b = host pad(a); c = host tile(b);
///           d = matmul(c, c); return d }
/// ```
pub(crate) fn chain_module() -> Module {
    let mut b = ModuleBuilder::new();
    let x = b.input(t4());
    b.begin_cluster();
    let a = b.host("cast", &[x], t4());
    let c = b.host("pad", &[a], t4());
    let d = b.host("tile", &[c], t4());
    let e = b.compute("matmul", &[d, d], t4());
    let outs = b.end_cluster(&[e]);
    b.ret(&outs);
    b.finish()
}

/// A cluster with no host-eligibility markers at all.
pub(crate) fn unmarked_module() -> Module {
    let mut b = ModuleBuilder::new();
    let x = b.input(t4());
    b.begin_cluster();
    let y = b.compute("mul", &[x, x], t4());
    let outs = b.end_cluster(&[y]);
    b.ret(&outs);
    b.finish()
}

/// An unmarked ancestor blocking an eligible descendant:
///
/// ```text
/// cluster { a = mul(x, x); b = host relu(a); return b }
/// ```
pub(crate) fn blocked_module() -> Module {
    let mut b = ModuleBuilder::new();
    let x = b.input(t4());
    b.begin_cluster();
    let a = b.compute("mul", &[x, x], t4());
    let r = b.host("relu", &[a], t4());
    let outs = b.end_cluster(&[r]);
    b.ret(&outs);
    b.finish()
}

/// A two-result eligible op with one result consumed inside the closure
/// and the other escaping to a device op:
///
/// ```text
/// cluster { lo, hi = host split(x); n = host neg(lo);
///           k = mul(hi, n); return k }
/// ```
pub(crate) fn escape_module() -> Module {
    let mut b = ModuleBuilder::new();
    let x = b.input(t4());
    b.begin_cluster();
    let halves = b.host_multi(
        "split",
        &[x],
        &[Ty::tensor(DType::F32, &[2]), Ty::tensor(DType::F32, &[2])],
    );
    let n = b.host("neg", &[halves[0]], Ty::tensor(DType::F32, &[2]));
    let k = b.compute("mul", &[halves[1], n], Ty::tensor(DType::F32, &[2]));
    let outs = b.end_cluster(&[k]);
    b.ret(&outs);
    b.finish()
}

/// Two independent clusters, each with an eligible head op.
pub(crate) fn two_cluster_module() -> Module {
    let mut b = ModuleBuilder::new();
    let x = b.input(t4());
    b.begin_cluster();
    let h0 = b.host("cast", &[x], t4());
    let y0 = b.compute("matmul", &[h0, h0], t4());
    let first = b.end_cluster(&[y0]);
    b.begin_cluster();
    let h1 = b.host("pad", &[first[0]], t4());
    let y1 = b.compute("matmul", &[h1, h1], t4());
    let second = b.end_cluster(&[y1]);
    b.ret(&second);
    b.finish()
}
