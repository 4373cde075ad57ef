//! Module construction.
//!
//! [`ModuleBuilder`] follows the usual "position at a region, emit
//! operations, terminate" shape: `begin_cluster` opens an accelerator
//! cluster body, `end_cluster` terminates it and materializes the cluster's
//! results, and `ret` terminates whatever region is current. The builder is
//! the only way graphs are produced; transformation passes mutate the
//! finished [`Module`] directly.

use smallvec::SmallVec;

use crate::graph::{Module, OpKind};
use crate::{OpId, RegionId, Ty, ValueId};

/// Incremental builder for a [`Module`].
pub struct ModuleBuilder {
    module: Module,
    /// Region nesting: root at the bottom, innermost open cluster on top.
    scopes: Vec<RegionId>,
}

impl ModuleBuilder {
    /// Start building a module with a fresh interner.
    pub fn new() -> Self {
        let module = Module::new();
        let root = module.root();
        Self {
            module,
            scopes: vec![root],
        }
    }

    fn current(&self) -> RegionId {
        self.scopes.last().copied().unwrap_or_else(|| self.module.root())
    }

    /// Declare a module input of the given type.
    pub fn input(&mut self, ty: Ty) -> ValueId {
        self.module.add_input(ty)
    }

    /// Emit a single-result computation.
    pub fn compute(&mut self, name: &str, operands: &[ValueId], ty: Ty) -> ValueId {
        let op = self.emit(name, false, operands, &[ty]);
        self.module.op(op).results()[0]
    }

    /// Emit a single-result computation carrying the host-eligibility marker.
    pub fn host(&mut self, name: &str, operands: &[ValueId], ty: Ty) -> ValueId {
        let op = self.emit(name, true, operands, &[ty]);
        self.module.op(op).results()[0]
    }

    /// Emit a multi-result computation.
    pub fn compute_multi(
        &mut self,
        name: &str,
        operands: &[ValueId],
        result_tys: &[Ty],
    ) -> SmallVec<[ValueId; 2]> {
        let op = self.emit(name, false, operands, result_tys);
        SmallVec::from_slice(self.module.op(op).results())
    }

    /// Emit a multi-result computation carrying the host-eligibility marker.
    pub fn host_multi(
        &mut self,
        name: &str,
        operands: &[ValueId],
        result_tys: &[Ty],
    ) -> SmallVec<[ValueId; 2]> {
        let op = self.emit(name, true, operands, result_tys);
        SmallVec::from_slice(self.module.op(op).results())
    }

    /// Open an accelerator cluster in the current region.
    ///
    /// Operations emitted until the matching [`end_cluster`](Self::end_cluster)
    /// land in the cluster's body.
    pub fn begin_cluster(&mut self) -> OpId {
        let op = self
            .module
            .push_op(self.current(), OpKind::Cluster, Vec::new(), &[]);
        let body = self.module.attach_body(op);
        self.scopes.push(body);
        op
    }

    /// Terminate the innermost open cluster.
    ///
    /// `outputs` become the body terminator's operands; the cluster grows
    /// one result per output, with matching types. Returns those results.
    pub fn end_cluster(&mut self, outputs: &[ValueId]) -> SmallVec<[ValueId; 2]> {
        debug_assert!(self.scopes.len() > 1, "end_cluster without begin_cluster");
        let Some(body) = self.scopes.pop() else {
            return SmallVec::new();
        };
        self.module
            .push_op(body, OpKind::Return, outputs.to_vec(), &[]);
        let Some(cluster) = self.module.region(body).owner else {
            debug_assert!(false, "cluster body region has no owner");
            return SmallVec::new();
        };
        let mut results = SmallVec::new();
        for &output in outputs {
            let ty = self.module.value(output).ty.clone();
            results.push(self.module.append_result(cluster, ty));
        }
        results
    }

    /// Terminate the current region with `return values...`.
    pub fn ret(&mut self, values: &[ValueId]) {
        self.module
            .push_op(self.current(), OpKind::Return, values.to_vec(), &[]);
    }

    /// Finish building.
    pub fn finish(self) -> Module {
        debug_assert!(self.scopes.len() == 1, "finish with an open cluster");
        self.module
    }

    fn emit(&mut self, name: &str, host_eligible: bool, operands: &[ValueId], tys: &[Ty]) -> OpId {
        let name = self.module.intern(name);
        self.module.push_op(
            self.current(),
            OpKind::Compute {
                name,
                host_eligible,
            },
            operands.to_vec(),
            tys,
        )
    }
}

impl Default for ModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DType;

    fn t4() -> Ty {
        Ty::tensor(DType::F32, &[4])
    }

    #[test]
    fn cluster_results_mirror_outputs() {
        let mut b = ModuleBuilder::new();
        let x = b.input(t4());
        let cluster = b.begin_cluster();
        let y = b.compute("mul", &[x, x], t4());
        let outs = b.end_cluster(&[y]);
        b.ret(&outs);
        let m = b.finish();

        assert_eq!(m.op(cluster).results(), outs.as_slice());
        assert_eq!(m.value(outs[0]).ty, t4());
        let Some(body) = m.op(cluster).body() else {
            panic!("cluster has no body");
        };
        let Some(term) = m.terminator(body) else {
            panic!("cluster body not terminated");
        };
        assert_eq!(m.op(term).operands(), &[y]);
    }

    #[test]
    fn host_marker_lands_on_kind() {
        let mut b = ModuleBuilder::new();
        let x = b.input(t4());
        let h = b.host("relu", &[x], t4());
        let p = b.compute("neg", &[x], t4());
        let m = b.finish();

        let crate::ValueDef::OpResult { op: h_op, .. } = m.value(h).def else {
            panic!("result must be op-defined");
        };
        let crate::ValueDef::OpResult { op: p_op, .. } = m.value(p).def else {
            panic!("result must be op-defined");
        };
        assert!(m.op(h_op).is_host_eligible());
        assert!(!m.op(p_op).is_host_eligible());
    }
}
