//! Graph storage: values, operations, regions, and the module arena.
//!
//! # Architecture
//!
//! A [`Module`] owns three flat arenas (operations, values, regions) and
//! every cross-reference between them is a compact index handle:
//!
//! - **[`Value`]** — an SSA data-flow edge with exactly one definition
//!   ([`ValueDef`]), a type, and a use list.
//! - **[`Operation`]** — an ordered operand list, an ordered result list,
//!   an [`OpKind`], and at most one body region (clusters and launches).
//! - **[`Region`]** — an ordered operation sequence whose last operation is
//!   a [`OpKind::Return`] terminator yielding the region's outputs.
//!
//! # Invariants
//!
//! - A value's definition precedes all of its uses in program order.
//! - An operation lives in exactly one region at a time; relocation with
//!   [`Module::move_op_before`] transfers ownership without changing IDs.
//! - Use lists exactly mirror operand lists: `Use { op, operand }` is in
//!   `value.uses()` iff `module.op(op).operands()[operand]` is that value.
//!   All operand mutation must go through [`Module::set_operand`].
//!
//! Mutation never deletes: operations, values, and regions are created and
//! rewired, so IDs stay stable for the lifetime of the module.

use smallvec::SmallVec;

use crate::interner::{SharedInterner, StringInterner};
use crate::{Name, OpId, RegionId, Ty, ValueId};

/// What an operation is.
///
/// The host-eligibility marker is a typed field on [`OpKind::Compute`]
/// rather than a dynamic attribute: a marker that is absent or malformed
/// in the source graph simply becomes `false` at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Ordinary computation; `name` identifies the operator.
    Compute {
        name: Name,
        /// Marked to execute on the host processor rather than the
        /// accelerator the enclosing cluster targets.
        host_eligible: bool,
    },
    /// Accelerator cluster: owns a body region; its results mirror the
    /// body terminator's operands.
    Cluster,
    /// Host launch region, executed before the cluster it was split from.
    Launch,
    /// Region terminator; its operands become the region's outputs.
    Return,
}

/// Where a value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueDef {
    /// The `index`-th result of operation `op`.
    OpResult { op: OpId, index: u32 },
    /// The `index`-th input of the module (a graph feed).
    ModuleInput { index: u32 },
}

/// One use of a value: operand slot `operand` of operation `op`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Use {
    pub op: OpId,
    pub operand: u32,
}

/// An SSA data-flow edge.
#[derive(Clone, Debug)]
pub struct Value {
    pub ty: Ty,
    pub def: ValueDef,
    uses: Vec<Use>,
}

impl Value {
    /// Operations consuming this value, in first-recorded order.
    pub fn uses(&self) -> &[Use] {
        &self.uses
    }
}

/// A node in the computation graph.
#[derive(Clone, Debug)]
pub struct Operation {
    pub kind: OpKind,
    operands: Vec<ValueId>,
    results: SmallVec<[ValueId; 2]>,
    body: Option<RegionId>,
    parent: RegionId,
}

impl Operation {
    /// Ordered operand values.
    pub fn operands(&self) -> &[ValueId] {
        &self.operands
    }

    /// Ordered result values.
    pub fn results(&self) -> &[ValueId] {
        &self.results
    }

    /// Body region, for operations that own one (clusters, launches).
    pub fn body(&self) -> Option<RegionId> {
        self.body
    }

    /// The region this operation currently lives in.
    pub fn parent(&self) -> RegionId {
        self.parent
    }

    /// Whether this operation carries the host-eligibility marker.
    pub fn is_host_eligible(&self) -> bool {
        matches!(
            self.kind,
            OpKind::Compute {
                host_eligible: true,
                ..
            }
        )
    }

    /// Whether this operation terminates its region.
    pub fn is_terminator(&self) -> bool {
        matches!(self.kind, OpKind::Return)
    }
}

/// An ordered operation sequence.
#[derive(Clone, Debug)]
pub struct Region {
    /// The operation whose body this region is; `None` for the root.
    pub owner: Option<OpId>,
    ops: Vec<OpId>,
}

impl Region {
    /// Operations in program order.
    pub fn ops(&self) -> &[OpId] {
        &self.ops
    }
}

/// A whole computation graph: arenas plus the root region.
#[derive(Debug)]
pub struct Module {
    ops: Vec<Operation>,
    values: Vec<Value>,
    regions: Vec<Region>,
    inputs: Vec<ValueId>,
    root: RegionId,
    interner: SharedInterner,
}

impl Module {
    /// Create an empty module with a fresh interner.
    pub fn new() -> Self {
        Self::with_interner(StringInterner::shared())
    }

    /// Create an empty module sharing an existing name table.
    pub fn with_interner(interner: SharedInterner) -> Self {
        Self {
            ops: Vec::new(),
            values: Vec::new(),
            regions: vec![Region {
                owner: None,
                ops: Vec::new(),
            }],
            inputs: Vec::new(),
            root: RegionId::new(0),
            interner,
        }
    }

    /// The root region.
    pub fn root(&self) -> RegionId {
        self.root
    }

    /// The module's name table.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Intern an operator name.
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Module inputs in declaration order.
    pub fn inputs(&self) -> &[ValueId] {
        &self.inputs
    }

    /// Look up an operation.
    pub fn op(&self, id: OpId) -> &Operation {
        &self.ops[id.index()]
    }

    /// Look up a value.
    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id.index()]
    }

    /// Look up a region.
    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    /// Total number of operations ever created.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Declare a module input of the given type.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value and input counts are bounded by u32"
    )]
    pub fn add_input(&mut self, ty: Ty) -> ValueId {
        let id = ValueId::new(self.values.len() as u32);
        self.values.push(Value {
            ty,
            def: ValueDef::ModuleInput {
                index: self.inputs.len() as u32,
            },
            uses: Vec::new(),
        });
        self.inputs.push(id);
        id
    }

    /// Append a new operation at the end of `region`.
    ///
    /// Result values are created with the given types; operand use lists
    /// are registered.
    pub fn push_op(
        &mut self,
        region: RegionId,
        kind: OpKind,
        operands: Vec<ValueId>,
        result_tys: &[Ty],
    ) -> OpId {
        let id = self.new_op(region, kind, operands, result_tys);
        self.regions[region.index()].ops.push(id);
        id
    }

    /// Create a new operation immediately before `before`, in the same
    /// region.
    pub fn insert_op_before(
        &mut self,
        before: OpId,
        kind: OpKind,
        operands: Vec<ValueId>,
        result_tys: &[Ty],
    ) -> OpId {
        let region = self.ops[before.index()].parent;
        let id = self.new_op(region, kind, operands, result_tys);
        let ops = &mut self.regions[region.index()].ops;
        match ops.iter().position(|&o| o == before) {
            Some(pos) => ops.insert(pos, id),
            None => {
                debug_assert!(false, "insert_op_before: {before:?} not in its parent region");
                ops.push(id);
            }
        }
        id
    }

    /// Attach a fresh, empty body region to `op`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "region count is bounded by u32"
    )]
    pub fn attach_body(&mut self, op: OpId) -> RegionId {
        debug_assert!(
            self.ops[op.index()].body.is_none(),
            "attach_body: operation already owns a region"
        );
        let region = RegionId::new(self.regions.len() as u32);
        self.regions.push(Region {
            owner: Some(op),
            ops: Vec::new(),
        });
        self.ops[op.index()].body = Some(region);
        region
    }

    /// Append one more result of type `ty` to `op`.
    ///
    /// Used when an operation's result count is only known after its body
    /// has been built (cluster construction).
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value and result counts are bounded by u32"
    )]
    pub fn append_result(&mut self, op: OpId, ty: Ty) -> ValueId {
        let id = ValueId::new(self.values.len() as u32);
        let index = self.ops[op.index()].results.len() as u32;
        self.values.push(Value {
            ty,
            def: ValueDef::OpResult { op, index },
            uses: Vec::new(),
        });
        self.ops[op.index()].results.push(id);
        id
    }

    /// Rewire operand slot `slot` of `op` to reference `value`.
    ///
    /// Keeps both affected use lists exact.
    pub fn set_operand(&mut self, op: OpId, slot: u32, value: ValueId) {
        let old = self.ops[op.index()].operands[slot as usize];
        if old == value {
            return;
        }
        self.values[old.index()]
            .uses
            .retain(|u| !(u.op == op && u.operand == slot));
        self.ops[op.index()].operands[slot as usize] = value;
        self.values[value.index()].uses.push(Use { op, operand: slot });
    }

    /// Relocate `op` to immediately before `before`, transferring region
    /// ownership. A stable move: nothing else in either region is
    /// reordered, and `op` keeps its ID and result values.
    pub fn move_op_before(&mut self, op: OpId, before: OpId) {
        let from = self.ops[op.index()].parent;
        let Some(pos) = self.regions[from.index()].ops.iter().position(|&o| o == op) else {
            debug_assert!(false, "move_op_before: {op:?} not in its parent region");
            return;
        };
        self.regions[from.index()].ops.remove(pos);

        let to = self.ops[before.index()].parent;
        let ops = &mut self.regions[to.index()].ops;
        match ops.iter().position(|&o| o == before) {
            Some(bpos) => ops.insert(bpos, op),
            None => {
                debug_assert!(false, "move_op_before: {before:?} not in its parent region");
                ops.push(op);
            }
        }
        self.ops[op.index()].parent = to;
    }

    /// The region's terminator, if the region is properly terminated.
    pub fn terminator(&self, region: RegionId) -> Option<OpId> {
        let last = self.regions[region.index()].ops.last().copied()?;
        self.ops[last.index()].is_terminator().then_some(last)
    }

    /// The region in which `value` is defined.
    ///
    /// Module inputs are defined in the root region.
    pub fn defining_region(&self, value: ValueId) -> RegionId {
        match self.values[value.index()].def {
            ValueDef::OpResult { op, .. } => self.ops[op.index()].parent,
            ValueDef::ModuleInput { .. } => self.root,
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "op, value, and operand counts are bounded by u32"
    )]
    fn new_op(
        &mut self,
        parent: RegionId,
        kind: OpKind,
        operands: Vec<ValueId>,
        result_tys: &[Ty],
    ) -> OpId {
        let id = OpId::new(self.ops.len() as u32);
        for (slot, &operand) in operands.iter().enumerate() {
            self.values[operand.index()].uses.push(Use {
                op: id,
                operand: slot as u32,
            });
        }
        let mut results = SmallVec::new();
        for (index, ty) in result_tys.iter().enumerate() {
            let value = ValueId::new(self.values.len() as u32);
            self.values.push(Value {
                ty: ty.clone(),
                def: ValueDef::OpResult {
                    op: id,
                    index: index as u32,
                },
                uses: Vec::new(),
            });
            results.push(value);
        }
        self.ops.push(Operation {
            kind,
            operands,
            results,
            body: None,
            parent,
        });
        id
    }
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
