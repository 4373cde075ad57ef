//! Deterministic textual form of a module.
//!
//! Values print as `%N` using their arena indices, which are stable under
//! every rewrite the passes perform (nothing is deleted or renumbered).
//! Two structurally identical modules therefore print byte-identically,
//! which is what the pass tests diff. This is a debugging format, not a
//! parseable wire format.

use std::fmt::{self, Write};

use crate::graph::{Module, OpKind};
use crate::{OpId, RegionId, ValueId};

/// Render the whole module as text.
pub fn print_module(module: &Module) -> String {
    let mut out = String::new();
    write_module(&mut out, module).ok();
    out
}

fn write_module(out: &mut String, module: &Module) -> fmt::Result {
    out.push_str("module {\n");
    for &input in module.inputs() {
        writeln!(
            out,
            "  %{} = input : {}",
            input.raw(),
            module.value(input).ty
        )?;
    }
    write_region_body(out, module, module.root(), 1)?;
    out.push_str("}\n");
    Ok(())
}

fn write_region_body(
    out: &mut String,
    module: &Module,
    region: RegionId,
    depth: usize,
) -> fmt::Result {
    for &op in module.region(region).ops() {
        write_op(out, module, op, depth)?;
    }
    Ok(())
}

fn write_op(out: &mut String, module: &Module, op: OpId, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    let operation = module.op(op);
    out.push_str(&indent);
    if !operation.results().is_empty() {
        write_value_list(out, operation.results())?;
        out.push_str(" = ");
    }
    match operation.kind {
        OpKind::Compute {
            name,
            host_eligible,
        } => {
            if host_eligible {
                out.push_str("host ");
            }
            out.push_str(&module.interner().resolve(name));
            out.push('(');
            write_value_list(out, operation.operands())?;
            out.push(')');
            write_result_tys(out, module, operation.results())?;
            out.push('\n');
        }
        OpKind::Cluster | OpKind::Launch => {
            out.push_str(match operation.kind {
                OpKind::Cluster => "cluster {\n",
                _ => "launch {\n",
            });
            if let Some(body) = operation.body() {
                write_region_body(out, module, body, depth + 1)?;
            }
            out.push_str(&indent);
            out.push('}');
            write_result_tys(out, module, operation.results())?;
            out.push('\n');
        }
        OpKind::Return => {
            out.push_str("return");
            if !operation.operands().is_empty() {
                out.push(' ');
                write_value_list(out, operation.operands())?;
            }
            out.push('\n');
        }
    }
    Ok(())
}

fn write_value_list(out: &mut String, values: &[ValueId]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write!(out, "%{}", value.raw())?;
    }
    Ok(())
}

fn write_result_tys(out: &mut String, module: &Module, results: &[ValueId]) -> fmt::Result {
    if results.is_empty() {
        return Ok(());
    }
    out.push_str(" : ");
    for (i, &result) in results.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write!(out, "{}", module.value(result).ty)?;
    }
    Ok(())
}
