//! Host-prefix hoisting for the Skein compiler.
//!
//! Accelerator clusters sometimes begin with operations that are marked to
//! run on the host processor instead (string processing, shape bookkeeping,
//! anything the accelerator cannot execute). This crate finds the maximal
//! data-closed prefix of such operations at the front of each cluster and
//! splits it into a launch region that executes before the shrunken
//! cluster, rewiring every data dependency that crosses the new boundary.
//! The same head-extraction structure appears in accelerator bridges such
//! as XLA's outside compilation.
//!
//! # Pipeline
//!
//! ```text
//! graph builder → **hoist host prefix** → placement → codegen
//! ```
//!
//! Per cluster: [`collect_head_closure`] computes the hoistable set,
//! [`head_closure_outputs`] decides which values must cross the boundary,
//! and [`isolate_head_closure`] materializes the launch and relocates the
//! operations. [`HoistHostPrefix`] drives all three over every cluster in
//! a module and is run from a [`PassPipeline`].
//!
//! The rewrite is idempotent and deterministic: re-running it on its own
//! output changes nothing, and identical inputs produce byte-identical
//! printed modules.

mod closure;
mod device;
mod error;
mod extract;
mod ordered;
mod outputs;
mod pass;

#[cfg(test)]
mod test_helpers;

pub use closure::{collect_head_closure, is_extractable};
pub use device::{
    DeviceDescriptor, DeviceError, DeviceKind, DeviceResolver, StaticDeviceResolver,
};
pub use error::HoistError;
pub use extract::isolate_head_closure;
pub use ordered::OrderedSet;
pub use outputs::head_closure_outputs;
pub use pass::{HoistHostPrefix, ModulePass, PassPipeline};
