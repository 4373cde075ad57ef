//! Module passes and the pipeline that runs them.
//!
//! Passes are plain values implementing [`ModulePass`], constructed by the
//! embedder and handed to a [`PassPipeline`]; there is no registry and no
//! static pass state. The pipeline runs passes in the order they were
//! added and stops at the first failure.

use skein_ir::analysis::clusters;
use skein_ir::Module;

use crate::closure::collect_head_closure;
use crate::device::DeviceResolver;
use crate::error::HoistError;
use crate::extract::isolate_head_closure;

/// A whole-module transformation.
pub trait ModulePass {
    /// Stable name, for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Transform `module` in place.
    fn run(&self, module: &mut Module) -> Result<(), HoistError>;
}

/// An ordered sequence of module passes.
#[derive(Default)]
pub struct PassPipeline {
    passes: Vec<Box<dyn ModulePass>>,
}

impl PassPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass to the end of the pipeline.
    pub fn with_pass(mut self, pass: impl ModulePass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Run every pass in order, stopping at the first failure.
    pub fn run(&self, module: &mut Module) -> Result<(), HoistError> {
        for pass in &self.passes {
            tracing::debug!(pass = pass.name(), "running module pass");
            pass.run(module)?;
        }
        Ok(())
    }
}

/// Hoists host-eligible prefixes out of every accelerator cluster.
///
/// For each cluster in the module: compute the head closure, determine its
/// boundary outputs, and split it into a launch region executing before
/// the shrunken cluster. Clusters are independent; a cluster with an empty
/// closure is left untouched.
///
/// Device metadata is resolved once per module before any cluster is
/// processed. If resolution fails the pass aborts with the module
/// unmodified.
pub struct HoistHostPrefix<R> {
    resolver: R,
}

impl<R: DeviceResolver> HoistHostPrefix<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: DeviceResolver> ModulePass for HoistHostPrefix<R> {
    fn name(&self) -> &'static str {
        "hoist-host-prefix"
    }

    fn run(&self, module: &mut Module) -> Result<(), HoistError> {
        let devices = self.resolver.devices(module)?;
        tracing::debug!(devices = devices.len(), "resolved runtime device metadata");

        for cluster in clusters(module) {
            let closure = collect_head_closure(module, cluster);
            if let Some(launch) = isolate_head_closure(module, cluster, &closure) {
                tracing::debug!(
                    cluster = cluster.raw(),
                    launch = launch.raw(),
                    hoisted = closure.len(),
                    "hoisted host prefix ahead of cluster"
                );
            }
        }
        Ok(())
    }
}
