//! Runtime device metadata.
//!
//! Hoisting only needs to know that device metadata *exists* for the
//! module being compiled: a module with no resolvable devices cannot be
//! placed at all, so the pass refuses to run. The descriptors themselves
//! are opaque to the pass; concrete placement (assigning a host device
//! name to each launch) happens later in the pipeline.

use skein_ir::Module;

/// What a device can execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// General-purpose host processor.
    Host,
    /// The accelerator clusters are compiled for.
    Accelerator,
}

/// One device known to the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub name: String,
    pub kind: DeviceKind,
}

impl DeviceDescriptor {
    pub fn new(name: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Failure to obtain device metadata for a module.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("no devices registered for module")]
    NoDevices,
    #[error("device metadata lookup failed: {reason}")]
    Lookup { reason: String },
}

/// Source of runtime device metadata.
///
/// Implementations are constructed by the embedder and handed to the
/// passes that need them; there is no global device registry.
pub trait DeviceResolver {
    /// Devices available to `module`, or why they could not be determined.
    fn devices(&self, module: &Module) -> Result<Vec<DeviceDescriptor>, DeviceError>;
}

/// Resolver backed by a fixed device list.
///
/// An empty list resolves to [`DeviceError::NoDevices`], which makes the
/// default value a convenient always-failing resolver for tests.
#[derive(Clone, Debug, Default)]
pub struct StaticDeviceResolver {
    devices: Vec<DeviceDescriptor>,
}

impl StaticDeviceResolver {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self { devices }
    }

    /// One host plus one accelerator, the minimal useful topology.
    pub fn host_and_accelerator() -> Self {
        Self::new(vec![
            DeviceDescriptor::new("cpu:0", DeviceKind::Host),
            DeviceDescriptor::new("accel:0", DeviceKind::Accelerator),
        ])
    }
}

impl DeviceResolver for StaticDeviceResolver {
    fn devices(&self, _module: &Module) -> Result<Vec<DeviceDescriptor>, DeviceError> {
        if self.devices.is_empty() {
            return Err(DeviceError::NoDevices);
        }
        Ok(self.devices.clone())
    }
}
