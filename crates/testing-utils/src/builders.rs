//! Builders for worker descriptors with test defaults.

use omnihive_foundation::{CapabilityType, Section, WorkerDescriptor};
use serde_json::Value;

/// Builds a [`WorkerDescriptor`]. Defaults to an enabled core cache worker
/// with class ref `mock` and empty metadata.
pub struct DescriptorBuilder {
    descriptor: WorkerDescriptor,
}

impl DescriptorBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            descriptor: WorkerDescriptor::new(name, CapabilityType::Cache, "mock"),
        }
    }

    pub fn capability(mut self, capability: CapabilityType) -> Self {
        self.descriptor.capability = capability;
        self
    }

    pub fn class_ref(mut self, class_ref: &str) -> Self {
        self.descriptor.class_ref = class_ref.to_string();
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.descriptor.metadata = metadata;
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.descriptor.section = section;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.descriptor.enabled = false;
        self
    }

    pub fn build(self) -> WorkerDescriptor {
        self.descriptor
    }
}
