//! Shortcuts for tests that need ready-made registry entries.

use crate::builders::DescriptorBuilder;
use crate::mocks::{CallJournal, MockBehavior, MockWorker};
use omnihive_foundation::{CapabilityType, HiveResult, RegisteredWorker};

/// Constructs and initializes a default mock, bypassing the factory.
pub async fn initialized_worker(
    journal: &CallJournal,
    name: &str,
    capability: CapabilityType,
) -> HiveResult<RegisteredWorker> {
    initialized_worker_with(journal, name, capability, MockBehavior::default()).await
}

pub async fn initialized_worker_with(
    journal: &CallJournal,
    name: &str,
    capability: CapabilityType,
    behavior: MockBehavior,
) -> HiveResult<RegisteredWorker> {
    let descriptor = DescriptorBuilder::new(name).capability(capability).build();
    let mut pending = MockWorker::new(journal.clone())
        .with_behavior(behavior)
        .into_pending(capability);
    pending.init(name, &descriptor.metadata).await?;
    Ok(RegisteredWorker::new(descriptor, pending.into_handle()))
}
