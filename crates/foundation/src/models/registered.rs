use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::descriptor::{Section, WorkerDescriptor};
use crate::traits::{Capability, CapabilityType, WorkerHandle};

/// Per-worker position in the startup state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Unconstructed,
    Constructed,
    Initialized,
    Registered,
    AfterInitDone,
    Failed,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkerState::Unconstructed => "unconstructed",
            WorkerState::Constructed => "constructed",
            WorkerState::Initialized => "initialized",
            WorkerState::Registered => "registered",
            WorkerState::AfterInitDone => "after_init_done",
            WorkerState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Runtime record of an initialized worker, owned by the registry.
#[derive(Debug, Clone)]
pub struct RegisteredWorker {
    pub descriptor: WorkerDescriptor,
    pub handle: WorkerHandle,
    pub section: Section,
    pub instance_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

impl RegisteredWorker {
    pub fn new(descriptor: WorkerDescriptor, handle: WorkerHandle) -> Self {
        Self {
            section: descriptor.section,
            descriptor,
            handle,
            instance_id: Uuid::new_v4(),
            registered_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn capability(&self) -> CapabilityType {
        self.descriptor.capability
    }

    /// Typed view of the instance, `None` when the capability differs.
    pub fn as_capability<C>(&self) -> Option<Arc<C>>
    where
        C: Capability + ?Sized,
    {
        C::from_handle(&self.handle)
    }
}
