//! Capability vocabulary
//!
//! Each capability is an async trait extending [`HiveWorker`]. The
//! `capability_set!` invocation at the bottom of this module ties every
//! capability to a [`CapabilityType`] tag and generates the two instance
//! wrappers used by the lifecycle:
//!
//! - [`PendingWorker`]: a constructed, exclusively owned worker awaiting `init`;
//! - [`WorkerHandle`]: the shared handle stored in the registry once `init`
//!   succeeded.

mod endpoint;
mod messaging;
mod security;
mod storage;
mod support;

pub use endpoint::{
    GraphEndpointWorker, RestEndpointResponse, RestEndpointWorker, ServerWorker,
    TaskEndpointWorker,
};
pub use messaging::{
    ErrorWorker, HiveLogLevel, LogWorker, PubSubCallback, PubSubClientWorker, PubSubListener,
    PubSubServerWorker,
};
pub use security::{AuthUser, EncryptionWorker, TokenWorker, UserWorker};
pub use storage::{CacheWorker, DatabaseWorker, FileSystemWorker};
pub use support::{ConfigWorker, DateWorker, FeatureWorker};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::worker::{Capability, HiveWorker, WorkerLookup};
use crate::{HiveError, HiveResult};

macro_rules! capability_set {
    ($($variant:ident => $worker:ident : $label:literal),+ $(,)?) => {
        /// Capability tag of a worker.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum CapabilityType {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl CapabilityType {
            pub const ALL: &'static [CapabilityType] = &[$(CapabilityType::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(CapabilityType::$variant => $label,)+
                }
            }
        }

        /// Constructed worker that has not been initialized yet.
        pub enum PendingWorker {
            $($variant(Box<dyn $worker>),)+
        }

        impl PendingWorker {
            pub fn capability(&self) -> CapabilityType {
                match self {
                    $(PendingWorker::$variant(_) => CapabilityType::$variant,)+
                }
            }

            pub async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()> {
                match self {
                    $(PendingWorker::$variant(worker) => worker.init(name, metadata).await,)+
                }
            }

            pub fn into_handle(self) -> WorkerHandle {
                match self {
                    $(PendingWorker::$variant(worker) => WorkerHandle::$variant(Arc::from(worker)),)+
                }
            }
        }

        /// Shared handle to an initialized worker.
        #[derive(Clone)]
        pub enum WorkerHandle {
            $($variant(Arc<dyn $worker>),)+
        }

        impl WorkerHandle {
            pub fn capability(&self) -> CapabilityType {
                match self {
                    $(WorkerHandle::$variant(_) => CapabilityType::$variant,)+
                }
            }

            pub fn name(&self) -> &str {
                match self {
                    $(WorkerHandle::$variant(worker) => worker.name(),)+
                }
            }

            pub fn metadata(&self) -> &Value {
                match self {
                    $(WorkerHandle::$variant(worker) => worker.metadata(),)+
                }
            }

            pub async fn after_init(&self, lookup: &dyn WorkerLookup) -> HiveResult<()> {
                match self {
                    $(WorkerHandle::$variant(worker) => worker.after_init(lookup).await,)+
                }
            }

            pub async fn dispose(&self) -> HiveResult<()> {
                match self {
                    $(WorkerHandle::$variant(worker) => worker.dispose().await,)+
                }
            }

        }

        $(
            impl Capability for dyn $worker {
                const TYPE: CapabilityType = CapabilityType::$variant;

                fn from_handle(handle: &WorkerHandle) -> Option<Arc<Self>> {
                    match handle {
                        WorkerHandle::$variant(worker) => Some(Arc::clone(worker)),
                        _ => None,
                    }
                }
            }
        )+
    };
}

capability_set! {
    Database => DatabaseWorker: "database",
    Cache => CacheWorker: "cache",
    Log => LogWorker: "log",
    PubSubServer => PubSubServerWorker: "pubSubServer",
    PubSubClient => PubSubClientWorker: "pubSubClient",
    Token => TokenWorker: "token",
    Encryption => EncryptionWorker: "encryption",
    FileSystem => FileSystemWorker: "fileSystem",
    Feature => FeatureWorker: "feature",
    Config => ConfigWorker: "config",
    Error => ErrorWorker: "error",
    User => UserWorker: "user",
    Server => ServerWorker: "server",
    RestEndpoint => RestEndpointWorker: "restEndpoint",
    GraphEndpoint => GraphEndpointWorker: "graphEndpoint",
    TaskEndpoint => TaskEndpointWorker: "taskEndpoint",
    Date => DateWorker: "date",
}

impl fmt::Display for CapabilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityType {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], "");
        CapabilityType::ALL
            .iter()
            .copied()
            .find(|capability| capability.as_str().to_lowercase() == wanted)
            .ok_or_else(|| HiveError::config_error(format!("Unknown worker type: {s}")))
    }
}

impl fmt::Debug for PendingWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingWorker")
            .field("capability", &self.capability())
            .finish()
    }
}

impl fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("capability", &self.capability())
            .field("name", &self.name())
            .finish()
    }
}
