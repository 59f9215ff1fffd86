use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::traits::CapabilityType;
use crate::{HiveError, HiveResult};

/// Initialization tier. Boot workers start before core workers, core before user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Boot,
    #[default]
    Core,
    User,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Boot => write!(f, "boot"),
            Section::Core => write!(f, "core"),
            Section::User => write!(f, "user"),
        }
    }
}

/// Configuration record of a worker before it is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub capability: CapabilityType,
    #[serde(alias = "classRef", alias = "packageOrClassRef")]
    pub class_ref: String,
    #[serde(default = "empty_metadata")]
    pub metadata: Value,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub section: Section,
}

fn empty_metadata() -> Value {
    Value::Object(Map::new())
}

fn default_enabled() -> bool {
    true
}

impl WorkerDescriptor {
    pub fn new(name: &str, capability: CapabilityType, class_ref: &str) -> Self {
        Self {
            name: name.to_string(),
            capability,
            class_ref: class_ref.to_string(),
            metadata: empty_metadata(),
            enabled: true,
            section: Section::Core,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Structural checks performed before any construction is attempted.
    pub fn validate(&self) -> HiveResult<()> {
        if self.name.trim().is_empty() {
            return Err(HiveError::config_error(format!(
                "Hive worker of type {} has a blank name",
                self.capability
            )));
        }
        if self.class_ref.trim().is_empty() {
            return Err(HiveError::config_error(format!(
                "Hive worker {} has no class reference",
                self.name
            )));
        }
        Ok(())
    }
}
