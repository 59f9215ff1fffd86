use crate::validation::ConfigValidator;
use omnihive_foundation::DuplicatePolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    pub duplicate_policy: DuplicatePolicy,
    /// Upper bound for each worker's `init` and `after_init`. Unbounded when absent.
    pub init_timeout_seconds: Option<u64>,
}

impl ConfigValidator for RegistryConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        if self.init_timeout_seconds == Some(0) {
            return Err(crate::ConfigError::Validation(
                "Init timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
