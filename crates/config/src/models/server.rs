use crate::validation::ConfigValidator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "omnihive".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl ConfigValidator for ServerConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(crate::ConfigError::Validation(
                "Server name cannot be empty".to_string(),
            ));
        }
        if self.environment.trim().is_empty() {
            return Err(crate::ConfigError::Validation(
                "Server environment cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
