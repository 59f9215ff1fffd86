use thiserror::Error;

#[derive(Debug, Error)]
pub enum HiveError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("{}", validation_message(.worker, .message))]
    Validation {
        worker: Option<String>,
        message: String,
    },
    #[error("{0}")]
    Metadata(String),
    #[error("Hive worker {worker} failed to initialize: {message}")]
    WorkerInit { worker: String, message: String },
    #[error("Hive worker {worker} failed after initialization: {message}")]
    WorkerAfterInit { worker: String, message: String },
    #[error("Operation timed out: {0}")]
    Timeout(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Capability error: {0}")]
    Capability(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HiveResult<T> = Result<T, HiveError>;

fn validation_message(worker: &Option<String>, message: &str) -> String {
    match worker {
        Some(worker) => format!("Metadata validation failed on hive worker {worker}: {message}"),
        None => format!("Validation error: {message}"),
    }
}

impl HiveError {
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn validation_error<S: Into<String>>(msg: S) -> Self {
        Self::Validation {
            worker: None,
            message: msg.into(),
        }
    }
    pub fn metadata_error<S: Into<String>>(msg: S) -> Self {
        Self::Metadata(msg.into())
    }
    pub fn worker_init<W: Into<String>, S: Into<String>>(worker: W, msg: S) -> Self {
        Self::WorkerInit {
            worker: worker.into(),
            message: msg.into(),
        }
    }
    pub fn worker_after_init<W: Into<String>, S: Into<String>>(worker: W, msg: S) -> Self {
        Self::WorkerAfterInit {
            worker: worker.into(),
            message: msg.into(),
        }
    }
    pub fn capability_error<S: Into<String>>(msg: S) -> Self {
        Self::Capability(msg.into())
    }

    /// Attaches the worker name to a projector failure. Other errors pass through.
    pub fn for_worker(self, worker: &str) -> Self {
        match self {
            HiveError::Validation { worker: None, message } => HiveError::Validation {
                worker: Some(worker.to_string()),
                message,
            },
            other => other,
        }
    }

    /// Errors raised while building the registry; they abort the boot batch.
    pub fn is_boot_error(&self) -> bool {
        matches!(
            self,
            HiveError::Configuration(_)
                | HiveError::Validation { .. }
                | HiveError::Metadata(_)
                | HiveError::WorkerInit { .. }
        )
    }
    pub fn is_fatal(&self) -> bool {
        self.is_boot_error() || matches!(self, HiveError::Internal(_))
    }
    pub fn is_retryable(&self) -> bool {
        matches!(self, HiveError::Timeout(_) | HiveError::Io(_))
    }
}

impl From<serde_json::Error> for HiveError {
    fn from(err: serde_json::Error) -> Self {
        HiveError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for HiveError {
    fn from(err: std::io::Error) -> Self {
        HiveError::Io(err.to_string())
    }
}

impl From<anyhow::Error> for HiveError {
    fn from(err: anyhow::Error) -> Self {
        HiveError::Internal(err.to_string())
    }
}
