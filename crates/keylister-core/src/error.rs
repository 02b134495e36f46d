use thiserror::Error;

/// Failure reported by a remote listing or credential operation.
///
/// Adapters translate their SDK errors into this shape so the engine can
/// attach account, role, and user context without knowing the SDK.
#[derive(Debug, Clone, Error)]
#[error("{operation} failed: {message}")]
pub struct RemoteError {
    pub operation: String,
    /// Service error code when the service returned one (e.g. `AccessDenied`).
    pub code: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum KeyListerError {
    #[error("validation failed for account {account_id} (line {line}), {reason}")]
    InvalidAccountRole {
        line: u64,
        account_id: String,
        reason: String,
    },

    #[error("invalid CSV data")]
    Csv(#[from] csv::Error),

    #[error("failed to assume role {role_name} in account {account_id}")]
    Session {
        account_id: String,
        role_name: String,
        #[source]
        source: RemoteError,
    },

    #[error("failed to list users in account {account_id}")]
    ListUsers {
        account_id: String,
        #[source]
        source: RemoteError,
    },

    #[error("failed to list access keys for user {user_name} in account {account_id}")]
    ListAccessKeys {
        account_id: String,
        user_name: String,
        #[source]
        source: RemoteError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("run cancelled")]
    Cancelled,

    #[error("outcome stream closed after {received} of {expected} work items")]
    Incomplete { expected: usize, received: usize },

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl KeyListerError {
    /// `true` for errors raised before any remote call is attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            KeyListerError::InvalidAccountRole { .. }
                | KeyListerError::Csv(_)
                | KeyListerError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, KeyListerError>;
