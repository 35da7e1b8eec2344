//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use zonesync_provider::{ProviderError, ProviderErrorKind};

/// Engine operation that produced an error, carried for logging and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    CreateZone,
    DeleteZone,
    AddRecord,
    UpdateRecord,
    DeleteRecord,
    Reconcile,
}

impl SyncOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateZone => "create_zone",
            Self::DeleteZone => "delete_zone",
            Self::AddRecord => "add_record",
            Self::UpdateRecord => "update_record",
            Self::DeleteRecord => "delete_record",
            Self::Reconcile => "reconcile",
        }
    }
}

impl std::fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse error classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Caller-supplied data failed validation. Never retried.
    InvalidInput,
    /// Remote or local entity absent.
    NotFound,
    /// Remote entity already exists.
    Conflict,
    /// Network or API-level failure. Caller-retryable.
    Transport,
    /// Provider rejected the credentials.
    Auth,
    /// Local write failed after the remote mutation succeeded. Needs reconciliation.
    Persistence,
    /// Configuration names a provider with no registered factory.
    UnknownProvider,
    /// Local store failure before any remote call.
    Storage,
    Other,
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A required request field is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Zone not known locally
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Record not known locally
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// No factory registered under this provider name
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The factory rejected the provider configuration
    #[error("Invalid provider configuration: {0}")]
    ProviderConfig(ProviderError),

    /// Remote call failed; the local store was not touched
    #[error("{operation} failed for {domain}: {source}")]
    Provider {
        operation: SyncOperation,
        domain: String,
        source: ProviderError,
    },

    /// Remote call succeeded but the local write failed
    #[error("{operation} for {domain} applied remotely but not persisted locally: {detail}")]
    Persistence {
        operation: SyncOperation,
        domain: String,
        detail: String,
    },

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CoreError {
    /// Classify this error.
    ///
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationError(_) | Self::MissingField(_) | Self::ProviderConfig(_) => {
                ErrorKind::InvalidInput
            }
            Self::DomainNotFound(_) | Self::RecordNotFound(_) => ErrorKind::NotFound,
            Self::UnknownProvider(_) => ErrorKind::UnknownProvider,
            Self::Provider { source, .. } => match source.kind() {
                ProviderErrorKind::InvalidInput => ErrorKind::InvalidInput,
                ProviderErrorKind::NotFound => ErrorKind::NotFound,
                ProviderErrorKind::Conflict => ErrorKind::Conflict,
                ProviderErrorKind::Transport => ErrorKind::Transport,
                ProviderErrorKind::Auth => ErrorKind::Auth,
                ProviderErrorKind::Other => ErrorKind::Other,
            },
            Self::Persistence { .. } => ErrorKind::Persistence,
            Self::StorageError(_) => ErrorKind::Storage,
            Self::SerializationError(_) => ErrorKind::Other,
        }
    }

    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_)
            | Self::MissingField(_)
            | Self::DomainNotFound(_)
            | Self::RecordNotFound(_)
            | Self::UnknownProvider(_)
            | Self::ProviderConfig(_) => true,
            Self::Provider { source, .. } => source.is_expected(),
            _ => false,
        }
    }

    /// Whether retrying the same call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { source, .. } if source.is_retryable())
    }

    pub(crate) fn provider(operation: SyncOperation, domain: &str, source: ProviderError) -> Self {
        Self::Provider {
            operation,
            domain: domain.to_string(),
            source,
        }
    }

    pub(crate) fn persistence(operation: SyncOperation, domain: &str, cause: &CoreError) -> Self {
        Self::Persistence {
            operation,
            domain: domain.to_string(),
            detail: cause.to_string(),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
