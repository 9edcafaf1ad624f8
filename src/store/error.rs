//! Error types for worksheet store operations.
//!
//! The taxonomy distinguishes the classes the rest of the crate reacts to
//! differently: authentication failures are fatal for the session, missing
//! resources are fatal for the operation, transient I/O is eligible for
//! bounded retry on reads, and data-shape problems are handled with
//! documented defaults upstream.

use std::fmt;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Structured context for store errors.
///
/// Provides additional information about where and why an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "get_all_rows", "write_rows")
    pub operation: Option<String>,
    /// The entity involved (e.g., a worksheet title)
    pub entity: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether this error is retryable
    pub retryable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity (worksheet title, upload digest, …).
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark this error as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for worksheet store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Remote credentials were rejected. Fatal for the session; never
    /// retried beyond the bounded authorization handshake.
    #[error("Authentication error: {message} {context}")]
    AuthError {
        message: String,
        context: ErrorContext,
    },

    /// A named remote resource (workbook, worksheet) is absent.
    /// Fatal for the calling operation, not retried.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Network or transport failure. Typically transient; reads may retry.
    #[error("Remote I/O error: {message} {context}")]
    IoError {
        message: String,
        context: ErrorContext,
    },

    /// Timeout waiting for the remote store.
    #[error("Timeout error: {message} {context}")]
    TimeoutError {
        message: String,
        context: ErrorContext,
    },

    /// Expected tabular shape is missing from uploaded or remote data and no
    /// documented default applies.
    #[error("Data shape error: {message} {context}")]
    DataShapeError {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    ConfigError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl StoreError {
    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a not found error with full context.
    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    /// Create a transient I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::IoError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Create a transient I/O error with full context.
    pub fn io_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::IoError {
            message: message.into(),
            context: context.retryable(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Create a data shape error.
    pub fn data_shape(message: impl Into<String>) -> Self {
        Self::DataShapeError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a data shape error with full context.
    pub fn data_shape_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::DataShapeError {
            message: message.into(),
            context,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::IoError { context, .. } => context.retryable,
            Self::TimeoutError { context, .. } => context.retryable,
            _ => false,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::AuthError { context, .. }
            | Self::NotFound { context, .. }
            | Self::IoError { context, .. }
            | Self::TimeoutError { context, .. }
            | Self::DataShapeError { context, .. }
            | Self::ConfigError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::AuthError { context, .. }
            | Self::NotFound { context, .. }
            | Self::IoError { context, .. }
            | Self::TimeoutError { context, .. }
            | Self::DataShapeError { context, .. }
            | Self::ConfigError { context, .. }
            | Self::InternalError { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }
}

impl From<String> for StoreError {
    fn from(s: String) -> Self {
        StoreError::internal(s)
    }
}

impl From<&str> for StoreError {
    fn from(s: &str) -> Self {
        StoreError::internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability_by_class() {
        assert!(StoreError::io("connection reset").is_retryable());
        assert!(StoreError::timeout("deadline exceeded").is_retryable());
        assert!(!StoreError::auth("bad credentials").is_retryable());
        assert!(!StoreError::not_found("no such worksheet").is_retryable());
        assert!(!StoreError::data_shape("no identity column").is_retryable());
    }

    #[test]
    fn test_context_display_includes_fields() {
        let err = StoreError::io_with_context(
            "boom",
            ErrorContext::new("get_all_rows").with_entity("Influencers List"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("operation=get_all_rows"));
        assert!(rendered.contains("entity=Influencers List"));
        assert!(rendered.contains("retryable=true"));
    }

    #[test]
    fn test_with_operation_overwrites() {
        let err = StoreError::not_found("missing").with_operation("worksheet");
        assert_eq!(err.context().operation.as_deref(), Some("worksheet"));
    }
}
