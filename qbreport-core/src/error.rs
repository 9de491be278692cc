//! Error types with connection-string sanitization.
//!
//! Driver diagnostics are carried as sources, but no variant ever embeds a raw
//! connection string. Anything describing the data source goes through
//! [`redact_connection_string`] first.

use thiserror::Error;

/// Main error type for qbreport operations.
///
/// # Security
/// Connection strings and passwords are never included in error output.
#[derive(Debug, Error)]
pub enum QbReportError {
    /// Opening the driver connection failed
    #[error("Data source connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A catalog command or SQL statement failed inside the driver
    #[error("Query failed: {context}")]
    Query {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Fetched data does not fit the requested table shape
    #[error("Result shape mismatch: {message}")]
    Shape { message: String },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Operation not available in this build or for this data source
    #[error("Unsupported operation: {feature} ({reason})")]
    UnsupportedFeature { feature: String, reason: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with QbReportError
pub type Result<T> = std::result::Result<T, QbReportError>;

/// Redacts secret attribute values in an ODBC connection string.
///
/// The string is parsed as `key=value` pairs separated by `;`, honoring
/// brace-quoted values. Values of secret keys (see
/// [`crate::security::is_secret_key`]) are replaced with `****`. Input that
/// cannot be parsed is fully redacted.
///
/// # Example
///
/// ```rust
/// use qbreport_core::error::redact_connection_string;
///
/// let sanitized = redact_connection_string("DSN=QuickBooks;UID=admin;PWD=secret;");
/// assert_eq!(sanitized, "DSN=QuickBooks;UID=admin;PWD=****;");
/// assert!(!sanitized.contains("secret"));
/// ```
pub fn redact_connection_string(connection_string: &str) -> String {
    match crate::security::parse_connection_string(connection_string) {
        Ok(attributes) => crate::security::render_redacted(&attributes),
        Err(_) => "<redacted>".to_string(),
    }
}

impl QbReportError {
    /// Creates a connection error with sanitized context
    pub fn connection_failed<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: "Driver refused the connection".to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an error for a driver manager call outside any query
    pub fn driver_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a query error naming the statement that failed.
    ///
    /// Statements issued by this crate never carry credentials, so the
    /// statement text is safe to include.
    pub fn query_failed<E>(statement: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            context: statement.into(),
            source: Box::new(error),
        }
    }

    /// Creates a result shape error
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an unsupported feature error
    pub fn unsupported_feature(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            feature: feature.into(),
            reason: reason.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
