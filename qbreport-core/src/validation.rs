//! Input and output validation.
//!
//! Table names are interpolated into driver command text (`SP_COLUMNS
//! <table>`, `SELECT * FROM <table>`), so they are restricted to plain
//! identifiers before any query runs. Report metadata is checked for
//! unmasked secrets before it is written anywhere.

use crate::{Result, error::QbReportError};
use regex::Regex;
use std::sync::OnceLock;

/// Pre-compiled patterns shared by the validation and security helpers.
///
/// Uses `OnceLock` for thread-safe lazy initialization.
pub struct Patterns {
    secret_key: Regex,
    identifier: Regex,
}

impl Patterns {
    /// Gets the singleton instance of pre-compiled patterns.
    pub fn instance() -> &'static Self {
        static PATTERNS: OnceLock<Patterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::compile)
    }

    // Literal patterns; a compile failure is a programming error.
    #[allow(clippy::expect_used)]
    fn compile() -> Self {
        Self {
            secret_key: Regex::new(r"(?i)^(pwd|passwd|password)$|secret|token|api_?key")
                .expect("Invalid secret key pattern"),
            identifier: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
                .expect("Invalid identifier pattern"),
        }
    }

    /// Checks whether a connection attribute name denotes a secret.
    pub fn is_secret_key(&self, key: &str) -> bool {
        self.secret_key.is_match(key)
    }

    /// Checks whether a name is a plain SQL identifier.
    pub fn is_identifier(&self, name: &str) -> bool {
        self.identifier.is_match(name)
    }
}

/// Validates a table name before it is placed into command text.
///
/// # Errors
/// Returns a configuration error unless `name` matches
/// `[A-Za-z_][A-Za-z0-9_]*` and is at most 128 characters.
///
/// # Example
/// ```rust
/// use qbreport_core::validation::validate_table_name;
///
/// assert!(validate_table_name("Customer").is_ok());
/// assert!(validate_table_name("Customer; DROP TABLE Invoice").is_err());
/// ```
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(QbReportError::configuration("table name cannot be empty"));
    }
    if name.len() > 128 {
        return Err(QbReportError::configuration(
            "table name must not exceed 128 characters",
        ));
    }
    if !Patterns::instance().is_identifier(name) {
        return Err(QbReportError::configuration(format!(
            "table name '{}' is not a plain identifier",
            name.escape_debug()
        )));
    }
    Ok(())
}

/// Ensures a data-source description carries no unmasked secret.
///
/// # Errors
/// Returns a configuration error if the description parses as a connection
/// string with a secret attribute whose value is not the redaction mask.
pub fn ensure_redacted(description: &str) -> Result<()> {
    let Ok(attributes) = crate::security::parse_connection_string(description) else {
        return Ok(());
    };
    if let Some(position) = attributes
        .iter()
        .position(|attr| attr.is_secret() && attr.value != crate::security::REDACTED_VALUE)
    {
        return Err(QbReportError::configuration(format!(
            "unmasked secret in data source description (attribute {})",
            position + 1
        )));
    }
    Ok(())
}
