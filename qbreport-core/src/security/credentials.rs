//! Secret connection-string container with automatic memory zeroing.
//!
//! # Security
//! - The raw string lives in a `Zeroizing<String>` and is cleared on drop
//! - `Debug` and `Display` only ever show the redacted form

use super::{ConnectionAttribute, parse_connection_string, render_connection_string};
use crate::Result;
use zeroize::Zeroizing;

/// Driver connection string that zeroes its memory on drop.
///
/// # Example
///
/// ```rust
/// use qbreport_core::security::ConnectionString;
///
/// let conn = ConnectionString::new("DSN=QuickBooks Online Data 64-Bit;PWD=secret;");
/// assert_eq!(conn.redacted(), "DSN=QuickBooks Online Data 64-Bit;PWD=****;");
/// assert!(!format!("{conn:?}").contains("secret"));
/// ```
#[derive(Clone)]
pub struct ConnectionString {
    inner: Zeroizing<String>,
}

impl ConnectionString {
    /// Wraps a connection string.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(value.into()),
        }
    }

    /// Returns the raw string for handing to the driver.
    ///
    /// Never log the return value.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Returns `true` if the string is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.inner.trim().is_empty()
    }

    /// Returns the connection string with secret values masked.
    pub fn redacted(&self) -> String {
        crate::error::redact_connection_string(&self.inner)
    }

    /// Parses the string into attributes.
    ///
    /// # Errors
    /// Returns a configuration error if the string is malformed.
    pub fn attributes(&self) -> Result<Vec<ConnectionAttribute>> {
        parse_connection_string(&self.inner)
    }

    /// Returns `true` if any secret attribute is present.
    pub fn has_password(&self) -> bool {
        self.attributes()
            .map(|attrs| attrs.iter().any(ConnectionAttribute::is_secret))
            .unwrap_or(false)
    }

    /// Returns a copy with `PWD` set to `password`, replacing any existing
    /// `PWD` or `PASSWORD` attribute.
    ///
    /// # Errors
    /// Returns a configuration error if the existing string is malformed.
    pub fn with_password(&self, password: &str) -> Result<Self> {
        let mut attributes = self.attributes()?;
        attributes.retain(|attr| {
            !attr.key.eq_ignore_ascii_case("PWD") && !attr.key.eq_ignore_ascii_case("PASSWORD")
        });
        attributes.push(ConnectionAttribute::new("PWD", password));
        Ok(Self::new(render_connection_string(&attributes)))
    }
}

impl std::fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConnectionString")
            .field(&self.redacted())
            .finish()
    }
}

impl std::fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.redacted())
    }
}
