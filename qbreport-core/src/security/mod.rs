//! Connection-string handling and secret protection.
//!
//! ODBC connection strings are `key=value` lists separated by `;`. Values may
//! be wrapped in braces to carry `;` or leading spaces, with `}}` standing for
//! a literal `}`. This module parses and renders that grammar so secrets can
//! be masked attribute by attribute instead of by substring search.

pub mod credentials;

pub use credentials::ConnectionString;

use crate::{Result, error::QbReportError, validation::Patterns};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Mask written in place of secret values.
pub const REDACTED_VALUE: &str = "****";

/// One `key=value` attribute of a connection string.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ConnectionAttribute {
    /// Attribute name, e.g. `DSN` or `PWD`
    pub key: String,
    /// Unquoted attribute value
    pub value: String,
    /// Whether the value was written in braces
    pub braced: bool,
}

impl std::fmt::Debug for ConnectionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = if is_secret_key(&self.key) {
            REDACTED_VALUE
        } else {
            self.value.as_str()
        };
        f.debug_struct("ConnectionAttribute")
            .field("key", &self.key)
            .field("value", &value)
            .field("braced", &self.braced)
            .finish()
    }
}

impl ConnectionAttribute {
    /// Creates an attribute, bracing the value only when the grammar needs it.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let braced = needs_braces(&value);
        Self {
            key: key.into(),
            value,
            braced,
        }
    }

    /// Returns `true` if this attribute carries a secret.
    pub fn is_secret(&self) -> bool {
        is_secret_key(&self.key)
    }

    fn write_to(&self, out: &mut String, redact: bool) {
        out.push_str(&self.key);
        out.push('=');
        if redact && self.is_secret() {
            out.push_str(REDACTED_VALUE);
        } else if self.braced || needs_braces(&self.value) {
            out.push('{');
            out.push_str(&self.value.replace('}', "}}"));
            out.push('}');
        } else {
            out.push_str(&self.value);
        }
        out.push(';');
    }
}

fn needs_braces(value: &str) -> bool {
    value.contains([';', '{', '}']) || value.starts_with(' ') || value.ends_with(' ')
}

/// Returns `true` for attribute names whose values must never be shown.
///
/// Matches `PWD`, `PASSWORD` and any key containing `SECRET`, `TOKEN` or
/// `APIKEY`, case-insensitively.
pub fn is_secret_key(key: &str) -> bool {
    Patterns::instance().is_secret_key(key.trim())
}

/// Parses an ODBC connection string into attributes, in order.
///
/// Empty segments (`;;` or a trailing `;`) are skipped.
///
/// # Errors
/// Returns a configuration error for a segment without `=`, an empty key, an
/// unterminated brace, or text after a closing brace. Error messages never
/// echo the input, since it may hold credentials.
pub fn parse_connection_string(input: &str) -> Result<Vec<ConnectionAttribute>> {
    let mut attributes = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        let mut key = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c == ';' {
                break;
            }
            key.push(c);
            chars.next();
        }

        match chars.next() {
            None if key.trim().is_empty() => break,
            Some(';') if key.trim().is_empty() => continue,
            None | Some(';') => {
                key.zeroize();
                return Err(QbReportError::configuration(format!(
                    "connection string attribute {} has no '='",
                    attributes.len() + 1
                )));
            }
            Some(_) => {}
        }

        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(QbReportError::configuration(format!(
                "connection string attribute {} has an empty name",
                attributes.len() + 1
            )));
        }

        let mut value = String::new();
        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
            loop {
                match chars.next() {
                    None => {
                        value.zeroize();
                        return Err(QbReportError::configuration(format!(
                            "unterminated '{{' in connection string attribute '{}'",
                            key
                        )));
                    }
                    Some('}') if chars.peek() == Some(&'}') => {
                        chars.next();
                        value.push('}');
                    }
                    Some('}') => break,
                    Some(c) => value.push(c),
                }
            }
            while let Some(c) = chars.next() {
                if c == ';' {
                    break;
                }
                if !c.is_whitespace() {
                    value.zeroize();
                    return Err(QbReportError::configuration(format!(
                        "unexpected text after '}}' in connection string attribute '{}'",
                        key
                    )));
                }
            }
        } else {
            for c in chars.by_ref() {
                if c == ';' {
                    break;
                }
                value.push(c);
            }
        }

        attributes.push(ConnectionAttribute { key, value, braced });
    }

    Ok(attributes)
}

/// Renders attributes back to connection-string form.
pub fn render_connection_string(attributes: &[ConnectionAttribute]) -> String {
    let mut out = String::new();
    for attribute in attributes {
        attribute.write_to(&mut out, false);
    }
    out
}

/// Renders attributes with every secret value replaced by [`REDACTED_VALUE`].
pub fn render_redacted(attributes: &[ConnectionAttribute]) -> String {
    let mut out = String::new();
    for attribute in attributes {
        attribute.write_to(&mut out, true);
    }
    out
}
