//! Textual conversion between typed field values and their stored form
//!
//! Every backend stores plain text, so each field value has exactly one
//! canonical textual rendering:
//!
//! - booleans as `True` / `False` (parse is case-insensitive)
//! - integers and floats in invariant decimal notation
//! - enums by symbolic variant name
//! - date-times as RFC 3339
//!
//! Canonical forms keep written files diff-stable and parseable by tooling
//! outside this crate.

use crate::error::{Error, Result};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Declared type of a settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Enum,
    DateTime,
}

impl FieldKind {
    /// Human-readable name, used in conversion error messages
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum => "enum",
            FieldKind::DateTime => "date-time",
        }
    }
}

/// A typed field value in transit between the settings object and a backend
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Symbolic variant name; mapping to the concrete enum type happens in
    /// the settings model (see [`crate::EnumField`]).
    Enum(String),
    DateTime(OffsetDateTime),
}

impl ConfigValue {
    /// The kind this value belongs to
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            ConfigValue::Text(_) => FieldKind::Text,
            ConfigValue::Integer(_) => FieldKind::Integer,
            ConfigValue::Float(_) => FieldKind::Float,
            ConfigValue::Boolean(_) => FieldKind::Boolean,
            ConfigValue::Enum(_) => FieldKind::Enum,
            ConfigValue::DateTime(_) => FieldKind::DateTime,
        }
    }
}

/// Render a value in its canonical textual form
#[must_use]
pub fn to_text(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Text(s) | ConfigValue::Enum(s) => s.clone(),
        ConfigValue::Integer(n) => n.to_string(),
        ConfigValue::Float(f) => f.to_string(),
        ConfigValue::Boolean(true) => "True".into(),
        ConfigValue::Boolean(false) => "False".into(),
        // Rfc3339 formatting of an OffsetDateTime cannot fail
        ConfigValue::DateTime(dt) => dt
            .format(&Rfc3339)
            .unwrap_or_else(|_| dt.unix_timestamp().to_string()),
    }
}

/// Parse stored text back into a typed value.
///
/// # Errors
///
/// Returns [`Error::Conversion`] when the text is not valid for the declared
/// kind. Callers decide whether to abort or continue with other fields;
/// [`crate::apply_fields`] continues.
pub fn from_text(text: &str, kind: FieldKind) -> Result<ConfigValue> {
    match kind {
        FieldKind::Text => Ok(ConfigValue::Text(text.to_string())),
        FieldKind::Enum => Ok(ConfigValue::Enum(text.to_string())),
        FieldKind::Integer => text
            .trim()
            .parse::<i64>()
            .map(ConfigValue::Integer)
            .map_err(|_| conversion_error(kind, text)),
        FieldKind::Float => text
            .trim()
            .parse::<f64>()
            .map(ConfigValue::Float)
            .map_err(|_| conversion_error(kind, text)),
        FieldKind::Boolean => {
            let trimmed = text.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(ConfigValue::Boolean(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(ConfigValue::Boolean(false))
            } else {
                Err(conversion_error(kind, text))
            }
        }
        FieldKind::DateTime => OffsetDateTime::parse(text.trim(), &Rfc3339)
            .map(ConfigValue::DateTime)
            .map_err(|_| conversion_error(kind, text)),
    }
}

fn conversion_error(kind: FieldKind, text: &str) -> Error {
    Error::Conversion {
        kind: kind.name(),
        text: text.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
