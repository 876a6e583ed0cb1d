//! Settings model trait and the field-mapping engine
//!
//! A settings type declares its persistable fields as an explicit,
//! compile-time descriptor list instead of being discovered by reflection.
//! The [`config_model!`] macro generates the [`SettingsModel`] impl from a
//! flat `"StoredName" => Kind(field)` listing; [`config_enum!`] generates
//! enums that serialize by symbolic variant name.
//!
//! [`extract_fields`] and [`apply_fields`] are the two halves of the mapping
//! engine: extraction renders every declared field to text in declaration
//! order, application folds a name→text map back onto the object.
//! Application is best-effort: a field that fails to convert is recorded and
//! skipped so callers get the most complete object possible.

use crate::convert::{self, ConfigValue, FieldKind};
use crate::error::Result;
use crate::map::PersistedMap;
use log::{debug, warn};
use std::collections::BTreeMap;

/// One named, typed field of a settings object
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Stored name, unique within the flat field set
    pub name: &'static str,
    /// Declared type
    pub kind: FieldKind,
}

/// A flat, persistable settings object.
///
/// Implemented with the [`config_model!`] macro; hand-written impls are fine
/// too as long as `fields()` order is stable and names are unique.
pub trait SettingsModel: Default {
    /// Declared fields in declaration order; stable across calls
    fn fields() -> &'static [FieldDescriptor];

    /// Current value of a declared field, `None` for unknown names
    fn get_field(&self, name: &str) -> Option<ConfigValue>;

    /// Set a declared field from a typed value.
    ///
    /// # Errors
    ///
    /// [`crate::Error::FieldNotFound`] for unknown names,
    /// [`crate::Error::TypeMismatch`] when the value kind does not match the
    /// declaration, [`crate::Error::Conversion`] for unknown enum variant
    /// names and integer values outside the field's range.
    fn set_field(&mut self, name: &str, value: ConfigValue) -> Result<()>;
}

/// Enum usable as a settings field, serialized by symbolic variant name so
/// stored values survive variant renumbering.
pub trait EnumField: Sized {
    fn variant_name(&self) -> &'static str;
    fn from_variant_name(name: &str) -> Option<Self>;
}

/// Outcome of folding a persisted map onto a settings object
#[derive(Debug, Default, Clone)]
pub struct ApplyReport {
    /// Per-field failure messages, keyed by field name
    pub field_errors: BTreeMap<String, String>,
}

impl ApplyReport {
    /// True when every present field applied cleanly
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.field_errors.is_empty()
    }
}

/// Render every declared field of `model` to text, in declaration order.
pub fn extract_fields<T: SettingsModel>(model: &T) -> PersistedMap {
    let mut map = PersistedMap::new();
    for field in T::fields() {
        match model.get_field(field.name) {
            Some(value) => map.insert(field.name, convert::to_text(&value)),
            None => warn!("Declared field '{}' returned no value; skipped", field.name),
        }
    }
    map
}

/// Fold a name→text map onto `model`, best-effort.
///
/// Fields absent from the map keep their current values. A conversion
/// failure on one field is recorded in the report and processing continues
/// with the remaining fields. Map entries that match no declared field are
/// ignored.
pub fn apply_fields<T: SettingsModel>(model: &mut T, map: &PersistedMap) -> ApplyReport {
    let mut report = ApplyReport::default();
    for field in T::fields() {
        let Some(text) = map.get(field.name) else {
            continue;
        };
        let outcome = convert::from_text(text, field.kind)
            .and_then(|value| model.set_field(field.name, value));
        if let Err(e) = outcome {
            debug!("Field '{}' not applied: {e}", field.name);
            report
                .field_errors
                .insert(field.name.to_string(), e.to_string());
        }
    }
    report
}

/// Implement [`SettingsModel`] for a flat settings struct.
///
/// Each entry maps a stored name to a field kind and the struct field that
/// backs it. Declaration order here is the persisted order.
///
/// `Integer` fields may be any integer type with a `TryFrom<i64>` impl; a
/// stored value outside the field's range is reported as a conversion error,
/// never truncated. `Float` fields are `f64`.
///
/// # Example
///
/// ```rust
/// use appconf::config_model;
///
/// #[derive(Debug, Default)]
/// struct ServerSettings {
///     host: String,
///     port: i64,
///     verbose: bool,
/// }
///
/// config_model! {
///     ServerSettings {
///         "Host" => Text(host),
///         "Port" => Integer(port),
///         "Verbose" => Boolean(verbose),
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_model {
    ($ty:ty {
        $( $name:literal => $kind:ident($field:ident) ),+ $(,)?
    }) => {
        impl $crate::SettingsModel for $ty {
            fn fields() -> &'static [$crate::FieldDescriptor] {
                &[
                    $(
                        $crate::FieldDescriptor {
                            name: $name,
                            kind: $crate::FieldKind::$kind,
                        },
                    )+
                ]
            }

            fn get_field(&self, name: &str) -> Option<$crate::ConfigValue> {
                match name {
                    $( $name => Some($crate::config_model!(@get $kind, self.$field)), )+
                    _ => None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::ConfigValue,
            ) -> $crate::Result<()> {
                match name {
                    $( $name => $crate::config_model!(@set $kind, self.$field, value, $name), )+
                    _ => Err($crate::Error::FieldNotFound(name.to_string())),
                }
            }
        }
    };

    // ---- extraction arms ----
    (@get Text, $f:expr) => { $crate::ConfigValue::Text($f.clone()) };
    (@get Integer, $f:expr) => { $crate::ConfigValue::Integer($f as i64) };
    (@get Float, $f:expr) => { $crate::ConfigValue::Float($f as f64) };
    (@get Boolean, $f:expr) => { $crate::ConfigValue::Boolean($f) };
    (@get Enum, $f:expr) => {
        $crate::ConfigValue::Enum($crate::EnumField::variant_name(&$f).to_string())
    };
    (@get DateTime, $f:expr) => { $crate::ConfigValue::DateTime($f) };

    // ---- application arms ----
    (@set Text, $f:expr, $v:expr, $n:literal) => {
        match $v {
            $crate::ConfigValue::Text(s) => {
                $f = s;
                Ok(())
            }
            other => Err($crate::Error::TypeMismatch {
                field: $n.to_string(),
                expected: "text",
                found: other.kind().name(),
            }),
        }
    };
    (@set Integer, $f:expr, $v:expr, $n:literal) => {
        match $v {
            $crate::ConfigValue::Integer(n) => {
                match ::core::convert::TryFrom::try_from(n) {
                    Ok(converted) => {
                        $f = converted;
                        Ok(())
                    }
                    // Stored value does not fit the struct field's width
                    Err(_) => Err($crate::Error::Conversion {
                        kind: "integer",
                        text: n.to_string(),
                    }),
                }
            }
            other => Err($crate::Error::TypeMismatch {
                field: $n.to_string(),
                expected: "integer",
                found: other.kind().name(),
            }),
        }
    };
    (@set Float, $f:expr, $v:expr, $n:literal) => {
        match $v {
            $crate::ConfigValue::Float(x) => {
                $f = x;
                Ok(())
            }
            other => Err($crate::Error::TypeMismatch {
                field: $n.to_string(),
                expected: "float",
                found: other.kind().name(),
            }),
        }
    };
    (@set Boolean, $f:expr, $v:expr, $n:literal) => {
        match $v {
            $crate::ConfigValue::Boolean(b) => {
                $f = b;
                Ok(())
            }
            other => Err($crate::Error::TypeMismatch {
                field: $n.to_string(),
                expected: "boolean",
                found: other.kind().name(),
            }),
        }
    };
    (@set Enum, $f:expr, $v:expr, $n:literal) => {
        match $v {
            $crate::ConfigValue::Enum(s) => match $crate::EnumField::from_variant_name(&s) {
                Some(variant) => {
                    $f = variant;
                    Ok(())
                }
                None => Err($crate::Error::Conversion {
                    kind: "enum",
                    text: s,
                }),
            },
            other => Err($crate::Error::TypeMismatch {
                field: $n.to_string(),
                expected: "enum",
                found: other.kind().name(),
            }),
        }
    };
    (@set DateTime, $f:expr, $v:expr, $n:literal) => {
        match $v {
            $crate::ConfigValue::DateTime(dt) => {
                $f = dt;
                Ok(())
            }
            other => Err($crate::Error::TypeMismatch {
                field: $n.to_string(),
                expected: "date-time",
                found: other.kind().name(),
            }),
        }
    };
}

/// Declare an enum that persists by symbolic variant name.
///
/// The first variant is the default. Generates the enum plus its
/// [`EnumField`] impl.
///
/// # Example
///
/// ```rust
/// use appconf::{config_enum, EnumField};
///
/// config_enum! {
///     pub enum DebugModes {
///         Default,
///         ApplicationErrorMessage,
///         DeveloperErrorMessage,
///     }
/// }
///
/// assert_eq!(DebugModes::default().variant_name(), "Default");
/// ```
#[macro_export]
macro_rules! config_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $first:ident
            $(, $rest:ident)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $first,
            $( $rest, )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$first
            }
        }

        impl $crate::EnumField for $name {
            fn variant_name(&self) -> &'static str {
                match self {
                    Self::$first => stringify!($first),
                    $( Self::$rest => stringify!($rest), )*
                }
            }

            fn from_variant_name(name: &str) -> Option<Self> {
                match name {
                    stringify!($first) => Some(Self::$first),
                    $( stringify!($rest) => Some(Self::$rest), )*
                    _ => None,
                }
            }
        }
    };
}

// =============================================================================
// Tests
// =============================================================================
