//! Config and wire model traits
//!
//! A resource is described twice: once as a config model with
//! [`Tristate`] fields, once as a wire model with plain or `Option`
//! fields. Both sides name their fields identically. The
//! [`config_model!`](crate::config_model) and
//! [`wire_model!`](crate::wire_model) macros generate the name tables and
//! the typed accessors from one field list, so the mapper never looks up
//! a name that has no accessor.
//!
//! # Example
//!
//! ```
//! use declarative::{Tristate, config_model, wire_model};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize)]
//! struct JumpGroupModel {
//!     id: Tristate<String>,
//!     name: Tristate<String>,
//!     comments: Tristate<String>,
//! }
//!
//! config_model!(JumpGroupModel { name, comments });
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
//! #[serde(default)]
//! struct JumpGroup {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     id: Option<i64>,
//!     name: String,
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     comments: Option<String>,
//! }
//!
//! wire_model!(JumpGroup => "/jump-group" { name, comments });
//! ```

use crate::context::Variant;
use crate::types::Tristate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Name of the identifier field on both sides.
pub const ID_FIELD: &str = "id";

/// Mapping annotations for one config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Never mapped in either direction
    pub skip: bool,
    /// Written to the wire, never refreshed from it
    pub persist_only: bool,
    /// Only meaningful under this variant
    pub variant: Option<Variant>,
}

impl FieldSpec {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            skip: false,
            persist_only: false,
            variant: None,
        }
    }

    pub const fn skip(self) -> Self {
        Self { skip: true, ..self }
    }

    pub const fn persist_only(self) -> Self {
        Self {
            persist_only: true,
            ..self
        }
    }

    pub const fn variant(self, variant: Variant) -> Self {
        Self {
            variant: Some(variant),
            ..self
        }
    }
}

/// Value kinds the mapper understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Bool,
    StringList,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Bool => "bool",
            Self::StringList => "string list",
        };
        f.write_str(name)
    }
}

/// Read access to one config field.
#[derive(Debug, Clone, Copy)]
pub enum ConfigField<'a> {
    Str(&'a Tristate<String>),
    Int(&'a Tristate<i64>),
    Bool(&'a Tristate<bool>),
    StrList(&'a Tristate<Vec<String>>),
}

impl ConfigField<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Str(_) => FieldKind::String,
            Self::Int(_) => FieldKind::Integer,
            Self::Bool(_) => FieldKind::Bool,
            Self::StrList(_) => FieldKind::StringList,
        }
    }

    pub fn is_known(&self) -> bool {
        match self {
            Self::Str(v) => v.is_known(),
            Self::Int(v) => v.is_known(),
            Self::Bool(v) => v.is_known(),
            Self::StrList(v) => v.is_known(),
        }
    }
}

/// Write access to one config field.
#[derive(Debug)]
pub enum ConfigSlot<'a> {
    Str(&'a mut Tristate<String>),
    Int(&'a mut Tristate<i64>),
    Bool(&'a mut Tristate<bool>),
    StrList(&'a mut Tristate<Vec<String>>),
}

impl ConfigSlot<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Str(_) => FieldKind::String,
            Self::Int(_) => FieldKind::Integer,
            Self::Bool(_) => FieldKind::Bool,
            Self::StrList(_) => FieldKind::StringList,
        }
    }

    pub fn set_null(&mut self) {
        match self {
            Self::Str(v) => **v = Tristate::Null,
            Self::Int(v) => **v = Tristate::Null,
            Self::Bool(v) => **v = Tristate::Null,
            Self::StrList(v) => **v = Tristate::Null,
        }
    }

    pub fn set_unknown(&mut self) {
        match self {
            Self::Str(v) => **v = Tristate::Unknown,
            Self::Int(v) => **v = Tristate::Unknown,
            Self::Bool(v) => **v = Tristate::Unknown,
            Self::StrList(v) => **v = Tristate::Unknown,
        }
    }
}

/// Read access to one wire field. Plain fields read as `Some`.
#[derive(Debug, Clone, Copy)]
pub enum WireField<'a> {
    Str(Option<&'a String>),
    Int(Option<i64>),
    Bool(Option<bool>),
    StrList(Option<&'a [String]>),
}

impl WireField<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Str(_) => FieldKind::String,
            Self::Int(_) => FieldKind::Integer,
            Self::Bool(_) => FieldKind::Bool,
            Self::StrList(_) => FieldKind::StringList,
        }
    }
}

/// Write access to one wire field.
#[derive(Debug)]
pub enum WireSlot<'a> {
    Str(&'a mut String),
    OptStr(&'a mut Option<String>),
    Int(&'a mut i64),
    OptInt(&'a mut Option<i64>),
    Bool(&'a mut bool),
    OptBool(&'a mut Option<bool>),
    StrList(&'a mut Vec<String>),
    OptStrList(&'a mut Option<Vec<String>>),
}

impl WireSlot<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Str(_) | Self::OptStr(_) => FieldKind::String,
            Self::Int(_) | Self::OptInt(_) => FieldKind::Integer,
            Self::Bool(_) | Self::OptBool(_) => FieldKind::Bool,
            Self::StrList(_) | Self::OptStrList(_) => FieldKind::StringList,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            Self::OptStr(_) | Self::OptInt(_) | Self::OptBool(_) | Self::OptStrList(_)
        )
    }
}

macro_rules! config_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a Tristate<$ty>> for ConfigField<'a> {
                fn from(value: &'a Tristate<$ty>) -> Self {
                    Self::$variant(value)
                }
            }

            impl<'a> From<&'a mut Tristate<$ty>> for ConfigSlot<'a> {
                fn from(value: &'a mut Tristate<$ty>) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

config_conversions!(String => Str, i64 => Int, bool => Bool, Vec<String> => StrList);

impl<'a> From<&'a String> for WireField<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(Some(value))
    }
}

impl<'a> From<&'a Option<String>> for WireField<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Self::Str(value.as_ref())
    }
}

impl<'a> From<&'a i64> for WireField<'a> {
    fn from(value: &'a i64) -> Self {
        Self::Int(Some(*value))
    }
}

impl<'a> From<&'a Option<i64>> for WireField<'a> {
    fn from(value: &'a Option<i64>) -> Self {
        Self::Int(*value)
    }
}

impl<'a> From<&'a bool> for WireField<'a> {
    fn from(value: &'a bool) -> Self {
        Self::Bool(Some(*value))
    }
}

impl<'a> From<&'a Option<bool>> for WireField<'a> {
    fn from(value: &'a Option<bool>) -> Self {
        Self::Bool(*value)
    }
}

impl<'a> From<&'a Vec<String>> for WireField<'a> {
    fn from(value: &'a Vec<String>) -> Self {
        Self::StrList(Some(value.as_slice()))
    }
}

impl<'a> From<&'a Option<Vec<String>>> for WireField<'a> {
    fn from(value: &'a Option<Vec<String>>) -> Self {
        Self::StrList(value.as_deref())
    }
}

macro_rules! wire_slot_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for WireSlot<'a> {
                fn from(value: &'a mut $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

wire_slot_conversions!(
    String => Str,
    Option<String> => OptStr,
    i64 => Int,
    Option<i64> => OptInt,
    bool => Bool,
    Option<bool> => OptBool,
    Vec<String> => StrList,
    Option<Vec<String>> => OptStrList,
);

/// Orchestrator-facing record with tri-state fields.
///
/// Implement with [`config_model!`](crate::config_model).
pub trait ConfigModel: Default + Clone + Send + Sync + fmt::Debug {
    /// Every field, including `id` and skipped ones, with its annotations.
    const FIELDS: &'static [FieldSpec];

    fn id(&self) -> &Tristate<String>;
    fn id_mut(&mut self) -> &mut Tristate<String>;

    /// Read a non-id field by name.
    fn field(&self, name: &str) -> Option<ConfigField<'_>>;

    /// Write a non-id field by name.
    fn field_mut(&mut self, name: &str) -> Option<ConfigSlot<'_>>;

    /// Look up a field's annotations.
    fn spec(name: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}

/// API-facing record as sent and received in JSON.
///
/// Implement with [`wire_model!`](crate::wire_model).
pub trait WireModel:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + fmt::Debug
{
    /// Collection path relative to the API base, e.g. `/jump-group`.
    const PATH: &'static str;

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: Option<i64>);

    /// Read a non-id field by name.
    fn field(&self, name: &str) -> Option<WireField<'_>>;

    /// Write a non-id field by name.
    fn field_mut(&mut self, name: &str) -> Option<WireSlot<'_>>;
}

/// Implement [`ConfigModel`] for a struct with an `id: Tristate<String>`
/// field.
///
/// Mapped fields are listed with optional annotations in brackets;
/// fields owned elsewhere (memberships read through separate calls) go in
/// a trailing `skip { .. }` block.
///
/// ```ignore
/// config_model!(VaultAccountModel {
///     name,
///     password: [persist_only()],
///     jump_policy_id: [variant(Variant::Pra)],
/// } skip { group_policy_memberships });
/// ```
#[macro_export]
macro_rules! config_model {
    (
        $model:ty {
            $( $field:ident $( : [ $($ann:tt)+ ] )? ),* $(,)?
        }
        $( skip { $( $skipped:ident ),* $(,)? } )?
    ) => {
        impl $crate::ConfigModel for $model {
            const FIELDS: &'static [$crate::FieldSpec] = &[
                $crate::FieldSpec::new($crate::model::ID_FIELD),
                $( $crate::FieldSpec::new(stringify!($field)) $( .$($ann)+ )?, )*
                $( $( $crate::FieldSpec::new(stringify!($skipped)).skip(), )* )?
            ];

            fn id(&self) -> &$crate::Tristate<String> {
                &self.id
            }

            fn id_mut(&mut self) -> &mut $crate::Tristate<String> {
                &mut self.id
            }

            fn field(&self, name: &str) -> Option<$crate::ConfigField<'_>> {
                match name {
                    $( stringify!($field) => Some((&self.$field).into()), )*
                    _ => None,
                }
            }

            fn field_mut(&mut self, name: &str) -> Option<$crate::ConfigSlot<'_>> {
                match name {
                    $( stringify!($field) => Some((&mut self.$field).into()), )*
                    _ => None,
                }
            }
        }
    };
}

/// Implement [`WireModel`] for a struct with an `id: Option<i64>` field.
///
/// ```ignore
/// wire_model!(ShellJump => "/jump-item/shell-jump" { name, hostname, port });
/// ```
#[macro_export]
macro_rules! wire_model {
    (
        $model:ty => $path:literal {
            $( $field:ident ),* $(,)?
        }
    ) => {
        impl $crate::WireModel for $model {
            const PATH: &'static str = $path;

            fn id(&self) -> Option<i64> {
                self.id
            }

            fn set_id(&mut self, id: Option<i64>) {
                self.id = id;
            }

            fn field(&self, name: &str) -> Option<$crate::WireField<'_>> {
                match name {
                    $( stringify!($field) => Some((&self.$field).into()), )*
                    _ => None,
                }
            }

            fn field_mut(&mut self, name: &str) -> Option<$crate::WireSlot<'_>> {
                match name {
                    $( stringify!($field) => Some((&mut self.$field).into()), )*
                    _ => None,
                }
            }
        }
    };
}
