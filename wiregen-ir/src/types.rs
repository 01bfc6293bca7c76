//! Type reference descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A reference to a built-in or user-defined type.
///
/// User-defined types are referenced by name; typedefs carry their resolved
/// target so generators can work purely from the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSpec {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    List {
        value: Box<TypeSpec>,
    },
    Set {
        value: Box<TypeSpec>,
    },
    Map {
        key: Box<TypeSpec>,
        value: Box<TypeSpec>,
    },
    Struct {
        name: String,
    },
    Union {
        name: String,
    },
    Exception {
        name: String,
    },
    Enum {
        name: String,
    },
    Typedef {
        name: String,
        target: Box<TypeSpec>,
    },
}

impl TypeSpec {
    pub fn list(value: TypeSpec) -> Self {
        TypeSpec::List {
            value: Box::new(value),
        }
    }

    pub fn set(value: TypeSpec) -> Self {
        TypeSpec::Set {
            value: Box::new(value),
        }
    }

    pub fn map(key: TypeSpec, value: TypeSpec) -> Self {
        TypeSpec::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn user_struct(name: impl Into<String>) -> Self {
        TypeSpec::Struct { name: name.into() }
    }

    pub fn user_enum(name: impl Into<String>) -> Self {
        TypeSpec::Enum { name: name.into() }
    }

    pub fn typedef(name: impl Into<String>, target: TypeSpec) -> Self {
        TypeSpec::Typedef {
            name: name.into(),
            target: Box::new(target),
        }
    }

    /// Name of a user-defined type, `None` for built-in types.
    pub fn user_name(&self) -> Option<&str> {
        match self {
            TypeSpec::Struct { name }
            | TypeSpec::Union { name }
            | TypeSpec::Exception { name }
            | TypeSpec::Enum { name }
            | TypeSpec::Typedef { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true for structs, unions and exceptions.
    pub fn is_struct(&self) -> bool {
        matches!(
            self,
            TypeSpec::Struct { .. } | TypeSpec::Union { .. } | TypeSpec::Exception { .. }
        )
    }

    /// Returns true for types backed by a heap-allocated collection.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            TypeSpec::Binary | TypeSpec::List { .. } | TypeSpec::Set { .. } | TypeSpec::Map { .. }
        )
    }

    /// Returns true for bool, integer and double types.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeSpec::Bool
                | TypeSpec::I8
                | TypeSpec::I16
                | TypeSpec::I32
                | TypeSpec::I64
                | TypeSpec::Double
        )
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Bool => write!(f, "bool"),
            TypeSpec::I8 => write!(f, "byte"),
            TypeSpec::I16 => write!(f, "i16"),
            TypeSpec::I32 => write!(f, "i32"),
            TypeSpec::I64 => write!(f, "i64"),
            TypeSpec::Double => write!(f, "double"),
            TypeSpec::String => write!(f, "string"),
            TypeSpec::Binary => write!(f, "binary"),
            TypeSpec::List { value } => write!(f, "list<{}>", value),
            TypeSpec::Set { value } => write!(f, "set<{}>", value),
            TypeSpec::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            TypeSpec::Struct { name }
            | TypeSpec::Union { name }
            | TypeSpec::Exception { name }
            | TypeSpec::Enum { name }
            | TypeSpec::Typedef { name, .. } => write!(f, "{}", name),
        }
    }
}
