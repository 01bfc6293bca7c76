//! Rust type mapper implementation.

use std::collections::HashSet;

use wiregen_codegen::TypeMapper;
use wiregen_ir::{ConstValue, TypeSpec};

use crate::RUST_NAMING;

/// Rust type mapper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustTypeMapper;

impl TypeMapper for RustTypeMapper {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn map_type(&self, spec: &TypeSpec) -> String {
        match spec {
            TypeSpec::Bool => "bool".to_string(),
            TypeSpec::I8 => "i8".to_string(),
            TypeSpec::I16 => "i16".to_string(),
            TypeSpec::I32 => "i32".to_string(),
            TypeSpec::I64 => "i64".to_string(),
            TypeSpec::Double => "f64".to_string(),
            TypeSpec::String => "String".to_string(),
            TypeSpec::Binary => "Vec<u8>".to_string(),
            TypeSpec::List { value } => format!("Vec<{}>", self.map_type(value)),
            TypeSpec::Set { value } => {
                format!("::std::collections::HashSet<{}>", self.map_type(value))
            }
            TypeSpec::Map { key, value } => format!(
                "::std::collections::HashMap<{}, {}>",
                self.map_type(key),
                self.map_type(value)
            ),
            TypeSpec::Struct { name }
            | TypeSpec::Union { name }
            | TypeSpec::Exception { name }
            | TypeSpec::Enum { name }
            | TypeSpec::Typedef { name, .. } => RUST_NAMING.type_name(name),
        }
    }

    fn map_optional(&self, inner: &str) -> String {
        format!("Option<{}>", inner)
    }
}

impl RustTypeMapper {
    /// Name a user-defined type is declared under, `None` for built-ins.
    pub fn decl_name(&self, spec: &TypeSpec) -> Option<String> {
        spec.user_name().map(|name| RUST_NAMING.type_name(name))
    }

    /// Type of a `const` item holding a value of `spec`.
    pub fn const_type(&self, spec: &TypeSpec) -> String {
        match spec {
            TypeSpec::String => "&str".to_string(),
            other => self.map_type(other),
        }
    }

    /// Whether values of `spec` implement `Eq` and `Hash`.
    ///
    /// `hashable` names the user structs known to derive both; enums always
    /// do and typedefs follow their target.
    pub fn is_hashable(&self, spec: &TypeSpec, hashable: &HashSet<String>) -> bool {
        match spec {
            TypeSpec::Double | TypeSpec::Set { .. } | TypeSpec::Map { .. } => false,
            TypeSpec::List { value } => self.is_hashable(value, hashable),
            TypeSpec::Typedef { target, .. } => self.is_hashable(target, hashable),
            TypeSpec::Struct { name } | TypeSpec::Union { name } | TypeSpec::Exception { name } => {
                hashable.contains(name)
            }
            TypeSpec::Bool
            | TypeSpec::I8
            | TypeSpec::I16
            | TypeSpec::I32
            | TypeSpec::I64
            | TypeSpec::String
            | TypeSpec::Binary
            | TypeSpec::Enum { .. } => true,
        }
    }

    /// The first set element or map key type within `spec` that cannot be
    /// hashed.
    pub fn unhashable_key<'a>(
        &self,
        spec: &'a TypeSpec,
        hashable: &HashSet<String>,
    ) -> Option<&'a TypeSpec> {
        match spec {
            TypeSpec::Set { value } if !self.is_hashable(value, hashable) => Some(value.as_ref()),
            TypeSpec::Map { key, .. } if !self.is_hashable(key, hashable) => Some(key.as_ref()),
            TypeSpec::List { value } | TypeSpec::Set { value } => {
                self.unhashable_key(value, hashable)
            }
            TypeSpec::Map { key, value } => self
                .unhashable_key(key, hashable)
                .or_else(|| self.unhashable_key(value, hashable)),
            TypeSpec::Typedef { target, .. } => self.unhashable_key(target, hashable),
            _ => None,
        }
    }

    /// Rust literal for a constant value, `None` when the value cannot be
    /// expressed in a `const` item of the given type.
    pub fn literal(&self, spec: &TypeSpec, value: &ConstValue) -> Option<String> {
        match (spec, value) {
            (TypeSpec::Bool, ConstValue::Bool(b)) => Some(b.to_string()),
            (TypeSpec::I8 | TypeSpec::I16 | TypeSpec::I32 | TypeSpec::I64, ConstValue::Int(i)) => {
                Some(i.to_string())
            }
            (TypeSpec::Double, ConstValue::Double(f)) => Some(float_literal(*f)),
            (TypeSpec::Double, ConstValue::Int(i)) => Some(float_literal(*i as f64)),
            (TypeSpec::String, ConstValue::String(s)) => Some(format!("{:?}", s)),
            (TypeSpec::Enum { name }, ConstValue::String(item)) => Some(format!(
                "{}::{}",
                RUST_NAMING.type_name(name),
                RUST_NAMING.type_name(item)
            )),
            (TypeSpec::Typedef { name, target }, value) if target.is_primitive() => Some(format!(
                "{}({})",
                RUST_NAMING.type_name(name),
                self.literal(target, value)?
            )),
            _ => None,
        }
    }
}

fn float_literal(f: f64) -> String {
    if f.is_nan() {
        "f64::NAN".to_string()
    } else if f.is_infinite() && f > 0.0 {
        "f64::INFINITY".to_string()
    } else if f.is_infinite() {
        "f64::NEG_INFINITY".to_string()
    } else {
        format!("{:?}", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_primitives() {
        let mapper = RustTypeMapper;
        assert_eq!(mapper.map_type(&TypeSpec::Double), "f64");
        assert_eq!(mapper.map_type(&TypeSpec::Binary), "Vec<u8>");
        assert_eq!(mapper.map_type(&TypeSpec::I8), "i8");
    }

    #[test]
    fn test_map_containers() {
        let mapper = RustTypeMapper;
        let spec = TypeSpec::map(TypeSpec::String, TypeSpec::list(TypeSpec::user_struct("user")));
        assert_eq!(
            mapper.map_type(&spec),
            "::std::collections::HashMap<String, Vec<User>>"
        );
        assert_eq!(
            mapper.map_type(&TypeSpec::set(TypeSpec::I64)),
            "::std::collections::HashSet<i64>"
        );
    }

    #[test]
    fn test_optional_reference_is_wrapped() {
        let mapper = RustTypeMapper;
        assert_eq!(mapper.type_reference(&TypeSpec::I32, false), "Option<i32>");
        assert_eq!(
            mapper.type_reference(&TypeSpec::list(TypeSpec::I32), false),
            "Option<Vec<i32>>"
        );
        assert_eq!(mapper.type_reference(&TypeSpec::I32, true), "i32");
    }

    #[test]
    fn test_decl_name() {
        let mapper = RustTypeMapper;
        assert_eq!(
            mapper.decl_name(&TypeSpec::user_enum("user_role")).as_deref(),
            Some("UserRole")
        );
        assert_eq!(mapper.decl_name(&TypeSpec::String), None);
    }

    #[test]
    fn test_literals() {
        let mapper = RustTypeMapper;
        assert_eq!(
            mapper.literal(&TypeSpec::I32, &ConstValue::Int(42)).as_deref(),
            Some("42")
        );
        assert_eq!(
            mapper.literal(&TypeSpec::Double, &ConstValue::Int(3)).as_deref(),
            Some("3.0")
        );
        assert_eq!(
            mapper
                .literal(&TypeSpec::String, &ConstValue::String("a\"b".to_string()))
                .as_deref(),
            Some(r#""a\"b""#)
        );
        assert_eq!(
            mapper
                .literal(&TypeSpec::user_enum("Role"), &ConstValue::String("ADMIN".to_string()))
                .as_deref(),
            Some("Role::Admin")
        );
        assert_eq!(
            mapper
                .literal(&TypeSpec::typedef("Port", TypeSpec::I16), &ConstValue::Int(80))
                .as_deref(),
            Some("Port(80)")
        );
        assert_eq!(mapper.literal(&TypeSpec::Bool, &ConstValue::Int(1)), None);
        assert_eq!(
            mapper.literal(&TypeSpec::list(TypeSpec::I32), &ConstValue::Int(1)),
            None
        );
    }

    #[test]
    fn test_hashable_types() {
        let mapper = RustTypeMapper;
        let known: HashSet<String> = ["Point".to_string()].into();

        assert!(mapper.is_hashable(&TypeSpec::String, &known));
        assert!(mapper.is_hashable(&TypeSpec::user_enum("Role"), &known));
        assert!(mapper.is_hashable(&TypeSpec::list(TypeSpec::user_struct("Point")), &known));
        assert!(mapper.is_hashable(&TypeSpec::typedef("Uuid", TypeSpec::String), &known));
        assert!(!mapper.is_hashable(&TypeSpec::Double, &known));
        assert!(!mapper.is_hashable(&TypeSpec::typedef("Score", TypeSpec::Double), &known));
        assert!(!mapper.is_hashable(&TypeSpec::user_struct("Shape"), &known));
        assert!(!mapper.is_hashable(&TypeSpec::set(TypeSpec::I32), &known));
    }

    #[test]
    fn test_unhashable_keys() {
        let mapper = RustTypeMapper;
        let known = HashSet::new();

        let scores = TypeSpec::map(TypeSpec::Double, TypeSpec::I32);
        assert_eq!(mapper.unhashable_key(&scores, &known), Some(&TypeSpec::Double));

        let nested = TypeSpec::list(TypeSpec::set(TypeSpec::user_struct("Shape")));
        assert_eq!(
            mapper.unhashable_key(&nested, &known),
            Some(&TypeSpec::user_struct("Shape"))
        );

        let by_id = TypeSpec::map(
            TypeSpec::typedef("Uuid", TypeSpec::String),
            TypeSpec::set(TypeSpec::I64),
        );
        assert_eq!(mapper.unhashable_key(&by_id, &known), None);
    }
}
