//! Declarations making up one IDL module.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TypeSpec;

/// Position in the IDL source that produced a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A field of a struct, union, exception or function argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: i16,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl FieldSpec {
    pub fn required(id: i16, name: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            id,
            name: name.into(),
            ty,
            required: true,
            doc: None,
        }
    }

    pub fn optional(id: i16, name: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            required: false,
            ..Self::required(id, name, ty)
        }
    }
}

/// A struct, union or exception definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// One named value of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumItem {
    pub name: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumSpec {
    pub name: String,
    pub items: Vec<EnumItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedefSpec {
    pub name: String,
    pub target: TypeSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// A user-defined type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDecl {
    Struct(StructSpec),
    Union(StructSpec),
    Exception(StructSpec),
    Enum(EnumSpec),
    Typedef(TypedefSpec),
}

impl TypeDecl {
    /// Name of the declared type as written in the IDL.
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Struct(spec) | TypeDecl::Union(spec) | TypeDecl::Exception(spec) => {
                &spec.name
            }
            TypeDecl::Enum(spec) => &spec.name,
            TypeDecl::Typedef(spec) => &spec.name,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            TypeDecl::Struct(spec) | TypeDecl::Union(spec) | TypeDecl::Exception(spec) => {
                spec.location.as_ref()
            }
            TypeDecl::Enum(spec) => spec.location.as_ref(),
            TypeDecl::Typedef(spec) => spec.location.as_ref(),
        }
    }

    /// Keyword used for this declaration in the IDL (e.g., "exception").
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeDecl::Struct(_) => "struct",
            TypeDecl::Union(_) => "union",
            TypeDecl::Exception(_) => "exception",
            TypeDecl::Enum(_) => "enum",
            TypeDecl::Typedef(_) => "typedef",
        }
    }

    /// A reference to the declared type.
    pub fn type_spec(&self) -> TypeSpec {
        let name = self.name().to_string();
        match self {
            TypeDecl::Struct(_) => TypeSpec::Struct { name },
            TypeDecl::Union(_) => TypeSpec::Union { name },
            TypeDecl::Exception(_) => TypeSpec::Exception { name },
            TypeDecl::Enum(_) => TypeSpec::Enum { name },
            TypeDecl::Typedef(spec) => TypeSpec::Typedef {
                name,
                target: Box::new(spec.target.clone()),
            },
        }
    }
}

/// Literal value of a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    /// A string literal, or the item name for enum-typed constants.
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    pub value: ConstValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// A function of a service contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default)]
    pub args: Vec<FieldSpec>,
    /// Return type, `None` for void functions.
    #[serde(default)]
    pub result: Option<TypeSpec>,
    #[serde(default)]
    pub exceptions: Vec<FieldSpec>,
    #[serde(default)]
    pub oneway: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    #[serde(default)]
    pub functions: Vec<FunctionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Everything declared by one IDL file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub constants: Vec<ConstantSpec>,
    #[serde(default)]
    pub services: Vec<ServiceSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_from_json() {
        let module: Module = serde_json::from_str(
            r#"{
                "name": "users",
                "types": [
                    {
                        "kind": "struct",
                        "name": "User",
                        "fields": [
                            {"id": 1, "name": "name", "type": {"kind": "string"}, "required": true},
                            {"id": 2, "name": "age", "type": {"kind": "i32"}}
                        ],
                        "location": {"file": "users.thrift", "line": 3}
                    },
                    {"kind": "enum", "name": "Role", "items": [{"name": "ADMIN", "value": 1}]}
                ],
                "constants": [
                    {"name": "maxUsers", "type": {"kind": "i32"}, "value": 100}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(module.types.len(), 2);
        let user = &module.types[0];
        assert_eq!(user.name(), "User");
        assert_eq!(user.keyword(), "struct");
        assert_eq!(user.location().unwrap().to_string(), "users.thrift:3");
        match user {
            TypeDecl::Struct(spec) => {
                assert!(spec.fields[0].required);
                assert!(!spec.fields[1].required);
            }
            other => panic!("expected struct, got {:?}", other),
        }
        assert_eq!(module.constants[0].value, ConstValue::Int(100));
    }

    #[test]
    fn test_const_value_untagged() {
        let values: Vec<ConstValue> = serde_json::from_str(r#"[true, 3, 1.5, "hi"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ConstValue::Bool(true),
                ConstValue::Int(3),
                ConstValue::Double(1.5),
                ConstValue::String("hi".to_string()),
            ]
        );
    }

    #[test]
    fn test_type_decl_type_spec() {
        let decl = TypeDecl::Typedef(TypedefSpec {
            name: "UUID".to_string(),
            target: TypeSpec::String,
            doc: None,
            location: None,
        });
        assert_eq!(decl.type_spec(), TypeSpec::typedef("UUID", TypeSpec::String));

        let decl = TypeDecl::Exception(StructSpec {
            name: "NotFound".to_string(),
            fields: vec![],
            doc: None,
            location: None,
        });
        assert_eq!(
            decl.type_spec(),
            TypeSpec::Exception {
                name: "NotFound".to_string()
            }
        );
    }
}
