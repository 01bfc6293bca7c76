//! Type model for the wiregen IDL code generator.
//!
//! This crate provides the resolved description of user types, constants
//! and service contracts handed to the code generators by the IDL front end.
//!
//! # Architecture
//!
//! ```text
//! .thrift (IDL) → front end (parse + resolve) → wiregen-ir → codegen
//! ```
//!
//! The types are:
//! - Language-agnostic (no Rust-specific concerns)
//! - Fully resolved (typedef targets are inlined, names are final)
//! - Serde-serializable, so the front end can hand them over as JSON

mod module;
mod types;

pub use module::{
    ConstValue, ConstantSpec, EnumItem, EnumSpec, FieldSpec, FunctionSpec, Location, Module,
    ServiceSpec, StructSpec, TypeDecl, TypedefSpec,
};
pub use types::TypeSpec;
