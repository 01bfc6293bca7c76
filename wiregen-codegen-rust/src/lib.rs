//! Rust code generation for wiregen.
//!
//! A [`Generator`] builds one compilation unit from template-rendered
//! fragments. Templates are written in Tera and call back into the unit to
//! allocate names, import modules and produce wire codec expressions; every
//! rendered fragment is parsed with `syn` before its declarations are
//! registered and appended. [`Generator::declare_module`] drives the
//! built-in templates for a whole type-model module.

mod declarations;
mod fragment;
mod generator;
mod naming;
mod rust_file;
mod template;
mod type_mapper;
mod wire;

pub use generator::Generator;
pub use naming::{PRELUDE, RUST_NAMING};
pub use rust_file::{RustFile, Use};
pub use type_mapper::RustTypeMapper;
pub use wiregen_codegen::{Error, GeneratorConfig, Result};
