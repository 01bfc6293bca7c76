//! Shared source synthesis primitives for wiregen.
//!
//! This crate provides the language-agnostic bookkeeping used by the
//! language-specific generators (e.g., `wiregen-codegen-rust`).
//!
//! # Module Organization
//!
//! - [`symbols`] - Scoped symbol table (reservations, fresh names)
//! - [`imports`] - Import registry with conflict-free aliases
//! - [`naming`] - Language naming conventions and reserved words
//! - [`language`] - Type mapping traits implemented per target language
//! - [`config`] - Generator options loaded from TOML
//! - [`error`] - Error taxonomy shared by every backend

pub mod config;
pub mod error;
pub mod imports;
pub mod language;
pub mod naming;
pub mod symbols;

pub use config::GeneratorConfig;
pub use error::{CollisionReason, Error, Result};
pub use imports::{Import, ImportRegistry};
pub use language::TypeMapper;
pub use naming::NamingConvention;
pub use symbols::{ScopeId, SymbolTable};
