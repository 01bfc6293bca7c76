//! Core utilities for the wiregen IDL code generator.
//!
//! This crate provides the identifier transformations shared by every
//! code generation backend.

mod utils;

// String utilities
pub use utils::{sanitize_identifier, to_pascal_case, to_screaming_snake_case, to_snake_case};
