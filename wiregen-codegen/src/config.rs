//! Generator options.

use std::{path::Path, str::FromStr};

use serde::Deserialize;

use crate::{Error, Result};

/// Default module path of the wire codec library generated code calls into.
pub const DEFAULT_WIRE_MODULE: &str = "thriftrw::wire";

/// Default banner written above every generated unit.
pub const DEFAULT_HEADER: &str = "// Code generated by wiregen. DO NOT EDIT.";

/// Options shared by every compilation unit of one generator run.
///
/// Loaded from `wiregen.toml`:
///
/// ```toml
/// wire_module = "my_codec::wire"
/// header = "// @generated"
/// reserved_names = ["Client"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Module path of the wire codec library.
    pub wire_module: String,
    /// Comment written before the generated code, if any.
    pub header: Option<String>,
    /// Extra identifiers generated declarations must never claim.
    pub reserved_names: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            wire_module: DEFAULT_WIRE_MODULE.to_string(),
            header: Some(DEFAULT_HEADER.to_string()),
            reserved_names: Vec::new(),
        }
    }
}

impl FromStr for GeneratorConfig {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "wiregen.toml")
    }
}

impl GeneratorConfig {
    /// Parse a wiregen.toml file from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Read {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a wiregen.toml from a string with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e, content, filename))
    }

    pub fn with_wire_module(mut self, module: impl Into<String>) -> Self {
        self.wire_module = module.into();
        self
    }

    pub fn with_header(mut self, header: Option<String>) -> Self {
        self.header = header;
        self
    }
}
