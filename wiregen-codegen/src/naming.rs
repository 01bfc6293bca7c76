//! Naming conventions for target languages.

use wiregen_core::sanitize_identifier;

/// Language-specific naming conventions.
///
/// Defines how IDL identifiers become type, field and constant names, how
/// module paths are spelled, and which words the language reserves.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Transform an IDL name to a type name (e.g., "user_profile" -> "UserProfile")
    pub type_case: fn(&str) -> String,
    /// Transform an IDL name to a field or function name
    pub field_case: fn(&str) -> String,
    /// Transform an IDL name to a constant name
    pub const_case: fn(&str) -> String,
    /// List of reserved words in the language
    pub reserved_words: &'static [&'static str],
    /// Keywords allowed verbatim as the first segment of a module path
    pub path_roots: &'static [&'static str],
    /// Escape a reserved word (e.g., "type" -> "r#type" in Rust)
    pub escape_reserved: fn(&str) -> String,
    /// Separator between module path segments
    pub path_separator: &'static str,
}

impl NamingConvention {
    /// Check if a name is a reserved word.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// Get a safe name, escaping if necessary.
    pub fn safe_name(&self, name: &str) -> String {
        if self.is_reserved(name) {
            (self.escape_reserved)(name)
        } else {
            name.to_string()
        }
    }

    /// Transform to a type name.
    ///
    /// Type names are never escaped: a type named after a keyword is a
    /// collision the symbol table reports.
    pub fn type_name(&self, name: &str) -> String {
        let transformed = (self.type_case)(name);
        if transformed.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{}", transformed)
        } else {
            transformed
        }
    }

    /// Transform and make safe for use as a field name.
    pub fn field_name(&self, name: &str) -> String {
        let transformed = sanitize_identifier(&(self.field_case)(name));
        self.safe_name(&transformed)
    }

    /// Transform to a constant name.
    pub fn const_name(&self, name: &str) -> String {
        sanitize_identifier(&(self.const_case)(name))
    }

    /// Split a module path written with `/` or the language separator.
    fn segments<'a>(&self, path: &'a str) -> impl Iterator<Item = &'a str> {
        let separator = self.path_separator;
        path.split('/')
            .flat_map(move |part| part.split(separator))
            .map(|segment| segment.trim().trim_start_matches("r#"))
            .filter(|segment| !segment.is_empty())
    }

    /// Normalize a module path into the language's path syntax.
    ///
    /// Every segment is sanitized into an identifier and escaped when it is a
    /// reserved word, except path roots in leading position (`crate::`,
    /// `super::super::`).
    pub fn normalize_path(&self, path: &str) -> String {
        let mut leading = true;
        self.segments(path)
            .map(|segment| {
                leading = leading && self.path_roots.contains(&segment);
                if leading {
                    segment.to_string()
                } else {
                    self.safe_name(&sanitize_identifier(segment))
                }
            })
            .collect::<Vec<_>>()
            .join(self.path_separator)
    }

    /// Preferred local alias for a module: its trailing segment, sanitized
    /// and lower-cased.
    pub fn module_alias(&self, path: &str) -> String {
        let trailing = self.segments(path).last().unwrap_or_default();
        sanitize_identifier(trailing).to_lowercase()
    }

    /// The name a module path binds when imported without an alias.
    pub fn trailing_segment<'a>(&self, path: &'a str) -> &'a str {
        self.segments(path).last().unwrap_or_default()
    }
}
