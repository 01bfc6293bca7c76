//! Rust-specific naming conventions.

use wiregen_codegen::NamingConvention;
use wiregen_core::{to_pascal_case, to_screaming_snake_case, to_snake_case};

/// Keywords that cannot be raw identifiers get an underscore instead.
fn escape_rust_reserved(name: &str) -> String {
    match name {
        "crate" | "self" | "Self" | "super" => format!("{}_", name),
        _ => format!("r#{}", name),
    }
}

/// Rust naming conventions.
pub const RUST_NAMING: NamingConvention = NamingConvention {
    type_case: to_pascal_case,
    field_case: to_snake_case,
    const_case: to_screaming_snake_case,
    reserved_words: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
        "final", "gen", "macro", "override", "priv", "try", "typeof", "unsized", "virtual",
        "yield",
    ],
    path_roots: &["crate", "self", "super"],
    escape_reserved: escape_rust_reserved,
    path_separator: "::",
};

/// Prelude names generated code refers to unqualified.
pub const PRELUDE: &[&str] = &[
    "Option", "Some", "None", "Result", "Ok", "Err", "String", "Vec", "Box",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_naming_type() {
        assert_eq!(RUST_NAMING.type_name("hello_world"), "HelloWorld");
        assert_eq!(RUST_NAMING.type_name("HTTP_ERROR"), "HttpError");
    }

    #[test]
    fn test_rust_naming_field() {
        assert_eq!(RUST_NAMING.field_name("UserName"), "user_name");
        assert_eq!(RUST_NAMING.field_name("userId"), "user_id");
    }

    #[test]
    fn test_rust_naming_const() {
        assert_eq!(RUST_NAMING.const_name("maxRetries"), "MAX_RETRIES");
    }

    #[test]
    fn test_rust_reserved_words() {
        assert!(RUST_NAMING.is_reserved("type"));
        assert!(RUST_NAMING.is_reserved("async"));
        assert!(RUST_NAMING.is_reserved("gen"));
        assert!(!RUST_NAMING.is_reserved("hello"));
    }

    #[test]
    fn test_rust_escape_reserved() {
        assert_eq!(RUST_NAMING.safe_name("type"), "r#type");
        assert_eq!(RUST_NAMING.safe_name("self"), "self_");
        assert_eq!(RUST_NAMING.safe_name("hello"), "hello");
    }

    #[test]
    fn test_rust_paths() {
        assert_eq!(RUST_NAMING.normalize_path("thriftrw/wire"), "thriftrw::wire");
        assert_eq!(RUST_NAMING.normalize_path("crate::types::match"), "crate::types::r#match");
        assert_eq!(RUST_NAMING.normalize_path("super::super::shared"), "super::super::shared");
        assert_eq!(RUST_NAMING.module_alias("thriftrw::wire"), "wire");
    }
}
