//! RustFile abstraction for assembling a compilation unit.
//!
//! Combines the consolidated import block with accepted declarations and
//! formats the result with `prettyplease`.

use wiregen_codegen::{Error, Import, Result};

/// A Rust use statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Use {
    path: String,
    alias: Option<String>,
}

impl Use {
    /// Create a use statement for a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    /// Bind the path under another name.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Format the use statement as a string.
    pub fn format(&self) -> String {
        match &self.alias {
            Some(alias) => format!("use {} as {};", self.path, alias),
            None => format!("use {};", self.path),
        }
    }

    fn to_item(&self) -> Result<syn::Item> {
        let source = self.format();
        syn::parse_str(&source).map_err(|e| Error::fragment_syntax(e.to_string(), &source, None))
    }

    /// The use statement for a registered import.
    pub fn from_import(import: &Import, renamed: bool) -> Self {
        let use_stmt = Use::new(&import.path);
        if renamed {
            use_stmt.alias(&import.alias)
        } else {
            use_stmt
        }
    }
}

/// A structured representation of a Rust file.
///
/// Organizes code into imports and body sections.
///
/// # Example
///
/// ```
/// use wiregen_codegen_rust::{RustFile, Use};
///
/// let item: syn::Item = syn::parse_str("pub struct Foo;").unwrap();
/// let code = RustFile::new()
///     .use_stmt(Use::new("thriftrw::wire"))
///     .add(item)
///     .render()
///     .unwrap();
/// assert_eq!(code, "use thriftrw::wire;\npub struct Foo;\n");
/// ```
#[derive(Debug, Default)]
pub struct RustFile {
    uses: Vec<Use>,
    body: Vec<syn::Item>,
}

impl RustFile {
    /// Create a new empty RustFile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a use statement.
    pub fn use_stmt(mut self, use_stmt: Use) -> Self {
        self.uses.push(use_stmt);
        self
    }

    /// Add multiple use statements.
    pub fn use_stmts(mut self, uses: impl IntoIterator<Item = Use>) -> Self {
        self.uses.extend(uses);
        self
    }

    /// Add a body item.
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, item: syn::Item) -> Self {
        self.body.push(item);
        self
    }

    /// Add multiple body items.
    pub fn add_all(mut self, items: impl IntoIterator<Item = syn::Item>) -> Self {
        self.body.extend(items);
        self
    }

    /// Render the file through the canonical formatter.
    pub fn render(&self) -> Result<String> {
        let mut items = Vec::with_capacity(self.uses.len() + self.body.len());
        for use_stmt in &self.uses {
            items.push(use_stmt.to_item()?);
        }
        items.extend(self.body.iter().cloned());

        let file = syn::File {
            shebang: None,
            attrs: Vec::new(),
            items,
        };
        Ok(prettyplease::unparse(&file))
    }

    /// Render the file with a header comment.
    pub fn render_with_header(&self, header: &str) -> Result<String> {
        let content = self.render()?;
        if content.is_empty() {
            Ok(format!("{}\n", header))
        } else {
            Ok(format!("{}\n\n{}", header, content))
        }
    }

    /// Check if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.uses.is_empty() && self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(source: &str) -> syn::Item {
        syn::parse_str(source).unwrap()
    }

    #[test]
    fn test_empty_file() {
        let file = RustFile::new();
        assert!(file.is_empty());
        assert_eq!(file.render().unwrap(), "");
    }

    #[test]
    fn test_use_formats() {
        assert_eq!(Use::new("std::fmt").format(), "use std::fmt;");
        assert_eq!(
            Use::new("thriftrw::wire").alias("wire2").format(),
            "use thriftrw::wire as wire2;"
        );
    }

    #[test]
    fn test_use_from_import() {
        let import = Import {
            path: "foo::bar".to_string(),
            alias: "bar2".to_string(),
        };
        assert_eq!(Use::from_import(&import, true).format(), "use foo::bar as bar2;");
        assert_eq!(Use::from_import(&import, false).format(), "use foo::bar;");
    }

    #[test]
    fn test_body_is_formatted() {
        let code = RustFile::new()
            .add(item("pub struct   Foo{x:i32}"))
            .add(item("fn f( )->i32{1}"))
            .render()
            .unwrap();
        insta::assert_snapshot!(code, @r"
        pub struct Foo {
            x: i32,
        }
        fn f() -> i32 {
            1
        }
        ");
    }

    #[test]
    fn test_render_with_header() {
        let file = RustFile::new().use_stmt(Use::new("std::fmt"));
        assert_eq!(
            file.render_with_header("// @generated").unwrap(),
            "// @generated\n\nuse std::fmt;\n"
        );
        assert_eq!(
            RustFile::new().render_with_header("// @generated").unwrap(),
            "// @generated\n"
        );
    }

    #[test]
    fn test_invalid_use_is_reported() {
        let err = RustFile::new()
            .use_stmt(Use::new("foo::"))
            .render()
            .unwrap_err();
        assert!(err.is_fragment_syntax());
    }
}
