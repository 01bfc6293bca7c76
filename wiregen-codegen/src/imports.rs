//! Import registry with conflict-free aliases.

use indexmap::IndexMap;
use tracing::debug;

use crate::{Error, NamingConvention, Result, ScopeId, SymbolTable};

/// A module imported into the compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Normalized module path (e.g., `std::fmt`).
    pub path: String,
    /// Name generated code uses to refer to the module.
    pub alias: String,
}

/// Tracks imported modules and the alias promised for each.
///
/// Aliases are claimed in the root scope of the unit's [`SymbolTable`], so
/// they never collide with each other or with declared names. Entries are
/// kept in insertion order; [`ImportRegistry::emit`] sorts them by path.
///
/// # Example
///
/// ```
/// use wiregen_codegen::{ImportRegistry, NamingConvention, SymbolTable};
/// use wiregen_core::{to_pascal_case, to_screaming_snake_case, to_snake_case};
///
/// fn escape(name: &str) -> String {
///     format!("{}_", name)
/// }
///
/// let naming = NamingConvention {
///     type_case: to_pascal_case,
///     field_case: to_snake_case,
///     const_case: to_screaming_snake_case,
///     reserved_words: &[],
///     path_roots: &[],
///     escape_reserved: escape,
///     path_separator: "::",
/// };
///
/// let mut symbols = SymbolTable::new(&[]);
/// let mut imports = ImportRegistry::new(naming);
///
/// assert_eq!(imports.import(&mut symbols, "foo/bar").unwrap(), "bar");
/// assert_eq!(imports.import(&mut symbols, "baz/bar").unwrap(), "bar2");
/// assert_eq!(imports.import(&mut symbols, "foo/bar").unwrap(), "bar");
/// ```
#[derive(Debug, Clone)]
pub struct ImportRegistry {
    naming: NamingConvention,
    /// Normalized module path -> import
    imports: IndexMap<String, Import>,
}

impl ImportRegistry {
    pub fn new(naming: NamingConvention) -> Self {
        Self {
            naming,
            imports: IndexMap::new(),
        }
    }

    /// Import a module on behalf of generated code and return its alias.
    ///
    /// Repeated calls for the same path return the same alias. The first
    /// call derives the alias from the path's trailing segment and claims it,
    /// adding a numeric suffix when the name is taken.
    pub fn import(&mut self, symbols: &mut SymbolTable, module_path: &str) -> Result<String> {
        let path = self.naming.normalize_path(module_path);
        if path.is_empty() {
            return Err(Error::template(format!(
                "cannot import `{}`: the module path is empty",
                module_path
            )));
        }
        if let Some(existing) = self.imports.get(&path) {
            return Ok(existing.alias.clone());
        }

        let alias = symbols.fresh_name(ScopeId::ROOT, &self.naming.module_alias(module_path));
        debug!(path = path.as_str(), alias = alias.as_str(), "imported module");
        self.imports.insert(
            path.clone(),
            Import {
                path,
                alias: alias.clone(),
            },
        );
        Ok(alias)
    }

    /// Reconcile an import written literally in a fragment.
    ///
    /// Importing an already registered path under its registered alias is a
    /// no-op. Importing it under another alias, or binding an alias that
    /// another path already holds, is a duplicate import. An alias held by a
    /// declaration is a name collision.
    pub fn add_explicit(
        &mut self,
        symbols: &mut SymbolTable,
        module_path: &str,
        alias: &str,
    ) -> Result<()> {
        let path = self.naming.normalize_path(module_path);

        if let Some(existing) = self.imports.get(&path) {
            if existing.alias == alias {
                return Ok(());
            }
            return Err(Error::duplicate_import(
                path,
                alias,
                format!("it is already imported as `{}`", existing.alias),
            ));
        }

        if let Some(other) = self.imports.values().find(|import| import.alias == alias) {
            return Err(Error::duplicate_import(
                path,
                alias,
                format!("the alias already refers to `{}`", other.path),
            ));
        }

        symbols.reserve(ScopeId::ROOT, alias)?;
        debug!(path = path.as_str(), alias, "registered explicit import");
        self.imports.insert(
            path.clone(),
            Import {
                path,
                alias: alias.to_string(),
            },
        );
        Ok(())
    }

    /// Get the alias of an imported module.
    pub fn alias(&self, module_path: &str) -> Option<&str> {
        self.imports
            .get(&self.naming.normalize_path(module_path))
            .map(|import| import.alias.as_str())
    }

    /// Whether the import binds a name other than its trailing segment.
    pub fn is_renamed(&self, import: &Import) -> bool {
        self.naming.safe_name(self.naming.trailing_segment(&import.path)) != import.alias
    }

    /// All imports sorted by module path.
    pub fn emit(&self) -> Vec<&Import> {
        let mut imports: Vec<&Import> = self.imports.values().collect();
        imports.sort_by(|a, b| a.path.cmp(&b.path));
        imports
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiregen_core::{to_pascal_case, to_screaming_snake_case, to_snake_case};

    use super::*;
    use crate::CollisionReason;

    fn escape_with_underscore(name: &str) -> String {
        format!("{}_", name)
    }

    const TEST_NAMING: NamingConvention = NamingConvention {
        type_case: to_pascal_case,
        field_case: to_snake_case,
        const_case: to_screaming_snake_case,
        reserved_words: &["type"],
        path_roots: &[],
        escape_reserved: escape_with_underscore,
        path_separator: "::",
    };

    fn escape_raw(name: &str) -> String {
        format!("r#{}", name)
    }

    fn setup_rust_like() -> (SymbolTable, ImportRegistry) {
        let naming = NamingConvention {
            escape_reserved: escape_raw,
            ..TEST_NAMING
        };
        (SymbolTable::new(naming.reserved_words), ImportRegistry::new(naming))
    }

    fn setup() -> (SymbolTable, ImportRegistry) {
        (
            SymbolTable::new(TEST_NAMING.reserved_words),
            ImportRegistry::new(TEST_NAMING),
        )
    }

    #[test]
    fn test_import_is_idempotent() {
        let (mut symbols, mut imports) = setup();
        let first = imports.import(&mut symbols, "strings").unwrap();
        let second = imports.import(&mut symbols, "strings").unwrap();

        assert_eq!(first, "strings");
        assert_eq!(first, second);
        assert_eq!(imports.len(), 1);
    }

    #[test]
    fn test_same_trailing_segment_gets_suffix() {
        let (mut symbols, mut imports) = setup();
        assert_eq!(imports.import(&mut symbols, "foo/bar").unwrap(), "bar");
        assert_eq!(imports.import(&mut symbols, "baz/bar").unwrap(), "bar2");
        assert_eq!(imports.alias("baz::bar"), Some("bar2"));
    }

    #[test]
    fn test_alias_avoids_declared_names() {
        let (mut symbols, mut imports) = setup();
        symbols.reserve(ScopeId::ROOT, "wire").unwrap();
        assert_eq!(imports.import(&mut symbols, "thriftrw::wire").unwrap(), "wire2");
    }

    #[test]
    fn test_keyword_alias_gets_suffix() {
        let (mut symbols, mut imports) = setup();
        assert_eq!(imports.import(&mut symbols, "foo::type").unwrap(), "type2");
        assert_eq!(imports.emit()[0].path, "foo::type_");
    }

    #[test]
    fn test_emit_sorted_by_path() {
        let (mut symbols, mut imports) = setup();
        imports.import(&mut symbols, "zeta::wire").unwrap();
        imports.import(&mut symbols, "alpha::wire").unwrap();

        let emitted: Vec<(&str, &str)> = imports
            .emit()
            .into_iter()
            .map(|import| (import.path.as_str(), import.alias.as_str()))
            .collect();
        assert_eq!(emitted, vec![("alpha::wire", "wire2"), ("zeta::wire", "wire")]);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let run = || {
            let (mut symbols, mut imports) = setup();
            for path in ["a/x", "b/x", "c::y", "a/x"] {
                imports.import(&mut symbols, path).unwrap();
            }
            imports
                .emit()
                .into_iter()
                .cloned()
                .collect::<Vec<Import>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let (mut symbols, mut imports) = setup();
        for path in ["", "::", " / "] {
            let err = imports.import(&mut symbols, path).unwrap_err();
            assert!(err.is_template());
        }
        assert!(imports.is_empty());
        assert!(!symbols.is_taken(ScopeId::ROOT, "_"));
    }

    #[test]
    fn test_raw_alias_is_not_a_rename() {
        let (mut symbols, mut imports) = setup_rust_like();
        imports
            .add_explicit(&mut symbols, "foo::r#type", "r#type")
            .unwrap();

        let import = imports.emit()[0];
        assert_eq!(import.path, "foo::r#type");
        assert!(!imports.is_renamed(import));
    }

    #[test]
    fn test_explicit_import_matching_alias() {
        let (mut symbols, mut imports) = setup();
        let alias = imports.import(&mut symbols, "std::fmt").unwrap();
        imports.add_explicit(&mut symbols, "std::fmt", &alias).unwrap();
        assert_eq!(imports.len(), 1);
    }

    #[test]
    fn test_explicit_import_with_other_alias() {
        let (mut symbols, mut imports) = setup();
        imports.import(&mut symbols, "std::fmt").unwrap();

        let err = imports
            .add_explicit(&mut symbols, "std::fmt", "f")
            .unwrap_err();
        assert!(matches!(*err, Error::DuplicateImport { .. }));
    }

    #[test]
    fn test_explicit_import_alias_held_by_other_path() {
        let (mut symbols, mut imports) = setup();
        imports.import(&mut symbols, "foo::bar").unwrap();

        let err = imports
            .add_explicit(&mut symbols, "baz::bar", "bar")
            .unwrap_err();
        assert!(matches!(*err, Error::DuplicateImport { .. }));
    }

    #[test]
    fn test_explicit_import_alias_held_by_declaration() {
        let (mut symbols, mut imports) = setup();
        symbols.reserve(ScopeId::ROOT, "HashMap").unwrap();

        let err = imports
            .add_explicit(&mut symbols, "std::collections::HashMap", "HashMap")
            .unwrap_err();
        assert!(matches!(
            *err,
            Error::NameCollision {
                reason: CollisionReason::AlreadyDeclared,
                ..
            }
        ));
    }

    #[test]
    fn test_explicit_import_claims_alias() {
        let (mut symbols, mut imports) = setup();
        imports
            .add_explicit(&mut symbols, "std::collections::HashMap", "HashMap")
            .unwrap();

        assert!(symbols.is_taken(ScopeId::ROOT, "HashMap"));
        let import = imports.emit()[0];
        assert!(!imports.is_renamed(import));
    }
}
