//! Scoped symbol table for generated identifiers.
//!
//! The root scope holds every top-level name of a compilation unit. Child
//! scopes hold function-local names: they see every name of their ancestors
//! but their own reservations stay invisible to the parent, so two function
//! bodies never observe each other's locals.

use std::collections::HashSet;

use tracing::trace;

use crate::{CollisionReason, Error, Result};

/// Handle to a scope of a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The whole-unit scope.
    pub const ROOT: ScopeId = ScopeId(0);
}

#[derive(Debug, Clone, Default)]
struct Scope {
    parent: Option<ScopeId>,
    taken: HashSet<String>,
}

/// Registry of identifiers claimed in one compilation unit.
///
/// Scopes are allocated in stack order. Releasing a scope discards it
/// together with every scope opened after it.
///
/// # Panics
///
/// Operations on a [`ScopeId`] that has been released panic.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    keywords: &'static [&'static str],
}

impl SymbolTable {
    /// Create a table whose names may never equal one of `keywords`.
    pub fn new(keywords: &'static [&'static str]) -> Self {
        Self {
            scopes: vec![Scope::default()],
            keywords,
        }
    }

    /// Pre-claim names in the root scope. Duplicates are ignored.
    pub fn with_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes[ScopeId::ROOT.0]
            .taken
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Open a scope nested in `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(parent),
            taken: HashSet::new(),
        });
        id
    }

    /// Discard `scope` and every scope opened after it. The root scope is
    /// never released.
    pub fn release(&mut self, scope: ScopeId) {
        if scope != ScopeId::ROOT {
            self.scopes.truncate(scope.0);
        }
    }

    /// Number of scopes currently open, root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_keyword(&self, name: &str) -> bool {
        self.keywords.contains(&name)
    }

    /// Check whether `name` is claimed in `scope` or any of its ancestors.
    pub fn is_claimed(&self, scope: ScopeId, name: &str) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if scope.taken.contains(name) {
                return true;
            }
            current = scope.parent;
        }
        false
    }

    /// Check whether `name` is unavailable in `scope`.
    pub fn is_taken(&self, scope: ScopeId, name: &str) -> bool {
        self.is_keyword(name) || self.is_claimed(scope, name)
    }

    /// Claim `name` in `scope`.
    pub fn reserve(&mut self, scope: ScopeId, name: &str) -> Result<()> {
        if self.is_keyword(name) {
            return Err(Error::name_collision(
                name,
                CollisionReason::ReservedKeyword,
            ));
        }
        if self.is_claimed(scope, name) {
            return Err(Error::name_collision(
                name,
                CollisionReason::AlreadyDeclared,
            ));
        }
        trace!(name, "reserved name");
        self.scopes[scope.0].taken.insert(name.to_string());
        Ok(())
    }

    /// Claim and return `preferred` if it is free in `scope`, otherwise the
    /// first free name among `preferred2`, `preferred3`, ...
    pub fn fresh_name(&mut self, scope: ScopeId, preferred: &str) -> String {
        let mut name = preferred.to_string();
        let mut suffix = 2usize;
        while self.is_taken(scope, &name) {
            name = format!("{}{}", preferred, suffix);
            suffix += 1;
        }
        trace!(preferred, name = name.as_str(), "allocated fresh name");
        self.scopes[scope.0].taken.insert(name.clone());
        name
    }
}
