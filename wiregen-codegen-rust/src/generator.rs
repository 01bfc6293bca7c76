//! The compilation unit under construction.

use std::{
    collections::{HashSet, VecDeque},
    io,
};

use serde::Serialize;
use tracing::debug;
use wiregen_codegen::{
    Error, GeneratorConfig, ImportRegistry, Result, ScopeId, SymbolTable,
};

use crate::{
    PRELUDE, RUST_NAMING, RustFile, Use,
    fragment::{self, Declaration},
    template::{self, UnitState},
    wire::{ContainerHelper, HelperRegistry},
};

/// Rust code generator for one compilation unit.
///
/// Fragments are rendered from templates, validated, and appended to the
/// unit in acceptance order. Every operation either succeeds completely or
/// leaves the unit unchanged.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use wiregen_codegen_rust::Generator;
///
/// let mut generator = Generator::default();
/// generator
///     .declare("pub type {{ name | type_case }} = i32;", &json!({"name": "user_id"}))
///     .unwrap();
///
/// let code = generator.to_source().unwrap();
/// assert!(code.ends_with("pub type UserId = i32;\n"));
/// ```
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    state: UnitState,
    /// Helpers requested by rendered fragments, declared on the next accept.
    pending: VecDeque<ContainerHelper>,
    items: Vec<syn::Item>,
    /// User structs declared or about to be declared with `Eq` and `Hash`.
    hashable: HashSet<String>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let symbols = SymbolTable::new(RUST_NAMING.reserved_words)
            .with_reserved(PRELUDE.iter().copied())
            .with_reserved(config.reserved_names.iter().cloned());
        Self {
            config,
            state: UnitState {
                symbols,
                imports: ImportRegistry::new(RUST_NAMING),
                helpers: HelperRegistry::default(),
            },
            pending: VecDeque::new(),
            items: Vec::new(),
            hashable: HashSet::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.state.symbols
    }

    pub fn imports(&self) -> &ImportRegistry {
        &self.state.imports
    }

    pub(crate) fn hashable_types(&self) -> &HashSet<String> {
        &self.hashable
    }

    pub(crate) fn set_hashable_types(&mut self, hashable: HashSet<String>) {
        self.hashable = hashable;
    }

    /// Accepted declarations in acceptance order.
    pub fn items(&self) -> &[syn::Item] {
        &self.items
    }

    /// Render a fragment without appending it.
    ///
    /// Imports and top-level names the template allocates stay claimed, so
    /// the text remains valid when it is accepted later.
    pub fn render<T: Serialize + ?Sized>(&mut self, template: &str, data: &T) -> Result<String> {
        let mut tx = Transaction::begin(self);
        let text = tx.render(template, data)?;
        tx.commit(self);
        Ok(text)
    }

    /// Validate rendered text and append its declarations.
    pub fn accept(&mut self, fragment: &str) -> Result<()> {
        let mut tx = Transaction::begin(self);
        tx.accept(fragment)?;
        tx.flush_helpers()?;
        tx.commit(self);
        Ok(())
    }

    /// Render a template and accept the result.
    pub fn declare<T: Serialize + ?Sized>(&mut self, template: &str, data: &T) -> Result<()> {
        let mut tx = Transaction::begin(self);
        let text = tx.render(template, data)?;
        tx.accept(&text)?;
        tx.flush_helpers()?;
        tx.commit(self);
        Ok(())
    }

    /// The formatted compilation unit.
    pub fn to_source(&self) -> Result<String> {
        let imports = &self.state.imports;
        let file = RustFile::new()
            .use_stmts(
                imports
                    .emit()
                    .into_iter()
                    .map(|import| Use::from_import(import, imports.is_renamed(import))),
            )
            .add_all(self.items.iter().cloned());

        match &self.config.header {
            Some(header) => file.render_with_header(header),
            None => file.render(),
        }
    }

    /// Write the formatted compilation unit.
    pub fn write<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let source = self.to_source()?;
        writer
            .write_all(source.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|source| Box::new(Error::Write { source }))
    }
}

/// Staged changes to a [`Generator`], adopted only on success.
struct Transaction {
    wire_module: String,
    state: UnitState,
    pending: VecDeque<ContainerHelper>,
    items: Vec<syn::Item>,
}

impl Transaction {
    fn begin(generator: &Generator) -> Self {
        Self {
            wire_module: generator.config.wire_module.clone(),
            state: generator.state.clone(),
            pending: generator.pending.clone(),
            items: Vec::new(),
        }
    }

    fn render<T: Serialize + ?Sized>(&mut self, template: &str, data: &T) -> Result<String> {
        let (text, helpers) = template::render(&mut self.state, &self.wire_module, template, data)?;
        self.pending.extend(helpers);
        Ok(text)
    }

    fn accept(&mut self, text: &str) -> Result<()> {
        let file = fragment::parse(text)?;
        let mut accepted = 0;
        for item in file.items {
            let declaration = Declaration::classify(&item, text)?;
            match &declaration {
                Declaration::Import(leaves) => {
                    let state = &mut self.state;
                    for leaf in leaves {
                        state
                            .imports
                            .add_explicit(&mut state.symbols, &leaf.path, &leaf.alias)?;
                    }
                    continue;
                }
                Declaration::Constant(name)
                | Declaration::Static(name)
                | Declaration::Type(name)
                | Declaration::Function(name)
                | Declaration::Module(name)
                | Declaration::Macro(name) => {
                    self.state
                        .symbols
                        .reserve(ScopeId::ROOT, fragment::claimed_name(name))?;
                }
                Declaration::Anonymous => {}
            }
            debug!(
                kind = declaration.kind(),
                name = declaration.name().unwrap_or("_"),
                "accepted declaration"
            );
            self.items.push(item);
            accepted += 1;
        }
        debug!(items = accepted, "accepted fragment");
        Ok(())
    }

    /// Declare requested container helpers until none are left. Helpers may
    /// request further helpers for nested containers.
    fn flush_helpers(&mut self) -> Result<()> {
        while let Some(helper) = self.pending.pop_front() {
            let data = helper.data().ok_or_else(|| {
                Error::template(format!("`{}` has no container helper", helper.spec))
            })?;
            debug!(helper = helper.name.as_str(), "declaring container helper");
            let text = self.render(helper.template(), &data)?;
            self.accept(&text)?;
        }
        Ok(())
    }

    fn commit(self, generator: &mut Generator) {
        generator.state = self.state;
        generator.pending = self.pending;
        generator.items.extend(self.items);
    }
}
