//! Fragment validation.
//!
//! A rendered fragment is parsed as a standalone Rust file. Each top-level
//! item is classified into a [`Declaration`]; the collector decides from the
//! classification which names the item claims.

use miette::SourceSpan;
use proc_macro2::{LineColumn, Span};
use syn::{Item, UseTree, spanned::Spanned};
use wiregen_codegen::{Error, Result};

use crate::RUST_NAMING;

/// A leaf of a `use` item: one path bound to one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseLeaf {
    pub path: String,
    pub alias: String,
}

/// What a top-level item contributes to the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `use` and `extern crate` items, folded into the import block.
    Import(Vec<UseLeaf>),
    Constant(String),
    Static(String),
    /// Structs, enums, unions, type aliases and traits.
    Type(String),
    Function(String),
    Module(String),
    /// `macro_rules!` definitions.
    Macro(String),
    /// Impl blocks and unnamed constants claim no name.
    Anonymous,
}

impl Declaration {
    /// Classify one parsed item, or report it as unsupported.
    pub fn classify(item: &Item, fragment: &str) -> Result<Self> {
        let declaration = match item {
            Item::Use(item) => {
                check_import(&item.attrs, &item.vis, fragment)?;
                let mut leaves = Vec::new();
                let mut prefix = Vec::new();
                flatten(&item.tree, &mut prefix, &mut leaves)
                    .map_err(|kind| Error::unsupported_item(kind, fragment, span_of(item, fragment)))?;
                Declaration::Import(leaves)
            }
            Item::ExternCrate(item) => {
                check_import(&item.attrs, &item.vis, fragment)?;
                let path = item.ident.to_string();
                let alias = match &item.rename {
                    Some((_, rename)) => rename.to_string(),
                    None => path.clone(),
                };
                let alias = claimed_name(&alias).to_string();
                Declaration::Import(vec![UseLeaf { path, alias }])
            }
            Item::Const(item) if item.ident == "_" => Declaration::Anonymous,
            Item::Const(item) => Declaration::Constant(item.ident.to_string()),
            Item::Static(item) => Declaration::Static(item.ident.to_string()),
            Item::Struct(item) => Declaration::Type(item.ident.to_string()),
            Item::Enum(item) => Declaration::Type(item.ident.to_string()),
            Item::Union(item) => Declaration::Type(item.ident.to_string()),
            Item::Type(item) => Declaration::Type(item.ident.to_string()),
            Item::Trait(item) => Declaration::Type(item.ident.to_string()),
            Item::Fn(item) => Declaration::Function(item.sig.ident.to_string()),
            Item::Mod(item) => Declaration::Module(item.ident.to_string()),
            Item::Macro(item) => match &item.ident {
                Some(ident) => Declaration::Macro(ident.to_string()),
                None => {
                    return Err(Error::unsupported_item(
                        "macro invocation",
                        fragment,
                        span_of(item, fragment),
                    ));
                }
            },
            Item::Impl(_) => Declaration::Anonymous,
            Item::ForeignMod(item) => {
                return Err(Error::unsupported_item(
                    "extern block",
                    fragment,
                    span_of(item, fragment),
                ));
            }
            Item::TraitAlias(item) => {
                return Err(Error::unsupported_item(
                    "trait alias",
                    fragment,
                    span_of(item, fragment),
                ));
            }
            other => {
                return Err(Error::unsupported_item(
                    "unrecognized item",
                    fragment,
                    span_of(other, fragment),
                ));
            }
        };
        Ok(declaration)
    }

    /// The name claimed in the unit's root scope, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Constant(name)
            | Declaration::Static(name)
            | Declaration::Type(name)
            | Declaration::Function(name)
            | Declaration::Module(name)
            | Declaration::Macro(name) => Some(claimed_name(name)),
            Declaration::Import(_) | Declaration::Anonymous => None,
        }
    }

    /// Short description used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::Import(_) => "import",
            Declaration::Constant(_) => "constant",
            Declaration::Static(_) => "static",
            Declaration::Type(_) => "type",
            Declaration::Function(_) => "function",
            Declaration::Module(_) => "module",
            Declaration::Macro(_) => "macro",
            Declaration::Anonymous => "anonymous",
        }
    }
}

/// The spelling a declared identifier claims in the symbol table: raw
/// identifiers claim their plain spelling unless it is a keyword.
pub fn claimed_name(name: &str) -> &str {
    match name.strip_prefix("r#") {
        Some(plain) if !RUST_NAMING.is_reserved(plain) => plain,
        _ => name,
    }
}

/// The name a `use` leaf binds, spelled the way it is claimed.
fn bound_name(ident: &syn::Ident) -> String {
    claimed_name(&ident.to_string()).to_string()
}

/// Imports are folded into the unit's import block, which cannot carry
/// attributes or visibility.
fn check_import(attrs: &[syn::Attribute], vis: &syn::Visibility, fragment: &str) -> Result<()> {
    if let Some(attr) = attrs.first() {
        return Err(Error::unsupported_item(
            "attribute on import",
            fragment,
            span_of(attr, fragment),
        ));
    }
    if !matches!(vis, syn::Visibility::Inherited) {
        return Err(Error::unsupported_item(
            "re-export",
            fragment,
            span_of(vis, fragment),
        ));
    }
    Ok(())
}

/// Collect the leaves of a use tree. Errors name the unsupported construct.
fn flatten(
    tree: &UseTree,
    prefix: &mut Vec<String>,
    leaves: &mut Vec<UseLeaf>,
) -> std::result::Result<(), &'static str> {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            flatten(&path.tree, prefix, leaves)?;
            prefix.pop();
        }
        UseTree::Name(name) if name.ident == "self" => {
            let alias = prefix
                .last()
                .map(|module| claimed_name(module).to_string())
                .ok_or("`self` import without a module")?;
            leaves.push(UseLeaf {
                path: prefix.join("::"),
                alias,
            });
        }
        UseTree::Name(name) => {
            leaves.push(UseLeaf {
                path: join(prefix, &name.ident.to_string()),
                alias: bound_name(&name.ident),
            });
        }
        UseTree::Rename(rename) if rename.rename == "_" => return Err("underscore import"),
        UseTree::Rename(rename) => {
            let path = if rename.ident == "self" {
                prefix.join("::")
            } else {
                join(prefix, &rename.ident.to_string())
            };
            leaves.push(UseLeaf {
                path,
                alias: bound_name(&rename.rename),
            });
        }
        UseTree::Glob(_) => return Err("glob import"),
        UseTree::Group(group) => {
            for tree in &group.items {
                flatten(tree, prefix, leaves)?;
            }
        }
    }
    Ok(())
}

fn join(prefix: &[String], segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}::{}", prefix.join("::"), segment)
    }
}

/// Parse a fragment as a Rust file.
pub fn parse(fragment: &str) -> Result<syn::File> {
    let file = syn::parse_file(fragment).map_err(|e| {
        let span = source_span(fragment, e.span());
        Error::fragment_syntax(e.to_string(), fragment, span)
    })?;
    if let Some(attr) = file.attrs.first() {
        return Err(Error::unsupported_item(
            "inner attribute",
            fragment,
            span_of(attr, fragment),
        ));
    }
    Ok(file)
}

fn span_of<T: Spanned>(node: &T, fragment: &str) -> Option<SourceSpan> {
    source_span(fragment, node.span())
}

/// Convert a token span into a byte range of `fragment`.
fn source_span(fragment: &str, span: Span) -> Option<SourceSpan> {
    let start = offset(fragment, span.start())?;
    let end = offset(fragment, span.end()).unwrap_or(start).max(start);
    Some(SourceSpan::from((start, end - start)))
}

/// Byte offset of a 1-based line and 0-based character column.
fn offset(fragment: &str, position: LineColumn) -> Option<usize> {
    if position.line == 0 {
        return None;
    }
    let mut consumed = 0;
    for (index, line) in fragment.split_inclusive('\n').enumerate() {
        if index + 1 == position.line {
            let column = line
                .char_indices()
                .nth(position.column)
                .map(|(byte, _)| byte)
                .unwrap_or(line.len());
            return Some(consumed + column);
        }
        consumed += line.len();
    }
    Some(fragment.len())
}
