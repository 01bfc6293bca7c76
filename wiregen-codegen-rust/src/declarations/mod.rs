//! Built-in declarations for the type model.
//!
//! Each submodule holds the template for one kind of IDL entity and the data
//! it is rendered with.

mod constants;
mod enums;
mod services;
mod structs;
mod typedefs;

use std::collections::HashSet;

use tracing::debug;
use wiregen_codegen::{Error, Result};
use wiregen_ir::{ConstantSpec, FieldSpec, Location, Module, ServiceSpec, TypeDecl, TypeSpec};

use crate::{Generator, RustTypeMapper};

fn with_context<T>(
    result: Result<T>,
    what: String,
    location: Option<&Location>,
) -> Result<T> {
    result.map_err(|source| Error::declaration(what, location.map(ToString::to_string), source))
}

/// Whether a struct holding `fields` can derive `Eq` and `Hash`.
fn fields_hashable(fields: &[FieldSpec], hashable: &HashSet<String>) -> bool {
    fields
        .iter()
        .all(|field| RustTypeMapper.is_hashable(&field.ty, hashable))
}

/// Reject set elements and map keys the generated collections cannot hash.
fn check_keys(name: &str, ty: &TypeSpec, hashable: &HashSet<String>) -> Result<()> {
    match RustTypeMapper.unhashable_key(ty, hashable) {
        Some(key) => Err(Error::template(format!(
            "`{}` uses `{}` as a set element or map key, but it is not hashable",
            name, key
        ))),
        None => Ok(()),
    }
}

/// Structs, unions and exceptions of `module` that can derive `Eq` and
/// `Hash`, on top of the already `known` ones.
///
/// Starts from every candidate and drops those with an unhashable field
/// until nothing changes, so self-referencing types stay hashable.
fn hashable_structs(module: &Module, known: &HashSet<String>) -> HashSet<String> {
    let candidates: Vec<_> = module
        .types
        .iter()
        .filter_map(|decl| match decl {
            TypeDecl::Struct(spec) | TypeDecl::Union(spec) | TypeDecl::Exception(spec) => {
                Some(spec)
            }
            TypeDecl::Enum(_) | TypeDecl::Typedef(_) => None,
        })
        .collect();

    let mut hashable = known.clone();
    hashable.extend(candidates.iter().map(|spec| spec.name.clone()));
    loop {
        let unhashable: Vec<&str> = candidates
            .iter()
            .filter(|spec| hashable.contains(&spec.name))
            .filter(|spec| !fields_hashable(&spec.fields, &hashable))
            .map(|spec| spec.name.as_str())
            .collect();
        if unhashable.is_empty() {
            return hashable;
        }
        for name in unhashable {
            hashable.remove(name);
        }
    }
}

impl Generator {
    /// Declare every type, constant and service of a module, in that order.
    pub fn declare_module(&mut self, module: &Module) -> Result<()> {
        debug!(module = module.name.as_str(), "declaring module");
        let hashable = hashable_structs(module, self.hashable_types());
        self.set_hashable_types(hashable);
        for decl in &module.types {
            self.declare_type(decl)?;
        }
        for constant in &module.constants {
            self.declare_constant(constant)?;
        }
        for service in &module.services {
            self.declare_service(service)?;
        }
        Ok(())
    }

    /// Declare a user-defined type with its wire conversions.
    pub fn declare_type(&mut self, decl: &TypeDecl) -> Result<()> {
        let ty = decl.type_spec();
        let result = match decl {
            TypeDecl::Struct(spec) | TypeDecl::Union(spec) => structs::declare(self, ty, spec, false),
            TypeDecl::Exception(spec) => structs::declare(self, ty, spec, true),
            TypeDecl::Enum(spec) => enums::declare(self, ty, spec),
            TypeDecl::Typedef(spec) => typedefs::declare(self, ty, spec),
        };
        with_context(
            result,
            format!("{} {}", decl.keyword(), decl.name()),
            decl.location(),
        )
    }

    /// Declare a constant.
    pub fn declare_constant(&mut self, constant: &ConstantSpec) -> Result<()> {
        let result = constants::declare(self, constant);
        with_context(
            result,
            format!("const {}", constant.name),
            constant.location.as_ref(),
        )
    }

    /// Declare the argument and result structs of a service's functions.
    pub fn declare_service(&mut self, service: &ServiceSpec) -> Result<()> {
        let result = services::declare(self, service);
        with_context(
            result,
            format!("service {}", service.name),
            service.location.as_ref(),
        )
    }
}
