use serde::Serialize;
use wiregen_codegen::Result;
use wiregen_ir::{TypeSpec, TypedefSpec};

use super::check_keys;
use crate::{Generator, RustTypeMapper};

const TEMPLATE: &str = r#"
{%- set w = wire() -%}
{%- set name = decl_name(ty=ty) -%}
{%- set input = fresh_name(preferred="value") -%}
{% if doc %}{{ doc | doc_attrs }}{% endif %}
#[derive(Debug, Clone, PartialEq{% if hashable %}, Eq, Hash{% endif %})]
pub struct {{ name }}(pub {{ type_ref(ty=target, required=true) }});

impl {{ name }} {
    pub fn to_wire(&self) -> {{ w }}::Value {
        {{ to_wire(ty=target, value="&self.0") }}
    }

    pub fn from_wire({{ input }}: &{{ w }}::Value) -> Result<Self, {{ w }}::Error> {
        {{ from_wire(ty=target, value=input) }}.map(Self)
    }
}
"#;

#[derive(Serialize)]
struct TypedefData<'a> {
    ty: TypeSpec,
    doc: Option<&'a str>,
    target: &'a TypeSpec,
    hashable: bool,
}

pub(super) fn declare(generator: &mut Generator, ty: TypeSpec, spec: &TypedefSpec) -> Result<()> {
    let known = generator.hashable_types();
    check_keys(&spec.name, &spec.target, known)?;
    let data = TypedefData {
        ty,
        doc: spec.doc.as_deref(),
        target: &spec.target,
        hashable: RustTypeMapper.is_hashable(&spec.target, known),
    };
    generator.declare(TEMPLATE, &data)
}
