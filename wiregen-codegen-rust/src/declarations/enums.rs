use serde::Serialize;
use wiregen_codegen::Result;
use wiregen_ir::{EnumItem, EnumSpec, TypeSpec};

use crate::Generator;

const TEMPLATE: &str = r#"
{%- set w = wire() -%}
{%- set name = decl_name(ty=ty) -%}
{%- set input = fresh_name(preferred="value") -%}
{%- set code = fresh_name(preferred="code") -%}
{% if doc %}{{ doc | doc_attrs }}{% endif %}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum {{ name }} {
{%- for item in items %}
    {{ item.name | type_case }} = {{ item.value }},
{%- endfor %}
}

impl {{ name }} {
    pub fn to_wire(&self) -> {{ w }}::Value {
        {{ w }}::Value::I32(*self as i32)
    }

    pub fn from_wire({{ input }}: &{{ w }}::Value) -> Result<Self, {{ w }}::Error> {
        match {{ input }}.get_i32()? {
{%- for item in items %}
            {{ item.value }} => Ok({{ name }}::{{ item.name | type_case }}),
{%- endfor %}
            {{ code }} => Err({{ w }}::Error::unknown_enum_value({{ name | string_literal }}, {{ code }})),
        }
    }
}
"#;

#[derive(Serialize)]
struct EnumData<'a> {
    ty: TypeSpec,
    doc: Option<&'a str>,
    items: &'a [EnumItem],
}

pub(super) fn declare(generator: &mut Generator, ty: TypeSpec, spec: &EnumSpec) -> Result<()> {
    let data = EnumData {
        ty,
        doc: spec.doc.as_deref(),
        items: &spec.items,
    };
    generator.declare(TEMPLATE, &data)
}
