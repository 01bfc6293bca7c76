use serde::Serialize;
use wiregen_codegen::Result;
use wiregen_ir::{FieldSpec, StructSpec, TypeSpec};

use super::{check_keys, fields_hashable};
use crate::Generator;

const TEMPLATE: &str = r#"
{%- set w = wire() -%}
{%- set name = decl_name(ty=ty) -%}
{%- set fields_var = fresh_name(preferred="fields") -%}
{%- set x = fresh_name(preferred="x") -%}
{% if doc %}{{ doc | doc_attrs }}{% endif %}
#[derive(Debug, Clone, PartialEq{% if hashable %}, Eq, Hash{% endif %})]
pub struct {{ name }} {
{%- for f in fields %}
{%- if f.doc %}
    {{ f.doc | doc_attrs }}
{%- endif %}
    pub {{ f.name | field_case }}: {{ type_ref(ty=f.type, required=f.required) }},
{%- endfor %}
}

impl {{ name }} {
    pub fn to_wire(&self) -> {{ w }}::Value {
        let mut {{ fields_var }} = Vec::new();
{%- for f in fields %}
{%- set field = f.name | field_case %}
{%- if f.required %}
        {{ fields_var }}.push({{ w }}::Field::new({{ f.id }}, {{ to_wire(ty=f.type, value="&self." ~ field) }}));
{%- else %}
        if let Some({{ x }}) = &self.{{ field }} {
            {{ fields_var }}.push({{ w }}::Field::new({{ f.id }}, {{ to_wire(ty=f.type, value=x) }}));
        }
{%- endif %}
{%- endfor %}
        {{ w }}::Value::Struct({{ w }}::Struct::new({{ fields_var }}))
    }
{{- new_scope() }}
{%- set input = fresh_name(preferred="value") %}
{%- set found = fresh_name(preferred="fields") %}
{%- set y = fresh_name(preferred="x") %}

    pub fn from_wire({{ input }}: &{{ w }}::Value) -> Result<Self, {{ w }}::Error> {
        let {{ found }} = {{ input }}.get_struct()?;
        Ok(Self {
{%- for f in fields %}
            {{ f.name | field_case }}: match {{ found }}.field({{ f.id }}) {
{%- if f.required %}
                Some({{ y }}) => {{ from_wire(ty=f.type, value=y) }}?,
                None => return Err({{ w }}::Error::missing_field({{ name | string_literal }}, {{ f.name | string_literal }})),
{%- else %}
                Some({{ y }}) => Some({{ from_wire(ty=f.type, value=y) }}?),
                None => None,
{%- endif %}
            },
{%- endfor %}
        })
    }
}
{%- if exception %}
{{ new_scope() }}
{%- set fmt = import(path="std::fmt") %}
{%- set formatter = fresh_name(preferred="f") %}

impl {{ fmt }}::Display for {{ name }} {
    fn fmt(&self, {{ formatter }}: &mut {{ fmt }}::Formatter<'_>) -> {{ fmt }}::Result {
        write!({{ formatter }}, "{:?}", self)
    }
}

impl ::std::error::Error for {{ name }} {}
{%- endif %}
"#;

#[derive(Serialize)]
struct StructData<'a> {
    ty: TypeSpec,
    doc: Option<&'a str>,
    fields: &'a [FieldSpec],
    exception: bool,
    hashable: bool,
}

pub(super) fn declare(
    generator: &mut Generator,
    ty: TypeSpec,
    spec: &StructSpec,
    exception: bool,
) -> Result<()> {
    declare_fields(generator, ty, spec.doc.as_deref(), &spec.fields, exception)
}

/// Declare a struct holding `fields`.
pub(super) fn declare_fields(
    generator: &mut Generator,
    ty: TypeSpec,
    doc: Option<&str>,
    fields: &[FieldSpec],
    exception: bool,
) -> Result<()> {
    let known = generator.hashable_types();
    for field in fields {
        check_keys(&field.name, &field.ty, known)?;
    }
    let hashable = fields_hashable(fields, known);

    let mut hashable_types = known.clone();
    if let Some(name) = ty.user_name() {
        if hashable {
            hashable_types.insert(name.to_string());
        } else {
            hashable_types.remove(name);
        }
    }

    let data = StructData {
        ty,
        doc,
        fields,
        exception,
        hashable,
    };
    generator.declare(TEMPLATE, &data)?;
    generator.set_hashable_types(hashable_types);
    Ok(())
}
