//! Wire codec call synthesis.
//!
//! Produces the Rust expressions generated code uses to convert between its
//! own types and the codec's `Value` representation. Containers go through
//! helper functions named after their element types; every helper an
//! expression refers to is recorded so it can be declared later.

use serde::Serialize;
use wiregen_codegen::{ScopeId, SymbolTable, TypeMapper};
use wiregen_core::to_snake_case;
use wiregen_ir::TypeSpec;

use crate::RustTypeMapper;

/// Direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ToWire,
    FromWire,
}

impl Direction {
    fn suffix(self) -> &'static str {
        match self {
            Direction::ToWire => "to_wire",
            Direction::FromWire => "from_wire",
        }
    }
}

/// A container conversion function generated code calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerHelper {
    pub name: String,
    pub spec: TypeSpec,
    pub direction: Direction,
}

/// Data handed to the helper templates.
#[derive(Debug, Serialize)]
pub struct HelperData<'a> {
    pub name: &'a str,
    pub spec: &'a TypeSpec,
    pub key: Option<&'a TypeSpec>,
    pub value: &'a TypeSpec,
    pub getter: &'static str,
}

impl ContainerHelper {
    /// Template declaring this helper.
    pub fn template(&self) -> &'static str {
        match (&self.spec, self.direction) {
            (TypeSpec::Map { .. }, Direction::ToWire) => MAP_TO_WIRE,
            (TypeSpec::Map { .. }, Direction::FromWire) => MAP_FROM_WIRE,
            (_, Direction::ToWire) => LIST_TO_WIRE,
            (_, Direction::FromWire) => LIST_FROM_WIRE,
        }
    }

    pub fn data(&self) -> Option<HelperData<'_>> {
        let (key, value, getter) = match &self.spec {
            TypeSpec::List { value } => (None, value.as_ref(), "get_list"),
            TypeSpec::Set { value } => (None, value.as_ref(), "get_set"),
            TypeSpec::Map { key, value } => (Some(key.as_ref()), value.as_ref(), "get_map"),
            _ => return None,
        };
        Some(HelperData {
            name: &self.name,
            spec: &self.spec,
            key,
            value,
            getter,
        })
    }
}

/// Container helpers requested by one compilation unit.
///
/// A helper is identified by the container type it converts and its
/// direction. Its name is derived from the element types; distinct types
/// that spell the same name get a numeric suffix.
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    helpers: Vec<ContainerHelper>,
}

impl HelperRegistry {
    /// The helper converting `spec`, and whether this is its first request.
    fn resolve(
        &mut self,
        symbols: &SymbolTable,
        spec: &TypeSpec,
        direction: Direction,
    ) -> (ContainerHelper, bool) {
        if let Some(existing) = self
            .helpers
            .iter()
            .find(|helper| helper.direction == direction && helper.spec == *spec)
        {
            return (existing.clone(), false);
        }

        let preferred = format!("_{}_{}", mangle(spec), direction.suffix());
        let mut name = preferred.clone();
        let mut suffix = 2usize;
        while self.contains(&name) || symbols.is_taken(ScopeId::ROOT, &name) {
            name = format!("{}{}", preferred, suffix);
            suffix += 1;
        }

        let helper = ContainerHelper {
            name,
            spec: spec.clone(),
            direction,
        };
        self.helpers.push(helper.clone());
        (helper, true)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.iter().any(|helper| helper.name == name)
    }
}

/// Fragment of a helper name identifying a type.
fn mangle(spec: &TypeSpec) -> String {
    match spec {
        TypeSpec::Bool => "bool".to_string(),
        TypeSpec::I8 => "i8".to_string(),
        TypeSpec::I16 => "i16".to_string(),
        TypeSpec::I32 => "i32".to_string(),
        TypeSpec::I64 => "i64".to_string(),
        TypeSpec::Double => "double".to_string(),
        TypeSpec::String => "string".to_string(),
        TypeSpec::Binary => "binary".to_string(),
        TypeSpec::List { value } => format!("list_{}", mangle(value)),
        TypeSpec::Set { value } => format!("set_{}", mangle(value)),
        TypeSpec::Map { key, value } => format!("map_{}_{}", mangle(key), mangle(value)),
        TypeSpec::Struct { name }
        | TypeSpec::Union { name }
        | TypeSpec::Exception { name }
        | TypeSpec::Enum { name }
        | TypeSpec::Typedef { name, .. } => to_snake_case(name),
    }
}

/// Whether `expr` is a place expression such as `x`, `self.name` or `item.0`.
fn is_place(expr: &str) -> bool {
    let mut parts = expr.split('.');
    let Some(head) = parts.next() else {
        return false;
    };
    let is_ident = |part: &str| {
        let part = part.strip_prefix("r#").unwrap_or(part);
        part.starts_with(|c: char| c.is_alphabetic() || c == '_')
            && part.chars().all(|c| c.is_alphanumeric() || c == '_')
    };
    is_ident(head)
        && parts.all(|part| {
            is_ident(part) || (!part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        })
}

/// Expression for calling a `&self` method on the value behind `expr`.
fn receiver(expr: &str) -> String {
    match expr.strip_prefix('&') {
        Some(place) if is_place(place) => place.to_string(),
        _ if is_place(expr) => expr.to_string(),
        _ => format!("({})", expr),
    }
}

/// Expression copying the value behind `expr`.
fn deref(expr: &str) -> String {
    match expr.strip_prefix('&') {
        Some(place) if is_place(place) => place.to_string(),
        _ if is_place(expr) => format!("*{}", expr),
        _ => format!("*({})", expr),
    }
}

/// Builds wire codec expressions against one codec module alias.
#[derive(Debug)]
pub struct WireCalls<'a> {
    wire: &'a str,
    helpers: &'a mut HelperRegistry,
    symbols: &'a SymbolTable,
    requested: Vec<ContainerHelper>,
}

impl<'a> WireCalls<'a> {
    pub fn new(wire: &'a str, helpers: &'a mut HelperRegistry, symbols: &'a SymbolTable) -> Self {
        Self {
            wire,
            helpers,
            symbols,
            requested: Vec::new(),
        }
    }

    /// Helpers first requested by the expressions built so far, in order.
    pub fn into_requested(self) -> Vec<ContainerHelper> {
        self.requested
    }

    fn helper(&mut self, spec: &TypeSpec, direction: Direction) -> String {
        let (helper, first) = self.helpers.resolve(self.symbols, spec, direction);
        let name = helper.name.clone();
        if first {
            self.requested.push(helper);
        }
        name
    }

    /// The codec's type tag for `spec`.
    pub fn type_code(&self, spec: &TypeSpec) -> String {
        let code = match spec {
            TypeSpec::Bool => "Bool",
            TypeSpec::I8 => "I8",
            TypeSpec::I16 => "I16",
            TypeSpec::I32 | TypeSpec::Enum { .. } => "I32",
            TypeSpec::I64 => "I64",
            TypeSpec::Double => "Double",
            TypeSpec::String | TypeSpec::Binary => "Binary",
            TypeSpec::List { .. } => "List",
            TypeSpec::Set { .. } => "Set",
            TypeSpec::Map { .. } => "Map",
            TypeSpec::Struct { .. } | TypeSpec::Union { .. } | TypeSpec::Exception { .. } => {
                "Struct"
            }
            TypeSpec::Typedef { target, .. } => return self.type_code(target),
        };
        format!("{}::Type::{}", self.wire, code)
    }

    /// Expression of type `wire::Value` built from `value`, a `&T`.
    pub fn to_wire(&mut self, spec: &TypeSpec, value: &str) -> String {
        let wire = self.wire;
        match spec {
            TypeSpec::Bool => format!("{}::Value::Bool({})", wire, deref(value)),
            TypeSpec::I8 => format!("{}::Value::I8({})", wire, deref(value)),
            TypeSpec::I16 => format!("{}::Value::I16({})", wire, deref(value)),
            TypeSpec::I32 => format!("{}::Value::I32({})", wire, deref(value)),
            TypeSpec::I64 => format!("{}::Value::I64({})", wire, deref(value)),
            TypeSpec::Double => format!("{}::Value::Double({})", wire, deref(value)),
            TypeSpec::String => format!(
                "{}::Value::Binary({}.as_bytes().to_vec())",
                wire,
                receiver(value)
            ),
            TypeSpec::Binary => format!("{}::Value::Binary({}.clone())", wire, receiver(value)),
            TypeSpec::List { .. } => {
                let helper = self.helper(spec, Direction::ToWire);
                format!("{}::Value::List({}({}))", wire, helper, value)
            }
            TypeSpec::Set { .. } => {
                let helper = self.helper(spec, Direction::ToWire);
                format!("{}::Value::Set({}({}))", wire, helper, value)
            }
            TypeSpec::Map { .. } => {
                let helper = self.helper(spec, Direction::ToWire);
                format!("{}::Value::Map({}({}))", wire, helper, value)
            }
            TypeSpec::Struct { .. }
            | TypeSpec::Union { .. }
            | TypeSpec::Exception { .. }
            | TypeSpec::Enum { .. }
            | TypeSpec::Typedef { .. } => format!("{}.to_wire()", receiver(value)),
        }
    }

    /// Expression of type `Result<T, wire::Error>` read from `value`, a
    /// `&wire::Value`.
    pub fn from_wire(&mut self, spec: &TypeSpec, value: &str) -> String {
        let getter = match spec {
            TypeSpec::Bool => "get_bool",
            TypeSpec::I8 => "get_i8",
            TypeSpec::I16 => "get_i16",
            TypeSpec::I32 => "get_i32",
            TypeSpec::I64 => "get_i64",
            TypeSpec::Double => "get_double",
            TypeSpec::String => "get_string",
            TypeSpec::Binary => "get_binary",
            TypeSpec::List { .. } | TypeSpec::Set { .. } | TypeSpec::Map { .. } => {
                let helper = self.helper(spec, Direction::FromWire);
                return format!("{}({})", helper, value);
            }
            TypeSpec::Struct { .. }
            | TypeSpec::Union { .. }
            | TypeSpec::Exception { .. }
            | TypeSpec::Enum { .. }
            | TypeSpec::Typedef { .. } => {
                return format!("{}::from_wire({})", RustTypeMapper.map_type(spec), value);
            }
        };
        format!("{}.{}()", receiver(value), getter)
    }
}

const LIST_TO_WIRE: &str = r#"
{%- set w = wire() -%}
{%- set items = fresh_name(preferred="items") -%}
{%- set x = fresh_name(preferred="x") -%}
fn {{ name }}({{ items }}: &{{ type_ref(ty=spec, required=true) }}) -> {{ w }}::ValueList {
    {{ w }}::ValueList::new(
        {{ type_code(ty=value) }},
        {{ items }}.iter().map(|{{ x }}| {{ to_wire(ty=value, value=x) }}).collect(),
    )
}
"#;

const LIST_FROM_WIRE: &str = r#"
{%- set w = wire() -%}
{%- set input = fresh_name(preferred="value") -%}
{%- set x = fresh_name(preferred="x") -%}
fn {{ name }}({{ input }}: &{{ w }}::Value) -> Result<{{ type_ref(ty=spec, required=true) }}, {{ w }}::Error> {
    {{ input }}.{{ getter }}()?.items().iter().map(|{{ x }}| {{ from_wire(ty=value, value=x) }}).collect()
}
"#;

const MAP_TO_WIRE: &str = r#"
{%- set w = wire() -%}
{%- set items = fresh_name(preferred="items") -%}
{%- set k = fresh_name(preferred="k") -%}
{%- set v = fresh_name(preferred="v") -%}
fn {{ name }}({{ items }}: &{{ type_ref(ty=spec, required=true) }}) -> {{ w }}::MapItemList {
    {{ w }}::MapItemList::new(
        {{ type_code(ty=key) }},
        {{ type_code(ty=value) }},
        {{ items }}
            .iter()
            .map(|({{ k }}, {{ v }})| {{ w }}::MapItem::new({{ to_wire(ty=key, value=k) }}, {{ to_wire(ty=value, value=v) }}))
            .collect(),
    )
}
"#;

const MAP_FROM_WIRE: &str = r#"
{%- set w = wire() -%}
{%- set input = fresh_name(preferred="value") -%}
{%- set item = fresh_name(preferred="item") -%}
fn {{ name }}({{ input }}: &{{ w }}::Value) -> Result<{{ type_ref(ty=spec, required=true) }}, {{ w }}::Error> {
    {{ input }}
        .get_map()?
        .items()
        .iter()
        .map(|{{ item }}| Ok(({{ from_wire(ty=key, value="&" ~ item ~ ".key") }}?, {{ from_wire(ty=value, value="&" ~ item ~ ".value") }}?)))
        .collect()
}
"#;
