//! Integration tests for assembling a compilation unit from fragments.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiregen_codegen::{CollisionReason, Error, ScopeId};
use wiregen_codegen_rust::{Generator, GeneratorConfig};

fn generator() -> Generator {
    Generator::new(GeneratorConfig::default().with_header(None))
}

/// Names of the top-level items of generated code, in order.
fn item_names(code: &str) -> Vec<String> {
    let file = syn::parse_file(code).expect("generated code parses");
    file.items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Struct(item) => Some(item.ident.to_string()),
            syn::Item::Enum(item) => Some(item.ident.to_string()),
            syn::Item::Type(item) => Some(item.ident.to_string()),
            syn::Item::Fn(item) => Some(item.sig.ident.to_string()),
            syn::Item::Const(item) => Some(item.ident.to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_declared_name_collides() {
    let mut generator = generator();
    generator.accept("struct Foo;").unwrap();

    let err = generator.accept("struct Foo;").unwrap_err();
    assert!(matches!(
        *err,
        Error::NameCollision {
            reason: CollisionReason::AlreadyDeclared,
            ..
        }
    ));
}

#[test]
fn test_import_twice_returns_same_alias() {
    let mut generator = generator();
    let text = generator
        .render("{{ import(path='strings') }} {{ import(path='strings') }}", &json!({}))
        .unwrap();

    assert_eq!(text, "strings strings");
    assert_eq!(generator.imports().len(), 1);
    assert_eq!(generator.to_source().unwrap(), "use strings;\n");
}

#[test]
fn test_same_trailing_segment_gets_distinct_aliases() {
    let mut generator = generator();
    let text = generator
        .render("{{ import(path='foo/bar') }} {{ import(path='baz/bar') }}", &json!({}))
        .unwrap();

    assert_eq!(text, "bar bar2");
    insta::assert_snapshot!(generator.to_source().unwrap(), @r"
    use baz::bar as bar2;
    use foo::bar;
    ");
}

#[test]
fn test_second_type_alias_is_rejected() {
    let mut generator = generator();
    generator.accept("type Foo = i32;").unwrap();

    let err = generator.accept("type Foo = i32;").unwrap_err();
    assert!(err.is_name_collision());

    let code = generator.to_source().unwrap();
    assert_eq!(item_names(&code), vec!["Foo"]);
    assert_eq!(code.matches("type Foo").count(), 1);
}

#[test]
fn test_undefined_field_appends_nothing() {
    let mut generator = generator();
    let err = generator
        .declare("type {{ name }} = i32;", &json!({"other": "Foo"}))
        .unwrap_err();

    assert!(matches!(*err, Error::Template { .. }));
    assert!(generator.items().is_empty());
    assert_eq!(generator.to_source().unwrap(), "");
}

#[test]
fn test_failed_declare_leaves_state_unchanged() {
    let mut generator = generator();
    generator.accept("struct Kept;").unwrap();

    let err = generator
        .declare(
            "{% set fmt = import(path='std::fmt') %}struct Fresh; fn broken( {",
            &json!({}),
        )
        .unwrap_err();
    assert!(err.is_fragment_syntax());

    assert!(generator.imports().is_empty());
    assert!(!generator.symbols().is_taken(ScopeId::ROOT, "Fresh"));
    assert_eq!(generator.items().len(), 1);
}

#[test]
fn test_collision_midway_keeps_earlier_items_out() {
    let mut generator = generator();
    generator.accept("fn taken() {}").unwrap();

    let err = generator.accept("struct First; fn taken() {}").unwrap_err();
    assert!(err.is_name_collision());
    assert!(!generator.symbols().is_taken(ScopeId::ROOT, "First"));
    assert_eq!(item_names(&generator.to_source().unwrap()), vec!["taken"]);
}

#[test]
fn test_failed_fragment_claims_nothing() {
    let mut generator = generator();
    let err = generator.accept("fn r#match() {} struct Ok;").unwrap_err();
    assert!(matches!(
        *err,
        Error::NameCollision {
            reason: CollisionReason::AlreadyDeclared,
            ..
        }
    ));
    generator.accept("fn r#match() {}").unwrap();
}

#[test]
fn test_explicit_use_is_folded_into_import_block() {
    let mut generator = generator();
    generator
        .accept("use std::fmt; pub fn show() -> fmt::Alignment { fmt::Alignment::Left }")
        .unwrap();

    let alias = generator
        .render("{{ import(path='std::fmt') }}", &json!({}))
        .unwrap();
    assert_eq!(alias, "fmt");

    insta::assert_snapshot!(generator.to_source().unwrap(), @r"
    use std::fmt;
    pub fn show() -> fmt::Alignment {
        fmt::Alignment::Left
    }
    ");
}

#[test]
fn test_explicit_use_conflicting_with_promised_alias() {
    let mut generator = generator();
    generator
        .render("{{ import(path='std::fmt') }}", &json!({}))
        .unwrap();

    let err = generator.accept("use std::fmt as f;").unwrap_err();
    assert!(err.is_duplicate_import());

    let err = generator.accept("use core::fmt;").unwrap_err();
    assert!(err.is_duplicate_import());
}

#[test]
fn test_glob_import_is_unsupported() {
    let mut generator = generator();
    let err = generator.accept("use std::collections::*;").unwrap_err();
    assert!(matches!(*err, Error::UnsupportedItem { .. }));
}

#[test]
fn test_reexport_is_rejected() {
    let mut generator = generator();
    let err = generator.accept("pub use crate::other::Thing;").unwrap_err();
    assert!(matches!(*err, Error::UnsupportedItem { ref kind, .. } if kind == "re-export"));

    let err = generator
        .accept("#[cfg(feature = \"fmt\")]\nuse std::fmt;")
        .unwrap_err();
    assert!(matches!(*err, Error::UnsupportedItem { .. }));

    assert!(generator.imports().is_empty());
    assert!(generator.items().is_empty());
}

#[test]
fn test_raw_identifier_import_round_trips() {
    let mut generator = generator();
    generator
        .accept("use foo::r#type; pub fn kind() -> r#type::Kind { todo!() }")
        .unwrap();

    assert!(generator.symbols().is_taken(ScopeId::ROOT, "r#type"));
    assert_eq!(generator.imports().alias("foo::type"), Some("r#type"));
    assert!(
        generator
            .to_source()
            .unwrap()
            .starts_with("use foo::r#type;\n")
    );
}

#[test]
fn test_empty_import_path_is_a_template_error() {
    let mut generator = generator();
    let err = generator
        .declare("pub fn f() -> {{ import(path='') }}::T { todo!() }", &json!({}))
        .unwrap_err();
    assert!(err.is_template());
    assert!(generator.imports().is_empty());
    assert!(generator.items().is_empty());
}

#[test]
fn test_declarations_keep_acceptance_order() {
    let mut generator = generator();
    for name in ["zeta", "alpha", "mid"] {
        generator
            .declare("pub fn {{ name }}() {}", &json!({ "name": name }))
            .unwrap();
    }
    generator.accept("struct Last; const FIRST: u8 = 1;").unwrap();

    assert_eq!(
        item_names(&generator.to_source().unwrap()),
        vec!["zeta", "alpha", "mid", "Last", "FIRST"]
    );
}

#[test]
fn test_output_is_deterministic() {
    let run = || {
        let mut generator = generator();
        generator
            .declare(
                "pub struct {{ a }}; pub fn make() -> {{ import(path='x/one') }}::T { todo!() }",
                &json!({"a": "A"}),
            )
            .unwrap();
        generator
            .declare(
                "pub fn other() -> {{ import(path='y/one') }}::T { todo!() }",
                &json!({}),
            )
            .unwrap();
        generator.to_source().unwrap()
    };

    let first = run();
    assert_eq!(first, run());
    assert!(first.contains("use y::one as one2;"));
}

#[test]
fn test_locals_do_not_leak_between_fragments() {
    let mut generator = generator();
    let template = "pub fn {{ name }}({{ fresh_name(preferred='value') }}: i32) {}";
    generator.declare(template, &json!({"name": "first"})).unwrap();
    generator.declare(template, &json!({"name": "second"})).unwrap();

    let code = generator.to_source().unwrap();
    assert_eq!(code.matches("(value: i32)").count(), 2);
    assert!(!generator.symbols().is_taken(ScopeId::ROOT, "value"));
}

#[test]
fn test_locals_avoid_root_names() {
    let mut generator = generator();
    generator.accept("pub fn value() {}").unwrap();
    let text = generator
        .render("{{ fresh_name(preferred='value') }}", &json!({}))
        .unwrap();
    assert_eq!(text, "value2");
}

#[test]
fn test_render_then_accept() {
    let mut generator = generator();
    let text = generator
        .render(
            "pub fn ids() -> {{ type_ref(ty=t, required=true) }} { Vec::new() }\npub fn encode(v: &{{ type_ref(ty=t, required=true) }}) -> {{ wire() }}::Value { {{ to_wire(ty=t, value='v') }} }",
            &json!({"t": {"kind": "list", "value": {"kind": "i64"}}}),
        )
        .unwrap();
    assert!(text.contains("_list_i64_to_wire(v)"));
    assert!(generator.items().is_empty());

    generator.accept(&text).unwrap();
    assert_eq!(
        item_names(&generator.to_source().unwrap()),
        vec!["ids", "encode", "_list_i64_to_wire"]
    );
}

#[test]
fn test_reserved_names_from_config() {
    let config: GeneratorConfig = "reserved_names = [\"Client\"]".parse().unwrap();
    let mut generator = Generator::new(config);

    let err = generator.accept("pub struct Client;").unwrap_err();
    assert!(err.is_name_collision());
}

#[test]
fn test_prelude_names_are_reserved() {
    let mut generator = generator();
    let err = generator.accept("pub struct Option;").unwrap_err();
    assert!(err.is_name_collision());
}
