//! Fragment rendering with Tera.
//!
//! Templates reach the compilation unit through functions registered on a
//! fresh `Tera` instance per render. The functions share one render session
//! holding a staged copy of the unit's names and imports; the caller adopts
//! it only when the render succeeds.

use std::{
    collections::HashMap,
    error::Error as _,
    sync::{Arc, Mutex, MutexGuard},
};

use serde::{Serialize, de::DeserializeOwned};
use tera::{Context, Tera, Value};
use tracing::trace;
use wiregen_codegen::{Error, ImportRegistry, Result, ScopeId, SymbolTable, TypeMapper};
use wiregen_ir::{ConstValue, TypeSpec};

use crate::{
    RUST_NAMING, RustTypeMapper,
    wire::{ContainerHelper, HelperRegistry, WireCalls},
};

const FRAGMENT: &str = "fragment";

/// Names, imports and helpers of one compilation unit.
#[derive(Debug, Clone)]
pub(crate) struct UnitState {
    pub symbols: SymbolTable,
    pub imports: ImportRegistry,
    /// Container helpers already requested.
    pub helpers: HelperRegistry,
}

struct RenderSession {
    state: UnitState,
    wire_module: String,
    local: ScopeId,
    requested: Vec<ContainerHelper>,
}

impl RenderSession {
    fn import(&mut self, path: &str) -> tera::Result<String> {
        let state = &mut self.state;
        state
            .imports
            .import(&mut state.symbols, path)
            .map_err(|err| match *err {
                Error::Template { message } => tera::Error::msg(message),
                other => tera::Error::msg(other.to_string()),
            })
    }

    fn wire_alias(&mut self) -> tera::Result<String> {
        let module = self.wire_module.clone();
        self.import(&module)
    }

    /// Build a wire expression, recording helpers the unit has not seen.
    fn wire_call(
        &mut self,
        build: impl FnOnce(&mut WireCalls<'_>) -> String,
    ) -> tera::Result<String> {
        let wire = self.wire_alias()?;
        let state = &mut self.state;
        let mut calls = WireCalls::new(&wire, &mut state.helpers, &state.symbols);
        let expr = build(&mut calls);
        for helper in calls.into_requested() {
            trace!(helper = helper.name.as_str(), "requested container helper");
            self.requested.push(helper);
        }
        Ok(expr)
    }
}

type Shared = Arc<Mutex<RenderSession>>;

/// Keyword arguments of one template function call.
struct Args<'a> {
    function: &'static str,
    values: &'a HashMap<String, Value>,
}

impl<'a> Args<'a> {
    fn check(
        function: &'static str,
        params: &[&str],
        values: &'a HashMap<String, Value>,
    ) -> tera::Result<Self> {
        if let Some(unknown) = values.keys().find(|key| !params.contains(&key.as_str())) {
            return Err(tera::Error::msg(format!(
                "`{}` got an unexpected argument `{}` (expected: {})",
                function,
                unknown,
                params.join(", ")
            )));
        }
        Ok(Self { function, values })
    }

    fn get<T: DeserializeOwned>(&self, name: &str) -> tera::Result<T> {
        let value = self.values.get(name).ok_or_else(|| {
            tera::Error::msg(format!("`{}` is missing argument `{}`", self.function, name))
        })?;
        tera::from_value(value.clone()).map_err(|e| {
            tera::Error::msg(format!(
                "`{}` argument `{}` is invalid: {}",
                self.function, name, e
            ))
        })
    }

    fn type_spec(&self) -> tera::Result<TypeSpec> {
        self.get("ty")
    }
}

fn lock(session: &Shared) -> tera::Result<MutexGuard<'_, RenderSession>> {
    session
        .lock()
        .map_err(|_| tera::Error::msg("render session is poisoned"))
}

/// Register a function that reads or mutates the render session.
fn register_stateful<F>(
    tera: &mut Tera,
    session: &Shared,
    name: &'static str,
    params: &'static [&'static str],
    f: F,
) where
    F: Fn(&mut RenderSession, &Args<'_>) -> tera::Result<Value> + Send + Sync + 'static,
{
    let session = Arc::clone(session);
    tera.register_function(name, move |values: &HashMap<String, Value>| {
        let args = Args::check(name, params, values)?;
        let mut session = lock(&session)?;
        f(&mut *session, &args)
    });
}

/// Register a function computed from its arguments alone.
fn register_pure<F>(tera: &mut Tera, name: &'static str, params: &'static [&'static str], f: F)
where
    F: Fn(&Args<'_>) -> tera::Result<Value> + Send + Sync + 'static,
{
    tera.register_function(name, move |values: &HashMap<String, Value>| {
        let args = Args::check(name, params, values)?;
        f(&args)
    });
}

/// Register a filter transforming a string.
fn register_string_filter(tera: &mut Tera, name: &'static str, case: fn(&str) -> String) {
    tera.register_filter(
        name,
        move |value: &Value, args: &HashMap<String, Value>| {
            if let Some(arg) = args.keys().next() {
                return Err(tera::Error::msg(format!(
                    "filter `{}` got an unexpected argument `{}`",
                    name, arg
                )));
            }
            let input = value.as_str().ok_or_else(|| {
                tera::Error::msg(format!("filter `{}` expects a string, got {}", name, value))
            })?;
            Ok(Value::String(case(input)))
        },
    );
}

fn string_literal(input: &str) -> String {
    format!("{:?}", input)
}

/// One `#[doc]` attribute per line of `text`.
fn doc_attributes(text: &str) -> String {
    text.lines()
        .map(|line| format!("#[doc = {:?}]", format!(" {}", line.trim_end())))
        .collect::<Vec<_>>()
        .join("\n")
}

fn register_functions(tera: &mut Tera, session: &Shared) {
    register_string_filter(tera, "type_case", |name| RUST_NAMING.type_name(name));
    register_string_filter(tera, "field_case", |name| RUST_NAMING.field_name(name));
    register_string_filter(tera, "const_case", |name| RUST_NAMING.const_name(name));
    register_string_filter(tera, "string_literal", string_literal);
    register_string_filter(tera, "doc_attrs", doc_attributes);

    register_pure(tera, "decl_name", &["ty"], |args| {
        let spec = args.type_spec()?;
        RustTypeMapper.decl_name(&spec).map(Value::String).ok_or_else(|| {
            tera::Error::msg(format!("`decl_name` needs a user-defined type, got `{}`", spec))
        })
    });
    register_pure(tera, "type_ref", &["ty", "required"], |args| {
        let spec = args.type_spec()?;
        let required: bool = args.get("required")?;
        Ok(Value::String(RustTypeMapper.type_reference(&spec, required)))
    });
    register_pure(tera, "const_type", &["ty"], |args| {
        Ok(Value::String(RustTypeMapper.const_type(&args.type_spec()?)))
    });
    register_pure(tera, "literal", &["ty", "value"], |args| {
        let spec = args.type_spec()?;
        let value: ConstValue = args.get("value")?;
        RustTypeMapper
            .literal(&spec, &value)
            .map(Value::String)
            .ok_or_else(|| {
                tera::Error::msg(format!("cannot write {:?} as a `{}` literal", value, spec))
            })
    });
    register_pure(tera, "is_struct", &["ty"], |args| {
        Ok(Value::Bool(args.type_spec()?.is_struct()))
    });
    register_pure(tera, "is_reference", &["ty"], |args| {
        Ok(Value::Bool(args.type_spec()?.is_reference()))
    });

    register_stateful(tera, session, "import", &["path"], |session, args| {
        let path: String = args.get("path")?;
        Ok(Value::String(session.import(&path)?))
    });
    register_stateful(tera, session, "fresh_name", &["preferred"], |session, args| {
        let preferred: String = args.get("preferred")?;
        let local = session.local;
        Ok(Value::String(
            session.state.symbols.fresh_name(local, &preferred),
        ))
    });
    register_stateful(tera, session, "new_scope", &[], |session, _| {
        session.state.symbols.release(session.local);
        session.local = session.state.symbols.child(ScopeId::ROOT);
        Ok(Value::String(String::new()))
    });
    register_stateful(tera, session, "wire", &[], |session, _| {
        Ok(Value::String(session.wire_alias()?))
    });
    register_stateful(tera, session, "type_code", &["ty"], |session, args| {
        let spec = args.type_spec()?;
        Ok(Value::String(
            session.wire_call(|calls| calls.type_code(&spec))?,
        ))
    });
    register_stateful(tera, session, "to_wire", &["ty", "value"], |session, args| {
        let spec = args.type_spec()?;
        let value: String = args.get("value")?;
        Ok(Value::String(
            session.wire_call(|calls| calls.to_wire(&spec, &value))?,
        ))
    });
    register_stateful(tera, session, "from_wire", &["ty", "value"], |session, args| {
        let spec = args.type_spec()?;
        let value: String = args.get("value")?;
        Ok(Value::String(
            session.wire_call(|calls| calls.from_wire(&spec, &value))?,
        ))
    });
}

/// Describe a Tera error together with its causes.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Render `source` with `data`.
///
/// On success `state` is replaced by the session's copy and the helpers the
/// fragment requested for the first time are returned. On failure `state`
/// is left untouched.
pub(crate) fn render<T: Serialize + ?Sized>(
    state: &mut UnitState,
    wire_module: &str,
    source: &str,
    data: &T,
) -> Result<(String, Vec<ContainerHelper>)> {
    let context = Context::from_serialize(data).map_err(|e| Error::template(describe(&e)))?;

    let mut staged = state.clone();
    let local = staged.symbols.child(ScopeId::ROOT);
    let session: Shared = Arc::new(Mutex::new(RenderSession {
        state: staged,
        wire_module: wire_module.to_string(),
        local,
        requested: Vec::new(),
    }));

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    register_functions(&mut tera, &session);
    tera.add_raw_template(FRAGMENT, source)
        .map_err(|e| Error::template(describe(&e)))?;
    let text = tera
        .render(FRAGMENT, &context)
        .map_err(|e| Error::template(describe(&e)))?;
    drop(tera);

    let mut session = Arc::try_unwrap(session)
        .map_err(|_| Error::template("render session outlived its templates"))?
        .into_inner()
        .map_err(|_| Error::template("render session is poisoned"))?;
    session.state.symbols.release(session.local);
    *state = session.state;
    Ok((text, session.requested))
}
