use wiregen_codegen::Result;
use wiregen_ir::{FieldSpec, FunctionSpec, ServiceSpec, TypeSpec};

use super::structs;
use crate::Generator;

/// Field id of a function's return value in its result struct.
const SUCCESS_ID: i16 = 0;

pub(super) fn declare(generator: &mut Generator, service: &ServiceSpec) -> Result<()> {
    for function in &service.functions {
        declare_function(generator, &service.name, function)?;
    }
    Ok(())
}

fn declare_function(generator: &mut Generator, service: &str, function: &FunctionSpec) -> Result<()> {
    let args = TypeSpec::user_struct(format!("{}_{}_args", service, function.name));
    structs::declare_fields(generator, args, None, &function.args, false)?;

    if function.oneway {
        return Ok(());
    }

    let mut fields = Vec::with_capacity(function.exceptions.len() + 1);
    if let Some(result) = &function.result {
        fields.push(FieldSpec::optional(SUCCESS_ID, "success", result.clone()));
    }
    fields.extend(function.exceptions.iter().map(|exception| FieldSpec {
        required: false,
        ..exception.clone()
    }));

    let result = TypeSpec::user_struct(format!("{}_{}_result", service, function.name));
    structs::declare_fields(generator, result, None, &fields, false)
}
