use wiregen_codegen::Result;
use wiregen_ir::ConstantSpec;

use crate::Generator;

const TEMPLATE: &str = r#"
pub const {{ name | const_case }}: {{ const_type(ty=type) }} = {{ literal(ty=type, value=value) }};
"#;

pub(super) fn declare(generator: &mut Generator, constant: &ConstantSpec) -> Result<()> {
    generator.declare(TEMPLATE, constant)
}
