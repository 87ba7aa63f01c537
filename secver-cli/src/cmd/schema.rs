use secver_core::secret_version_schema;

use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::OutputArgs;

pub fn schema_cmd(output: OutputArgs) -> i32 {
    let schema = secret_version_schema();

    if output.format == OutputFormat::Text && !output.quiet {
        for attr in &schema {
            let mut flags = Vec::new();
            if attr.required {
                flags.push("required".to_string());
            }
            if attr.optional {
                flags.push("optional".to_string());
            }
            if attr.computed {
                flags.push("computed".to_string());
            }
            if attr.sensitive {
                flags.push("sensitive".to_string());
            }
            if let Some(d) = attr.default {
                flags.push(format!("default={d}"));
            }
            println!("{:<16} {:<10} {}", attr.name, kind_name(attr.kind), flags.join(", "));
        }
    } else {
        print_result(output.format, output.quiet, &schema);
    }

    exit_codes::SUCCESS
}

fn kind_name(kind: secver_core::AttributeKind) -> &'static str {
    match kind {
        secver_core::AttributeKind::String => "string",
        secver_core::AttributeKind::StringSet => "set(string)",
    }
}
