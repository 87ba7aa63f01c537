use tracing::debug;

use secver_core::attributes::{SECRET_ID, VERSION_ID, VERSION_STAGE};
use secver_core::{LookupError, ReadError, ResourceData, SecretVersionDataSource};

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{BackendArgs, OutputArgs};

use super::config::{build_client, resolve_backend};

pub async fn get_cmd(
    secret_id: &str,
    version_id: Option<&str>,
    version_stage: Option<&str>,
    show_sensitive: bool,
    backend: BackendArgs,
    output: OutputArgs,
) -> i32 {
    let client = match resolve_backend(&backend) {
        Ok(config) => {
            debug!(backend = config.name(), "secret store configured");
            build_client(&config).await
        }
        Err(e) => Err(e),
    };
    let client = match client {
        Ok(c) => c,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let mut data = ResourceData::secret_version().reveal_sensitive(show_sensitive);
    let mut inputs = vec![(SECRET_ID, secret_id)];
    inputs.extend(version_id.map(|v| (VERSION_ID, v)));
    inputs.extend(version_stage.map(|v| (VERSION_STAGE, v)));
    for (name, value) in inputs {
        if let Err(e) = data.set_config(name, value.into()) {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    }

    let data_source = SecretVersionDataSource::new(client);
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    if let Err(e) = data_source.read_until(&mut data, interrupted).await {
        print_error(output.format, output.quiet, &e.to_string());
        return exit_code_for(&e);
    }

    if output.format == OutputFormat::Text && !output.quiet {
        print_text(&data);
    } else {
        print_result(output.format, output.quiet, &data);
    }
    exit_codes::SUCCESS
}

fn exit_code_for(err: &ReadError) -> i32 {
    match err {
        ReadError::Lookup(LookupError::NotFound { .. }) => exit_codes::NOT_FOUND,
        ReadError::Lookup(LookupError::Upstream { .. }) => exit_codes::LOOKUP_FAILED,
        ReadError::Lookup(LookupError::Cancelled { .. }) => exit_codes::CANCELLED,
        ReadError::Assignment(_)
        | ReadError::MissingAttribute(_)
        | ReadError::InvalidAttribute { .. } => exit_codes::RUNTIME_ERROR,
    }
}

fn print_text(data: &ResourceData) {
    // Reuse the serializer so sensitive values are masked the same way.
    let Ok(serde_json::Value::Object(map)) = serde_json::to_value(data) else {
        return;
    };
    for (name, value) in map {
        match value {
            serde_json::Value::String(s) => println!("{name:<16} {s}"),
            serde_json::Value::Array(items) => {
                let items: Vec<String> = items
                    .into_iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                println!("{name:<16} [{}]", items.join(", "));
            }
            serde_json::Value::Null => println!("{name:<16} -"),
            other => println!("{name:<16} {other}"),
        }
    }
}
