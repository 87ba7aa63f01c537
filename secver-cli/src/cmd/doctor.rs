use secver_client::MemorySecretStore;
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::{BackendArgs, OutputArgs};

use super::config::{build_client, resolve_backend, BackendConfig};

#[derive(Serialize)]
struct Check {
    name: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize)]
struct DoctorResult {
    checks: Vec<Check>,
    all_passed: bool,
}

pub async fn doctor_cmd(backend: BackendArgs, output: OutputArgs) -> i32 {
    let mut checks = Vec::new();

    match resolve_backend(&backend) {
        Ok(config) => {
            checks.push(Check {
                name: "backend".to_string(),
                status: "ok".to_string(),
                message: Some(config.name().to_string()),
            });
            checks.push(check_client(&config).await);
        }
        Err(e) => checks.push(Check {
            name: "backend".to_string(),
            status: "error".to_string(),
            message: Some(e),
        }),
    }

    let all_passed = checks.iter().all(|c| c.status == "ok");
    let result = DoctorResult { checks, all_passed };

    if output.format == OutputFormat::Text && !output.quiet {
        println!("Environment checks:");
        for c in &result.checks {
            let icon = if c.status == "ok" { "✓" } else { "✗" };
            print!("  {} {}: {}", icon, c.name, c.status);
            if let Some(msg) = &c.message {
                print!(" - {msg}");
            }
            println!();
        }
        if result.all_passed {
            println!("\nAll checks passed.");
        } else {
            println!("\nSome checks failed.");
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    if all_passed {
        exit_codes::SUCCESS
    } else {
        exit_codes::RUNTIME_ERROR
    }
}

async fn check_client(config: &BackendConfig) -> Check {
    let outcome = match config {
        BackendConfig::Memory => Ok("empty in-memory store".to_string()),
        BackendConfig::File { fixtures } => MemorySecretStore::from_fixture_file(fixtures)
            .map(|store| format!("{} secrets loaded from {}", store.len(), fixtures.display()))
            .map_err(|e| e.to_string()),
        BackendConfig::Aws { region } => build_client(config).await.map(|_| match region {
            Some(r) => format!("region: {r}"),
            None => "region from SDK defaults".to_string(),
        }),
    };
    match outcome {
        Ok(message) => Check {
            name: "client".to_string(),
            status: "ok".to_string(),
            message: Some(message),
        },
        Err(e) => Check {
            name: "client".to_string(),
            status: "error".to_string(),
            message: Some(e),
        },
    }
}
