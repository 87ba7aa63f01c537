use std::path::PathBuf;

use secver_client::MemorySecretStore;
use secver_core::SecretStoreClient;

use crate::{Backend, BackendArgs};

pub const BACKEND_ENV: &str = "SECVER_BACKEND";
pub const FIXTURES_ENV: &str = "SECVER_FIXTURES";

/// Backend selection after applying environment fallbacks.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Memory,
    File { fixtures: PathBuf },
    Aws { region: Option<String> },
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Memory => "memory",
            BackendConfig::File { .. } => "file",
            BackendConfig::Aws { .. } => "aws",
        }
    }
}

pub fn resolve_backend(args: &BackendArgs) -> Result<BackendConfig, String> {
    let backend = match args.backend {
        Some(b) => b,
        None => match std::env::var(BACKEND_ENV) {
            Ok(v) => parse_backend(&v)?,
            Err(_) => Backend::File,
        },
    };

    match backend {
        Backend::Memory => Ok(BackendConfig::Memory),
        Backend::File => {
            let fixtures = args
                .fixtures
                .clone()
                .or_else(|| std::env::var_os(FIXTURES_ENV).map(PathBuf::from))
                .ok_or_else(|| {
                    format!("missing fixtures file. Set --fixtures <path> or {FIXTURES_ENV}")
                })?;
            Ok(BackendConfig::File { fixtures })
        }
        Backend::Aws => Ok(BackendConfig::Aws {
            region: args.region.clone(),
        }),
    }
}

fn parse_backend(value: &str) -> Result<Backend, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "memory" => Ok(Backend::Memory),
        "file" => Ok(Backend::File),
        "aws" => Ok(Backend::Aws),
        other => Err(format!("unknown backend in {BACKEND_ENV}: {other}")),
    }
}

pub async fn build_client(config: &BackendConfig) -> Result<Box<dyn SecretStoreClient>, String> {
    match config {
        BackendConfig::Memory => Ok(Box::new(MemorySecretStore::new())),
        BackendConfig::File { fixtures } => {
            let store = MemorySecretStore::from_fixture_file(fixtures).map_err(|e| e.to_string())?;
            Ok(Box::new(store))
        }
        BackendConfig::Aws { region } => build_aws_client(region.clone()).await,
    }
}

#[cfg(feature = "aws")]
async fn build_aws_client(region: Option<String>) -> Result<Box<dyn SecretStoreClient>, String> {
    let store = match region {
        Some(r) => secver_client::AwsSecretStore::from_env_with_region(r).await,
        None => secver_client::AwsSecretStore::from_env().await,
    };
    Ok(Box::new(store))
}

#[cfg(not(feature = "aws"))]
async fn build_aws_client(_region: Option<String>) -> Result<Box<dyn SecretStoreClient>, String> {
    Err("secver was built without AWS support (enable the `aws` feature)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_backend_is_case_insensitive() {
        assert_eq!(parse_backend("AWS").unwrap(), Backend::Aws);
        assert_eq!(parse_backend(" file ").unwrap(), Backend::File);
        assert_eq!(parse_backend("Memory").unwrap(), Backend::Memory);
        assert!(parse_backend("vault").is_err());
    }

    #[test]
    fn explicit_fixtures_win() {
        let args = BackendArgs {
            backend: Some(Backend::File),
            fixtures: Some(PathBuf::from("/tmp/secrets.yaml")),
            region: None,
        };
        match resolve_backend(&args).unwrap() {
            BackendConfig::File { fixtures } => {
                assert_eq!(fixtures, PathBuf::from("/tmp/secrets.yaml"))
            }
            other => panic!("unexpected backend {other:?}"),
        }
    }
}
