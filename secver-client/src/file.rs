//! Fixture documents describing secrets, loaded into a [`MemorySecretStore`].
//!
//! ```yaml
//! secrets:
//!   - name: db/prod
//!     versions:
//!       - version_id: v1
//!         secret_string: pw123
//!         stages: [AWSPREVIOUS]
//!       - version_id: v2
//!         secret_binary_hex: "00ff"
//!         stages: [AWSCURRENT]
//!   - name: db/old
//!     deleted: true
//!   - name: db/locked
//!     failure:
//!       code: AccessDeniedException
//!       message: not authorized
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use secver_core::StoreError;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::memory::{MemorySecretStore, StoredVersion};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse fixtures as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse fixtures as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("secret {secret:?} version {version_id:?}: invalid secret_binary_hex: {source}")]
    Hex {
        secret: String,
        version_id: String,
        #[source]
        source: hex::FromHexError,
    },
    #[error("secret {secret:?} version {version_id:?} is declared more than once")]
    DuplicateVersion { secret: String, version_id: String },
    #[error("secret {secret:?} version {version_id:?} has both secret_string and secret_binary_hex")]
    BothPayloads { secret: String, version_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixtures {
    #[serde(default)]
    pub secrets: Vec<FixtureSecret>,
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureSecret {
    pub name: String,
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub versions: Vec<FixtureVersion>,
    #[serde(default)]
    pub failure: Option<FixtureFailure>,
}

/// Store error returned for every lookup of a secret.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureFailure {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureVersion {
    pub version_id: String,
    #[serde(default)]
    pub secret_string: Option<String>,
    #[serde(default)]
    pub secret_binary_hex: Option<String>,
    #[serde(default)]
    pub stages: Vec<String>,
}

impl Fixtures {
    pub fn parse(input: &str, format: FixtureFormat) -> Result<Self, FixtureError> {
        match format {
            FixtureFormat::Json => Ok(serde_json::from_str(input)?),
            FixtureFormat::Yaml => Ok(serde_yaml::from_str(input)?),
            FixtureFormat::Auto => parse_auto(input),
        }
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, FixtureFormat::Auto)
    }

    pub fn into_store(self) -> Result<MemorySecretStore, FixtureError> {
        let mut store = MemorySecretStore::new();
        for secret in self.secrets {
            store.create_secret(&secret.name);
            let mut seen = BTreeSet::new();
            for v in secret.versions {
                if !seen.insert(v.version_id.clone()) {
                    return Err(FixtureError::DuplicateVersion {
                        secret: secret.name,
                        version_id: v.version_id,
                    });
                }
                let version = match (v.secret_string, v.secret_binary_hex) {
                    (Some(_), Some(_)) => {
                        return Err(FixtureError::BothPayloads {
                            secret: secret.name,
                            version_id: v.version_id,
                        })
                    }
                    (Some(s), None) => StoredVersion::string(s),
                    (None, Some(h)) => match hex::decode(h.trim()) {
                        Ok(bytes) => StoredVersion::binary(bytes),
                        Err(source) => {
                            return Err(FixtureError::Hex {
                                secret: secret.name,
                                version_id: v.version_id,
                                source,
                            })
                        }
                    },
                    (None, None) => StoredVersion::default(),
                };
                let stages: Vec<&str> = v.stages.iter().map(String::as_str).collect();
                store.put_version(&secret.name, &v.version_id, version, &stages);
            }
            if let Some(arn) = secret.arn {
                store.set_arn(&secret.name, arn);
            }
            if secret.deleted {
                store.mark_deleted(&secret.name);
            }
            if let Some(f) = secret.failure {
                store.fail_with(
                    &secret.name,
                    StoreError {
                        code: f.code,
                        message: f.message,
                    },
                );
            }
        }
        debug!(secrets = store.len(), "loaded secret fixtures");
        Ok(store)
    }
}

impl MemorySecretStore {
    /// Build a store from a YAML or JSON fixture file.
    pub fn from_fixture_file(path: &Path) -> Result<Self, FixtureError> {
        Fixtures::load(path)?.into_store()
    }
}

fn parse_auto(input: &str) -> Result<Fixtures, FixtureError> {
    // JSON always starts with `{` after trimming; everything else is YAML.
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') {
        return match serde_json::from_str(input) {
            Ok(f) => Ok(f),
            Err(e) => serde_yaml::from_str(input).map_err(|_| FixtureError::Json(e)),
        };
    }
    match serde_yaml::from_str(input) {
        Ok(f) => Ok(f),
        Err(e) => serde_json::from_str(input).map_err(|_| FixtureError::Yaml(e)),
    }
}
