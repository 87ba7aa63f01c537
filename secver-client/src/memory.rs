use std::collections::BTreeMap;

use async_trait::async_trait;
use secrecy::SecretString;
use secver_core::{
    GetSecretValueRequest, GetSecretValueResponse, SecretStoreClient, SecretValue, StoreError,
    VersionSelector,
};

const ARN_PREFIX: &str = "arn:aws:secretsmanager:us-east-1:000000000000:secret:";

/// Payload of one stored version.
#[derive(Debug, Clone, Default)]
pub struct StoredVersion {
    secret_string: Option<SecretValue>,
    secret_binary: Option<SecretValue>,
}

impl StoredVersion {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            secret_string: Some(SecretValue::from_bytes(value.into().into_bytes())),
            secret_binary: None,
        }
    }

    pub fn binary(bytes: Vec<u8>) -> Self {
        Self {
            secret_string: None,
            secret_binary: Some(SecretValue::from_bytes(bytes)),
        }
    }
}

#[derive(Debug)]
struct StoredSecret {
    arn: String,
    versions: BTreeMap<String, StoredVersion>,
    /// stage label -> version id
    stages: BTreeMap<String, String>,
    deleted: bool,
    /// Returned for every lookup of this secret when set.
    failure: Option<StoreError>,
}

impl StoredSecret {
    fn labels_of(&self, version_id: &str) -> Vec<String> {
        self.stages
            .iter()
            .filter(|(_, v)| v.as_str() == version_id)
            .map(|(stage, _)| stage.clone())
            .collect()
    }
}

/// Versioned secret store held in memory.
///
/// Answers with the same error codes and messages as AWS Secrets Manager,
/// including the invalid-request error for deleted secrets.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: BTreeMap<String, StoredSecret>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a secret with no versions. No-op if it already exists.
    pub fn create_secret(&mut self, name: &str) -> &mut Self {
        self.secret_mut(name);
        self
    }

    /// Add or replace a version and move each of `stages` onto it.
    pub fn put_version(
        &mut self,
        name: &str,
        version_id: &str,
        version: StoredVersion,
        stages: &[&str],
    ) -> &mut Self {
        let secret = self.secret_mut(name);
        secret.versions.insert(version_id.to_string(), version);
        for stage in stages {
            secret
                .stages
                .insert((*stage).to_string(), version_id.to_string());
        }
        self
    }

    pub fn set_arn(&mut self, name: &str, arn: impl Into<String>) -> &mut Self {
        self.secret_mut(name).arn = arn.into();
        self
    }

    /// Returns `false` when there is no such secret.
    pub fn mark_deleted(&mut self, name: &str) -> bool {
        match self.secrets.get_mut(name) {
            Some(secret) => {
                secret.deleted = true;
                true
            }
            None => false,
        }
    }

    /// Make every lookup of `name` fail with `err`, e.g. to stand in for an
    /// access-denied or throttling response. Returns `false` when there is
    /// no such secret.
    pub fn fail_with(&mut self, name: &str, err: StoreError) -> bool {
        match self.secrets.get_mut(name) {
            Some(secret) => {
                secret.failure = Some(err);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Stage labels currently attached to a version.
    pub fn stage_labels(&self, name: &str, version_id: &str) -> Vec<String> {
        self.secrets
            .get(name)
            .map(|s| s.labels_of(version_id))
            .unwrap_or_default()
    }

    fn secret_mut(&mut self, name: &str) -> &mut StoredSecret {
        self.secrets
            .entry(name.to_string())
            .or_insert_with(|| StoredSecret {
                arn: format!("{ARN_PREFIX}{name}"),
                versions: BTreeMap::new(),
                stages: BTreeMap::new(),
                deleted: false,
                failure: None,
            })
    }

    /// Secrets are addressable by name or by ARN.
    fn find(&self, secret_id: &str) -> Option<&StoredSecret> {
        self.secrets
            .get(secret_id)
            .or_else(|| self.secrets.values().find(|s| s.arn == secret_id))
    }
}

#[async_trait]
impl SecretStoreClient for MemorySecretStore {
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> Result<GetSecretValueResponse, StoreError> {
        let secret = self
            .find(&request.secret_id)
            .ok_or_else(|| StoreError::not_found("Secrets Manager can't find the specified secret."))?;
        if let Some(err) = &secret.failure {
            return Err(err.clone());
        }
        if secret.deleted {
            return Err(StoreError::deleted());
        }

        let version_id = match &request.selector {
            VersionSelector::Id(id) => id.as_str(),
            VersionSelector::Stage(stage) => secret
                .stages
                .get(stage)
                .map(String::as_str)
                .ok_or_else(|| {
                    StoreError::not_found(format!(
                        "Secrets Manager can't find the specified secret value for staging label: {stage}"
                    ))
                })?,
        };
        let version = secret.versions.get(version_id).ok_or_else(|| {
            StoreError::not_found(format!(
                "Secrets Manager can't find the specified secret value for VersionId: {version_id}"
            ))
        })?;

        Ok(GetSecretValueResponse {
            arn: Some(secret.arn.clone()),
            version_id: Some(version_id.to_string()),
            secret_string: version.secret_string.as_ref().map(|v| {
                SecretString::from(String::from_utf8_lossy(v.expose_bytes()).into_owned())
            }),
            secret_binary: version.secret_binary.clone(),
            version_stages: secret.labels_of(version_id),
        })
    }
}
