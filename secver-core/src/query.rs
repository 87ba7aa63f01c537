use std::collections::BTreeSet;
use std::fmt;

use secrecy::SecretString;

use crate::value::SecretValue;

/// Stage label carried by the currently active version of a secret.
pub const CURRENT_STAGE: &str = "AWSCURRENT";
/// Stage label carried by the version that was active before the current one.
pub const PREVIOUS_STAGE: &str = "AWSPREVIOUS";

/// The one selector that picks a version: an explicit id or a stage label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSelector {
    Id(String),
    Stage(String),
}

impl VersionSelector {
    pub fn as_str(&self) -> &str {
        match self {
            VersionSelector::Id(v) | VersionSelector::Stage(v) => v,
        }
    }

    pub fn is_stage(&self) -> bool {
        matches!(self, VersionSelector::Stage(_))
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVersionQuery {
    /// Secret name or ARN.
    pub secret_id: String,
    pub version_id: Option<String>,
    pub version_stage: Option<String>,
}

impl SecretVersionQuery {
    pub fn new(secret_id: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            version_id: None,
            version_stage: None,
        }
    }

    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    pub fn with_version_stage(mut self, version_stage: impl Into<String>) -> Self {
        self.version_stage = Some(version_stage.into());
        self
    }

    /// The selector sent to the store. An empty string counts as unset.
    pub fn selector(&self) -> VersionSelector {
        if let Some(id) = self.version_id.as_deref().filter(|v| !v.is_empty()) {
            return VersionSelector::Id(id.to_string());
        }
        let stage = self
            .version_stage
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(CURRENT_STAGE);
        VersionSelector::Stage(stage.to_string())
    }

    /// `{secret_id}|{version}` where `version` is the effective selector.
    pub fn composite_id(&self) -> String {
        format!("{}|{}", self.secret_id, self.selector())
    }
}

/// One resolved version of a secret.
#[derive(Debug)]
pub struct SecretVersionResult {
    pub arn: String,
    /// Echo of the queried id, not the name reported by the store.
    pub secret_id: String,
    pub version_id: String,
    pub string_value: Option<SecretString>,
    pub binary_value: Option<SecretValue>,
    pub version_stages: BTreeSet<String>,
}
