//! The interface a secret store exposes to the resolver.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::query::VersionSelector;
use crate::value::SecretValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSecretValueRequest {
    pub secret_id: String,
    pub selector: VersionSelector,
}

#[derive(Debug, Default)]
pub struct GetSecretValueResponse {
    pub arn: Option<String>,
    pub version_id: Option<String>,
    pub secret_string: Option<SecretString>,
    pub secret_binary: Option<SecretValue>,
    pub version_stages: Vec<String>,
}

/// Failure reported by a store, with its machine-readable code when it has one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    /// The secret, or the requested version/stage of it, does not exist.
    pub const RESOURCE_NOT_FOUND: &'static str = "ResourceNotFoundException";
    /// The request is not valid for the secret's current state.
    pub const INVALID_REQUEST: &'static str = "InvalidRequestException";
    /// Message carried by an invalid-request error when the secret is scheduled for deletion.
    pub const DELETED_SECRET_MESSAGE: &'static str =
        "You can't perform this operation on the secret because it was deleted";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// An error without a code, e.g. a transport failure.
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Self::RESOURCE_NOT_FOUND, message)
    }

    pub fn deleted() -> Self {
        Self::new(
            Self::INVALID_REQUEST,
            format!("{}.", Self::DELETED_SECRET_MESSAGE),
        )
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

#[async_trait]
pub trait SecretStoreClient: Send + Sync {
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> Result<GetSecretValueResponse, StoreError>;
}

#[async_trait]
impl<T> SecretStoreClient for Box<T>
where
    T: SecretStoreClient + ?Sized,
{
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> Result<GetSecretValueResponse, StoreError> {
        (**self).get_secret_value(request).await
    }
}

#[async_trait]
impl<T> SecretStoreClient for Arc<T>
where
    T: SecretStoreClient + ?Sized,
{
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> Result<GetSecretValueResponse, StoreError> {
        (**self).get_secret_value(request).await
    }
}
