//! AWS Secrets Manager client.
//!
//! Enabled via the `aws` feature.

use async_trait::async_trait;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_secretsmanager::Client;
use secrecy::SecretString;
use secver_core::{
    GetSecretValueRequest, GetSecretValueResponse, SecretStoreClient, SecretValue, StoreError,
    VersionSelector,
};

pub struct AwsSecretStore {
    client: Client,
}

impl AwsSecretStore {
    /// Create from an existing SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create with default AWS config (env vars, profile, instance metadata, etc.).
    /// Retries and timeouts come from that config.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }

    /// Create with default AWS config for an explicit region.
    pub async fn from_env_with_region(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.into()))
            .load()
            .await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl SecretStoreClient for AwsSecretStore {
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> Result<GetSecretValueResponse, StoreError> {
        let req = self
            .client
            .get_secret_value()
            .secret_id(&request.secret_id);
        let req = match &request.selector {
            VersionSelector::Id(id) => req.version_id(id),
            VersionSelector::Stage(stage) => req.version_stage(stage),
        };

        let resp = req.send().await.map_err(|e| store_error(&e))?;

        Ok(GetSecretValueResponse {
            arn: resp.arn,
            version_id: resp.version_id,
            secret_string: resp.secret_string.map(SecretString::from),
            secret_binary: resp
                .secret_binary
                .map(|b| SecretValue::from_bytes(b.into_inner())),
            version_stages: resp.version_stages.unwrap_or_default(),
        })
    }
}

/// Keep the SDK's error code and its full message chain.
fn store_error<E>(err: &E) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    StoreError {
        code: err.code().map(str::to_string),
        message: DisplayErrorContext(err).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_secretsmanager::error::ErrorMetadata;
    use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
    use aws_sdk_secretsmanager::types::error::{
        InvalidRequestException, ResourceNotFoundException,
    };
    use secver_core::{classify, FailureClass};

    const DELETED: &str =
        "You can't perform this operation on the secret because it was deleted.";

    fn meta(code: &str, message: &str) -> ErrorMetadata {
        ErrorMetadata::builder().code(code).message(message).build()
    }

    #[test]
    fn deleted_secret_error_classifies_as_deleted() {
        let err = GetSecretValueError::InvalidRequestException(
            InvalidRequestException::builder()
                .message(DELETED)
                .meta(meta("InvalidRequestException", DELETED))
                .build(),
        );

        let mapped = store_error(&err);

        assert_eq!(mapped.code(), Some(StoreError::INVALID_REQUEST));
        assert!(mapped.message.contains(DELETED));
        assert_eq!(classify(&mapped), FailureClass::Deleted);
    }

    #[test]
    fn not_found_error_classifies_as_missing() {
        let msg = "Secrets Manager can't find the specified secret.";
        let err = GetSecretValueError::ResourceNotFoundException(
            ResourceNotFoundException::builder()
                .message(msg)
                .meta(meta("ResourceNotFoundException", msg))
                .build(),
        );

        assert_eq!(classify(&store_error(&err)), FailureClass::Missing);
    }

    #[test]
    fn unmodelled_error_keeps_code_and_message() {
        let err = GetSecretValueError::generic(meta("ThrottlingException", "Rate exceeded"));

        let mapped = store_error(&err);

        assert_eq!(mapped.code(), Some("ThrottlingException"));
        assert!(mapped.message.contains("Rate exceeded"));
        assert_eq!(classify(&mapped), FailureClass::Other);
    }
}
