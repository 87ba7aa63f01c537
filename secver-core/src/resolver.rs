use std::future::Future;

use tracing::debug;

use crate::classify::classify;
use crate::client::{GetSecretValueRequest, SecretStoreClient, StoreError};
use crate::error::LookupError;
use crate::query::{SecretVersionQuery, SecretVersionResult};

/// Resolves one concrete version of a secret with a single store lookup.
///
/// Holds no state beyond the client, so concurrent calls are independent.
/// Retries and timeouts belong to the client.
pub struct SecretVersionResolver<C> {
    client: C,
}

impl<C> SecretVersionResolver<C>
where
    C: SecretStoreClient,
{
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn resolve(
        &self,
        query: &SecretVersionQuery,
    ) -> Result<SecretVersionResult, LookupError> {
        let request = GetSecretValueRequest {
            secret_id: query.secret_id.clone(),
            selector: query.selector(),
        };
        debug!(
            secret_id = %request.secret_id,
            selector = ?request.selector,
            "reading secret version"
        );

        let resp = self
            .client
            .get_secret_value(&request)
            .await
            .map_err(|e| lookup_error(&request, e))?;

        Ok(SecretVersionResult {
            arn: resp.arn.unwrap_or_default(),
            secret_id: query.secret_id.clone(),
            version_id: resp.version_id.unwrap_or_default(),
            string_value: resp.secret_string,
            binary_value: resp.secret_binary,
            version_stages: resp.version_stages.into_iter().collect(),
        })
    }

    /// Like [`resolve`](Self::resolve), but gives up as soon as `cancel`
    /// completes. The in-flight lookup is dropped, which aborts it.
    pub async fn resolve_until<F>(
        &self,
        query: &SecretVersionQuery,
        cancel: F,
    ) -> Result<SecretVersionResult, LookupError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                debug!(secret_id = %query.secret_id, "secret version lookup cancelled");
                Err(LookupError::Cancelled {
                    secret_id: query.secret_id.clone(),
                })
            }
            result = self.resolve(query) => result,
        }
    }
}

fn lookup_error(request: &GetSecretValueRequest, err: StoreError) -> LookupError {
    let class = classify(&err);
    debug!(
        secret_id = %request.secret_id,
        class = ?class,
        code = err.code().unwrap_or("-"),
        "secret version lookup failed"
    );
    if class.is_not_found() {
        LookupError::NotFound {
            secret_id: request.secret_id.clone(),
            version: request.selector.as_str().to_string(),
        }
    } else {
        LookupError::Upstream {
            message: err.message,
        }
    }
}
