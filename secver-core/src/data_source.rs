use std::future::Future;

use tracing::debug;

use crate::attributes::{
    apply_result, AttributeStore, ResourceData, SECRET_ID, VERSION_ID, VERSION_STAGE,
};
use crate::client::SecretStoreClient;
use crate::error::ReadError;
use crate::query::SecretVersionQuery;
use crate::resolver::SecretVersionResolver;

/// Read-only data source exposing one secret version as resource attributes.
pub struct SecretVersionDataSource<C> {
    resolver: SecretVersionResolver<C>,
}

impl<C> SecretVersionDataSource<C>
where
    C: SecretStoreClient,
{
    pub fn new(client: C) -> Self {
        Self {
            resolver: SecretVersionResolver::new(client),
        }
    }

    pub fn resolver(&self) -> &SecretVersionResolver<C> {
        &self.resolver
    }

    /// Resolve the version configured in `data` and store its attributes.
    pub async fn read(&self, data: &mut ResourceData) -> Result<(), ReadError> {
        self.read_until(data, std::future::pending()).await
    }

    /// [`read`](Self::read) that stops waiting on the store once `cancel`
    /// completes. Nothing is written to `data` when cancelled.
    pub async fn read_until<F>(&self, data: &mut ResourceData, cancel: F) -> Result<(), ReadError>
    where
        F: Future<Output = ()>,
    {
        let query = query_from(data)?;
        let result = self.resolver.resolve_until(&query, cancel).await?;
        apply_result(data, &query, &result)?;
        debug!(id = data.id().unwrap_or_default(), "secret version read");
        Ok(())
    }
}

fn query_from(data: &ResourceData) -> Result<SecretVersionQuery, ReadError> {
    let secret_id = match data.get_config(SECRET_ID) {
        None => return Err(ReadError::MissingAttribute(SECRET_ID.to_string())),
        Some(v) => v.as_str().ok_or_else(|| ReadError::InvalidAttribute {
            attribute: SECRET_ID.to_string(),
            message: "expected a string".to_string(),
        })?,
    };
    if secret_id.is_empty() {
        return Err(ReadError::MissingAttribute(SECRET_ID.to_string()));
    }

    let mut query = SecretVersionQuery::new(secret_id);
    if let Some(id) = data.config_string(VERSION_ID) {
        query = query.with_version_id(id);
    }
    if let Some(stage) = data.config_string(VERSION_STAGE) {
        query = query.with_version_stage(stage);
    }
    Ok(query)
}
