#![forbid(unsafe_code)]

//! Resolve exactly one version of a secret from a versioned secret store.
//!
//! A [`SecretVersionQuery`] names a secret and, optionally, a version id or a
//! stage label. [`SecretVersionResolver`] turns it into a single lookup against
//! a [`SecretStoreClient`] and folds the two store-side "not found" shapes into
//! [`LookupError::NotFound`]. [`SecretVersionDataSource`] is the boundary to a
//! declarative attribute store.

pub mod attributes;
pub mod classify;
pub mod client;
pub mod data_source;
pub mod error;
pub mod query;
pub mod resolver;
pub mod value;

pub use crate::attributes::{
    apply_result, secret_version_schema, AttributeKind, AttributeSchema, AttributeStore,
    AttributeValue, ResourceData,
};
pub use crate::classify::{classify, FailureClass};
pub use crate::client::{GetSecretValueRequest, GetSecretValueResponse, SecretStoreClient, StoreError};
pub use crate::data_source::SecretVersionDataSource;
pub use crate::error::{AssignmentError, LookupError, ReadError};
pub use crate::query::{
    SecretVersionQuery, SecretVersionResult, VersionSelector, CURRENT_STAGE, PREVIOUS_STAGE,
};
pub use crate::resolver::SecretVersionResolver;
pub use crate::value::SecretValue;
