#![forbid(unsafe_code)]

//! [`SecretStoreClient`](secver_core::SecretStoreClient) implementations.

mod file;
mod memory;

#[cfg(feature = "aws")]
mod aws;

pub use file::{FixtureError, FixtureFailure, FixtureFormat, FixtureSecret, FixtureVersion, Fixtures};
pub use memory::{MemorySecretStore, StoredVersion};

#[cfg(feature = "aws")]
pub use aws::AwsSecretStore;
