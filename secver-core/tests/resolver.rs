use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use secver_core::{
    GetSecretValueRequest, GetSecretValueResponse, LookupError, SecretStoreClient,
    SecretValue, SecretVersionQuery, SecretVersionResolver, StoreError, VersionSelector,
    CURRENT_STAGE,
};

const ARN: &str = "arn:aws:secretsmanager:us-east-1:123456789012:secret:db/prod-AbCdEf";

/// Answers every call with a canned outcome and records the requests it saw.
struct ScriptedStore {
    outcome: fn() -> Result<GetSecretValueResponse, StoreError>,
    seen: Mutex<Vec<GetSecretValueRequest>>,
}

impl ScriptedStore {
    fn new(outcome: fn() -> Result<GetSecretValueResponse, StoreError>) -> Self {
        Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<GetSecretValueRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStoreClient for ScriptedStore {
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> Result<GetSecretValueResponse, StoreError> {
        self.seen.lock().unwrap().push(request.clone());
        (self.outcome)()
    }
}

fn previous_v2() -> Result<GetSecretValueResponse, StoreError> {
    Ok(GetSecretValueResponse {
        arn: Some(ARN.to_string()),
        version_id: Some("v2".to_string()),
        secret_string: Some(SecretString::from("pw123".to_string())),
        secret_binary: None,
        version_stages: vec!["AWSPREVIOUS".to_string()],
    })
}

fn not_found() -> Result<GetSecretValueResponse, StoreError> {
    Err(StoreError::not_found(
        "Secrets Manager can't find the specified secret value for staging label: AWSCURRENT",
    ))
}

fn deleted() -> Result<GetSecretValueResponse, StoreError> {
    Err(StoreError::deleted())
}

fn throttled() -> Result<GetSecretValueResponse, StoreError> {
    Err(StoreError::new(
        "ThrottlingException",
        "service error: ThrottlingException: Rate exceeded",
    ))
}

#[tokio::test]
async fn version_id_is_sent_instead_of_stage() {
    let resolver = SecretVersionResolver::new(ScriptedStore::new(previous_v2));
    let q = SecretVersionQuery::new("db/prod")
        .with_version_id("v2")
        .with_version_stage("AWSCURRENT");

    resolver.resolve(&q).await.unwrap();

    let seen = resolver.client().requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].secret_id, "db/prod");
    assert_eq!(seen[0].selector, VersionSelector::Id("v2".to_string()));
}

#[tokio::test]
async fn stage_defaults_to_current_when_no_selector() {
    let resolver = SecretVersionResolver::new(ScriptedStore::new(previous_v2));
    resolver.resolve(&SecretVersionQuery::new("db/prod")).await.unwrap();

    let seen = resolver.client().requests();
    assert_eq!(seen[0].selector, VersionSelector::Stage(CURRENT_STAGE.to_string()));
}

#[tokio::test]
async fn resolves_version_by_id() {
    let resolver = SecretVersionResolver::new(ScriptedStore::new(previous_v2));
    let q = SecretVersionQuery::new("db/prod").with_version_id("v2");

    let r = resolver.resolve(&q).await.unwrap();

    assert_eq!(r.arn, ARN);
    assert_eq!(r.secret_id, "db/prod");
    assert_eq!(r.version_id, "v2");
    assert_eq!(r.string_value.as_ref().unwrap().expose_secret(), "pw123");
    assert!(r.binary_value.is_none());
    assert_eq!(r.version_stages, BTreeSet::from(["AWSPREVIOUS".to_string()]));
}

#[tokio::test]
async fn secret_id_is_echoed_from_the_query() {
    fn by_arn() -> Result<GetSecretValueResponse, StoreError> {
        Ok(GetSecretValueResponse {
            arn: Some(ARN.to_string()),
            version_id: Some("v9".to_string()),
            secret_string: None,
            secret_binary: Some(SecretValue::from_bytes(vec![0, 159, 146, 150])),
            version_stages: vec![],
        })
    }
    let resolver = SecretVersionResolver::new(ScriptedStore::new(by_arn));

    let r = resolver.resolve(&SecretVersionQuery::new(ARN)).await.unwrap();

    assert_eq!(r.secret_id, ARN);
    assert_eq!(r.binary_value.unwrap().expose_bytes(), &[0, 159, 146, 150]);
    assert!(r.string_value.is_none());
    assert!(r.version_stages.is_empty());
}

#[tokio::test]
async fn missing_response_fields_become_empty() {
    fn bare() -> Result<GetSecretValueResponse, StoreError> {
        Ok(GetSecretValueResponse::default())
    }
    let resolver = SecretVersionResolver::new(ScriptedStore::new(bare));

    let r = resolver.resolve(&SecretVersionQuery::new("x")).await.unwrap();

    assert_eq!(r.arn, "");
    assert_eq!(r.version_id, "");
}

#[tokio::test]
async fn not_found_names_the_effective_stage() {
    let resolver = SecretVersionResolver::new(ScriptedStore::new(not_found));

    let err = resolver
        .resolve(&SecretVersionQuery::new("db/prod"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LookupError::NotFound {
            secret_id: "db/prod".to_string(),
            version: "AWSCURRENT".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        r#"secret "db/prod" version "AWSCURRENT" not found"#
    );
}

#[tokio::test]
async fn not_found_names_the_effective_version_id() {
    let resolver = SecretVersionResolver::new(ScriptedStore::new(not_found));
    let q = SecretVersionQuery::new("db/prod")
        .with_version_id("v7")
        .with_version_stage("AWSPENDING");

    let err = resolver.resolve(&q).await.unwrap_err();

    assert!(matches!(err, LookupError::NotFound { ref version, .. } if version == "v7"));
}

#[tokio::test]
async fn deleted_secret_is_reported_as_not_found() {
    let resolver = SecretVersionResolver::new(ScriptedStore::new(deleted));
    let q = SecretVersionQuery::new("db/old").with_version_stage("AWSPREVIOUS");

    let err = resolver.resolve(&q).await.unwrap_err();

    assert_eq!(
        err,
        LookupError::NotFound {
            secret_id: "db/old".to_string(),
            version: "AWSPREVIOUS".to_string(),
        }
    );
}

#[tokio::test]
async fn other_errors_keep_the_store_message() {
    let resolver = SecretVersionResolver::new(ScriptedStore::new(throttled));

    let err = resolver
        .resolve(&SecretVersionQuery::new("db/prod"))
        .await
        .unwrap_err();

    match &err {
        LookupError::Upstream { message } => {
            assert_eq!(message, "service error: ThrottlingException: Rate exceeded")
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    assert!(err.to_string().contains("ThrottlingException: Rate exceeded"));
}

/// Never answers; stands in for a hung network call.
struct HangingStore;

#[async_trait]
impl SecretStoreClient for HangingStore {
    async fn get_secret_value(
        &self,
        _request: &GetSecretValueRequest,
    ) -> Result<GetSecretValueResponse, StoreError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_aborts_the_lookup() {
    let resolver = SecretVersionResolver::new(HangingStore);
    let q = SecretVersionQuery::new("db/prod");

    let err = resolver
        .resolve_until(&q, tokio::time::sleep(Duration::from_secs(5)))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LookupError::Cancelled {
            secret_id: "db/prod".to_string()
        }
    );
}

#[tokio::test]
async fn lookup_finishing_first_is_not_cancelled() {
    let resolver = SecretVersionResolver::new(ScriptedStore::new(previous_v2));
    let q = SecretVersionQuery::new("db/prod").with_version_id("v2");

    let r = resolver
        .resolve_until(&q, std::future::pending::<()>())
        .await
        .unwrap();

    assert_eq!(r.version_id, "v2");
}

#[tokio::test]
async fn boxed_clients_resolve() {
    let client: Box<dyn SecretStoreClient> = Box::new(ScriptedStore::new(previous_v2));
    let resolver = SecretVersionResolver::new(client);

    let r = resolver
        .resolve(&SecretVersionQuery::new("db/prod"))
        .await
        .unwrap();

    assert_eq!(r.arn, ARN);
}
