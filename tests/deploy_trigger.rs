// ABOUTME: Integration tests for updating a service image and triggering a deploy.
// ABOUTME: Verifies request order, body shape, and rejection handling.

mod support;

use deploykit::deploy::{DeployError, update_and_deploy};
use deploykit::output::{Output, OutputMode};
use deploykit::types::{ImageRef, ServiceId};
use serde_json::json;
use support::fake_api::{Call, FakeApi};

fn quiet() -> Output {
    Output::new(OutputMode::Quiet)
}

#[tokio::test]
async fn patches_then_triggers() {
    let api = FakeApi::new();
    let image = ImageRef::parse("ghcr.io/acme/api:2024.05.01").unwrap();

    let deploy_id = update_and_deploy(
        &api,
        &ServiceId::new("srv-1"),
        &image,
        Some("./bin/server --port 10000"),
        &quiet(),
    )
    .await
    .unwrap();

    assert_eq!(deploy_id.map(|id| id.into_inner()), Some("dep-new".to_string()));
    assert_eq!(
        api.calls(),
        [
            Call::UpdateService(json!({
                "serviceDetails": {
                    "env": "docker",
                    "envSpecificDetails": {
                        "image": "ghcr.io/acme/api:2024.05.01",
                        "dockerCommand": "./bin/server --port 10000"
                    }
                }
            })),
            Call::TriggerDeploy,
        ]
    );
}

#[tokio::test]
async fn accepted_patch_statuses() {
    for status in [200, 202] {
        let api = FakeApi::new().patch_status(status);
        let image = ImageRef::parse("app:1").unwrap();
        let result =
            update_and_deploy(&api, &ServiceId::new("srv-1"), &image, None, &quiet()).await;
        assert!(result.is_ok(), "status {status}");
    }
}

#[tokio::test]
async fn rejected_patch_skips_trigger() {
    let api = FakeApi::new().patch_status(400);
    let image = ImageRef::parse("app:1").unwrap();

    let err = update_and_deploy(&api, &ServiceId::new("srv-1"), &image, None, &quiet())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::PatchRejected { status: 400, .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(!api.calls().contains(&Call::TriggerDeploy));
}

#[tokio::test]
async fn rejected_trigger() {
    let api = FakeApi::new().trigger(202, json!({"message": "queued elsewhere"}));
    let image = ImageRef::parse("app:1").unwrap();

    let err = update_and_deploy(&api, &ServiceId::new("srv-1"), &image, None, &quiet())
        .await
        .unwrap_err();

    match &err {
        DeployError::TriggerRejected { status, body } => {
            assert_eq!(*status, 202);
            assert!(body.contains("queued elsewhere"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn trigger_without_deploy_body_is_still_ok() {
    let api = FakeApi::new().trigger(200, json!([]));
    let image = ImageRef::parse("app:1").unwrap();

    let deploy_id = update_and_deploy(&api, &ServiceId::new("srv-1"), &image, None, &quiet())
        .await
        .unwrap();

    assert!(deploy_id.is_none());
}
