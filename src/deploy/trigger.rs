// ABOUTME: Points a service at a new container image and starts a deploy.
// ABOUTME: PATCHes the service details, then POSTs to the deploy list.

use super::error::DeployError;
use crate::api::{Deploy, PlatformApi, ServicePatch};
use crate::output::Output;
use crate::types::{DeployId, ImageRef, ServiceId};

/// Statuses accepted for the service update.
pub const PATCH_ACCEPTED: &[u16] = &[200, 202];

/// Statuses accepted for the deploy trigger.
pub const TRIGGER_ACCEPTED: &[u16] = &[200, 201];

/// Update the service image and trigger a deploy.
///
/// Returns the new deploy's id when the platform includes one in its
/// response.
pub async fn update_and_deploy<A>(
    api: &A,
    service: &ServiceId,
    image: &ImageRef,
    docker_command: Option<&str>,
    output: &Output,
) -> Result<Option<DeployId>, DeployError>
where
    A: PlatformApi + ?Sized,
{
    if image.is_floating() {
        tracing::warn!("image {} has no tag or digest, the platform will pull latest", image);
    }

    output.progress(&format!("  → Updating {service} to {image}..."));
    let patch = ServicePatch::docker_image(image, docker_command);
    let response = api.update_service(service, &patch).await?;
    if !PATCH_ACCEPTED.contains(&response.status) {
        return Err(DeployError::PatchRejected {
            status: response.status,
            body: response.text(),
        });
    }

    output.progress("  → Triggering deploy...");
    let response = api.trigger_deploy(service).await?;
    if !TRIGGER_ACCEPTED.contains(&response.status) {
        return Err(DeployError::TriggerRejected {
            status: response.status,
            body: response.text(),
        });
    }

    // The deploy id is informational; an unexpected body is not an error.
    let deploy_id = serde_json::from_slice::<Deploy>(&response.body)
        .ok()
        .and_then(|deploy| deploy.id);

    Ok(deploy_id)
}
