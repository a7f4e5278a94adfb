// ABOUTME: Deploy command implementation.
// ABOUTME: Updates the service image and triggers a new deploy.

use super::platform;
use crate::cli::ApiArgs;
use deploykit::deploy::update_and_deploy;
use deploykit::error::Result;
use deploykit::output::Output;
use deploykit::types::ImageRef;

pub async fn deploy(
    api: &ApiArgs,
    image: &ImageRef,
    docker_cmd: Option<&str>,
    output: &Output,
) -> Result<i32> {
    let client = platform(api)?;

    output.progress(&format!("Deploying {image} to {}", api.service));
    let deploy_id = update_and_deploy(&client, &api.service, image, docker_cmd, output).await?;

    if let Some(id) = deploy_id {
        output.result(&format!("Deploy id: {id}"));
    }
    output.success("Deploy triggered");
    Ok(0)
}
