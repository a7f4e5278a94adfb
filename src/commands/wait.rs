// ABOUTME: Wait command implementation.
// ABOUTME: Polls the latest deploy and reports live, failed, or timed out.

use super::{emit_warnings, platform};
use crate::cli::ApiArgs;
use deploykit::deploy::{Outcome, WaitOptions, wait_for_deploy};
use deploykit::error::Result;
use deploykit::output::Output;
use deploykit::types::StatusClassifier;
use std::time::Duration;

pub async fn wait(
    api: &ApiArgs,
    timeout_secs: u64,
    live_statuses: Vec<String>,
    failed_statuses: Vec<String>,
    output: &Output,
) -> Result<i32> {
    let client = platform(api)?;
    let classifier = StatusClassifier::default()
        .with_live(live_statuses)
        .with_failed(failed_statuses);
    let options = WaitOptions::new(Duration::from_secs(timeout_secs)).classifier(classifier);

    output.progress(&format!(
        "Waiting up to {timeout_secs}s for the latest deploy of {}",
        api.service
    ));

    let report = wait_for_deploy(&client, &api.service, &options, output).await?;
    emit_warnings(&report.diagnostics, output);

    let deploy_id = report
        .deploy
        .as_ref()
        .and_then(|d| d.id.as_ref())
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match report.outcome {
        Outcome::Success => {
            if let Some(duration) = report.deploy.as_ref().and_then(|d| d.duration()) {
                output.progress(&format!(
                    "  → Deploy took {}s on the platform",
                    duration.num_seconds()
                ));
            }
            match &report.build_id {
                Some(build_id) => output.result(&format!("Build id: {build_id}")),
                None => output.progress("  → No successful build found in recent events"),
            }
            output.success(&format!("Deploy {deploy_id} is live"));
        }
        Outcome::Failed => {
            let status = report
                .transitions
                .last()
                .map(|s| s.to_string())
                .unwrap_or_default();
            output.error(&format!(
                "Deploy {deploy_id} failed with status {status} after {}s",
                report.elapsed.as_secs()
            ));
            for envelope in &report.failure_events {
                let event = &envelope.event;
                output.result(&format!(
                    "  {} {} {}",
                    event.timestamp().unwrap_or("-"),
                    event.kind,
                    serde_json::Value::Object(event.details.clone())
                ));
            }
        }
        Outcome::TimedOut => {
            output.error(&format!(
                "Timed out after {}s waiting for deploy {deploy_id}",
                report.elapsed.as_secs()
            ));
        }
    }

    Ok(report.outcome.exit_code())
}
