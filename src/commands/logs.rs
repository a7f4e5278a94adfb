// ABOUTME: Logs command implementation.
// ABOUTME: Saves build logs, or recent events when no logs are available.

use super::{emit_warnings, platform};
use crate::cli::ApiArgs;
use deploykit::diagnostics::Diagnostics;
use deploykit::error::Result;
use deploykit::logs::{LogsOutcome, LogsRequest, fetch_build_logs};
use deploykit::output::Output;
use deploykit::types::BuildId;
use std::path::PathBuf;

pub async fn logs(
    api: &ApiArgs,
    build_id: Option<String>,
    out: PathBuf,
    event_limit: usize,
    output: &Output,
) -> Result<i32> {
    let client = platform(api)?;
    let request = LogsRequest {
        service: api.service.clone(),
        build_id: build_id.map(BuildId::new),
        out,
        event_limit,
    };

    let mut diag = Diagnostics::default();
    let outcome = fetch_build_logs(&client, &request, output, &mut diag).await;
    emit_warnings(&diag, output);
    let outcome = outcome?;

    match &outcome {
        LogsOutcome::BuildLogs {
            build_id,
            endpoint,
            bytes,
        } => output.success(&format!(
            "Saved {bytes} bytes of logs for build {build_id} from {endpoint} to {}",
            request.out.display()
        )),
        LogsOutcome::EventFallback { events } => output.result(&format!(
            "No build logs available; saved {events} recent events to {}",
            request.out.display()
        )),
    }

    Ok(0)
}
