// ABOUTME: Build log retrieval with endpoint fallback.
// ABOUTME: Falls back to dumping recent service events when no log endpoint answers.

use crate::api::{ApiError, LogEndpoint, PlatformApi, find_succeeded_build};
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Output;
use crate::types::{BuildId, ServiceId};
use std::path::{Path, PathBuf};

/// Default number of events written by the fallback.
pub const DEFAULT_EVENT_LIMIT: usize = 50;

/// What ended up in the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogsOutcome {
    /// Build logs were written verbatim.
    BuildLogs {
        build_id: BuildId,
        endpoint: LogEndpoint,
        bytes: usize,
    },
    /// No log endpoint answered; recent events were written instead.
    EventFallback { events: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum LogsError {
    /// No build logs were found and the event history could not be fetched.
    #[error("no build logs or events could be retrieved: {source}")]
    NothingRetrieved { source: ApiError },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode events: {0}")]
    Encode(#[from] serde_json::Error),
}

impl LogsError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LogsError::NothingRetrieved { .. } => 2,
            LogsError::Write { .. } | LogsError::Encode(_) => 1,
        }
    }
}

/// Request for [`fetch_build_logs`].
#[derive(Debug, Clone)]
pub struct LogsRequest {
    pub service: ServiceId,
    /// Build to fetch; discovered from the event history when absent.
    pub build_id: Option<BuildId>,
    pub out: PathBuf,
    pub event_limit: usize,
}

/// Write build logs for a service to `request.out`.
///
/// Log endpoints are tried in order and the first HTTP 200 wins. Failing
/// that, up to `event_limit` recent events are written as JSON.
pub async fn fetch_build_logs<A>(
    api: &A,
    request: &LogsRequest,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<LogsOutcome, LogsError>
where
    A: PlatformApi + ?Sized,
{
    let build_id = match &request.build_id {
        Some(id) => Some(id.clone()),
        None => discover_build(api, request, diag).await,
    };

    if let Some(build_id) = build_id {
        output.progress(&format!("  → Fetching logs for build {build_id}..."));
        for endpoint in LogEndpoint::candidates(&request.service, &build_id) {
            match api.build_logs(&endpoint).await {
                Ok(response) if response.status == 200 => {
                    write_file(&request.out, &response.body).await?;
                    return Ok(LogsOutcome::BuildLogs {
                        build_id,
                        endpoint,
                        bytes: response.body.len(),
                    });
                }
                Ok(response) => diag.warn(Warning::log_endpoint(format!(
                    "{endpoint} returned HTTP {}",
                    response.status
                ))),
                Err(e) => diag.warn(Warning::log_endpoint(format!("{endpoint}: {e}"))),
            }
        }
    }

    output.progress("  → No build logs available, saving recent events...");
    let mut events = api
        .events(&request.service, request.event_limit)
        .await
        .map_err(|source| LogsError::NothingRetrieved { source })?;
    events.truncate(request.event_limit);

    let json = serde_json::to_vec_pretty(&events)?;
    write_file(&request.out, &json).await?;

    Ok(LogsOutcome::EventFallback {
        events: events.len(),
    })
}

async fn discover_build<A>(
    api: &A,
    request: &LogsRequest,
    diag: &mut Diagnostics,
) -> Option<BuildId>
where
    A: PlatformApi + ?Sized,
{
    match api.events(&request.service, request.event_limit).await {
        Ok(events) => {
            let found = find_succeeded_build(&events);
            if found.is_none() {
                tracing::debug!(service = %request.service, "no successful build in recent events");
            }
            found
        }
        Err(e) => {
            diag.warn(Warning::event_history(format!(
                "could not read events for {}: {e}",
                request.service
            )));
            None
        }
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), LogsError> {
    let to_error = |source| LogsError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(to_error)?;
    }
    tokio::fs::write(path, contents).await.map_err(to_error)
}
