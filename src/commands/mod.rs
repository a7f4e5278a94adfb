// ABOUTME: Command module aggregator for the deploykit CLI.
// ABOUTME: Dispatches parsed subcommands and builds the platform client they share.

mod deploy;
mod logs;
mod smoke;
mod wait;

use crate::cli::{ApiArgs, Commands};
use deploykit::api::{ClientConfig, HttpPlatform};
use deploykit::diagnostics::Diagnostics;
use deploykit::error::Result;
use deploykit::output::Output;

/// Run a subcommand, returning the process exit code.
pub async fn run(command: Commands, output: &mut Output) -> Result<i32> {
    output.start_timer();

    match command {
        Commands::Wait {
            api,
            timeout,
            live_statuses,
            failed_statuses,
        } => wait::wait(&api, timeout, live_statuses, failed_statuses, output).await,
        Commands::Deploy {
            api,
            image,
            docker_cmd,
        } => deploy::deploy(&api, &image, docker_cmd.as_deref(), output).await,
        Commands::Logs {
            api,
            build_id,
            out,
            event_limit,
        } => logs::logs(&api, build_id, out, event_limit, output).await,
        Commands::Smoke {
            base_url,
            license_key,
        } => smoke::smoke(&base_url, &license_key, output).await,
    }
}

/// Platform client for the given connection arguments.
fn platform(api: &ApiArgs) -> Result<HttpPlatform> {
    let config = ClientConfig::new(api.api_key.clone()).base_url(api.api_url.clone());
    Ok(HttpPlatform::new(config)?)
}

/// Show collected best-effort warnings.
fn emit_warnings(diag: &Diagnostics, output: &Output) {
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
}
