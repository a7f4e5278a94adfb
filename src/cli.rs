// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands, their arguments, and environment fallbacks.

use clap::{Args, Parser, Subcommand};
use deploykit::api::DEFAULT_API_URL;
use deploykit::logs::DEFAULT_EVENT_LIMIT;
use deploykit::output::OutputMode;
use deploykit::smoke::DEFAULT_LICENSE_KEY;
use deploykit::types::{ImageRef, ServiceId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deploykit")]
#[command(about = "Deploy, watch, and smoke-test services on a hosted container platform")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only results (for CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

/// Platform API connection arguments shared by several commands.
#[derive(Args)]
pub struct ApiArgs {
    /// Platform service id
    #[arg(long, env = "DEPLOYKIT_SERVICE")]
    pub service: ServiceId,

    /// Platform API key
    #[arg(long, env = "DEPLOYKIT_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Platform API root URL
    #[arg(long, env = "DEPLOYKIT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wait for the latest deploy to go live (exit 0), fail (2), or time out (3)
    Wait {
        #[command(flatten)]
        api: ApiArgs,

        /// Maximum time to wait, in seconds
        #[arg(long, default_value_t = 600)]
        timeout: u64,

        /// Extra status treated as live (repeatable)
        #[arg(long = "live-status", value_name = "STATUS")]
        live_statuses: Vec<String>,

        /// Extra status treated as failed (repeatable)
        #[arg(long = "failed-status", value_name = "STATUS")]
        failed_statuses: Vec<String>,
    },

    /// Point the service at an image and trigger a deploy (patch rejected: 2, trigger rejected: 3)
    Deploy {
        #[command(flatten)]
        api: ApiArgs,

        /// Container image reference
        #[arg(long)]
        image: ImageRef,

        /// Command to run in the container
        #[arg(long = "docker-cmd")]
        docker_cmd: Option<String>,
    },

    /// Save build logs, or recent events when none exist (events unavailable: 2)
    Logs {
        #[command(flatten)]
        api: ApiArgs,

        /// Build id; defaults to the most recent successful build
        #[arg(long)]
        build_id: Option<String>,

        /// Output file
        #[arg(long)]
        out: PathBuf,

        /// Maximum number of events to save when no logs are available
        #[arg(long, default_value_t = DEFAULT_EVENT_LIMIT)]
        event_limit: usize,
    },

    /// Smoke-test a deployed service (health: 2 failed / 3 unreachable, license: 4 rejected / 5 unreachable)
    Smoke {
        /// Base URL of the deployed service
        #[arg(long, env = "DEPLOYKIT_BASE_URL")]
        base_url: String,

        /// License key to validate
        #[arg(
            long,
            env = "DEPLOYKIT_LICENSE_KEY",
            hide_env_values = true,
            default_value = DEFAULT_LICENSE_KEY
        )]
        license_key: String,
    },
}
