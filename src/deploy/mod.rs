// ABOUTME: Deploy lifecycle: trigger a new deploy and wait for its outcome.
// ABOUTME: Re-exports the poller, trigger, and their error types.

mod error;
mod poller;
mod trigger;

pub use error::DeployError;
pub use poller::{
    CORRELATION_EVENT_LIMIT, FAILURE_EVENT_LIMIT, Outcome, POLL_INTERVAL, WaitOptions, WaitReport,
    wait_for_deploy,
};
pub use trigger::{PATCH_ACCEPTED, TRIGGER_ACCEPTED, update_and_deploy};
