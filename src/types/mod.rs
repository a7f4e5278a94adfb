// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod image_ref;
mod status;

pub use id::{BuildId, DeployId, Id, ServiceId};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use status::{
    DEFAULT_FAILED_STATUSES, DEFAULT_LIVE_STATUSES, DeployStatus, StatusClass, StatusClassifier,
};
