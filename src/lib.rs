// ABOUTME: Library root for deploykit - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod api;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod logs;
pub mod output;
pub mod smoke;
pub mod types;
