// ABOUTME: Smoke command implementation.
// ABOUTME: Runs health and license checks against a deployed service.

use deploykit::error::Result;
use deploykit::output::Output;
use deploykit::smoke::run_smoke;

pub async fn smoke(base_url: &str, license_key: &str, output: &Output) -> Result<i32> {
    output.progress(&format!("Smoke testing {base_url}"));

    let report = run_smoke(base_url, license_key, output).await?;

    output.progress(&format!(
        "  → health HTTP {}, license HTTP {}",
        report.health_status, report.license_status
    ));
    output.success("Smoke tests passed");
    Ok(0)
}
