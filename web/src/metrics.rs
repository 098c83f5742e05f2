//! Prometheus metrics export.
//!
//! Counters are recorded with the `metrics` facade throughout `sps-auth`.
//! This module installs the global Prometheus recorder and describes them.

use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Metrics installation failure.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// A global recorder is already installed.
    #[error("Failed to install Prometheus recorder: {0}")]
    Install(String),
}

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a recorder is already installed in
/// this process.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe_metrics();

    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Register descriptions for every counter the service records.
pub fn describe_metrics() {
    describe_counter!(
        "auth_challenges_issued_total",
        "Challenges issued to known principals"
    );
    describe_counter!(
        "auth_challenges_rejected_total",
        "Challenge requests for unknown principals"
    );
    describe_counter!(
        "auth_logins_total",
        "Successful logins, labelled by mode (challenge or password)"
    );
    describe_counter!(
        "auth_logins_failed_total",
        "Failed logins, labelled by mode (challenge or password)"
    );
    describe_counter!(
        "auth_rate_limited_total",
        "Requests rejected by the authentication rate limit"
    );
    describe_counter!("accounts_created_total", "Accounts created");
    describe_counter!("accounts_updated_total", "Accounts updated");
    describe_counter!("accounts_deleted_total", "Accounts deleted");
}
