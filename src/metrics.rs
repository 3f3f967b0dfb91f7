//! Prometheus metrics.
//!
//! HTTP traffic is recorded by [`metrics_middleware`]; business events by the
//! `track_*` helpers. Everything is a no-op when `OBSERVABILITY_ENABLED` is
//! `false` or `0`. The exporter is served by [`metrics_app`] on its own port.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the global Prometheus recorder and its upkeep task.
///
/// Returns `Ok(None)` when observability is disabled.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    // Unmatched paths are collapsed so scanners cannot blow up label cardinality.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics

pub fn track_verification_code_sent() {
    if !is_observability_enabled() {
        return;
    }
    counter!("verification_codes_sent_total").increment(1);
}

pub fn track_account_created(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("accounts_created_total", "role" => role.to_string()).increment(1);
}

pub fn track_sign_in_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sign_ins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_sign_in_failure(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sign_ins_total", "role" => role.to_string(), "status" => "failure").increment(1);
}

pub fn track_jwt_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("jwt_tokens_issued_total").increment(1);
}

pub fn track_application_status(status: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("application_status_changes_total", "status" => status.to_string()).increment(1);
}

pub fn track_coins(operation: &'static str, amount: i64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("coins_moved_total", "operation" => operation).increment(amount.unsigned_abs());
}

pub fn track_notification_created(kind: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("notifications_created_total", "type" => kind.to_string()).increment(1);
}
