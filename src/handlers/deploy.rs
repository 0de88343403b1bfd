use crate::services::revision;
use crate::startup::AppState;
use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployInfo {
    pub timestamp: String,
    pub host: String,
    pub git_sha_full: Option<String>,
    pub git_sha_short: Option<String>,
}

/// Deploy-verification probe: current UTC time, hostname, and the deployed
/// git revision when it can be determined. Resolver misses only null the
/// revision fields; this handler itself never fails.
pub async fn deploy_test(State(state): State<AppState>) -> Json<DeployInfo> {
    let revision = revision::resolve(&state.settings.deploy_root).await;

    Json(DeployInfo {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        host: hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string()),
        git_sha_full: revision.full,
        git_sha_short: revision.short,
    })
}
