use crate::error::AppError;
use crate::models::{notification::missing_fields, NotificationRequest};
use crate::services::notify;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
};
use serde_json::Value;

/// Validate a notification payload and dispatch one templated email to the
/// configured recipient list. The route accepts any method so validation
/// owns the response for non-POST requests.
pub async fn send_notification(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    if method != Method::POST {
        return Err(AppError::BadRequest(anyhow::anyhow!("POST required")));
    }

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid JSON")))?;

    let missing = missing_fields(&payload);
    if !missing.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Missing fields: {}",
            missing.join(", ")
        )));
    }

    if state.settings.notification_recipients.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "No recipients configured"
        )));
    }

    // The field scan guarantees this succeeds.
    let request: NotificationRequest = serde_json::from_value(payload)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid JSON")))?;

    let email = notify::build_notification_email(&request, &state.settings)?;
    state
        .mailer
        .send(&email)
        .await
        .map_err(|e| AppError::EmailError(e.to_string()))?;

    tracing::info!(
        subject = %email.subject,
        recipients = email.to.len(),
        "Notification email dispatched"
    );

    Ok(StatusCode::ACCEPTED)
}
