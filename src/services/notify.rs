use crate::config::Settings;
use crate::error::AppError;
use crate::models::NotificationRequest;
use crate::services::mailer::EmailMessage;
use askama::Template;

const SUBJECT_PREFIX: &str = "Think Through: ";
const SUBJECT_TITLE_CHARS: usize = 78;

#[derive(Template)]
#[template(path = "email/notification.txt")]
struct NotificationText<'a> {
    title: &'a str,
    summary: &'a str,
    author_name: &'a str,
    created_at: &'a str,
    url: &'a str,
}

#[derive(Template)]
#[template(path = "email/notification.html")]
struct NotificationHtml<'a> {
    title: &'a str,
    summary: &'a str,
    author_name: &'a str,
    created_at: &'a str,
    url: &'a str,
}

/// Assemble the outbound email for an accepted notification request.
/// The text body is required; the HTML alternative is best-effort and
/// omitted if its render fails.
pub fn build_notification_email(
    request: &NotificationRequest,
    settings: &Settings,
) -> Result<EmailMessage, AppError> {
    let text_body = NotificationText {
        title: &request.title,
        summary: &request.summary,
        author_name: &request.author_name,
        created_at: &request.created_at,
        url: &request.url,
    }
    .render()
    .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to render email body: {}", e)))?;

    let html_body = match (NotificationHtml {
        title: &request.title,
        summary: &request.summary,
        author_name: &request.author_name,
        created_at: &request.created_at,
        url: &request.url,
    })
    .render()
    {
        Ok(html) => Some(html),
        Err(e) => {
            tracing::warn!(error = %e, "HTML body render failed, sending text-only");
            None
        }
    };

    Ok(EmailMessage {
        subject: subject_for(&request.title),
        text_body,
        html_body,
        from: settings.default_from.clone(),
        to: settings.notification_recipients.clone(),
    })
}

/// Subject line: fixed prefix plus the first 78 characters of the title.
pub fn subject_for(title: &str) -> String {
    let truncated: String = title.chars().take(SUBJECT_TITLE_CHARS).collect();
    format!("{}{}", SUBJECT_PREFIX, truncated)
}
