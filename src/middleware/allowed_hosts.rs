use crate::error::AppError;
use crate::startup::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Enforce the configured host allowlist. Bypassed when debug is on or the
/// list contains `*`. A leading-dot entry admits the bare domain and any
/// subdomain; everything else matches exactly, port stripped.
pub async fn require_allowed_host(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let settings = &state.settings;
    if settings.debug || settings.allowed_hosts.iter().any(|h| h == "*") {
        return next.run(req).await;
    }

    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(|value| strip_port(value).to_ascii_lowercase());

    match host {
        Some(host) if host_allowed(&host, &settings.allowed_hosts) => next.run(req).await,
        _ => AppError::BadRequest(anyhow::anyhow!("Invalid Host header")).into_response(),
    }
}

/// Drop a trailing `:port`, leaving IPv6 bracket literals intact.
fn strip_port(value: &str) -> &str {
    match value.rfind(':') {
        Some(idx) if !value[idx..].contains(']') => &value[..idx],
        _ => value,
    }
}

fn host_allowed(host: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|pattern| {
        if let Some(domain) = pattern.strip_prefix('.') {
            host == domain || host.ends_with(pattern.as_str())
        } else {
            host == pattern
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strips_ports_but_not_ipv6_brackets() {
        assert_eq!(strip_port("example.com:8080"), "example.com");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("[::1]"), "[::1]");
    }

    #[test]
    fn exact_entries_match_exactly() {
        let hosts = allowed(&["example.com"]);
        assert!(host_allowed("example.com", &hosts));
        assert!(!host_allowed("evil.com", &hosts));
        assert!(!host_allowed("sub.example.com", &hosts));
    }

    #[test]
    fn leading_dot_admits_subdomains_and_bare_domain() {
        let hosts = allowed(&[".example.com"]);
        assert!(host_allowed("example.com", &hosts));
        assert!(host_allowed("api.example.com", &hosts));
        assert!(host_allowed("deep.api.example.com", &hosts));
        assert!(!host_allowed("notexample.com", &hosts));
    }
}
