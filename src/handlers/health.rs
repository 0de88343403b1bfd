/// Fixed greeting for the service root.
pub async fn index() -> &'static str {
    "Hello from think_through!"
}

/// Liveness probe. Touches nothing external so it never false-negatives.
pub async fn healthz() -> &'static str {
    "OK"
}
