use think_through::config::Settings;
use think_through::observability::init_tracing;
use think_through::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_tracing(if settings.debug { "debug" } else { "info" });

    let app = Application::build(settings).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
