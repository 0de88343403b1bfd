use secrecy::Secret;
use think_through::config::{DatabaseSettings, EmailBackend, EmailSettings, Settings};
use think_through::services::mailer::{EmailMessage, Outbox};
use think_through::startup::Application;

pub struct TestApp {
    pub address: String,
    pub outbox: Option<Outbox>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_settings()).await
    }

    pub async fn spawn_with(settings: Settings) -> Self {
        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let outbox = app.outbox();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections.
        let client = reqwest::Client::new();
        let health_url = format!("{}/healthz", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        TestApp { address, outbox }
    }

    /// Messages captured by the memory mail backend.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox
            .as_ref()
            .expect("memory mail backend not active")
            .lock()
            .unwrap()
            .clone()
    }
}

pub fn test_settings() -> Settings {
    let deploy_root = std::env::temp_dir();
    Settings {
        secret_key: Secret::new("test-secret".to_string()),
        debug: false,
        allowed_hosts: vec!["*".to_string()],
        database: DatabaseSettings::sqlite_default(&deploy_root),
        email: EmailSettings {
            backend: EmailBackend::Memory,
            host: "smtp.test.local".to_string(),
            port: 587,
            user: "test".to_string(),
            password: Secret::new("test".to_string()),
            use_tls: false,
        },
        default_from: "think-through@example.com".to_string(),
        notification_recipients: vec!["ananab.tilps@gmail.com".to_string()],
        port: 0,
        deploy_root,
    }
}
