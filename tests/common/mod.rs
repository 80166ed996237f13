#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use cms_api_rust::api;
use cms_api_rust::auth::{issue_token, Identity, Role};
use cms_api_rust::config::AppConfig;
use cms_api_rust::state::AppState;
use cms_api_rust::store::{seed, MemoryStore};

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-process server on its own port with a private memory store
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(MemoryStore::new()).await
    }

    /// Same as `start`, with the demo data set loaded
    pub async fn start_seeded() -> Result<Self> {
        let store = MemoryStore::new();
        seed::load_demo_content(&store).await.context("failed to seed store")?;
        Self::start_with(store).await
    }

    async fn start_with(store: MemoryStore) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.port = port;
        config.security.jwt_secret = TEST_SECRET.to_string();

        let app = api::app(AppState::new(config, Arc::new(store)));
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self { base_url, client: reqwest::Client::new() };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token(&self, role: Role) -> String {
        let identity = Identity {
            id: 1,
            email: format!("{}@example.com", role),
            name: Some(format!("Test {}", role)),
            role,
            image: None,
        };
        issue_token(&identity, TEST_SECRET, 1).expect("token")
    }

    pub async fn get(&self, path: &str, role: Option<Role>) -> Result<(StatusCode, Value)> {
        let mut request = self.client.get(self.url(path));
        if let Some(role) = role {
            request = request.bearer_auth(self.token(role));
        }
        Self::read(request.send().await?).await
    }

    pub async fn send(&self, method: reqwest::Method, path: &str, role: Role, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, self.url(path)).bearer_auth(self.token(role));
        if let Some(body) = body {
            request = request.json(&body);
        }
        Self::read(request.send().await?).await
    }

    async fn read(resp: reqwest::Response) -> Result<(StatusCode, Value)> {
        let status = resp.status();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }
}
