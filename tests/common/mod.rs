#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use codebattle_api::config::AppConfig;
use codebattle_api::database::MemoryStore;
use codebattle_api::{app, AppState};
use uuid::Uuid;

/// A server running the real router over an in-memory store
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
    pub client: reqwest::Client,
}

/// A user who can obtain a bearer token
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn user(&self, name: &str) -> Result<TestUser> {
        let id = Uuid::new_v4();
        let token = codebattle_api::auth::issue_token(id, name, &self.config.security)
            .context("failed to issue token")?;
        Ok(TestUser { id, token })
    }

    /// Create a programmer as `user`, asserting success
    pub async fn create_programmer(&self, user: &TestUser, body: serde_json::Value) -> Result<serde_json::Value> {
        let res = self
            .client
            .post(self.url("/programmers"))
            .bearer_auth(&user.token)
            .json(&body)
            .send()
            .await?;
        anyhow::ensure!(res.status() == reqwest::StatusCode::CREATED, "create failed: {}", res.status());
        Ok(res.json().await?)
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    let store = Arc::new(MemoryStore::new());
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    config.security.jwt_secret = format!("test-secret-{}", Uuid::new_v4());

    let state = AppState::new(store.clone(), config.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.ok();
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        store,
        config,
        client: reqwest::Client::new(),
    })
}
