use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use anyhow::Result;
use mailgate::{templ_manager::TemplateManager, App, AppState, NewsletterClient};
use secrecy::SecretString;
use tokio::net::TcpListener;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_GROUP_ID: &str = "7654321";

/// Trying to bind port 0 will trigger an OS scan for an available port
/// which will then be bound to the application.
const TEST_SOCK_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 0);

pub struct TestApp {
    pub addr: SocketAddr,
    pub http_client: reqwest::Client,
    /// Mock of the MailerLite API; the app's newsletter client points here.
    pub newsletter_server: MockServer,
}

impl TestApp {
    /// Spawns the app with a configured API key, its newsletter client
    /// aimed at a fresh `MockServer`.
    pub async fn spawn() -> Result<TestApp> {
        Self::spawn_inner(None, Some(TEST_API_KEY)).await
    }

    /// Spawns the app without an API key, simulating a deployment that
    /// forgot to set the secret.
    pub async fn spawn_misconfigured() -> Result<TestApp> {
        Self::spawn_inner(None, None).await
    }

    /// Spawns the app with the newsletter client aimed at an address
    /// nothing listens on, so every outbound call is refused.
    pub async fn spawn_with_unreachable_newsletter() -> Result<TestApp> {
        // Bind a port to learn a free number, then drop the listener.
        let throwaway = TcpListener::bind(TEST_SOCK_ADDR).await?;
        let dead_addr = throwaway.local_addr()?;
        drop(throwaway);

        Self::spawn_inner(Some(format!("http://{dead_addr}")), Some(TEST_API_KEY)).await
    }

    async fn spawn_inner(newsletter_url: Option<String>, api_key: Option<&str>) -> Result<TestApp> {
        let newsletter_server = MockServer::start().await;
        let newsletter_url = newsletter_url.unwrap_or_else(|| newsletter_server.uri());

        let newsletter_client = NewsletterClient::new(
            newsletter_url,
            TEST_GROUP_ID.to_string(),
            api_key.map(SecretString::from),
            Duration::from_millis(200),
        )?;
        let templ_mgr = TemplateManager::init();
        let app_state = AppState::new(templ_mgr, newsletter_client);

        let listener = TcpListener::bind(TEST_SOCK_ADDR).await?;
        let addr = listener.local_addr()?;

        tokio::spawn(mailgate::serve(App::new(app_state, listener)));

        Ok(TestApp {
            addr,
            http_client: reqwest::Client::new(),
            newsletter_server,
        })
    }

    pub async fn post_mailer_lite(&self, json: &serde_json::Value) -> Result<reqwest::Response> {
        let res = self
            .http_client
            .post(format!("http://{}/mailer-lite", self.addr))
            .json(json)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn post_api_subscribe(&self, json: &serde_json::Value) -> Result<reqwest::Response> {
        let res = self
            .http_client
            .post(format!("http://{}/api/subscribe", self.addr))
            .json(json)
            .send()
            .await?;
        Ok(res)
    }
}
