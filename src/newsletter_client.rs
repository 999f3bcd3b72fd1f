use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::json;

use crate::web::data::ValidSubscription;

/// Response of one forwarding attempt that actually reached the newsletter API.
/// Transport-level failures are reported through `Error` instead.
#[derive(Debug)]
pub enum SubscribeOutcome {
    /// The API accepted the subscriber; its response body carries no
    /// information the caller needs, so it is discarded.
    Accepted,
    /// The API rejected the request; status and body are relayed verbatim.
    Rejected {
        status: StatusCode,
        body: serde_json::Value,
    },
}

#[derive(Debug)]
pub struct NewsletterClient {
    pub http_client: Client,
    pub url: reqwest::Url,
    group_id: String,
    api_key: Option<SecretString>,
}

impl NewsletterClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        group_id: String,
        api_key: Option<SecretString>,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(NewsletterClient {
            http_client,
            url,
            group_id,
            api_key,
        })
    }

    /// Group every subscriber lands in on the route that doesn't let
    /// the caller pick one.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Fails with `Error::ApiKeyMissing` when no API key was configured.
    /// Checked by handlers before the request body is even looked at.
    pub fn ensure_configured(&self) -> Result<&SecretString> {
        self.api_key.as_ref().ok_or(Error::ApiKeyMissing)
    }

    pub async fn subscribe(&self, subscription: &ValidSubscription) -> Result<SubscribeOutcome> {
        let api_key = self.ensure_configured()?;
        let url = self
            .url
            .join("api/subscribers")
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let content = SubscriberContent {
            email: subscription.email.as_ref(),
            groups: [subscription.group.as_ref()],
        };

        let resp = self
            .http_client
            .post(url)
            .bearer_auth(api_key.expose_secret())
            .json(&content)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(SubscribeOutcome::Accepted);
        }

        // A malformed downstream body must never fail the handler.
        let body = resp
            .json::<serde_json::Value>()
            .await
            .unwrap_or_else(|_| json!({}));

        Ok(SubscribeOutcome::Rejected { status, body })
    }
}

#[derive(Serialize)]
pub struct SubscriberContent<'a> {
    pub email: &'a str,
    pub groups: [&'a str; 1],
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("newsletter API key is not configured")]
    ApiKeyMissing,
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("transport error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
