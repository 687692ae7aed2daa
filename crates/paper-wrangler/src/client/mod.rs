//! HTTP client shared by the network-backed pipelines.
//!
//! One `reqwest::Client` per run, reused for connection pooling only:
//! - Crossref `works` lookups keyed by DOI
//! - Ollama chat completions for country inference
//! - Single conference page fetches
//!
//! There is no retry layer; callers decide whether a failure skips a record.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{ChatMessage, ChatOptions, ChatRequest, ChatResponse, Work, WorkResponse};

/// Browser-like agent for conference pages; some program sites reject tool agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Client for the metadata service, the model server and conference pages.
#[derive(Clone)]
pub struct WranglerClient {
    /// HTTP client.
    client: Client,

    /// Crossref base URL.
    crossref_api_url: String,

    /// Crossref polite-pool contact.
    mailto: Option<String>,

    /// Ollama base URL.
    ollama_url: String,

    /// Metadata request timeout.
    request_timeout: Duration,

    /// Page fetch timeout.
    page_timeout: Duration,

    /// Model call timeout.
    model_timeout: Duration,
}

impl WranglerClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(api::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            crossref_api_url: config.crossref_api_url.clone(),
            mailto: config.mailto.clone(),
            ollama_url: config.ollama_url.clone(),
            request_timeout: config.request_timeout,
            page_timeout: config.page_timeout,
            model_timeout: config.model_timeout,
        })
    }

    /// Check if a Crossref contact address is configured.
    #[must_use]
    pub fn has_mailto(&self) -> bool {
        self.mailto.is_some()
    }

    /// Fetch the Crossref record of a DOI.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or an
    /// unparseable body.
    pub async fn fetch_work(&self, doi: &str) -> ClientResult<Work> {
        let mut url = Url::parse(&format!("{}/works/{}", self.crossref_api_url, doi))?;
        if let Some(mailto) = &self.mailto {
            url.query_pairs_mut().append_pair("mailto", mailto);
        }

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, self.request_timeout))?;

        let body = Self::handle_response(response).await?.text().await?;
        let parsed: WorkResponse = serde_json::from_str(&body)?;
        Ok(parsed.message)
    }

    /// Send a single user prompt to the model server and return the reply text.
    ///
    /// Sampling temperature is pinned to zero.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or an
    /// unparseable body.
    pub async fn chat(&self, model: &str, prompt: &str) -> ClientResult<String> {
        let url = format!("{}/api/chat", self.ollama_url);
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
            options: ChatOptions { temperature: 0.0 },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(self.model_timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, self.model_timeout))?;

        let body = Self::handle_response(response).await?.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        Ok(parsed.message.content)
    }

    /// Fetch a page and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or non-success status.
    pub async fn fetch_page(&self, url: &str) -> ClientResult<String> {
        let url = Url::parse(url)?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .timeout(self.page_timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, self.page_timeout))?;

        Ok(Self::handle_response(response).await?.text().await?)
    }

    /// Handle response status codes.
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        match status.as_u16() {
            404 => Err(ClientError::not_found(url)),
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

impl std::fmt::Debug for WranglerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WranglerClient")
            .field("crossref_api_url", &self.crossref_api_url)
            .field("ollama_url", &self.ollama_url)
            .field("has_mailto", &self.has_mailto())
            .finish()
    }
}
