//! HTTP client for the Notion API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, instrument};

use super::{ApiErrorBody, Page, QueryResponse, TableClient, CHECKBOX_PROPERTY};
use crate::config::Config;
use crate::error::{Error, Result};

const VERSION_HEADER: &str = "notion-version";

/// Talks to the Notion REST API over HTTPS.
///
/// The token is optional at construction time; calls made without one fail
/// with [`Error::MissingToken`] before anything is sent.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
    api_version: String,
    token: Option<String>,
}

impl NotionClient {
    /// Create a client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_version: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Create a client from the `[notion]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.notion.api_base_url.clone(),
            config.notion.api_version.clone(),
            config.notion.token.clone(),
            config.request_timeout(),
        )
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> Result<HeaderMap> {
        let token = self.token.as_deref().ok_or(Error::MissingToken)?;
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::ConfigValidation {
                message: "token contains characters not allowed in a header".to_string(),
            })?;
        headers.insert(AUTHORIZATION, bearer);
        let version =
            HeaderValue::from_str(&self.api_version).map_err(|_| Error::ConfigValidation {
                message: format!("invalid api_version: {}", self.api_version),
            })?;
        headers.insert(VERSION_HEADER, version);
        Ok(headers)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.headers(self.headers()?).send().await?;
        check_status(response).await
    }
}

/// Turn a non-success response into [`Error::RemoteStatus`].
///
/// The API's JSON error message is preferred over the raw body.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    Err(Error::remote_status(status.as_u16(), message))
}

#[async_trait::async_trait]
impl TableClient for NotionClient {
    #[instrument(skip(self))]
    async fn query_database(&self, database_id: &str) -> Result<Vec<Page>> {
        let url = format!("{}/v1/databases/{database_id}/query", self.base_url);
        let request = self.http.post(url).json(&serde_json::json!({}));
        let response: QueryResponse = self.send(request).await?.json().await?;
        debug!(rows = response.results.len(), "database query returned");
        Ok(response.results)
    }

    #[instrument(skip(self))]
    async fn update_checkbox(&self, page_id: &str, checked: bool) -> Result<()> {
        let url = format!("{}/v1/pages/{page_id}", self.base_url);
        let body = serde_json::json!({
            "properties": {
                CHECKBOX_PROPERTY: { "checkbox": checked }
            }
        });
        self.send(self.http.patch(url).json(&body)).await?;
        debug!("checkbox updated");
        Ok(())
    }
}
