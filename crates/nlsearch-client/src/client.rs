//! Search backend client implementation.

use crate::error::{ClientError, Result};
use nlsearch_core::SearchBackendConfig;
use nlsearch_parser::StructuredQuery;
use reqwest::{header, Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Client for an OpenSearch-compatible REST backend.
#[derive(Clone)]
pub struct SearchClient {
    http: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<Secret<String>>,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Builder for creating a [`SearchClient`].
#[derive(Default)]
pub struct SearchClientBuilder {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
    accept_invalid_certs: bool,
}

impl SearchClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the cluster, e.g. `https://localhost:9200`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set basic-auth credentials.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable TLS certificate verification. Only for development clusters.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<SearchClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| "http://localhost:9200".to_string());
        let base_url = Url::parse(&base_url)?;

        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("nlsearch-client/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(ClientError::Http)?;

        Ok(SearchClient {
            http,
            base_url,
            username: self.username,
            password: self.password.map(Secret::new),
        })
    }
}

impl SearchClient {
    pub fn builder() -> SearchClientBuilder {
        SearchClientBuilder::new()
    }

    /// Create a client with default settings for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from backend configuration.
    pub fn from_config(config: &SearchBackendConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .base_url(config.base_url())
            .timeout(config.timeout())
            .accept_invalid_certs(!config.verify_certs);
        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.basic_auth(user, pass);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(ClientError::Url)
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let mut req = self.http.get(url);
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            req = req.basic_auth(user, Some(pass.expose_secret()));
        }
        req
    }

    fn post(&self, url: Url) -> reqwest::RequestBuilder {
        let mut req = self.http.post(url);
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            req = req.basic_auth(user, Some(pass.expose_secret()));
        }
        req
    }

    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(ClientError::Http)
        } else {
            let error_body = response.text().await.unwrap_or_default();

            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(ClientError::Auth(error_body))
                }
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(error_body)),
                _ if status.is_server_error() => Err(ClientError::Server(error_body)),
                _ => Err(ClientError::Api {
                    status: status.as_u16(),
                    message: error_body,
                }),
            }
        }
    }

    /// Check connectivity by fetching the cluster root document.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<Value> {
        let response = self.get(self.url("/")?).send().await?;
        self.handle_response(response).await
    }

    /// Fetch `_cluster/health`.
    #[instrument(skip(self))]
    pub async fn cluster_health(&self) -> Result<Value> {
        let response = self.get(self.url("_cluster/health")?).send().await?;
        self.handle_response(response).await
    }

    /// Fetch a cat API listing (`_cat/indices`, `_cat/nodes`, ...). The
    /// cat endpoints return tabular text unless asked for JSON.
    #[instrument(skip(self))]
    pub async fn cat(&self, path: &str) -> Result<Value> {
        let mut url = self.url(path)?;
        url.query_pairs_mut().append_pair("format", "json");
        let response = self.get(url).send().await?;
        self.handle_response(response).await
    }

    /// Run a search body against an index pattern.
    #[instrument(skip(self, body))]
    pub async fn search(&self, index: &str, body: &Value) -> Result<Value> {
        debug!(index, "executing search");
        let url = self.url(&format!("{index}/_search"))?;
        let response = self.post(url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Dispatch a parsed document: search bodies go to `{index}/_search`,
    /// API paths are fetched directly, and error documents are rejected
    /// without touching the network.
    #[instrument(skip(self, doc))]
    pub async fn execute(&self, doc: &StructuredQuery, index: &str) -> Result<Value> {
        match doc {
            StructuredQuery::Search(body) => {
                let body = serde_json::to_value(body)?;
                let result = self.search(index, &body).await?;
                info!(index, "search executed");
                Ok(result)
            }
            StructuredQuery::Api { api } if api.starts_with("_cat/") => self.cat(api).await,
            StructuredQuery::Api { api } => {
                let response = self.get(self.url(api)?).send().await?;
                self.handle_response(response).await
            }
            StructuredQuery::Error { error } => Err(ClientError::Rejected(error.clone())),
        }
    }
}
