//! Gaffer REST client implementation.

use std::sync::Arc;
use std::time::Duration;

use gaffer_core::{GetAllElements, Groups, Limit, Operation, OperationChain, Payload};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::request::{GafferRequest, HttpMethod, RequestBody};
use super::response::GafferResponse;
use super::stream::LineStream;
use crate::config::{self, CertPaths, ClientConfig};
use crate::error::Result;
use crate::tls::{Certificate, Identity, TlsConfig, TlsVersion};

/// Path of the operation execution endpoint.
pub const EXECUTE_PATH: &str = "/rest/v2/graph/operations/execute";

/// Path of the chunked operation execution endpoint.
pub const EXECUTE_CHUNKED_PATH: &str = "/rest/v2/graph/operations/execute/chunked";

/// Builder for creating a Gaffer client with custom configuration.
pub struct GafferClientBuilder {
    url: Option<String>,
    config: ClientConfig,
    cert_paths: Option<CertPaths>,
}

impl Default for GafferClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GafferClientBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            url: None,
            config: ClientConfig::default(),
            cert_paths: None,
        }
    }

    /// Set the base URL of the Gaffer service.
    ///
    /// Without this, `GAFFER` is consulted, then the default URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the timeout for buffered requests.
    ///
    /// It covers the whole exchange, body included, for `execute`, `get` and
    /// `post`. Chunked execution is never capped.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Disable the buffered request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Disable cookie storage.
    pub fn no_cookies(mut self) -> Self {
        self.config.cookies_enabled = false;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Add a custom root certificate to trust.
    pub fn add_root_certificate(mut self, cert: Certificate) -> Self {
        self.config.tls.root_certificates.push(cert);
        self
    }

    /// Set the client identity for mutual TLS.
    pub fn identity(mut self, identity: Identity) -> Self {
        self.config.tls.identity = Some(identity);
        self
    }

    /// Set the minimum TLS version.
    pub fn min_tls_version(mut self, version: TlsVersion) -> Self {
        self.config.tls.min_version = version;
        self
    }

    /// Set the complete TLS configuration.
    ///
    /// This replaces any previously configured TLS settings.
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.config.tls = config;
        self
    }

    /// Accept invalid TLS certificates.
    ///
    /// # Warning
    ///
    /// This is insecure and should only be used for testing.
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.config.tls.danger_accept_invalid_certs = true;
        self
    }

    /// Load mutual TLS material from the given locations when building.
    ///
    /// ```ignore
    /// use gaffer_net::{CertPaths, GafferClient};
    ///
    /// let client = GafferClient::builder()
    ///     .url("https://gaffer.example:8443")
    ///     .use_cert(CertPaths::new().private_dir("/etc/gaffer"))
    ///     .build()?;
    /// ```
    pub fn use_cert(mut self, paths: CertPaths) -> Self {
        self.cert_paths = Some(paths);
        self
    }

    /// Build the client, reading fallbacks from the process environment.
    pub fn build(self) -> Result<GafferClient> {
        self.build_with_env(config::env_var)
    }

    /// Build the client, reading fallbacks through `env`.
    pub fn build_with_env<F>(mut self, env: F) -> Result<GafferClient>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.config.url = config::resolve_url(self.url.as_deref(), &env);
        url::Url::parse(&self.config.url)?;

        if let Some(paths) = self.cert_paths.take() {
            let files = paths.resolve_with(&env)?;
            self.config.tls = self.config.tls.with_cert_files(&files)?;
        }

        let http = build_http(&self.config)?;
        tracing::debug!(
            target: "gaffer_net::client",
            url = %self.config.url,
            mutual_tls = self.config.tls.identity.is_some(),
            "Created Gaffer client"
        );

        Ok(GafferClient {
            inner: Arc::new(ClientInner {
                http,
                config: self.config,
            }),
        })
    }
}

fn build_http(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();

    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if config.cookies_enabled {
        builder = builder.cookie_store(true);
    }

    if let Some(ref ua) = config.user_agent {
        builder = builder.user_agent(ua);
    }

    let tls = &config.tls;

    for cert in &tls.root_certificates {
        for reqwest_cert in cert.to_reqwest_certificates()? {
            builder = builder.add_root_certificate(reqwest_cert);
        }
    }

    if tls.use_only_custom_roots {
        builder = builder.tls_built_in_root_certs(false);
    }

    if let Some(ref identity) = tls.identity {
        builder = builder.identity(identity.to_reqwest_identity()?);
    }

    builder = builder.min_tls_version(tls.min_version.to_reqwest_version());

    if tls.danger_accept_invalid_certs {
        builder = builder.danger_accept_invalid_certs(true);
    }

    Ok(builder.build()?)
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
}

/// A client for a Gaffer graph service.
///
/// The client is cheaply cloneable. Clones share the same connection pool
/// and configuration.
///
/// ```ignore
/// use gaffer_core::{Groups, Operation};
/// use gaffer_net::GafferClient;
///
/// let client = GafferClient::with_url("https://localhost:8080")?;
/// let op = client.operation_chain([
///     Operation::from(client.get_all(["person"], Groups::Excluded)),
///     Operation::from(client.limit(10)),
/// ]);
/// let result = client.execute(op).await?;
/// ```
#[derive(Clone)]
pub struct GafferClient {
    inner: Arc<ClientInner>,
}

impl GafferClient {
    /// Create a client for the URL in `GAFFER`, or the default URL.
    pub fn new() -> Result<Self> {
        GafferClientBuilder::new().build()
    }

    /// Create a client for an explicit base URL.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        GafferClientBuilder::new().url(url).build()
    }

    /// Create a builder for configuring a new client.
    pub fn builder() -> GafferClientBuilder {
        GafferClientBuilder::new()
    }

    /// Get the resolved base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.config.url
    }

    /// Get the client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Join a path onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url(), path)
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }

    /// Switch to mutual TLS using the material at `paths`.
    ///
    /// All later requests from this client use the new context. Clones made
    /// before the call keep the old one.
    pub fn use_cert(&mut self, paths: &CertPaths) -> Result<()> {
        let files = paths.resolve()?;
        let mut config = self.inner.config.clone();
        config.tls = config.tls.with_cert_files(&files)?;

        let http = build_http(&config)?;
        self.inner = Arc::new(ClientInner { http, config });
        Ok(())
    }

    /// Build a [`GetAllElements`] over the given groups.
    pub fn get_all(
        &self,
        entities: impl Into<Groups>,
        edges: impl Into<Groups>,
    ) -> GetAllElements {
        GetAllElements::new().entities(entities).edges(edges)
    }

    /// Build a [`Limit`].
    pub fn limit(&self, limit: u64) -> Limit {
        Limit::new(limit)
    }

    /// Build an [`OperationChain`].
    pub fn operation_chain<I>(&self, operations: I) -> OperationChain
    where
        I: IntoIterator<Item = Operation>,
    {
        OperationChain::new(operations)
    }

    /// Execute an operation and return the decoded JSON result.
    pub async fn execute(&self, payload: impl Into<Payload>) -> Result<Value> {
        self.execute_as(payload).await
    }

    /// Execute an operation and decode the result into `T`.
    pub async fn execute_as<T: DeserializeOwned>(&self, payload: impl Into<Payload>) -> Result<T> {
        let body = payload.into().to_json();
        self.post_json(EXECUTE_PATH, body.into(), self.config().timeout)
            .await?
            .json()
            .await
    }

    /// Execute an operation on the chunked endpoint.
    ///
    /// Results are read lazily, one line per element, as the service
    /// produces them. The configured request timeout does not apply, so the
    /// stream stays open for as long as the service keeps it open.
    pub async fn execute_chunked(&self, payload: impl Into<Payload>) -> Result<LineStream> {
        let body = payload.into().to_json();
        Ok(self
            .post_json(EXECUTE_CHUNKED_PATH, body.into(), None)
            .await?
            .lines())
    }

    /// Send a GET request to a path under the base URL.
    pub async fn get(&self, path: &str) -> Result<GafferResponse> {
        let request = GafferRequest {
            method: HttpMethod::Get,
            url: self.url_for(path),
            headers: http::HeaderMap::new(),
            body: RequestBody::None,
        };
        self.send(request, self.config().timeout).await
    }

    /// Send a POST request to a path under the base URL.
    pub async fn post(&self, path: &str, body: impl Into<RequestBody>) -> Result<GafferResponse> {
        self.post_json(path, body.into(), self.config().timeout).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: RequestBody,
        timeout: Option<Duration>,
    ) -> Result<GafferResponse> {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        let request = GafferRequest {
            method: HttpMethod::Post,
            url: self.url_for(path),
            headers,
            body,
        };
        self.send(request, timeout).await
    }

    async fn send(
        &self,
        request: GafferRequest,
        timeout: Option<Duration>,
    ) -> Result<GafferResponse> {
        tracing::debug!(
            target: "gaffer_net::client",
            method = %request.method,
            url = %request.url,
            "Sending request"
        );

        let mut builder = self
            .inner
            .http
            .request(request.method.to_reqwest(), &request.url)
            .headers(request.headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let response = request.body.apply(builder).send().await?;

        GafferResponse::from_reqwest(response).ensure_ok().await
    }
}

impl std::fmt::Debug for GafferClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GafferClient")
            .field("url", &self.inner.config.url)
            .field("mutual_tls", &self.inner.config.tls.identity.is_some())
            .finish()
    }
}
