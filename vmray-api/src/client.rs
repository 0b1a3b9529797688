//! HTTP client for the VMRay REST API.
//!
//! Handles basic authentication, the credential form fields the service
//! expects on every call, request/response dumping to the trace and error
//! logs, and status checking. There is no retry: every call is a single
//! request/response exchange.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::{Certificate, Client, Request, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{error, trace};

use vmray_core::config::ClientConfig;
use vmray_core::constants::{self, ERROR_TARGET, TRACE_TARGET};
use vmray_core::error::{VmrayError, VmrayResult};

use crate::params::Parameters;
use crate::upload;

/// How parameters travel for a generic API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    /// Parameters are sent as the query string.
    Get,
    /// Parameters are sent as multipart form fields.
    Post,
}

/// Client for the VMRay service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    /// Base URL, always ending in `/`.
    url: String,
    username: String,
    password: String,
    error_log: bool,
    trace_log: bool,
}

impl ApiClient {
    /// Start configuring a new client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Build a client from a [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> VmrayResult<Self> {
        let mut builder = Self::builder()
            .url(config.effective_url())
            .basic_auth(&config.email, &config.password)
            .error_log(config.error_log)
            .trace_log(config.trace_log);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// The base URL requests are built from.
    pub fn base_url(&self) -> &str {
        &self.url
    }

    /// The configured basic-auth username.
    pub fn username(&self) -> &str {
        &self.username
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}{action}", self.url)
    }

    /// Parameters for an API call: `extra` plus the `email`, `password` and
    /// `type` fields the service requires on every request.
    pub(crate) fn api_params(&self, extra: Parameters) -> Parameters {
        let mut params = Parameters::new()
            .with("email", self.username.as_str())
            .with("password", self.password.as_str())
            .with("type", constants::API_TYPE);
        params.extend(extra);
        params
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.username.is_empty() {
            return builder;
        }
        builder.header(
            AUTHORIZATION,
            format!("Basic {}", basic_auth(&self.username, &self.password)),
        )
    }

    pub(crate) fn log_trace(&self, message: &str) {
        if self.trace_log {
            trace!(target: TRACE_TARGET, "{message}");
        }
    }

    fn log_error(&self, message: &str) {
        if self.error_log {
            error!(target: ERROR_TARGET, "{message}");
        }
    }

    /// Authenticate, dump, send and status-check a prepared request.
    ///
    /// `params` is only used for the trace dump; it must already be encoded
    /// into the builder.
    async fn execute(&self, builder: RequestBuilder, params: &Parameters) -> VmrayResult<Response> {
        let request = self.authorize(builder).build().map_err(classify_error)?;
        if self.trace_log {
            trace!(target: TRACE_TARGET, "{}", format_request(&request, params));
        }

        let response = self.inner.execute(request).await.map_err(classify_error)?;
        self.check_status(response).await
    }

    /// Anything but 200 is an error. The full response goes to the trace log
    /// and the error log, whichever are enabled.
    async fn check_status(&self, response: Response) -> VmrayResult<Response> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }

        if self.trace_log || self.error_log {
            let head = format_response_head(&response);
            let body = match response.bytes().await {
                Ok(body) => format_body(&body),
                Err(e) => format!("<failed to read body: {e}>"),
            };
            let dump = format!("{head}\n\n{body}");
            if self.trace_log {
                trace!(target: TRACE_TARGET, "{dump}");
            }
            if self.error_log {
                error!(target: ERROR_TARGET, "{dump}");
            }
        }

        let err = VmrayError::Client {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        };
        self.log_error(&err.to_string());
        Err(err)
    }

    async fn read_body(&self, response: Response) -> VmrayResult<Vec<u8>> {
        let head = self.trace_log.then(|| format_response_head(&response));
        let body = response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(classify_error)?;
        if let Some(head) = head {
            trace!(target: TRACE_TARGET, "{head}\n\n{}", format_body(&body));
        }
        Ok(body)
    }

    async fn fetch(
        &self,
        method: RequestMethod,
        action: &str,
        params: Parameters,
    ) -> VmrayResult<Vec<u8>> {
        let params = self.api_params(params);
        let url = self.action_url(action);
        let builder = match method {
            RequestMethod::Get => self.inner.get(&url).query(params.as_map()),
            RequestMethod::Post => self.inner.post(&url).multipart(params.to_form()),
        };
        let response = self.execute(builder, &params).await?;
        self.read_body(response).await
    }

    /// Call `action` and decode the JSON response into `T`.
    ///
    /// Credentials and `type=api` are added to `params`. Use this for API
    /// actions without a typed wrapper.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: RequestMethod,
        action: &str,
        params: Parameters,
    ) -> VmrayResult<T> {
        let body = self.fetch(method, action, params).await?;
        decode(&body)
    }

    /// POST `action` and return the raw response body.
    pub async fn fetch_bytes(&self, action: &str, params: Parameters) -> VmrayResult<Vec<u8>> {
        self.fetch(RequestMethod::Post, action, params).await
    }

    /// Stream the file at `path` to `action` and decode the JSON response.
    pub(crate) async fn upload_json<T: DeserializeOwned>(
        &self,
        action: &str,
        path: &Path,
        params: Parameters,
    ) -> VmrayResult<T> {
        let params = self.api_params(params);
        self.log_trace(&format!("opening file '{}'", path.display()));
        let (form, producer) = upload::sample_form(path, &params).await?;

        let builder = self.inner.post(self.action_url(action)).multipart(form);
        let sent = self.execute(builder, &params).await;
        let produced = producer.finish().await;

        // Transport errors first, then producer errors, then status errors.
        let response = match (sent, produced) {
            (Err(e), _) if e.is_transport() => return Err(e),
            (_, Err(e)) => {
                self.log_error(&e.to_string());
                return Err(e);
            }
            (sent, Ok(streamed)) => {
                self.log_trace(&format!("streamed {streamed} bytes from '{}'", path.display()));
                sent?
            }
        };

        let body = self.read_body(response).await?;
        decode(&body)
    }
}

/// Configures and builds an [`ApiClient`].
#[derive(Default)]
pub struct ApiClientBuilder {
    url: Option<String>,
    username: String,
    password: String,
    http_client: Option<Client>,
    root_ca_pem: Option<Vec<u8>>,
    timeout: Option<Duration>,
    error_log: bool,
    trace_log: bool,
}

impl ApiClientBuilder {
    /// API endpoint. Empty selects [`constants::DEFAULT_URL`]; only http and
    /// https are accepted. A URL without a scheme, such as
    /// `vmray.example.com/api`, fails with [`VmrayError::InvalidScheme`].
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Credentials for basic auth and the `email`/`password` fields.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Use a caller-supplied HTTP client instead of the embedded-CA default.
    /// `root_certificate_pem` and `timeout` are ignored when this is set.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Trust this PEM root certificate instead of the embedded GlobalSign CA.
    pub fn root_certificate_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.root_ca_pem = Some(pem.into());
        self
    }

    /// Request timeout for the default HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Dump failed responses to the `vmray::error` target.
    pub fn error_log(mut self, enabled: bool) -> Self {
        self.error_log = enabled;
        self
    }

    /// Dump every request and response to the `vmray::trace` target.
    ///
    /// Dumps are verbatim and include the Authorization header and the
    /// password field.
    pub fn trace_log(mut self, enabled: bool) -> Self {
        self.trace_log = enabled;
        self
    }

    pub fn build(self) -> VmrayResult<ApiClient> {
        let url = match self.url.as_deref() {
            Some(raw) => validate_url(raw).inspect_err(|e| {
                if self.error_log {
                    error!(target: ERROR_TARGET, "{e}");
                }
            })?,
            None => constants::DEFAULT_URL.to_string(),
        };

        let inner = match self.http_client {
            Some(client) => client,
            None => default_http_client(self.root_ca_pem.as_deref(), self.timeout)?,
        };

        let client = ApiClient {
            inner,
            url: with_trailing_slash(url),
            username: self.username,
            password: self.password,
            error_log: self.error_log,
            trace_log: self.trace_log,
        };
        client.log_trace(&format!("Using URL [{}]", client.url));
        Ok(client)
    }
}

/// HTTP client trusting only the given root CA (the embedded one by default).
fn default_http_client(root_ca_pem: Option<&[u8]>, timeout: Option<Duration>) -> VmrayResult<Client> {
    let pem = root_ca_pem.unwrap_or(constants::GLOBALSIGN_ROOT_CA.as_bytes());
    if !String::from_utf8_lossy(pem).contains("-----BEGIN CERTIFICATE-----") {
        return Err(VmrayError::Certificate("no PEM certificate found".into()));
    }
    let cert = Certificate::from_pem(pem).map_err(|e| VmrayError::Certificate(e.to_string()))?;

    let mut builder = Client::builder()
        .tls_built_in_root_certs(false)
        .add_root_certificate(cert);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    // The PEM is only decoded here, so a build failure means a bad certificate.
    builder
        .build()
        .map_err(|e| VmrayError::Certificate(format!("failed to load root certificate: {e}")))
}

fn validate_url(raw: &str) -> VmrayResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(constants::DEFAULT_URL.to_string());
    }

    let parsed = match reqwest::Url::parse(raw) {
        Ok(parsed) => parsed,
        // No `scheme:` prefix at all.
        Err(_) if !raw.contains(':') => return Err(VmrayError::InvalidScheme(raw.to_string())),
        Err(e) => {
            return Err(VmrayError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })
        }
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(VmrayError::InvalidScheme(raw.to_string()));
    }
    Ok(raw.to_string())
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Base64 of `username:password`, as used in the Authorization header.
pub fn basic_auth(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{username}:{password}"))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> VmrayResult<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Classify a reqwest error into a VmrayError variant.
fn classify_error(e: reqwest::Error) -> VmrayError {
    if e.is_timeout() {
        VmrayError::Timeout(e.to_string())
    } else if e.is_builder() {
        VmrayError::Config(format!("invalid request: {e}"))
    } else {
        VmrayError::Transport(e.to_string())
    }
}

fn format_request(request: &Request, params: &Parameters) -> String {
    let mut out = format!("{} {}", request.method(), request.url());
    for (name, value) in request.headers() {
        let _ = write!(out, "\n{name}: {}", value.to_str().unwrap_or("<binary>"));
    }

    let mut fields: Vec<_> = params.iter().collect();
    fields.sort_unstable();
    if !fields.is_empty() {
        out.push('\n');
    }
    for (key, value) in fields {
        let _ = write!(out, "\n{key}={value}");
    }
    out
}

fn format_response_head(response: &Response) -> String {
    let mut out = format!("{:?} {}", response.version(), response.status());
    for (name, value) in response.headers() {
        let _ = write!(out, "\n{name}: {}", value.to_str().unwrap_or("<binary>"));
    }
    out
}

fn format_body(body: &[u8]) -> String {
    match std::str::from_utf8(body) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<{} bytes of binary data>", body.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        ApiClient::builder()
            .url("http://localhost:8080/api")
            .basic_auth("user", "pass")
            .http_client(Client::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_basic_auth_encoding() {
        assert_eq!(basic_auth("user", "pass"), "dXNlcjpwYXNz");
        assert_eq!(basic_auth("", ""), "Og==");
    }

    #[test]
    fn test_default_url() {
        let client = ApiClient::builder().http_client(Client::new()).build().unwrap();
        assert_eq!(client.base_url(), constants::DEFAULT_URL);

        let client = ApiClient::builder()
            .url("")
            .http_client(Client::new())
            .build()
            .unwrap();
        assert_eq!(client.base_url(), constants::DEFAULT_URL);
    }

    #[test]
    fn test_trailing_slash_appended_once() {
        for (raw, expected) in [
            ("http://localhost:8080/api", "http://localhost:8080/api/"),
            ("http://localhost:8080/api/", "http://localhost:8080/api/"),
            ("https://vmray.example.com", "https://vmray.example.com/"),
            ("https://vmray.example.com/rest/v2", "https://vmray.example.com/rest/v2/"),
        ] {
            let client = ApiClient::builder()
                .url(raw)
                .http_client(Client::new())
                .build()
                .unwrap();
            assert_eq!(client.base_url(), expected);
            assert_eq!(client.action_url("find_sample"), format!("{expected}find_sample"));
        }
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ApiClient::builder().url("ftp://x").build().err().unwrap();
        assert!(matches!(err, VmrayError::InvalidScheme(ref u) if u == "ftp://x"));
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        let err = ApiClient::builder()
            .url("vmray.example.com/api")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, VmrayError::InvalidScheme(ref u) if u == "vmray.example.com/api"));
    }

    #[test]
    fn test_rejects_unparsable_url() {
        let err = ApiClient::builder()
            .url("http://[::1/api")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, VmrayError::InvalidUrl { .. }));
    }

    #[test]
    fn test_default_transport_with_embedded_ca() {
        let client = ApiClient::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.base_url(), constants::DEFAULT_URL);
    }

    #[test]
    fn test_malformed_root_certificate() {
        let err = ApiClient::builder()
            .root_certificate_pem("-----BEGIN CERTIFICATE-----\nnot base64\n-----END CERTIFICATE-----\n")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, VmrayError::Certificate(_)));
    }

    #[test]
    fn test_root_certificate_without_pem_block() {
        let err = ApiClient::builder()
            .root_certificate_pem("garbage")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, VmrayError::Certificate(_)));
    }

    #[test]
    fn test_api_params_carry_credentials() {
        let client = test_client();
        let params = client.api_params(Parameters::new().with("hash", "abc"));
        assert_eq!(params.get("email"), Some("user"));
        assert_eq!(params.get("password"), Some("pass"));
        assert_eq!(params.get("type"), Some("api"));
        assert_eq!(params.get("hash"), Some("abc"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_no_auth_header_without_username() {
        let client = ApiClient::builder().http_client(Client::new()).build().unwrap();
        let request = client
            .authorize(client.inner.get("http://localhost/"))
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_format_request_includes_auth_and_fields() {
        let client = test_client();
        let params = client.api_params(Parameters::new().with("id", "7"));
        let request = client
            .authorize(client.inner.post(client.action_url("get_sample_info")))
            .build()
            .unwrap();

        let dump = format_request(&request, &params);
        assert!(dump.starts_with("POST http://localhost:8080/api/get_sample_info"));
        assert!(dump.contains("authorization: Basic dXNlcjpwYXNz"));
        assert!(dump.contains("\nemail=user"));
        assert!(dump.contains("\nid=7"));
    }

    #[test]
    fn test_format_body() {
        assert_eq!(format_body(br#"{"sample_id":1}"#), r#"{"sample_id":1}"#);
        assert_eq!(format_body(&[0x50, 0x4b, 0xff, 0xfe]), "<4 bytes of binary data>");
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            url: "https://vmray.example.com/api".into(),
            email: "analyst@example.com".into(),
            password: "secret".into(),
            timeout_secs: Some(10),
            ..ClientConfig::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://vmray.example.com/api/");
        assert_eq!(client.username(), "analyst@example.com");
        assert!(client.error_log);
        assert!(!client.trace_log);
    }

    #[test]
    fn test_from_config_normalizes_url() {
        let config = ClientConfig {
            url: "  \"https://vmray.example.com/api\" ".into(),
            ..ClientConfig::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://vmray.example.com/api/");

        let client = ApiClient::from_config(&ClientConfig::default()).unwrap();
        assert_eq!(client.base_url(), constants::DEFAULT_URL);
    }
}
