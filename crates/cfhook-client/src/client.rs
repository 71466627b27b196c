//! Cloudflare v4 API client implementation.

use crate::provider::DnsProvider;
use async_trait::async_trait;
use cfhook_core::{DnsRecord, HookError, NewDnsRecord, Result, Zone};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The Cloudflare API base URL
const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare v4 API client
#[derive(Clone)]
pub struct CloudflareClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: String,
}

/// Response envelope wrapping every v4 API payload
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: u32,
    message: String,
}

impl CloudflareClient {
    /// Create a new client with the given account email and API key
    pub fn new(email: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        CloudflareClientBuilder::new(email, api_key).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(email: impl Into<String>, api_key: impl Into<String>) -> CloudflareClientBuilder {
        CloudflareClientBuilder::new(email, api_key)
    }

    /// Perform a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.build_url(path, params);
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| HookError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Perform a POST request with JSON body
    async fn post<T: DeserializeOwned, B: serde::Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.build_url(path, &[]);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| HookError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Perform a DELETE request
    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.build_url(path, &[]);
        debug!(url = %url, "DELETE request");

        let response = self
            .inner
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| HookError::Http(e.to_string()))?;

        // Delete returns `{"result": {"id": ...}}`; only success matters
        let _: serde_json::Value = self.handle_response(response).await?;
        Ok(())
    }

    /// Build a URL with query parameters
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.inner.base_url, path);

        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url
    }

    /// Unwrap the v4 response envelope, mapping failures to [`HookError`]
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| HookError::Http(e.to_string()))?;

        if status == 401 || status == 403 {
            warn!(status, "Cloudflare rejected the request credentials");
            return Err(HookError::Unauthorized);
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;

        if !envelope.success {
            let (code, message) = envelope
                .errors
                .into_iter()
                .next()
                .map_or_else(
                    || (u32::from(status), "unknown API error".to_string()),
                    |e| (e.code, e.message),
                );
            return Err(HookError::Api { code, message });
        }

        envelope.result.ok_or_else(|| HookError::Api {
            code: u32::from(status),
            message: "missing result in successful response".to_string(),
        })
    }
}

#[async_trait]
impl DnsProvider for CloudflareClient {
    async fn lookup_zone(&self, name: &str) -> Result<Option<Zone>> {
        let mut zones: Vec<Zone> = self.get("/zones", &[("name", name)]).await?;

        if zones.len() > 1 {
            warn!(name, "found multiple zones, using the first");
        }

        Ok(if zones.is_empty() {
            None
        } else {
            Some(zones.swap_remove(0))
        })
    }

    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        content: Option<&str>,
    ) -> Result<Vec<DnsRecord>> {
        let mut params = vec![("type", "TXT"), ("name", name)];
        if let Some(content) = content {
            params.push(("content", content));
        }

        self.get(&format!("/zones/{zone_id}/dns_records"), &params)
            .await
    }

    async fn create_record(&self, zone_id: &str, name: &str, content: &str) -> Result<DnsRecord> {
        let payload = NewDnsRecord::challenge(name, content);
        self.post(&format!("/zones/{zone_id}/dns_records"), &payload)
            .await
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.delete(&format!("/zones/{zone_id}/dns_records/{record_id}"))
            .await
    }
}

/// Builder for configuring a [`CloudflareClient`]
pub struct CloudflareClientBuilder {
    email: String,
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl CloudflareClientBuilder {
    /// Create a new builder with the given credentials
    #[must_use]
    pub fn new(email: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("cfhook/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<CloudflareClient> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Auth-Email",
            HeaderValue::from_str(&self.email)
                .map_err(|_| HookError::Config("account email is not a valid header value".into()))?,
        );
        let mut key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| HookError::Config("API key is not a valid header value".into()))?;
        key.set_sensitive(true);
        headers.insert("X-Auth-Key", key);

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| HookError::Http(e.to_string()))?;

        Ok(CloudflareClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: self.base_url,
            }),
        })
    }
}

// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}
