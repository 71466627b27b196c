use thiserror::Error;

/// Result type alias for hook operations
pub type Result<T> = std::result::Result<T, HookError>;

/// Errors that can occur while deploying or cleaning a DNS-01 challenge
#[derive(Error, Debug)]
pub enum HookError {
    /// Authentication failed - invalid or missing API credentials
    #[error("authentication failed: Cloudflare rejected the API credentials")]
    Unauthorized,

    /// The Cloudflare API returned an error response
    #[error("Cloudflare API error ({code}): {message}")]
    Api {
        /// Cloudflare error code, or HTTP status if the envelope was absent
        code: u32,
        /// Error message from the API
        message: String,
    },

    /// No hosted zone covers the requested domain
    #[error("no Cloudflare zone found for domain {domain}")]
    ZoneNotFound {
        /// Domain whose zone lookup failed
        domain: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// DNS resolution failed in the propagation checker
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// The propagation poll ceiling was exhausted
    #[error("TXT record {fqdn} not visible after {attempts} checks")]
    PropagationTimeout {
        /// Challenge record name that never became visible
        fqdn: String,
        /// Number of polls performed
        attempts: u32,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl HookError {
    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns true if the error came from talking to the provider API,
    /// as opposed to local configuration or resolver problems
    #[must_use]
    pub const fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::Api { .. } | Self::Http(_) | Self::Json(_)
        )
    }
}
