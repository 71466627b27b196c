//! Zone and DNS record types mirroring the Cloudflare v4 API.

use serde::{Deserialize, Serialize};

/// TTL applied to challenge TXT records, in seconds
pub const CHALLENGE_RECORD_TTL: u32 = 120;

/// Build the challenge record name for a domain
///
/// ```
/// assert_eq!(
///     cfhook_core::challenge_record_name("example.com"),
///     "_acme-challenge.example.com"
/// );
/// ```
#[must_use]
pub fn challenge_record_name(domain: &str) -> String {
    format!("_acme-challenge.{domain}")
}

/// A hosted zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-assigned zone identifier, authorizes record mutations
    pub id: String,

    /// Zone apex name, e.g. `example.com`
    pub name: String,
}

/// A DNS record as returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record identifier
    pub id: String,

    /// Record type (`TXT` for challenge records)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Fully qualified record name
    pub name: String,

    /// Record content; the validation token for challenge records
    pub content: String,

    /// Record TTL in seconds
    #[serde(default)]
    pub ttl: Option<u32>,
}

impl DnsRecord {
    /// Whether this is a TXT record carrying the given validation value
    #[must_use]
    pub fn matches_challenge(&self, content: &str) -> bool {
        self.record_type == "TXT" && self.content == content
    }
}

/// Payload for creating a new DNS record
#[derive(Debug, Clone, Serialize)]
pub struct NewDnsRecord {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,

    /// Fully qualified record name
    pub name: String,

    /// Record content
    pub content: String,

    /// Record TTL in seconds
    pub ttl: u32,
}

impl NewDnsRecord {
    /// Build the TXT record payload for a DNS-01 challenge
    #[must_use]
    pub fn challenge(name: impl Into<String>, validation: impl Into<String>) -> Self {
        Self {
            record_type: "TXT".to_string(),
            name: name.into(),
            content: validation.into(),
            ttl: CHALLENGE_RECORD_TTL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_record_name() {
        assert_eq!(
            challenge_record_name("www.example.com"),
            "_acme-challenge.www.example.com"
        );
    }

    #[test]
    fn test_matches_challenge() {
        let record = DnsRecord {
            id: "r1".to_string(),
            record_type: "TXT".to_string(),
            name: "_acme-challenge.example.com".to_string(),
            content: "tok-a".to_string(),
            ttl: Some(120),
        };
        assert!(record.matches_challenge("tok-a"));
        assert!(!record.matches_challenge("tok-b"));
    }
}
