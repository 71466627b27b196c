//! Provider abstraction over the DNS API.

use async_trait::async_trait;
use cfhook_core::{DnsRecord, Result, Zone};

/// The four operations the hook needs from a DNS provider.
///
/// Implemented by [`CloudflareClient`](crate::CloudflareClient); tests
/// substitute an in-memory fake so the dispatcher can run without network
/// access.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up a hosted zone by exact name
    async fn lookup_zone(&self, name: &str) -> Result<Option<Zone>>;

    /// List TXT records in a zone by name, optionally filtered by content
    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        content: Option<&str>,
    ) -> Result<Vec<DnsRecord>>;

    /// Create a challenge TXT record, returning the stored record
    async fn create_record(&self, zone_id: &str, name: &str, content: &str) -> Result<DnsRecord>;

    /// Delete a record by id
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()>;
}
