//! Zone-id resolution.
//!
//! The zone that owns `www.sub.example.com` may be registered as
//! `sub.example.com` or `example.com`; candidates are tried longest first,
//! consulting the cache before the API.

use crate::cache::ZoneCache;
use cfhook_client::DnsProvider;
use cfhook_core::{HookError, Result};
use tracing::{debug, warn};

/// Candidate zone names for a domain: every suffix with at least two
/// labels, longest first.
#[must_use]
pub fn zone_candidates(domain: &str) -> Vec<String> {
    let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();

    (0..labels.len().saturating_sub(1))
        .map(|start| labels[start..].join("."))
        .collect()
}

/// Resolve the zone id owning `domain`, caching successful lookups.
pub async fn resolve_zone_id<P: DnsProvider + ?Sized>(
    provider: &P,
    cache: &mut ZoneCache,
    domain: &str,
) -> Result<String> {
    for candidate in zone_candidates(domain) {
        if let Some(zone_id) = cache.get(&candidate) {
            debug!(domain, zone_id, "using cached zone id");
            return Ok(zone_id.to_string());
        }

        match provider.lookup_zone(&candidate).await? {
            Some(zone) => {
                debug!(domain, zone_id = %zone.id, "found zone {}", zone.name);
                cache.put(&candidate, &zone.id);
                return Ok(zone.id);
            }
            None => debug!(%candidate, "no zone with this name, trying parent"),
        }
    }

    warn!(domain, "no zone found");
    Err(HookError::ZoneNotFound {
        domain: domain.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_longest_first() {
        assert_eq!(
            zone_candidates("www.sub.example.com"),
            vec!["www.sub.example.com", "sub.example.com", "example.com"]
        );
    }

    #[test]
    fn test_apex_has_single_candidate() {
        assert_eq!(zone_candidates("example.com"), vec!["example.com"]);
    }

    #[test]
    fn test_bare_label_has_no_candidates() {
        assert!(zone_candidates("localhost").is_empty());
    }
}
