//! File-backed zone-id cache.
//!
//! Maps domain names to Cloudflare zone ids so repeat invocations skip the
//! zone lookup round-trip. The cache is advisory: every failure path
//! degrades to "no cache" with a log line, never to an error. The on-disk
//! format matches the cache files written by the original hook, including
//! the account guard that ignores caches written under different
//! credentials.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A cached zone lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// Zone id returned by the provider
    id: String,

    /// Unix timestamp of the lookup
    created: i64,
}

/// On-disk cache layout
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    /// Account email the entries were resolved under
    account: String,

    /// Domain name to cached zone id
    zone: HashMap<String, CacheEntry>,
}

/// File-backed mapping of domain name to zone id with TTL expiry.
#[derive(Debug)]
pub struct ZoneCache {
    path: Option<PathBuf>,
    account: String,
    ttl: Duration,
    mode: u32,
    entries: HashMap<String, CacheEntry>,
    dirty: bool,
}

impl ZoneCache {
    /// Create a disabled cache: `get` always misses and `save` never writes.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            path: None,
            account: String::new(),
            ttl: Duration::ZERO,
            mode: 0,
            entries: HashMap::new(),
            dirty: false,
        }
    }

    /// Load the cache from disk.
    ///
    /// A missing or unreadable file yields an empty cache; a cache written
    /// under a different account email is ignored. `path = None` yields a
    /// disabled cache.
    #[must_use]
    pub fn load(path: Option<PathBuf>, account: &str, ttl: Duration, mode: u32) -> Self {
        let Some(path) = path else {
            debug!("zone cache disabled");
            return Self::disabled();
        };

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<CacheFile>(&raw) {
                Ok(file) if file.account == account => {
                    debug!(path = %path.display(), "cache loaded");
                    file.zone
                }
                Ok(file) => {
                    warn!(account = %file.account, "not using cache written for another account");
                    HashMap::new()
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "cache file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "cache file not found");
                HashMap::new()
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot read cache file, starting empty");
                HashMap::new()
            }
        };

        Self {
            path: Some(path),
            account: account.to_string(),
            ttl,
            mode,
            entries,
            dirty: false,
        }
    }

    /// Get the cached zone id for a domain, if present and within the TTL.
    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&str> {
        self.get_at(domain, Utc::now().timestamp())
    }

    fn get_at(&self, domain: &str, now: i64) -> Option<&str> {
        let entry = self.entries.get(domain)?;
        let age = now.saturating_sub(entry.created);

        if age >= i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX) {
            debug!(domain, "cache entry expired");
            return None;
        }

        Some(&entry.id)
    }

    /// Record a zone lookup. No-op when the cache is disabled.
    pub fn put(&mut self, domain: &str, zone_id: &str) {
        if self.path.is_none() {
            return;
        }

        self.entries.insert(
            domain.to_string(),
            CacheEntry {
                id: zone_id.to_string(),
                created: Utc::now().timestamp(),
            },
        );
        self.dirty = true;
    }

    /// Persist the cache if anything changed, then force the configured
    /// permission mode onto the file.
    ///
    /// Cache writes are advisory; failures are logged and swallowed.
    pub fn save(&mut self) {
        let Some(path) = &self.path else { return };
        if !self.dirty {
            debug!("cache has not changed");
            return;
        }

        let file = CacheFile {
            account: self.account.clone(),
            zone: self.entries.clone(),
        };

        let raw = match serde_json::to_string(&file) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "cannot serialize cache");
                return;
            }
        };

        if let Err(err) = std::fs::write(path, raw) {
            warn!(path = %path.display(), %err, "cannot write cache file");
            return;
        }

        self.apply_mode();
        self.dirty = false;
        debug!(path = %path.display(), "cache saved");
    }

    #[cfg(unix)]
    fn apply_mode(&self) {
        use std::os::unix::fs::PermissionsExt;

        let Some(path) = &self.path else { return };
        let perms = std::fs::Permissions::from_mode(self.mode);
        if let Err(err) = std::fs::set_permissions(path, perms) {
            warn!(path = %path.display(), %err, "cannot restrict cache file permissions");
        }
    }

    #[cfg(not(unix))]
    fn apply_mode(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    fn cache_at(dir: &tempfile::TempDir) -> ZoneCache {
        ZoneCache::load(
            Some(dir.path().join("cloudflare.json")),
            "ops@example.com",
            TTL,
            0o600,
        )
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut cache = cache_at(&dir);
        cache.put("example.com", "zone-1");
        assert_eq!(cache.get("example.com"), Some("zone-1"));
        cache.save();

        let reloaded = cache_at(&dir);
        assert_eq!(reloaded.get("example.com"), Some("zone-1"));
    }

    #[test]
    fn test_expired_entry_misses() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_at(&dir);
        cache.put("example.com", "zone-1");

        let now = Utc::now().timestamp();
        assert_eq!(cache.get_at("example.com", now), Some("zone-1"));
        assert_eq!(cache.get_at("example.com", now + 3600), None);
    }

    #[test]
    fn test_disabled_cache_never_stores() {
        let mut cache = ZoneCache::disabled();
        cache.put("example.com", "zone-1");
        assert_eq!(cache.get("example.com"), None);
        cache.save();
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cloudflare.json"), "{not json").unwrap();

        let cache = cache_at(&dir);
        assert_eq!(cache.get("example.com"), None);
    }

    #[test]
    fn test_other_account_cache_ignored() {
        let dir = tempfile::tempdir().unwrap();

        let mut theirs = ZoneCache::load(
            Some(dir.path().join("cloudflare.json")),
            "someone-else@example.com",
            TTL,
            0o600,
        );
        theirs.put("example.com", "zone-1");
        theirs.save();

        let ours = cache_at(&dir);
        assert_eq!(ours.get("example.com"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloudflare.json");

        let mut cache = ZoneCache::load(Some(path.clone()), "ops@example.com", TTL, 0o600);
        cache.put("example.com", "zone-1");
        cache.save();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_unchanged_cache_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloudflare.json");

        let mut cache = ZoneCache::load(Some(path.clone()), "ops@example.com", TTL, 0o600);
        cache.save();
        assert!(!path.exists());
    }
}
