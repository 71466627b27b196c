//! Environment-sourced configuration.
//!
//! All options use the `CF_*` variable names the original dehydrated hook
//! established, so existing deployments keep working unchanged.

use cfhook_core::{HookError, Result};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default cache file location
const DEFAULT_CACHE_FILE: &str = "/etc/dehydrated/cloudflare.json";

/// Default cache entry TTL: 30 days
const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Default permission mode applied after cache writes (octal)
const DEFAULT_CACHE_MODE: u32 = 0o600;

/// Default sleep between propagation polls
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Hook configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cloudflare account email (`CF_API_EMAIL`)
    pub api_email: String,

    /// Cloudflare API key (`CF_API_KEY`)
    pub api_key: String,

    /// Resolvers queried by the propagation checker (`CF_DNS_SERVERS`);
    /// empty means the system default resolver
    pub dns_servers: Vec<IpAddr>,

    /// Cache file path (`CF_CACHEFILE`); `None` disables caching
    pub cache_file: Option<PathBuf>,

    /// Permission mode forced onto the cache file after writes (`CF_CACHEFMODE`)
    pub cache_mode: u32,

    /// Cache entry validity window (`CF_CACHETIME`)
    pub cache_ttl: Duration,

    /// Sleep between propagation polls (`CF_PROPAGATION_INTERVAL`)
    pub poll_interval: Duration,

    /// Poll ceiling (`CF_PROPAGATION_ATTEMPTS`); `None` polls until killed,
    /// matching the dehydrated-side timeout model
    pub max_attempts: Option<u32>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_email = require(&lookup, "CF_API_EMAIL")?;
        let api_key = require(&lookup, "CF_API_KEY")?;

        let dns_servers = match lookup("CF_DNS_SERVERS") {
            Some(list) if !list.is_empty() => list
                .split(',')
                .map(|s| {
                    s.trim().parse().map_err(|_| {
                        HookError::Config(format!("CF_DNS_SERVERS: {s:?} is not an IP address"))
                    })
                })
                .collect::<Result<Vec<IpAddr>>>()?,
            _ => Vec::new(),
        };

        // An explicitly empty CF_CACHEFILE disables caching entirely
        let cache_file = match lookup("CF_CACHEFILE") {
            Some(path) if path.is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_CACHE_FILE)),
        };

        let cache_mode = match lookup("CF_CACHEFMODE") {
            Some(mode) => u32::from_str_radix(&mode, 8).map_err(|_| {
                HookError::Config(format!("CF_CACHEFMODE: {mode:?} is not an octal mode"))
            })?,
            None => DEFAULT_CACHE_MODE,
        };

        let cache_ttl = Duration::from_secs(parse_secs(
            &lookup,
            "CF_CACHETIME",
            DEFAULT_CACHE_TTL_SECS,
        )?);

        let poll_interval = Duration::from_secs(parse_secs(
            &lookup,
            "CF_PROPAGATION_INTERVAL",
            DEFAULT_POLL_INTERVAL_SECS,
        )?);

        let max_attempts = match parse_secs(&lookup, "CF_PROPAGATION_ATTEMPTS", 0)? {
            0 => None,
            n => Some(u32::try_from(n).map_err(|_| {
                HookError::Config("CF_PROPAGATION_ATTEMPTS is out of range".to_string())
            })?),
        };

        Ok(Self {
            api_email,
            api_key,
            dns_servers,
            cache_file,
            cache_mode,
            cache_ttl,
            poll_interval,
            max_attempts,
        })
    }
}

/// Whether `CF_DEBUG` requests verbose diagnostics.
#[must_use]
pub fn debug_enabled() -> bool {
    std::env::var_os("CF_DEBUG").is_some_and(|v| !v.is_empty())
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| HookError::Config(format!("{key} must be set")))
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| HookError::Config(format!("{key}: {raw:?} is not a number of seconds"))),
        None => Ok(default),
    }
}
