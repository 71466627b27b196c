//! Hook implementations.

pub mod clean;
pub mod deploy;

use crate::cache::ZoneCache;
use crate::config::Config;
use crate::propagation::{PropagationChecker, Resolver};
use cfhook_client::CloudflareClient;

/// Shared context for the challenge hooks.
#[derive(Debug, Clone)]
pub struct Context {
    /// Environment-sourced configuration
    pub config: Config,
}

impl Context {
    /// Build the context from the process environment.
    ///
    /// Missing credentials surface here, before any network traffic.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            config: Config::from_env()?,
        })
    }

    /// Create a Cloudflare client with the configured credentials.
    pub fn client(&self) -> anyhow::Result<CloudflareClient> {
        Ok(CloudflareClient::new(
            &self.config.api_email,
            &self.config.api_key,
        )?)
    }

    /// Load the zone-id cache.
    #[must_use]
    pub fn cache(&self) -> ZoneCache {
        ZoneCache::load(
            self.config.cache_file.clone(),
            &self.config.api_email,
            self.config.cache_ttl,
            self.config.cache_mode,
        )
    }

    /// Build the propagation checker over the configured nameservers.
    pub fn checker(&self) -> anyhow::Result<PropagationChecker<Resolver>> {
        Ok(PropagationChecker::new(
            Resolver::pool(&self.config.dns_servers)?,
            self.config.poll_interval,
            self.config.max_attempts,
        ))
    }
}
