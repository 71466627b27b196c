//! Propagation checker.
//!
//! After the challenge TXT record is created it takes a while to become
//! visible on the authoritative nameservers. dehydrated starts validation
//! as soon as the hook returns, so the hook blocks here until every
//! configured resolver sees the expected value. The loop is unbounded by
//! default (dehydrated enforces its own outer timeout); `CF_PROPAGATION_ATTEMPTS`
//! adds an optional ceiling.

use async_trait::async_trait;
use cfhook_core::{HookError, Result};
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info};

/// TXT lookup seam, implemented by [`Resolver`] and by scripted fakes in
/// tests.
#[async_trait]
pub trait TxtLookup: Send + Sync {
    /// Label used in log lines
    fn name(&self) -> &str;

    /// All TXT values currently published at `fqdn`
    async fn txt_records(&self, fqdn: &str) -> Result<Vec<String>>;
}

/// A single upstream resolver
pub struct Resolver {
    label: String,
    inner: TokioAsyncResolver,
}

impl Resolver {
    /// Resolver using the system configuration
    pub fn system() -> Result<Self> {
        let inner = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| HookError::Dns(e.to_string()))?;

        Ok(Self {
            label: "system".to_string(),
            inner,
        })
    }

    /// Resolver pinned to a single nameserver
    #[must_use]
    pub fn for_nameserver(ip: IpAddr) -> Self {
        let group = NameServerConfigGroup::from_ips_clear(&[ip], 53, true);
        let config = ResolverConfig::from_parts(None, Vec::new(), group);

        Self {
            label: ip.to_string(),
            inner: TokioAsyncResolver::tokio(config, ResolverOpts::default()),
        }
    }

    /// One resolver per configured nameserver, or the system resolver when
    /// none are configured
    pub fn pool(nameservers: &[IpAddr]) -> Result<Vec<Self>> {
        if nameservers.is_empty() {
            return Ok(vec![Self::system()?]);
        }

        Ok(nameservers.iter().copied().map(Self::for_nameserver).collect())
    }
}

#[async_trait]
impl TxtLookup for Resolver {
    fn name(&self) -> &str {
        &self.label
    }

    async fn txt_records(&self, fqdn: &str) -> Result<Vec<String>> {
        // Trailing dot keeps search domains out of the query
        let lookup = self
            .inner
            .txt_lookup(format!("{fqdn}."))
            .await
            .map_err(|e| HookError::Dns(e.to_string()))?;

        Ok(lookup
            .iter()
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|data| String::from_utf8_lossy(data).into_owned())
                    .collect()
            })
            .collect())
    }
}

/// Polls resolvers until a TXT record carries an expected value.
pub struct PropagationChecker<L> {
    resolvers: Vec<L>,
    interval: Duration,
    max_attempts: Option<u32>,
}

impl<L: TxtLookup> PropagationChecker<L> {
    /// Create a checker over the given resolvers.
    ///
    /// `max_attempts = None` polls until the process is killed.
    #[must_use]
    pub fn new(resolvers: Vec<L>, interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            resolvers,
            interval,
            max_attempts,
        }
    }

    /// Block until `expected` is visible at `fqdn` on every resolver.
    pub async fn wait_for_record(&self, fqdn: &str, expected: &str) -> Result<()> {
        let mut attempts: u32 = 0;

        loop {
            if self.visible_everywhere(fqdn, expected).await {
                info!(fqdn, "TXT record propagated");
                return Ok(());
            }

            attempts += 1;
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(HookError::PropagationTimeout {
                        fqdn: fqdn.to_string(),
                        attempts,
                    });
                }
            }

            info!(
                fqdn,
                "DNS not propagated, waiting {} seconds",
                self.interval.as_secs()
            );
            tokio::time::sleep(self.interval).await;
        }
    }

    async fn visible_everywhere(&self, fqdn: &str, expected: &str) -> bool {
        for resolver in &self.resolvers {
            match resolver.txt_records(fqdn).await {
                Ok(values) if values.iter().any(|v| v == expected) => {}
                Ok(_) => {
                    debug!(resolver = resolver.name(), fqdn, "expected value not present yet");
                    return false;
                }
                Err(err) => {
                    debug!(resolver = resolver.name(), fqdn, %err, "query failed, retrying");
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Lookup that fails `misses` times before the value appears
    struct Scripted {
        label: String,
        misses: Mutex<u32>,
        value: Option<String>,
    }

    impl Scripted {
        fn visible_after(label: &str, misses: u32, value: &str) -> Self {
            Self {
                label: label.to_string(),
                misses: Mutex::new(misses),
                value: Some(value.to_string()),
            }
        }

        fn never(label: &str) -> Self {
            Self {
                label: label.to_string(),
                misses: Mutex::new(0),
                value: None,
            }
        }
    }

    #[async_trait]
    impl TxtLookup for Scripted {
        fn name(&self) -> &str {
            &self.label
        }

        async fn txt_records(&self, _fqdn: &str) -> Result<Vec<String>> {
            let mut misses = self.misses.lock().unwrap();
            if *misses > 0 {
                *misses -= 1;
                return Err(HookError::Dns("NXDOMAIN".to_string()));
            }

            Ok(self.value.iter().cloned().collect())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_visible() {
        let checker = PropagationChecker::new(
            vec![Scripted::visible_after("ns1", 3, "val")],
            Duration::from_secs(10),
            None,
        );

        checker
            .wait_for_record("_acme-challenge.example.com", "val")
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_requires_every_resolver() {
        let checker = PropagationChecker::new(
            vec![
                Scripted::visible_after("ns1", 0, "val"),
                Scripted::never("ns2"),
            ],
            Duration::from_secs(10),
            Some(5),
        );

        let err = checker
            .wait_for_record("_acme-challenge.example.com", "val")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HookError::PropagationTimeout { attempts: 5, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_value_does_not_satisfy() {
        let checker = PropagationChecker::new(
            vec![Scripted::visible_after("ns1", 0, "other")],
            Duration::from_secs(1),
            Some(2),
        );

        let err = checker
            .wait_for_record("_acme-challenge.example.com", "val")
            .await
            .unwrap_err();

        assert!(matches!(err, HookError::PropagationTimeout { .. }));
    }
}
