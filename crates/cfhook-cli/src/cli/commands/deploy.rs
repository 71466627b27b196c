//! `deploy_challenge` - publish the challenge TXT record.

use anyhow::Result;
use cfhook_client::DnsProvider;
use cfhook_core::challenge_record_name;
use tracing::debug;

use super::Context;
use crate::cache::ZoneCache;
use crate::cli::args::ChallengeArgs;
use crate::propagation::{PropagationChecker, TxtLookup};
use crate::zones::resolve_zone_id;

pub async fn execute(ctx: &Context, args: &ChallengeArgs) -> Result<()> {
    let client = ctx.client()?;
    let checker = ctx.checker()?;
    let mut cache = ctx.cache();

    deploy_challenge(&client, &mut cache, &checker, &args.domain, &args.validation).await?;

    cache.save();
    Ok(())
}

/// Create the TXT record for a challenge and wait for propagation.
///
/// Re-deploys are idempotent: an existing record with the same value is
/// left alone. Any provider failure here is fatal, since validation cannot
/// succeed without the record.
pub async fn deploy_challenge<P, L>(
    provider: &P,
    cache: &mut ZoneCache,
    checker: &PropagationChecker<L>,
    domain: &str,
    validation: &str,
) -> cfhook_core::Result<()>
where
    P: DnsProvider + ?Sized,
    L: TxtLookup,
{
    debug!(domain, "deploying challenge");

    let zone_id = resolve_zone_id(provider, cache, domain).await?;
    let record_name = challenge_record_name(domain);

    let existing = provider
        .list_records(&zone_id, &record_name, Some(validation))
        .await?;

    if existing.is_empty() {
        let record = provider
            .create_record(&zone_id, &record_name, validation)
            .await?;
        debug!(%record_name, id = %record.id, "created TXT record");
    } else {
        debug!(%record_name, "TXT record already exists, skipping creation");
    }

    checker.wait_for_record(&record_name, validation).await
}
