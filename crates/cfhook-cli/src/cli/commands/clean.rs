//! `clean_challenge` - remove the challenge TXT record.

use anyhow::Result;
use cfhook_client::DnsProvider;
use cfhook_core::challenge_record_name;
use tracing::{debug, info, warn};

use super::Context;
use crate::cache::ZoneCache;
use crate::cli::args::ChallengeArgs;
use crate::zones::resolve_zone_id;

pub async fn execute(ctx: &Context, args: &ChallengeArgs) -> Result<()> {
    let client = ctx.client()?;
    let mut cache = ctx.cache();

    clean_challenge(&client, &mut cache, &args.domain, &args.validation).await?;

    cache.save();
    Ok(())
}

/// Delete TXT records matching the challenge value.
///
/// Cleanup is best effort: a missing record is success, and provider
/// failures are logged rather than propagated. A leftover TXT record is
/// residue, not a reason to abort certificate issuance.
pub async fn clean_challenge<P>(
    provider: &P,
    cache: &mut ZoneCache,
    domain: &str,
    validation: &str,
) -> cfhook_core::Result<()>
where
    P: DnsProvider + ?Sized,
{
    debug!(domain, "cleaning challenge");

    let zone_id = match resolve_zone_id(provider, cache, domain).await {
        Ok(zone_id) => zone_id,
        Err(err) => {
            warn!(domain, %err, "cannot resolve zone, skipping cleanup");
            return Ok(());
        }
    };

    let record_name = challenge_record_name(domain);
    let records = match provider
        .list_records(&zone_id, &record_name, Some(validation))
        .await
    {
        Ok(records) => records,
        Err(err) => {
            warn!(%record_name, %err, "cannot list TXT records, skipping cleanup");
            return Ok(());
        }
    };

    if records.is_empty() {
        debug!(%record_name, "no matching TXT record found");
        return Ok(());
    }

    for record in records.iter().filter(|r| r.matches_challenge(validation)) {
        match provider.delete_record(&zone_id, &record.id).await {
            Ok(()) => info!(%record_name, id = %record.id, "deleted TXT record"),
            Err(err) => warn!(%record_name, id = %record.id, %err, "failed to delete TXT record"),
        }
    }

    Ok(())
}
