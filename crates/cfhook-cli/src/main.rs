//! dehydrated-cloudflare - DNS-01 hook for the dehydrated ACME client.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    cfhook_cli::run().await
}
