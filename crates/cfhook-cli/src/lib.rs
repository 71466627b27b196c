//! # cfhook-cli
//!
//! dehydrated hook for DNS-01 validation against Cloudflare DNS.
//!
//! dehydrated invokes this binary once per lifecycle event with positional
//! arguments (`deploy_challenge <domain> <token> <validation>`, ...). The
//! hook publishes the challenge TXT record, waits until it is visible on the
//! configured nameservers, and removes it again during cleanup. Zone-id
//! lookups are cached in a JSON file between invocations.

pub mod cache;
pub mod cli;
pub mod config;
pub mod propagation;
pub mod zones;

pub use cli::run;
