//! HTTP client for the Cloudflare v4 DNS API.
//!
//! This crate provides the [`CloudflareClient`] used by the hook to look up
//! zones and manage challenge TXT records, plus the [`DnsProvider`] trait
//! that lets the dispatcher run against a fake provider in tests.

mod client;
mod provider;

pub use client::{CloudflareClient, CloudflareClientBuilder};
pub use provider::DnsProvider;
pub use cfhook_core::{HookError, Result};
