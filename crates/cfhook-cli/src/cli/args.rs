//! Command-line argument definitions using clap.
//!
//! dehydrated invokes the hook with the hook name as the first positional
//! argument, so every hook is modeled as a subcommand. Hooks this program
//! has no work for are accepted and ignored, including ones added by newer
//! dehydrated releases (captured by the external subcommand variant).

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;

/// DNS-01 hook for the dehydrated ACME client, backed by Cloudflare DNS.
///
/// Configuration is taken from CF_* environment variables; see the README.
#[derive(Parser, Debug)]
#[command(name = "dehydrated-cloudflare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub hook: Hook,
}

#[derive(Subcommand, Debug)]
pub enum Hook {
    /// Publish the challenge TXT record and wait until it propagates
    #[command(name = "deploy_challenge")]
    DeployChallenge(ChallengeArgs),

    /// Remove the challenge TXT record
    #[command(name = "clean_challenge")]
    CleanChallenge(ChallengeArgs),

    /// Called once the certificate is issued; nothing to do for DNS-01
    #[command(name = "deploy_cert")]
    DeployCert(PassthroughArgs),

    /// Called when the certificate is still valid; nothing to do
    #[command(name = "unchanged_cert")]
    UnchangedCert(PassthroughArgs),

    /// Any other hook dehydrated invokes (startup_hook, exit_hook, ...)
    #[command(external_subcommand)]
    Other(Vec<OsString>),
}

/// Arguments dehydrated passes to the challenge hooks
#[derive(Args, Debug)]
pub struct ChallengeArgs {
    /// Domain being validated
    pub domain: String,

    /// Token filename (unused for DNS-01, kept for the hook contract)
    pub token: String,

    /// TXT value the ACME server expects to find
    pub validation: String,
}

/// Arguments for hooks this program ignores
#[derive(Args, Debug)]
pub struct PassthroughArgs {
    /// Whatever dehydrated passes (domain, key/cert paths, timestamp)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
