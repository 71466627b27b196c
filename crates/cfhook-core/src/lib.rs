//! Core types and errors for the dehydrated Cloudflare DNS-01 hook.
//!
//! This crate provides the foundational pieces shared by the client and the
//! hook binary:
//!
//! - **Types**: zone and DNS record representations from the Cloudflare v4 API
//! - **Errors**: the [`HookError`] taxonomy with a [`Result`] alias

mod error;
pub mod types;

pub use error::{HookError, Result};
pub use types::*;
