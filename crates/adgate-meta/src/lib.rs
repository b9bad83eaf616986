//! Adgate Meta - Meta Graph API client and the gated action executor.
//!
//! This crate provides:
//! - [`AdPlatform`]: the four write operations the executor may perform
//! - [`MetaGraphClient`]: the Graph API implementation (campaign status
//!   updates, daily budgets, ad set bids)
//! - [`ActionExecutor`]: maps an approved proposal's parameters to exactly
//!   one platform call and reports the outcome
//!
//! Monetary amounts cross this crate's boundary in currency major units and
//! are converted to the platform's integer minor units here, nowhere else.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

mod client;
mod error;
mod executor;
mod platform;

pub use client::{MetaClientConfig, MetaGraphClient};
pub use error::{MetaError, MetaResult};
pub use executor::ActionExecutor;
pub use platform::AdPlatform;
