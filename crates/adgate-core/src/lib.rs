//! Adgate Core - Proposal data model and action catalog.
//!
//! This crate provides:
//! - The [`Proposal`] record and its status lifecycle
//! - The closed set of platform actions ([`ActionKind`], [`ActionParams`])
//! - The action catalog: tool definitions surfaced to the language model and
//!   the single validation choke point for tool arguments
//! - Campaign snapshot types consumed by the orchestrator

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod action;
pub mod catalog;
pub mod proposal;
pub mod snapshot;
pub mod types;

pub use action::{ActionContext, ActionKind, ActionParams};
pub use catalog::{CatalogError, CatalogResult, ToolSpec, ValidatedAction};
pub use proposal::{Proposal, ProposalStatus};
pub use snapshot::CampaignSnapshot;
pub use types::{OwnerId, ProposalId, Timestamp};
