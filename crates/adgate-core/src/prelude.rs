//! Prelude module - commonly used types for convenient import.
//!
//! Use `use adgate_core::prelude::*;` to import the essential types.

// Identifiers and time
pub use crate::{OwnerId, ProposalId, Timestamp};

// Actions
pub use crate::{ActionContext, ActionKind, ActionParams};

// Proposals
pub use crate::{Proposal, ProposalStatus};

// Catalog
pub use crate::{CatalogError, CatalogResult, ToolSpec, ValidatedAction};

// Snapshots
pub use crate::CampaignSnapshot;
