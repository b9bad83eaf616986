//! Adgate Test - Deterministic fakes for the workspace's tests.
//!
//! Provides:
//! - [`MockLlmProvider`]: queue-based model provider replaying scripted
//!   turns, for exercising the agent loop without a real API
//! - [`MockAdPlatform`]: scripted ad platform recording every call
//! - Campaign snapshot fixtures

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod fixtures;
mod mock_llm;
mod mock_platform;

pub use fixtures::{sample_snapshot, sample_snapshots};
pub use mock_llm::{MockLlmProvider, MockLlmTurn, MockToolCall};
pub use mock_platform::MockAdPlatform;
