//! Adgate Config - Settings for the campaign assistant.
//!
//! Settings are loaded from an optional TOML file overlaid with environment
//! variables, then validated. Libraries receive the resulting [`Settings`]
//! value explicitly; nothing in the workspace reads configuration
//! ambiently.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod error;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{AgentSettings, AnthropicSettings, MetaSettings, Settings};
