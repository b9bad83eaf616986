//! Commonly used platform types.

pub use crate::client::{MetaClientConfig, MetaGraphClient};
pub use crate::error::{MetaError, MetaResult};
pub use crate::executor::ActionExecutor;
pub use crate::platform::AdPlatform;
