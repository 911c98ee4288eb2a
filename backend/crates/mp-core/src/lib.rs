pub mod error;
pub mod models;

#[cfg(test)]
mod tests;

pub use error::{CoreError, Result};
pub use error_location::ErrorLocation;
pub use models::bridge_mode::BridgeMode;
pub use models::conversation::{ConversationContext, ConversationKind};
pub use models::profile_snapshot::ProfileSnapshot;
pub use models::puppet::{CustomBinding, PuppetRecord};
