pub mod cli;
pub mod commands;
pub mod conversations;
pub mod error;
pub mod logger;


pub use cli::{Cli, Commands};
pub use commands::Bridge;
pub use conversations::DetachedConversations;
pub use error::{BridgeError, Result};
