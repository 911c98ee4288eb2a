pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::{MIGRATOR, open_pool};
pub use error::{DbError, Result};
pub use repositories::puppet_repository::PuppetRepository;
