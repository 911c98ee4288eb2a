pub mod acting_identity;
pub mod avatar;
pub mod codec;
pub mod conversation;
pub mod error;
pub mod homeserver_client;
pub mod profile_writer;
pub mod puppet;
pub mod registry;
pub mod store;
mod sync;

#[cfg(test)]
mod tests;

pub use acting_identity::{ActingIdentity, select_acting_identity};
pub use avatar::{AvatarSource, HttpAvatarSource, avatar_fingerprint, sniff_content_type};
pub use codec::RemoteIdCodec;
pub use conversation::{ConversationDirectory, PuppetProfile};
pub use error::{PuppetError, Result};
pub use homeserver_client::HomeserverClient;
pub use profile_writer::ProfileWriter;
pub use puppet::Puppet;
pub use registry::{PuppetRegistry, PuppetServices};
pub use store::PuppetStore;
