pub mod bridge_mode;
pub mod conversation;
pub mod profile_snapshot;
pub mod puppet;
