mod bridge_mode;
mod conversation;
mod puppet;
