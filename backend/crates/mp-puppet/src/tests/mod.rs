mod codec;
mod error;
