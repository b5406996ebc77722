//! Telegram Bot API client.
//!
//! Implements the wire layer (request building, envelope decoding, status
//! classification) plus one thin builder per supported API method, and a
//! stateful `Bot` facade that tracks the current conversation.

pub mod bot;
pub mod client;
pub mod methods;

pub use bot::Bot;
pub use client::{ApiConfig, Client};
pub use methods::{ChatAction, EditOptions, InlineQueryOptions, PhotoOptions};
