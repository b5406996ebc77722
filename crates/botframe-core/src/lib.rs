//! Core domain + utilities for the botframe workspace.
//!
//! This crate is transport-agnostic: the HTTP client and the SQLite store
//! live in sibling crates and plug in behind the `Outbound` port.

pub mod config;
pub mod domain;
pub mod errors;
pub mod keyboard;
pub mod logging;
pub mod pacing;
pub mod paginate;
pub mod params;
pub mod port;

pub use errors::{Error, Result};
