pub mod config;
pub mod cookies;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{ServerArgs, UpstreamArgs};

pub use crate::config::{BridgeSettings, UpstreamSettings};
pub use crate::core::{client::AnkiWebClient, deck::DeckRegistry, encoding::encode_payload};
pub use crate::domain::model::{BatchSummary, Card};
pub use crate::utils::error::{BridgeError, Result};
