//! Sonata Catalog Client
//!
//! Async HTTP fetcher for the player's `tracks.json` catalog.
//!
//! # Features
//!
//! - **Configuration**: `sonata.toml` plus `SONATA_*` environment overrides
//! - **Single outstanding fetch**: a second request while one is in flight fails fast
//! - **Player hand-off**: success and failure are reported to a `PlaybackController`
//!
//! # Example
//!
//! ```ignore
//! use sonata_catalog_client::{CatalogClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(&ClientConfig::new("https://music.example.com/"))?;
//!
//!     let catalog = client.fetch_catalog().await?;
//!     println!("Found {} tracks", catalog.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;

pub use client::CatalogClient;
pub use config::{ClientConfig, CONFIG_FILE, ENV_PREFIX};
pub use error::{CatalogClientError, Result};
