//! Catalog fetcher
//!
//! Fetches `tracks.json` over HTTP and hands it to a
//! [`PlaybackController`]. At most one fetch runs at a time per client.

use crate::config::ClientConfig;
use crate::error::{CatalogClientError, Result};
use reqwest::Client;
use sonata_playback::{MediaElement, PlaybackController, TrackCatalog};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use url::Url;

/// HTTP client for a player's track catalog.
///
/// # Example
///
/// ```ignore
/// use sonata_catalog_client::{CatalogClient, ClientConfig};
///
/// let client = CatalogClient::new(&ClientConfig::load()?)?;
/// let catalog = client.fetch_catalog().await?;
/// println!("Found {} tracks", catalog.len());
/// ```
pub struct CatalogClient {
    http: Client,
    catalog_url: Url,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the fetch finishes or is dropped
struct FetchGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FetchGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CatalogClientError::FetchInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let catalog_url = config.resolve_catalog_url()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(format!("Sonata/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            catalog_url,
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn catalog_url(&self) -> &Url {
        &self.catalog_url
    }

    /// Whether a fetch is outstanding
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch and parse the catalog
    ///
    /// Fails with `FetchInProgress` while another fetch on this client is
    /// outstanding. Invalid entries are filtered; an all-invalid body yields
    /// an empty catalog.
    pub async fn fetch_catalog(&self) -> Result<TrackCatalog> {
        let _guard = FetchGuard::acquire(&self.in_flight)?;
        self.request_catalog().await
    }

    /// Fetch the catalog and install it into a player
    ///
    /// The player sees exactly one outcome: `catalog_ready` on success,
    /// `load_failure` with the user-facing message otherwise. A request
    /// refused because this client or the player is already loading leaves
    /// the player untouched, as does dropping the returned future.
    pub async fn fetch_into<M: MediaElement>(
        &self,
        player: &mut PlaybackController<M>,
    ) -> Result<()> {
        let _guard = FetchGuard::acquire(&self.in_flight)?;
        let mut pending = PendingLoad::begin(player)?;

        match self.request_catalog().await {
            Ok(catalog) => pending.player.catalog_ready(catalog).map_err(Into::into),
            Err(e) => {
                pending.player.load_failure(e.to_string());
                Err(e)
            }
        }
    }

    async fn request_catalog(&self) -> Result<TrackCatalog> {
        debug!(url = %self.catalog_url, "Fetching catalog");

        let response = self.http.get(self.catalog_url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(status = status.as_u16(), "Catalog request failed");
            return Err(CatalogClientError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let body = std::str::from_utf8(&bytes)
            .map_err(|e| CatalogClientError::Parse(format!("body is not UTF-8: {}", e)))?;

        let catalog = TrackCatalog::from_json_str(body)?;
        info!(tracks = catalog.len(), url = %self.catalog_url, "Catalog fetched");

        Ok(catalog)
    }
}

/// A player's outstanding catalog load, abandoned on drop unless settled
struct PendingLoad<'a, M: MediaElement> {
    player: &'a mut PlaybackController<M>,
}

impl<'a, M: MediaElement> PendingLoad<'a, M> {
    fn begin(player: &'a mut PlaybackController<M>) -> Result<Self> {
        player.begin_catalog_load()?;
        Ok(Self { player })
    }
}

impl<M: MediaElement> Drop for PendingLoad<'_, M> {
    fn drop(&mut self) {
        // No-op once catalog_ready or load_failure has run
        self.player.cancel_catalog_load();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);

        let guard = FetchGuard::acquire(&flag).unwrap();
        assert!(matches!(
            FetchGuard::acquire(&flag),
            Err(CatalogClientError::FetchInProgress)
        ));

        drop(guard);
        assert!(FetchGuard::acquire(&flag).is_ok());
    }

    #[test]
    fn new_resolves_catalog_url() {
        let client = CatalogClient::new(&ClientConfig::new("http://localhost:9000/app/")).unwrap();
        assert_eq!(client.catalog_url().as_str(), "http://localhost:9000/app/tracks.json");
        assert!(!client.is_fetching());
    }
}
