/// HTTP client for the GIPHY API
///
/// Fetches are fire-and-forget from the caller's point of view: there are no
/// retries, and a superseded request is not aborted (its result is simply
/// discarded by the search controller).

use reqwest::Url;

use super::decode::decode_urls;
use super::endpoint::Endpoint;
use crate::config::GiphyConfig;
use crate::error::{LayerError, Result};
use crate::media::AnimatedGif;

/// Cheap to clone: the inner reqwest client is reference counted
#[derive(Debug, Clone)]
pub struct GiphyClient {
    http: reqwest::Client,
    config: GiphyConfig,
}

impl GiphyClient {
    /// Build the client; falls back to reqwest defaults if the tuned builder fails
    pub fn new(config: GiphyConfig) -> Self {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("gif-layers/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|err| {
                log::warn!("⚠️  Using default HTTP client: {}", err);
                reqwest::Client::new()
            });

        Self { http, config }
    }

    /// Fetch and decode one listing
    pub async fn fetch(&self, endpoint: &Endpoint) -> Result<Vec<Url>> {
        let url = endpoint.url(&self.config)?;
        log::debug!("GET {:?}", endpoint);

        let body = self.get_bytes(url).await?;
        decode_urls(&body)
    }

    /// Download a GIF and decode its frames
    pub async fn fetch_gif(&self, url: Url) -> Result<AnimatedGif> {
        let body = self.get_bytes(url).await?;
        AnimatedGif::decode(body).await
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(LayerError::Http(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
