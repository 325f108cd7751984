/// GIPHY sticker endpoints and request URL construction

use reqwest::Url;

use crate::config::GiphyConfig;
use crate::error::{LayerError, Result};

/// Which listing to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Trending stickers, shown while the search field is empty
    Trending,
    /// Keyword search
    Search(String),
}

impl Endpoint {
    /// Pick the endpoint for the current search field text.
    ///
    /// Only a truly empty field means "trending"; whitespace is a query.
    pub fn for_query(text: &str) -> Self {
        if text.is_empty() {
            Endpoint::Trending
        } else {
            Endpoint::Search(text.to_string())
        }
    }

    /// Build the request URL.
    ///
    /// Query values are form-urlencoded, so spaces in keywords become `+`.
    pub fn url(&self, config: &GiphyConfig) -> Result<Url> {
        let base = config.base_url.trim_end_matches('/');
        let path = match self {
            Endpoint::Trending => "trending",
            Endpoint::Search(_) => "search",
        };

        let mut url = Url::parse(&format!("{}/{}", base, path))
            .map_err(|e| LayerError::Url(format!("{}: {}", base, e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &config.api_key);
            match self {
                Endpoint::Trending => {
                    query
                        .append_pair("limit", &config.trending_limit.to_string())
                        .append_pair("rating", &config.rating);
                }
                Endpoint::Search(keywords) => {
                    query
                        .append_pair("q", keywords)
                        .append_pair("limit", &config.search_limit.to_string())
                        .append_pair("offset", "0")
                        .append_pair("rating", &config.rating)
                        .append_pair("lang", &config.lang);
                }
            }
        }

        Ok(url)
    }
}
