/// GIPHY response decoding
///
/// The raw envelope is `{ data: [ { images: { fixed_width: { url } } } ] }`.
/// Only the fixed-width rendition is used; every other field is ignored.

use reqwest::Url;
use serde::Deserialize;

use crate::error::{LayerError, Result};

/// Raw server response
#[derive(Deserialize, Debug)]
struct RawServerResponse {
    data: Vec<GifObject>,
}

#[derive(Deserialize, Debug)]
struct GifObject {
    images: ImagesInfo,
}

#[derive(Deserialize, Debug)]
struct ImagesInfo {
    fixed_width: FixedWidthImageInfo,
}

#[derive(Deserialize, Debug)]
struct FixedWidthImageInfo {
    url: String,
}

/// Decode a response body into the ordered list of GIF URLs.
///
/// Entries whose URL does not parse are skipped; the rest keep server order.
/// A body that is not a valid envelope fails as a whole.
pub fn decode_urls(body: &[u8]) -> Result<Vec<Url>> {
    let response: RawServerResponse =
        serde_json::from_slice(body).map_err(|e| LayerError::Decode(e.to_string()))?;

    let total = response.data.len();
    let urls: Vec<Url> = response
        .data
        .into_iter()
        .filter_map(|object| Url::parse(&object.images.fixed_width.url).ok())
        .collect();

    if urls.len() < total {
        log::debug!("Skipped {} entries with unparseable URLs", total - urls.len());
    }

    Ok(urls)
}
