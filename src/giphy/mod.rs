/// GIPHY sticker API
///
/// - Endpoint URLs (endpoint.rs)
/// - Response decoding (decode.rs)
/// - HTTP client (client.rs)

pub mod client;
pub mod decode;
pub mod endpoint;

pub use client::GiphyClient;
pub use endpoint::Endpoint;
