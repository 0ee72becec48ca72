//! Shared media proxy
//!
//! Fetches upstream playlists, captions and segments on the player's behalf,
//! rewriting HLS playlists so every URI line routes back through the proxy and
//! injecting permissive CORS headers on every answer.
//!
//! The same [`ManifestProxy`] backs two transports: the axum routes in
//! `streamgate-api` and the custom-scheme handler in [`protocol`].

pub mod cors;
pub mod playlist;
pub mod protocol;
mod proxy;

pub use proxy::{HlsProxy, ManifestProxy, ProxyBody, ProxyError, ProxyRequest, ProxyResponse};
