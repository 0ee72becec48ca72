//! HTTP binding of the stream resolution service and media proxy

pub mod http;

pub use http::{create_router, AppState};
