// StreamGate Provider Clients
//
// This crate contains pure HTTP client implementations for the upstream
// source aggregators. Clients only fetch and classify payloads; they know
// nothing about quality policy, proxy wrapping or the orchestrator.
//
// Architecture:
// - streamgate-media-providers: Pure HTTP clients + raw payload types (playlist, direct)
// - streamgate-core/provider: StreamProvider adapters calling these clients
// - streamgate-core/service: ResolutionService fanning keys out to the adapters

// Shared error types
pub mod error;

// Request plumbing and lenient payload decoding shared by every client
pub mod payload;
pub mod request;

// HTTP clients
pub mod direct;
pub mod playlist;

// Re-export client types for convenience
pub use direct::DirectAggregatorClient;
pub use error::ProviderClientError;
pub use playlist::PlaylistAggregatorClient;
pub use request::{TitlePath, BROWSER_USER_AGENT};
