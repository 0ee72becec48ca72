//! Bootstrap module for server initialization
//!
//! Loads configuration and wires the resolution service from it.

pub mod config;
pub mod services;

pub use config::load_config;
pub use services::{build_provider_client, init_resolution_service};
