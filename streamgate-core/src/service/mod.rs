// Module: service
// Business logic layer

pub mod resolution;

pub use resolution::ResolutionService;
