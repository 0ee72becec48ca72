mod media_key;
mod stream;

pub use media_key::{MediaKey, MediaKeyError, MediaKind};
pub use stream::{Caption, DeliveryType, ResolutionResult, Source};
