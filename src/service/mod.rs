mod directory;

pub use directory::{LinkService, DEFAULT_MAX_ATTEMPTS};
