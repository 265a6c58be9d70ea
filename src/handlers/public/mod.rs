// Public handlers (no authentication)
pub mod health;
pub mod media;
pub mod root;

pub use health::health;
pub use media::media_get;
pub use root::root;
