// The `utils` module holds the Google authentication helper and the template engine.

pub mod google_auth;
pub mod template;

pub use crate::utils::template::{TEngine, TEngineError};
