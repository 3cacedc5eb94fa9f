//! Authentication module
//!
//! Supports: Personal Access Token (HTTP Basic) and OAuth access tokens (Bearer)

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, AuthType};
