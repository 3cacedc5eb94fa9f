//! # pco-client
//!
//! An async client for the Planning Center Online (PCO) REST API.
//!
//! ## Features
//!
//! - **Managed Requests**: GET/POST/PATCH/DELETE with URL cleanup and typed errors
//! - **Rate Limits**: 429 responses are waited out using `Retry-After`, then re-sent
//! - **Timeouts**: timed-out requests are retried a configurable number of times
//! - **Pagination**: lazily iterate every object of a list endpoint
//! - **Auth**: Personal Access Tokens and OAuth access tokens
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pco_client::{ClientConfig, IterateOptions, PcoClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder()
//!         .personal_access_token("app-id", "secret")
//!         .build();
//!     let client = PcoClient::new(config)?;
//!
//!     let mut people = client.iterate("/people/v2/people", IterateOptions::new());
//!     while let Some(person) = people.next_record().await {
//!         println!("{}", person?.data["attributes"]["name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ PcoClient::iterate → PageSequencer (links.next)      │
//! ├──────────────────────────────────────────────────────┤
//! │ PcoClient::request_* → URL cleanup → status check    │
//! ├──────────────────────────────────────────────────────┤
//! │ RateLimitGuard (429 + Retry-After, unbounded)        │
//! ├──────────────────────────────────────────────────────┤
//! │ Timeout retries → optional throttle                  │
//! ├──────────────────────────────────────────────────────┤
//! │ Transport (reqwest + Authenticator)                  │
//! └──────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Client configuration
pub mod config;

/// Authentication
pub mod auth;

/// HTTP client with rate-limit handling
pub mod http;

/// List iteration
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{ApiResponse, PcoClient, QueryParams};
pub use pagination::{IterateOptions, PageSequencer, Record};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
