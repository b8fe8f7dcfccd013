//! # cp-client
//!
//! An async client for the Catchpoint performance-monitoring REST API.
//!
//! ## Features
//!
//! - **OAuth2**: client-credentials token acquisition, cached per client
//! - **Expiry aware**: an "Expired token" response clears the session so the
//!   next call re-authenticates
//! - **Relative windows**: `start = "-60", end = "now"` resolved in any tz
//!   database timezone
//! - **Serialized**: one call at a time per client; the session is never raced
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cp_client::CatchpointClient;
//! use cp_core::{Config, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatchpointClient::new(Config::default())?;
//!     let creds = Credentials::new("my-client-id", "my-client-secret");
//!
//!     let tests = client.tests().list(&creds, None).await?;
//!     println!("{}", tests);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All methods return `Result<serde_json::Value, cp_core::Error>`. A non-200
//! response is `Error::Http { status, body }`; a body that is not JSON is
//! `Error::ResponseParse`. Nothing is retried.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod endpoints;
pub mod session;
pub mod transport;

pub use client::CatchpointClient;
pub use cp_core::{Config, Credentials, Error, Resource, Result};
pub use session::Session;
pub use transport::{Params, Transport};

pub use endpoints::{
  divisions::DivisionEndpoints, folders::FolderEndpoints, instant_tests::InstantTestEndpoints,
  nodes::NodeEndpoints, performance::PerformanceEndpoints, products::ProductEndpoints,
  synthetic_tests::TestEndpoints,
};
