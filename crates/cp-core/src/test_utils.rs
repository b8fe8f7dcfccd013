//! Shared fixtures for tests that talk to a mock Catchpoint server

use crate::{Config, Credentials, Result};
use serde_json::{json, Value};

/// Token handed out by [`token_body`]
pub const TEST_TOKEN: &str = "test-access-token";

/// Credentials used across test suites
pub fn test_credentials() -> Credentials {
  Credentials::new("test-client-id", "test-client-secret")
}

/// Config pointing at a mock server's base URL
pub fn mock_config(base_url: &str) -> Result<Config> {
  Config::from_base_url(base_url)
}

/// A token endpoint response carrying `token`
pub fn token_body(token: &str) -> Value {
  json!({
    "access_token": token,
    "token_type": "bearer",
    "expires_in": 1800
  })
}

/// A response body signalling that the presented token has expired
pub fn expired_body() -> Value {
  json!({ "Message": "Authorization has been denied: Expired token" })
}
