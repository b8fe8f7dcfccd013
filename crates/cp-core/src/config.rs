//! Configuration management for the Catchpoint client

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use url::Url;

/// Host configuration, fixed once the client is constructed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
  /// Host to connect to, optionally with a port
  pub host: String,

  /// Path of the versioned API below the host
  pub api_uri: String,

  /// URL scheme, `https` unless talking to a private or mock deployment
  pub scheme: String,

  /// Optional per-request timeout in seconds
  pub timeout_secs: Option<u64>,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      host: crate::DEFAULT_HOST.to_string(),
      api_uri: crate::DEFAULT_API_URI.to_string(),
      scheme: crate::DEFAULT_SCHEME.to_string(),
      timeout_secs: None,
    }
  }
}

impl Config {
  /// Create a config for a host and API path
  pub fn new(host: impl Into<String>, api_uri: impl Into<String>) -> Self {
    Config { host: host.into(), api_uri: api_uri.into(), ..Config::default() }
  }

  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let host = env::var("CATCHPOINT_HOST").unwrap_or_else(|_| crate::DEFAULT_HOST.to_string());

    let api_uri =
      env::var("CATCHPOINT_API_URI").unwrap_or_else(|_| crate::DEFAULT_API_URI.to_string());

    let scheme =
      env::var("CATCHPOINT_SCHEME").unwrap_or_else(|_| crate::DEFAULT_SCHEME.to_string());

    let timeout_secs = match env::var("CATCHPOINT_TIMEOUT_SECS") {
      Ok(raw) => Some(
        raw.parse().map_err(|_| Error::Config("Invalid CATCHPOINT_TIMEOUT_SECS".to_string()))?,
      ),
      Err(_) => None,
    };

    Ok(Config { host, api_uri, scheme, timeout_secs })
  }

  /// Derive scheme and host from a base URL such as `http://127.0.0.1:8080`
  pub fn from_base_url(base_url: &str) -> Result<Self> {
    let url = Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;

    let host = url
      .host_str()
      .ok_or_else(|| Error::Config(format!("Base URL has no host: {base_url}")))?;
    let host = match url.port() {
      Some(port) => format!("{host}:{port}"),
      None => host.to_string(),
    };

    Ok(Config { host, scheme: url.scheme().to_string(), ..Config::default() })
  }

  /// Token endpoint, `{scheme}://{host}/ui/api/token`
  pub fn token_url(&self) -> Result<Url> {
    self.parse(&format!("{}://{}/{}", self.scheme, self.host, crate::TOKEN_PATH))
  }

  /// Resource endpoint under the API base path
  pub fn api_url(&self, path: &str) -> Result<Url> {
    let base = self.api_uri.trim_matches('/');
    let path = path.trim_start_matches('/');
    if base.is_empty() {
      return self.parse(&format!("{}://{}/{}", self.scheme, self.host, path));
    }
    self.parse(&format!("{}://{}/{}/{}", self.scheme, self.host, base, path))
  }

  fn parse(&self, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))
  }
}

/// OAuth2 client credentials, supplied by the caller on every call
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
  pub client_id: String,
  pub client_secret: String,
}

impl Credentials {
  pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
    Credentials { client_id: client_id.into(), client_secret: client_secret.into() }
  }

  /// Read `CATCHPOINT_CLIENT_ID` and `CATCHPOINT_CLIENT_SECRET`
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let client_id = env::var("CATCHPOINT_CLIENT_ID")
      .map_err(|_| Error::Config("CATCHPOINT_CLIENT_ID not set".to_string()))?;
    let client_secret = env::var("CATCHPOINT_CLIENT_SECRET")
      .map_err(|_| Error::Config("CATCHPOINT_CLIENT_SECRET not set".to_string()))?;

    Ok(Credentials { client_id, client_secret })
  }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("client_id", &self.client_id)
      .field("client_secret", &"<redacted>")
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.host, "io.catchpoint.com");
    assert_eq!(config.api_uri, "ui/api/v1");
    assert_eq!(config.scheme, "https");
    assert_eq!(config.timeout_secs, None);
  }

  #[test]
  fn test_config_from_env() {
    env::set_var("CATCHPOINT_HOST", "cp.example.net");
    env::set_var("CATCHPOINT_TIMEOUT_SECS", "15");
    let config = Config::from_env().unwrap();
    assert_eq!(config.host, "cp.example.net");
    assert_eq!(config.timeout_secs, Some(15));
    assert_eq!(config.api_uri, "ui/api/v1");

    env::set_var("CATCHPOINT_TIMEOUT_SECS", "soon");
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    env::remove_var("CATCHPOINT_HOST");
    env::remove_var("CATCHPOINT_TIMEOUT_SECS");
  }

  #[test]
  fn test_token_url() {
    let config = Config::default();
    assert_eq!(config.token_url().unwrap().as_str(), "https://io.catchpoint.com/ui/api/token");
  }

  #[test]
  fn test_api_url_normalises_slashes() {
    let config = Config::new("io.catchpoint.com", "/ui/api/v1/");
    let url = config.api_url("/tests/12345/allSections").unwrap();
    assert_eq!(url.as_str(), "https://io.catchpoint.com/ui/api/v1/tests/12345/allSections");
  }

  #[test]
  fn test_api_url_with_empty_base() {
    for api_uri in ["", "/"] {
      let config = Config::new("cp.internal", api_uri);
      let url = config.api_url("tests").unwrap();
      assert_eq!(url.as_str(), "https://cp.internal/tests");
    }
  }

  #[test]
  fn test_from_base_url_keeps_port() {
    let config = Config::from_base_url("http://127.0.0.1:4545").unwrap();
    assert_eq!(config.scheme, "http");
    assert_eq!(config.host, "127.0.0.1:4545");
    assert_eq!(config.token_url().unwrap().as_str(), "http://127.0.0.1:4545/ui/api/token");
  }

  #[test]
  fn test_from_base_url_rejects_garbage() {
    assert!(matches!(Config::from_base_url("not a url"), Err(Error::InvalidUrl(_))));
  }

  #[test]
  fn test_credentials_debug_redacts_secret() {
    let creds = Credentials::new("id-1", "hunter2");
    let rendered = format!("{creds:?}");
    assert!(rendered.contains("id-1"));
    assert!(!rendered.contains("hunter2"));
  }
}
