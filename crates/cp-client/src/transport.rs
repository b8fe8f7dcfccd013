//! HTTP transport layer for Catchpoint API requests

use crate::session::Session;
use cp_core::{Config, Credentials, Error, HttpMethod, Resource, Result};
use reqwest::{header, Client, Method, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Query parameters forwarded verbatim to the API
pub type Params = HashMap<String, String>;

const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP transport layer owning the session.
///
/// The session lock is held for a whole call (authenticate, dispatch, expiry
/// check), so calls made through one transport never interleave.
pub struct Transport {
  client: Client,
  config: Config,
  session: Mutex<Session>,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(config: Config) -> Result<Self> {
    let mut builder = Client::builder().user_agent("cp-client/0.1.0");
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder
      .build()
      .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self { client, config, session: Mutex::new(Session::new()) })
  }

  /// Host configuration this transport talks to
  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Whether a bearer token is currently held
  pub async fn is_authenticated(&self) -> bool {
    self.session.lock().await.is_authenticated()
  }

  /// Acquire a token unless one is already held
  pub async fn authenticate(&self, creds: &Credentials) -> Result<()> {
    let mut session = self.session.lock().await;
    session.ensure_authenticated(&self.client, &self.config, creds).await
  }

  /// Authenticate if needed, then call `resource`
  ///
  /// # Arguments
  ///
  /// * `creds` - Client credentials, used only when a token must be requested
  /// * `resource` - Which endpoint to call; decides path and method
  /// * `params` - Optional query parameters
  /// * `body` - JSON body for POST resources
  #[instrument(skip(self, creds, resource, params, body), fields(resource = resource.name()))]
  pub async fn request(
    &self,
    creds: &Credentials,
    resource: &Resource,
    params: Option<&Params>,
    body: Option<&Value>,
  ) -> Result<Value> {
    Self::check_body(resource, body)?;

    let mut session = self.session.lock().await;
    session.ensure_authenticated(&self.client, &self.config, creds).await?;

    let url = self.build_url(resource, params)?;
    let method = match resource.method() {
      HttpMethod::Get => Method::GET,
      HttpMethod::Post => Method::POST,
    };

    self.send(&mut session, url, method, body).await
  }

  /// Send an already-built request with the current token
  ///
  /// Only GET and POST are supported. Fails with [`Error::Authentication`]
  /// if no token is held yet.
  pub async fn dispatch(&self, url: Url, method: Method, body: Option<&Value>) -> Result<Value> {
    let mut session = self.session.lock().await;
    self.send(&mut session, url, method, body).await
  }

  /// Build the full URL for a resource, query parameters in sorted order
  pub fn build_url(&self, resource: &Resource, params: Option<&Params>) -> Result<Url> {
    let mut url = self.config.api_url(&resource.path())?;

    if let Some(params) = params.filter(|p| !p.is_empty()) {
      let mut pairs: Vec<_> = params.iter().collect();
      pairs.sort();
      let mut query_pairs = url.query_pairs_mut();
      for (key, value) in pairs {
        query_pairs.append_pair(key, value);
      }
    }

    Ok(url)
  }

  /// POST resources carry a JSON body, GET resources never do
  fn check_body(resource: &Resource, body: Option<&Value>) -> Result<()> {
    match (resource.accepts_body(), body.is_some()) {
      (true, false) => {
        Err(Error::InvalidRequest(format!("{} requires a request body", resource.name())))
      }
      (false, true) => {
        Err(Error::InvalidRequest(format!("{} does not take a request body", resource.name())))
      }
      _ => Ok(()),
    }
  }

  async fn send(
    &self,
    session: &mut Session,
    url: Url,
    method: Method,
    body: Option<&Value>,
  ) -> Result<Value> {
    if method != Method::GET && method != Method::POST {
      return Err(Error::UnsupportedMethod(method.to_string()));
    }

    let authorization = session
      .authorization()
      .ok_or_else(|| Error::Authentication("No bearer token; authenticate first".to_string()))?;

    debug!("Making {} request to: {}", method, url);
    let mut request = self
      .client
      .request(method, url)
      .header(header::ACCEPT, CONTENT_TYPE_JSON)
      .header(header::AUTHORIZATION, authorization);

    if let Some(body) = body {
      request = request
        .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
        .body(serde_json::to_string(body)?);
    }

    let response = request.send().await.map_err(|e| self.unreachable(e))?;
    let status = response.status();
    let text = response.text().await.map_err(|e| self.unreachable(e))?;
    debug!("Response status {} with {} bytes", status, text.len());

    if status != StatusCode::OK {
      error!("Request failed with status: {}", status);
      return Err(Error::Http { status: status.as_u16(), body: text });
    }

    let data: Value = serde_json::from_str(&text).map_err(|e| {
      error!("Failed to parse JSON response: {}", e);
      Error::ResponseParse { message: e.to_string(), body: text.clone() }
    })?;

    if session.check_expiry(&data) {
      info!("Session cleared after expired token response");
    }

    Ok(data)
  }

  fn unreachable(&self, e: reqwest::Error) -> Error {
    Error::TransportUnreachable { host: self.config.host.clone(), message: e.to_string() }
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport").field("config", &self.config).finish()
  }
}
