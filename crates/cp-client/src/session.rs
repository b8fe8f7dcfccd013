/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Bearer token session and OAuth2 client-credentials authentication

use base64::{engine::general_purpose::STANDARD, Engine as _};
use cp_core::{Config, Credentials, Error, Result, EXPIRED_TOKEN_MARKER};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Process-local authentication state.
///
/// A session is authenticated exactly when it holds a token, so the token and
/// the flag can never drift apart.
#[derive(Default)]
pub struct Session {
  token: Option<String>,
}

impl Session {
  /// A fresh, unauthenticated session
  pub fn new() -> Self {
    Self::default()
  }

  /// Whether a bearer token is currently held
  pub fn is_authenticated(&self) -> bool {
    self.token.is_some()
  }

  /// The raw bearer token, if any
  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  /// Drop the token, forcing re-authentication on the next call
  pub fn clear(&mut self) {
    self.token = None;
  }

  /// `Authorization` header value: `Bearer <base64(token)>`
  pub fn authorization(&self) -> Option<String> {
    self.token.as_ref().map(|token| format!("Bearer {}", STANDARD.encode(token)))
  }

  /// Request a token unless one is already held
  #[instrument(skip(self, client, config, creds), fields(host = %config.host))]
  pub async fn ensure_authenticated(
    &mut self,
    client: &Client,
    config: &Config,
    creds: &Credentials,
  ) -> Result<()> {
    if self.is_authenticated() {
      return Ok(());
    }

    let url = config.token_url()?;
    debug!("Making auth request to: {}", url);

    let form = [
      ("grant_type", "client_credentials"),
      ("client_id", creds.client_id.as_str()),
      ("client_secret", creds.client_secret.as_str()),
    ];

    let response = client.post(url).form(&form).send().await.map_err(|e| {
      Error::TransportUnreachable { host: config.host.clone(), message: e.to_string() }
    })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| Error::TransportUnreachable {
      host: config.host.clone(),
      message: format!("Failed to read token response: {e}"),
    })?;

    let token = extract_token(status, &text)?;
    debug!("Received token ({} chars)", token.len());
    info!("Authenticated against {}", config.host);

    self.token = Some(token);
    Ok(())
  }

  /// Clear the session if `body` carries an expired-token message.
  ///
  /// Returns `true` when the token was dropped. The current call is not
  /// retried; the next call re-authenticates.
  pub fn check_expiry(&mut self, body: &Value) -> bool {
    let expired = body
      .get("Message")
      .and_then(Value::as_str)
      .is_some_and(|message| message.contains(EXPIRED_TOKEN_MARKER));

    if expired {
      warn!("Token was expired and has been cleared, try again");
      self.clear();
    }
    expired
  }
}

impl std::fmt::Debug for Session {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Session").field("authenticated", &self.is_authenticated()).finish()
  }
}

/// Pull `access_token` out of a token endpoint response
fn extract_token(status: StatusCode, text: &str) -> Result<String> {
  if status != StatusCode::OK {
    return Err(Error::Http { status: status.as_u16(), body: text.to_string() });
  }

  let body: Value = serde_json::from_str(text)
    .map_err(|e| Error::Authentication(format!("Token response is not JSON: {e}")))?;

  match body.get("access_token").and_then(Value::as_str) {
    Some(token) if !token.is_empty() => Ok(token.to_string()),
    Some(_) => Err(Error::Authentication("Token response has an empty access_token".to_string())),
    None => Err(Error::Authentication("Token response has no access_token field".to_string())),
  }
}
