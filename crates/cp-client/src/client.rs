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

//! The `CatchpointClient` facade

use crate::endpoints::{
  divisions::DivisionEndpoints, folders::FolderEndpoints, instant_tests::InstantTestEndpoints,
  nodes::NodeEndpoints, performance::PerformanceEndpoints, products::ProductEndpoints,
  synthetic_tests::TestEndpoints,
};

use crate::transport::Transport;
use cp_core::{Config, Credentials, Result};
use std::sync::Arc;

/// Main Catchpoint API client
///
/// Provides access to all Catchpoint API endpoints through organized endpoint modules.
/// Handles token acquisition, expiry detection and transport concerns automatically.
///
/// Credentials are passed on every call and only used when a new token is
/// needed. When a response reports an expired token the session is cleared
/// and that response is returned as-is; retry the operation once and the
/// client will re-authenticate first.
///
/// # Examples
///
/// ```rust,no_run
/// use cp_client::CatchpointClient;
/// use cp_core::{Config, Credentials};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CatchpointClient::new(Config::from_env()?)?;
///     let creds = Credentials::from_env()?;
///
///     let test = client.tests().get(&creds, "12345").await?;
///     println!("{}", test);
///
///     let raw = client.performance().raw(&creds, "12345", "-60", "now", None).await?;
///     println!("{}", raw);
///
///     Ok(())
/// }
/// ```
pub struct CatchpointClient {
  transport: Arc<Transport>,
}

impl CatchpointClient {
  /// Create a new Catchpoint API client
  ///
  /// # Errors
  ///
  /// Returns an error if the HTTP client cannot be created.
  pub fn new(config: Config) -> Result<Self> {
    let transport = Arc::new(Transport::new(config)?);
    Ok(Self { transport })
  }

  /// Client for `io.catchpoint.com` with the default API path
  pub fn with_defaults() -> Result<Self> {
    Self::new(Config::default())
  }

  /// Get access to synthetic test endpoints
  pub fn tests(&self) -> TestEndpoints {
    TestEndpoints::new(self.transport.clone())
  }

  /// Get access to folder endpoints
  pub fn folders(&self) -> FolderEndpoints {
    FolderEndpoints::new(self.transport.clone())
  }

  /// Get access to product endpoints
  pub fn products(&self) -> ProductEndpoints {
    ProductEndpoints::new(self.transport.clone())
  }

  /// Get access to node and node group endpoints
  pub fn nodes(&self) -> NodeEndpoints {
    NodeEndpoints::new(self.transport.clone())
  }

  /// Get access to division endpoints
  pub fn divisions(&self) -> DivisionEndpoints {
    DivisionEndpoints::new(self.transport.clone())
  }

  /// Get access to raw and favorite chart performance data
  pub fn performance(&self) -> PerformanceEndpoints {
    PerformanceEndpoints::new(self.transport.clone())
  }

  /// Get access to instant (on-demand) test endpoints
  pub fn instant_tests(&self) -> InstantTestEndpoints {
    InstantTestEndpoints::new(self.transport.clone())
  }

  /// Request a token now instead of on the first call
  pub async fn authenticate(&self, creds: &Credentials) -> Result<()> {
    self.transport.authenticate(creds).await
  }

  /// Whether the client currently holds a bearer token
  pub async fn is_authenticated(&self) -> bool {
    self.transport.is_authenticated().await
  }

  /// The underlying transport, for endpoints without a dedicated method
  pub fn transport(&self) -> &Arc<Transport> {
    &self.transport
  }
}

impl std::fmt::Debug for CatchpointClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CatchpointClient").field("transport", &self.transport).finish()
  }
}
