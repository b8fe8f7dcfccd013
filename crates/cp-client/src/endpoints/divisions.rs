//! Division endpoints

use super::{impl_endpoint_base, EndpointBase};
use crate::transport::Transport;
use cp_core::{Credentials, Resource, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Division endpoints
pub struct DivisionEndpoints {
  transport: Arc<Transport>,
}

impl DivisionEndpoints {
  /// Create a new division endpoints instance
  pub fn new(transport: Arc<Transport>) -> Self {
    Self { transport }
  }

  /// List the divisions visible to the API consumer
  #[instrument(skip(self, creds))]
  pub async fn list(&self, creds: &Credentials) -> Result<Value> {
    self.call(creds, Resource::Divisions, None, None).await
  }
}

impl_endpoint_base!(DivisionEndpoints);
