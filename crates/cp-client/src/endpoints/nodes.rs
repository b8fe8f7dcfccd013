//! Node and node group endpoints

use super::{impl_endpoint_base, EndpointBase};
use crate::transport::Transport;
use cp_core::{Credentials, Resource, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Monitoring node endpoints
pub struct NodeEndpoints {
  transport: Arc<Transport>,
}

impl NodeEndpoints {
  /// Create a new node endpoints instance
  pub fn new(transport: Arc<Transport>) -> Self {
    Self { transport }
  }

  /// List the nodes available to the API consumer
  #[instrument(skip(self, creds))]
  pub async fn list(&self, creds: &Credentials) -> Result<Value> {
    self.call(creds, Resource::Nodes, None, None).await
  }

  /// Fetch a single node
  #[instrument(skip(self, creds))]
  pub async fn get(&self, creds: &Credentials, node_id: &str) -> Result<Value> {
    self.call(creds, Resource::Node(node_id.to_string()), None, None).await
  }

  /// List node groups
  #[instrument(skip(self, creds))]
  pub async fn groups(&self, creds: &Credentials) -> Result<Value> {
    self.call(creds, Resource::NodeGroups, None, None).await
  }

  /// Fetch a single node group
  #[instrument(skip(self, creds))]
  pub async fn group(&self, creds: &Credentials, group_id: &str) -> Result<Value> {
    self.call(creds, Resource::NodeGroup(group_id.to_string()), None, None).await
  }
}

impl_endpoint_base!(NodeEndpoints);
