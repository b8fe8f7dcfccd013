//! Product endpoints

use super::{impl_endpoint_base, to_body, EndpointBase};
use crate::transport::{Params, Transport};
use cp_core::{Credentials, Resource, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Product endpoints
pub struct ProductEndpoints {
  transport: Arc<Transport>,
}

impl ProductEndpoints {
  /// Create a new product endpoints instance
  pub fn new(transport: Arc<Transport>) -> Self {
    Self { transport }
  }

  /// List products, optionally filtered by query parameters
  #[instrument(skip(self, creds, params))]
  pub async fn list(&self, creds: &Credentials, params: Option<&Params>) -> Result<Value> {
    self.call(creds, Resource::Products, params, None).await
  }

  /// Fetch a product with all of its sections
  #[instrument(skip(self, creds))]
  pub async fn get(&self, creds: &Credentials, product_id: &str) -> Result<Value> {
    self.call(creds, Resource::Product(product_id.to_string()), None, None).await
  }

  /// Create a new product
  #[instrument(skip(self, creds, product))]
  pub async fn create<T>(&self, creds: &Credentials, product: &T) -> Result<Value>
  where
    T: Serialize + ?Sized,
  {
    let body = to_body(product)?;
    self.call(creds, Resource::ProductCreate, None, Some(&body)).await
  }
}

impl_endpoint_base!(ProductEndpoints);
