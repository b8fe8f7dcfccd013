//! Endpoint groups, one per Catchpoint API area

pub mod divisions;
pub mod folders;
pub mod nodes;
pub mod performance;
pub mod products;

use crate::transport::{Params, Transport};
use cp_core::{resolve_window, Credentials, Error, Resource, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Base trait for endpoint implementations
///
/// Provides common functionality needed by all endpoint modules
#[allow(async_fn_in_trait)]
pub trait EndpointBase {
  /// Get a reference to the transport layer
  fn transport(&self) -> &Arc<Transport>;

  /// Authenticate if needed and call `resource`
  async fn call(
    &self,
    creds: &Credentials,
    resource: Resource,
    params: Option<&Params>,
    body: Option<&Value>,
  ) -> Result<Value> {
    self.transport().request(creds, &resource, params, body).await
  }
}

/// Macro to implement the EndpointBase trait for endpoint structs
macro_rules! impl_endpoint_base {
  ($struct_name:ident) => {
    impl EndpointBase for $struct_name {
      fn transport(&self) -> &Arc<Transport> {
        &self.transport
      }
    }
  };
}

pub(crate) use impl_endpoint_base;

/// Serialize a caller-supplied request body
pub(crate) fn to_body<B>(body: &B) -> Result<Value>
where
  B: Serialize + ?Sized,
{
  Ok(serde_json::to_value(body)?)
}

/// Resolve a time window into `startTime`/`endTime` query parameters.
///
/// Only resources that take a time range accept one. Bounds that are absent
/// after resolution are left out.
pub(crate) fn window_params(
  resource: &Resource,
  start: Option<&str>,
  end: Option<&str>,
  tz: &str,
) -> Result<Params> {
  if !resource.accepts_time_range() {
    return Err(Error::InvalidRequest(format!("{} does not take a time range", resource.name())));
  }

  let (start, end) = resolve_window(start, end, tz)?;

  let mut params = Params::new();
  if let Some(start) = start {
    params.insert("startTime".to_string(), start);
  }
  if let Some(end) = end {
    params.insert("endTime".to_string(), end);
  }
  Ok(params)
}
