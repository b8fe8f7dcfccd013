//! Folder endpoints

use super::{impl_endpoint_base, to_body, EndpointBase};
use crate::transport::{Params, Transport};
use cp_core::{Credentials, Resource, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Folder endpoints
pub struct FolderEndpoints {
  transport: Arc<Transport>,
}

impl FolderEndpoints {
  /// Create a new folder endpoints instance
  pub fn new(transport: Arc<Transport>) -> Self {
    Self { transport }
  }

  /// List folders, optionally filtered by query parameters
  #[instrument(skip(self, creds, params))]
  pub async fn list(&self, creds: &Credentials, params: Option<&Params>) -> Result<Value> {
    self.call(creds, Resource::Folders, params, None).await
  }

  /// Fetch a folder with all of its sections
  #[instrument(skip(self, creds))]
  pub async fn get(&self, creds: &Credentials, folder_id: &str) -> Result<Value> {
    self.call(creds, Resource::Folder(folder_id.to_string()), None, None).await
  }

  /// Create a new folder
  #[instrument(skip(self, creds, folder))]
  pub async fn create<T>(&self, creds: &Credentials, folder: &T) -> Result<Value>
  where
    T: Serialize + ?Sized,
  {
    let body = to_body(folder)?;
    self.call(creds, Resource::FolderCreate, None, Some(&body)).await
  }

  /// Set the schedule section of an existing folder
  #[instrument(skip(self, creds, schedule))]
  pub async fn create_schedule<T>(
    &self,
    creds: &Credentials,
    folder_id: &str,
    schedule: &T,
  ) -> Result<Value>
  where
    T: Serialize + ?Sized,
  {
    let body = to_body(schedule)?;
    self.call(creds, Resource::FolderSchedule(folder_id.to_string()), None, Some(&body)).await
  }
}

impl_endpoint_base!(FolderEndpoints);
