//! Performance data endpoints
//!
//! Raw chart data and favorite charts. Time windows are either absolute
//! timestamps or relative to now (`end = "now"`, `start = "-60"` for the last
//! hour); relative windows are resolved in `tz` before the request is made.

use super::{impl_endpoint_base, window_params, EndpointBase};
use crate::transport::Transport;
use cp_core::{Credentials, Resource, Result, DEFAULT_TIMEZONE};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Performance data endpoints
pub struct PerformanceEndpoints {
  transport: Arc<Transport>,
}

impl PerformanceEndpoints {
  /// Create a new performance endpoints instance
  pub fn new(transport: Arc<Transport>) -> Self {
    Self { transport }
  }

  /// Raw performance data for a test over a time window
  ///
  /// # Arguments
  ///
  /// * `test_id` - Test to fetch data for
  /// * `start` - Absolute start, or negative minutes when `end` is `"now"`
  /// * `end` - Absolute end, or `"now"`
  /// * `tz` - tz database name used to resolve relative windows (default `UTC`)
  ///
  /// # Examples
  ///
  /// ```rust,no_run
  /// # use cp_client::CatchpointClient;
  /// # use cp_core::Credentials;
  /// # async fn run(client: CatchpointClient, creds: Credentials) -> cp_core::Result<()> {
  /// // Last hour, Pacific time
  /// let raw = client.performance().raw(&creds, "12345", "-60", "now", Some("US/Pacific")).await?;
  /// # Ok(())
  /// # }
  /// ```
  #[instrument(skip(self, creds))]
  pub async fn raw(
    &self,
    creds: &Credentials,
    test_id: &str,
    start: &str,
    end: &str,
    tz: Option<&str>,
  ) -> Result<Value> {
    let resource = Resource::RawPerformance(test_id.to_string());
    let params = window_params(&resource, Some(start), Some(end), tz.unwrap_or(DEFAULT_TIMEZONE))?;
    self.call(creds, resource, Some(&params), None).await
  }

  /// List favorite charts
  #[instrument(skip(self, creds))]
  pub async fn favorite_charts(&self, creds: &Credentials) -> Result<Value> {
    self.call(creds, Resource::FavoriteCharts, None, None).await
  }

  /// Details of a favorite chart
  #[instrument(skip(self, creds))]
  pub async fn favorite_details(&self, creds: &Credentials, favorite_id: &str) -> Result<Value> {
    self.call(creds, Resource::FavoriteChart(favorite_id.to_string()), None, None).await
  }

  /// Data for a favorite chart
  ///
  /// The chart's saved timeframe and test set are used unless overridden.
  /// The window only applies when both `start` and `end` are given.
  #[instrument(skip(self, creds))]
  pub async fn favorite_data(
    &self,
    creds: &Credentials,
    favorite_id: &str,
    start: Option<&str>,
    end: Option<&str>,
    tz: Option<&str>,
    tests: Option<&str>,
  ) -> Result<Value> {
    let resource = Resource::FavoriteChartData(favorite_id.to_string());
    let mut params = match (start, end) {
      (Some(_), Some(_)) => window_params(&resource, start, end, tz.unwrap_or(DEFAULT_TIMEZONE))?,
      _ => Default::default(),
    };
    if let Some(tests) = tests {
      params.insert("tests".to_string(), tests.to_string());
    }

    self.call(creds, resource, Some(&params), None).await
  }
}

impl_endpoint_base!(PerformanceEndpoints);
