pub mod config;
pub mod error;
pub mod time;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::{Config, Credentials};
pub use error::{Error, Result};
pub use time::{resolve_window, resolve_window_at};

/// Default Catchpoint host
pub const DEFAULT_HOST: &str = "io.catchpoint.com";

/// Default versioned API path
pub const DEFAULT_API_URI: &str = "ui/api/v1";

/// Default URL scheme
pub const DEFAULT_SCHEME: &str = "https";

/// Token endpoint path, fixed regardless of `api_uri`
pub const TOKEN_PATH: &str = "ui/api/token";

/// Substring of the `Message` field that signals an expired bearer token
pub const EXPIRED_TOKEN_MARKER: &str = "Expired token";

/// Default timezone for relative time windows
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// HTTP methods the API is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
  Get,
  Post,
}

impl std::fmt::Display for HttpMethod {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      HttpMethod::Get => write!(f, "GET"),
      HttpMethod::Post => write!(f, "POST"),
    }
  }
}

/// Every Catchpoint resource the client can call.
///
/// String payloads are path parameters (test, folder, node ids and so on).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
  // Performance data
  RawPerformance(String),
  FavoriteCharts,
  FavoriteChart(String),
  FavoriteChartData(String),

  // Nodes
  Nodes,
  Node(String),
  NodeGroups,
  NodeGroup(String),

  // Products
  Products,
  Product(String),
  ProductCreate,

  // Folders
  Folders,
  Folder(String),
  FolderCreate,
  FolderSchedule(String),

  // Tests
  Tests,
  Test(String),
  TestCreate,
  TestUpdateStatus,

  // Instant (on-demand) tests
  InstantTest(String),
  InstantTestRun,

  // Divisions
  Divisions,
}

impl Resource {
  /// Path relative to the API base
  pub fn path(&self) -> String {
    match self {
      Resource::RawPerformance(id) => format!("performance/raw/{id}"),
      Resource::FavoriteCharts => "performance/favoriteCharts".to_string(),
      Resource::FavoriteChart(id) => format!("performance/favoriteCharts/{id}"),
      Resource::FavoriteChartData(id) => format!("performance/favoriteCharts/{id}/data"),

      Resource::Nodes => "nodes".to_string(),
      Resource::Node(id) => format!("nodes/{id}"),
      Resource::NodeGroups => "nodeGroups".to_string(),
      Resource::NodeGroup(id) => format!("nodeGroups/{id}"),

      Resource::Products => "products".to_string(),
      Resource::Product(id) => format!("products/{id}/allSections"),
      Resource::ProductCreate => "products/0".to_string(),

      Resource::Folders => "folders".to_string(),
      Resource::Folder(id) => format!("folders/{id}/allSections"),
      Resource::FolderCreate => "folders/0".to_string(),
      Resource::FolderSchedule(id) => format!("folders/{id}/scheduleSection"),

      Resource::Tests => "tests".to_string(),
      Resource::Test(id) => format!("tests/{id}/allSections"),
      Resource::TestCreate => "tests/0".to_string(),
      Resource::TestUpdateStatus => "tests/updateStatus".to_string(),

      Resource::InstantTest(id) => format!("onDemandTest/{id}"),
      Resource::InstantTestRun => "onDemandTest/0".to_string(),

      Resource::Divisions => "divisions".to_string(),
    }
  }

  /// Reads are GET, creates and updates are POST
  pub fn method(&self) -> HttpMethod {
    if self.accepts_body() {
      HttpMethod::Post
    } else {
      HttpMethod::Get
    }
  }

  /// Whether the resource takes a JSON request body
  pub fn accepts_body(&self) -> bool {
    matches!(
      self,
      Resource::ProductCreate
        | Resource::FolderCreate
        | Resource::FolderSchedule(_)
        | Resource::TestCreate
        | Resource::TestUpdateStatus
        | Resource::InstantTestRun
    )
  }

  /// Whether the resource takes a `startTime`/`endTime` window
  pub fn accepts_time_range(&self) -> bool {
    matches!(self, Resource::RawPerformance(_) | Resource::FavoriteChartData(_))
  }

  /// Short name used in logs
  pub fn name(&self) -> &'static str {
    match self {
      Resource::RawPerformance(_) => "raw_chart",
      Resource::FavoriteCharts => "favorite_charts",
      Resource::FavoriteChart(_) => "favorite_details",
      Resource::FavoriteChartData(_) => "favorite_data",
      Resource::Nodes => "nodes",
      Resource::Node(_) => "node",
      Resource::NodeGroups => "node_groups",
      Resource::NodeGroup(_) => "node_group",
      Resource::Products => "products",
      Resource::Product(_) => "product",
      Resource::ProductCreate => "product_create",
      Resource::Folders => "folders",
      Resource::Folder(_) => "folder",
      Resource::FolderCreate => "folder_create",
      Resource::FolderSchedule(_) => "folder_create_schedule",
      Resource::Tests => "tests",
      Resource::Test(_) => "test",
      Resource::TestCreate => "test_create",
      Resource::TestUpdateStatus => "test_update_status",
      Resource::InstantTest(_) => "test_instant",
      Resource::InstantTestRun => "test_instant_run",
      Resource::Divisions => "divisions",
    }
  }
}

impl std::fmt::Display for Resource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} {}", self.method(), self.path())
  }
}
