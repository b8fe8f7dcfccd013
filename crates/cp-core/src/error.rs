use thiserror::Error;

/// The main error type for cp-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Serialization/Deserialization error
  #[error("Serialization error: {0}")]
  Serde(#[from] serde_json::Error),

  /// A URL could not be built from the configured host and path
  #[error("Invalid URL: {0}")]
  InvalidUrl(String),

  /// The host could not be reached at all
  #[error("Unable to reach {host}: {message}")]
  TransportUnreachable { host: String, message: String },

  /// Any response other than 200 OK
  #[error("HTTP error {status}: {body}")]
  Http { status: u16, body: String },

  /// A 200 response whose body is not valid JSON
  #[error("Failed to parse response: {message}")]
  ResponseParse { message: String, body: String },

  /// The token endpoint answered but did not hand out a usable token
  #[error("Authentication failed: {0}")]
  Authentication(String),

  /// Request shape does not match the resource (body or time window)
  #[error("Invalid request: {0}")]
  InvalidRequest(String),

  /// Only GET and POST are dispatched
  #[error("Unsupported HTTP method: {0}")]
  UnsupportedMethod(String),

  /// Relative time window that cannot be resolved
  #[error("Invalid time window: {0}")]
  InvalidTimeWindow(String),

  /// Timezone name not found in the tz database
  #[error(
    "Unknown timezone '{0}'. Use tz database format: \
     http://en.wikipedia.org/wiki/List_of_tz_database_time_zones"
  )]
  UnknownTimezone(String),
}

impl Error {
  /// HTTP status carried by an [`Error::Http`], if any
  pub fn status(&self) -> Option<u16> {
    match self {
      Error::Http { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// True when the request never reached the server
  pub fn is_transport(&self) -> bool {
    matches!(self, Error::TransportUnreachable { .. })
  }
}

/// Result type alias for cp-* crates
pub type Result<T> = std::result::Result<T, Error>;
