//! Source error types.

use thiserror::Error;

/// Errors that can occur when talking to a media source.
#[derive(Debug, Error)]
pub enum SourceError {
  #[error("source unavailable: {0}")]
  SourceUnavailable(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("request timed out")]
  Timeout,

  #[error("unsupported item type: {0}")]
  UnsupportedItemType(String),

  #[error("item is not playable: {0}")]
  NotPlayable(String),

  #[error("not connected to server")]
  NotConnected,

  #[error("invalid server URL: {0}")]
  InvalidUrl(String),

  #[error("JSON serialization error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("{0}")]
  Unknown(String),
}

impl From<reqwest::Error> for SourceError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      SourceError::Timeout
    } else if err.is_connect() {
      SourceError::SourceUnavailable(err.to_string())
    } else if let Some(status) = err.status() {
      match status.as_u16() {
        401 | 403 => SourceError::Unauthorized(err.to_string()),
        _ => SourceError::Unknown(err.to_string()),
      }
    } else {
      SourceError::Unknown(err.to_string())
    }
  }
}

impl SourceError {
  /// Map an unexpected HTTP status to the error taxonomy.
  pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
    match status.as_u16() {
      401 | 403 => SourceError::Unauthorized(format!("HTTP {}: {}", status, body)),
      408 | 504 => SourceError::Timeout,
      502 | 503 => SourceError::SourceUnavailable(format!("HTTP {}: {}", status, body)),
      _ => SourceError::Unknown(format!("HTTP {}: {}", status, body)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use reqwest::StatusCode;

  #[test]
  fn test_status_mapping() {
    assert!(matches!(
      SourceError::from_status(StatusCode::UNAUTHORIZED, String::new()),
      SourceError::Unauthorized(_)
    ));
    assert!(matches!(
      SourceError::from_status(StatusCode::FORBIDDEN, String::new()),
      SourceError::Unauthorized(_)
    ));
    assert!(matches!(
      SourceError::from_status(StatusCode::REQUEST_TIMEOUT, String::new()),
      SourceError::Timeout
    ));
    assert!(matches!(
      SourceError::from_status(StatusCode::GATEWAY_TIMEOUT, String::new()),
      SourceError::Timeout
    ));
    assert!(matches!(
      SourceError::from_status(StatusCode::BAD_GATEWAY, String::new()),
      SourceError::SourceUnavailable(_)
    ));
    assert!(matches!(
      SourceError::from_status(StatusCode::SERVICE_UNAVAILABLE, String::new()),
      SourceError::SourceUnavailable(_)
    ));
    assert!(matches!(
      SourceError::from_status(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
      SourceError::Unknown(_)
    ));
  }
}
