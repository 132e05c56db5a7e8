//! Configured media servers and adapter construction.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::source::jellyfin::JellyfinSource;
use crate::source::webdav::WebdavSource;
use crate::source::{SourceClient, SourceError};

/// Kind of a configured media server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServerKind {
  Jellyfin,
  Webdav,
}

/// One configured media server.
///
/// Credentials are carried as-is; obtaining them is the UI's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
  pub id: String,
  pub name: String,
  pub kind: ServerKind,
  pub base_url: String,

  /// WebDAV basic-auth user.
  #[serde(default)]
  pub username: Option<String>,
  /// WebDAV basic-auth password.
  #[serde(default)]
  pub password: Option<String>,

  /// Jellyfin access token, already obtained by the UI's login flow.
  #[serde(default)]
  pub access_token: Option<String>,
  /// Jellyfin user the token belongs to.
  #[serde(default)]
  pub user_id: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
  #[serde(default)]
  pub servers: Vec<ServerConfig>,
}

impl ServerConfig {
  /// Validate configuration values.
  pub fn validate(&self) -> Result<(), String> {
    if self.id.trim().is_empty() {
      return Err("Server id cannot be empty".to_string());
    }
    if self.name.trim().is_empty() {
      return Err("Server name cannot be empty".to_string());
    }
    if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
      return Err("Server URL must start with http:// or https://".to_string());
    }
    if self.kind == ServerKind::Jellyfin
      && (self.access_token.is_none() || self.user_id.is_none())
    {
      return Err("Jellyfin server needs an access token and user id".to_string());
    }
    Ok(())
  }
}

impl AppConfig {
  pub fn validate(&self) -> Result<(), String> {
    for server in &self.servers {
      server.validate()?;
    }
    Ok(())
  }
}

/// Construct the source adapter matching a server record.
pub fn build_source(config: &ServerConfig) -> Result<Arc<dyn SourceClient>, SourceError> {
  match config.kind {
    ServerKind::Webdav => {
      let source = WebdavSource::new(
        &config.id,
        &config.name,
        &config.base_url,
        config.username.clone(),
        config.password.clone(),
      )?;
      Ok(Arc::new(source))
    }
    ServerKind::Jellyfin => {
      let token = config
        .access_token
        .as_deref()
        .ok_or(SourceError::NotConnected)?;
      let user_id = config.user_id.as_deref().ok_or(SourceError::NotConnected)?;
      Ok(Arc::new(JellyfinSource::with_token(
        &config.id,
        &config.name,
        &config.base_url,
        token,
        user_id,
      )))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn webdav() -> ServerConfig {
    ServerConfig {
      id: "dav1".to_string(),
      name: "NAS".to_string(),
      kind: ServerKind::Webdav,
      base_url: "http://nas.local/dav".to_string(),
      username: Some("user".to_string()),
      password: Some("secret".to_string()),
      access_token: None,
      user_id: None,
    }
  }

  #[test]
  fn test_validation() {
    assert!(webdav().validate().is_ok());

    let mut bad_url = webdav();
    bad_url.base_url = "nas.local/dav".to_string();
    assert!(bad_url.validate().is_err());

    let mut jellyfin_no_token = webdav();
    jellyfin_no_token.kind = ServerKind::Jellyfin;
    assert!(jellyfin_no_token.validate().is_err());
  }

  #[test]
  fn test_build_source_matches_kind() {
    let source = build_source(&webdav()).unwrap();
    assert_eq!(source.server_id(), "dav1");
    assert_eq!(source.name(), "NAS");

    let jellyfin = ServerConfig {
      kind: ServerKind::Jellyfin,
      access_token: Some("tok".to_string()),
      user_id: Some("u1".to_string()),
      ..webdav()
    };
    assert!(build_source(&jellyfin).is_ok());
  }
}
