//! Jellyfin source adapter: thin REST wrapper implementing [`SourceClient`].

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::client::SourceClient;
use super::error::SourceError;
use super::types::{ItemKind, LibraryDescriptor, LibraryKind, MediaItem, SubtitleTrack};

/// Device info for Jellyfin client identification.
const DEFAULT_DEVICE_NAME: &str = "Playshelf";
const DEVICE_ID_PREFIX: &str = "playshelf-";
const CLIENT_NAME: &str = "Playshelf";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Ticks conversion (1 tick = 100 nanoseconds).
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Jellyfin HTTP API adapter.
pub struct JellyfinSource {
  http: Client,
  server_id: String,
  name: String,
  state: Arc<RwLock<ClientState>>,
}

/// Internal connection state.
struct ClientState {
  server_url: Option<String>,
  access_token: Option<String>,
  user_id: Option<String>,
  device_id: String,
}

/// Credentials for password authentication.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
  pub server_url: String,
  pub username: String,
  pub password: String,
}

impl JellyfinSource {
  /// Create an unconnected adapter for one configured server.
  pub fn new(server_id: impl Into<String>, name: impl Into<String>) -> Self {
    let device_id = format!("{}{}", DEVICE_ID_PREFIX, Uuid::new_v4());

    Self {
      http: Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client"),
      server_id: server_id.into(),
      name: name.into(),
      state: Arc::new(RwLock::new(ClientState {
        server_url: None,
        access_token: None,
        user_id: None,
        device_id,
      })),
    }
  }

  /// Create an adapter from an already-obtained token (session pass-through).
  pub fn with_token(
    server_id: impl Into<String>,
    name: impl Into<String>,
    server_url: &str,
    access_token: &str,
    user_id: &str,
  ) -> Self {
    let source = Self::new(server_id, name);
    {
      let mut state = source.state.write();
      state.server_url = Some(server_url.trim_end_matches('/').to_string());
      state.access_token = Some(access_token.to_string());
      state.user_id = Some(user_id.to_string());
    }
    source
  }

  /// Build authorization header value.
  fn auth_header(&self, token: Option<&str>) -> String {
    let state = self.state.read();
    let mut header = format!(
      r#"MediaBrowser Client="{}", Device="{}", DeviceId="{}", Version="{}""#,
      CLIENT_NAME, DEFAULT_DEVICE_NAME, state.device_id, CLIENT_VERSION
    );
    if let Some(token) = token {
      header.push_str(&format!(r#", Token="{}""#, token));
    }
    header
  }

  /// Authenticate with the Jellyfin server and store the session.
  pub async fn authenticate(&self, creds: &Credentials) -> Result<(), SourceError> {
    let server_url = creds.server_url.trim_end_matches('/').to_string();

    if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
      return Err(SourceError::InvalidUrl(
        "URL must start with http:// or https://".to_string(),
      ));
    }

    let url = format!("{}/Users/AuthenticateByName", server_url);
    let body = serde_json::json!({
      "Username": creds.username,
      "Pw": creds.password
    });

    let response = self
      .http
      .post(&url)
      .header(header::CONTENT_TYPE, "application/json")
      .header("X-Emby-Authorization", self.auth_header(None))
      .json(&body)
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status();
      let text = response.text().await.unwrap_or_default();
      return Err(SourceError::Unauthorized(format!("HTTP {}: {}", status, text)));
    }

    let auth: AuthResponse = response.json().await?;

    let mut state = self.state.write();
    state.server_url = Some(server_url);
    state.access_token = Some(auth.access_token);
    state.user_id = Some(auth.user.id);

    Ok(())
  }

  /// Get server URL or error if not connected.
  fn server_url(&self) -> Result<String, SourceError> {
    self
      .state
      .read()
      .server_url
      .clone()
      .ok_or(SourceError::NotConnected)
  }

  /// Get access token or error if not connected.
  fn access_token(&self) -> Result<String, SourceError> {
    self
      .state
      .read()
      .access_token
      .clone()
      .ok_or(SourceError::NotConnected)
  }

  /// Get user ID or error if not connected.
  fn user_id(&self) -> Result<String, SourceError> {
    self
      .state
      .read()
      .user_id
      .clone()
      .ok_or(SourceError::NotConnected)
  }

  /// Make an authenticated GET request.
  async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
    let server_url = self.server_url()?;
    let token = self.access_token()?;
    let url = format!("{}{}", server_url, path);

    let response = self
      .http
      .get(&url)
      .header("X-Emby-Authorization", self.auth_header(Some(&token)))
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status();
      let text = response.text().await.unwrap_or_default();
      return Err(SourceError::from_status(status, text));
    }

    Ok(response.json().await?)
  }

  /// Make an authenticated POST request.
  async fn post_json<T: serde::de::DeserializeOwned, B: Serialize>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T, SourceError> {
    let server_url = self.server_url()?;
    let token = self.access_token()?;
    let url = format!("{}{}", server_url, path);

    let response = self
      .http
      .post(&url)
      .header(header::CONTENT_TYPE, "application/json")
      .header("X-Emby-Authorization", self.auth_header(Some(&token)))
      .json(body)
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status();
      let text = response.text().await.unwrap_or_default();
      return Err(SourceError::from_status(status, text));
    }

    Ok(response.json().await?)
  }

  /// Fetch playback info for a unit and return its first media source.
  async fn first_media_source(&self, unit_id: &str) -> Result<JfMediaSource, SourceError> {
    let user_id = self.user_id()?;
    let device_id = self.state.read().device_id.clone();
    let path = format!("/Items/{}/PlaybackInfo", unit_id);

    let request = serde_json::json!({
      "UserId": user_id,
      "DeviceId": device_id,
      "MaxStreamingBitrate": 140_000_000i64,
      "EnableDirectPlay": true,
      "EnableDirectStream": true,
      "EnableTranscoding": false,
      "AutoOpenLiveStream": false,
    });

    let info: JfPlaybackInfoResponse = self.post_json(&path, &request).await?;
    info
      .media_sources
      .into_iter()
      .next()
      .ok_or_else(|| SourceError::NotPlayable(format!("no media source for item {}", unit_id)))
  }

  fn map_item(&self, item: JfItem) -> Option<MediaItem> {
    let kind = match item.item_type.as_str() {
      "Movie" | "Video" => ItemKind::Movie,
      "Series" => ItemKind::Series,
      "Episode" => ItemKind::Episode,
      "Folder" | "CollectionFolder" | "BoxSet" | "Season" => ItemKind::Folder,
      other => {
        log::debug!("Skipping item {} with unsupported type {}", item.id, other);
        return None;
      }
    };

    Some(MediaItem {
      id: item.id,
      name: item.name,
      server_id: self.server_id.clone(),
      kind,
      parent_id: item.series_id.or(item.parent_id),
      season_index: item.parent_index_number,
      episode_index: item.index_number,
      sort_name: item.sort_name,
      runtime_seconds: item
        .run_time_ticks
        .map(|t| (t / TICKS_PER_SECOND).max(0) as u64),
      user_progress: item
        .user_data
        .and_then(|d| d.played_percentage)
        .map(|p| (p / 100.0).clamp(0.0, 1.0)),
      size_bytes: None,
      modified_at: None,
    })
  }
}

#[async_trait]
impl SourceClient for JellyfinSource {
  fn name(&self) -> &str {
    &self.name
  }

  fn server_id(&self) -> &str {
    &self.server_id
  }

  async fn list_libraries(&self) -> Result<Vec<LibraryDescriptor>, SourceError> {
    let user_id = self.user_id()?;
    let response: JfItemsResponse = self.get_json(&format!("/Users/{}/Views", user_id)).await?;

    Ok(
      response
        .items
        .into_iter()
        .map(|view| {
          let kind = match view.collection_type.as_deref() {
            Some("movies") => LibraryKind::Movies,
            Some("tvshows") => LibraryKind::Shows,
            Some(_) | None => LibraryKind::Mixed,
          };
          LibraryDescriptor {
            id: view.id,
            name: view.name,
            server_id: self.server_id.clone(),
            kind,
          }
        })
        .collect(),
    )
  }

  async fn list_items(&self, library_id: &str) -> Result<Vec<MediaItem>, SourceError> {
    let user_id = self.user_id()?;
    let path = format!(
      "/Users/{}/Items?ParentId={}&Fields=SortName,MediaSources&Recursive=false",
      user_id, library_id
    );

    let response: JfItemsResponse = self.get_json(&path).await?;
    Ok(
      response
        .items
        .into_iter()
        .filter_map(|item| self.map_item(item))
        .collect(),
    )
  }

  async fn list_episodes(&self, series_id: &str) -> Result<Vec<MediaItem>, SourceError> {
    let user_id = self.user_id()?;
    let path = format!("/Shows/{}/Episodes?UserId={}", series_id, user_id);

    let response: JfItemsResponse = self.get_json(&path).await?;
    Ok(
      response
        .items
        .into_iter()
        .filter_map(|item| self.map_item(item))
        .filter(|item| item.kind == ItemKind::Episode)
        .collect(),
    )
  }

  async fn resolve_stream_url(&self, unit_id: &str) -> Result<String, SourceError> {
    let media_source = self.first_media_source(unit_id).await?;
    let server_url = self.server_url()?;
    let token = self.access_token()?;

    // Always use the HTTP streaming URL - file paths live on the server.
    let container = media_source.container.as_deref().unwrap_or("mkv");
    Ok(format!(
      "{}/Videos/{}/stream.{}?Static=true&MediaSourceId={}&api_key={}",
      server_url, unit_id, container, media_source.id, token
    ))
  }

  async fn list_subtitle_tracks(&self, unit_id: &str) -> Result<Vec<SubtitleTrack>, SourceError> {
    let media_source = self.first_media_source(unit_id).await?;

    Ok(
      media_source
        .media_streams
        .into_iter()
        .filter(|stream| stream.stream_type == "Subtitle")
        .map(|stream| SubtitleTrack {
          unit_id: unit_id.to_string(),
          index: stream.index,
          language: stream.language,
          title: stream.display_title,
          format: stream.codec,
          delivery_path: stream.delivery_url,
        })
        .collect(),
    )
  }

  async fn resolve_subtitle_url(&self, track: &SubtitleTrack) -> Result<String, SourceError> {
    let delivery_path = track.delivery_path.as_deref().ok_or_else(|| {
      SourceError::Unknown(format!(
        "subtitle track {} of {} has no delivery URL",
        track.index, track.unit_id
      ))
    })?;

    let server_url = self.server_url()?;
    let token = self.access_token()?;

    if delivery_path.contains("api_key=") {
      Ok(format!("{}{}", server_url, delivery_path))
    } else {
      let sep = if delivery_path.contains('?') { '&' } else { '?' };
      Ok(format!("{}{}{}api_key={}", server_url, delivery_path, sep, token))
    }
  }
}

// ============================================================================
// Wire types (mirror the Jellyfin API)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthResponse {
  user: JfUser,
  access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JfUser {
  id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JfItemsResponse {
  items: Vec<JfItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JfItem {
  id: String,
  name: String,
  #[serde(rename = "Type", default)]
  item_type: String,
  #[serde(default)]
  collection_type: Option<String>,
  #[serde(default)]
  series_id: Option<String>,
  #[serde(default)]
  parent_id: Option<String>,
  #[serde(default)]
  index_number: Option<u32>,
  #[serde(default)]
  parent_index_number: Option<u32>,
  #[serde(default)]
  sort_name: Option<String>,
  #[serde(default)]
  run_time_ticks: Option<i64>,
  #[serde(default)]
  user_data: Option<JfUserData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JfUserData {
  #[serde(default)]
  played_percentage: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JfPlaybackInfoResponse {
  media_sources: Vec<JfMediaSource>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JfMediaSource {
  id: String,
  #[serde(default)]
  container: Option<String>,
  #[serde(default)]
  media_streams: Vec<JfMediaStream>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JfMediaStream {
  index: i32,
  #[serde(rename = "Type")]
  stream_type: String,
  #[serde(default)]
  codec: Option<String>,
  #[serde(default)]
  language: Option<String>,
  #[serde(default)]
  display_title: Option<String>,
  #[serde(default)]
  delivery_url: Option<String>,
}
