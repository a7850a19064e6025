//! Async HTTP client wrapping the photo-sharing server's endpoints.

use std::time::Duration;

use photoshare_core::{
  api::PhotoApi,
  photo::{MostCommentedPhoto, PhotoSummary, UploadPayload},
  user::{User, UserDirectoryEntry, UserId},
};
use reqwest::{
  Client, RequestBuilder, Response, Url, header,
  multipart::{Form, Part},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::{HttpError, Result};

/// Connection settings for the server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url:       String,
  /// Raw `Cookie` header value carrying an existing session.
  pub session_cookie: Option<String>,
}

/// Payload of `GET /test/info`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppInfo {
  pub version: String,
}

/// Async HTTP client for the photo-sharing server.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpClient {
  client:         Client,
  base:           Url,
  session_cookie: Option<String>,
}

impl HttpClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let base = Url::parse(&config.base_url).map_err(|e| HttpError::InvalidBaseUrl {
      url:    config.base_url.clone(),
      reason: e.to_string(),
    })?;
    if base.cannot_be_a_base() {
      return Err(HttpError::InvalidBaseUrl {
        url:    config.base_url,
        reason: "not a hierarchical URL".into(),
      });
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(HttpError::Build)?;
    Ok(Self {
      client,
      base,
      session_cookie: config.session_cookie,
    })
  }

  /// Join `segments` onto the base URL, percent-encoding each one.
  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  fn with_session(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.session_cookie {
      Some(cookie) => req.header(header::COOKIE, cookie.as_str()),
      None => req,
    }
  }

  /// Send `req`, turning transport failures and non-2xx answers into errors.
  async fn send(&self, method: &'static str, url: Url, req: RequestBuilder) -> Result<Response> {
    let path = url.path().to_string();
    tracing::debug!(method, %path, "request");
    let resp = self
      .with_session(req)
      .send()
      .await
      .map_err(|source| HttpError::Transport {
        method,
        path: path.clone(),
        source,
      })?;

    let status = resp.status();
    if !status.is_success() {
      return Err(HttpError::Status {
        method,
        path,
        status,
      });
    }
    Ok(resp)
  }

  async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
    let url = self.url(segments);
    let path = url.path().to_string();
    let resp = self.send("GET", url.clone(), self.client.get(url)).await?;
    resp
      .json()
      .await
      .map_err(|source| HttpError::Decode { path, source })
  }

  /// `GET /test/info`
  pub async fn app_info(&self) -> Result<AppInfo> { self.get_json(&["test", "info"]).await }
}

impl PhotoApi for HttpClient {
  type Error = HttpError;

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `GET /user/list`
  async fn list_users(&self) -> Result<Vec<UserDirectoryEntry>> {
    self.get_json(&["user", "list"]).await
  }

  /// `GET /user/<id>`
  async fn get_user(&self, id: &UserId) -> Result<User> {
    self.get_json(&["user", id.as_str()]).await
  }

  // ── Photo statistics ──────────────────────────────────────────────────────

  /// `GET /user/recentPhoto/<id>`
  async fn recent_photo(&self, id: &UserId) -> Result<Option<PhotoSummary>> {
    self.get_json(&["user", "recentPhoto", id.as_str()]).await
  }

  /// `GET /user/mostCommentedPhoto/<id>`
  async fn most_commented_photo(&self, id: &UserId) -> Result<Option<MostCommentedPhoto>> {
    self
      .get_json(&["user", "mostCommentedPhoto", id.as_str()])
      .await
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// `POST /photos/new` as multipart: `uploadedphoto`, optional
  /// `sharingList` (JSON array), `isPrivate`.
  async fn upload_photo(&self, payload: &UploadPayload) -> Result<()> {
    let file = Part::stream(payload.file.bytes.clone()).file_name(payload.file.file_name.clone());
    let mut form = Form::new().part("uploadedphoto", file);
    if let Some(list) = payload.sharing_list_json()? {
      form = form.text("sharingList", list);
    }
    form = form.text("isPrivate", payload.is_private.to_string());

    let url = self.url(&["photos", "new"]);
    self
      .send("POST", url.clone(), self.client.post(url).multipart(form))
      .await?;
    Ok(())
  }

  /// `POST /admin/logout`
  async fn logout(&self) -> Result<()> {
    let url = self.url(&["admin", "logout"]);
    self.send("POST", url.clone(), self.client.post(url)).await?;
    Ok(())
  }
}
