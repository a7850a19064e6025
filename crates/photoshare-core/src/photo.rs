//! Photo summaries, route keys and upload payloads.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Opaque server-assigned photo identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PhotoId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for PhotoId {
  fn from(id: &str) -> Self { Self::new(id) }
}

/// The fields of a photo the profile view needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSummary {
  #[serde(rename = "_id")]
  pub id:        PhotoId,
  pub file_name: String,
  pub date_time: DateTime<Utc>,
}

/// A photo together with how many comments it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostCommentedPhoto {
  #[serde(flatten)]
  pub photo:         PhotoSummary,
  #[serde(rename = "commentCount")]
  pub comment_count: u32,
}

// ─── Routes ───────────────────────────────────────────────────────────────────

/// Route key handed to the navigation collaborator when a thumbnail is
/// activated. Renders as `/photos/{user}/{photo}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRoute {
  pub user_id:  UserId,
  pub photo_id: PhotoId,
}

impl fmt::Display for PhotoRoute {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "/photos/{}/{}", self.user_id, self.photo_id)
  }
}

// ─── Uploads ──────────────────────────────────────────────────────────────────

/// A picked file, ready to be sent as the `uploadedphoto` multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
  pub file_name: String,
  pub bytes:     Bytes,
}

/// Everything `POST /photos/new` needs.
///
/// `sharing_list` is `None` when the field must be left out of the request
/// altogether, which makes the server fall back to owner-only visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
  pub owner_id:     UserId,
  pub file:         UploadFile,
  pub is_private:   bool,
  pub sharing_list: Option<Vec<UserId>>,
}

impl UploadPayload {
  /// The `sharingList` part, encoded as a JSON array of ids.
  pub fn sharing_list_json(&self) -> crate::Result<Option<String>> {
    self
      .sharing_list
      .as_ref()
      .map(serde_json::to_string)
      .transpose()
      .map_err(Into::into)
  }
}
