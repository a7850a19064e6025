//! The `PhotoApi` trait: the server endpoints the client consults.
//!
//! Implemented over HTTP by `photoshare-client`. The state machines in this
//! crate depend on this abstraction only, so tests can substitute a fake.

use std::future::Future;

use crate::{
  photo::{MostCommentedPhoto, PhotoSummary, UploadPayload},
  user::{User, UserDirectoryEntry, UserId},
};

/// Abstraction over the photo-sharing server.
///
/// All methods return `Send` futures so implementations can be driven from
/// spawned tokio tasks.
pub trait PhotoApi: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Every known user, projected for the audience selector.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserDirectoryEntry>, Self::Error>> + Send + '_;

  /// The full record for one user.
  fn get_user<'a>(
    &'a self,
    id: &'a UserId,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  // ── Photo statistics ──────────────────────────────────────────────────

  /// The user's most recently uploaded photo. `None` when they have none.
  fn recent_photo<'a>(
    &'a self,
    id: &'a UserId,
  ) -> impl Future<Output = Result<Option<PhotoSummary>, Self::Error>> + Send + 'a;

  /// The user's photo with the most comments. `None` when they have none.
  fn most_commented_photo<'a>(
    &'a self,
    id: &'a UserId,
  ) -> impl Future<Output = Result<Option<MostCommentedPhoto>, Self::Error>> + Send + 'a;

  // ── Session ───────────────────────────────────────────────────────────

  /// Submit a new photo.
  fn upload_photo<'a>(
    &'a self,
    payload: &'a UploadPayload,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// End the current session. Callers treat failure as success.
  fn logout(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
