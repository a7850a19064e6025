//! In-memory [`PhotoApi`] used by the state-machine tests.
//!
//! Responses for a user can be held back behind a gate so tests control the
//! order in which concurrent fetches complete.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex, MutexGuard},
};

use chrono::{TimeZone, Utc};
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::{
  api::PhotoApi,
  photo::{MostCommentedPhoto, PhotoId, PhotoSummary, UploadPayload},
  user::{User, UserDirectoryEntry, UserId},
};

#[derive(Debug, Error)]
pub enum FakeError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("injected failure")]
  Injected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
  Profile,
  Recent,
  MostCommented,
}

#[derive(Default)]
struct Inner {
  directory:       Vec<UserDirectoryEntry>,
  directory_fails: bool,
  directory_calls: usize,
  users:           HashMap<UserId, User>,
  recent:          HashMap<UserId, PhotoSummary>,
  most_commented:  HashMap<UserId, MostCommentedPhoto>,
  failing:         HashSet<(UserId, Track)>,
  gates:           HashMap<UserId, Arc<Semaphore>>,
  fetch_calls:     usize,
  uploads:         Vec<UploadPayload>,
  upload_fails:    bool,
}

#[derive(Default)]
pub struct FakeApi {
  inner: Mutex<Inner>,
}

pub fn entry(id: &str, first_name: &str) -> UserDirectoryEntry {
  UserDirectoryEntry {
    id:         id.into(),
    first_name: first_name.into(),
  }
}

pub fn user(id: &str, first_name: &str, last_name: &str) -> User {
  User {
    id:          id.into(),
    first_name:  first_name.into(),
    last_name:   last_name.into(),
    location:    "Trondheim".into(),
    description: "Takes pictures of boats.".into(),
    occupation:  "Ferry pilot".into(),
  }
}

pub fn photo(id: &str, file_name: &str) -> PhotoSummary {
  PhotoSummary {
    id:        PhotoId::from(id),
    file_name: file_name.into(),
    date_time: Utc.with_ymd_and_hms(2023, 5, 17, 9, 30, 0).unwrap(),
  }
}

impl FakeApi {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> { self.inner.lock().unwrap() }

  // ── Setup ─────────────────────────────────────────────────────────────────

  pub fn set_directory(&self, entries: Vec<UserDirectoryEntry>) {
    let mut inner = self.lock();
    inner.directory = entries;
    inner.directory_fails = false;
  }

  pub fn fail_directory(&self) { self.lock().directory_fails = true; }

  /// Register `user` with a recent photo and a most-commented photo.
  pub fn add_profile(&self, user: User, recent: PhotoSummary, comments: u32) {
    let mut inner = self.lock();
    let id = user.id.clone();
    inner.most_commented.insert(id.clone(), MostCommentedPhoto {
      photo:         recent.clone(),
      comment_count: comments,
    });
    inner.recent.insert(id.clone(), recent);
    inner.users.insert(id, user);
  }

  pub fn fail(&self, id: &str, track: Track) { self.lock().failing.insert((id.into(), track)); }

  pub fn fail_uploads(&self) { self.lock().upload_fails = true; }

  /// Block every fetch for `id` until [`FakeApi::release`] is called.
  pub fn hold(&self, id: &str) {
    self.lock().gates.insert(id.into(), Arc::new(Semaphore::new(0)));
  }

  pub fn release(&self, id: &str) {
    if let Some(gate) = self.lock().gates.remove(&UserId::from(id)) {
      gate.close();
    }
  }

  // ── Inspection ────────────────────────────────────────────────────────────

  pub fn directory_calls(&self) -> usize { self.lock().directory_calls }

  pub fn fetch_calls(&self) -> usize { self.lock().fetch_calls }

  pub fn uploads(&self) -> Vec<UploadPayload> { self.lock().uploads.clone() }

  // ── Internals ─────────────────────────────────────────────────────────────

  async fn wait(&self, id: &UserId, track: Track) -> Result<(), FakeError> {
    let gate = {
      let mut inner = self.lock();
      inner.fetch_calls += 1;
      inner.gates.get(id).cloned()
    };
    if let Some(gate) = gate {
      // Only closing the gate lets waiters through.
      gate.acquire().await.ok();
    }
    if self.lock().failing.contains(&(id.clone(), track)) {
      return Err(FakeError::Injected);
    }
    Ok(())
  }
}

impl PhotoApi for FakeApi {
  type Error = FakeError;

  async fn list_users(&self) -> Result<Vec<UserDirectoryEntry>, FakeError> {
    let mut inner = self.lock();
    inner.directory_calls += 1;
    if inner.directory_fails {
      return Err(FakeError::Injected);
    }
    Ok(inner.directory.clone())
  }

  async fn get_user(&self, id: &UserId) -> Result<User, FakeError> {
    self.wait(id, Track::Profile).await?;
    self
      .lock()
      .users
      .get(id)
      .cloned()
      .ok_or_else(|| FakeError::NotFound(id.to_string()))
  }

  async fn recent_photo(&self, id: &UserId) -> Result<Option<PhotoSummary>, FakeError> {
    self.wait(id, Track::Recent).await?;
    Ok(self.lock().recent.get(id).cloned())
  }

  async fn most_commented_photo(
    &self,
    id: &UserId,
  ) -> Result<Option<MostCommentedPhoto>, FakeError> {
    self.wait(id, Track::MostCommented).await?;
    Ok(self.lock().most_commented.get(id).cloned())
  }

  async fn upload_photo(&self, payload: &UploadPayload) -> Result<(), FakeError> {
    let mut inner = self.lock();
    if inner.upload_fails {
      return Err(FakeError::Injected);
    }
    inner.uploads.push(payload.clone());
    Ok(())
  }

  async fn logout(&self) -> Result<(), FakeError> { Ok(()) }
}
