//! Audience selection for uploads.
//!
//! One multi-select control expresses three audiences:
//!
//! | Selection | Recipients |
//! |-----------|------------|
//! | contains [`DONT_SPECIFY_LIST`] | every user in the directory |
//! | empty | the uploader only |
//! | some first names | the users carrying those names |
//!
//! The private flag overrides all of the above at submission time without
//! discarding the selection.

use std::collections::BTreeSet;

use crate::{
  api::PhotoApi,
  photo::{UploadFile, UploadPayload},
  user::{UserDirectoryEntry, UserId},
};

/// The sentinel option meaning "share with everyone".
pub const DONT_SPECIFY_LIST: &str = "Don't specify list";

fn is_sentinel(label: &str) -> bool { label.eq_ignore_ascii_case(DONT_SPECIFY_LIST) }

// ─── Directory ────────────────────────────────────────────────────────────────

/// Cached snapshot of `GET /user/list`.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
  entries: Vec<UserDirectoryEntry>,
  loaded:  bool,
}

impl UserDirectory {
  pub fn new() -> Self { Self::default() }

  pub fn from_entries(entries: Vec<UserDirectoryEntry>) -> Self {
    Self {
      entries,
      loaded: true,
    }
  }

  pub fn entries(&self) -> &[UserDirectoryEntry] { &self.entries }

  /// Whether at least one refresh has succeeded.
  pub fn is_loaded(&self) -> bool { self.loaded }

  /// Replace the snapshot with the server's current directory.
  ///
  /// A failed fetch is logged and leaves the previous snapshot in place.
  pub async fn refresh<A: PhotoApi>(&mut self, api: &A) {
    match api.list_users().await {
      Ok(entries) => {
        tracing::debug!(count = entries.len(), "user directory refreshed");
        self.entries = entries;
        self.loaded = true;
      }
      Err(e) => {
        tracing::warn!(
          error = %e,
          kept = self.entries.len(),
          "user directory fetch failed; keeping previous snapshot"
        );
      }
    }
  }

  /// Refresh only if no snapshot has been loaded yet.
  pub async fn ensure_loaded<A: PhotoApi>(&mut self, api: &A) {
    if !self.loaded {
      self.refresh(api).await;
    }
  }

  /// The options the selector offers: the sentinel, then every first name.
  pub fn options(&self) -> Vec<&str> {
    std::iter::once(DONT_SPECIFY_LIST)
      .chain(self.entries.iter().map(UserDirectoryEntry::label))
      .collect()
  }
}

// ─── Resolution ───────────────────────────────────────────────────────────────

/// Resolve selector labels to the ids allowed to see the photo.
///
/// Labels that match no directory entry are ignored.
pub fn resolve_recipients(
  labels: &[String],
  directory: &[UserDirectoryEntry],
  owner_id: &UserId,
) -> BTreeSet<UserId> {
  if labels.iter().any(|l| is_sentinel(l)) {
    return directory.iter().map(|e| e.id.clone()).collect();
  }
  if labels.is_empty() {
    return BTreeSet::from([owner_id.clone()]);
  }
  directory
    .iter()
    .filter(|e| labels.iter().any(|l| l == e.label()))
    .map(|e| e.id.clone())
    .collect()
}

// ─── Draft state ──────────────────────────────────────────────────────────────

/// Draft audience for the next upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudienceSelection {
  is_private:      bool,
  selected_labels: Vec<String>,
  resolved:        BTreeSet<UserId>,
}

impl AudienceSelection {
  pub fn new() -> Self { Self::default() }

  pub fn is_private(&self) -> bool { self.is_private }

  /// Labels as the selector shows them, in interaction order.
  pub fn selected_labels(&self) -> &[String] { &self.selected_labels }

  pub fn resolved_recipient_ids(&self) -> &BTreeSet<UserId> { &self.resolved }

  /// Whether the selector accepts input. Private uploads freeze it.
  pub fn selector_enabled(&self) -> bool { !self.is_private }

  /// Toggle owner-only visibility. The selection itself is kept.
  pub fn set_private(&mut self, flag: bool) { self.is_private = flag; }

  /// Record a new selector value and recompute the recipients.
  pub fn on_selection_changed(
    &mut self,
    new_labels: Vec<String>,
    directory: &[UserDirectoryEntry],
    owner_id: &UserId,
  ) {
    self.resolved = resolve_recipients(&new_labels, directory, owner_id);
    tracing::debug!(
      labels = ?new_labels,
      recipients = self.resolved.len(),
      "audience selection changed"
    );
    self.selected_labels = new_labels;
  }

  /// Assemble the submission for `file`.
  ///
  /// The recipient list is left out entirely for private uploads, and when
  /// no selection has been made yet.
  pub fn build_upload_payload(&self, file: UploadFile, owner_id: &UserId) -> UploadPayload {
    let sharing_list = (!self.is_private && !self.resolved.is_empty())
      .then(|| self.resolved.iter().cloned().collect());
    UploadPayload {
      owner_id: owner_id.clone(),
      file,
      is_private: self.is_private,
      sharing_list,
    }
  }

  /// Back to defaults: public, nothing selected.
  pub fn reset(&mut self) { *self = Self::default(); }
}
