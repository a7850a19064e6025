//! The upload session: the directory snapshot, the audience draft, and the
//! transient banner that reports how the last upload went.

use std::time::{Duration, Instant};

use crate::{
  api::PhotoApi,
  audience::{AudienceSelection, UserDirectory},
  notify::{Notification, Notifier},
  photo::UploadFile,
  user::UserId,
};

/// How long an upload banner stays up unless dismissed.
pub const BANNER_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
  Uploaded,
  Failed,
}

impl UploadOutcome {
  pub fn message(self) -> &'static str {
    match self {
      Self::Uploaded => "Photo Uploaded",
      Self::Failed => "Error Uploading Photo",
    }
  }

  pub fn is_success(self) -> bool { matches!(self, Self::Uploaded) }
}

// ─── Banner ───────────────────────────────────────────────────────────────────

/// Dismissible feedback for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBanner {
  pub outcome: UploadOutcome,
  shown_at:    Instant,
}

impl UploadBanner {
  pub fn new(outcome: UploadOutcome, shown_at: Instant) -> Self { Self { outcome, shown_at } }

  pub fn is_visible_at(&self, now: Instant) -> bool {
    now.saturating_duration_since(self.shown_at) < BANNER_TIMEOUT
  }
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// Upload state for a logged-in user.
#[derive(Debug, Default)]
pub struct UploadSession {
  pub directory: UserDirectory,
  pub selection: AudienceSelection,
  banner:        Option<UploadBanner>,
  notifier:      Option<Notifier>,
}

impl UploadSession {
  pub fn new() -> Self { Self::default() }

  pub fn with_notifier(mut self, notifier: Notifier) -> Self {
    self.notifier = Some(notifier);
    self
  }

  /// Called when the selector gains focus; fetches the directory the first
  /// time round.
  pub async fn on_selector_focus<A: PhotoApi>(&mut self, api: &A) {
    self.directory.ensure_loaded(api).await;
  }

  pub fn set_private(&mut self, flag: bool) { self.selection.set_private(flag); }

  /// Apply a new selector value against the cached directory. Ignored while
  /// the upload is private, since the selector is disabled then.
  pub fn select(&mut self, labels: Vec<String>, owner_id: &UserId) {
    if !self.selection.selector_enabled() {
      tracing::debug!("selector disabled for private upload; ignoring change");
      return;
    }
    self
      .selection
      .on_selection_changed(labels, self.directory.entries(), owner_id);
  }

  /// Submit `file` with the current audience.
  ///
  /// Success resets the draft. Failure keeps it so the user can resubmit.
  /// Either way the outcome is shown on the banner and emitted upward.
  pub async fn submit<A: PhotoApi>(
    &mut self,
    api: &A,
    file: UploadFile,
    owner_id: &UserId,
  ) -> UploadOutcome {
    let payload = self.selection.build_upload_payload(file, owner_id);
    let outcome = match api.upload_photo(&payload).await {
      Ok(()) => {
        tracing::info!(
          owner = %owner_id,
          file = %payload.file.file_name,
          private = payload.is_private,
          recipients = payload.sharing_list.as_ref().map_or(0, Vec::len),
          "photo uploaded"
        );
        self.selection.reset();
        UploadOutcome::Uploaded
      }
      Err(e) => {
        tracing::error!(owner = %owner_id, error = %e, "photo upload failed");
        UploadOutcome::Failed
      }
    };

    self.banner = Some(UploadBanner::new(outcome, Instant::now()));
    if let Some(notifier) = &self.notifier {
      notifier.emit(Notification::UploadResult(outcome));
    }
    outcome
  }

  /// The banner, if one is up at `now`.
  pub fn banner_at(&self, now: Instant) -> Option<&UploadBanner> {
    self.banner.as_ref().filter(|b| b.is_visible_at(now))
  }

  pub fn dismiss_banner(&mut self) { self.banner = None; }
}
