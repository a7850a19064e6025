//! Application state: the upload session, the profile aggregator, and the
//! page chrome fed by their notifications.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use photoshare_core::{
  api::PhotoApi,
  audience::UserDirectory,
  notify::{Notification, Notifier},
  photo::{PhotoId, PhotoRoute, UploadFile},
  profile::{ProfileAggregator, ProfileView},
  upload::{UploadOutcome, UploadSession},
  user::UserId,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// How the upload's audience was chosen on the command line.
#[derive(Debug, Clone, Default)]
pub struct AudienceArgs {
  pub private: bool,
  /// `None` leaves the selector untouched; `Some(vec![])` means owner only.
  pub share:   Option<Vec<String>>,
}

/// Top-level application state.
pub struct App<A: PhotoApi + 'static> {
  pub api:      Arc<A>,
  pub owner_id: Option<UserId>,
  pub upload:   UploadSession,
  pub profile:  ProfileAggregator<A>,

  /// Title-bar text, as last announced.
  pub title:      String,
  /// Last navigation request, for the router to pick up.
  pub last_route: Option<PhotoRoute>,

  notifier:      Notifier,
  notifications: UnboundedReceiver<Notification>,
}

impl<A: PhotoApi + 'static> App<A> {
  pub fn new(api: A, owner_id: Option<UserId>) -> Self {
    let api = Arc::new(api);
    let (notifier, notifications) = Notifier::channel();
    Self {
      profile: ProfileAggregator::new(Arc::clone(&api)).with_notifier(notifier.clone()),
      upload: UploadSession::new().with_notifier(notifier.clone()),
      api,
      owner_id,
      title: String::new(),
      last_route: None,
      notifier,
      notifications,
    }
  }

  /// Apply every notification emitted so far to the page chrome.
  pub fn handle_notifications(&mut self) {
    while let Ok(event) = self.notifications.try_recv() {
      match event {
        Notification::TitleChanged(title) => self.title = title,
        Notification::NavigateToPhoto(route) => {
          tracing::info!(%route, "navigation requested");
          self.last_route = Some(route);
        }
        Notification::UploadResult(outcome) => {
          tracing::debug!(?outcome, "upload result");
        }
      }
    }
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// Refresh and return the user directory.
  pub async fn load_users(&mut self) -> Result<&UserDirectory> {
    self.upload.directory.refresh(self.api.as_ref()).await;
    if !self.upload.directory.is_loaded() {
      return Err(anyhow!("could not fetch the user list"));
    }
    Ok(&self.upload.directory)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  /// Visit each of `ids` in turn without waiting, then settle on the last.
  pub async fn show_profile(&mut self, ids: Vec<UserId>) -> Result<()> {
    for id in ids {
      self.profile.set_subject(id);
    }
    self.profile.drain().await;
    self.handle_notifications();

    if let ProfileView::Failed { subject, message } = self.profile.view() {
      return Err(anyhow!("could not load user {subject}: {message}"));
    }
    Ok(())
  }

  /// Ask the navigation collaborator to open `photo_id` in the shown profile.
  pub fn open_photo(&mut self, photo_id: PhotoId) -> Option<PhotoRoute> {
    let route = self.profile.navigate_to_photo(photo_id)?;
    self
      .notifier
      .emit(Notification::NavigateToPhoto(route.clone()));
    self.handle_notifications();
    Some(route)
  }

  // ── Uploads ───────────────────────────────────────────────────────────────

  /// Upload `file_name`/`bytes` with the audience described by `audience`.
  pub async fn upload_photo(
    &mut self,
    file_name: String,
    bytes: Bytes,
    audience: AudienceArgs,
  ) -> Result<UploadOutcome> {
    let owner = self
      .owner_id
      .clone()
      .context("uploading needs an owner id (--owner or owner_id in config)")?;

    if let Some(labels) = audience.share {
      self.upload.on_selector_focus(self.api.as_ref()).await;
      self.upload.select(labels, &owner);
    }
    self.upload.set_private(audience.private);

    let file = UploadFile { file_name, bytes };
    let outcome = self.upload.submit(self.api.as_ref(), file, &owner).await;
    self.handle_notifications();
    Ok(outcome)
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// End the session. The local session is gone either way.
  pub async fn logout(&mut self) {
    if let Err(e) = self.api.logout().await {
      tracing::warn!(error = %e, "logout request failed; treating as logged out");
    }
    self.owner_id = None;
  }
}
