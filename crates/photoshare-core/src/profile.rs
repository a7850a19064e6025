//! Profile aggregation: one user's record plus two photo statistics, fetched
//! concurrently and merged into a single view model.
//!
//! Each [`ProfileAggregator::set_subject`] call starts a new *episode* and
//! spawns three independent fetches. Their results come back through
//! [`ProfileAggregator::pump`], which merges a completion only if it still
//! belongs to the current subject and episode. Anything else is stale and is
//! dropped, so a slow response for a previous subject can never leak into the
//! profile that replaced it.

use std::{future::Future, sync::Arc};

use tokio::task::JoinSet;

use crate::{
  api::PhotoApi,
  notify::{Notification, Notifier},
  photo::{MostCommentedPhoto, PhotoId, PhotoRoute, PhotoSummary},
  user::{User, UserId},
};

// ─── View model ───────────────────────────────────────────────────────────────

/// Everything known about one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileAggregate {
  pub subject_id:           UserId,
  pub subject:              Option<User>,
  pub recent_photo:         Option<PhotoSummary>,
  pub most_commented_photo: Option<MostCommentedPhoto>,
}

impl ProfileAggregate {
  fn empty(subject_id: UserId) -> Self {
    Self {
      subject_id,
      subject: None,
      recent_photo: None,
      most_commented_photo: None,
    }
  }

  /// Title-bar text for this profile, once the record is known.
  pub fn title(&self) -> Option<String> {
    self
      .subject
      .as_ref()
      .map(|u| format!("User Details for {} {}", u.first_name, u.last_name))
  }

  /// Route to one of this subject's photos.
  pub fn photo_route(&self, photo_id: PhotoId) -> PhotoRoute {
    PhotoRoute {
      user_id: self.subject_id.clone(),
      photo_id,
    }
  }

  /// Route to this subject's photo list, `/photos/{user}`.
  pub fn photos_route(&self) -> String { format!("/photos/{}", self.subject_id) }
}

/// Lifecycle of the current subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStatus {
  Idle,
  Loading(UserId),
  Settled(UserId),
  /// The profile record could not be fetched; nothing is renderable.
  Failed { subject: UserId, message: String },
}

impl ProfileStatus {
  fn subject(&self) -> Option<&UserId> {
    match self {
      Self::Idle => None,
      Self::Loading(id) | Self::Settled(id) => Some(id),
      Self::Failed { subject, .. } => Some(subject),
    }
  }
}

/// What a renderer should show right now.
#[derive(Debug, PartialEq, Eq)]
pub enum ProfileView<'a> {
  Idle,
  Loading(&'a UserId),
  Ready(&'a ProfileAggregate),
  Failed { subject: &'a UserId, message: &'a str },
}

/// Whether a completion was merged or thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
  Merged,
  Discarded,
}

// ─── Completions ──────────────────────────────────────────────────────────────

#[derive(Debug)]
enum Fetched {
  Profile(Result<User, String>),
  Recent(Result<Option<PhotoSummary>, String>),
  MostCommented(Result<Option<MostCommentedPhoto>, String>),
}

#[derive(Debug)]
struct Completion {
  episode: u64,
  subject: UserId,
  fetched: Fetched,
}

// ─── Aggregator ───────────────────────────────────────────────────────────────

/// Owns the profile view for whichever user is currently being viewed.
pub struct ProfileAggregator<A: PhotoApi + 'static> {
  api:       Arc<A>,
  notifier:  Option<Notifier>,
  episode:   u64,
  status:    ProfileStatus,
  aggregate: Option<ProfileAggregate>,
  tasks:     JoinSet<Completion>,
}

impl<A: PhotoApi + 'static> ProfileAggregator<A> {
  pub fn new(api: Arc<A>) -> Self {
    Self {
      api,
      notifier: None,
      episode: 0,
      status: ProfileStatus::Idle,
      aggregate: None,
      tasks: JoinSet::new(),
    }
  }

  /// Send title changes to `notifier`.
  pub fn with_notifier(mut self, notifier: Notifier) -> Self {
    self.notifier = Some(notifier);
    self
  }

  pub fn status(&self) -> &ProfileStatus { &self.status }

  /// The raw aggregate, including fields that arrived before the profile
  /// record. Prefer [`ProfileAggregator::view`] for rendering.
  pub fn aggregate(&self) -> Option<&ProfileAggregate> { self.aggregate.as_ref() }

  /// The subject being loaded or shown, if any.
  pub fn target(&self) -> Option<&UserId> { self.status.subject() }

  /// Number of fetches not yet pumped, stale ones included.
  pub fn outstanding(&self) -> usize { self.tasks.len() }

  pub fn view(&self) -> ProfileView<'_> {
    match (&self.status, &self.aggregate) {
      (ProfileStatus::Idle, _) => ProfileView::Idle,
      (ProfileStatus::Loading(id), _) => ProfileView::Loading(id),
      (ProfileStatus::Failed { subject, message }, _) => ProfileView::Failed { subject, message },
      (ProfileStatus::Settled(_), Some(aggregate)) => ProfileView::Ready(aggregate),
      (ProfileStatus::Settled(id), None) => ProfileView::Loading(id),
    }
  }

  // ── Subject changes ───────────────────────────────────────────────────────

  /// Point the aggregator at `id`. Does nothing if `id` is already the
  /// subject being loaded or shown.
  pub fn set_subject(&mut self, id: UserId) {
    if self.target() == Some(&id) {
      return;
    }
    self.start_episode(id);
  }

  /// Fetch the current subject again, discarding anything still in flight.
  pub fn reload(&mut self) {
    if let Some(id) = self.target().cloned() {
      self.start_episode(id);
    }
  }

  fn start_episode(&mut self, id: UserId) {
    self.episode += 1;
    tracing::debug!(subject = %id, episode = self.episode, "loading profile");

    self.status = ProfileStatus::Loading(id.clone());
    self.aggregate = Some(ProfileAggregate::empty(id.clone()));

    self.spawn_fetch(&id, |api, id| async move {
      Fetched::Profile(api.get_user(&id).await.map_err(|e| e.to_string()))
    });
    self.spawn_fetch(&id, |api, id| async move {
      Fetched::Recent(api.recent_photo(&id).await.map_err(|e| e.to_string()))
    });
    self.spawn_fetch(&id, |api, id| async move {
      Fetched::MostCommented(
        api
          .most_commented_photo(&id)
          .await
          .map_err(|e| e.to_string()),
      )
    });
  }

  fn spawn_fetch<F, Fut>(&mut self, subject: &UserId, fetch: F)
  where
    F: FnOnce(Arc<A>, UserId) -> Fut,
    Fut: Future<Output = Fetched> + Send + 'static,
  {
    let episode = self.episode;
    let subject = subject.clone();
    let fut = fetch(Arc::clone(&self.api), subject.clone());
    self.tasks.spawn(async move {
      Completion {
        episode,
        subject,
        fetched: fut.await,
      }
    });
  }

  // ── Completions ───────────────────────────────────────────────────────────

  /// Wait for the next fetch to finish and apply it.
  ///
  /// Returns `None` when no fetch is outstanding.
  pub async fn pump(&mut self) -> Option<Applied> {
    match self.tasks.join_next().await? {
      Ok(completion) => Some(self.apply(completion)),
      Err(e) => {
        tracing::error!(error = %e, "profile fetch task did not complete");
        Some(Applied::Discarded)
      }
    }
  }

  /// Pump until nothing is outstanding.
  pub async fn drain(&mut self) {
    while self.pump().await.is_some() {}
  }

  fn apply(&mut self, completion: Completion) -> Applied {
    let Completion {
      episode,
      subject,
      fetched,
    } = completion;

    let current = episode == self.episode && self.target() == Some(&subject);
    let Some(aggregate) = self.aggregate.as_mut().filter(|_| current) else {
      tracing::debug!(%subject, episode, "discarding stale profile response");
      return Applied::Discarded;
    };

    match fetched {
      Fetched::Profile(Ok(user)) => {
        aggregate.subject = Some(user);
        let title = aggregate.title();
        self.status = ProfileStatus::Settled(subject);
        if let (Some(notifier), Some(title)) = (&self.notifier, title) {
          notifier.emit(Notification::TitleChanged(title));
        }
      }
      Fetched::Profile(Err(message)) => {
        tracing::error!(%subject, error = %message, "profile fetch failed");
        self.status = ProfileStatus::Failed { subject, message };
      }
      Fetched::Recent(Ok(photo)) => aggregate.recent_photo = photo,
      Fetched::Recent(Err(e)) => {
        tracing::warn!(%subject, error = %e, "error fetching recent photo");
      }
      Fetched::MostCommented(Ok(photo)) => aggregate.most_commented_photo = photo,
      Fetched::MostCommented(Err(e)) => {
        tracing::warn!(%subject, error = %e, "error fetching most commented photo");
      }
    }
    Applied::Merged
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Route to `photo_id` within the shown profile. `None` until the profile
  /// record has loaded.
  pub fn navigate_to_photo(&self, photo_id: PhotoId) -> Option<PhotoRoute> {
    match self.view() {
      ProfileView::Ready(aggregate) => Some(aggregate.photo_route(photo_id)),
      _ => None,
    }
  }
}
