//! Plain-text rendering of application state.

use std::fmt::Write as _;

use chrono::Local;
use photoshare_core::{
  photo::PhotoRoute,
  profile::{ProfileAggregate, ProfileView},
  upload::UploadOutcome,
  user::UserDirectoryEntry,
};

/// One line per user: id, then first name.
pub fn directory(entries: &[UserDirectoryEntry]) -> String {
  let width = entries.iter().map(|e| e.id.as_str().len()).max().unwrap_or(0);
  let mut out = String::new();
  for entry in entries {
    writeln!(out, "{:width$}  {}", entry.id.as_str(), entry.label()).ok();
  }
  out
}

/// The profile page for `view`, headed by `title`.
pub fn profile(title: &str, view: &ProfileView<'_>) -> String {
  match view {
    ProfileView::Idle => String::new(),
    ProfileView::Loading(id) => format!("Loading {id}…\n"),
    ProfileView::Failed { subject, message } => format!("Could not load {subject}: {message}\n"),
    ProfileView::Ready(aggregate) => ready(title, aggregate),
  }
}

fn ready(title: &str, aggregate: &ProfileAggregate) -> String {
  let mut out = String::new();
  if !title.is_empty() {
    writeln!(out, "{title}\n").ok();
  }

  if let Some(user) = &aggregate.subject {
    for (label, value) in [
      ("First Name", &user.first_name),
      ("Last Name", &user.last_name),
      ("Location", &user.location),
      ("Occupation", &user.occupation),
      ("Description", &user.description),
    ] {
      writeln!(out, "{label:<12} {value}").ok();
    }
  }

  if let Some(photo) = &aggregate.recent_photo {
    let uploaded = photo.date_time.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    writeln!(out, "\nMost recent photo").ok();
    writeln!(out, "  {}  (uploaded {uploaded})", photo.file_name).ok();
    writeln!(out, "  {}", aggregate.photo_route(photo.id.clone())).ok();
  }
  if let Some(most) = &aggregate.most_commented_photo {
    writeln!(out, "\nMost commented photo").ok();
    writeln!(out, "  {}  (Comments Count: {})", most.photo.file_name, most.comment_count).ok();
    writeln!(out, "  {}", aggregate.photo_route(most.photo.id.clone())).ok();
  }
  writeln!(out, "\nAll photos: {}", aggregate.photos_route()).ok();
  out
}

/// The audience selector's options on one line.
pub fn share_options(options: &[&str]) -> String { format!("Share with: {}", options.join(", ")) }

pub fn route(route: &PhotoRoute) -> String { format!("Open {route}") }

pub fn upload(outcome: UploadOutcome) -> &'static str { outcome.message() }
