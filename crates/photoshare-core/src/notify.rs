//! Outbound notifications for whatever owns the page chrome.

use tokio::sync::mpsc;

use crate::{photo::PhotoRoute, upload::UploadOutcome};

/// An event emitted upward by the state machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
  /// A profile settled; carries the new title-bar text.
  TitleChanged(String),
  /// A photo thumbnail was activated.
  NavigateToPhoto(PhotoRoute),
  /// An upload finished, successfully or not.
  UploadResult(UploadOutcome),
}

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
  tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
  /// Create a notifier and the receiver its events arrive on.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { tx }, rx)
  }

  /// Deliver `event`. A dropped receiver just means nobody is listening.
  pub fn emit(&self, event: Notification) {
    if self.tx.send(event).is_err() {
      tracing::trace!("notification dropped: no receiver");
    }
  }
}
