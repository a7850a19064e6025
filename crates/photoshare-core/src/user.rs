//! Users as the client sees them: read-only projections of server state.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Opaque server-assigned user identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for UserId {
  fn from(id: &str) -> Self { Self::new(id) }
}

impl FromStr for UserId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
      return Err(Error::EmptyId { kind: "user" });
    }
    Ok(Self::new(trimmed))
  }
}

/// A full user record, as returned by `GET /user/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  #[serde(rename = "_id")]
  pub id:          UserId,
  pub first_name:  String,
  pub last_name:   String,
  #[serde(default)]
  pub location:    String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub occupation:  String,
}

impl User {
  pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }
}

/// A user projected for the audience selector: identifier plus the label the
/// selector displays (the first name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDirectoryEntry {
  #[serde(rename = "_id")]
  pub id:         UserId,
  pub first_name: String,
}

impl UserDirectoryEntry {
  pub fn label(&self) -> &str { &self.first_name }
}
