//! Layered client settings: TOML file, then `PHOTOSHARE_*` environment
//! variables, then command-line flags.

use std::path::Path;

use anyhow::Context as _;
use photoshare_core::user::UserId;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
  #[serde(default = "default_base_url")]
  pub base_url:       String,
  #[serde(default)]
  pub session_cookie: Option<String>,
  #[serde(default)]
  pub owner_id:       Option<UserId>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      base_url:       default_base_url(),
      session_cookie: None,
      owner_id:       None,
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::from_builder(
      config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("PHOTOSHARE")),
    )
  }

  fn from_builder(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
  ) -> anyhow::Result<Self> {
    builder
      .build()
      .context("failed to read settings")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// Flags given on the command line replace whatever was loaded.
  pub fn with_overrides(
    mut self,
    base_url: Option<String>,
    session_cookie: Option<String>,
    owner_id: Option<UserId>,
  ) -> Self {
    if let Some(url) = base_url {
      self.base_url = url;
    }
    if session_cookie.is_some() {
      self.session_cookie = session_cookie;
    }
    if owner_id.is_some() {
      self.owner_id = owner_id;
    }
    self
  }
}
