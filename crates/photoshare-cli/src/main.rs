//! `photoshare`: command-line client for the photo-sharing server.
//!
//! # Usage
//!
//! ```text
//! photoshare --url http://localhost:3000 users
//! photoshare profile 57231f1a30e4351f4e9f4bd7
//! photoshare upload kayak.jpg --share Ann Bo
//! photoshare upload kayak.jpg --private
//! ```
//!
//! Settings are read from `photoshare.toml` (or `--config` /
//! `PHOTOSHARE_CONFIG`), then from
//! `PHOTOSHARE_*` environment variables; command-line flags win.

mod app;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use app::{App, AudienceArgs};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use photoshare_client::{ClientConfig, HttpClient};
use photoshare_core::{photo::PhotoId, user::UserId};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "photoshare", version, about = "Client for the photo-sharing server")]
struct Args {
  /// Path to a TOML config file (base_url, session_cookie, owner_id).
  #[arg(
    short,
    long,
    env = "PHOTOSHARE_CONFIG",
    value_name = "FILE",
    default_value = "photoshare.toml"
  )]
  config: PathBuf,

  /// Base URL of the server.
  #[arg(long)]
  url: Option<String>,

  /// Raw `Cookie` header of an existing session.
  #[arg(long, value_name = "COOKIE")]
  session: Option<String>,

  /// Id of the logged-in user.
  #[arg(long, value_name = "USER_ID")]
  owner: Option<UserId>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every known user.
  Users,

  /// Show a user's profile. With several ids, each is visited in turn and
  /// only the last one is shown.
  Profile {
    #[arg(required = true, value_name = "USER_ID")]
    ids: Vec<UserId>,

    /// Request navigation to one of the profile's photos.
    #[arg(long, value_name = "PHOTO_ID")]
    open: Option<String>,
  },

  /// Upload a photo.
  Upload {
    file: PathBuf,

    /// Visible to the uploader only.
    #[arg(long)]
    private: bool,

    /// First names to share with. `--share` alone means only yourself;
    /// `--share "Don't specify list"` shares with everyone.
    #[arg(long, num_args = 0.., value_name = "NAME")]
    share: Option<Vec<String>>,
  },

  /// End the session.
  Logout,

  /// Print the server's version.
  Version,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let settings = Settings::load(&args.config)?.with_overrides(
    args.url.clone(),
    args.session.clone(),
    args.owner.clone(),
  );

  let client = HttpClient::new(ClientConfig {
    base_url:       settings.base_url.clone(),
    session_cookie: settings.session_cookie.clone(),
  })
  .context("creating HTTP client")?;

  run(args.command, client, settings).await
}

async fn run(command: Command, client: HttpClient, settings: Settings) -> Result<()> {
  let mut app = App::new(client, settings.owner_id);

  match command {
    Command::Users => {
      let directory = app.load_users().await?;
      print!("{}", render::directory(directory.entries()));
      println!("{}", render::share_options(&directory.options()));
    }

    Command::Profile { ids, open } => {
      app.show_profile(ids).await?;
      print!("{}", render::profile(&app.title, &app.profile.view()));
      if let Some(photo_id) = open {
        let route = app
          .open_photo(PhotoId::new(photo_id))
          .context("no profile is shown")?;
        println!("{}", render::route(&route));
      }
    }

    Command::Upload {
      file,
      private,
      share,
    } => {
      let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
      let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("upload path has no file name")?;

      let outcome = app
        .upload_photo(file_name, Bytes::from(bytes), AudienceArgs { private, share })
        .await?;
      println!("{}", render::upload(outcome));
      if !outcome.is_success() {
        bail!("upload failed");
      }
    }

    Command::Logout => {
      app.logout().await;
      println!("Logged out");
    }

    Command::Version => {
      let info = app.api.app_info().await.context("fetching server version")?;
      println!("Version: {}", info.version);
    }
  }

  Ok(())
}
