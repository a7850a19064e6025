//! HTTP implementation of [`photoshare_core::api::PhotoApi`].
//!
//! Talks to the photo-sharing server's JSON endpoints with [`reqwest`]. The
//! session cookie, if any, comes from configuration; logging in is somebody
//! else's job.

mod client;

pub mod error;

pub use client::{AppInfo, ClientConfig, HttpClient};
pub use error::{HttpError, Result};

#[cfg(test)]
mod tests;
