//! Core types and client-side state machines for the photo-sharing client.
//!
//! This crate is free of HTTP dependencies. The transport is reached only
//! through the [`api::PhotoApi`] trait, implemented by `photoshare-client`.

pub mod api;
pub mod audience;
pub mod error;
pub mod notify;
pub mod photo;
pub mod profile;
pub mod upload;
pub mod user;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
