//! Veracity Adapters - External adapters for veracity.
//!
//! This crate provides media intake:
//! - Filesystem files and directories
//! - Remote media referenced by URL

pub mod fs;
pub mod intake;
pub mod url;

pub use fs::{kind_for_path, media_from_path};
pub use intake::MediaIntake;
pub use url::{is_url, media_from_url};
