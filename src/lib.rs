//! Scenerename - rename and organize video files from their release names
//!
//! This library crate exposes the renaming pipeline for integration testing:
//! filename parsing, overrides, templates, lookup services, the concurrent
//! mover and post-move conversion.

pub mod config;
pub mod conversion;
pub mod error;
pub mod media;
pub mod mover;
pub mod overrides;
pub mod parse;
pub mod paths;
pub mod processor;
pub mod prompt;
pub mod services;
pub mod template;

pub use error::{Error, Result};
