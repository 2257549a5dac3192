//! # playtrack-core
//!
//! Core crate for Playtrack. Contains the unified error system,
//! configuration schemas, engine identifiers, the video player event
//! taxonomy, and the flattened event catalog.
//!
//! This crate has **no** internal dependencies on other Playtrack crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::PlaytrackError;
pub use result::PlaytrackResult;
