//! Convenience result type alias for Playtrack.

use crate::error::PlaytrackError;

/// A specialized `Result` type for Playtrack operations.
///
/// Plugin capabilities return this so that every plugin crate does not need
/// to write `Result<T, PlaytrackError>` explicitly.
pub type PlaytrackResult<T> = Result<T, PlaytrackError>;
