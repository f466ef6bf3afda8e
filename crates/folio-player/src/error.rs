#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors from building or driving a [`Player`](crate::Player).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("playlist is empty")]
    EmptyPlaylist,

    #[error("track {index} out of range for playlist of {len}")]
    TrackOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, PlayerError>;
