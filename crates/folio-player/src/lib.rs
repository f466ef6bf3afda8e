#![forbid(unsafe_code)]

//! Music-player widget.
//!
//! # Role in Folio
//! A compact now-playing card pinned to the page corner. It cycles through a
//! fixed playlist, shows progress, and slides open into an expanded panel.
//!
//! The player never touches an audio device. Every transition that needs one
//! returns [`AudioCommand`]s for the host to execute, and the host reports
//! back with [`AudioEvent`]s. Tracks without an audio source fall back to a
//! visual-only clock driven by [`Player::tick`].

pub mod error;
pub mod panel;
pub mod player;
pub mod track;

pub use error::PlayerError;
pub use panel::PanelMotion;
pub use player::{AudioCommand, AudioEvent, Player, PlayerView};
pub use track::{Track, format_time};
