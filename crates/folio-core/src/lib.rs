#![forbid(unsafe_code)]

//! Core: geometry, input events, animation primitives, and logging.
//!
//! # Role in Folio
//! `folio-core` is the leaf crate. It owns the pixel-space vector types, the
//! canonical pointer/resize events the host pushes in, and the time-stepped
//! animation primitives ([`animation::Spring`], [`animation::Fade`]) that the
//! gallery and player crates drive once per frame.
//!
//! # How it fits in the system
//! `folio-gallery` and `folio-player` build their state machines from these
//! types; `folio-web` feeds host input into them and advances time.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod logging;

pub use geometry::{Size, Vec2};
