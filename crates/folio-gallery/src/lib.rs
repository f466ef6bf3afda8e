#![forbid(unsafe_code)]

//! Infinite wrap-around image grid.
//!
//! # Role in Folio
//! `folio-gallery` owns the gallery's coordinate and motion model. It turns a
//! viewport size into a grid of cells, assigns each cell an image from a
//! shuffled pool, glides a shared pan offset with a spring, wraps every cell
//! onto a torus, and scales cells near the cursor.
//!
//! # Data flow
//!
//! ```text
//! resize ──► ViewportSizer ──► GridLayout ──► ImagePool ──► CellRegistry
//!                                                             │
//! pointer ─► PanController ──► smoothed offset ──┐            │
//!        └─► cursor ─────────────────────────────┼─► FrameScheduler passes
//!                                                │     (wrap, proximity)
//! image settled ─► PreloadTracker ─► ready/fade  └──► SceneFrame
//! ```
//!
//! Everything is single-threaded and host-driven: the host pushes events and
//! calls [`GridScene::frame`] once per animation frame.

pub mod config;
pub mod error;
pub mod pan;
pub mod pool;
pub mod preload;
pub mod proximity;
pub mod registry;
pub mod scene;
pub mod scheduler;
pub mod theme;
pub mod viewport;
pub mod wrap;

pub use config::GalleryConfig;
pub use error::{ConfigError, Result};
pub use pool::{ImagePool, ImageRef, ShuffleSource};
pub use preload::LoadOutcome;
pub use scene::{CellTransform, GridScene, ProgressRing, SceneFrame};
pub use theme::{Rgba, Theme};
pub use viewport::{CellId, GridDims, GridLayout, ResizeOutcome, ViewportSizer};
