#![forbid(unsafe_code)]

//! The gallery scene: events in, frames out.
//!
//! [`GridScene`] owns every piece of gallery state and is driven entirely by
//! its host. Each call to [`GridScene::frame`] runs, in order:
//!
//! 1. the pan glide,
//! 2. the scheduler's due passes (cell positions, then proximity targets),
//! 3. the per-cell scale springs,
//! 4. the reveal fades,
//!
//! and returns a [`SceneFrame`] describing what to draw. Cells are emitted in
//! row-major order and only their transforms change from frame to frame.

use std::time::Duration;

use folio_core::animation::{Animation, Fade, ease_in, ease_out};
use folio_core::event::{Buttons, Event, PointerEvent, PointerEventKind};
use folio_core::{Size, Vec2};
use web_time::Instant;

use crate::config::{GalleryConfig, ImagePolicy};
use crate::error::Result;
use crate::pan::PanController;
use crate::pool::{ImagePool, ImageRef, ShuffleSource};
use crate::preload::{LoadOutcome, PreloadTracker, SettleResult};
use crate::proximity::ProximityEffect;
use crate::registry::CellRegistry;
use crate::scheduler::{Deps, FrameScheduler, PassId};
use crate::theme::{Rgba, Theme};
use crate::viewport::{CellId, GridLayout, ResizeOutcome, ViewportSizer};

/// Loading indicator state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRing {
    /// Settled images over requested images, in `[0, 1]`.
    pub fraction: f64,
    pub opacity: f32,
}

/// Where and how large to draw one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellTransform {
    pub id: CellId,
    /// Top-left corner, container px.
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    /// `None` draws the placeholder (no image, or the load failed).
    pub image: Option<ImageRef>,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub background: Rgba,
    pub cell_fill: Rgba,
    pub cell_ring: Rgba,
    pub cell_size: f64,
    pub grid_opacity: f32,
    /// Omitted once the reveal has finished.
    pub indicator: Option<ProgressRing>,
    pub cells: Vec<CellTransform>,
    /// False when nothing will change until the next input.
    pub animating: bool,
}

/// Fades started when the preload completes.
#[derive(Debug, Clone, Copy)]
struct Reveal {
    grid: Fade,
    indicator: Fade,
}

/// Gallery state machine.
#[derive(Debug, Clone)]
pub struct GridScene {
    config: GalleryConfig,
    base: Vec<ImageRef>,
    shuffle: ShuffleSource,
    sizer: ViewportSizer,
    pool: ImagePool,
    registry: CellRegistry,
    pan: PanController,
    effect: ProximityEffect,
    cursor: Option<Vec2>,
    preload: PreloadTracker,
    pending_requests: Vec<ImageRef>,
    scheduler: FrameScheduler,
    position_pass: PassId,
    scale_pass: PassId,
    reveal: Option<Reveal>,
    theme: Theme,
    frames: u64,
}

impl GridScene {
    /// Build the scene for an initial viewport.
    ///
    /// Fails only if `config` does not validate.
    pub fn new(config: GalleryConfig, viewport: Size, mut shuffle: ShuffleSource) -> Result<Self> {
        let config = config.checked()?;
        let base: Vec<ImageRef> = config
            .images
            .base
            .iter()
            .map(|path| ImageRef::from(path.as_str()))
            .collect();

        let sizer = ViewportSizer::new(viewport, config.grid.clone());
        let pool = ImagePool::build(&base, sizer.dims().cell_count(), &mut shuffle);
        let mut registry = CellRegistry::new();
        registry.reconcile(sizer.layout(), &pool, &config.proximity);

        let pending_requests = pool.distinct();
        let preload = PreloadTracker::new(pending_requests.iter().cloned());

        let mut scheduler = FrameScheduler::new();
        let position_pass = scheduler.register("positions", Deps::LAYOUT | Deps::OFFSET);
        let scale_pass = scheduler.register("scales", Deps::all());
        scheduler.invalidate(Deps::LAYOUT);

        tracing::info!(
            target: "folio.gallery",
            cols = sizer.dims().cols,
            rows = sizer.dims().rows,
            images = base.len(),
            requests = pending_requests.len(),
            policy = ?config.images.policy,
            "gallery scene created"
        );

        let mut scene = Self {
            pan: PanController::new(&config.pan),
            effect: ProximityEffect::new(&config.proximity),
            config,
            base,
            shuffle,
            sizer,
            pool,
            registry,
            cursor: None,
            preload,
            pending_requests,
            scheduler,
            position_pass,
            scale_pass,
            reveal: None,
            theme: Theme::default(),
            frames: 0,
        };
        scene.start_reveal_if_ready();
        Ok(scene)
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// Route a host event.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Pointer(pointer) => self.pointer(pointer),
            Event::Resize(size) => {
                self.resize(*size);
            }
            Event::Focus(false) => self.pan.cancel(),
            Event::Focus(true) => {}
        }
    }

    /// Apply a pointer event to the pan controller and the cursor.
    pub fn pointer(&mut self, event: &PointerEvent) {
        let position = event.position;
        match event.kind {
            PointerEventKind::Down => {
                self.pan.pointer_down(position);
                self.set_cursor(Some(position));
            }
            PointerEventKind::Move => {
                self.set_cursor(Some(position));
                if self.pan.is_pressed() && !event.buttons.contains(Buttons::PRIMARY) {
                    // The release happened outside the surface.
                    self.pan.pointer_up();
                } else {
                    self.pan.pointer_move(position);
                }
            }
            PointerEventKind::Up => {
                self.pan.pointer_up();
                self.set_cursor(Some(position));
            }
            PointerEventKind::Leave => self.set_cursor(None),
            PointerEventKind::Cancel => {
                self.pan.cancel();
                self.set_cursor(None);
            }
        }
    }

    /// Apply a viewport size. Rebuilds the pool and cell list only when the
    /// grid shape changes. The pan offset is never touched.
    pub fn resize(&mut self, viewport: Size) -> ResizeOutcome {
        let outcome = self.sizer.resize(viewport);
        if let ResizeOutcome::Rebuilt { dims, .. } = outcome {
            self.pool = ImagePool::build(&self.base, dims.cell_count(), &mut self.shuffle);
            let stats =
                self.registry
                    .reconcile(self.sizer.layout(), &self.pool, &self.config.proximity);
            let added = self.preload.track(self.pool.distinct());
            tracing::debug!(
                target: "folio.gallery",
                cells = dims.cell_count(),
                reused = stats.reused,
                new_requests = added.len(),
                "pool rebuilt after resize"
            );
            self.pending_requests.extend(added);
            self.scheduler.invalidate(Deps::LAYOUT);
        }
        outcome
    }

    /// Report the outcome of an image load.
    pub fn image_settled(&mut self, image: &ImageRef, outcome: LoadOutcome) -> SettleResult {
        let result = self.preload.settle(image, outcome);
        if result == SettleResult::Counted {
            self.start_reveal_if_ready();
        }
        result
    }

    /// Images the host should start loading. Each is returned once.
    pub fn take_preload_requests(&mut self) -> Vec<ImageRef> {
        std::mem::take(&mut self.pending_requests)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            tracing::debug!(target: "folio.gallery", ?theme, "theme changed");
            self.theme = theme;
        }
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Advance by `dt` and describe the frame.
    pub fn frame(&mut self, dt: Duration) -> SceneFrame {
        self.frames += 1;
        let _span = tracing::debug_span!(
            "gallery.frame",
            frame = self.frames,
            dt_us = dt.as_micros() as u64,
        )
        .entered();
        let start = Instant::now();

        if self.pan.tick(dt) {
            self.scheduler.invalidate(Deps::OFFSET);
        }

        let due = self.scheduler.begin_frame();
        for pass in &due {
            if *pass == self.position_pass {
                self.update_positions();
            } else if *pass == self.scale_pass {
                self.update_scale_targets();
            }
        }

        let mut scales_moving = false;
        for entry in self.registry.entries_mut() {
            entry.scale.tick(dt);
            scales_moving |= !entry.scale.is_at_rest();
        }

        if let Some(reveal) = &mut self.reveal {
            reveal.grid.tick(dt);
            reveal.indicator.tick(dt);
        }

        let frame = self.describe(scales_moving);

        tracing::trace!(
            target: "folio.gallery",
            passes = due.len(),
            cells = frame.cells.len(),
            duration_us = start.elapsed().as_micros() as u64,
            "frame built"
        );
        frame
    }

    fn update_positions(&mut self) {
        let layout = self.sizer.layout();
        let space = layout.wrap_space();
        let stride = layout.stride();
        let offset = self.pan.offset();
        let policy = self.config.images.policy;

        for entry in self.registry.entries_mut() {
            let base = entry.base(stride);
            entry.position = space.wrap(base, offset);
            entry.laps = space.laps(base, offset);
            if policy == ImagePolicy::ShiftOnWrap {
                let image = self.pool.image_for(entry.slot_index, entry.laps, policy);
                if entry.image.as_ref() != image {
                    entry.image = image.cloned();
                }
            }
        }
    }

    fn update_scale_targets(&mut self) {
        let half = self.config.grid.cell_size / 2.0;
        let center_offset = Vec2::new(half, half);
        for entry in self.registry.entries_mut() {
            let center = entry.position + center_offset;
            let target = self.effect.scale_at(self.cursor, center);
            entry.scale.retarget(target);
        }
    }

    fn describe(&self, scales_moving: bool) -> SceneFrame {
        let cells = self
            .registry
            .entries()
            .iter()
            .map(|entry| CellTransform {
                id: entry.id,
                x: entry.position.x,
                y: entry.position.y,
                scale: entry.scale.scale(),
                image: entry
                    .image
                    .as_ref()
                    .filter(|image| self.preload.outcome(image) != Some(LoadOutcome::Failed))
                    .cloned(),
            })
            .collect();

        let fraction = self.preload.fraction();
        let (grid_opacity, indicator, revealing) = match &self.reveal {
            None => (0.0, Some(ProgressRing { fraction, opacity: 1.0 }), false),
            Some(reveal) => {
                let indicator = (!reveal.indicator.is_complete()).then(|| ProgressRing {
                    fraction,
                    opacity: reveal.indicator.value(),
                });
                let revealing = !reveal.grid.is_complete() || !reveal.indicator.is_complete();
                (reveal.grid.value(), indicator, revealing)
            }
        };

        SceneFrame {
            background: self.theme.background(),
            cell_fill: self.theme.cell_fill(),
            cell_ring: self.theme.cell_ring(),
            cell_size: self.config.grid.cell_size,
            grid_opacity,
            indicator,
            cells,
            animating: !self.pan.is_settled() || scales_moving || revealing,
        }
    }

    fn set_cursor(&mut self, cursor: Option<Vec2>) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.scheduler.invalidate(Deps::CURSOR);
        }
    }

    fn start_reveal_if_ready(&mut self) {
        if self.reveal.is_some() || !self.preload.is_complete() {
            return;
        }
        let fade = &self.config.fade;
        self.reveal = Some(Reveal {
            grid: Fade::new(Duration::from_millis(fade.grid_fade_in_ms)).easing(ease_out),
            indicator: Fade::new(Duration::from_millis(fade.indicator_fade_out_ms))
                .easing(ease_in)
                .reversed(),
        });
        tracing::info!(
            target: "folio.gallery",
            images = self.preload.total(),
            failed = self.preload.failed(),
            "all images settled, revealing grid"
        );
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        self.sizer.layout()
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.sizer.viewport()
    }

    #[must_use]
    pub fn pool(&self) -> &ImagePool {
        &self.pool
    }

    #[must_use]
    pub fn registry(&self) -> &CellRegistry {
        &self.registry
    }

    #[must_use]
    pub fn pan(&self) -> &PanController {
        &self.pan
    }

    #[must_use]
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    #[must_use]
    pub fn preload(&self) -> &PreloadTracker {
        &self.preload
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.preload.is_complete()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }
}
