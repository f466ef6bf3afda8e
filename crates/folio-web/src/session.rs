#![forbid(unsafe_code)]

//! Host-driven session.
//!
//! The host pushes [`HostEvent`]s whenever they happen and calls
//! [`WebSession::step`] once per animation frame. Queued events are applied
//! in arrival order at the start of the step, then the gallery and player
//! advance by `dt` and the step returns a [`SessionFrame`].
//!
//! After [`WebSession::teardown`] every input is ignored and `step` returns
//! `None`.

use std::collections::VecDeque;
use std::time::Duration;

use folio_core::Size;
use folio_gallery::{
    ConfigError, GalleryConfig, GridScene, ImageRef, SceneFrame, ShuffleSource,
};
use folio_player::{AudioCommand, Player, PlayerError, PlayerView, Track};
use thiserror::Error;

use crate::listeners::{Listener, ListenerKind, ListenerRegistry};
use crate::{DeterministicClock, HostEvent, PlayerAction};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid gallery config: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot start player: {0}")]
    Player(#[from] PlayerError),
}

/// Output of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFrame {
    /// Session time after this step.
    pub now: Duration,
    pub scene: SceneFrame,
    pub player: PlayerView,
    /// Commands for the audio element, in order.
    pub audio: Vec<AudioCommand>,
    /// Images the host should start loading.
    pub preload: Vec<ImageRef>,
    /// False when the host may stop requesting frames until the next input.
    pub animating: bool,
}

/// What the host must release on teardown.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Teardown {
    pub listeners: Vec<Listener>,
    pub audio: Vec<AudioCommand>,
}

#[derive(Debug)]
pub struct WebSession {
    clock: DeterministicClock,
    queue: VecDeque<HostEvent>,
    scene: GridScene,
    player: Player,
    listeners: ListenerRegistry,
    pending_audio: Vec<AudioCommand>,
    torn_down: bool,
    steps: u64,
}

impl WebSession {
    /// Start a session.
    ///
    /// `seed` fixes the image shuffle; `None` falls back to the config's
    /// seed, then to OS entropy.
    pub fn new(
        config: GalleryConfig,
        tracks: Vec<Track>,
        viewport: Size,
        seed: Option<u64>,
    ) -> Result<Self, SessionError> {
        let shuffle = ShuffleSource::from_seed_option(seed.or(config.images.seed));
        let scene = GridScene::new(config, viewport, shuffle)?;
        let player = Player::new(tracks)?;

        let mut listeners = ListenerRegistry::new();
        for kind in ListenerKind::GALLERY.into_iter().chain(ListenerKind::AUDIO) {
            listeners.register(kind);
        }

        tracing::info!(
            target: "folio.web",
            width = viewport.width,
            height = viewport.height,
            tracks = player.tracks().len(),
            listeners = listeners.len(),
            "session started"
        );

        Ok(Self {
            clock: DeterministicClock::new(),
            queue: VecDeque::new(),
            pending_audio: player.load_current(),
            scene,
            player,
            listeners,
            torn_down: false,
            steps: 0,
        })
    }

    /// Queue a host event for the next step. Ignored after teardown.
    pub fn push_event(&mut self, event: impl Into<HostEvent>) {
        if self.torn_down {
            tracing::trace!(target: "folio.web", "event after teardown ignored");
            return;
        }
        self.queue.push_back(event.into());
    }

    /// Apply queued events, advance time by `dt`, and describe the frame.
    pub fn step(&mut self, dt: Duration) -> Option<SessionFrame> {
        if self.torn_down {
            return None;
        }
        self.steps += 1;
        self.clock.advance(dt);

        let queued = self.queue.len();
        while let Some(event) = self.queue.pop_front() {
            self.dispatch(event);
        }

        let scene = self.scene.frame(dt);
        let tick_audio = self.player.tick(dt);
        self.pending_audio.extend(tick_audio);

        let animating = scene.animating || self.player.is_animating();
        let frame = SessionFrame {
            now: self.clock.now(),
            scene,
            player: self.player.view(),
            audio: std::mem::take(&mut self.pending_audio),
            preload: self.scene.take_preload_requests(),
            animating,
        };

        tracing::trace!(
            target: "folio.web",
            step = self.steps,
            events = queued,
            audio = frame.audio.len(),
            preload = frame.preload.len(),
            animating,
            "step"
        );
        Some(frame)
    }

    fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::Input(input) => self.scene.handle_event(&input),
            HostEvent::ImageSettled { image, outcome } => {
                self.scene.image_settled(&image, outcome);
            }
            HostEvent::Theme(theme) => self.scene.set_theme(theme),
            HostEvent::Audio(audio) => {
                let commands = self.player.on_audio_event(audio);
                self.pending_audio.extend(commands);
            }
            HostEvent::Player(action) => {
                let commands = match action {
                    PlayerAction::TogglePlay => self.player.toggle_play(),
                    PlayerAction::Next => self.player.next(),
                    PlayerAction::Previous => self.player.previous(),
                    PlayerAction::Seek(fraction) => self.player.seek_fraction(fraction),
                    PlayerAction::Select(index) => match self.player.select(index) {
                        Ok(commands) => commands,
                        Err(err) => {
                            tracing::debug!(target: "folio.web", %err, "track selection ignored");
                            Vec::new()
                        }
                    },
                    PlayerAction::ToggleExpanded => {
                        self.player.toggle_expanded();
                        Vec::new()
                    }
                };
                self.pending_audio.extend(commands);
            }
        }
    }

    /// Stop the session and return everything the host must release.
    ///
    /// A second call returns an empty [`Teardown`].
    pub fn teardown(&mut self) -> Teardown {
        if self.torn_down {
            return Teardown::default();
        }
        self.torn_down = true;
        let dropped = self.queue.len();
        self.queue.clear();
        self.pending_audio.clear();

        let listeners = self.listeners.drain_all();
        let audio = if self.player.current().has_audio() {
            vec![AudioCommand::Pause, AudioCommand::Unload]
        } else {
            Vec::new()
        };

        tracing::info!(
            target: "folio.web",
            listeners = listeners.len(),
            dropped_events = dropped,
            steps = self.steps,
            "session torn down"
        );
        Teardown { listeners, audio }
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn scene(&self) -> &GridScene {
        &self.scene
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[must_use]
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Events waiting for the next step.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }
}
