#![forbid(unsafe_code)]

//! Playback state machine.
//!
//! # Invariants
//!
//! 1. The playlist is never empty, so `index < tracks.len()` always holds.
//! 2. `next`/`previous` wrap around the playlist and always start playback.
//! 3. Seeking is a no-op until a duration is known.
//! 4. Only finite, positive durations are accepted from the host.
//! 5. Audio commands are only emitted for tracks with an audio source.

use std::time::Duration;

use crate::error::{PlayerError, Result};
use crate::panel::PanelMotion;
use crate::track::{Track, format_time};

/// `previous` restarts the current track instead of going back once this
/// much of it has played.
const RESTART_THRESHOLD_SECS: f64 = 3.0;

const VISUAL_TICK: Duration = Duration::from_secs(1);

/// Requests for the host's audio element.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Replace the current source and start loading its metadata.
    Load { src: String },
    /// Release the current source; the new track is visual-only.
    Unload,
    Play,
    Pause,
    Seek { seconds: f64 },
}

/// Notifications from the host's audio element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    MetadataLoaded { duration: f64 },
    TimeUpdate { current: f64, duration: Option<f64> },
    Ended,
}

/// Snapshot for drawing the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub title: String,
    pub artist: String,
    pub album_art: String,
    pub title_font_px: u8,
    pub playing: bool,
    pub expanded: bool,
    pub progress_fraction: f64,
    pub elapsed_label: String,
    pub duration_label: String,
    pub panel_offset: f64,
    pub panel_height: f64,
}

#[derive(Debug, Clone)]
pub struct Player {
    tracks: Vec<Track>,
    index: usize,
    playing: bool,
    progress: f64,
    duration: Option<f64>,
    expanded: bool,
    panel: PanelMotion,
    visual_clock: Duration,
}

fn valid_duration(secs: f64) -> Option<f64> {
    (secs.is_finite() && secs > 0.0).then_some(secs)
}

impl Player {
    /// Paused on the first track, panel collapsed.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        let duration = Self::static_duration(&tracks[0]);
        Ok(Self {
            tracks,
            index: 0,
            playing: false,
            progress: 0.0,
            duration,
            expanded: false,
            panel: PanelMotion::new(),
            visual_clock: Duration::ZERO,
        })
    }

    /// Commands to prepare the current track; call once after construction.
    #[must_use]
    pub fn load_current(&self) -> Vec<AudioCommand> {
        match &self.current().audio_src {
            Some(src) => vec![AudioCommand::Load { src: src.clone() }],
            None => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    pub fn toggle_play(&mut self) -> Vec<AudioCommand> {
        if self.playing { self.pause() } else { self.play() }
    }

    pub fn play(&mut self) -> Vec<AudioCommand> {
        if self.playing {
            return Vec::new();
        }
        self.playing = true;
        tracing::debug!(target: "folio.player", index = self.index, "play");
        self.audio_only(AudioCommand::Play)
    }

    pub fn pause(&mut self) -> Vec<AudioCommand> {
        if !self.playing {
            return Vec::new();
        }
        self.playing = false;
        tracing::debug!(target: "folio.player", index = self.index, "pause");
        self.audio_only(AudioCommand::Pause)
    }

    /// Advance to the following track (wrapping) and start it.
    pub fn next(&mut self) -> Vec<AudioCommand> {
        let next = (self.index + 1) % self.tracks.len();
        self.switch_to(next)
    }

    /// Restart the current track if it has played for more than three
    /// seconds, otherwise go back one track (wrapping) and start it.
    pub fn previous(&mut self) -> Vec<AudioCommand> {
        if self.progress > RESTART_THRESHOLD_SECS {
            self.progress = 0.0;
            self.visual_clock = Duration::ZERO;
            return self.audio_only(AudioCommand::Seek { seconds: 0.0 });
        }
        let len = self.tracks.len();
        self.switch_to((self.index + len - 1) % len)
    }

    /// Jump to a specific track and start it.
    pub fn select(&mut self, index: usize) -> Result<Vec<AudioCommand>> {
        if index >= self.tracks.len() {
            return Err(PlayerError::TrackOutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        Ok(self.switch_to(index))
    }

    /// Seek to `fraction` of the track, clamped to `[0, 1]`. Does nothing
    /// while the duration is unknown.
    pub fn seek_fraction(&mut self, fraction: f64) -> Vec<AudioCommand> {
        let Some(duration) = self.duration else {
            return Vec::new();
        };
        if fraction.is_nan() {
            return Vec::new();
        }
        let seconds = fraction.clamp(0.0, 1.0) * duration;
        self.progress = seconds;
        self.audio_only(AudioCommand::Seek { seconds })
    }

    fn switch_to(&mut self, index: usize) -> Vec<AudioCommand> {
        self.index = index;
        self.progress = 0.0;
        self.visual_clock = Duration::ZERO;
        self.duration = Self::static_duration(&self.tracks[index]);
        self.playing = true;

        let track = &self.tracks[index];
        tracing::info!(
            target: "folio.player",
            index,
            title = %track.title,
            artist = %track.artist,
            "track changed"
        );

        match &track.audio_src {
            Some(src) => vec![
                AudioCommand::Load { src: src.clone() },
                AudioCommand::Play,
            ],
            None => vec![AudioCommand::Unload],
        }
    }

    // -----------------------------------------------------------------------
    // Host feedback and time
    // -----------------------------------------------------------------------

    pub fn on_audio_event(&mut self, event: AudioEvent) -> Vec<AudioCommand> {
        match event {
            AudioEvent::MetadataLoaded { duration } => {
                if let Some(duration) = valid_duration(duration) {
                    self.duration = Some(duration);
                } else {
                    tracing::trace!(target: "folio.player", duration, "ignoring unusable duration");
                }
                Vec::new()
            }
            AudioEvent::TimeUpdate { current, duration } => {
                if current.is_finite() && current >= 0.0 {
                    self.progress = current;
                }
                if self.duration.is_none() {
                    self.duration = duration.and_then(valid_duration);
                }
                Vec::new()
            }
            AudioEvent::Ended => self.next(),
        }
    }

    /// Advance the panel springs and, for visual-only tracks, the one-second
    /// progress clock.
    pub fn tick(&mut self, dt: Duration) -> Vec<AudioCommand> {
        self.panel.tick(dt);

        if !self.playing || self.current().has_audio() {
            return Vec::new();
        }
        self.visual_clock += dt;
        while self.visual_clock >= VISUAL_TICK {
            self.visual_clock -= VISUAL_TICK;
            match self.duration {
                Some(duration) if self.progress >= duration => return self.next(),
                _ => self.progress += 1.0,
            }
        }
        Vec::new()
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
        self.panel.set_expanded(self.expanded);
        tracing::trace!(target: "folio.player", expanded = self.expanded, "panel toggled");
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn current(&self) -> &Track {
        &self.tracks[self.index]
    }

    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Elapsed seconds.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// `progress / duration` in `[0, 1]`; 0 while the duration is unknown.
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        match self.duration {
            Some(duration) => (self.progress / duration).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    #[must_use]
    pub fn panel(&self) -> &PanelMotion {
        &self.panel
    }

    /// Whether anything would change on the next tick without input.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.panel.is_at_rest() || (self.playing && !self.current().has_audio())
    }

    #[must_use]
    pub fn view(&self) -> PlayerView {
        let track = self.current();
        PlayerView {
            title: track.title.clone(),
            artist: track.artist.clone(),
            album_art: track.album_art.clone(),
            title_font_px: track.title_font_px(),
            playing: self.playing,
            expanded: self.expanded,
            progress_fraction: self.progress_fraction(),
            elapsed_label: format_time(self.progress),
            duration_label: format_time(self.duration.unwrap_or(0.0)),
            panel_offset: self.panel.offset(),
            panel_height: self.panel.height(),
        }
    }

    fn static_duration(track: &Track) -> Option<f64> {
        if track.has_audio() {
            None
        } else {
            track.duration_secs.and_then(valid_duration)
        }
    }

    fn audio_only(&self, command: AudioCommand) -> Vec<AudioCommand> {
        if self.current().has_audio() {
            vec![command]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio_tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track::new(format!("T{i}"), "A").audio(format!("{i}.mp3")))
            .collect()
    }

    fn loaded(n: usize, duration: f64) -> Player {
        let mut player = Player::new(audio_tracks(n)).unwrap();
        player.on_audio_event(AudioEvent::MetadataLoaded { duration });
        player
    }

    #[test]
    fn empty_playlist_rejected() {
        assert_eq!(Player::new(Vec::new()).unwrap_err(), PlayerError::EmptyPlaylist);
    }

    #[test]
    fn starts_paused_and_loads_first_track() {
        let player = Player::new(audio_tracks(3)).unwrap();
        assert!(!player.is_playing());
        assert_eq!(player.index(), 0);
        assert_eq!(
            player.load_current(),
            vec![AudioCommand::Load { src: "0.mp3".into() }]
        );
    }

    #[test]
    fn toggle_emits_play_then_pause() {
        let mut player = Player::new(audio_tracks(1)).unwrap();
        assert_eq!(player.toggle_play(), vec![AudioCommand::Play]);
        assert!(player.is_playing());
        assert_eq!(player.toggle_play(), vec![AudioCommand::Pause]);
        assert!(player.pause().is_empty());
    }

    #[test]
    fn next_wraps_and_autoplays() {
        let mut player = Player::new(audio_tracks(3)).unwrap();
        player.next();
        player.next();
        let commands = player.next();
        assert_eq!(player.index(), 0);
        assert!(player.is_playing());
        assert_eq!(
            commands,
            vec![AudioCommand::Load { src: "0.mp3".into() }, AudioCommand::Play]
        );
    }

    #[test]
    fn previous_restarts_after_three_seconds() {
        let mut player = loaded(3, 200.0);
        player.next();
        player.on_audio_event(AudioEvent::TimeUpdate {
            current: 3.5,
            duration: None,
        });
        let commands = player.previous();
        assert_eq!(commands, vec![AudioCommand::Seek { seconds: 0.0 }]);
        assert_eq!(player.index(), 1);
        assert_eq!(player.progress(), 0.0);
    }

    #[test]
    fn previous_goes_back_early_in_track() {
        let mut player = Player::new(audio_tracks(3)).unwrap();
        player.on_audio_event(AudioEvent::TimeUpdate {
            current: 3.0,
            duration: None,
        });
        player.previous();
        assert_eq!(player.index(), 2);
        assert!(player.is_playing());
    }

    #[test]
    fn seek_requires_duration() {
        let mut player = Player::new(audio_tracks(1)).unwrap();
        assert!(player.seek_fraction(0.5).is_empty());
        assert_eq!(player.progress(), 0.0);
    }

    #[test]
    fn seek_clamps_fraction() {
        let mut player = loaded(1, 120.0);
        assert_eq!(player.seek_fraction(0.25), vec![AudioCommand::Seek { seconds: 30.0 }]);
        assert_eq!(player.seek_fraction(4.0), vec![AudioCommand::Seek { seconds: 120.0 }]);
        assert_eq!(player.seek_fraction(-1.0), vec![AudioCommand::Seek { seconds: 0.0 }]);
        assert!(player.seek_fraction(f64::NAN).is_empty());
    }

    #[test]
    fn rejects_unusable_durations() {
        let mut player = Player::new(audio_tracks(1)).unwrap();
        for bad in [f64::NAN, f64::INFINITY, 0.0, -4.0] {
            player.on_audio_event(AudioEvent::MetadataLoaded { duration: bad });
            assert_eq!(player.duration(), None);
        }
        assert_eq!(player.progress_fraction(), 0.0);
    }

    #[test]
    fn late_duration_from_time_update() {
        let mut player = Player::new(audio_tracks(1)).unwrap();
        player.on_audio_event(AudioEvent::TimeUpdate {
            current: 10.0,
            duration: Some(40.0),
        });
        assert_eq!(player.duration(), Some(40.0));
        assert!((player.progress_fraction() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn ended_advances() {
        let mut player = loaded(2, 10.0);
        player.play();
        player.on_audio_event(AudioEvent::Ended);
        assert_eq!(player.index(), 1);
        assert_eq!(player.duration(), None, "new track waits for metadata");
    }

    #[test]
    fn select_out_of_range() {
        let mut player = Player::new(audio_tracks(2)).unwrap();
        assert_eq!(
            player.select(5).unwrap_err(),
            PlayerError::TrackOutOfRange { index: 5, len: 2 }
        );
        assert!(player.select(1).is_ok());
        assert_eq!(player.index(), 1);
    }

    #[test]
    fn visual_only_clock_counts_whole_seconds() {
        let tracks = vec![
            Track::new("Silent", "A").duration(3.0),
            Track::new("Also silent", "B"),
        ];
        let mut player = Player::new(tracks).unwrap();
        assert!(player.play().is_empty(), "visual-only emits no audio commands");

        player.tick(Duration::from_millis(1500));
        assert_eq!(player.progress(), 1.0);
        player.tick(Duration::from_millis(1500));
        assert_eq!(player.progress(), 3.0);

        // At the duration the next whole second advances the track.
        let commands = player.tick(Duration::from_secs(1));
        assert_eq!(player.index(), 1);
        assert_eq!(commands, vec![AudioCommand::Unload]);
        assert_eq!(player.progress(), 0.0);
    }

    #[test]
    fn visual_only_without_duration_keeps_counting() {
        let mut player = Player::new(vec![Track::new("Silent", "A")]).unwrap();
        player.play();
        player.tick(Duration::from_secs(10));
        assert_eq!(player.progress(), 10.0);
        assert_eq!(player.index(), 0);
    }

    #[test]
    fn paused_clock_does_not_advance() {
        let mut player = Player::new(vec![Track::new("Silent", "A").duration(60.0)]).unwrap();
        player.tick(Duration::from_secs(5));
        assert_eq!(player.progress(), 0.0);
    }

    #[test]
    fn view_formats_labels() {
        let mut player = loaded(1, 125.0);
        player.on_audio_event(AudioEvent::TimeUpdate {
            current: 61.2,
            duration: None,
        });
        let view = player.view();
        assert_eq!(view.elapsed_label, "1:01");
        assert_eq!(view.duration_label, "2:05");
        assert!(!view.expanded);
    }

    #[test]
    fn expanding_moves_panel() {
        let mut player = Player::new(audio_tracks(1)).unwrap();
        player.toggle_expanded();
        for _ in 0..200 {
            player.tick(Duration::from_millis(16));
        }
        assert!(player.is_expanded());
        assert_eq!(player.panel().offset(), 0.0);
        assert_eq!(player.view().panel_height, 120.0);
    }
}
