#![forbid(unsafe_code)]

//! Playlist entries and time formatting.

use serde::{Deserialize, Serialize};

const ASSET_DIR: &str = "/src/public";

/// One playlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album_art: String,
    /// `None` plays in visual-only mode.
    #[serde(default)]
    pub audio_src: Option<String>,
    /// Length used by the visual-only clock. Ignored when the audio element
    /// reports its own duration.
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

impl Track {
    #[must_use]
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album_art: String::new(),
            audio_src: None,
            duration_secs: None,
        }
    }

    #[must_use]
    pub fn album_art(mut self, path: impl Into<String>) -> Self {
        self.album_art = path.into();
        self
    }

    #[must_use]
    pub fn audio(mut self, src: impl Into<String>) -> Self {
        self.audio_src = Some(src.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, secs: f64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.audio_src.is_some()
    }

    /// Title font size in px for the expanded card; long titles shrink so
    /// they fit two lines. Length is measured in UTF-16 code units, as the
    /// browser reports it.
    #[must_use]
    pub fn title_font_px(&self) -> u8 {
        match self.title.encode_utf16().count() {
            n if n > 25 => 10,
            n if n > 20 => 11,
            _ => 14,
        }
    }

    /// The stock playlist shipped with the site.
    #[must_use]
    pub fn stock_playlist() -> Vec<Self> {
        let entry = |title: &str, artist: &str, art: &str, audio: &str| {
            Self::new(title, artist)
                .album_art(format!("{ASSET_DIR}/{art}"))
                .audio(format!("{ASSET_DIR}/{audio}"))
        };
        vec![
            entry("Over My Dead Body", "Drake", "takecare.jpg", "Over My Dead Body.mp3"),
            entry("I Feel It Coming", "The Weeknd", "starboy.jpg", "I Feel It Coming.mp3"),
            entry(
                "Past Life",
                "Tame Impala",
                "currents.jpg",
                "Tame Impala - Past Life (Audio).mp3",
            ),
            entry("P2", "Lil Uzi Vert", "ea.jpeg", "Lil Uzi Vert - P2 [Official Audio].mp3"),
            entry("The Only One", "Lionel Richie", "lionel.jpg", "The Only One.mp3"),
            entry(
                "Chicken Tenders",
                "Dominic Fike",
                "dominic.jpg",
                "Dominic Fike - Chicken Tenders Official Video.mp3",
            ),
        ]
    }
}

/// Render seconds as `m:ss`. Negative or non-finite input renders `0:00`.
#[must_use]
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_owned();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}
