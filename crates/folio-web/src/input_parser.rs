#![forbid(unsafe_code)]

//! JSON host message parser.
//!
//! JS glue that forwards DOM events as JSON strings can turn them into
//! [`HostEvent`]s with [`parse_host_message`]:
//!
//! ```json
//! {"kind":"pointer","phase":"move","x":120.5,"y":40,"buttons":1}
//! {"kind":"resize","width":1280,"height":720}
//! {"kind":"focus","focused":false}
//! {"kind":"image","src":"/img/a.jpg","ok":true}
//! {"kind":"theme","theme":"dark"}
//! {"kind":"audio","phase":"timeupdate","current":12.3,"duration":201.0}
//! {"kind":"player","action":"seek","fraction":0.4}
//! {"kind":"player","action":"select","index":2}
//! ```
//!
//! Unknown kinds return `Ok(None)` so newer glue can send messages an older
//! engine does not understand.

use folio_core::Size;
use folio_core::event::{Buttons, Event, PointerEvent, PointerEventKind};
use folio_gallery::{ImageRef, LoadOutcome, Theme};
use folio_player::AudioEvent;
use serde::Deserialize;
use thiserror::Error;

use crate::{HostEvent, PlayerAction};

#[derive(Debug, Error)]
pub enum InputParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    kind: String,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    buttons: Option<u8>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    focused: Option<bool>,
    #[serde(default)]
    src: Option<String>,
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    theme: Option<Theme>,
    #[serde(default)]
    current: Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    fraction: Option<f64>,
    #[serde(default)]
    index: Option<usize>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, InputParseError> {
    value.ok_or(InputParseError::MissingField(field))
}

fn unknown(field: &'static str, value: &str) -> InputParseError {
    InputParseError::UnknownValue {
        field,
        value: value.to_owned(),
    }
}

/// Parse one JSON message into a host event.
pub fn parse_host_message(json: &str) -> Result<Option<HostEvent>, InputParseError> {
    let raw: RawMessage = serde_json::from_str(json)?;

    let event = match raw.kind.as_str() {
        "pointer" => HostEvent::Input(Event::Pointer(parse_pointer(&raw)?)),
        "resize" => HostEvent::Input(Event::Resize(Size::new(
            required(raw.width, "width")?,
            required(raw.height, "height")?,
        ))),
        "focus" => HostEvent::Input(Event::Focus(required(raw.focused, "focused")?)),
        "image" => HostEvent::ImageSettled {
            image: ImageRef::from(required(raw.src, "src")?),
            outcome: if required(raw.ok, "ok")? {
                LoadOutcome::Loaded
            } else {
                LoadOutcome::Failed
            },
        },
        "theme" => HostEvent::Theme(required(raw.theme, "theme")?),
        "audio" => HostEvent::Audio(parse_audio(&raw)?),
        "player" => HostEvent::Player(parse_action(&raw)?),
        _ => return Ok(None),
    };
    Ok(Some(event))
}

fn parse_pointer(raw: &RawMessage) -> Result<PointerEvent, InputParseError> {
    let phase = required(raw.phase.as_deref(), "phase")?;
    let kind = match phase {
        "down" => PointerEventKind::Down,
        "move" => PointerEventKind::Move,
        "up" => PointerEventKind::Up,
        "leave" => PointerEventKind::Leave,
        "cancel" => PointerEventKind::Cancel,
        other => return Err(unknown("phase", other)),
    };
    let buttons = Buttons::from_bits_truncate(raw.buttons.unwrap_or(0));
    Ok(PointerEvent::new(kind, required(raw.x, "x")?, required(raw.y, "y")?).buttons(buttons))
}

fn parse_audio(raw: &RawMessage) -> Result<AudioEvent, InputParseError> {
    match required(raw.phase.as_deref(), "phase")? {
        "loadedmetadata" | "canplay" => Ok(AudioEvent::MetadataLoaded {
            duration: required(raw.duration, "duration")?,
        }),
        "timeupdate" => Ok(AudioEvent::TimeUpdate {
            current: required(raw.current, "current")?,
            duration: raw.duration,
        }),
        "ended" => Ok(AudioEvent::Ended),
        other => Err(unknown("phase", other)),
    }
}

fn parse_action(raw: &RawMessage) -> Result<PlayerAction, InputParseError> {
    match required(raw.action.as_deref(), "action")? {
        "toggle-play" => Ok(PlayerAction::TogglePlay),
        "next" => Ok(PlayerAction::Next),
        "previous" => Ok(PlayerAction::Previous),
        "seek" => Ok(PlayerAction::Seek(required(raw.fraction, "fraction")?)),
        "select" => Ok(PlayerAction::Select(required(raw.index, "index")?)),
        "toggle-expanded" => Ok(PlayerAction::ToggleExpanded),
        other => Err(unknown("action", other)),
    }
}
