//! Full host-driven sessions: preload and reveal, panning, the audio
//! command stream, and teardown.

use std::time::Duration;

use folio_core::Size;
use folio_core::event::{Buttons, Event, PointerEvent};
use folio_gallery::{GalleryConfig, ImageRef, LoadOutcome, Theme};
use folio_player::{AudioCommand, AudioEvent, Track};
use folio_web::{HostEvent, ListenerKind, PlayerAction, SessionFrame, WebSession};
use pretty_assertions::assert_eq;

const MS_16: Duration = Duration::from_millis(16);

fn config(images: usize) -> GalleryConfig {
    let mut config = GalleryConfig::default();
    config.images.base = (0..images).map(|i| format!("/img/{i}.jpg")).collect();
    config
}

fn started(images: usize) -> (WebSession, SessionFrame) {
    let mut session =
        WebSession::new(config(images), Track::stock_playlist(), Size::new(1000, 800), Some(7))
            .unwrap();
    let frame = session.step(MS_16).unwrap();
    (session, frame)
}

fn settle_all(session: &mut WebSession, requests: &[ImageRef], failed: Option<&ImageRef>) {
    for image in requests {
        let outcome = if Some(image) == failed {
            LoadOutcome::Failed
        } else {
            LoadOutcome::Loaded
        };
        session.push_event(HostEvent::ImageSettled {
            image: image.clone(),
            outcome,
        });
    }
}

fn step_until_quiet(session: &mut WebSession) -> SessionFrame {
    for _ in 0..2_000 {
        let frame = session.step(MS_16).unwrap();
        if !frame.animating {
            return frame;
        }
    }
    panic!("session never went quiet");
}

#[test]
fn preload_then_reveal() {
    let (mut session, first) = started(3);
    assert_eq!(first.preload.len(), 3);
    assert_eq!(first.scene.grid_opacity, 0.0);
    let ring = first.scene.indicator.unwrap();
    assert_eq!(ring.fraction, 0.0);
    assert_eq!(ring.opacity, 1.0);

    let failed = first.preload[1].clone();
    settle_all(&mut session, &first.preload, Some(&failed));
    let frame = session.step(MS_16).unwrap();
    assert_eq!(frame.scene.indicator.map(|ring| ring.fraction), Some(1.0));
    assert!(frame.scene.grid_opacity > 0.0);
    assert!(session.scene().is_ready());

    let frame = step_until_quiet(&mut session);
    assert_eq!(frame.scene.grid_opacity, 1.0);
    assert_eq!(frame.scene.indicator, None);
    assert!(frame.scene.cells.iter().any(|cell| cell.image.is_none()));
    assert!(frame.scene.cells.iter().all(|cell| cell.image.as_ref() != Some(&failed)));
}

#[test]
fn duplicate_and_unknown_settles_do_not_finish_preload() {
    let (mut session, first) = started(3);
    for _ in 0..3 {
        session.push_event(HostEvent::ImageSettled {
            image: first.preload[0].clone(),
            outcome: LoadOutcome::Loaded,
        });
    }
    session.push_event(HostEvent::ImageSettled {
        image: ImageRef::from("/img/elsewhere.jpg"),
        outcome: LoadOutcome::Loaded,
    });
    let frame = session.step(MS_16).unwrap();
    let fraction = frame.scene.indicator.unwrap().fraction;
    assert!((fraction - 1.0 / 3.0).abs() < 1e-9);
    assert!(!session.scene().is_ready());
}

#[test]
fn drag_glides_and_comes_to_rest() {
    let (mut session, first) = started(4);
    settle_all(&mut session, &first.preload, None);
    step_until_quiet(&mut session);

    session.push_event(Event::Pointer(PointerEvent::down(500.0, 400.0)));
    session.push_event(Event::Pointer(PointerEvent::moved(620.0, 340.0, Buttons::PRIMARY)));
    let mid = session.step(MS_16).unwrap();
    assert!(mid.animating);

    session.push_event(Event::Pointer(PointerEvent::up(620.0, 340.0)));
    step_until_quiet(&mut session);
    let offset = session.scene().pan().offset();
    assert_eq!((offset.x, offset.y), (120.0, -60.0));

    let frame = session.step(MS_16).unwrap();
    let cell_count = session.scene().layout().dims().cell_count();
    assert_eq!(frame.scene.cells.len(), cell_count);
}

#[test]
fn held_drag_goes_quiet_while_pressed() {
    let (mut session, first) = started(4);
    settle_all(&mut session, &first.preload, None);
    step_until_quiet(&mut session);

    session.push_event(Event::Pointer(PointerEvent::down(500.0, 400.0)));
    session.push_event(Event::Pointer(PointerEvent::moved(700.0, 400.0, Buttons::PRIMARY)));
    assert!(session.step(MS_16).unwrap().animating);

    let held = step_until_quiet(&mut session);
    assert!(!held.animating);
    assert!(session.scene().pan().is_pressed());
    let offset = session.scene().pan().offset();
    assert_eq!((offset.x, offset.y), (200.0, 0.0));
}

#[test]
fn resize_keeps_requests_unique() {
    let (mut session, first) = started(3);
    let before = session.scene().layout().dims().cell_count();
    session.push_event(Event::Resize(Size::new(2400, 1600)));
    let frame = session.step(MS_16).unwrap();
    assert!(frame.scene.cells.len() > before);
    assert!(frame.preload.is_empty());
    assert_eq!(session.scene().preload().total(), first.preload.len());
}

#[test]
fn audio_command_stream() {
    let (mut session, first) = started(1);
    assert_eq!(
        first.audio,
        vec![AudioCommand::Load {
            src: "/src/public/Over My Dead Body.mp3".into()
        }]
    );

    session.push_event(PlayerAction::TogglePlay);
    session.push_event(AudioEvent::MetadataLoaded { duration: 200.0 });
    session.push_event(AudioEvent::TimeUpdate {
        current: 10.0,
        duration: Some(200.0),
    });
    session.push_event(PlayerAction::Seek(0.5));
    session.push_event(PlayerAction::Previous);
    let frame = session.step(MS_16).unwrap();
    assert_eq!(
        frame.audio,
        vec![
            AudioCommand::Play,
            AudioCommand::Seek { seconds: 100.0 },
            AudioCommand::Seek { seconds: 0.0 },
        ]
    );
    assert!(frame.player.playing);
    assert_eq!(frame.player.elapsed_label, "0:00");
    assert_eq!(frame.player.duration_label, "3:20");

    session.push_event(AudioEvent::Ended);
    let frame = session.step(MS_16).unwrap();
    assert_eq!(frame.player.title, "I Feel It Coming");
    assert_eq!(frame.player.duration_label, "0:00");
    assert!(matches!(frame.audio.as_slice(), [AudioCommand::Load { .. }, AudioCommand::Play]));
}

#[test]
fn visual_only_track_counts_and_advances() {
    let tracks = vec![
        Track::new("Still Frame", "Nobody").album_art("still.jpg").duration(2.0),
        Track::new("Loud", "Somebody").album_art("loud.jpg").audio("loud.mp3"),
    ];
    let mut session = WebSession::new(config(1), tracks, Size::new(800, 600), Some(1)).unwrap();
    let first = session.step(MS_16).unwrap();
    assert!(first.audio.is_empty());

    session.push_event(PlayerAction::TogglePlay);
    let one = Duration::from_secs(1);
    assert!(session.step(one).unwrap().audio.is_empty());
    let frame = session.step(one).unwrap();
    assert_eq!(frame.player.elapsed_label, "0:02");
    let frame = session.step(one).unwrap();
    assert_eq!(
        frame.audio,
        vec![
            AudioCommand::Load {
                src: "loud.mp3".into()
            },
            AudioCommand::Play,
        ]
    );
    assert_eq!(frame.player.title, "Loud");
}

#[test]
fn expanding_the_panel_animates_until_settled() {
    let (mut session, _) = started(1);
    let rest = step_until_quiet(&mut session);
    assert_eq!(rest.player.panel_offset, 180.0);
    assert_eq!(rest.player.panel_height, 60.0);

    session.push_event(PlayerAction::ToggleExpanded);
    assert!(session.step(MS_16).unwrap().animating);
    let open = step_until_quiet(&mut session);
    assert!(open.player.expanded);
    assert_eq!(open.player.panel_offset, 0.0);
    assert_eq!(open.player.panel_height, 120.0);
}

#[test]
fn theme_and_focus_loss() {
    let (mut session, _) = started(2);
    session.push_event(HostEvent::Theme(Theme::Dark));
    session.push_event(Event::Pointer(PointerEvent::down(10.0, 10.0)));
    session.push_event(Event::Focus(false));
    let frame = session.step(MS_16).unwrap();
    assert_eq!(frame.scene.background, Theme::Dark.background());
    assert!(!session.scene().pan().is_pressed());
}

#[test]
fn teardown_hands_back_listeners_and_silences_audio() {
    let (mut session, _) = started(1);
    session.push_event(PlayerAction::TogglePlay);
    session.step(MS_16);

    let teardown = session.teardown();
    let kinds: Vec<ListenerKind> = teardown.listeners.iter().map(|l| l.kind).collect();
    let expected: Vec<ListenerKind> = ListenerKind::GALLERY
        .into_iter()
        .chain(ListenerKind::AUDIO)
        .collect();
    assert_eq!(kinds, expected);
    assert_eq!(teardown.audio, vec![AudioCommand::Pause, AudioCommand::Unload]);

    session.push_event(PlayerAction::Next);
    assert!(session.step(MS_16).is_none());
    assert_eq!(session.player().index(), 0);
}
