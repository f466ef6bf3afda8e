//! Playback flows across many events.

use std::time::Duration;

use folio_player::{AudioCommand, AudioEvent, Player, Track};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Toggle,
    Next,
    Previous,
    Seek(f64),
    Metadata(f64),
    Time(f64),
    Ended,
    Tick(u64),
    Expand,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Toggle),
        Just(Op::Next),
        Just(Op::Previous),
        (-2.0f64..3.0).prop_map(Op::Seek),
        prop_oneof![Just(f64::NAN), Just(f64::INFINITY), -10.0f64..600.0].prop_map(Op::Metadata),
        (0.0f64..700.0).prop_map(Op::Time),
        Just(Op::Ended),
        (0u64..5_000).prop_map(Op::Tick),
        Just(Op::Expand),
    ]
}

fn mixed_playlist() -> Vec<Track> {
    let mut tracks = Track::stock_playlist();
    tracks.insert(2, Track::new("Interlude", "Nobody").duration(4.0));
    tracks
}

#[test]
fn stock_playlist_round_trip() {
    let mut player = Player::new(Track::stock_playlist()).unwrap();
    let len = player.tracks().len();
    for _ in 0..len {
        player.next();
    }
    assert_eq!(player.index(), 0);
    player.previous();
    assert_eq!(player.index(), len - 1);
}

#[test]
fn switching_to_visual_only_unloads_audio() {
    let mut player = Player::new(mixed_playlist()).unwrap();
    player.next();
    let commands = player.next();
    assert_eq!(player.current().title, "Interlude");
    assert_eq!(commands, vec![AudioCommand::Unload]);

    // Visual-only track runs out after its four seconds, then the next
    // whole second moves on and reloads audio.
    player.tick(Duration::from_secs(4));
    assert_eq!(player.index(), 2);
    let commands = player.tick(Duration::from_secs(1));
    assert_eq!(player.index(), 3);
    assert!(matches!(commands[0], AudioCommand::Load { .. }));
    assert_eq!(commands[1], AudioCommand::Play);
}

proptest! {
    #[test]
    fn state_stays_consistent(ops in prop::collection::vec(op(), 1..80)) {
        let mut player = Player::new(mixed_playlist()).unwrap();
        let len = player.tracks().len();
        for op in ops {
            let commands = match op {
                Op::Toggle => player.toggle_play(),
                Op::Next => player.next(),
                Op::Previous => player.previous(),
                Op::Seek(f) => player.seek_fraction(f),
                Op::Metadata(d) => player.on_audio_event(AudioEvent::MetadataLoaded { duration: d }),
                Op::Time(t) => player.on_audio_event(AudioEvent::TimeUpdate { current: t, duration: None }),
                Op::Ended => player.on_audio_event(AudioEvent::Ended),
                Op::Tick(ms) => player.tick(Duration::from_millis(ms)),
                Op::Expand => { player.toggle_expanded(); Vec::new() }
            };

            prop_assert!(player.index() < len);
            let fraction = player.progress_fraction();
            prop_assert!((0.0..=1.0).contains(&fraction));
            if let Some(d) = player.duration() {
                prop_assert!(d.is_finite() && d > 0.0);
            }
            if !player.current().has_audio() {
                prop_assert!(
                    commands.iter().all(|c| *c == AudioCommand::Unload),
                    "visual-only track emitted {commands:?}"
                );
            }
        }
    }
}
