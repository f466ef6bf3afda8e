//! Structured log output of a session, captured with a test layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use folio_core::Size;
use folio_gallery::GalleryConfig;
use folio_player::Track;
use folio_web::{PlayerAction, WebSession};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct Captured {
    name: String,
    target: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct Capture {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            target: attrs.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(Captured {
            name: event.metadata().name().to_string(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn captured<F: FnOnce()>(f: F) -> (Vec<Captured>, Vec<Captured>) {
    let capture = Capture::default();
    let spans = capture.spans.clone();
    let events = capture.events.clone();
    let subscriber = tracing_subscriber::registry().with(capture);
    tracing::subscriber::with_default(subscriber, f);
    let spans = spans.lock().unwrap().clone();
    let events = events.lock().unwrap().clone();
    (spans, events)
}

fn message(event: &Captured) -> &str {
    event.fields.get("message").map_or("", String::as_str)
}

fn run_session() {
    let mut config = GalleryConfig::default();
    config.images.base = vec!["a.jpg".into()];
    let mut session =
        WebSession::new(config, Track::stock_playlist(), Size::new(900, 700), Some(3)).unwrap();
    session.step(Duration::from_millis(16));
    session.push_event(PlayerAction::Next);
    session.step(Duration::from_millis(16));
    session.teardown();
}

#[test]
fn every_frame_gets_a_span() {
    let (spans, _) = captured(run_session);
    let frames: Vec<_> = spans.iter().filter(|s| s.name == "gallery.frame").collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].fields.get("frame").map(String::as_str), Some("1"));
    assert_eq!(frames[1].fields.get("dt_us").map(String::as_str), Some("16000"));
}

#[test]
fn lifecycle_events_use_folio_targets() {
    let (_, events) = captured(run_session);

    let started = events
        .iter()
        .find(|e| message(e) == "session started")
        .expect("session start logged");
    assert_eq!(started.target, "folio.web");
    assert_eq!(started.fields.get("listeners").map(String::as_str), Some("9"));

    let changed = events
        .iter()
        .find(|e| message(e) == "track changed")
        .expect("track change logged");
    assert_eq!(changed.target, "folio.player");
    assert_eq!(changed.fields.get("title").map(String::as_str), Some("I Feel It Coming"));

    let torn_down = events
        .iter()
        .find(|e| message(e) == "session torn down")
        .expect("teardown logged");
    assert_eq!(torn_down.fields.get("steps").map(String::as_str), Some("2"));
    assert!(events.iter().all(|e| e.target.starts_with("folio.")));
}
