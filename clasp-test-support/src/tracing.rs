//! Recording layer for asserting spans and events in tests.

use std::{
    collections::HashMap,
    fmt::{self, Write as _},
    sync::{Arc, Mutex, MutexGuard},
};

use ::tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

/// Field values keyed by field name, rendered as strings.
pub type Fields = HashMap<String, String>;

/// `tracing_subscriber` layer that keeps every closed span and emitted event.
///
/// Clones share storage, so a test can hand one clone to the subscriber and
/// inspect another afterwards.
///
/// # Examples
/// ```
/// use clasp_test_support::tracing::RecordingLayer;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let layer = RecordingLayer::default();
/// let subscriber = tracing_subscriber::registry().with(layer.clone());
/// tracing::subscriber::with_default(subscriber, || {
///     let _span = tracing::info_span!("demo", items = 3).entered();
///     tracing::info!("inside");
/// });
/// assert_eq!(layer.span("demo").and_then(|s| s.fields.get("items").cloned()), Some("3".into()));
/// assert!(layer.has_event(tracing::Level::INFO, "inside"));
/// ```
#[derive(Clone, Default)]
pub struct RecordingLayer {
    log: Arc<Mutex<Recorded>>,
}

#[derive(Default)]
struct Recorded {
    spans: Vec<SpanRecord>,
    events: Vec<EventRecord>,
}

impl RecordingLayer {
    fn log(&self) -> MutexGuard<'_, Recorded> {
        self.log.lock().expect("recording lock poisoned")
    }

    /// Returns the closed spans in completion order.
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.log().spans.clone()
    }

    /// Returns the events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.log().events.clone()
    }

    /// Returns the first closed span called `name`.
    #[must_use]
    pub fn span(&self, name: &str) -> Option<SpanRecord> {
        self.log().spans.iter().find(|span| span.name == name).cloned()
    }

    /// Returns `true` when an event at `level` carried `message`.
    #[must_use]
    pub fn has_event(&self, level: Level, message: &str) -> bool {
        self.log()
            .events
            .iter()
            .any(|event| event.level == level && event.message() == Some(message))
    }
}

/// A closed span and the fields recorded on it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpanRecord {
    /// Span name from the metadata.
    pub name: String,
    /// Fields recorded at creation or later.
    pub fields: Fields,
}

/// An emitted event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EventRecord {
    /// Event level.
    pub level: Level,
    /// Event target.
    pub target: String,
    /// Event fields, including `message`.
    pub fields: Fields,
}

impl EventRecord {
    /// Returns the formatted message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

struct OpenSpan(SpanRecord);

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = Fields::new();
        attrs.record(&mut Collector(&mut fields));
        span.extensions_mut().insert(OpenSpan(SpanRecord {
            name: attrs.metadata().name().to_owned(),
            fields,
        }));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(open) = extensions.get_mut::<OpenSpan>() {
            values.record(&mut Collector(&mut open.0.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let closed = ctx
            .span(&id)
            .and_then(|span| span.extensions_mut().remove::<OpenSpan>());
        if let Some(OpenSpan(record)) = closed {
            self.log().spans.push(record);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        event.record(&mut Collector(&mut fields));
        let metadata = event.metadata();
        self.log().events.push(EventRecord {
            level: *metadata.level(),
            target: metadata.target().to_owned(),
            fields,
        });
    }
}

struct Collector<'a>(&'a mut Fields);

impl Collector<'_> {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_owned(), value);
    }
}

impl Visit for Collector<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_owned());
    }

    fn record_bytes(&mut self, field: &Field, value: &[u8]) {
        let hex = value.iter().fold(String::new(), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        });
        self.put(field, hex);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, value.to_string());
    }
}
