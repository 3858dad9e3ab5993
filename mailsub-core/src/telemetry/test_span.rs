#![cfg(test)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{span, Subscriber};
use tracing_core::field::{Field, Visit};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

/// Fields recorded on every captured span, keyed by span name.
/// Later spans with the same name overwrite earlier ones.
#[derive(Default, Debug)]
pub struct SpanStore {
    by_id: Mutex<HashMap<span::Id, String>>,
    fields: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl SpanStore {
    pub fn field(&self, span_name: &str, field: &str) -> Option<String> {
        self.fields
            .lock()
            .unwrap()
            .get(span_name)
            .and_then(|f| f.get(field).cloned())
    }
}

struct FieldWriter<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldWriter<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn core::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

struct CaptureLayer {
    store: Arc<SpanStore>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, _ctx: Context<'_, S>) {
        let name = attrs.metadata().name().to_string();
        let mut map = HashMap::new();
        attrs.record(&mut FieldWriter(&mut map));
        self.store.by_id.lock().unwrap().insert(id.clone(), name.clone());
        self.store.fields.lock().unwrap().insert(name, map);
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, _ctx: Context<'_, S>) {
        let Some(name) = self.store.by_id.lock().unwrap().get(id).cloned() else {
            return;
        };
        let mut fields = self.store.fields.lock().unwrap();
        let map = fields.entry(name).or_default();
        values.record(&mut FieldWriter(map));
    }
}

/// Install a capturing subscriber for the current thread only.
/// Keep the guard alive for as long as spans should be captured.
pub fn install_capture() -> (Arc<SpanStore>, tracing::subscriber::DefaultGuard) {
    use tracing_subscriber::prelude::*;
    let store = Arc::new(SpanStore::default());
    let layer = CaptureLayer { store: store.clone() };
    let subscriber = tracing_subscriber::registry().with(layer);
    let guard = tracing::subscriber::set_default(subscriber);
    (store, guard)
}
