//! Opt-in telemetry for subscriber calls.
//! Nothing is emitted unless a sink is installed via `set_telemetry_sink`.

pub mod keys;
pub mod types;
#[cfg(test)]
pub mod test_span;

pub use keys::*;
pub use types::*;

use std::sync::Arc;

use once_cell::sync::OnceCell;

/// Implement this to receive one `SubscribeTrace` per `add_subscriber` call
/// that reached the transport.
///
/// `record` may be called from any thread and must not panic.
pub trait TelemetrySink: Send + Sync + 'static {
    fn record(&self, trace: SubscribeTrace);
}

static TELEMETRY_SINK: OnceCell<Arc<dyn TelemetrySink>> = OnceCell::new();

// In tests, gate emission to only the calling test thread to avoid cross-test interference.
#[cfg(test)]
thread_local! {
    static TEST_CAPTURE: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

/// Install a global telemetry sink. Returns `false` if a sink is already installed.
/// Write-once for the lifetime of the process.
pub fn set_telemetry_sink(sink: Arc<dyn TelemetrySink>) -> bool {
    TELEMETRY_SINK.set(sink).is_ok()
}

#[inline]
pub(crate) fn emit(trace: SubscribeTrace) {
    #[cfg(test)]
    {
        if !TEST_CAPTURE.with(|c| c.get()) {
            return;
        }
    }
    if let Some(sink) = TELEMETRY_SINK.get() {
        sink.record(trace);
    }
}

#[cfg(test)]
/// Test-only: enable or disable capture for the current test thread.
pub fn test_set_capture_enabled(enabled: bool) {
    TEST_CAPTURE.with(|c| c.set(enabled));
}
