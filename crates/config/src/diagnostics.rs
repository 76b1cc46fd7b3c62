/// Receiver for non-fatal notices raised while massaging configuration.
///
/// Nothing sent here stops processing. The default sink forwards to
/// `tracing`; tests and embedding applications can supply their own.
pub trait DiagnosticSink {
    fn warn(&self, message: &str);
}

/// Forwards diagnostics as `tracing` warning events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
