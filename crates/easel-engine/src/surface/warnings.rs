use std::collections::HashSet;

/// Destination for non-fatal diagnostics.
pub trait WarningSink: Send {
    fn warn(&mut self, message: &str);
}

/// Forwards to `log::warn!`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }
}

impl<F: FnMut(&str) + Send> WarningSink for F {
    fn warn(&mut self, message: &str) {
        self(message)
    }
}

/// Per-surface warning channel that emits each distinct message once.
pub struct Warnings {
    seen: HashSet<String>,
    sink: Box<dyn WarningSink>,
}

impl Default for Warnings {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl std::fmt::Debug for Warnings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Warnings").field("seen", &self.seen.len()).finish_non_exhaustive()
    }
}

impl Warnings {
    pub fn new(sink: Box<dyn WarningSink>) -> Self {
        Self { seen: HashSet::new(), sink }
    }

    /// Emits `message` unless it was already emitted. Returns whether it was new.
    pub fn report(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if self.seen.contains(&message) {
            return false;
        }
        self.sink.warn(&message);
        self.seen.insert(message);
        true
    }

    /// Distinct messages emitted so far.
    pub fn count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn duplicate_messages_are_dropped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink_log = Arc::clone(&log);
        let mut w = Warnings::new(Box::new(move |m: &str| sink_log.lock().unwrap().push(m.to_owned())));
        assert!(w.report("sphere() unsupported"));
        assert!(!w.report("sphere() unsupported"));
        assert!(w.report("box_() unsupported"));
        assert_eq!(w.count(), 2);
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
