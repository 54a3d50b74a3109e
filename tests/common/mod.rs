//! Shared utilities for integration testing.

use std::sync::{Arc, Mutex};

use tracebench::trace::FinishedSpan;
use tracebench::Reporter;

/// All five variant prefixes in mount order.
pub const PREFIXES: [&str; 5] = [
    "/nottraced",
    "/unsampled",
    "/traced",
    "/traced128",
    "/tracedaws",
];

/// Reporter that records every emitted span, replacing the no-op sink so
/// tests can observe which variants actually report.
#[derive(Default)]
pub struct SpyReporter {
    spans: Mutex<Vec<FinishedSpan>>,
}

impl SpyReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spans(&self) -> Vec<FinishedSpan> {
        self.spans.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.spans.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.spans.lock().unwrap().clear();
    }
}

impl Reporter for SpyReporter {
    fn report(&self, span: FinishedSpan) {
        self.spans.lock().unwrap().push(span);
    }
}
