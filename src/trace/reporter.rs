//! Span reporting sink.
//!
//! In benchmarking configuration the sink is always a discarding no-op, so
//! collector I/O never perturbs the timing measurement. Tests swap in a spy
//! that records every finished span.

use crate::trace::span::FinishedSpan;

/// Destination for finished, sampled spans. Must be free of network I/O in
/// benchmarking configuration.
pub trait Reporter: Send + Sync {
    fn report(&self, span: FinishedSpan);
}

/// Discards every span.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _span: FinishedSpan) {}
}
