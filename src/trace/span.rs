//! Trace identifiers, context, and span records.
//!
//! Identifiers follow the B3 conventions: a trace id is 64 or 128 bits and
//! renders as 16 or 32 lowercase hex characters, a span id is a non-zero
//! 64-bit value rendering as 16 hex characters. A 128-bit id always has a
//! non-zero high half so the two widths stay distinguishable by length.

use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::trace::policy::IdWidth;

/// Trace identifier, 64 or 128 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(pub u128);

impl TraceId {
    /// Generate a fresh non-zero id of the requested width.
    pub fn generate(width: IdWidth) -> Self {
        let mut rng = rand::thread_rng();
        match width {
            IdWidth::Bits64 => loop {
                let lo = rng.gen::<u64>();
                if lo != 0 {
                    return TraceId(lo as u128);
                }
            },
            IdWidth::Bits128 => loop {
                let id = rng.gen::<u128>();
                if id >> 64 != 0 {
                    return TraceId(id);
                }
            },
        }
    }

    /// Parse from 16 or 32 hex characters.
    pub fn parse_hex(s: &str) -> Option<Self> {
        if s.len() != 16 && s.len() != 32 {
            return None;
        }
        let id = u128::from_str_radix(s, 16).ok()?;
        if id == 0 {
            return None;
        }
        Some(TraceId(id))
    }

    /// True when the high 64 bits are populated.
    pub fn is_wide(&self) -> bool {
        self.0 >> 64 != 0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wide() {
            write!(f, "{:032x}", self.0)
        } else {
            write!(f, "{:016x}", self.0 as u64)
        }
    }
}

/// Span identifier, always 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId(pub u64);

impl SpanId {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let id = rng.gen::<u64>();
            if id != 0 {
                return SpanId(id);
            }
        }
    }

    pub fn parse_hex(s: &str) -> Option<Self> {
        if s.len() != 16 {
            return None;
        }
        let id = u64::from_str_radix(s, 16).ok()?;
        if id == 0 {
            return None;
        }
        Some(SpanId(id))
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Propagated trace state for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub sampled: bool,
}

/// An in-flight server span.
#[derive(Debug)]
pub struct Span {
    pub context: TraceContext,
    pub parent_id: Option<SpanId>,
    start: Instant,
}

impl Span {
    pub fn begin(context: TraceContext, parent_id: Option<SpanId>) -> Self {
        Self {
            context,
            parent_id,
            start: Instant::now(),
        }
    }

    /// Stamp the duration and produce the finished record.
    pub fn finish(self) -> FinishedSpan {
        FinishedSpan {
            context: self.context,
            parent_id: self.parent_id,
            duration: self.start.elapsed(),
        }
    }
}

/// A completed span, ready for the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedSpan {
    pub context: TraceContext,
    pub parent_id: Option<SpanId>,
    pub duration: Duration,
}
