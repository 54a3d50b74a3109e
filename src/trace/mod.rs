//! Tracing capability consumed by the benchmark variants.
//!
//! # Data Flow
//! ```text
//! Request headers → extract_context (policy's propagation codec)
//!                 → new_span (sampling decision, id allocation)
//!                 → handler runs
//!                 → finish_span → Reporter (no-op sink in benchmarks)
//! ```
//!
//! # Design Decisions
//! - Policies are immutable and Copy; all per-request state lives in the
//!   request's own span, never shared across concurrent requests
//! - An upstream sampling decision carried in the headers wins over the
//!   local sampler; absent a decision the local sampler decides
//! - The reporter is a trait object so tests can observe emitted spans
//!   without touching the variant wiring

pub mod middleware;
pub mod policy;
pub mod propagation;
pub mod reporter;
pub mod span;

use std::sync::Arc;

use axum::http::HeaderMap;

pub use middleware::TraceLayer;
pub use policy::{IdWidth, Propagation, Sampler, TracingPolicy};
pub use reporter::{NoopReporter, Reporter};
pub use span::{FinishedSpan, Span, SpanId, TraceContext, TraceId};

use propagation::Extracted;

/// Per-variant tracer: one policy, one reporter, shared read-only across
/// every request of that variant.
#[derive(Clone)]
pub struct Tracer {
    policy: TracingPolicy,
    reporter: Arc<dyn Reporter>,
}

impl Tracer {
    pub fn new(policy: TracingPolicy, reporter: Arc<dyn Reporter>) -> Self {
        Self { policy, reporter }
    }

    pub fn policy(&self) -> &TracingPolicy {
        &self.policy
    }

    /// Start a server span, continuing `parent` when one was extracted.
    pub fn new_span(&self, parent: Option<Extracted>) -> Span {
        match parent {
            Some(parent) => {
                let sampled = parent
                    .sampled
                    .unwrap_or_else(|| self.policy.sampler.decide());
                Span::begin(
                    TraceContext {
                        trace_id: parent.trace_id,
                        span_id: SpanId::generate(),
                        sampled,
                    },
                    Some(parent.span_id),
                )
            }
            None => Span::begin(
                TraceContext {
                    trace_id: TraceId::generate(self.policy.id_width),
                    span_id: SpanId::generate(),
                    sampled: self.policy.sampler.decide(),
                },
                None,
            ),
        }
    }

    /// Complete a span. Only sampled spans reach the reporter; unsampled
    /// spans are dropped here, which is exactly the cost the `/unsampled`
    /// variant measures.
    pub fn finish_span(&self, span: Span) {
        let sampled = span.context.sampled;
        let finished = span.finish();
        if sampled {
            self.reporter.report(finished);
        }
    }

    pub fn extract_context(&self, headers: &HeaderMap) -> Option<Extracted> {
        propagation::extract(self.policy.propagation, headers)
    }

    pub fn inject_context(&self, ctx: &TraceContext, headers: &mut HeaderMap) {
        propagation::inject(self.policy.propagation, ctx, headers);
    }
}
