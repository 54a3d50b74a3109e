//! Benchmark variant mounts.
//!
//! A variant binds one tracing pipeline stage to one route prefix over the
//! shared [`handler`](crate::handler). The five standard variants differ
//! only in tracing policy, so measured latency differences are attributable
//! to the policy alone.

use std::collections::HashSet;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::error::{HarnessError, Result};
use crate::handler;
use crate::trace::{Reporter, TraceLayer, Tracer, TracingPolicy};

/// Tracing stage installed in front of the handler, decided once at mount
/// time. `NoTracing` means the wrapper is absent entirely, not merely
/// sampling at zero; `/unsampled` exists to isolate that difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    NoTracing,
    Traced(TracingPolicy),
}

/// One benchmarked configuration: a route prefix plus its pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub prefix: &'static str,
    pub stage: PipelineStage,
}

impl Variant {
    pub const fn new(prefix: &'static str, stage: PipelineStage) -> Self {
        Self { prefix, stage }
    }

    /// The fixed matrix measured by the benchmark.
    pub fn benchmark_matrix() -> Vec<Variant> {
        vec![
            Variant::new("/nottraced", PipelineStage::NoTracing),
            Variant::new(
                "/unsampled",
                PipelineStage::Traced(TracingPolicy::unsampled()),
            ),
            Variant::new("/traced", PipelineStage::Traced(TracingPolicy::sampled())),
            Variant::new(
                "/traced128",
                PipelineStage::Traced(TracingPolicy::wide_ids()),
            ),
            Variant::new(
                "/tracedaws",
                PipelineStage::Traced(TracingPolicy::aws_propagation()),
            ),
        ]
    }

    /// Build this variant's route tree. The handler is the same stateless
    /// function for every variant; only the layer in front differs.
    pub fn router(&self, reporter: Arc<dyn Reporter>) -> Router {
        let routes = Router::new().route("/", get(handler::hello));
        match self.stage {
            PipelineStage::NoTracing => routes,
            PipelineStage::Traced(policy) => {
                routes.layer(TraceLayer::new(Tracer::new(policy, reporter)))
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let reject = |reason: &str| {
            Err(HarnessError::Variant {
                prefix: self.prefix.to_string(),
                reason: reason.to_string(),
            })
        };
        if self.prefix.is_empty() {
            return reject("prefix is empty");
        }
        if !self.prefix.starts_with('/') {
            return reject("prefix must start with '/'");
        }
        if self.prefix.len() == 1 || self.prefix[1..].contains('/') {
            return reject("prefix must be a single non-empty path segment");
        }
        Ok(())
    }
}

/// Mount every variant under its prefix in one router. All-or-nothing: any
/// invalid or duplicate prefix fails the whole mount before a socket exists.
pub fn mount_all(variants: &[Variant], reporter: &Arc<dyn Reporter>) -> Result<Router> {
    let mut seen = HashSet::new();
    for variant in variants {
        variant.validate()?;
        if !seen.insert(variant.prefix) {
            return Err(HarnessError::Variant {
                prefix: variant.prefix.to_string(),
                reason: "duplicate prefix".to_string(),
            });
        }
    }

    let mut app = Router::new();
    for variant in variants {
        app = app.nest(variant.prefix, variant.router(reporter.clone()));
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{IdWidth, NoopReporter, Propagation, Sampler};

    fn noop() -> Arc<dyn Reporter> {
        Arc::new(NoopReporter)
    }

    #[test]
    fn matrix_has_five_distinct_prefixes() {
        let variants = Variant::benchmark_matrix();
        assert_eq!(variants.len(), 5);
        let prefixes: HashSet<_> = variants.iter().map(|v| v.prefix).collect();
        assert_eq!(prefixes.len(), 5);
    }

    #[test]
    fn matrix_policies_match_the_benchmark_design() {
        let variants = Variant::benchmark_matrix();

        assert_eq!(variants[0].prefix, "/nottraced");
        assert_eq!(variants[0].stage, PipelineStage::NoTracing);

        let policy = |i: usize| match variants[i].stage {
            PipelineStage::Traced(p) => p,
            PipelineStage::NoTracing => panic!("expected traced stage"),
        };

        assert_eq!(policy(1).sampler, Sampler::Never);
        assert_eq!(policy(2).sampler, Sampler::Always);
        assert_eq!(policy(2).id_width, IdWidth::Bits64);
        assert_eq!(policy(3).id_width, IdWidth::Bits128);
        assert_eq!(policy(4).propagation, Propagation::Aws);
        assert_eq!(policy(4).id_width, IdWidth::Bits64);
    }

    #[test]
    fn mount_rejects_duplicate_prefix() {
        let variants = [
            Variant::new("/a", PipelineStage::NoTracing),
            Variant::new("/a", PipelineStage::Traced(TracingPolicy::sampled())),
        ];
        let err = mount_all(&variants, &noop()).unwrap_err();
        assert!(matches!(err, HarnessError::Variant { ref prefix, .. } if prefix == "/a"));
    }

    #[test]
    fn mount_rejects_malformed_prefixes() {
        for prefix in ["", "a", "/", "/a/b"] {
            let prefix: &'static str = Box::leak(prefix.to_string().into_boxed_str());
            let variants = [Variant::new(prefix, PipelineStage::NoTracing)];
            assert!(mount_all(&variants, &noop()).is_err(), "accepted {prefix:?}");
        }
    }

    #[test]
    fn standard_matrix_mounts() {
        assert!(mount_all(&Variant::benchmark_matrix(), &noop()).is_ok());
    }
}
