//! Tracing policy configuration.
//!
//! A policy is the full description of how one variant traces requests:
//! whether spans are recorded, how wide trace identifiers are, and which
//! header format carries context across services. Policies are immutable
//! once constructed and shared read-only across all requests of a variant.

/// Sampling decision strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampler {
    /// Record every trace. This is the default for the traced variants.
    Always,
    /// Decline every trace. Spans are still created and dropped, so the
    /// cost of the declined fast path stays measurable.
    Never,
}

impl Sampler {
    /// Decide whether a new root trace is recorded.
    pub fn decide(&self) -> bool {
        matches!(self, Sampler::Always)
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Sampler::Always
    }
}

/// Trace identifier width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdWidth {
    /// 64-bit trace ids, rendered as 16 hex characters.
    Bits64,
    /// 128-bit trace ids, rendered as 32 hex characters.
    Bits128,
}

impl Default for IdWidth {
    fn default() -> Self {
        IdWidth::Bits64
    }
}

/// Cross-service propagation header format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Default format: `x-b3-traceid` / `x-b3-spanid` / `x-b3-sampled`.
    B3,
    /// Alternate format: single `x-amzn-trace-id` header.
    Aws,
}

impl Default for Propagation {
    fn default() -> Self {
        Propagation::B3
    }
}

/// Immutable tracing configuration for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracingPolicy {
    pub sampler: Sampler,
    pub id_width: IdWidth,
    pub propagation: Propagation,
}

impl TracingPolicy {
    /// Default sampler, 64-bit ids, default propagation.
    pub fn sampled() -> Self {
        Self::default()
    }

    /// Never-sample policy, otherwise default.
    pub fn unsampled() -> Self {
        Self {
            sampler: Sampler::Never,
            ..Self::default()
        }
    }

    /// Default sampler with 128-bit trace ids.
    pub fn wide_ids() -> Self {
        Self {
            id_width: IdWidth::Bits128,
            ..Self::default()
        }
    }

    /// Default sampler with the alternate header format.
    pub fn aws_propagation() -> Self {
        Self {
            propagation: Propagation::Aws,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_samples_everything() {
        let policy = TracingPolicy::default();
        assert_eq!(policy.sampler, Sampler::Always);
        assert!(policy.sampler.decide());
        assert_eq!(policy.id_width, IdWidth::Bits64);
        assert_eq!(policy.propagation, Propagation::B3);
    }

    #[test]
    fn never_sampler_declines() {
        assert!(!TracingPolicy::unsampled().sampler.decide());
    }
}
