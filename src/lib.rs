//! Micro-benchmark harness for HTTP tracing instrumentation overhead.
//!
//! Stands up five differently-traced endpoints in one process so a load
//! generator can compare the request-path cost of tracing policies under
//! identical traffic:
//!
//! ```text
//! /nottraced   no tracing wrapper at all
//! /unsampled   wrapper present, sampler always declines
//! /traced      default sampler, 64-bit trace ids
//! /traced128   default sampler, 128-bit trace ids
//! /tracedaws   default sampler, alternate (AWS X-Ray) propagation
//! ```
//!
//! Every endpoint serves the same stateless `hello world` handler, so any
//! measured difference comes from the tracing layer. Span reporting is a
//! discarding no-op in benchmark configuration.

pub mod error;
pub mod handler;
pub mod harness;
pub mod trace;
pub mod variant;

pub use error::{HarnessError, Result};
pub use harness::BenchServer;
pub use trace::{NoopReporter, Reporter, TracingPolicy};
pub use variant::{PipelineStage, Variant};
