//! Harness error definitions.

use std::io;

use thiserror::Error;

/// Errors surfaced by the benchmark server lifecycle.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Socket could not be bound or the transport failed to initialize.
    /// Fatal to the trial; never retried inside the harness.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Lifecycle misuse: `port` or `stop` called on a handle that is not
    /// Running.
    #[error("server is not running")]
    NotRunning,

    /// `start` called on a handle that already ran. A new server must be
    /// constructed per trial; handles never rebind.
    #[error("server already started")]
    AlreadyStarted,

    /// A variant mount failed to construct. Raised before any socket is
    /// bound so a trial never serves a partial variant set.
    #[error("invalid variant mount {prefix:?}: {reason}")]
    Variant { prefix: String, reason: String },

    /// The serve task failed after startup.
    #[error("server task failed: {0}")]
    Serve(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
