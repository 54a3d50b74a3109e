//! Benchmark server lifecycle.
//!
//! # Responsibilities
//! - Mount the five variant route trees into one axum router
//! - Bind one listener (fixed or ephemeral port) and resolve the bound address
//! - Serve all variants on the shared tokio worker pool
//! - Tear the socket down deterministically between trials
//!
//! # Design Decisions
//! - The bound port is read back from the listener after `bind`, so trials
//!   can use ephemeral ports and never fight over a fixed one
//! - One-way state machine Created → Running → Stopped; a new server is
//!   constructed per trial, handles never restart
//! - Startup is all-or-nothing: variants are validated and mounted before
//!   the socket is bound, so a failed `start` leaves nothing behind

use std::mem;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::{HarnessError, Result};
use crate::trace::{NoopReporter, Reporter};
use crate::variant::{self, Variant};

enum State {
    Created,
    Running {
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<std::io::Result<()>>,
    },
    Stopped,
}

/// One benchmark trial's server instance.
pub struct BenchServer {
    host: IpAddr,
    port: u16,
    variants: Vec<Variant>,
    reporter: Arc<dyn Reporter>,
    state: State,
}

impl BenchServer {
    /// Create a server for the standard five-variant matrix. Port `0`
    /// requests an ephemeral port from the OS.
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            host,
            port,
            variants: Variant::benchmark_matrix(),
            reporter: Arc::new(NoopReporter),
            state: State::Created,
        }
    }

    /// Loopback server on an ephemeral port, the usual trial setup.
    pub fn local() -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    /// Replace the discarding span sink. Tests use this to observe which
    /// variants emit spans; benchmarks keep the no-op default.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the standard matrix with a custom variant set. Validation
    /// still happens at `start`.
    pub fn with_variants(mut self, variants: Vec<Variant>) -> Self {
        self.variants = variants;
        self
    }

    /// Mount all variants, bind the listener, and begin serving. Returns
    /// the resolved bound address.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        match self.state {
            State::Created => {}
            State::Running { .. } => return Err(HarnessError::AlreadyStarted),
            State::Stopped => return Err(HarnessError::NotRunning),
        }

        // Mount before bind: a bad variant must fail with no socket held.
        let app = variant::mount_all(&self.variants, &self.reporter)?;

        let requested = SocketAddr::new(self.host, self.port);
        let listener = TcpListener::bind(requested)
            .await
            .map_err(|source| HarnessError::Bind {
                addr: requested.to_string(),
                source,
            })?;
        let addr = listener.local_addr().map_err(|source| HarnessError::Bind {
            addr: requested.to_string(),
            source,
        })?;

        let (shutdown, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = rx.await;
                })
                .await
        });

        tracing::info!(address = %addr, variants = self.variants.len(), "benchmark server started");
        self.state = State::Running {
            addr,
            shutdown,
            task,
        };
        Ok(addr)
    }

    /// The resolved listening address of a Running server.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        match self.state {
            State::Running { addr, .. } => Ok(addr),
            _ => Err(HarnessError::NotRunning),
        }
    }

    /// The resolved listening port of a Running server.
    pub fn port(&self) -> Result<u16> {
        self.local_addr().map(|addr| addr.port())
    }

    /// Stop serving and release the socket. In-flight requests drain; the
    /// call returns only once the serve task has exited, so the port is
    /// free again for the next trial. Stopping twice is a lifecycle error.
    pub async fn stop(&mut self) -> Result<()> {
        match mem::replace(&mut self.state, State::Stopped) {
            State::Running {
                addr,
                shutdown,
                task,
            } => {
                let _ = shutdown.send(());
                task.await
                    .map_err(|join| std::io::Error::other(join))??;
                tracing::info!(address = %addr, "benchmark server stopped");
                Ok(())
            }
            previous => {
                self.state = previous;
                Err(HarnessError::NotRunning)
            }
        }
    }
}

impl Drop for BenchServer {
    fn drop(&mut self) {
        // A dropped Running server still winds down; trials should call
        // stop() to observe the release deterministically.
        if let State::Running { shutdown, .. } = mem::replace(&mut self.state, State::Stopped) {
            let _ = shutdown.send(());
        }
    }
}
