//! Shutdown signal handling.
//!
//! The first SIGINT/SIGTERM cancels the run so it can stop at the next
//! queue operation. A second one exits immediately, for runs stuck inside
//! an insert that is not interrupted by cancellation.

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Exit status used when a second signal forces the process down.
pub const FORCED_EXIT_CODE: i32 = 1;

/// A source of shutdown signals, yielding the signal name.
#[async_trait]
pub trait SignalSource: Send + 'static {
    async fn recv(&mut self) -> std::io::Result<&'static str>;
}

/// SIGINT and SIGTERM (ctrl-c on non-Unix), registered once for the
/// lifetime of the value so repeated signals are all observed.
pub struct ShutdownSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    #[cfg(unix)]
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {})
    }
}

#[async_trait]
impl SignalSource for ShutdownSignals {
    #[cfg(unix)]
    async fn recv(&mut self) -> std::io::Result<&'static str> {
        tokio::select! {
            _ = self.interrupt.recv() => Ok("SIGINT"),
            _ = self.terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> std::io::Result<&'static str> {
        tokio::signal::ctrl_c().await?;
        Ok("ctrl-c")
    }
}

/// Resolve when the process receives SIGINT or SIGTERM.
pub async fn shutdown_signal() -> std::io::Result<&'static str> {
    ShutdownSignals::install()?.recv().await
}

/// Cancel `token` on the first signal; a second signal calls `force_exit`.
///
/// Returns without waiting for signals once `token` is cancelled for
/// another reason before any signal arrived.
pub async fn watch_signals<S, F>(mut signals: S, token: CancellationToken, force_exit: F)
where
    S: SignalSource,
    F: FnOnce(&'static str),
{
    tokio::select! {
        received = signals.recv() => match received {
            Ok(signal) => {
                debug!(signal, "Received signal");
                token.cancel();
                info!("Cancel generating fake data");
            }
            Err(e) => {
                warn!("Failed to wait for signals: {e}");
                return;
            }
        },
        _ = token.cancelled() => return,
    }

    if let Ok(signal) = signals.recv().await {
        warn!(signal, "Received second signal, exiting without waiting for the pipeline");
        force_exit(signal);
    }
}

/// Spawn the process-wide signal watcher for `token`.
///
/// The watcher keeps listening after the first signal; abort the returned
/// handle once the run is over.
pub fn spawn_signal_handler(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match ShutdownSignals::install() {
            Ok(signals) => {
                watch_signals(signals, token, |_| std::process::exit(FORCED_EXIT_CODE)).await
            }
            Err(e) => warn!("Failed to install signal handler: {e}"),
        }
    })
}
