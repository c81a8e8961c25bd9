//! OS signal handling.
//!
//! Only SIGINT (Ctrl-C) is handled; it is translated into a [`Shutdown`]
//! trigger. Every other signal keeps its default disposition.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// Install the interrupt handler and forward the first interrupt to
/// `shutdown`.
///
/// Returns the forwarding task. If the handler cannot be installed the
/// failure is logged and the run continues without interrupt handling.
pub fn forward_interrupt(shutdown: Arc<Shutdown>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received SIGINT, shutting down child processes");
                shutdown.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGINT handler");
            }
        }
    })
}
