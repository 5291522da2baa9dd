//! Run state shared with the Ctrl+C handler.
//!
//! `SHUTDOWN` is polled by the corpus loop between documents. A document
//! that is being written when the signal arrives still finishes, so no file
//! is left half written.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Second Ctrl+C exits immediately
static FORCE: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start.
///
/// The first signal sets the shutdown flag and lets the current document
/// finish. A second signal exits the process.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if FORCE.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        SHUTDOWN.store(true, Ordering::SeqCst);
        crate::log!("bake"; "stopping after the current document...");
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}
