//! Ctrl-C handling: the first interrupt stops new chains, the second exits.

use tracing::warn;

use sentinel_core::ScanCancel;

/// Exit status after a forced interrupt (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Let in-flight chains finish, skip the rest.
    Cancel,
    /// Stop immediately.
    Exit,
}

/// Decide what an interrupt does given the scan's state.
pub fn on_interrupt(cancel: &ScanCancel) -> InterruptAction {
    if cancel.is_cancelled() {
        InterruptAction::Exit
    } else {
        cancel.cancel();
        InterruptAction::Cancel
    }
}

/// Listen for Ctrl-C for the rest of the process.
pub fn spawn_interrupt_handler(cancel: ScanCancel) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match on_interrupt(&cancel) {
                InterruptAction::Cancel => {
                    warn!("Received interrupt, skipping remaining chains (Ctrl-C again to quit)");
                }
                InterruptAction::Exit => {
                    warn!("Received second interrupt, exiting");
                    std::process::exit(INTERRUPTED_EXIT_CODE);
                }
            }
        }
    });
}
