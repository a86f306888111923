//! Terminal state guard for guaranteed cleanup.
//!
//! RAII guard restoring the terminal whether the app exits normally, via
//! `?`, or through a panic (with the panic hook installed).

use std::io::{self, Write};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};

pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    /// Create the guard AFTER enabling raw mode and the alternate screen,
    /// so Drop can undo them.
    pub fn new() -> Self {
        Self { active: true }
    }

    /// Explicit cleanup with error propagation. Drop becomes a no-op after.
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        restore()
    }
}

impl Default for TerminalGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            // best effort; nowhere to propagate from Drop
            if let Err(err) = restore() {
                tracing::debug!(error = %err, "terminal cleanup failed in Drop");
            }
        }
    }
}

fn restore() -> anyhow::Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    stdout.flush()?;
    Ok(())
}

/// Install a panic hook that restores the terminal before the panic message
/// prints. Call early in main(), before any terminal setup.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(err) = restore() {
            tracing::debug!(error = %err, "terminal restore failed in panic hook");
        }
        original_hook(panic_info);
    }));
}
