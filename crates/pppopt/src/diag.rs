//! The diagnostics choke point.
//!
//! Every diagnostic the engine emits is a single line carrying the active
//! source label, formatted here and nowhere else. Each one goes to the
//! operational log; while the process is still in its startup phase it is
//! additionally echoed to the controlling terminal. After startup the
//! terminal echo stops.

use pppopt_types::Phase;

/// Dual-sink diagnostic reporter.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    phase: Phase,
}

impl Diagnostics {
    /// Create a reporter for the given lifecycle phase.
    #[must_use]
    pub const fn new(phase: Phase) -> Self {
        Self { phase }
    }

    /// The current lifecycle phase.
    #[inline]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance the lifecycle phase (startup → running ends terminal echo).
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Report an error diagnostic for the given source.
    pub fn error(&self, source: &str, message: &str) {
        tracing::error!(%source, "{message}");
        if self.phase.is_initialize() {
            eprintln!("{source}: {message}");
        }
    }

    /// Report a non-fatal warning for the given source.
    pub fn warn(&self, source: &str, message: &str) {
        tracing::warn!(%source, "{message}");
        if self.phase.is_initialize() {
            eprintln!("{source}: {message}");
        }
    }

    /// Emit informational text (usage, version banner). Terminal-only
    /// output is still gated on the startup phase.
    pub fn banner(&self, text: &str) {
        tracing::info!("{text}");
        if self.phase.is_initialize() {
            eprintln!("{text}");
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Phase::Initialize)
    }
}
