//! Core types for the configuration-directive engine.
//!
//! This crate defines the explicit configuration blob ([`Config`]) that
//! every parse entry point mutates, the [`Provenance`] records that track
//! who set a value, the [`ParseContext`] threaded through nested source
//! parses, and the shared `limits` constants. It carries no parsing logic;
//! the engine lives in the `pppopt` crate.

pub mod config;
pub mod context;
pub mod limits;
pub mod provenance;

pub use config::{Config, IpOptions, LinkOptions};
pub use context::{ContextFrame, ParseContext};
pub use provenance::Provenance;

/// Process lifecycle phase, as far as the option engine cares.
///
/// Diagnostics are echoed to the controlling terminal only during
/// `Initialize`; the `--help`/`--version` directives act only then too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// Startup configuration: the parse phase.
    Initialize,
    /// Everything after startup; the configuration is read-only.
    Running,
}

impl Phase {
    /// Whether the process is still in its startup phase.
    #[inline]
    pub const fn is_initialize(self) -> bool {
        matches!(self, Self::Initialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_predicate() {
        assert!(Phase::Initialize.is_initialize());
        assert!(!Phase::Running.is_initialize());
    }
}
