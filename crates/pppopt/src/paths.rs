//! Standard option-file locations.
//!
//! Defaults match the traditional layout; tests and embedders may point a
//! session at a scratch directory instead.

use std::path::PathBuf;

/// System-wide options file, parsed with elevated privilege.
pub const SYS_OPTIONS: &str = "/etc/ppp/options";

/// Prefix for per-device options files; the device name (with `/`
/// rewritten to `.`) is appended.
pub const PER_DEVICE_PREFIX: &str = "/etc/ppp/options.";

/// Per-user options file name, relative to the user's home directory.
pub const USER_OPTIONS: &str = ".ppprc";

/// Sandbox directory for named-peer option files.
pub const PEERS_DIR: &str = "/etc/ppp/peers";

/// The set of locations one parse session consults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// System-wide options file.
    pub sys_options: PathBuf,
    /// Prefix the per-device file name is appended to.
    pub per_device_prefix: String,
    /// Home-relative per-user file name.
    pub user_options: String,
    /// Named-peer sandbox directory.
    pub peers_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            sys_options: PathBuf::from(SYS_OPTIONS),
            per_device_prefix: PER_DEVICE_PREFIX.to_owned(),
            user_options: USER_OPTIONS.to_owned(),
            peers_dir: PathBuf::from(PEERS_DIR),
        }
    }
}
