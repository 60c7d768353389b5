//! Scoped privilege drop around file opens.
//!
//! A setuid-root process must not open user-named option files with
//! elevated rights: the open itself would follow links and read files the
//! invoking user cannot. The guard drops the effective uid to the real uid
//! for the duration of the open attempt and restores it on drop, so the
//! elevate/open/restore triple stays paired on every exit path.

use nix::unistd::{Uid, geteuid, getuid, seteuid};

/// RAII guard: effective uid is the real uid while this value lives.
#[derive(Debug)]
pub struct DroppedPrivileges {
    restore: Option<Uid>,
}

impl DroppedPrivileges {
    /// Drop the effective uid to the real uid. A no-op when the process
    /// is not running setuid (real == effective).
    pub fn drop_to_real() -> Self {
        let real = getuid();
        let effective = geteuid();
        if real == effective {
            return Self { restore: None };
        }
        match seteuid(real) {
            Ok(()) => Self {
                restore: Some(effective),
            },
            Err(errno) => {
                tracing::warn!(%errno, "could not drop effective uid");
                Self { restore: None }
            }
        }
    }
}

impl Drop for DroppedPrivileges {
    fn drop(&mut self) {
        if let Some(uid) = self.restore.take() {
            if let Err(errno) = seteuid(uid) {
                // A stuck de-elevated uid is a security defect; make it loud.
                tracing::error!(%errno, "could not restore effective uid");
            }
        }
    }
}
