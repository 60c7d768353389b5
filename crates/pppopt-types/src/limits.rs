//! Engine-wide size and bound constants.

/// Maximum length of one word produced by the lexer, in bytes. A longer
/// word is truncated with a non-fatal warning.
pub const MAX_WORD_LEN: usize = 1024;

/// Capacity of the fixed authentication name buffers (`user`, `name`,
/// `remotename`).
pub const MAX_NAME_LEN: usize = 256;

/// Capacity of the fixed secret buffer (`passwd`).
pub const MAX_SECRET_LEN: usize = 256;

/// Capacity of the fixed device-path buffer.
pub const MAX_PATH_LEN: usize = 1024;

/// Maximum nesting depth for `file`/`call` inclusion. Exceeding it is a
/// per-directive error, not a crash.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// Default maximum receive unit.
pub const DEFAULT_MRU: i32 = 1500;

/// Smallest negotiable MRU/MTU.
pub const MIN_MRU: i32 = 128;

/// Largest negotiable MRU/MTU.
pub const MAX_MRU: i32 = 16384;

/// Bounds for the VJ compression slot count.
pub const MIN_VJ_SLOTS: i32 = 2;
pub const MAX_VJ_SLOTS: i32 = 16;

/// Default pause before reconnecting, in seconds.
pub const DEFAULT_HOLDOFF: i32 = 30;
