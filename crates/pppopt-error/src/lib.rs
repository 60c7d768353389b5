use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for the configuration-directive engine.
///
/// Variants mirror the diagnostics the engine can emit while parsing the
/// command line and option files: structured variants for the conditions
/// callers dispatch on (privilege, unknown names, fatal reads), message
/// text matching the daemon's traditional wording.
#[derive(Error, Debug)]
pub enum PppoptError {
    // === Per-directive rejections ===
    /// A directive was given fewer argument words than its arity requires.
    #[error("too few parameters for option {option}")]
    TooFewParameters { option: String },

    /// A word matched no descriptor and no domain leaf setter claimed it.
    #[error("unrecognized option '{option}'")]
    UnrecognizedOption { option: String },

    /// A privileged directive was issued from an unprivileged source.
    #[error("using the {option} option requires root privilege")]
    PrivilegeRequired { option: String },

    /// A directive gated on a companion flag that is currently false.
    #[error("{option} option is disabled")]
    OptionDisabled { option: String },

    /// An argument failed numeric conversion.
    #[error("invalid numeric parameter '{value}' for {option} option")]
    InvalidNumber { option: String, value: String },

    /// A numeric argument fell outside the descriptor's bounds.
    ///
    /// `constraint` is the human-readable bound description, e.g.
    /// `">= 10"`, `"zero or >= 10"`, `"between 128 and 16384"`.
    #[error("{option} value must be {constraint}")]
    ValueOutOfRange { option: String, constraint: String },

    /// An unprivileged source tried to raise a monotonic-non-increase value.
    #[error("{option} value cannot be increased")]
    CannotIncrease { option: String },

    // === Leaf-setter rejections ===
    /// A hostname in an address pair did not resolve.
    #[error("unknown host: {name}")]
    UnknownHost { name: String },

    /// The local side of an address pair is in a disallowed class.
    #[error("bad local IP address {addr}")]
    BadLocalAddress { addr: String },

    /// The remote side of an address pair is in a disallowed class.
    #[error("bad remote IP address {addr}")]
    BadRemoteAddress { addr: String },

    /// A netmask word did not parse, or narrowed an existing mask.
    #[error("invalid netmask value '{value}'")]
    InvalidNetmask { value: String },

    /// A device path could not be examined for a reason other than absence.
    #[error("couldn't stat {path}: {source}")]
    DeviceStat {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An escape-character code is outside the escapable range.
    #[error("can't escape character 0x{code:02x}")]
    CannotEscape { code: u32 },

    // === File conditions ===
    /// A mandatory options file could not be opened.
    #[error("can't open options file {}: {source}", .path.display())]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A named-peer filename failed sandbox validation.
    #[error("call option value may not contain .. or start with /")]
    InvalidPeerName { name: String },

    /// File inclusion recursed past the depth limit.
    #[error("options file {} nested too deeply", .path.display())]
    IncludeTooDeep { path: PathBuf },

    // === Fatal ===
    /// A mid-file read error, distinct from clean end-of-file. Never retried.
    #[error("error reading {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Control ===
    /// Orderly termination request (`--help` / `--version` during the
    /// initialization phase). Not a failure; the caller decides what the
    /// process does with it.
    #[error("exit with status {code}")]
    Exit { code: i32 },
}

/// Coarse classification used by the source chain to decide how far an
/// error propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Aborts the current source's parse; earlier directives stay applied.
    Directive,
    /// A file-level condition (open failure, sandbox violation, depth).
    File,
    /// Terminates option processing immediately; never retried.
    Fatal,
    /// Orderly termination request, not a failure.
    Exit,
}

impl PppoptError {
    /// Map this error to its propagation class.
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::TooFewParameters { .. }
            | Self::UnrecognizedOption { .. }
            | Self::PrivilegeRequired { .. }
            | Self::OptionDisabled { .. }
            | Self::InvalidNumber { .. }
            | Self::ValueOutOfRange { .. }
            | Self::CannotIncrease { .. }
            | Self::UnknownHost { .. }
            | Self::BadLocalAddress { .. }
            | Self::BadRemoteAddress { .. }
            | Self::InvalidNetmask { .. }
            | Self::DeviceStat { .. }
            | Self::CannotEscape { .. } => ErrorClass::Directive,
            Self::CannotOpen { .. }
            | Self::InvalidPeerName { .. }
            | Self::IncludeTooDeep { .. } => ErrorClass::File,
            Self::ReadError { .. } => ErrorClass::Fatal,
            Self::Exit { .. } => ErrorClass::Exit,
        }
    }

    /// Whether this error must stop option processing outright.
    pub const fn is_fatal(&self) -> bool {
        matches!(self.class(), ErrorClass::Fatal)
    }

    /// Whether this is an orderly exit request rather than a failure.
    pub const fn is_exit(&self) -> bool {
        matches!(self, Self::Exit { .. })
    }

    /// Create a too-few-parameters error.
    pub fn too_few(option: impl Into<String>) -> Self {
        Self::TooFewParameters {
            option: option.into(),
        }
    }

    /// Create an unrecognized-option error.
    pub fn unrecognized(option: impl Into<String>) -> Self {
        Self::UnrecognizedOption {
            option: option.into(),
        }
    }

    /// Create a privilege-required error.
    pub fn privilege(option: impl Into<String>) -> Self {
        Self::PrivilegeRequired {
            option: option.into(),
        }
    }

    /// Create an invalid-number error.
    pub fn invalid_number(option: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            option: option.into(),
            value: value.into(),
        }
    }

    /// Create an out-of-range error with a preformatted bound description.
    pub fn out_of_range(option: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::ValueOutOfRange {
            option: option.into(),
            constraint: constraint.into(),
        }
    }

    /// Create an unknown-host error.
    pub fn unknown_host(name: impl Into<String>) -> Self {
        Self::UnknownHost { name: name.into() }
    }
}

/// Result type alias using `PppoptError`.
pub type Result<T> = std::result::Result<T, PppoptError>;
