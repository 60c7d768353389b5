//! Typed directive descriptors.
//!
//! A descriptor is static metadata describing how to parse, validate and
//! store one directive's value. Storage targets are field projections into
//! [`Config`] (plain functions from `&mut Config` to the typed slot), so
//! a descriptor cannot disagree with the type of what it stores. Behavior
//! that the kind alone does not fix (numeric policy, argument arity,
//! fixed-capacity storage) lives as typed fields on the kind variant.

use pppopt_error::Result;
use pppopt_types::{Config, Provenance};

use crate::source::Parser;

/// Projection to a boolean slot.
pub type BoolProj = fn(&mut Config) -> &mut bool;
/// Projection to a signed integer slot.
pub type IntProj = fn(&mut Config) -> &mut i32;
/// Projection to an unsigned 32-bit slot.
pub type U32Proj = fn(&mut Config) -> &mut u32;
/// Projection to a fixed-capacity string slot.
pub type StrProj = fn(&mut Config) -> &mut String;
/// Projection to a dynamically allocated string slot.
pub type OptStrProj = fn(&mut Config) -> &mut Option<String>;
/// Projection to a provenance record.
pub type ProvProj = fn(&mut Config) -> &mut Provenance;

/// Handler for a `special` directive: full control over the raw argument
/// words, with access to the parse session for nested inclusion.
pub type SpecialHandler = fn(&mut Parser<'_>, &mut Config, &[String]) -> Result<()>;

/// String storage discipline.
#[derive(Clone, Copy)]
pub enum StrTarget {
    /// Fixed-capacity buffer: the stored value is truncated to `cap - 1`
    /// bytes.
    Fixed { proj: StrProj, cap: usize },
    /// Freshly allocated storage replacing any prior value.
    Dynamic { proj: OptStrProj },
}

/// The directive kind: one case per way of parsing and storing a value.
#[derive(Clone, Copy)]
pub enum Kind {
    /// Store a literal boolean; consumes no argument.
    Bool {
        /// The literal to store.
        value: bool,
        target: BoolProj,
        /// Copy-through secondary slot.
        mirror: Option<BoolProj>,
    },
    /// Signed integer with the traditional numeric policy.
    Int {
        target: IntProj,
        /// Whether an argument word is consumed; without one the value
        /// starts at zero and only `offset` applies.
        takes_arg: bool,
        /// Literal added after parsing (the sign-extended flag value).
        offset: i32,
        /// Add to the stored value instead of replacing it.
        increment: bool,
        /// Inclusive lower bound on the parsed value.
        lower: Option<i32>,
        /// Inclusive upper bound on the parsed value.
        upper: Option<i32>,
        /// Zero is exempt from the bounds and means "no limit" for the
        /// monotonicity rule.
        zero_ok: bool,
        /// An unprivileged source may not increase the stored value.
        no_increase: bool,
        /// Copy-through secondary slot.
        mirror: Option<IntProj>,
    },
    /// Unsigned 32-bit value; the argument is parsed base-16.
    U32 {
        target: U32Proj,
        /// Whether an argument word is consumed; without one,
        /// `noarg_value` is stored.
        takes_arg: bool,
        /// Literal stored when no argument is consumed.
        noarg_value: u32,
        /// OR into the existing value instead of replacing it.
        or_merge: bool,
        /// Copy-through secondary slot.
        mirror: Option<U32Proj>,
    },
    /// String argument.
    Str { target: StrTarget },
    /// Delegates fully to an externally supplied function.
    Special {
        handler: SpecialHandler,
        /// Whether one argument word is consumed.
        takes_arg: bool,
    },
}

/// Secondary-target side effect, applied after a successful store.
/// `EnabledBy` is the odd one out: it is a precondition, not an effect.
/// The modes are mutually exclusive per descriptor.
#[derive(Clone, Copy)]
pub enum Companion {
    /// No secondary target.
    None,
    /// Set a companion flag true.
    SetFlag(BoolProj),
    /// Stamp who set the value.
    Stamp(ProvProj),
    /// Processing is allowed only while the companion flag is true.
    EnabledBy(BoolProj),
}

/// Static metadata for one named directive.
#[derive(Clone, Copy)]
pub struct Descriptor {
    /// Directive name; unique per table, case-sensitive.
    pub name: &'static str,
    /// One-line description for the help listing.
    pub help: &'static str,
    /// Requires an elevated-privilege source.
    pub privileged: bool,
    pub kind: Kind,
    pub companion: Companion,
}

impl Descriptor {
    /// How many argument words this directive consumes.
    pub const fn arity(&self) -> usize {
        match self.kind {
            Kind::Bool { .. } => 0,
            Kind::Int { takes_arg, .. }
            | Kind::U32 { takes_arg, .. }
            | Kind::Special { takes_arg, .. } => takes_arg as usize,
            Kind::Str { .. } => 1,
        }
    }

    /// Structural sanity: the companion modes that mirror a stored value
    /// already live inside the kind, so a kind-level mirror excludes a
    /// descriptor-level companion effect.
    pub fn is_well_formed(&self) -> bool {
        let has_mirror = matches!(
            self.kind,
            Kind::Bool {
                mirror: Some(_),
                ..
            } | Kind::Int {
                mirror: Some(_),
                ..
            } | Kind::U32 {
                mirror: Some(_),
                ..
            }
        );
        !(has_mirror && !matches!(self.companion, Companion::None))
    }
}

impl std::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .field("privileged", &self.privileged)
            .finish_non_exhaustive()
    }
}
