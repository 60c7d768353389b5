//! Directive dispatch: conversion, validation and storage.
//!
//! Given a matched descriptor and exactly as many raw words as its arity
//! requires, check authorization and dependencies, convert the argument,
//! enforce the numeric policy, then write the value and apply the
//! secondary side effect. Validation strictly precedes mutation: a
//! rejected directive leaves the configuration untouched.

use pppopt_error::{PppoptError, Result};
use pppopt_types::Config;
use tracing::debug;

use crate::descriptor::{Companion, Descriptor, Kind, StrTarget};
use crate::num;
use crate::source::Parser;

/// Process one directive against the configuration.
pub(crate) fn process_option(
    parser: &mut Parser<'_>,
    cfg: &mut Config,
    desc: &'static Descriptor,
    args: &[String],
) -> Result<()> {
    if desc.privileged && !parser.context().privileged {
        return Err(parser.fail(PppoptError::privilege(desc.name)));
    }
    if let Companion::EnabledBy(flag) = desc.companion {
        if !*flag(cfg) {
            return Err(parser.fail(PppoptError::OptionDisabled {
                option: desc.name.to_owned(),
            }));
        }
    }

    debug!(directive = desc.name, source = %parser.context().source, "applying");

    match desc.kind {
        Kind::Bool {
            value,
            target,
            mirror,
        } => {
            *target(cfg) = value;
            if let Some(m) = mirror {
                *m(cfg) = value;
            }
        }

        Kind::Int {
            target,
            takes_arg,
            offset,
            increment,
            lower,
            upper,
            zero_ok,
            no_increase,
            mirror,
        } => {
            let mut value = 0i32;
            if takes_arg {
                value = num::parse_int(&args[0])
                    .ok_or_else(|| parser.fail(PppoptError::invalid_number(desc.name, &args[0])))?;

                let violated =
                    lower.is_some_and(|l| value < l) || upper.is_some_and(|u| value > u);
                if violated && !(zero_ok && value == 0) {
                    let zok = if zero_ok { "zero or " } else { "" };
                    let constraint = match (lower, upper) {
                        (Some(l), Some(u)) => format!("{zok}between {l} and {u}"),
                        (Some(l), None) => format!("{zok}>= {l}"),
                        (None, Some(u)) => format!("{zok}<= {u}"),
                        (None, None) => String::new(),
                    };
                    return Err(parser.fail(PppoptError::out_of_range(desc.name, constraint)));
                }
            }

            value = value.wrapping_add(offset);
            if increment {
                value = value.wrapping_add(*target(cfg));
            }
            if no_increase && !parser.context().privileged {
                let old = *target(cfg);
                // With the zero-as-infinity exemption, zero orders above
                // every other value.
                let raised = if zero_ok {
                    old != 0 && (value == 0 || value > old)
                } else {
                    value > old
                };
                if raised {
                    return Err(parser.fail(PppoptError::CannotIncrease {
                        option: desc.name.to_owned(),
                    }));
                }
            }
            *target(cfg) = value;
            if let Some(m) = mirror {
                *m(cfg) = value;
            }
        }

        Kind::U32 {
            target,
            takes_arg,
            noarg_value,
            or_merge,
            mirror,
        } => {
            let mut value = if takes_arg {
                num::parse_number(&args[0], 16)
                    .ok_or_else(|| parser.fail(PppoptError::invalid_number(desc.name, &args[0])))?
            } else {
                noarg_value
            };
            if or_merge {
                value |= *target(cfg);
            }
            *target(cfg) = value;
            if let Some(m) = mirror {
                *m(cfg) = value;
            }
        }

        Kind::Str { target } => match target {
            StrTarget::Fixed { proj, cap } => copy_capped(proj(cfg), &args[0], cap),
            StrTarget::Dynamic { proj } => *proj(cfg) = Some(args[0].clone()),
        },

        Kind::Special { handler, .. } => handler(parser, cfg, args)?,
    }

    match desc.companion {
        Companion::SetFlag(flag) => *flag(cfg) = true,
        Companion::Stamp(record) => {
            let ctx = parser.context();
            let (privileged, source) = (ctx.privileged, ctx.source.clone());
            record(cfg).stamp(privileged, &source);
        }
        Companion::None | Companion::EnabledBy(_) => {}
    }

    Ok(())
}

/// Store `src` into a fixed-capacity slot: at most `cap - 1` bytes,
/// cut back to a character boundary.
pub(crate) fn copy_capped(dst: &mut String, src: &str, cap: usize) {
    let mut end = src.len().min(cap - 1);
    while end > 0 && !src.is_char_boundary(end) {
        end -= 1;
    }
    dst.clear();
    dst.push_str(&src[..end]);
}

#[cfg(test)]
mod tests {
    use pppopt_types::limits::MAX_NAME_LEN;

    use super::*;
    use crate::registry::Registry;

    fn run(
        desc: &'static Descriptor,
        args: &[&str],
        privileged: bool,
        cfg: &mut Config,
    ) -> Result<()> {
        let reg = Registry::empty();
        let mut parser = Parser::new(&reg, privileged);
        let args: Vec<String> = args.iter().map(|s| (*s).to_owned()).collect();
        process_option(&mut parser, cfg, desc, &args)
    }

    fn lockflag(cfg: &mut Config) -> &mut bool {
        &mut cfg.lockflag
    }
    fn kdebug(cfg: &mut Config) -> &mut i32 {
        &mut cfg.kdebug
    }
    fn debug_level(cfg: &mut Config) -> &mut i32 {
        &mut cfg.debug
    }
    fn maxconnect(cfg: &mut Config) -> &mut i32 {
        &mut cfg.maxconnect
    }
    fn asyncmap(cfg: &mut Config) -> &mut u32 {
        &mut cfg.lcp_want.asyncmap
    }
    fn neg_asyncmap(cfg: &mut Config) -> &mut bool {
        &mut cfg.lcp_want.neg_asyncmap
    }
    fn user(cfg: &mut Config) -> &mut String {
        &mut cfg.user
    }
    fn connector(cfg: &mut Config) -> &mut Option<String> {
        &mut cfg.connector
    }
    fn connector_info(cfg: &mut Config) -> &mut pppopt_types::Provenance {
        &mut cfg.connector_info
    }

    static LOCK: Descriptor = Descriptor {
        name: "lock",
        help: "",
        privileged: false,
        kind: Kind::Bool {
            value: true,
            target: lockflag,
            mirror: None,
        },
        companion: Companion::None,
    };

    static KDEBUG: Descriptor = Descriptor {
        name: "kdebug",
        help: "",
        privileged: false,
        kind: Kind::Int {
            target: kdebug,
            takes_arg: true,
            offset: 0,
            increment: false,
            lower: None,
            upper: None,
            zero_ok: false,
            no_increase: false,
            mirror: None,
        },
        companion: Companion::None,
    };

    static DEBUG: Descriptor = Descriptor {
        name: "debug",
        help: "",
        privileged: false,
        kind: Kind::Int {
            target: debug_level,
            takes_arg: false,
            offset: 1,
            increment: true,
            lower: None,
            upper: None,
            zero_ok: false,
            no_increase: false,
            mirror: None,
        },
        companion: Companion::None,
    };

    static BOUNDED: Descriptor = Descriptor {
        name: "bounded",
        help: "",
        privileged: false,
        kind: Kind::Int {
            target: kdebug,
            takes_arg: true,
            offset: 0,
            increment: false,
            lower: Some(10),
            upper: None,
            zero_ok: false,
            no_increase: false,
            mirror: None,
        },
        companion: Companion::None,
    };

    static MAXCONNECT: Descriptor = Descriptor {
        name: "maxconnect",
        help: "",
        privileged: false,
        kind: Kind::Int {
            target: maxconnect,
            takes_arg: true,
            offset: 0,
            increment: false,
            lower: Some(0),
            upper: None,
            zero_ok: true,
            no_increase: true,
            mirror: None,
        },
        companion: Companion::None,
    };

    static ASYNCMAP: Descriptor = Descriptor {
        name: "asyncmap",
        help: "",
        privileged: false,
        kind: Kind::U32 {
            target: asyncmap,
            takes_arg: true,
            noarg_value: 0,
            or_merge: true,
            mirror: None,
        },
        companion: Companion::SetFlag(neg_asyncmap),
    };

    static USER: Descriptor = Descriptor {
        name: "user",
        help: "",
        privileged: false,
        kind: Kind::Str {
            target: StrTarget::Fixed {
                proj: user,
                cap: MAX_NAME_LEN,
            },
        },
        companion: Companion::None,
    };

    static CONNECT: Descriptor = Descriptor {
        name: "connect",
        help: "",
        privileged: false,
        kind: Kind::Str {
            target: StrTarget::Dynamic { proj: connector },
        },
        companion: Companion::Stamp(connector_info),
    };

    static PRIV_LOCK: Descriptor = Descriptor {
        name: "privlock",
        help: "",
        privileged: true,
        kind: Kind::Bool {
            value: true,
            target: lockflag,
            mirror: None,
        },
        companion: Companion::None,
    };

    #[test]
    fn bool_stores_literal() {
        let mut cfg = Config::new();
        run(&LOCK, &[], false, &mut cfg).unwrap();
        assert!(cfg.lockflag);
    }

    #[test]
    fn int_parses_any_base() {
        let mut cfg = Config::new();
        run(&KDEBUG, &["0x7"], false, &mut cfg).unwrap();
        assert_eq!(cfg.kdebug, 7);
        run(&KDEBUG, &["010"], false, &mut cfg).unwrap();
        assert_eq!(cfg.kdebug, 8);
    }

    #[test]
    fn int_rejects_garbage_without_mutating() {
        let mut cfg = Config::new();
        cfg.kdebug = 3;
        let err = run(&KDEBUG, &["junk"], false, &mut cfg).unwrap_err();
        assert!(matches!(err, PppoptError::InvalidNumber { .. }));
        assert_eq!(cfg.kdebug, 3);
    }

    #[test]
    fn noarg_increment_accumulates() {
        let mut cfg = Config::new();
        run(&DEBUG, &[], false, &mut cfg).unwrap();
        run(&DEBUG, &[], false, &mut cfg).unwrap();
        assert_eq!(cfg.debug, 2);
    }

    #[test]
    fn lower_bound_enforced() {
        let mut cfg = Config::new();
        let err = run(&BOUNDED, &["5"], false, &mut cfg).unwrap_err();
        assert_eq!(err.to_string(), "bounded value must be >= 10");
        assert_eq!(cfg.kdebug, 0);

        run(&BOUNDED, &["10"], false, &mut cfg).unwrap();
        assert_eq!(cfg.kdebug, 10);
    }

    static BOUNDED_ZERO: Descriptor = Descriptor {
        name: "bounded-zero",
        help: "",
        privileged: false,
        kind: Kind::Int {
            target: kdebug,
            takes_arg: true,
            offset: 0,
            increment: false,
            lower: Some(10),
            upper: None,
            zero_ok: true,
            no_increase: false,
            mirror: None,
        },
        companion: Companion::None,
    };

    #[test]
    fn zero_as_infinity_passes_bounds() {
        let mut cfg = Config::new();
        cfg.maxconnect = 300;
        // 0 is below the lower bound but exempt.
        run(&MAXCONNECT, &["0"], true, &mut cfg).unwrap();
        assert_eq!(cfg.maxconnect, 0);

        // Same lower bound of 10: 5 is rejected, 10 and 0 are accepted.
        let err = run(&BOUNDED_ZERO, &["5"], false, &mut cfg).unwrap_err();
        assert_eq!(err.to_string(), "bounded-zero value must be zero or >= 10");
        run(&BOUNDED_ZERO, &["10"], false, &mut cfg).unwrap();
        assert_eq!(cfg.kdebug, 10);
        run(&BOUNDED_ZERO, &["0"], false, &mut cfg).unwrap();
        assert_eq!(cfg.kdebug, 0);
    }

    #[test]
    fn monotonic_non_increase_for_unprivileged() {
        let mut cfg = Config::new();
        cfg.maxconnect = 300;

        // Lowering is fine.
        run(&MAXCONNECT, &["200"], false, &mut cfg).unwrap();
        assert_eq!(cfg.maxconnect, 200);

        // Raising is rejected without privilege, applied with it.
        let err = run(&MAXCONNECT, &["500"], false, &mut cfg).unwrap_err();
        assert!(matches!(err, PppoptError::CannotIncrease { .. }));
        assert_eq!(cfg.maxconnect, 200);
        run(&MAXCONNECT, &["500"], true, &mut cfg).unwrap();
        assert_eq!(cfg.maxconnect, 500);

        // Zero means infinity: an unprivileged zero is an increase.
        let err = run(&MAXCONNECT, &["0"], false, &mut cfg).unwrap_err();
        assert!(matches!(err, PppoptError::CannotIncrease { .. }));
    }

    #[test]
    fn u32_or_merges_and_sets_flag() {
        let mut cfg = Config::new();
        run(&ASYNCMAP, &["a0000"], false, &mut cfg).unwrap();
        assert_eq!(cfg.lcp_want.asyncmap, 0x000a_0000);
        assert!(cfg.lcp_want.neg_asyncmap);

        run(&ASYNCMAP, &["3"], false, &mut cfg).unwrap();
        assert_eq!(cfg.lcp_want.asyncmap, 0x000a_0003);
    }

    #[test]
    fn fixed_string_truncates() {
        let mut cfg = Config::new();
        let long = "u".repeat(MAX_NAME_LEN + 40);
        run(&USER, &[&long], false, &mut cfg).unwrap();
        assert_eq!(cfg.user.len(), MAX_NAME_LEN - 1);
    }

    #[test]
    fn dynamic_string_replaces_and_stamps() {
        let mut cfg = Config::new();
        run(&CONNECT, &["chat -v"], true, &mut cfg).unwrap();
        assert_eq!(cfg.connector.as_deref(), Some("chat -v"));
        assert!(cfg.connector_info.privileged);
        assert_eq!(cfg.connector_info.source.as_deref(), Some("command line"));

        run(&CONNECT, &["other"], false, &mut cfg).unwrap();
        assert_eq!(cfg.connector.as_deref(), Some("other"));
        assert!(!cfg.connector_info.privileged);
    }

    #[test]
    fn privileged_directive_rejected_without_mutation() {
        let mut cfg = Config::new();
        let err = run(&PRIV_LOCK, &[], false, &mut cfg).unwrap_err();
        assert!(matches!(err, PppoptError::PrivilegeRequired { .. }));
        assert!(!cfg.lockflag);

        run(&PRIV_LOCK, &[], true, &mut cfg).unwrap();
        assert!(cfg.lockflag);
    }

    #[test]
    fn copy_capped_respects_char_boundaries() {
        let mut dst = String::new();
        copy_capped(&mut dst, "héllo", 3);
        // Byte 2 splits the two-byte é; only "h" survives.
        assert_eq!(dst, "h");
    }
}
