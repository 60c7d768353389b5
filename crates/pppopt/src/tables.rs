//! Built-in directive tables.
//!
//! `GENERAL_OPTIONS` and `AUTH_OPTIONS` are always registered, in that
//! order; `LINK_OPTIONS` and `IP_OPTIONS` are the negotiation subsystems'
//! tables, registered behind them by [`Registry::standard`]. Precedence
//! is registration order, so nothing here can be shadowed by a subsystem.
//!
//! [`Registry::standard`]: crate::registry::Registry::standard

use pppopt_types::Config;
use pppopt_types::limits::{MAX_MRU, MAX_NAME_LEN, MAX_SECRET_LEN, MAX_VJ_SLOTS, MIN_MRU, MIN_VJ_SLOTS};

use crate::descriptor::{Companion, Descriptor, Kind, StrTarget};
use crate::setters;

// Field projection as a plain function, so descriptors stay `static`.
macro_rules! proj {
    ($ty:ty, $($field:tt)+) => {{
        fn project(cfg: &mut Config) -> &mut $ty {
            &mut cfg.$($field)+
        }
        project as fn(&mut Config) -> &mut $ty
    }};
}

/// Shorthand for the common all-defaults integer descriptor fields.
macro_rules! int_kind {
    ($($field:tt)+) => {
        Kind::Int {
            target: proj!(i32, $($field)+),
            takes_arg: true,
            offset: 0,
            increment: false,
            lower: None,
            upper: None,
            zero_ok: false,
            no_increase: false,
            mirror: None,
        }
    };
}

/// A no-argument integer directive that stores a literal.
macro_rules! int_literal {
    ($value:expr, $($field:tt)+) => {
        Kind::Int {
            target: proj!(i32, $($field)+),
            takes_arg: false,
            offset: $value,
            increment: false,
            lower: None,
            upper: None,
            zero_ok: false,
            no_increase: false,
            mirror: None,
        }
    };
}

macro_rules! bool_kind {
    ($value:expr, $($field:tt)+) => {
        Kind::Bool {
            value: $value,
            target: proj!(bool, $($field)+),
            mirror: None,
        }
    };
}

/// The built-in general table, highest precedence.
pub static GENERAL_OPTIONS: &[Descriptor] = &[
    Descriptor {
        name: "debug",
        help: "Increase debugging level",
        privileged: false,
        kind: Kind::Int {
            target: proj!(i32, debug),
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
    },
    Descriptor {
        name: "-d",
        help: "Increase debugging level",
        privileged: false,
        kind: Kind::Int {
            target: proj!(i32, debug),
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
    },
    Descriptor {
        name: "kdebug",
        help: "Set kernel driver debug level",
        privileged: false,
        kind: int_kind!(kdebug),
        companion: Companion::None,
    },
    Descriptor {
        name: "nodetach",
        help: "Don't detach from controlling tty",
        privileged: false,
        kind: bool_kind!(true, nodetach),
        companion: Companion::None,
    },
    Descriptor {
        name: "-detach",
        help: "Don't detach from controlling tty",
        privileged: false,
        kind: bool_kind!(true, nodetach),
        companion: Companion::None,
    },
    Descriptor {
        name: "updetach",
        help: "Detach from controlling tty once link is up",
        privileged: false,
        kind: bool_kind!(true, updetach),
        companion: Companion::None,
    },
    Descriptor {
        name: "holdoff",
        help: "Set time in seconds before retrying connection",
        privileged: false,
        kind: int_kind!(holdoff),
        companion: Companion::None,
    },
    Descriptor {
        name: "idle",
        help: "Set time in seconds before disconnecting idle link",
        privileged: false,
        kind: int_kind!(idle_time_limit),
        companion: Companion::None,
    },
    Descriptor {
        name: "lock",
        help: "Lock serial device with UUCP-style lock file",
        privileged: false,
        kind: bool_kind!(true, lockflag),
        companion: Companion::None,
    },
    Descriptor {
        name: "-all",
        help: "Don't request/allow any LCP or IPCP options",
        privileged: false,
        kind: Kind::Special {
            handler: setters::no_options,
            takes_arg: false,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "connect",
        help: "A program to set up a connection",
        privileged: false,
        kind: Kind::Str {
            target: StrTarget::Dynamic {
                proj: proj!(Option<String>, connector),
            },
        },
        companion: Companion::Stamp(proj!(pppopt_types::Provenance, connector_info)),
    },
    Descriptor {
        name: "disconnect",
        help: "Program to disconnect serial device",
        privileged: false,
        kind: Kind::Str {
            target: StrTarget::Dynamic {
                proj: proj!(Option<String>, disconnector),
            },
        },
        companion: Companion::Stamp(proj!(pppopt_types::Provenance, disconnector_info)),
    },
    Descriptor {
        name: "welcome",
        help: "Script to welcome client",
        privileged: false,
        kind: Kind::Str {
            target: StrTarget::Dynamic {
                proj: proj!(Option<String>, welcomer),
            },
        },
        companion: Companion::Stamp(proj!(pppopt_types::Provenance, welcomer_info)),
    },
    Descriptor {
        name: "maxconnect",
        help: "Set connection time limit",
        privileged: false,
        kind: Kind::Int {
            target: proj!(i32, maxconnect),
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
    },
    Descriptor {
        name: "crtscts",
        help: "Set hardware (RTS/CTS) flow control",
        privileged: false,
        kind: int_literal!(1, flow_control),
        companion: Companion::None,
    },
    Descriptor {
        name: "nocrtscts",
        help: "Disable hardware flow control",
        privileged: false,
        kind: int_literal!(-1, flow_control),
        companion: Companion::None,
    },
    Descriptor {
        name: "-crtscts",
        help: "Disable hardware flow control",
        privileged: false,
        kind: int_literal!(-1, flow_control),
        companion: Companion::None,
    },
    Descriptor {
        name: "cdtrcts",
        help: "Set alternate hardware (DTR/CTS) flow control",
        privileged: false,
        kind: int_literal!(2, flow_control),
        companion: Companion::None,
    },
    Descriptor {
        name: "nocdtrcts",
        help: "Disable hardware flow control",
        privileged: false,
        kind: int_literal!(-1, flow_control),
        companion: Companion::None,
    },
    Descriptor {
        name: "xonxoff",
        help: "Set software (XON/XOFF) flow control",
        privileged: false,
        kind: Kind::Special {
            handler: setters::set_xonxoff,
            takes_arg: false,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "domain",
        help: "Add given domain name to hostname",
        privileged: false,
        kind: Kind::Special {
            handler: setters::set_domain,
            takes_arg: true,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "mtu",
        help: "Set our MTU",
        privileged: false,
        kind: Kind::Int {
            target: proj!(i32, lcp_allow.mru),
            takes_arg: true,
            offset: 0,
            increment: false,
            lower: Some(MIN_MRU),
            upper: Some(MAX_MRU),
            zero_ok: false,
            no_increase: false,
            mirror: None,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "netmask",
        help: "Set netmask",
        privileged: false,
        kind: Kind::Special {
            handler: setters::set_netmask,
            takes_arg: true,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "modem",
        help: "Use modem control lines",
        privileged: false,
        kind: bool_kind!(true, modem),
        companion: Companion::None,
    },
    Descriptor {
        name: "local",
        help: "Don't use modem control lines",
        privileged: false,
        kind: bool_kind!(false, modem),
        companion: Companion::None,
    },
    Descriptor {
        name: "file",
        help: "Take options from a file",
        privileged: false,
        kind: Kind::Special {
            handler: setters::read_file,
            takes_arg: true,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "call",
        help: "Take options from a privileged file",
        privileged: false,
        kind: Kind::Special {
            handler: setters::call_file,
            takes_arg: true,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "persist",
        help: "Keep on reopening connection after close",
        privileged: false,
        kind: bool_kind!(true, persist),
        companion: Companion::None,
    },
    Descriptor {
        name: "nopersist",
        help: "Turn off persist option",
        privileged: false,
        kind: bool_kind!(false, persist),
        companion: Companion::None,
    },
    Descriptor {
        name: "demand",
        help: "Dial on demand",
        privileged: false,
        kind: bool_kind!(true, demand),
        companion: Companion::SetFlag(proj!(bool, persist)),
    },
    Descriptor {
        name: "--version",
        help: "Show version number",
        privileged: false,
        kind: Kind::Special {
            handler: setters::show_version,
            takes_arg: false,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "--help",
        help: "Show brief listing of options",
        privileged: false,
        kind: Kind::Special {
            handler: setters::show_help,
            takes_arg: false,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "-h",
        help: "Show brief listing of options",
        privileged: false,
        kind: Kind::Special {
            handler: setters::show_help,
            takes_arg: false,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "pass-filter",
        help: "Set filter for packets to pass",
        privileged: false,
        kind: Kind::Special {
            handler: setters::set_pass_filter,
            takes_arg: true,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "active-filter",
        help: "Set filter for active packets",
        privileged: false,
        kind: Kind::Special {
            handler: setters::set_active_filter,
            takes_arg: true,
        },
        companion: Companion::None,
    },
];

/// The authentication table, consulted right after the general table.
pub static AUTH_OPTIONS: &[Descriptor] = &[
    Descriptor {
        name: "auth",
        help: "Require authentication from peer",
        privileged: false,
        kind: bool_kind!(true, auth_required),
        companion: Companion::None,
    },
    Descriptor {
        name: "noauth",
        help: "Don't require peer to authenticate",
        privileged: true,
        kind: bool_kind!(false, auth_required),
        companion: Companion::SetFlag(proj!(bool, allow_any_ip)),
    },
    Descriptor {
        name: "require-pap",
        help: "Require PAP authentication from peer",
        privileged: false,
        kind: bool_kind!(true, lcp_want.neg_upap),
        companion: Companion::SetFlag(proj!(bool, auth_required)),
    },
    Descriptor {
        name: "refuse-pap",
        help: "Don't agree to authenticate with PAP",
        privileged: false,
        kind: bool_kind!(false, lcp_allow.neg_upap),
        companion: Companion::None,
    },
    Descriptor {
        name: "-pap",
        help: "Don't agree to authenticate with PAP",
        privileged: false,
        kind: bool_kind!(false, lcp_allow.neg_upap),
        companion: Companion::None,
    },
    Descriptor {
        name: "require-chap",
        help: "Require CHAP authentication from peer",
        privileged: false,
        kind: bool_kind!(true, lcp_want.neg_chap),
        companion: Companion::SetFlag(proj!(bool, auth_required)),
    },
    Descriptor {
        name: "refuse-chap",
        help: "Don't agree to authenticate with CHAP",
        privileged: false,
        kind: bool_kind!(false, lcp_allow.neg_chap),
        companion: Companion::None,
    },
    Descriptor {
        name: "-chap",
        help: "Don't agree to authenticate with CHAP",
        privileged: false,
        kind: bool_kind!(false, lcp_allow.neg_chap),
        companion: Companion::None,
    },
    Descriptor {
        name: "name",
        help: "Set local name for authentication",
        privileged: true,
        kind: Kind::Str {
            target: StrTarget::Fixed {
                proj: proj!(String, our_name),
                cap: MAX_NAME_LEN,
            },
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "user",
        help: "Set name for authenticating with peer",
        privileged: false,
        kind: Kind::Str {
            target: StrTarget::Fixed {
                proj: proj!(String, user),
                cap: MAX_NAME_LEN,
            },
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "password",
        help: "Password for authenticating to the peer",
        privileged: false,
        kind: Kind::Str {
            target: StrTarget::Fixed {
                proj: proj!(String, passwd),
                cap: MAX_SECRET_LEN,
            },
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "remotename",
        help: "Set remote name for authentication",
        privileged: false,
        kind: Kind::Str {
            target: StrTarget::Fixed {
                proj: proj!(String, remote_name),
                cap: MAX_NAME_LEN,
            },
        },
        companion: Companion::SetFlag(proj!(bool, explicit_remote)),
    },
    Descriptor {
        name: "usehostname",
        help: "Must use hostname for authentication name",
        privileged: false,
        kind: bool_kind!(true, usehostname),
        companion: Companion::None,
    },
    Descriptor {
        name: "login",
        help: "Use system password database for PAP",
        privileged: false,
        kind: bool_kind!(true, uselogin),
        companion: Companion::None,
    },
    Descriptor {
        name: "papcrypt",
        help: "PAP passwords are encrypted",
        privileged: false,
        kind: bool_kind!(true, cryptpap),
        companion: Companion::None,
    },
];

/// Link negotiation table, registered by the link subsystem.
pub static LINK_OPTIONS: &[Descriptor] = &[
    Descriptor {
        name: "asyncmap",
        help: "Set asyncmap (for received packets)",
        privileged: false,
        kind: Kind::U32 {
            target: proj!(u32, lcp_want.asyncmap),
            takes_arg: true,
            noarg_value: 0,
            or_merge: true,
            mirror: None,
        },
        companion: Companion::SetFlag(proj!(bool, lcp_want.neg_asyncmap)),
    },
    Descriptor {
        name: "-as",
        help: "Set asyncmap (for received packets)",
        privileged: false,
        kind: Kind::U32 {
            target: proj!(u32, lcp_want.asyncmap),
            takes_arg: true,
            noarg_value: 0,
            or_merge: true,
            mirror: None,
        },
        companion: Companion::SetFlag(proj!(bool, lcp_want.neg_asyncmap)),
    },
    Descriptor {
        name: "escape",
        help: "List of character codes to escape on transmission",
        privileged: false,
        kind: Kind::Special {
            handler: setters::set_escape,
            takes_arg: true,
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "mru",
        help: "Set MRU value for negotiation",
        privileged: false,
        kind: Kind::Int {
            target: proj!(i32, lcp_want.mru),
            takes_arg: true,
            offset: 0,
            increment: false,
            lower: Some(MIN_MRU),
            upper: Some(MAX_MRU),
            zero_ok: false,
            no_increase: false,
            mirror: None,
        },
        companion: Companion::SetFlag(proj!(bool, lcp_want.neg_mru)),
    },
    Descriptor {
        name: "passive",
        help: "Wait passively for the peer after sending configure requests",
        privileged: false,
        kind: bool_kind!(true, lcp_want.passive),
        companion: Companion::None,
    },
    Descriptor {
        name: "silent",
        help: "Wait silently until the peer sends a configure request",
        privileged: false,
        kind: bool_kind!(true, lcp_want.silent),
        companion: Companion::None,
    },
];

/// IP negotiation table, registered by the IP subsystem.
pub static IP_OPTIONS: &[Descriptor] = &[
    Descriptor {
        name: "noip",
        help: "Disable IP negotiation entirely",
        privileged: false,
        kind: bool_kind!(false, ip_enabled),
        companion: Companion::None,
    },
    Descriptor {
        name: "vj-max-slots",
        help: "Set maximum VJ header slots",
        privileged: false,
        kind: Kind::Int {
            target: proj!(i32, ipcp_want.vj_max_slots),
            takes_arg: true,
            offset: 0,
            increment: false,
            lower: Some(MIN_VJ_SLOTS),
            upper: Some(MAX_VJ_SLOTS),
            zero_ok: false,
            no_increase: false,
            mirror: None,
        },
        companion: Companion::EnabledBy(proj!(bool, ipcp_want.neg_vj)),
    },
    Descriptor {
        name: "novj",
        help: "Disable VJ header compression",
        privileged: false,
        kind: Kind::Bool {
            value: false,
            target: proj!(bool, ipcp_want.neg_vj),
            mirror: Some(proj!(bool, ipcp_allow.neg_vj)),
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "-vj",
        help: "Disable VJ header compression",
        privileged: false,
        kind: Kind::Bool {
            value: false,
            target: proj!(bool, ipcp_want.neg_vj),
            mirror: Some(proj!(bool, ipcp_allow.neg_vj)),
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "defaultroute",
        help: "Add default route through the interface",
        privileged: false,
        kind: bool_kind!(true, ipcp_want.default_route),
        companion: Companion::EnabledBy(proj!(bool, ipcp_allow.default_route)),
    },
    Descriptor {
        name: "nodefaultroute",
        help: "Disable the defaultroute option",
        privileged: false,
        kind: Kind::Bool {
            value: false,
            target: proj!(bool, ipcp_allow.default_route),
            mirror: Some(proj!(bool, ipcp_want.default_route)),
        },
        companion: Companion::None,
    },
    Descriptor {
        name: "proxyarp",
        help: "Add proxy ARP entry for the peer",
        privileged: false,
        kind: bool_kind!(true, ipcp_want.proxy_arp),
        companion: Companion::EnabledBy(proj!(bool, ipcp_allow.proxy_arp)),
    },
    Descriptor {
        name: "noproxyarp",
        help: "Disable the proxyarp option",
        privileged: false,
        kind: Kind::Bool {
            value: false,
            target: proj!(bool, ipcp_allow.proxy_arp),
            mirror: Some(proj!(bool, ipcp_want.proxy_arp)),
        },
        companion: Companion::None,
    },
];
