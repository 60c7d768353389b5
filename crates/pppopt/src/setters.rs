//! Domain leaf setters and `special` directive handlers.
//!
//! The leaf setters recognize bare words the registry cannot: a device
//! path, a line speed, a `local:remote` address pair. They return
//! `Ok(true)` when they claim the word, `Ok(false)` when it is not theirs,
//! and `Err` for a hard failure. The handlers below them implement the
//! built-in `special` directives.

use std::net::Ipv4Addr;
use std::path::Path;
use std::str::FromStr;

use pppopt_error::{PppoptError, Result};
use pppopt_types::Config;
use pppopt_types::limits::{MAX_NAME_LEN, MAX_PATH_LEN};

use crate::dispatch::copy_capped;
use crate::num;
use crate::source::Parser;

/// Recognize a serial device word. Prefixes `/dev/` when missing and
/// requires the node to exist. In quiet mode (the command-line pre-scan)
/// nothing is reported and nothing fails.
pub(crate) fn set_device(
    parser: &mut Parser<'_>,
    cfg: &mut Config,
    word: &str,
    quiet: bool,
) -> Result<bool> {
    if word.is_empty() {
        return Ok(false);
    }

    let path = if word.starts_with("/dev/") {
        word.to_owned()
    } else {
        format!("/dev/{word}")
    };

    match std::fs::metadata(&path) {
        Ok(_) => {
            copy_capped(&mut cfg.devnam, &path, MAX_PATH_LEN);
            cfg.default_device = false;
            let ctx = parser.context();
            let (privileged, source) = (ctx.privileged, ctx.source.clone());
            cfg.devnam_info.stamp(privileged, &source);
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound || quiet => Ok(false),
        Err(e) => Err(parser.fail(PppoptError::DeviceStat { path, source: e })),
    }
}

/// Recognize a bare line-speed word: a non-zero integer in any standard
/// base, with nothing trailing.
pub(crate) fn set_speed(cfg: &mut Config, word: &str) -> bool {
    match num::strtoul(word, 0) {
        Some((speed, rest)) if rest.is_empty() && speed != 0 => {
            cfg.speed = speed as i32;
            true
        }
        _ => false,
    }
}

/// Recognize a `local:remote` address pair. Either side may be empty.
/// Both sides are fully validated before either address is stored, so a
/// failure mutates neither.
pub(crate) fn set_ip_pair(parser: &mut Parser<'_>, cfg: &mut Config, word: &str) -> Result<bool> {
    let Some((local_text, remote_text)) = word.split_once(':') else {
        return Ok(false);
    };

    let mut local = None;
    if !local_text.is_empty() {
        let addr = resolve_side(parser, local_text)?.0;
        if bad_address(addr) {
            return Err(parser.fail(PppoptError::BadLocalAddress {
                addr: addr.to_string(),
            }));
        }
        if !addr.is_unspecified() {
            local = Some(addr);
        }
    }

    let mut remote = None;
    let mut resolved_name = None;
    if !remote_text.is_empty() {
        let (addr, by_name) = resolve_side(parser, remote_text)?;
        if bad_address(addr) {
            return Err(parser.fail(PppoptError::BadRemoteAddress {
                addr: addr.to_string(),
            }));
        }
        if !addr.is_unspecified() {
            remote = Some(addr);
        }
        if by_name {
            resolved_name = Some(remote_text);
        }
    }

    if let Some(addr) = local {
        cfg.ipcp_want.ouraddr = Some(addr);
    }
    if let Some(addr) = remote {
        cfg.ipcp_want.hisaddr = Some(addr);
    }
    // A resolved hostname doubles as the peer's display name when none
    // has been configured.
    if let Some(name) = resolved_name {
        if cfg.remote_name.is_empty() {
            copy_capped(&mut cfg.remote_name, name, MAX_NAME_LEN);
        }
    }
    Ok(true)
}

/// One side of an address pair: a literal address, or a hostname through
/// the resolver seam. The flag reports which one it was.
fn resolve_side(parser: &mut Parser<'_>, text: &str) -> Result<(Ipv4Addr, bool)> {
    if let Ok(addr) = Ipv4Addr::from_str(text) {
        return Ok((addr, false));
    }
    match parser.resolver().lookup_v4(text) {
        Some(addr) => Ok((addr, true)),
        None => Err(parser.fail(PppoptError::unknown_host(text))),
    }
}

/// Loopback, multicast and class-E addresses cannot be a link endpoint.
fn bad_address(addr: Ipv4Addr) -> bool {
    let leading = addr.octets()[0];
    leading == 127 || leading >= 224
}

/// `netmask`: up to four dot-separated octets, or one whole-word
/// hex/decimal literal, assembled left to right. The new mask must be a
/// superset of any mask already configured.
pub(crate) fn set_netmask(parser: &mut Parser<'_>, cfg: &mut Config, args: &[String]) -> Result<()> {
    let word = &args[0];
    let mut rest: &str = word;
    let mut mask: u32 = 0;
    let mut octet = 3i32;

    loop {
        let Some((part, after)) = num::strtoul(rest, 0) else {
            break;
        };
        if part > 255 {
            if octet == 3 {
                // A first component too large for an octet is a whole
                // 32-bit literal, e.g. 0xffffff00.
                mask = part;
                rest = after;
            }
            break;
        }
        mask |= part << (octet * 8);
        rest = after;
        if !rest.starts_with('.') || octet == 0 {
            break;
        }
        rest = &rest[1..];
        octet -= 1;
    }

    if !rest.is_empty() || (cfg.netmask & !mask) != 0 {
        return Err(parser.fail(PppoptError::InvalidNetmask {
            value: word.clone(),
        }));
    }
    cfg.netmask = mask;
    Ok(())
}

/// `domain`: append a domain suffix to the local hostname. Privileged.
pub(crate) fn set_domain(parser: &mut Parser<'_>, cfg: &mut Config, args: &[String]) -> Result<()> {
    if !parser.context().privileged {
        return Err(parser.fail(PppoptError::privilege("domain")));
    }
    if cfg.hostname.is_empty() {
        if let Ok(name) = nix::unistd::gethostname() {
            cfg.hostname = name.to_string_lossy().into_owned();
        }
    }
    let suffix = &args[0];
    if !suffix.is_empty() {
        if !suffix.starts_with('.') {
            cfg.hostname.push('.');
        }
        cfg.hostname.push_str(suffix);
    }
    if cfg.hostname.len() > MAX_NAME_LEN - 1 {
        let truncated = cfg.hostname.clone();
        copy_capped(&mut cfg.hostname, &truncated, MAX_NAME_LEN);
    }
    Ok(())
}

/// `escape`: comma-separated character codes (hex) added to the
/// transmit-escape map. Codes 0x20..0x3f and 0x5e cannot be escaped.
pub(crate) fn set_escape(parser: &mut Parser<'_>, cfg: &mut Config, args: &[String]) -> Result<()> {
    let mut rest: &str = &args[0];
    loop {
        let Some((code, after)) = num::strtoul(rest, 16) else {
            return Err(parser.fail(PppoptError::invalid_number("escape", rest)));
        };
        if (0x20..=0x3f).contains(&code) || code == 0x5e || code > 0xff {
            return Err(parser.fail(PppoptError::CannotEscape { code }));
        }
        cfg.xmit_escape[(code >> 5) as usize] |= 1u32 << (code & 0x1f);
        rest = after.trim_start_matches([',', ' ']);
        if rest.is_empty() {
            return Ok(());
        }
    }
}

/// `xonxoff`: software flow control, escaping ^S and ^Q on transmit.
pub(crate) fn set_xonxoff(
    _parser: &mut Parser<'_>,
    cfg: &mut Config,
    _args: &[String],
) -> Result<()> {
    cfg.lcp_want.asyncmap |= 0x000a_0000;
    cfg.lcp_want.neg_asyncmap = true;
    cfg.flow_control = -2;
    Ok(())
}

/// `-all`: request and allow no negotiation options at all.
pub(crate) fn no_options(
    _parser: &mut Parser<'_>,
    cfg: &mut Config,
    _args: &[String],
) -> Result<()> {
    cfg.clear_negotiation();
    Ok(())
}

/// `pass-filter`: record the expression; compilation belongs to the
/// packet-filter subsystem.
pub(crate) fn set_pass_filter(
    _parser: &mut Parser<'_>,
    cfg: &mut Config,
    args: &[String],
) -> Result<()> {
    cfg.pass_filter = Some(args[0].clone());
    Ok(())
}

/// `active-filter`: record the expression for link-activity matching.
pub(crate) fn set_active_filter(
    _parser: &mut Parser<'_>,
    cfg: &mut Config,
    args: &[String],
) -> Result<()> {
    cfg.active_filter = Some(args[0].clone());
    Ok(())
}

/// `file`: include another options file. The included file runs at the
/// current privilege, so an unprivileged source cannot escalate through
/// inclusion.
pub(crate) fn read_file(parser: &mut Parser<'_>, cfg: &mut Config, args: &[String]) -> Result<()> {
    let privileged = parser.context().privileged;
    parser.options_from_file(cfg, Path::new(&args[0]), true, true, privileged)
}

/// `call`: include a named-peer file from the sandbox directory, with
/// elevated privilege. The short name must stay inside the sandbox.
pub(crate) fn call_file(parser: &mut Parser<'_>, cfg: &mut Config, args: &[String]) -> Result<()> {
    let name = &args[0];
    let ok = !name.is_empty()
        && !name.starts_with('/')
        && !name.split('/').any(|segment| segment == "..");
    if !ok {
        return Err(parser.fail(PppoptError::InvalidPeerName { name: name.clone() }));
    }
    let path = parser.paths().peers_dir.join(name);
    parser.options_from_file(cfg, &path, true, true, true)
}

/// `--version`: write the version banner and request an orderly exit.
/// Outside the startup phase this is a no-op.
pub(crate) fn show_version(
    parser: &mut Parser<'_>,
    _cfg: &mut Config,
    _args: &[String],
) -> Result<()> {
    if !parser.diagnostics().phase().is_initialize() {
        return Ok(());
    }
    parser
        .diagnostics()
        .banner(&format!("pppopt version {}", env!("CARGO_PKG_VERSION")));
    Err(PppoptError::Exit { code: 0 })
}

/// `--help`: write the usage listing and request an orderly exit.
/// Outside the startup phase this is a no-op.
pub(crate) fn show_help(
    parser: &mut Parser<'_>,
    _cfg: &mut Config,
    _args: &[String],
) -> Result<()> {
    if !parser.diagnostics().phase().is_initialize() {
        return Ok(());
    }
    parser.usage();
    Err(PppoptError::Exit { code: 0 })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pppopt_types::Phase;

    use super::*;
    use crate::registry::Registry;
    use crate::resolve::HostResolver;

    struct MapResolver(HashMap<&'static str, Ipv4Addr>);

    impl HostResolver for MapResolver {
        fn lookup_v4(&self, name: &str) -> Option<Ipv4Addr> {
            self.0.get(name).copied()
        }
    }

    fn parser<'r>(reg: &'r Registry, privileged: bool) -> Parser<'r> {
        let mut p = Parser::new(reg, privileged);
        let mut hosts = HashMap::new();
        hosts.insert("gateway.example", Ipv4Addr::new(192, 0, 2, 1));
        p.set_resolver(Box::new(MapResolver(hosts)));
        p
    }

    fn arg(s: &str) -> Vec<String> {
        vec![s.to_owned()]
    }

    #[test]
    fn device_prefixes_and_requires_node() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();

        assert!(set_device(&mut p, &mut cfg, "null", false).unwrap());
        assert_eq!(cfg.devnam, "/dev/null");
        assert!(!cfg.default_device);
        assert!(cfg.devnam_info.is_set());

        assert!(!set_device(&mut p, &mut cfg, "no-such-node", false).unwrap());
        assert!(!set_device(&mut p, &mut cfg, "", false).unwrap());
    }

    #[test]
    fn speed_accepts_nonzero_full_words() {
        let mut cfg = Config::new();
        assert!(set_speed(&mut cfg, "57600"));
        assert_eq!(cfg.speed, 57600);
        assert!(set_speed(&mut cfg, "0x1c200"));
        assert_eq!(cfg.speed, 115200);

        assert!(!set_speed(&mut cfg, "0"));
        assert!(!set_speed(&mut cfg, "960Qbaud"));
        assert!(!set_speed(&mut cfg, "fast"));
        assert_eq!(cfg.speed, 115200);
    }

    #[test]
    fn ip_pair_sets_both_sides() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();

        assert!(set_ip_pair(&mut p, &mut cfg, "10.0.0.1:10.0.0.2").unwrap());
        assert_eq!(cfg.ipcp_want.ouraddr, Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(cfg.ipcp_want.hisaddr, Some(Ipv4Addr::new(10, 0, 0, 2)));
    }

    #[test]
    fn ip_pair_remote_only() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();

        assert!(set_ip_pair(&mut p, &mut cfg, ":10.0.0.2").unwrap());
        assert_eq!(cfg.ipcp_want.ouraddr, None);
        assert_eq!(cfg.ipcp_want.hisaddr, Some(Ipv4Addr::new(10, 0, 0, 2)));
    }

    #[test]
    fn ip_pair_without_colon_is_not_claimed() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();
        assert!(!set_ip_pair(&mut p, &mut cfg, "10.0.0.1").unwrap());
    }

    #[test]
    fn ip_pair_resolves_hostname_and_defaults_remote_name() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();

        assert!(set_ip_pair(&mut p, &mut cfg, ":gateway.example").unwrap());
        assert_eq!(cfg.ipcp_want.hisaddr, Some(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(cfg.remote_name, "gateway.example");

        // An already-configured name is kept.
        cfg.remote_name = "isp".to_owned();
        assert!(set_ip_pair(&mut p, &mut cfg, ":gateway.example").unwrap());
        assert_eq!(cfg.remote_name, "isp");
    }

    #[test]
    fn ip_pair_unresolvable_mutates_neither() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();

        let err = set_ip_pair(&mut p, &mut cfg, "10.0.0.1:nowhere.invalid").unwrap_err();
        assert!(matches!(err, PppoptError::UnknownHost { .. }));
        assert_eq!(cfg.ipcp_want.ouraddr, None);
        assert_eq!(cfg.ipcp_want.hisaddr, None);
    }

    #[test]
    fn ip_pair_rejects_bad_classes() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();

        let err = set_ip_pair(&mut p, &mut cfg, "127.0.0.1:10.0.0.2").unwrap_err();
        assert!(matches!(err, PppoptError::BadLocalAddress { .. }));
        let err = set_ip_pair(&mut p, &mut cfg, "10.0.0.1:224.0.0.9").unwrap_err();
        assert!(matches!(err, PppoptError::BadRemoteAddress { .. }));
        assert_eq!(cfg.ipcp_want.ouraddr, None);
    }

    #[test]
    fn netmask_octets_assemble_left_to_right() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();

        set_netmask(&mut p, &mut cfg, &arg("255.255.255.0")).unwrap();
        assert_eq!(cfg.netmask, 0xffff_ff00);
        assert_eq!(
            Ipv4Addr::from(cfg.netmask).octets(),
            [0xff, 0xff, 0xff, 0x00]
        );
    }

    #[test]
    fn netmask_accepts_whole_word_literal() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();
        set_netmask(&mut p, &mut cfg, &arg("0xffff0000")).unwrap();
        assert_eq!(cfg.netmask, 0xffff_0000);
    }

    #[test]
    fn netmask_rejects_narrowing() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();

        set_netmask(&mut p, &mut cfg, &arg("255.255.255.0")).unwrap();
        let err = set_netmask(&mut p, &mut cfg, &arg("255.255.0.0")).unwrap_err();
        assert!(matches!(err, PppoptError::InvalidNetmask { .. }));
        assert_eq!(cfg.netmask, 0xffff_ff00);

        // A wider (superset) mask is fine.
        set_netmask(&mut p, &mut cfg, &arg("255.255.255.128")).unwrap();
        assert_eq!(cfg.netmask, 0xffff_ff80);
    }

    #[test]
    fn netmask_rejects_trailing_junk() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();
        assert!(set_netmask(&mut p, &mut cfg, &arg("255.255.255.0junk")).is_err());
        assert!(set_netmask(&mut p, &mut cfg, &arg("255.255.255.0.0")).is_err());
    }

    #[test]
    fn domain_requires_privilege_and_appends() {
        let reg = Registry::empty();
        let mut cfg = Config::new();
        cfg.hostname = "node".to_owned();

        let mut p = parser(&reg, false);
        let err = set_domain(&mut p, &mut cfg, &arg("example.org")).unwrap_err();
        assert!(matches!(err, PppoptError::PrivilegeRequired { .. }));
        assert_eq!(cfg.hostname, "node");

        let mut p = parser(&reg, true);
        set_domain(&mut p, &mut cfg, &arg("example.org")).unwrap();
        assert_eq!(cfg.hostname, "node.example.org");

        // A leading dot is not doubled.
        cfg.hostname = "node".to_owned();
        set_domain(&mut p, &mut cfg, &arg(".example.org")).unwrap();
        assert_eq!(cfg.hostname, "node.example.org");
    }

    #[test]
    fn escape_sets_bits_and_rejects_reserved() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();

        set_escape(&mut p, &mut cfg, &arg("11,13")).unwrap();
        assert_ne!(cfg.xmit_escape[0] & (1 << 0x11), 0);
        assert_ne!(cfg.xmit_escape[0] & (1 << 0x13), 0);

        let err = set_escape(&mut p, &mut cfg, &arg("20")).unwrap_err();
        assert!(matches!(err, PppoptError::CannotEscape { code: 0x20 }));
        let err = set_escape(&mut p, &mut cfg, &arg("5e")).unwrap_err();
        assert!(matches!(err, PppoptError::CannotEscape { code: 0x5e }));
    }

    #[test]
    fn xonxoff_merges_asyncmap() {
        let reg = Registry::empty();
        let mut p = parser(&reg, false);
        let mut cfg = Config::new();
        set_xonxoff(&mut p, &mut cfg, &[]).unwrap();
        assert_eq!(cfg.lcp_want.asyncmap, 0x000a_0000);
        assert!(cfg.lcp_want.neg_asyncmap);
        assert_eq!(cfg.flow_control, -2);
    }

    #[test]
    fn version_and_help_exit_only_during_startup() {
        let reg = Registry::empty();
        let mut cfg = Config::new();

        let mut p = parser(&reg, false);
        let err = show_version(&mut p, &mut cfg, &[]).unwrap_err();
        assert!(matches!(err, PppoptError::Exit { code: 0 }));

        p.diagnostics().set_phase(Phase::Running);
        assert!(show_version(&mut p, &mut cfg, &[]).is_ok());
        assert!(show_help(&mut p, &mut cfg, &[]).is_ok());
    }
}
