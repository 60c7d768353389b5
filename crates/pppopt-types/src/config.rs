//! The configuration blob: every directive's storage target.
//!
//! One `Config` value is owned by the caller and passed `&mut` through the
//! whole parse phase; afterwards it is read-only for the life of the
//! process. There is deliberately no global state here.

use std::net::Ipv4Addr;

use crate::limits::{DEFAULT_HOLDOFF, DEFAULT_MRU, MAX_MRU, MAX_VJ_SLOTS};
use crate::provenance::Provenance;

/// Link-level negotiation options (one set for what we want, one for what
/// we will allow the peer to request).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinkOptions {
    /// Negotiate the maximum receive unit.
    pub neg_mru: bool,
    /// Maximum receive unit value.
    pub mru: i32,
    /// Negotiate the async control-character map.
    pub neg_asyncmap: bool,
    /// Async control-character map.
    pub asyncmap: u32,
    /// Negotiate PAP authentication.
    pub neg_upap: bool,
    /// Negotiate CHAP authentication.
    pub neg_chap: bool,
    /// Don't die if the peer never answers; wait passively.
    pub passive: bool,
    /// Send no negotiation requests of our own.
    pub silent: bool,
}

impl LinkOptions {
    /// The set of options we request by default.
    pub fn default_want() -> Self {
        Self {
            neg_mru: true,
            mru: DEFAULT_MRU,
            neg_asyncmap: true,
            asyncmap: 0,
            neg_upap: false,
            neg_chap: false,
            passive: false,
            silent: false,
        }
    }

    /// The set of options we allow the peer to request by default.
    pub fn default_allow() -> Self {
        Self {
            neg_mru: true,
            mru: MAX_MRU,
            neg_asyncmap: true,
            asyncmap: 0,
            neg_upap: true,
            neg_chap: true,
            passive: false,
            silent: false,
        }
    }

    /// Zero every field: request/allow nothing.
    pub fn clear(&mut self) {
        *self = Self {
            neg_mru: false,
            mru: 0,
            neg_asyncmap: false,
            asyncmap: 0,
            neg_upap: false,
            neg_chap: false,
            passive: false,
            silent: false,
        };
    }
}

/// IP-level negotiation options.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IpOptions {
    /// Negotiate IP addresses.
    pub neg_addr: bool,
    /// Our address, once one has been configured.
    pub ouraddr: Option<Ipv4Addr>,
    /// The peer's address, once one has been configured.
    pub hisaddr: Option<Ipv4Addr>,
    /// Negotiate VJ header compression.
    pub neg_vj: bool,
    /// Maximum VJ slot index.
    pub vj_max_slots: i32,
    /// Add a default route through the interface.
    pub default_route: bool,
    /// Publish a proxy-ARP entry for the peer.
    pub proxy_arp: bool,
}

impl IpOptions {
    /// The set of options we request by default.
    pub fn default_want() -> Self {
        Self {
            neg_addr: true,
            ouraddr: None,
            hisaddr: None,
            neg_vj: true,
            vj_max_slots: MAX_VJ_SLOTS - 1,
            default_route: false,
            proxy_arp: false,
        }
    }

    /// The set of options we allow the peer to request by default.
    /// Route and proxy-ARP permission default on so an administrator can
    /// withdraw them from a privileged file.
    pub fn default_allow() -> Self {
        Self {
            default_route: true,
            proxy_arp: true,
            ..Self::default_want()
        }
    }

    /// Zero every field: request/allow nothing.
    pub fn clear(&mut self) {
        *self = Self {
            neg_addr: false,
            ouraddr: None,
            hisaddr: None,
            neg_vj: false,
            vj_max_slots: 0,
            default_route: false,
            proxy_arp: false,
        };
    }
}

/// The full configuration state mutated by the parse phase.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    // === General ===
    /// Debugging level; the `debug` directive increments it.
    pub debug: i32,
    /// Kernel-driver debugging level.
    pub kdebug: i32,
    /// True until a device has been named explicitly.
    pub default_device: bool,
    /// Serial device path.
    pub devnam: String,
    /// Flow-control mode: 0 unset, 1 RTS/CTS, 2 DTR/CTS, -1 off,
    /// -2 XON/XOFF.
    pub flow_control: i32,
    /// Use modem control lines.
    pub modem: bool,
    /// Requested line speed; 0 means unspecified.
    pub speed: i32,
    /// Interface netmask, host byte order; 0 means unspecified.
    pub netmask: u32,
    /// Create a UUCP-style lock file for the serial device.
    pub lockflag: bool,
    /// Don't detach from the controlling tty.
    pub nodetach: bool,
    /// Detach once the link is up.
    pub updetach: bool,
    /// Script to establish the physical link.
    pub connector: Option<String>,
    /// Script to disestablish the physical link.
    pub disconnector: Option<String>,
    /// Script to run after the physical link is established.
    pub welcomer: Option<String>,
    /// Maximum connect time in seconds; 0 means no limit.
    pub maxconnect: i32,
    /// Disconnect after this many idle seconds; 0 disables.
    pub idle_time_limit: i32,
    /// Seconds to pause before reconnecting.
    pub holdoff: i32,
    /// Reopen the link after it goes down.
    pub persist: bool,
    /// Dial on demand.
    pub demand: bool,
    /// Local hostname, as amended by the `domain` directive.
    pub hostname: String,
    /// Extended transmit-escape map: 256 bits, one per character code.
    pub xmit_escape: [u32; 8],
    /// Filter expression for packets to pass (compiled elsewhere).
    pub pass_filter: Option<String>,
    /// Filter expression for link-activity packets (compiled elsewhere).
    pub active_filter: Option<String>,

    // === Authentication ===
    /// Require the peer to authenticate.
    pub auth_required: bool,
    /// Accept any address from an unauthenticated peer.
    pub allow_any_ip: bool,
    /// Username for authenticating to the peer.
    pub user: String,
    /// Secret for authenticating to the peer.
    pub passwd: String,
    /// Our name for authentication purposes.
    pub our_name: String,
    /// The peer's name for authentication.
    pub remote_name: String,
    /// The remote name was set explicitly, not defaulted.
    pub explicit_remote: bool,
    /// Use the hostname as our authentication name.
    pub usehostname: bool,
    /// Verify PAP peers against the system login database.
    pub uselogin: bool,
    /// PAP secrets are stored encrypted.
    pub cryptpap: bool,

    // === Negotiation ===
    /// Link options we request.
    pub lcp_want: LinkOptions,
    /// Link options we allow.
    pub lcp_allow: LinkOptions,
    /// Whether IP negotiation is enabled at all.
    pub ip_enabled: bool,
    /// IP options we request.
    pub ipcp_want: IpOptions,
    /// IP options we allow.
    pub ipcp_allow: IpOptions,

    // === Provenance ===
    /// Who set the device name.
    pub devnam_info: Provenance,
    /// Who set the connect script.
    pub connector_info: Provenance,
    /// Who set the disconnect script.
    pub disconnector_info: Provenance,
    /// Who set the welcome script.
    pub welcomer_info: Provenance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: 0,
            kdebug: 0,
            default_device: true,
            devnam: "/dev/tty".to_owned(),
            flow_control: 0,
            modem: true,
            speed: 0,
            netmask: 0,
            lockflag: false,
            nodetach: false,
            updetach: false,
            connector: None,
            disconnector: None,
            welcomer: None,
            maxconnect: 0,
            idle_time_limit: 0,
            holdoff: DEFAULT_HOLDOFF,
            persist: false,
            demand: false,
            hostname: String::new(),
            xmit_escape: [0; 8],
            pass_filter: None,
            active_filter: None,
            auth_required: false,
            allow_any_ip: false,
            user: String::new(),
            passwd: String::new(),
            our_name: String::new(),
            remote_name: String::new(),
            explicit_remote: false,
            usehostname: false,
            uselogin: false,
            cryptpap: false,
            lcp_want: LinkOptions::default_want(),
            lcp_allow: LinkOptions::default_allow(),
            ip_enabled: true,
            ipcp_want: IpOptions::default_want(),
            ipcp_allow: IpOptions::default_allow(),
            devnam_info: Provenance::default(),
            connector_info: Provenance::default(),
            disconnector_info: Provenance::default(),
            welcomer_info: Provenance::default(),
        }
    }
}

impl Config {
    /// Fresh configuration with built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request/allow no negotiation options at all (the `-all` directive).
    pub fn clear_negotiation(&mut self) {
        self.lcp_want.clear();
        self.lcp_allow.clear();
        self.ipcp_want.clear();
        self.ipcp_allow.clear();
    }
}
