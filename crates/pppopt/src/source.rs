//! The source chain: command line, standard files, nested inclusion.
//!
//! A [`Parser`] is one parse session: it borrows the directive registry,
//! owns the resolver and diagnostics, and threads the ambient
//! [`ParseContext`] through every source. Each nested file parse pushes a
//! context frame and bumps the inclusion depth; both are restored
//! unconditionally on the way out, so privilege and labels balance across
//! arbitrary recursion.

use std::env;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use pppopt_error::{PppoptError, Result};
use pppopt_types::limits::MAX_INCLUDE_DEPTH;
use pppopt_types::{Config, ParseContext};

use crate::diag::Diagnostics;
use crate::dispatch;
use crate::lexer::{Word, WordLexer};
use crate::paths::Paths;
use crate::privilege::DroppedPrivileges;
use crate::registry::Registry;
use crate::resolve::{HostResolver, SystemResolver};
use crate::setters;

const USAGE_BODY: &str = "\
Usage: <program> [ options ], where options are:
\t<device>\tCommunicate over the named device
\t<speed>\t\tSet the baud rate to <speed>
\t<loc>:<rem>\tSet the local and/or remote interface IP
\t\t\taddresses.  Either one may be omitted.
\tasyncmap <n>\tSet the desired async map to hex <n>
\tauth\t\tRequire authentication from peer
\tconnect <p>\tInvoke shell command <p> to set up the serial line
\tcrtscts\t\tUse hardware RTS/CTS flow control
\tdefaultroute\tAdd default route through interface
\tfile <f>\tTake options from file <f>
\tmodem\t\tUse modem control lines
\tmru <n>\t\tSet MRU value to <n> for negotiation
";

/// One parse session over a registry.
pub struct Parser<'r> {
    registry: &'r Registry,
    resolver: Box<dyn HostResolver>,
    paths: Paths,
    diag: Diagnostics,
    ctx: ParseContext,
    /// Whether the process itself is privileged (run by or setuid root).
    privileged: bool,
    depth: usize,
}

impl<'r> Parser<'r> {
    /// Create a session. `privileged` states whether the process runs
    /// with elevated rights; the command line and user files inherit it.
    #[must_use]
    pub fn new(registry: &'r Registry, privileged: bool) -> Self {
        Self {
            registry,
            resolver: Box::new(SystemResolver),
            paths: Paths::default(),
            diag: Diagnostics::default(),
            ctx: ParseContext::command_line(privileged),
            privileged,
            depth: 0,
        }
    }

    /// Replace the hostname resolver (tests resolve from fixtures).
    pub fn set_resolver(&mut self, resolver: Box<dyn HostResolver>) {
        self.resolver = resolver;
    }

    /// Replace the standard file locations.
    pub fn set_paths(&mut self, paths: Paths) {
        self.paths = paths;
    }

    /// Access the diagnostics sink, e.g. to advance the lifecycle phase.
    pub fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut self.diag
    }

    /// The ambient context of the source currently being parsed.
    #[inline]
    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    pub(crate) fn resolver(&self) -> &dyn HostResolver {
        self.resolver.as_ref()
    }

    pub(crate) fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Report an error through the diagnostics choke point and hand it
    /// back for propagation. Every error is reported exactly once, at the
    /// point of origin, labeled with the innermost source.
    pub(crate) fn fail(&self, err: PppoptError) -> PppoptError {
        if !err.is_exit() {
            self.diag.error(&self.ctx.source, &err.to_string());
        }
        err
    }

    /// Write the usage listing.
    pub(crate) fn usage(&self) {
        self.diag.banner(&format!(
            "pppopt version {}\n{}",
            env!("CARGO_PKG_VERSION"),
            USAGE_BODY
        ));
    }

    /// Run the full consultation order: the command-line vector, then the
    /// system options file, the per-device file (skipped for the
    /// unqualified default device), and the user's home file.
    pub fn parse(&mut self, cfg: &mut Config, args: &[String]) -> Result<()> {
        self.parse_args(cfg, args)?;
        let sys = self.paths.sys_options.clone();
        // The system file must exist for unprivileged invocations so the
        // administrator's defaults cannot be bypassed.
        self.options_from_file(cfg, &sys, !self.privileged, false, true)?;
        self.options_for_tty(cfg)?;
        self.options_from_user(cfg)
    }

    /// Parse the command-line word vector.
    pub fn parse_args(&mut self, cfg: &mut Config, args: &[String]) -> Result<()> {
        self.ctx = ParseContext::command_line(self.privileged);
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            i += 1;

            if let Some(desc) = self.registry.find(arg) {
                let arity = desc.arity();
                if args.len() - i < arity {
                    return Err(self.fail(PppoptError::too_few(arg)));
                }
                self.ctx.current_directive = Some(arg.clone());
                let outcome = dispatch::process_option(self, cfg, desc, &args[i..i + arity]);
                self.ctx.current_directive = None;
                outcome?;
                i += arity;
                continue;
            }

            if let Err(err) = self.fallback(cfg, arg) {
                if matches!(err, PppoptError::UnrecognizedOption { .. }) {
                    self.usage();
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Pre-scan the command-line vector for a device name, so the
    /// per-device file can be consulted before the real parse. Skips
    /// every known directive and applies nothing else.
    pub fn scan_args(&mut self, cfg: &mut Config, args: &[String]) {
        self.ctx = ParseContext::command_line(self.privileged);
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            i += 1;
            if let Some(desc) = self.registry.find(arg) {
                i += desc.arity();
                continue;
            }
            // Quiet recognition: never reports, never fails.
            let _ = setters::set_device(self, cfg, arg, true);
        }
    }

    /// Read and apply directives from one file.
    ///
    /// A missing file is an error only when `must_exist` is set.
    /// `check_prot` drops to the real uid around the open attempt.
    /// `privileged` is the privilege level directives in the file run at.
    pub fn options_from_file(
        &mut self,
        cfg: &mut Config,
        path: &Path,
        must_exist: bool,
        check_prot: bool,
        privileged: bool,
    ) -> Result<()> {
        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(self.fail(PppoptError::IncludeTooDeep {
                path: path.to_owned(),
            }));
        }

        let opened = {
            let _guard = check_prot.then(DroppedPrivileges::drop_to_real);
            File::open(path)
        };
        let file = match opened {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound && !must_exist => return Ok(()),
            Err(e) => {
                return Err(self.fail(PppoptError::CannotOpen {
                    path: path.to_owned(),
                    source: e,
                }));
            }
        };

        let frame = self.ctx.push(privileged, path.display().to_string());
        self.depth += 1;
        let mut lexer = WordLexer::new(BufReader::new(file));
        let result = self.parse_stream(cfg, &mut lexer, path);
        self.depth -= 1;
        self.ctx.pop(frame);
        result
    }

    /// Consult the per-user options file in the invoking user's home
    /// directory, if there is one.
    pub fn options_from_user(&mut self, cfg: &mut Config) -> Result<()> {
        let Some(home) = env::var_os("HOME") else {
            return Ok(());
        };
        if home.is_empty() {
            return Ok(());
        }
        let path = Path::new(&home).join(&self.paths.user_options);
        self.options_from_file(cfg, &path, false, true, self.privileged)
    }

    /// Consult the options file for the configured device, unless the
    /// device is the unqualified default. Path separators in the device
    /// name become dots.
    pub fn options_for_tty(&mut self, cfg: &mut Config) -> Result<()> {
        let dev = cfg.devnam.strip_prefix("/dev/").unwrap_or(&cfg.devnam);
        if dev == "tty" {
            return Ok(());
        }
        let suffix: String = dev
            .chars()
            .map(|c| if c == '/' { '.' } else { c })
            .collect();
        let path = PathBuf::from(format!("{}{}", self.paths.per_device_prefix, suffix));
        self.options_from_file(cfg, &path, false, false, true)
    }

    fn parse_stream(
        &mut self,
        cfg: &mut Config,
        lexer: &mut WordLexer<BufReader<File>>,
        path: &Path,
    ) -> Result<()> {
        loop {
            let Some(word) = self.next_word_checked(lexer, path)? else {
                return Ok(());
            };
            let cmd = word.text;

            if let Some(desc) = self.registry.find(&cmd) {
                let arity = desc.arity();
                let mut argv = Vec::with_capacity(arity);
                for _ in 0..arity {
                    match self.next_word_checked(lexer, path)? {
                        Some(w) => argv.push(w.text),
                        None => return Err(self.fail(PppoptError::too_few(&cmd))),
                    }
                }
                self.ctx.current_directive = Some(cmd.clone());
                let outcome = dispatch::process_option(self, cfg, desc, &argv);
                self.ctx.current_directive = None;
                outcome?;
                continue;
            }

            self.fallback(cfg, &cmd)?;
        }
    }

    /// Pull one word, warning about truncation and promoting read errors
    /// to fatal.
    fn next_word_checked(
        &mut self,
        lexer: &mut WordLexer<BufReader<File>>,
        path: &Path,
    ) -> Result<Option<Word>> {
        match lexer.next_word() {
            Ok(Some(word)) => {
                if word.truncated {
                    let prefix: String = word.text.chars().take(20).collect();
                    self.diag
                        .warn(&self.ctx.source, &format!("warning: word too long ({prefix}...)"));
                }
                Ok(Some(word))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(self.fail(PppoptError::ReadError {
                path: path.to_owned(),
                source: e,
            })),
        }
    }

    /// Offer an unmatched word to the leaf setters in fixed order.
    fn fallback(&mut self, cfg: &mut Config, word: &str) -> Result<()> {
        if setters::set_device(self, cfg, word, false)? {
            return Ok(());
        }
        if setters::set_speed(cfg, word) {
            return Ok(());
        }
        if setters::set_ip_pair(self, cfg, word)? {
            return Ok(());
        }
        Err(self.fail(PppoptError::unrecognized(word)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn parse_args_applies_directives() {
        let reg = Registry::standard();
        let mut parser = Parser::new(&reg, false);
        let mut cfg = Config::new();

        parser
            .parse_args(&mut cfg, &words(&["lock", "kdebug", "3", "nodetach"]))
            .unwrap();
        assert!(cfg.lockflag);
        assert_eq!(cfg.kdebug, 3);
        assert!(cfg.nodetach);
    }

    #[test]
    fn parse_args_too_few_parameters() {
        let reg = Registry::standard();
        let mut parser = Parser::new(&reg, false);
        let mut cfg = Config::new();

        let err = parser
            .parse_args(&mut cfg, &words(&["kdebug"]))
            .unwrap_err();
        assert!(matches!(err, PppoptError::TooFewParameters { .. }));
    }

    #[test]
    fn parse_args_falls_back_to_speed_and_address() {
        let reg = Registry::standard();
        let mut parser = Parser::new(&reg, false);
        let mut cfg = Config::new();

        parser
            .parse_args(&mut cfg, &words(&["115200", "10.0.0.1:10.0.0.2"]))
            .unwrap();
        assert_eq!(cfg.speed, 115200);
        assert!(cfg.ipcp_want.ouraddr.is_some());
        assert!(cfg.ipcp_want.hisaddr.is_some());
    }

    #[test]
    fn parse_args_rejects_unknown_words() {
        let reg = Registry::standard();
        let mut parser = Parser::new(&reg, false);
        let mut cfg = Config::new();

        let err = parser
            .parse_args(&mut cfg, &words(&["definitely-not-an-option"]))
            .unwrap_err();
        assert!(matches!(err, PppoptError::UnrecognizedOption { .. }));
    }

    #[test]
    fn earlier_directives_stay_applied_after_a_rejection() {
        let reg = Registry::standard();
        let mut parser = Parser::new(&reg, false);
        let mut cfg = Config::new();

        let err = parser
            .parse_args(&mut cfg, &words(&["lock", "bogus-word", "nodetach"]))
            .unwrap_err();
        assert!(matches!(err, PppoptError::UnrecognizedOption { .. }));
        assert!(cfg.lockflag);
        assert!(!cfg.nodetach);
    }

    #[test]
    fn scan_args_finds_device_and_applies_nothing() {
        let reg = Registry::standard();
        let mut parser = Parser::new(&reg, false);
        let mut cfg = Config::new();

        parser.scan_args(&mut cfg, &words(&["lock", "kdebug", "3", "null"]));
        assert_eq!(cfg.devnam, "/dev/null");
        assert!(!cfg.default_device);
        // Directives were skipped, not applied.
        assert!(!cfg.lockflag);
        assert_eq!(cfg.kdebug, 0);
    }

    #[test]
    fn options_for_tty_skips_default_device() {
        let reg = Registry::standard();
        let mut parser = Parser::new(&reg, false);
        let mut cfg = Config::new();
        // devnam is "/dev/tty": no per-device file is consulted, so this
        // must succeed even though no such file exists.
        parser.options_for_tty(&mut cfg).unwrap();
    }
}
