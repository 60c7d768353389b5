//! Table-driven configuration-directive engine.
//!
//! The engine tokenizes command-line arguments and option files into
//! words, matches words against an ordered registry of named directives,
//! converts and validates each directive's arguments against a typed
//! descriptor, and writes results into a caller-owned [`Config`] while
//! recording who (what privilege level, from what source) set each value.
//!
//! ```no_run
//! use pppopt::{Parser, Registry};
//! use pppopt_types::Config;
//!
//! let registry = Registry::standard();
//! let mut parser = Parser::new(&registry, false);
//! let mut cfg = Config::new();
//! let args: Vec<String> = std::env::args().skip(1).collect();
//! parser.parse(&mut cfg, &args)?;
//! # Ok::<(), pppopt_error::PppoptError>(())
//! ```
//!
//! Negotiation subsystems contribute their own descriptor tables through
//! [`Registry::register`]; they are consulted after the built-in tables,
//! so a subsystem cannot shadow a built-in name. Configuration values are
//! read back only after the parse phase completes.

pub mod descriptor;
pub mod diag;
pub mod lexer;
pub mod num;
pub mod paths;
pub mod privilege;
pub mod registry;
pub mod resolve;
pub mod tables;

mod dispatch;
mod setters;
mod source;

pub use descriptor::{Companion, Descriptor, Kind, SpecialHandler, StrTarget};
pub use diag::Diagnostics;
pub use lexer::{Word, WordLexer};
pub use paths::Paths;
pub use registry::Registry;
pub use resolve::{HostResolver, SystemResolver};
pub use source::Parser;

pub use pppopt_error::{ErrorClass, PppoptError, Result};
pub use pppopt_types::{Config, ParseContext, Phase, Provenance};
