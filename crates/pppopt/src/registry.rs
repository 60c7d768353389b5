//! Directive registry.
//!
//! An explicit ordered list of descriptor tables. Lookup strategy:
//! 1. Scan tables in order: built-in general table, authentication table,
//!    then subsystem tables in registration order.
//! 2. Within a table, first exact (case-sensitive) name match wins.
//! 3. `None` if no table defines the name (the source chain then offers
//!    the word to the domain leaf setters).
//!
//! Table order is a correctness contract: a later-registered subsystem
//! cannot shadow a built-in name.

use tracing::debug;

use crate::descriptor::Descriptor;
use crate::tables;

/// Ordered collection of directive tables.
pub struct Registry {
    tables: Vec<&'static [Descriptor]>,
}

impl Registry {
    /// Registry holding only the built-in general and authentication
    /// tables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: vec![tables::GENERAL_OPTIONS, tables::AUTH_OPTIONS],
        }
    }

    /// Registry with the built-in tables plus the shipped link and IP
    /// negotiation tables.
    #[must_use]
    pub fn standard() -> Self {
        let mut reg = Self::new();
        reg.register(tables::LINK_OPTIONS);
        reg.register(tables::IP_OPTIONS);
        reg
    }

    /// Empty registry, for tests that supply their own tables.
    #[must_use]
    pub fn empty() -> Self {
        Self { tables: Vec::new() }
    }

    /// Append a subsystem table at the lowest precedence. Registering the
    /// same table twice is ignored.
    pub fn register(&mut self, table: &'static [Descriptor]) {
        if self.tables.iter().any(|t| std::ptr::eq(*t, table)) {
            debug!("descriptor table registered twice; ignoring");
            return;
        }
        self.tables.push(table);
    }

    /// Find the descriptor for `name`, earliest registered table first.
    pub fn find(&self, name: &str) -> Option<&'static Descriptor> {
        self.tables
            .iter()
            .flat_map(|table| table.iter())
            .find(|desc| desc.name == name)
    }

    /// Iterate all registered descriptors in precedence order, for the
    /// help listing.
    pub fn iter(&self) -> impl Iterator<Item = &'static Descriptor> + '_ {
        self.tables.iter().flat_map(|table| table.iter())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
