//! Symbol names with an explicit "never named" state.
//!
//! Bitcode assigns names to values late (through the value symbol table)
//! or not at all, so every nameable entity starts out [`Name::Unknown`].
//! The entry block is *named* to the empty string, which is distinct from
//! never having been named — `Unknown` is a sentinel, not an empty name.

use std::fmt;

/// Name of a symbol, block, or function.
///
/// Anonymous entities keep `Unknown` until function exit, where they
/// receive decimal names from a per-function counter.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Name {
    /// No name has been assigned yet.
    #[default]
    Unknown,
    /// An explicitly assigned name. May be empty (the entry block).
    Named(String),
}

impl Name {
    /// Create an explicit name.
    pub fn named(name: impl Into<String>) -> Self {
        Name::Named(name.into())
    }

    /// Whether no name has been assigned yet.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Name::Unknown)
    }

    /// The assigned name, or `None` while still unknown.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Name::Unknown => None,
            Name::Named(name) => Some(name),
        }
    }

    /// Assign a name, replacing whatever was there.
    pub(crate) fn set(&mut self, name: impl Into<String>) {
        *self = Name::Named(name.into());
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Unknown => f.write_str("<unknown>"),
            Name::Named(name) => f.write_str(name),
        }
    }
}
