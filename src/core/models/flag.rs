//! Review flags
//!
//! Flags are user-settable switches (e.g. `EPEL7`) registered by check
//! groups. Checks query them to vary their behavior.

use std::collections::BTreeMap;

use serde::Serialize;

/// A single flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    /// Flag name, conventionally upper-case
    pub name: String,
    /// One-line description shown by `--display-flags`
    pub doc: String,
    /// Value used when the flag is activated without an explicit value
    pub default: String,
    /// Value supplied by the user, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Flag {
    /// Create an unset flag
    pub fn new(name: impl Into<String>, doc: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            default: default.into(),
            value: None,
        }
    }

    /// Whether the user activated the flag
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Effective value: the user's value, or the default
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.default)
    }

    /// Activate the flag; `None` activates it with its default value
    pub fn activate(&mut self, value: Option<&str>) {
        self.value = Some(value.map_or_else(|| self.default.clone(), str::to_string));
    }
}

/// Name-keyed flag collection
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlagSet {
    flags: BTreeMap<String, Flag>,
}

impl FlagSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag; returns false if the name is already taken
    pub fn insert(&mut self, flag: Flag) -> bool {
        if self.flags.contains_key(&flag.name) {
            return false;
        }
        self.flags.insert(flag.name.clone(), flag);
        true
    }

    /// Look up a flag
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// Look up a flag for modification
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Flag> {
        self.flags.get_mut(name)
    }

    /// Whether the named flag exists and was activated
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(Flag::is_set)
    }

    /// Effective value of a flag, if it exists
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(Flag::value)
    }

    /// Iterate flags sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Iterate only the activated flags
    pub fn active(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values().filter(|f| f.is_set())
    }

    /// Number of flags
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Split a `NAME` or `NAME=value` activation argument
#[must_use]
pub fn parse_activation(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (arg.trim(), None),
    }
}
