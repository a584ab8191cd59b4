//! Check registry
//!
//! Holds every known check keyed by name, in registration order, together
//! with the groups they belong to and the flags those groups declare.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use super::ordering::stable_topological_order;
use crate::core::models::{FlagSet, parse_activation};
use crate::core::ports::{Check, Group};
use crate::error::ReviewError;

/// Name-keyed collection of checks, groups and flags
#[derive(Debug, Default)]
pub struct CheckRegistry {
    groups: Vec<Group>,
    checks: Vec<Box<dyn Check>>,
    index: HashMap<String, usize>,
    flags: FlagSet,
}

impl CheckRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group and its flags
    ///
    /// Registering a group name twice keeps the first applicability test and
    /// adds the new flags.
    pub fn add_group(&mut self, group: Group) -> Result<(), ReviewError> {
        for flag in &group.flags {
            if !self.flags.insert(flag.clone()) {
                return Err(ReviewError::DuplicateFlag(flag.name.clone()));
            }
        }

        if let Some(existing) = self.groups.iter_mut().find(|g| g.name == group.name) {
            existing.flags.extend(group.flags);
        } else {
            debug!("Registered check group {}", group.name);
            self.groups.push(group);
        }
        Ok(())
    }

    /// Look up a group
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Groups in registration order
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Register a check
    ///
    /// A check naming a group that was never registered gets an
    /// always-applicable group of that name.
    pub fn register(&mut self, check: Box<dyn Check>) -> Result<(), ReviewError> {
        let info = check.info();
        if self.index.contains_key(&info.name) {
            return Err(ReviewError::DuplicateCheck(info.name.clone()));
        }

        if self.group(&info.group).is_none() {
            warn!("Check {} uses unregistered group {}; treating it as always applicable", info.name, info.group);
            self.groups.push(Group::new(info.group.clone()));
        }

        self.index.insert(info.name.clone(), self.checks.len());
        self.checks.push(check);
        Ok(())
    }

    /// Register several checks in order
    pub fn register_all<I>(&mut self, checks: I) -> Result<(), ReviewError>
    where
        I: IntoIterator<Item = Box<dyn Check>>,
    {
        for check in checks {
            self.register(check)?;
        }
        Ok(())
    }

    /// Look up a check by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Check> {
        self.index.get(name).map(|&i| self.checks[i].as_ref())
    }

    /// Registration index of a check
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether a check is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Checks in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Check> {
        self.checks.iter().map(AsRef::as_ref)
    }

    /// Check names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|c| c.info().name.as_str())
    }

    /// Number of registered checks
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no check is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Declared flags
    #[must_use]
    pub const fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Activate a flag from a `NAME` or `NAME=value` argument
    pub fn set_flag(&mut self, arg: &str) -> Result<(), ReviewError> {
        let (name, value) = parse_activation(arg);
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| ReviewError::UnknownFlag(name.to_string()))?;
        flag.activate(value);
        debug!("Flag {} set to {}", flag.name, flag.value());
        Ok(())
    }

    /// The first registered check that deprecates `name`
    #[must_use]
    pub fn deprecated_by(&self, name: &str) -> Option<&str> {
        self.checks
            .iter()
            .map(|c| c.info())
            .find(|info| info.deprecates.iter().any(|d| d == name))
            .map(|info| info.name.as_str())
    }

    /// Verify that every dependency exists and the needs graph is acyclic
    pub fn validate(&self) -> Result<(), ReviewError> {
        let mut nodes = BTreeMap::new();
        for (idx, check) in self.checks.iter().enumerate() {
            let info = check.info();
            let mut deps = Vec::with_capacity(info.needs.len());
            for need in &info.needs {
                let dep = self.index_of(need).ok_or_else(|| ReviewError::UnknownDependency {
                    check: info.name.clone(),
                    needs: need.clone(),
                })?;
                deps.push(dep);
            }
            nodes.insert(idx, deps);
        }

        stable_topological_order(&nodes).map(|_| ()).map_err(|cycle| {
            ReviewError::DependencyCycle(
                cycle.into_iter().map(|i| self.checks[i].info().name.clone()).collect(),
            )
        })
    }
}
