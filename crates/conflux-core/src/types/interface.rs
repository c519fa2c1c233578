//! Interface (capability set) types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named, open set of capabilities.
///
/// Any record declaring every capability of the interface satisfies it.
/// An interface without capabilities is satisfied by every type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceType {
    /// Interface name.
    name: String,
    /// Capabilities a type must declare to satisfy the interface.
    #[serde(default)]
    capabilities: BTreeSet<String>,
}

impl InterfaceType {
    /// Creates a new interface without capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: BTreeSet::new(),
        }
    }

    /// Adds a required capability.
    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    /// Returns the interface name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the required capabilities.
    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    /// Returns whether the given capability set covers this interface.
    pub fn is_satisfied_by(&self, capabilities: &BTreeSet<String>) -> bool {
        self.capabilities.is_subset(capabilities)
    }
}
