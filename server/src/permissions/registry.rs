//! Permission registry.
//!
//! An ordered, immutable mapping from permission name to bit value. The
//! entry at index `i` owns bit `1 << i`. Bit 63 is never handed out so that
//! every encoded set fits a non-negative `i64` claim.

use super::content::ContentPermissions;
use super::error::{PermissionError, PermissionResult};

/// Highest number of permissions a registry can hold.
pub const MAX_PERMISSIONS: usize = 63;

/// A registered permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionEntry {
    name: String,
    bit: u64,
}

impl PermissionEntry {
    /// Permission name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bit value (a power of two).
    #[must_use]
    pub const fn bit(&self) -> u64 {
        self.bit
    }
}

/// Ordered name to bit mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRegistry {
    entries: Vec<PermissionEntry>,
}

impl PermissionRegistry {
    /// Build a registry, assigning bits in iteration order starting at `1`.
    pub fn new<I, S>(names: I) -> PermissionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self {
            entries: Vec::new(),
        };
        for name in names {
            registry.push(name.into())?;
        }
        Ok(registry)
    }

    /// The built-in content permissions, in flag declaration order.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = ContentPermissions::all()
            .iter_names()
            .map(|(name, flag)| PermissionEntry {
                name: name.to_string(),
                bit: flag.bits(),
            })
            .collect();
        Self { entries }
    }

    /// Return a copy of this registry with `name` appended at the next bit.
    pub fn appended(&self, name: impl Into<String>) -> PermissionResult<Self> {
        let mut next = self.clone();
        next.push(name.into())?;
        Ok(next)
    }

    fn push(&mut self, name: String) -> PermissionResult<()> {
        if name.is_empty() {
            return Err(PermissionError::InvalidInput(
                "permission name must not be empty".to_string(),
            ));
        }
        if self.bit_of(&name).is_some() {
            return Err(PermissionError::DuplicatePermission(name));
        }
        if self.entries.len() >= MAX_PERMISSIONS {
            return Err(PermissionError::RegistryFull {
                max: MAX_PERMISSIONS,
            });
        }
        let bit = 1_u64 << self.entries.len();
        self.entries.push(PermissionEntry { name, bit });
        Ok(())
    }

    /// Bit value registered for `name`.
    #[must_use]
    pub fn bit_of(&self, name: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.bit)
    }

    /// Name registered for a single `bit`.
    #[must_use]
    pub fn name_of(&self, bit: u64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.bit == bit)
            .map(|e| e.name.as_str())
    }

    /// Entries in ascending bit order.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionEntry> {
        self.entries.iter()
    }

    /// Number of registered permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of all registered bits.
    #[must_use]
    pub fn all_bits(&self) -> u64 {
        self.entries.iter().fold(0, |acc, e| acc | e.bit)
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
