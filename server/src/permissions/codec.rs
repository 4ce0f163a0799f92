//! Permission codec.
//!
//! Converts between permission names and the integer mask carried in
//! access tokens. Decoding checks each registered bit directly; set bits
//! with no registered permission are ignored.

use super::error::{PermissionError, PermissionResult};
use super::registry::PermissionRegistry;

/// Encodes and decodes permission masks against one registry.
#[derive(Debug, Clone, Default)]
pub struct PermissionCodec {
    registry: PermissionRegistry,
}

impl PermissionCodec {
    /// Create a codec over `registry`.
    #[must_use]
    pub const fn new(registry: PermissionRegistry) -> Self {
        Self { registry }
    }

    /// The registry this codec reads.
    #[must_use]
    pub const fn registry(&self) -> &PermissionRegistry {
        &self.registry
    }

    /// Decode a mask into permission names, in ascending bit order.
    ///
    /// `None` (claim absent) and negative values are rejected. `0` is the
    /// valid empty set.
    ///
    /// # Examples
    ///
    /// ```
    /// use railcat_server::permissions::PermissionCodec;
    ///
    /// let codec = PermissionCodec::default();
    /// assert_eq!(codec.decode(Some(5)).unwrap(), ["ADD_CONTENT", "DELETE_CONTENT"]);
    /// assert!(codec.decode(Some(0)).unwrap().is_empty());
    /// assert!(codec.decode(None).is_err());
    /// ```
    pub fn decode(&self, encoded: Option<i64>) -> PermissionResult<Vec<&str>> {
        let mask = Self::mask(encoded)?;
        Ok(self
            .registry
            .iter()
            .filter(|entry| mask & entry.bit() != 0)
            .map(|entry| entry.name())
            .collect())
    }

    /// Encode permission names into a mask.
    ///
    /// # Examples
    ///
    /// ```
    /// use railcat_server::permissions::PermissionCodec;
    ///
    /// let codec = PermissionCodec::default();
    /// assert_eq!(codec.encode(["VERIFY_CONTENT", "MANAGE_ROLES"]).unwrap(), 10);
    /// ```
    pub fn encode<I, S>(&self, names: I) -> PermissionResult<i64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mask = 0_u64;
        for name in names {
            let name = name.as_ref();
            mask |= self
                .registry
                .bit_of(name)
                .ok_or_else(|| PermissionError::UnknownPermission(name.to_string()))?;
        }
        Ok(mask as i64)
    }

    /// Check whether `encoded` grants `name`.
    ///
    /// Fails for a malformed mask and for a name outside the registry.
    pub fn has(&self, encoded: Option<i64>, name: &str) -> PermissionResult<bool> {
        let mask = Self::mask(encoded)?;
        let bit = self
            .registry
            .bit_of(name)
            .ok_or_else(|| PermissionError::UnknownPermission(name.to_string()))?;
        Ok(mask & bit != 0)
    }

    /// Set bits of a mask that no registered permission owns.
    ///
    /// `decode` skips these; callers use this to report them.
    pub fn unregistered_bits(&self, encoded: Option<i64>) -> PermissionResult<Vec<u64>> {
        let mask = Self::mask(encoded)?;
        Ok((0..u64::BITS)
            .map(|i| 1_u64 << i)
            .filter(|bit| mask & bit != 0 && self.registry.name_of(*bit).is_none())
            .collect())
    }

    fn mask(encoded: Option<i64>) -> PermissionResult<u64> {
        match encoded {
            None => Err(PermissionError::InvalidInput(
                "permissions claim is missing".to_string(),
            )),
            Some(value) if value < 0 => Err(PermissionError::InvalidInput(format!(
                "permissions claim must be non-negative, got {value}"
            ))),
            Some(value) => Ok(value as u64),
        }
    }
}
