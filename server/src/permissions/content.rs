//! Content permissions using bitflags.
//!
//! Bit positions are part of the token contract: every issued token carries
//! the OR of these bits, so a bit is never reassigned and new permissions are
//! appended after `MANAGE_ROLES`.

use bitflags::bitflags;

bitflags! {
    /// Content permissions represented as a 64-bit bitfield.
    ///
    /// Carried as the integer `permissions` claim of an access token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct ContentPermissions: u64 {
        /// Create and update catalog records, upload pictures
        const ADD_CONTENT    = 1 << 0;
        /// Mark catalog records as verified
        const VERIFY_CONTENT = 1 << 1;
        /// Delete catalog records
        const DELETE_CONTENT = 1 << 2;
        /// Compute permission grants for other users
        const MANAGE_ROLES   = 1 << 3;
    }
}

impl ContentPermissions {
    // === Preset Combinations ===

    /// Permissions for a regular contributor.
    pub const EDITOR_DEFAULT: Self = Self::ADD_CONTENT;

    /// Permissions for a catalog moderator.
    pub const MODERATOR_DEFAULT: Self = Self::ADD_CONTENT
        .union(Self::VERIFY_CONTENT)
        .union(Self::DELETE_CONTENT);

    // === Claim Conversion ===

    /// Create permissions from a token claim value.
    ///
    /// Unknown bits are dropped so older binaries accept tokens minted with
    /// permissions they do not know about.
    #[must_use]
    pub const fn from_claim(value: i64) -> Self {
        Self::from_bits_truncate(value as u64)
    }

    /// Convert permissions to a token claim value.
    #[must_use]
    pub const fn to_claim(self) -> i64 {
        self.bits() as i64
    }

    // === Permission Checking ===

    /// Check if this permission set includes the specified permission(s).
    ///
    /// # Examples
    ///
    /// ```
    /// use railcat_server::permissions::ContentPermissions;
    ///
    /// let perms = ContentPermissions::ADD_CONTENT | ContentPermissions::VERIFY_CONTENT;
    /// assert!(perms.has(ContentPermissions::ADD_CONTENT));
    /// assert!(!perms.has(ContentPermissions::DELETE_CONTENT));
    /// ```
    #[must_use]
    pub const fn has(self, permission: Self) -> bool {
        self.contains(permission)
    }

    /// Registry name of a single flag, `None` for empty or combined sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use railcat_server::permissions::ContentPermissions;
    ///
    /// assert_eq!(ContentPermissions::MANAGE_ROLES.name(), Some("MANAGE_ROLES"));
    /// assert_eq!(ContentPermissions::MODERATOR_DEFAULT.name(), None);
    /// ```
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        Self::all()
            .iter_names()
            .find(|(_, flag)| *flag == self)
            .map(|(name, _)| name)
    }
}

impl Default for ContentPermissions {
    fn default() -> Self {
        Self::empty()
    }
}
