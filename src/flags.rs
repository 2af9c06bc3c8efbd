//! Versioning flags shared by discovery and creation.

use crate::error::VersionError;
use std::fmt;
use std::ops::BitOr;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VersioningFlags(u32);

impl VersioningFlags {
    /// Replace a trailing version component instead of appending.
    pub const REPLACE: Self = Self(1);
    pub const LOW: Self = Self(2);
    pub const HIGH: Self = Self(4);
    /// Look for the extreme version in the LOW/HIGH direction.
    pub const EST: Self = Self(8);
    pub const LOWEST: Self = Self(2 | 8);
    pub const HIGHEST: Self = Self(4 | 8);
    pub const NEXT: Self = Self(4 | 1);
    pub const PREV: Self = Self(2 | 1);
    /// Stamp with the current time.
    pub const NOW: Self = Self(16);

    const KNOWN: u32 = 31;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn from_bits(bits: u32) -> Result<Self, VersionError> {
        if bits & !Self::KNOWN != 0 {
            return Err(VersionError::InvalidArgument(format!(
                "unknown versioning flags {:#x}",
                bits & !Self::KNOWN
            )));
        }
        Ok(Self(bits))
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether every set bit is also set in `allowed`.
    pub const fn is_subset_of(&self, allowed: Self) -> bool {
        self.0 & !allowed.0 == 0
    }
}

impl BitOr for VersioningFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for VersioningFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersioningFlags({:#x})", self.0)
    }
}
