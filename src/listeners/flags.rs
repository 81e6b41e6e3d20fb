//! # Listener flags.
//!
//! [`ListenerFlags`] is a tiny bitset stored with every listener record.
//!
//! - [`ListenerFlags::ONCE`] the dispatcher should remove the listener after the first call.
//! - [`ListenerFlags::SUSPENDED`] set only on query results, while a suspension overlay is active.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitset of per-listener flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ListenerFlags(u8);

impl ListenerFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Fire at most once.
    pub const ONCE: Self = Self(1);
    /// Currently suspended (query results only).
    pub const SUSPENDED: Self = Self(2);

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit of `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if no bit is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Sets the bits of `other`.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the bits of `other`.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for ListenerFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ListenerFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Debug for ListenerFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::ONCE) {
            set.entry(&"ONCE");
        }
        if self.contains(Self::SUSPENDED) {
            set.entry(&"SUSPENDED");
        }
        set.finish()
    }
}
