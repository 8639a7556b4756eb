// Bitmask option types: dictionary load mode and multi-result mode.
//
// Both are small open bitmasks rather than closed enums because the engine
// interface treats them as integers and entries combine with OR (a dictionary
// is "compiled format" plus optionally "in memory"; multi mode is any subset
// of the four expansion strategies).

use std::ops::{BitOr, BitOrAssign};

/// How one dictionary file is loaded into the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DictMode(u32);

impl DictMode {
    /// No bits set; not a loadable mode by itself.
    pub const NONE: DictMode = DictMode(0);
    /// Compiled dictionary format (`.xdb`).
    pub const XDB: DictMode = DictMode(0x1);
    /// Keep the dictionary resident in memory.
    pub const MEM: DictMode = DictMode(0x2);
    /// Plain-text dictionary format (`.txt`).
    pub const TXT: DictMode = DictMode(0x4);

    /// Whether every bit of `other` is set in `self`.
    pub fn contains(self, other: DictMode) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bit value.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for DictMode {
    type Output = DictMode;
    fn bitor(self, rhs: DictMode) -> DictMode {
        DictMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for DictMode {
    fn bitor_assign(&mut self, rhs: DictMode) {
        self.0 |= rhs.0;
    }
}

/// Multi-result expansion mode for ambiguous spans.
///
/// The base state is "no expansion"; keywords from the `multi_mode` setting
/// OR individual strategies into the mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MultiMode(u32);

impl MultiMode {
    /// No multi-result expansion.
    pub const NONE: MultiMode = MultiMode(0);
    /// Prefer splitting long words into short ones.
    pub const SHORT: MultiMode = MultiMode(0x1000);
    /// Prefer two-character pairings.
    pub const DUALITY: MultiMode = MultiMode(0x2000);
    /// Also emit the principal element of each word.
    pub const ZMAIN: MultiMode = MultiMode(0x4000);
    /// Also emit every element of each word.
    pub const ZALL: MultiMode = MultiMode(0x8000);

    /// Whether every bit of `other` is set in `self`.
    pub fn contains(self, other: MultiMode) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bit value.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for MultiMode {
    type Output = MultiMode;
    fn bitor(self, rhs: MultiMode) -> MultiMode {
        MultiMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for MultiMode {
    fn bitor_assign(&mut self, rhs: MultiMode) {
        self.0 |= rhs.0;
    }
}
