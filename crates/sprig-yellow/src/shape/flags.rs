use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Facts about a shape that are inherited by every ancestor.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const NONE: Self = Self(0);
    /// Synthesized by error recovery; covers no text.
    pub const IS_MISSING: Self = Self(1 << 0);
    pub const CONTAINS_DIAGNOSTICS: Self = Self(1 << 1);
    /// Holds tokens the parser skipped over.
    pub const CONTAINS_SKIPPED_TEXT: Self = Self(1 << 2);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for NodeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for NodeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for NodeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::IS_MISSING, "IS_MISSING"),
            (Self::CONTAINS_DIAGNOSTICS, "CONTAINS_DIAGNOSTICS"),
            (Self::CONTAINS_SKIPPED_TEXT, "CONTAINS_SKIPPED_TEXT"),
        ];

        let mut list = f.debug_set();
        for (flag, name) in names {
            if self.contains(flag) {
                list.entry(&format_args!("{name}"));
            }
        }
        list.finish()
    }
}
