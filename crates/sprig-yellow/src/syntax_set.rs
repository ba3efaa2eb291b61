use crate::SyntaxKind;

const SIZE: usize = 2;

/// A fixed-size bitset of kinds, usable in `const` context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxSet {
    bits: [u64; SIZE],
}

impl SyntaxSet {
    pub const EMPTY: Self = Self { bits: [0; SIZE] };
    const BITS_PER_SLOT: u16 = u64::BITS as u16;

    const fn locate(kind: SyntaxKind) -> (usize, u64) {
        let kind = kind as u16;
        let slot = (kind / Self::BITS_PER_SLOT) as usize;

        debug_assert!(slot < SIZE, "SyntaxKind does not fit in SyntaxSet; grow SIZE");

        (slot, 1 << (kind % Self::BITS_PER_SLOT))
    }

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut set = Self::EMPTY;

        let mut i = 0;
        while i < kinds.len() {
            set = set.with(kinds[i]);
            i += 1;
        }

        set
    }

    pub const fn with(mut self, kind: SyntaxKind) -> Self {
        let (slot, mask) = Self::locate(kind);
        self.bits[slot] |= mask;
        self
    }

    pub const fn union(mut self, other: &Self) -> Self {
        let mut i = 0;

        while i < SIZE {
            self.bits[i] |= other.bits[i];
            i += 1;
        }

        self
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let (slot, mask) = Self::locate(kind);
        self.bits[slot] & mask != 0
    }
}
