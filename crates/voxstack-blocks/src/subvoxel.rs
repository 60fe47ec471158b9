//! 4x4x4 sub-voxel occupancy packed into a single `u64`.

use serde::{Deserialize, Serialize};
use voxstack_geom::MortonKey;

/// Sub-cells per axis inside one voxel.
pub const SUBVOXEL_AXIS: u32 = 4;
/// Sub-cells per voxel.
pub const SUBVOXEL_CELLS: usize = 64;

/// Occupancy of the 64 sub-cells of one voxel. Bit `i` is the sub-cell whose
/// Morton key is `i`; a set bit means solid. Values are immutable: `set`
/// returns a new mask.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubVoxel(u64);

#[inline]
fn in_cell(x: u32, y: u32, z: u32) -> bool {
    x < SUBVOXEL_AXIS && y < SUBVOXEL_AXIS && z < SUBVOXEL_AXIS
}

impl SubVoxel {
    pub const EMPTY: SubVoxel = SubVoxel(0);
    pub const FULL: SubVoxel = SubVoxel(u64::MAX);

    #[inline]
    pub const fn new(mask: u64) -> Self {
        SubVoxel(mask)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Builds a mask by asking `f` about every sub-cell coordinate.
    pub fn from_fn(mut f: impl FnMut(u32, u32, u32) -> bool) -> Self {
        let mut mask = 0u64;
        for key in MortonKey::cube(2) {
            let (x, y, z) = key.decode();
            if f(x, y, z) {
                mask |= 1u64 << key.raw();
            }
        }
        SubVoxel(mask)
    }

    #[inline]
    pub const fn get(self, i: u32) -> bool {
        debug_assert!(i < SUBVOXEL_CELLS as u32);
        (self.0 >> i) & 1 != 0
    }

    #[inline]
    #[must_use]
    pub const fn set(self, i: u32, solid: bool) -> Self {
        debug_assert!(i < SUBVOXEL_CELLS as u32);
        let bit = 1u64 << i;
        if solid {
            SubVoxel(self.0 | bit)
        } else {
            SubVoxel(self.0 & !bit)
        }
    }

    /// Returns `None` for coordinates outside `0..4`.
    #[inline]
    pub fn get_xyz(self, x: u32, y: u32, z: u32) -> Option<bool> {
        in_cell(x, y, z).then(|| self.get(MortonKey::encode(x, y, z).raw()))
    }

    /// Returns `None` for coordinates outside `0..4`.
    #[inline]
    #[must_use]
    pub fn set_xyz(self, x: u32, y: u32, z: u32, solid: bool) -> Option<Self> {
        in_cell(x, y, z).then(|| self.set(MortonKey::encode(x, y, z).raw(), solid))
    }

    /// Number of solid sub-cells.
    #[inline]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_full(self) -> bool {
        self.0 == u64::MAX
    }

    /// Sub-cell indices whose occupancy differs between `self` and `other`.
    #[inline]
    pub fn changed(self, other: SubVoxel) -> ChangedBits {
        ChangedBits(self.0 ^ other.0)
    }
}

impl From<u64> for SubVoxel {
    fn from(value: u64) -> Self {
        SubVoxel(value)
    }
}

impl From<SubVoxel> for u64 {
    fn from(value: SubVoxel) -> Self {
        value.0
    }
}

/// Iterator over set bit positions of a difference mask, lowest first.
#[derive(Copy, Clone, Debug)]
pub struct ChangedBits(u64);

impl ChangedBits {
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn bit_count(self) -> u32 {
        self.0.count_ones()
    }
}

impl Iterator for ChangedBits {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.0 == 0 {
            return None;
        }
        let i = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}
