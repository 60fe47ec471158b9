use serde::{Deserialize, Serialize};

use crate::subvoxel::SubVoxel;

pub type VoxelType = u16;

/// One voxel: an opaque 16-bit type plus the occupancy of its 64 sub-cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Voxel {
    pub ty: VoxelType,
    pub state: SubVoxel,
}

impl Voxel {
    pub const EMPTY: Voxel = Voxel { ty: 0, state: SubVoxel::EMPTY };

    #[inline]
    pub const fn new(ty: VoxelType, state: SubVoxel) -> Self {
        Self { ty, state }
    }

    #[inline]
    pub const fn solid(ty: VoxelType) -> Self {
        Self { ty, state: SubVoxel::FULL }
    }

    /// Solid sub-cell count.
    #[inline]
    pub const fn state_count(self) -> u32 {
        self.state.len()
    }

    #[inline]
    pub const fn sub_cell(self, i: u32) -> bool {
        self.state.get(i)
    }
}
