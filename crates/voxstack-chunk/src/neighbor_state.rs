use voxstack_mesh_cpu::Face;

/// Low six bits: exposure toward each [`Face`].
pub const EXPOSURE_MASK: u8 = 0x3F;
/// Set when the sub-cell itself is solid.
pub const SOLID_BIT: u8 = 1 << 6;

/// Per-sub-cell byte: bits 0-5 say whether the face in that direction borders
/// empty space, bit 6 says whether the sub-cell is solid. Exposure is only
/// ever set on solid sub-cells.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct NeighborState(u8);

impl NeighborState {
    pub const EMPTY: NeighborState = NeighborState(0);

    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        NeighborState(raw)
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_solid(self) -> bool {
        self.0 & SOLID_BIT != 0
    }

    /// The 6-bit exposure pattern, usable as a face table index.
    #[inline]
    pub const fn exposure(self) -> u8 {
        self.0 & EXPOSURE_MASK
    }

    #[inline]
    pub const fn is_exposed(self, face: Face) -> bool {
        self.0 & face.bit() != 0
    }

    #[inline]
    #[must_use]
    pub const fn with_solid(self, solid: bool) -> Self {
        if solid {
            NeighborState(self.0 | SOLID_BIT)
        } else {
            NeighborState(self.0 & !SOLID_BIT)
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_exposed(self, face: Face, exposed: bool) -> Self {
        if exposed {
            NeighborState(self.0 | face.bit())
        } else {
            NeighborState(self.0 & !face.bit())
        }
    }
}
