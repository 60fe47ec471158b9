//! Z-order (Morton) keys over three interleaved 10-bit axes.
//!
//! Bit `3i` holds bit `i` of x, `3i + 1` of y and `3i + 2` of z. Nested grids
//! concatenate: a key over a `16^3` domain is the `4^3` outer key shifted left
//! by six bits with the inner `4^3` key in the low bits.

use core::ops::Add;

/// Bits stored per axis.
pub const AXIS_BITS: u32 = 10;
/// Largest coordinate representable on a single axis.
pub const AXIS_MAX: u32 = (1 << AXIS_BITS) - 1;

const X_MASK: u32 = 0x0924_9249;
const Y_MASK: u32 = X_MASK << 1;
const Z_MASK: u32 = X_MASK << 2;

#[inline]
const fn spread(v: u32) -> u32 {
    let mut v = v & AXIS_MAX;
    v = (v | (v << 16)) & 0x0300_00ff;
    v = (v | (v << 8)) & 0x0300_f00f;
    v = (v | (v << 4)) & 0x030c_30c3;
    v = (v | (v << 2)) & X_MASK;
    v
}

#[inline]
const fn compact(v: u32) -> u32 {
    let mut v = v & X_MASK;
    v = (v | (v >> 2)) & 0x030c_30c3;
    v = (v | (v >> 4)) & 0x0300_f00f;
    v = (v | (v >> 8)) & 0x0300_00ff;
    v = (v | (v >> 16)) & AXIS_MAX;
    v
}

#[inline]
const fn inc_field(key: u32, mask: u32) -> u32 {
    ((key | !mask).wrapping_add(1) & mask) | (key & !mask)
}

#[inline]
const fn dec_field(key: u32, mask: u32) -> u32 {
    ((key & mask).wrapping_sub(1) & mask) | (key & !mask)
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MortonKey(u32);

impl MortonKey {
    pub const ZERO: MortonKey = MortonKey(0);

    /// Interleaves `(x, y, z)`. Each axis must be at most [`AXIS_MAX`].
    #[inline]
    pub const fn encode(x: u32, y: u32, z: u32) -> Self {
        debug_assert!(x <= AXIS_MAX && y <= AXIS_MAX && z <= AXIS_MAX);
        MortonKey(spread(x) | (spread(y) << 1) | (spread(z) << 2))
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        MortonKey(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn decode(self) -> (u32, u32, u32) {
        (self.x(), self.y(), self.z())
    }

    #[inline]
    pub const fn x(self) -> u32 {
        compact(self.0)
    }

    #[inline]
    pub const fn y(self) -> u32 {
        compact(self.0 >> 1)
    }

    #[inline]
    pub const fn z(self) -> u32 {
        compact(self.0 >> 2)
    }

    #[inline]
    pub const fn with_x(self, x: u32) -> Self {
        MortonKey((self.0 & !X_MASK) | spread(x))
    }

    #[inline]
    pub const fn with_y(self, y: u32) -> Self {
        MortonKey((self.0 & !Y_MASK) | (spread(y) << 1))
    }

    #[inline]
    pub const fn with_z(self, z: u32) -> Self {
        MortonKey((self.0 & !Z_MASK) | (spread(z) << 2))
    }

    // Axis steps touch only their own bit field. Callers check the boundary
    // first; stepping past the axis range wraps within the field.

    #[inline]
    pub const fn inc_x(self) -> Self {
        MortonKey(inc_field(self.0, X_MASK))
    }

    #[inline]
    pub const fn dec_x(self) -> Self {
        MortonKey(dec_field(self.0, X_MASK))
    }

    #[inline]
    pub const fn inc_y(self) -> Self {
        MortonKey(inc_field(self.0, Y_MASK))
    }

    #[inline]
    pub const fn dec_y(self) -> Self {
        MortonKey(dec_field(self.0, Y_MASK))
    }

    #[inline]
    pub const fn inc_z(self) -> Self {
        MortonKey(inc_field(self.0, Z_MASK))
    }

    #[inline]
    pub const fn dec_z(self) -> Self {
        MortonKey(dec_field(self.0, Z_MASK))
    }

    /// Joins an outer-level key with a key of the next level down, where the
    /// inner level spans `inner_axis_bits` bits per axis.
    #[inline]
    pub const fn concat(self, inner: MortonKey, inner_axis_bits: u32) -> Self {
        let shift = 3 * inner_axis_bits;
        debug_assert!(inner.0 >> shift == 0);
        MortonKey((self.0 << shift) | inner.0)
    }

    /// Every key of a cube `2^axis_bits` wide, in ascending key order.
    pub fn cube(axis_bits: u32) -> impl Iterator<Item = MortonKey> {
        debug_assert!(axis_bits <= AXIS_BITS);
        (0..1u32 << (3 * axis_bits)).map(MortonKey)
    }
}

/// Per-axis addition without decoding; each axis wraps within its field.
impl Add for MortonKey {
    type Output = MortonKey;
    #[inline]
    fn add(self, rhs: MortonKey) -> MortonKey {
        let x = ((self.0 | !X_MASK).wrapping_add(rhs.0 & X_MASK)) & X_MASK;
        let y = ((self.0 | !Y_MASK).wrapping_add(rhs.0 & Y_MASK)) & Y_MASK;
        let z = ((self.0 | !Z_MASK).wrapping_add(rhs.0 & Z_MASK)) & Z_MASK;
        MortonKey(x | y | z)
    }
}

impl From<(u32, u32, u32)> for MortonKey {
    fn from((x, y, z): (u32, u32, u32)) -> Self {
        MortonKey::encode(x, y, z)
    }
}

impl From<MortonKey> for (u32, u32, u32) {
    fn from(value: MortonKey) -> Self {
        value.decode()
    }
}
