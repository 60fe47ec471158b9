use voxstack_geom::Vec3;

/// The six face directions of a sub-cell. The discriminant is the bit index
/// of the matching exposure flag in a neighbor-state byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Front = 0,
    Back = 1,
    Left = 2,
    Right = 3,
    Up = 4,
    Down = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Up,
        Face::Down,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(i: usize) -> Option<Face> {
        match i {
            0 => Some(Face::Front),
            1 => Some(Face::Back),
            2 => Some(Face::Left),
            3 => Some(Face::Right),
            4 => Some(Face::Up),
            5 => Some(Face::Down),
            _ => None,
        }
    }

    /// Exposure flag for this face.
    #[inline]
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }

    #[inline]
    pub const fn opposite(self) -> Face {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Up => Face::Down,
            Face::Down => Face::Up,
        }
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub const fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Front => (0, 0, -1),
            Face::Back => (0, 0, 1),
            Face::Left => (-1, 0, 0),
            Face::Right => (1, 0, 0),
            Face::Up => (0, 1, 0),
            Face::Down => (0, -1, 0),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (x, y, z) = self.delta();
        Vec3::new(x as f32, y as f32, z as f32)
    }

    /// Corners of this face on the unit cube, counter-clockwise seen from
    /// outside so `(0,1,2)` and `(0,2,3)` face along the normal.
    pub const fn corners(self) -> [[u8; 3]; 4] {
        match self {
            Face::Front => [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 0, 0]],
            Face::Back => [[1, 0, 1], [1, 1, 1], [0, 1, 1], [0, 0, 1]],
            Face::Left => [[0, 0, 1], [0, 1, 1], [0, 1, 0], [0, 0, 0]],
            Face::Right => [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 1]],
            Face::Up => [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]],
            Face::Down => [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winding_matches_normal() {
        for face in Face::ALL {
            let c = face.corners().map(|[x, y, z]| Vec3::new(x as f32, y as f32, z as f32));
            let e1 = c[1] + -c[0];
            let e2 = c[2] + -c[0];
            assert!(e1.cross(e2).dot(face.normal()) > 0.0, "{face:?}");
        }
    }

    #[test]
    fn opposite_is_involution_with_negated_delta() {
        for face in Face::ALL {
            assert_eq!(face.opposite().opposite(), face);
            let (x, y, z) = face.delta();
            assert_eq!(face.opposite().delta(), (-x, -y, -z));
            assert_eq!(Face::from_index(face.index()), Some(face));
        }
        assert_eq!(Face::from_index(6), None);
    }
}
