//! The six faces of the cube a sphere is split into.

use glam::DVec3;

/// A cube face, named by the axis its outward normal points along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl CubeFace {
    /// All faces, ordered by [`index`](Self::index).
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    #[must_use]
    pub fn index(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub fn from_index(index: u32) -> Option<CubeFace> {
        Self::ALL.get(index as usize).copied()
    }

    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::X,
            CubeFace::NegX => DVec3::NEG_X,
            CubeFace::PosY => DVec3::Y,
            CubeFace::NegY => DVec3::NEG_Y,
            CubeFace::PosZ => DVec3::Z,
            CubeFace::NegZ => DVec3::NEG_Z,
        }
    }

    /// In-face axes `(u, v)` with `u × v == normal`.
    #[must_use]
    pub fn axes(self) -> (DVec3, DVec3) {
        match self {
            CubeFace::PosX => (DVec3::NEG_Z, DVec3::Y),
            CubeFace::NegX => (DVec3::Z, DVec3::Y),
            CubeFace::PosY => (DVec3::X, DVec3::NEG_Z),
            CubeFace::NegY => (DVec3::X, DVec3::Z),
            CubeFace::PosZ => (DVec3::X, DVec3::Y),
            CubeFace::NegZ => (DVec3::NEG_X, DVec3::Y),
        }
    }

    /// The face a direction exits the cube through: its dominant axis.
    ///
    /// Ties go to x over y over z, and to the positive side. The zero vector
    /// maps to [`CubeFace::PosX`].
    #[must_use]
    pub fn from_direction(dir: DVec3) -> CubeFace {
        let abs = dir.abs();
        if abs.x >= abs.y && abs.x >= abs.z {
            if dir.x >= 0.0 {
                CubeFace::PosX
            } else {
                CubeFace::NegX
            }
        } else if abs.y >= abs.z {
            if dir.y >= 0.0 {
                CubeFace::PosY
            } else {
                CubeFace::NegY
            }
        } else if dir.z >= 0.0 {
            CubeFace::PosZ
        } else {
            CubeFace::NegZ
        }
    }
}
