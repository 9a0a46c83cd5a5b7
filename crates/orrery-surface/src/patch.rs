//! Equal-angle grid cells on each cube face.
//!
//! A face is split into `n × n` cells by angle rather than by distance on the
//! cube, using `atan(s) / (π/4)` to undo the gnomonic stretch toward the face
//! edges. Cells near a face corner are still smaller than those at its center,
//! but by far less than a plain cube grid.

use std::f64::consts::FRAC_PI_4;

use glam::DVec3;
use orrery_orbit::PatchId;

use crate::CubeFace;

/// One cell of the patch grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfacePatch {
    pub face: CubeFace,
    /// Cell index along the face's `u` axis, `0..n`.
    pub col: u32,
    /// Cell index along the face's `v` axis, `0..n`.
    pub row: u32,
}

impl SurfacePatch {
    /// The cell a body-frame direction passes through. `dir` need not be unit length.
    #[must_use]
    pub fn from_direction(dir: DVec3, subdivisions: u32) -> SurfacePatch {
        let face = CubeFace::from_direction(dir);
        let depth = dir.dot(face.normal());
        if depth <= f64::MIN_POSITIVE {
            let mid = subdivisions / 2;
            return SurfacePatch { face, col: mid, row: mid };
        }

        let (u_axis, v_axis) = face.axes();
        let s = dir.dot(u_axis) / depth;
        let t = dir.dot(v_axis) / depth;

        SurfacePatch {
            face,
            col: cell(s, subdivisions),
            row: cell(t, subdivisions),
        }
    }

    /// Stable id: `face · n² + row · n + col`.
    #[must_use]
    pub fn id(self, subdivisions: u32) -> PatchId {
        let n = subdivisions;
        PatchId(self.face.index() * n * n + self.row * n + self.col)
    }

    #[must_use]
    pub fn from_id(id: PatchId, subdivisions: u32) -> Option<SurfacePatch> {
        let n = subdivisions;
        let per_face = n.checked_mul(n)?;
        if per_face == 0 {
            return None;
        }
        let face = CubeFace::from_index(id.0 / per_face)?;
        let within = id.0 % per_face;
        Some(SurfacePatch {
            face,
            col: within % n,
            row: within / n,
        })
    }

    /// Unit direction through the middle of the cell, body frame.
    #[must_use]
    pub fn center_direction(self, subdivisions: u32) -> DVec3 {
        let n = subdivisions as f64;
        let warp = |index: u32| ((index as f64 + 0.5) / n * 2.0 - 1.0) * FRAC_PI_4;
        let (u_axis, v_axis) = self.face.axes();
        (self.face.normal() + warp(self.col).tan() * u_axis + warp(self.row).tan() * v_axis)
            .normalize()
    }
}

/// Map a gnomonic face coordinate in `[-1, 1]` to its equal-angle cell.
fn cell(coord: f64, subdivisions: u32) -> u32 {
    let unit = (coord.clamp(-1.0, 1.0).atan() / FRAC_PI_4 + 1.0) * 0.5;
    let index = (unit * subdivisions as f64).floor() as u32;
    index.min(subdivisions.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_unique() {
        let n = 5;
        let mut seen = vec![false; (6 * n * n) as usize];
        for face in CubeFace::ALL {
            for row in 0..n {
                for col in 0..n {
                    let id = SurfacePatch { face, col, row }.id(n);
                    assert!(!seen[id.0 as usize], "duplicate id {id:?}");
                    seen[id.0 as usize] = true;
                }
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn test_id_roundtrip_and_out_of_range() {
        let patch = SurfacePatch {
            face: CubeFace::NegY,
            col: 2,
            row: 7,
        };
        assert_eq!(SurfacePatch::from_id(patch.id(12), 12), Some(patch));
        assert_eq!(SurfacePatch::from_id(PatchId(6 * 144), 12), None);
        assert_eq!(SurfacePatch::from_id(PatchId(0), 0), None);
    }

    #[test]
    fn test_cell_centers_map_back_to_their_cell() {
        let n = 8;
        for face in CubeFace::ALL {
            for row in 0..n {
                for col in 0..n {
                    let patch = SurfacePatch { face, col, row };
                    let dir = patch.center_direction(n);
                    assert!((dir.length() - 1.0).abs() < 1e-12);
                    assert_eq!(SurfacePatch::from_direction(dir, n), patch);
                }
            }
        }
    }

    #[test]
    fn test_face_normal_hits_middle_cell() {
        let patch = SurfacePatch::from_direction(DVec3::Z, 3);
        assert_eq!(
            patch,
            SurfacePatch {
                face: CubeFace::PosZ,
                col: 1,
                row: 1
            }
        );
    }

    #[test]
    fn test_face_edge_stays_in_grid() {
        let n = 4;
        let edge = DVec3::new(1.0, 1.0, 0.3);
        let patch = SurfacePatch::from_direction(edge, n);
        assert_eq!(patch.face, CubeFace::PosX);
        assert_eq!(patch.row, n - 1);
    }

    #[test]
    fn test_equal_angle_cells_span_equal_angles() {
        // Along the PosZ equator, every cell boundary is π/2 / n apart.
        let n = 6;
        let step = FRAC_PI_4 * 2.0 / n as f64;
        for k in 0..n {
            let angle = -FRAC_PI_4 + (k as f64 + 0.5) * step;
            let dir = DVec3::new(angle.sin(), 0.0, angle.cos());
            assert_eq!(SurfacePatch::from_direction(dir, n).col, k);
        }
    }
}
