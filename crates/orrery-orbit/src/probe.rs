//! Sight line from the orbit focus through the satellite onto a central body.

use glam::DVec3;
use rustc_hash::FxHashSet;

use crate::error::SurfaceError;

/// Identifier of one discretized patch of the central body's surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct PatchId(pub u32);

/// A ray with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SightRay {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl SightRay {
    /// Ray from `origin` toward `target`. `None` when the two coincide.
    pub fn toward(origin: DVec3, target: DVec3) -> Option<Self> {
        let direction = (target - origin).try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, distance: f64) -> DVec3 {
        self.origin + self.direction * distance
    }
}

/// Surface-intersection service for the central body.
pub trait SurfaceQuery {
    /// The first patch the ray enters, or `None` if it misses the body.
    fn first_hit(&self, ray: &SightRay) -> Result<Option<PatchId>, SurfaceError>;
}

/// Patches intersected at least once. Only grows, except through [`clear`](Self::clear).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SightRecord {
    visited: FxHashSet<PatchId>,
}

impl SightRecord {
    /// Returns `true` if `patch` was not yet visited.
    pub fn insert(&mut self, patch: PatchId) -> bool {
        self.visited.insert(patch)
    }

    pub fn contains(&self, patch: PatchId) -> bool {
        self.visited.contains(&patch)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PatchId> + '_ {
        self.visited.iter().copied()
    }

    /// Visited patches in ascending id order.
    pub fn sorted(&self) -> Vec<PatchId> {
        let mut patches: Vec<_> = self.iter().collect();
        patches.sort_unstable();
        patches
    }

    pub fn clear(&mut self) {
        self.visited.clear();
    }
}

/// Casts one sight line per frame and accumulates the patches it hits.
#[derive(Clone, Debug, Default)]
pub struct SightLineProbe {
    focus: DVec3,
    record: SightRecord,
}

impl SightLineProbe {
    /// A probe whose rays start at `focus`, in the surface's frame.
    pub fn new(focus: DVec3) -> Self {
        Self {
            focus,
            record: SightRecord::default(),
        }
    }

    pub fn focus(&self) -> DVec3 {
        self.focus
    }

    pub fn record(&self) -> &SightRecord {
        &self.record
    }

    pub fn reset(&mut self) {
        self.record.clear();
    }

    /// Cast from the focus toward `satellite` and return the hit patch if it
    /// was not visited before.
    ///
    /// A missing surface, a failed query, a miss, and a satellite sitting on
    /// the focus all yield `None`.
    pub fn update(
        &mut self,
        surface: Option<&dyn SurfaceQuery>,
        satellite: DVec3,
    ) -> Option<PatchId> {
        let Some(surface) = surface else {
            log::trace!("sight line skipped this frame: {}", SurfaceError::Unavailable);
            return None;
        };
        let ray = SightRay::toward(self.focus, satellite)?;

        let hit = match surface.first_hit(&ray) {
            Ok(hit) => hit?,
            Err(err) => {
                log::debug!("sight line skipped this frame: {err}");
                return None;
            }
        };

        if self.record.insert(hit) {
            log::debug!("sight line reached new patch {}", hit.0);
            Some(hit)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit sphere at the origin split into two hemispheres by the sign of x.
    struct Hemispheres;

    impl SurfaceQuery for Hemispheres {
        fn first_hit(&self, ray: &SightRay) -> Result<Option<PatchId>, SurfaceError> {
            Ok(Some(PatchId(u32::from(ray.direction.x < 0.0))))
        }
    }

    /// Only rays heading up the y axis hit anything.
    struct NarrowTarget;

    impl SurfaceQuery for NarrowTarget {
        fn first_hit(&self, ray: &SightRay) -> Result<Option<PatchId>, SurfaceError> {
            Ok((ray.direction.y > 0.99).then_some(PatchId(7)))
        }
    }

    struct Broken;

    impl SurfaceQuery for Broken {
        fn first_hit(&self, _ray: &SightRay) -> Result<Option<PatchId>, SurfaceError> {
            Err(SurfaceError::Query("mesh not loaded".to_string()))
        }
    }

    #[test]
    fn test_visitation_is_idempotent() {
        let mut probe = SightLineProbe::default();
        assert_eq!(probe.update(Some(&Hemispheres), DVec3::X), Some(PatchId(0)));
        assert_eq!(
            probe.update(Some(&Hemispheres), DVec3::new(2.0, 1.0, 0.0)),
            None
        );
        assert_eq!(probe.update(Some(&Hemispheres), DVec3::NEG_X), Some(PatchId(1)));
        assert_eq!(probe.update(Some(&Hemispheres), DVec3::NEG_X), None);
        assert_eq!(probe.record().sorted(), vec![PatchId(0), PatchId(1)]);
    }

    #[test]
    fn test_miss_reports_none() {
        let mut probe = SightLineProbe::default();
        assert_eq!(probe.update(Some(&NarrowTarget), DVec3::X), None);
        assert!(probe.record().is_empty());
        assert_eq!(probe.update(Some(&NarrowTarget), DVec3::Y * 4.0), Some(PatchId(7)));
    }

    #[test]
    fn test_missing_or_failing_surface_is_no_hit() {
        let mut probe = SightLineProbe::default();
        assert_eq!(probe.update(None, DVec3::X), None);
        assert_eq!(probe.update(Some(&Broken), DVec3::X), None);
        assert!(probe.record().is_empty());
        // The next frame with a working surface proceeds normally.
        assert_eq!(probe.update(Some(&Hemispheres), DVec3::X), Some(PatchId(0)));
    }

    #[test]
    fn test_ray_starts_at_focus() {
        let mut probe = SightLineProbe::new(DVec3::new(0.0, -5.0, 0.0));
        // From (0, -5, 0) the target lies straight up the y axis.
        assert_eq!(
            probe.update(Some(&NarrowTarget), DVec3::new(0.0, 3.0, 0.0)),
            Some(PatchId(7))
        );
        assert_eq!(probe.focus(), DVec3::new(0.0, -5.0, 0.0));
    }

    #[test]
    fn test_satellite_on_focus_is_ignored() {
        let mut probe = SightLineProbe::default();
        assert_eq!(probe.update(Some(&Hemispheres), DVec3::ZERO), None);
    }

    #[test]
    fn test_reset_allows_revisiting() {
        let mut probe = SightLineProbe::default();
        probe.update(Some(&Hemispheres), DVec3::X);
        probe.reset();
        assert!(probe.record().is_empty());
        assert_eq!(probe.update(Some(&Hemispheres), DVec3::X), Some(PatchId(0)));
    }

    #[test]
    fn test_sight_ray_toward() {
        let ray = SightRay::toward(DVec3::ZERO, DVec3::new(0.0, 0.0, 3.0)).unwrap();
        assert_eq!(ray.direction, DVec3::Z);
        assert_eq!(ray.at(2.0), DVec3::new(0.0, 0.0, 2.0));
        assert!(SightRay::toward(DVec3::ONE, DVec3::ONE).is_none());
    }
}
