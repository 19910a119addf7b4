//! Public snapping queries.
//!
//! All queries leave their in/out parameters untouched when nothing is hit.

use glam::{Vec2, Vec3};

use crate::context::SnapContext;
use crate::hit::{ScreenTarget, SnapBest, SnapHit, SnapPoint, RAY_DIST_MAX};
use crate::objects::SnapQuery;
use crate::params::{SnapElement, SnapObjectParams, SnapSelect};
use crate::traverse::snap_objects_ray;
use crate::viewport::ViewRay;

impl SnapContext<'_> {
    /// Snap along an explicit world-space ray.
    ///
    /// Candidates are ranked by depth only. `ray_depth` bounds the search and
    /// receives the depth of the hit.
    pub fn project_ray_ex(
        &mut self,
        params: &SnapObjectParams,
        origin: Vec3,
        direction: Vec3,
        ray_depth: &mut f32,
    ) -> Option<SnapHit> {
        let ray = ViewRay::from_origin(origin, direction);
        if ray.direction == Vec3::ZERO {
            tracing::debug!("ray without direction");
            return None;
        }

        let query = SnapQuery {
            snap_to: params.snap_to,
            ray,
            screen: None,
            ortho: false,
        };
        let mut best = SnapBest::new(f32::MAX, *ray_depth);
        if !snap_objects_ray(self.scene, &mut self.cache, params, &query, &mut best) {
            return None;
        }

        let hit = best.hit?;
        *ray_depth = best.ray_depth;
        Some(hit)
    }

    /// Cast a ray into the scene and return the first face it hits.
    ///
    /// The edit object, if any, is snapped against its edit cage.
    pub fn project_ray(&mut self, origin: Vec3, direction: Vec3, max_depth: Option<f32>) -> Option<SnapHit> {
        let params = SnapObjectParams {
            snap_select: SnapSelect::All,
            use_object_edit: self.scene.edit_object().is_some(),
            ..SnapObjectParams::new(SnapElement::Face)
        };
        let mut ray_depth = max_depth.unwrap_or(RAY_DIST_MAX);
        self.project_ray_ex(&params, origin, direction, &mut ray_depth)
    }

    /// Snap to the element kind `params.snap_to` under the cursor `mval` (region pixels).
    ///
    /// `dist_px` is the pixel budget and `ray_depth` the depth bound; both
    /// receive the values of the hit.
    pub fn project_view3d_ex(
        &mut self,
        params: &SnapObjectParams,
        mval: Vec2,
        dist_px: &mut f32,
        ray_depth: &mut f32,
    ) -> Option<SnapHit> {
        let Some(viewport) = &self.viewport else {
            tracing::warn!("cursor query on a snapping context without viewport");
            return None;
        };
        let ray = viewport.win_to_ray(mval)?;
        self.snap_view_ray(params, ray, mval, dist_px, ray_depth)
    }

    /// Like [`Self::project_view3d_ex`], returning only location and normal
    pub fn project_view3d(
        &mut self,
        params: &SnapObjectParams,
        mval: Vec2,
        dist_px: &mut f32,
        ray_depth: &mut f32,
    ) -> Option<SnapPoint> {
        self.project_view3d_ex(params, mval, dist_px, ray_depth)
            .map(|hit| hit.point())
    }

    /// Try each kind of `params.snap_to_flags` in vertex, edge, face order.
    ///
    /// With `use_depth` every kind runs and a later kind must also beat the
    /// depth of earlier hits. Without it each kind gets an unbounded depth and
    /// the first kind that hits ends the search. The pixel budget is shared.
    pub fn project_view3d_mixed(
        &mut self,
        params: &SnapObjectParams,
        mval: Vec2,
        dist_px: &mut f32,
        use_depth: bool,
    ) -> Option<SnapPoint> {
        let Some(viewport) = &self.viewport else {
            tracing::warn!("cursor query on a snapping context without viewport");
            return None;
        };
        let ray = viewport.win_to_ray(mval)?;
        self.mixed_view_ray(params, ray, mval, dist_px, use_depth)
    }

    pub(crate) fn mixed_view_ray(
        &mut self,
        params: &SnapObjectParams,
        ray: ViewRay,
        mval: Vec2,
        dist_px: &mut f32,
        use_depth: bool,
    ) -> Option<SnapPoint> {
        if params.snap_to_flags.is_empty() {
            tracing::debug!("mixed query without element kinds");
            return None;
        }

        let mut ray_depth = RAY_DIST_MAX;
        let mut result = None;

        for snap_to in SnapElement::MIXED_ORDER {
            if !params.snap_to_flags.contains(snap_to.flag()) {
                continue;
            }
            if result.is_some() && !use_depth {
                break;
            }
            if !use_depth {
                ray_depth = RAY_DIST_MAX;
            }

            let kind_params = SnapObjectParams { snap_to, ..*params };
            if let Some(hit) = self.snap_view_ray(&kind_params, ray, mval, dist_px, &mut ray_depth) {
                tracing::trace!(?snap_to, dist_px = hit.dist_px, ray_depth = hit.ray_depth, "mixed query hit");
                result = Some(hit.point());
            }
        }

        result
    }

    fn snap_view_ray(
        &mut self,
        params: &SnapObjectParams,
        ray: ViewRay,
        mval: Vec2,
        dist_px: &mut f32,
        ray_depth: &mut f32,
    ) -> Option<SnapHit> {
        let Self { scene, viewport, cache } = self;
        let viewport = viewport.as_ref()?;

        let query = SnapQuery {
            snap_to: params.snap_to,
            ray,
            screen: Some(ScreenTarget { viewport, mval }),
            ortho: !viewport.is_perspective(),
        };
        let mut best = SnapBest::new(*dist_px, *ray_depth);
        if !snap_objects_ray(scene, cache, params, &query, &mut best) {
            return None;
        }

        let hit = best.hit?;
        *dist_px = best.dist_px;
        *ray_depth = best.ray_depth;
        Some(hit)
    }
}
