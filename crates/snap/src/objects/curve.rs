//! Curve snapping: control points and, while editing, Bezier handles.

use glam::{Mat4, Vec3};
use shared::{Curve, HandleType, Nurb, SceneObject};

use crate::derived::is_edit_mode;
use crate::hit::SnapBest;
use crate::math::ObjectSpace;
use crate::params::SnapElement;
use crate::primitives::{snap_vertex, SnapRay};

use super::SnapQuery;

pub(super) fn snap_curve(
    ob: &SceneObject,
    cu: &Curve,
    obmat: Mat4,
    query: &SnapQuery,
    best: &mut SnapBest,
) -> bool {
    if query.snap_to != SnapElement::Vertex {
        return false;
    }

    let space = ObjectSpace::new(obmat);
    let ray = SnapRay::to_local(&query.ray, &space);
    let editing = is_edit_mode(ob);
    let nurbs = if editing {
        match &cu.edit_nurbs {
            Some(nurbs) => nurbs,
            None => {
                tracing::debug!(object = %ob.id, "curve in edit mode without edit data");
                return false;
            }
        }
    } else {
        &cu.nurbs
    };

    let mut points = Vec::new();
    for nurb in nurbs {
        if editing {
            edit_points(nurb, &mut points);
        } else if nurb.len() > 1 {
            // Single-point splines are not drawn outside edit mode
            match nurb {
                Nurb::Bezier(bezts) => points.extend(bezts.iter().map(|b| Vec3::from(b.center))),
                Nurb::Poly(bps) => points.extend(bps.iter().map(|bp| Vec3::from(bp.co))),
            }
        }
    }

    let screen = query.screen.as_ref();
    let mut snapped = false;
    for co in points {
        snapped |= snap_vertex(co, None, &space, screen, &ray, best);
    }
    snapped
}

/// Points of an edited spline that are not moving with the selection
fn edit_points(nurb: &Nurb, out: &mut Vec<Vec3>) {
    match nurb {
        Nurb::Bezier(bezts) => {
            for bezt in bezts.iter().filter(|b| !(b.select_center || b.hide)) {
                out.push(Vec3::from(bezt.center));
                if handle_is_static(bezt.select_left, bezt.handle_left_type, bezt.select_right) {
                    out.push(Vec3::from(bezt.handle_left));
                }
                if handle_is_static(bezt.select_right, bezt.handle_right_type, bezt.select_left) {
                    out.push(Vec3::from(bezt.handle_right));
                }
            }
        }
        Nurb::Poly(bps) => {
            out.extend(
                bps.iter()
                    .filter(|bp| !(bp.select || bp.hide))
                    .map(|bp| Vec3::from(bp.co)),
            );
        }
    }
}

/// A handle moves when it is selected, or aligned to a selected opposite handle
fn handle_is_static(selected: bool, kind: HandleType, opposite_selected: bool) -> bool {
    !selected && !(kind == HandleType::Align && opposite_selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::bezier_point;
    use crate::hit::RAY_DIST_MAX;
    use crate::viewport::ViewRay;
    use shared::{BPoint, ObjectData, ObjectMode};

    fn query_at(x: f32, y: f32) -> SnapQuery<'static> {
        SnapQuery {
            snap_to: SnapElement::Vertex,
            ray: ViewRay::from_origin(Vec3::new(x, y, 10.0), Vec3::NEG_Z),
            screen: None,
            ortho: false,
        }
    }

    fn curve_object(cu: &Curve, mode: ObjectMode) -> SceneObject {
        let mut ob = SceneObject::new("curve", ObjectData::Curve(cu.clone()));
        ob.mode = mode;
        ob
    }

    fn collect(nurb: &Nurb) -> Vec<Vec3> {
        let mut out = Vec::new();
        edit_points(nurb, &mut out);
        out
    }

    #[test]
    fn test_selected_handle_and_aligned_partner_skipped() {
        let mut bezt = bezier_point([0.0, 0.0, 0.0]);
        bezt.select_right = true;
        bezt.handle_left_type = HandleType::Align;
        // Right is selected and left is aligned to it: only the center remains
        assert_eq!(collect(&Nurb::Bezier(vec![bezt.clone()])), vec![Vec3::ZERO]);

        bezt.handle_left_type = HandleType::Free;
        assert_eq!(
            collect(&Nurb::Bezier(vec![bezt])),
            vec![Vec3::ZERO, Vec3::new(-1.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_selected_center_skips_whole_point() {
        let mut bezt = bezier_point([0.0, 0.0, 0.0]);
        bezt.select_center = true;
        assert!(collect(&Nurb::Bezier(vec![bezt])).is_empty());

        let poly = Nurb::Poly(vec![
            BPoint { co: [0.0; 3], select: false, hide: true },
            BPoint { co: [1.0, 0.0, 0.0], select: false, hide: false },
        ]);
        assert_eq!(collect(&poly), vec![Vec3::X]);
    }

    #[test]
    fn test_single_point_spline_not_snappable_in_object_mode() {
        let cu = Curve {
            nurbs: vec![Nurb::Bezier(vec![bezier_point([0.0, 0.0, 0.0])])],
            edit_nurbs: None,
        };
        let ob = curve_object(&cu, ObjectMode::Object);
        let mut best = SnapBest::new(f32::MAX, RAY_DIST_MAX);
        assert!(!snap_curve(&ob, &cu, Mat4::IDENTITY, &query_at(0.0, 0.0), &mut best));

        let cu = Curve {
            nurbs: vec![Nurb::Bezier(vec![
                bezier_point([0.0, 0.0, 0.0]),
                bezier_point([3.0, 0.0, 0.0]),
            ])],
            edit_nurbs: None,
        };
        let ob = curve_object(&cu, ObjectMode::Object);
        assert!(snap_curve(&ob, &cu, Mat4::IDENTITY, &query_at(0.0, 0.0), &mut best));
        assert_eq!(best.hit.unwrap().location, Vec3::ZERO);
    }

    #[test]
    fn test_edit_mode_uses_edit_splines() {
        let cu = Curve {
            nurbs: vec![],
            edit_nurbs: Some(vec![Nurb::Bezier(vec![bezier_point([0.0, 0.0, 2.0])])]),
        };
        let ob = curve_object(&cu, ObjectMode::Edit);
        let mut best = SnapBest::new(f32::MAX, RAY_DIST_MAX);
        assert!(snap_curve(&ob, &cu, Mat4::IDENTITY, &query_at(0.0, 0.0), &mut best));
        assert!((best.ray_depth - 8.0).abs() < 1e-5);
    }
}
