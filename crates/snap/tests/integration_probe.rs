//! Integration tests for the probe: scene, settings and viewport files in,
//! query outcome out.

use std::path::Path;

use glam::Vec3;
use shared::Transform;
use vsnap_lib::fixtures::*;
use vsnap_lib::probe::{parse_args, run, ProbeArgs, ProbeOutcome};
use vsnap_lib::SnapError;

fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn triangle_files(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let scene = single_mesh_scene(
        "tri",
        triangle_geometry([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]),
        Transform::new(),
    );
    (
        write_json(dir, "scene.json", &scene),
        write_json(dir, "viewport.json", &ortho_viewport()),
    )
}

#[test]
fn test_probe_single_kind_query() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, viewport) = triangle_files(dir.path());

    let args = ProbeArgs {
        scene,
        settings: None,
        viewport: Some(viewport),
        cursor: region_center() + glam::Vec2::new(3.0, -2.0),
    };
    let ProbeOutcome::Single { hit } = run(&args).unwrap() else {
        panic!("default settings snap to a single kind");
    };
    let hit = hit.expect("origin vertex within 15 px");
    assert!(hit.location.length() < 1e-4);
    assert_eq!(hit.object.as_deref(), Some("tri"));
}

#[test]
fn test_probe_mixed_query_from_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let (scene, viewport) = triangle_files(dir.path());
    let settings = dir.path().join("settings.json");
    std::fs::write(&settings, r#"{ "snap_to_flags": "VERTEX | EDGE", "dist_px": 20.0 }"#).unwrap();

    // Middle of the bottom edge: 10 px from both end vertices, on the edge itself
    let cursor = ortho_viewport().project(Vec3::new(1.0, 0.0, 0.0)).unwrap();
    let list: Vec<String> = [
        "--scene",
        scene.to_str().unwrap(),
        "--settings",
        settings.to_str().unwrap(),
        "--viewport",
        viewport.to_str().unwrap(),
        "--cursor",
        &format!("{},{}", cursor.x, cursor.y),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let outcome = run(&parse_args(&list).unwrap()).unwrap();
    let ProbeOutcome::Mixed { point, dist_px } = outcome else {
        panic!("two kinds make a mixed query");
    };
    // The vertex pass finds a corner first and stops there
    let point = point.unwrap();
    assert!((point.location - Vec3::ZERO).length() < 1e-4 || (point.location - Vec3::X * 2.0).length() < 1e-4);
    assert!((dist_px - 10.0).abs() < 1e-2);
}

#[test]
fn test_probe_reports_missing_scene() {
    let dir = tempfile::tempdir().unwrap();
    let args = ProbeArgs {
        scene: dir.path().join("missing.json"),
        settings: None,
        viewport: None,
        cursor: region_center(),
    };
    assert!(matches!(run(&args), Err(SnapError::Io { .. })));
}
