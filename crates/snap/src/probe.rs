//! Command-line probe: run one snapping query against a scene file.

use std::path::PathBuf;

use glam::Vec2;
use serde::Serialize;
use shared::Scene;

use crate::config::SnapSettings;
use crate::context::SnapContext;
use crate::error::{load_json, SnapError, SnapResult};
use crate::hit::{SnapHit, SnapPoint, RAY_DIST_MAX};
use crate::params::SnapObjectParams;
use crate::viewport::{ArcBallCamera, Viewport};

/// Parsed probe arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeArgs {
    pub scene: PathBuf,
    pub settings: Option<PathBuf>,
    pub viewport: Option<PathBuf>,
    pub cursor: Vec2,
}

/// Probe output: a full hit for single-kind settings, location and normal for mixed ones
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Single { hit: Option<SnapHit> },
    Mixed { point: Option<SnapPoint>, dist_px: f32 },
}

/// Parse `--scene <path> [--settings <path>] [--viewport <path>] --cursor <x>,<y>`
pub fn parse_args(args: &[String]) -> SnapResult<ProbeArgs> {
    let mut scene = None;
    let mut settings = None;
    let mut viewport = None;
    let mut cursor = None;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = || {
            args.get(i + 1).ok_or(SnapError::InvalidArgument {
                name: "arguments",
                value: format!("{flag} needs a value"),
            })
        };
        match flag {
            "--scene" => scene = Some(PathBuf::from(value()?)),
            "--settings" => settings = Some(PathBuf::from(value()?)),
            "--viewport" => viewport = Some(PathBuf::from(value()?)),
            "--cursor" => cursor = Some(parse_cursor(value()?)?),
            other => {
                return Err(SnapError::InvalidArgument {
                    name: "arguments",
                    value: other.to_string(),
                })
            }
        }
        i += 2;
    }

    Ok(ProbeArgs {
        scene: scene.ok_or(SnapError::MissingArgument("--scene"))?,
        settings,
        viewport,
        cursor: cursor.ok_or(SnapError::MissingArgument("--cursor"))?,
    })
}

fn parse_cursor(text: &str) -> SnapResult<Vec2> {
    let invalid = || SnapError::InvalidArgument {
        name: "--cursor",
        value: text.to_string(),
    };
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let x: f32 = x.trim().parse().map_err(|_| invalid())?;
    let y: f32 = y.trim().parse().map_err(|_| invalid())?;
    Ok(Vec2::new(x, y))
}

/// Load the inputs and run the query the settings describe
pub fn run(args: &ProbeArgs) -> SnapResult<ProbeOutcome> {
    let scene: Scene = load_json(&args.scene)?;
    tracing::info!("Loaded scene from {} ({} objects)", args.scene.display(), scene.objects.len());

    let settings = match &args.settings {
        Some(path) => SnapSettings::load(path)?,
        None => SnapSettings::default(),
    };
    let viewport = match &args.viewport {
        Some(path) => load_json(path)?,
        None => Viewport::new(ArcBallCamera::new(), 800.0, 600.0),
    };

    Ok(query(&scene, &settings, viewport, args.cursor))
}

/// Run the query described by `settings` at `cursor`
pub fn query(scene: &Scene, settings: &SnapSettings, viewport: Viewport, cursor: Vec2) -> ProbeOutcome {
    let mut ctx = SnapContext::with_viewport(scene, settings.use_cache, viewport);
    let params = settings.params();
    let mut dist_px = settings.dist_px;

    match settings.snap_to_flags.single() {
        Some(snap_to) => {
            let params = SnapObjectParams { snap_to, ..params };
            let mut ray_depth = RAY_DIST_MAX;
            let hit = ctx.project_view3d_ex(&params, cursor, &mut dist_px, &mut ray_depth);
            ProbeOutcome::Single { hit }
        }
        None => {
            let point = ctx.project_view3d_mixed(&params, cursor, &mut dist_px, settings.use_depth);
            ProbeOutcome::Mixed { point, dist_px }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(&args(&["--scene", "scene.json", "--cursor", "12.5, 40"])).unwrap();
        assert_eq!(parsed.scene, PathBuf::from("scene.json"));
        assert_eq!(parsed.cursor, Vec2::new(12.5, 40.0));
        assert!(parsed.settings.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(
            parse_args(&args(&["--cursor", "1,2"])),
            Err(SnapError::MissingArgument("--scene"))
        ));
        assert!(matches!(
            parse_args(&args(&["--scene", "s.json", "--cursor", "1;2"])),
            Err(SnapError::InvalidArgument { name: "--cursor", .. })
        ));
        assert!(matches!(
            parse_args(&args(&["--scene"])),
            Err(SnapError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse_args(&args(&["--verbose"])),
            Err(SnapError::InvalidArgument { .. })
        ));
    }
}
