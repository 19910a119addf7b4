//! Snapping settings

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{load_json, SnapResult};
use crate::params::{SnapElement, SnapElementFlags, SnapObjectParams, SnapSelect};

/// Default snapping radius around the cursor, in pixels
pub const DEFAULT_DIST_PX: f32 = 15.0;

/// Snap settings of an interactive session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Keep acceleration trees for the whole session
    pub use_cache: bool,
    pub snap_select: SnapSelect,
    /// Kind for single-kind queries
    pub snap_to: SnapElement,
    /// Kinds for mixed queries
    pub snap_to_flags: SnapElementFlags,
    pub use_object_active: bool,
    pub use_object_edit: bool,
    /// Mixed queries: later kinds must also be closer along the ray
    pub use_depth: bool,
    /// Snapping radius in pixels (Manhattan distance)
    pub dist_px: f32,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            use_cache: true,
            snap_select: SnapSelect::All,
            snap_to: SnapElement::Vertex,
            snap_to_flags: SnapElementFlags::VERTEX,
            use_object_active: true,
            use_object_edit: true,
            use_depth: false,
            dist_px: DEFAULT_DIST_PX,
        }
    }
}

impl SnapSettings {
    /// Load settings from a JSON file, missing fields take their defaults
    pub fn load(path: &Path) -> SnapResult<Self> {
        let settings: Self = load_json(path)?;
        tracing::debug!(path = %path.display(), ?settings, "loaded snap settings");
        Ok(settings)
    }

    /// Query parameters described by these settings
    pub fn params(&self) -> SnapObjectParams {
        SnapObjectParams {
            snap_select: self.snap_select,
            snap_to: self.snap_to,
            snap_to_flags: self.snap_to_flags,
            use_object_active: self.use_object_active,
            use_object_edit: self.use_object_edit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnapError;
    use std::io::Write;

    #[test]
    fn test_partial_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "snap_select": "not_selected", "snap_to_flags": "VERTEX | FACE", "dist_px": 8.0 }}"#
        )
        .unwrap();

        let settings = SnapSettings::load(file.path()).unwrap();
        assert_eq!(settings.snap_select, SnapSelect::NotSelected);
        assert_eq!(settings.snap_to_flags, SnapElementFlags::VERTEX | SnapElementFlags::FACE);
        assert_eq!(settings.dist_px, 8.0);
        assert!(settings.use_cache);

        let params = settings.params();
        assert_eq!(params.snap_select, SnapSelect::NotSelected);
        assert!(params.use_object_edit);
    }

    #[test]
    fn test_settings_roundtrip_through_json() {
        let settings = SnapSettings {
            snap_to: SnapElement::Edge,
            use_depth: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: SnapSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SnapSettings::load(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(SnapError::Io { .. })));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(SnapSettings::load(&path), Err(SnapError::Json { .. })));
    }
}
