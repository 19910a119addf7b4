//! Snapping session state

use shared::Scene;

use crate::cache::SnapCache;
use crate::viewport::Viewport;

/// A snapping session over one scene.
///
/// Created when an interactive operation starts and dropped when it ends.
/// With caching on, acceleration trees built during the session are reused
/// by every later query and never refreshed, so the scene must not change
/// geometry while the session is alive.
#[derive(Debug)]
pub struct SnapContext<'a> {
    pub(crate) scene: &'a Scene,
    pub(crate) viewport: Option<Viewport>,
    pub(crate) cache: SnapCache,
}

impl<'a> SnapContext<'a> {
    /// Context for pure ray queries
    pub fn new(scene: &'a Scene, use_cache: bool) -> Self {
        Self {
            scene,
            viewport: None,
            cache: SnapCache::new(use_cache),
        }
    }

    /// Context bound to a 3D viewport, enables the cursor-based queries
    pub fn with_viewport(scene: &'a Scene, use_cache: bool, viewport: Viewport) -> Self {
        Self {
            viewport: Some(viewport),
            ..Self::new(scene, use_cache)
        }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn cache(&self) -> &SnapCache {
        &self.cache
    }
}
