// Library crate: the snapping engine, its geometry collaborators and the probe.
// Integration tests drive it through `fixtures` and the `SnapContext` queries.

pub mod bvh;
pub mod cache;
pub mod config;
pub mod context;
pub mod derived;
pub mod dupli;
pub mod error;
pub mod fixtures;
pub mod hit;
pub mod math;
pub mod params;
pub mod picking;
pub mod primitives;
pub mod probe;
pub mod viewport;

mod objects;
mod query;
mod traverse;

pub use config::SnapSettings;
pub use context::SnapContext;
pub use error::{SnapError, SnapResult};
pub use hit::{SnapHit, SnapPoint, DIST_MAX_PX, RAY_DIST_MAX};
pub use params::{SnapElement, SnapElementFlags, SnapObjectParams, SnapSelect};
pub use viewport::{ArcBallCamera, Projection, Viewport};
