//! DDM Core - Asset addressing, preparation, and scene composition
//!
//! This crate holds everything about the DDM scene that does not need a
//! renderer:
//! - Asset URL resolution against a configurable base path
//! - Build-time preparation of the static asset folder
//! - Model descriptors and the highlight rules of the model manager
//! - The scene configuration and the element plan derived from it
//! - Camera easing and per-asset load tracking

pub mod asset_path;
pub mod composition;
pub mod easing;
pub mod elements;
pub mod loads;
pub mod model;
pub mod prepare;

pub use asset_path::{is_absolute_url, resolve, resolve_model_url, sanitize_request_path};
pub use composition::{SceneConfiguration, SceneElement, DEFAULT_ASSET_BASE_PATH};
pub use easing::{Easing, Tween};
pub use elements::{
    CameraPlacement, GroundParams, LensParams, OutlineParams, SkyParams, WaterParams,
    CAMERA_INITIAL, CAMERA_INTRO_MS, CAMERA_START, GROUND, LENS, ORBIT_DAMPING, OUTLINE,
    REMOTE_ENVIRONMENT_URL, SKY, WATER,
};
pub use loads::{AssetLoads, LoadStatus};
pub use model::{demo_models, prepare_models, ModelDescriptor, PreparedModel};
pub use prepare::{prepare, AssetManifest, AssetReference, PrepareError, PrepareReport};
