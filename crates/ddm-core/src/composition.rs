//! Scene configuration and the composition plan
//!
//! `SceneConfiguration` is the single object threaded from the host page
//! into the scene. [`SceneConfiguration::plan`] turns it into the ordered
//! list of elements the renderer mounts, with every asset URL already
//! resolved against the base path.

use serde::{Deserialize, Serialize};

use crate::asset_path::resolve;
use crate::elements::{
    CameraPlacement, GroundParams, LensParams, SkyParams, WaterParams, CAMERA_INITIAL,
    CAMERA_INTRO_MS, CAMERA_START, ENVIRONMENT_PATH, GROUND, GROUND_TEXTURE_PATH, LENS,
    ORBIT_DAMPING, SKY, WATER, WATER_NORMALS_PATH,
};
use crate::model::{demo_models, prepare_models, ModelDescriptor, PreparedModel};

/// Default prefix for all relative assets
pub const DEFAULT_ASSET_BASE_PATH: &str = "/ddm-files";

/// Default ambient light intensity
pub const DEFAULT_AMBIENT_LIGHT: f32 = 0.45;

/// Default water surface position
pub const DEFAULT_WATER_POSITION: [f32; 3] = [0.0, -1.0, 0.0];

/// Everything the host page can configure about the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneConfiguration {
    pub asset_base_path: String,
    pub models: Vec<ModelDescriptor>,
    /// Used verbatim when set; derived from the asset base path otherwise
    pub environment_url: Option<String>,
    /// Index into `models` (before hidden models are dropped)
    pub highlight_index: Option<usize>,
    #[serde(rename = "ambientLight")]
    pub ambient_light_intensity: f32,
    pub show_ground: bool,
    pub show_water: bool,
    pub water_position: [f32; 3],
}

impl Default for SceneConfiguration {
    fn default() -> Self {
        Self {
            asset_base_path: DEFAULT_ASSET_BASE_PATH.to_string(),
            models: demo_models(),
            environment_url: None,
            highlight_index: None,
            ambient_light_intensity: DEFAULT_AMBIENT_LIGHT,
            show_ground: true,
            show_water: true,
            water_position: DEFAULT_WATER_POSITION,
        }
    }
}

/// One entry of the composition plan
#[derive(Debug, Clone, PartialEq)]
pub enum SceneElement {
    Camera {
        initial: CameraPlacement,
        lens: LensParams,
    },
    /// One-shot camera transition, advanced every frame until it completes
    CameraIntro {
        from: CameraPlacement,
        to: CameraPlacement,
        duration_ms: u64,
    },
    Models(Vec<PreparedModel>),
    OrbitControls {
        damping: f32,
    },
    /// HDRI used as both lighting environment and background
    Environment {
        url: String,
    },
    Sky(SkyParams),
    Ocean {
        normals_url: String,
        position: [f32; 3],
        params: WaterParams,
    },
    Ground {
        texture_url: String,
        params: GroundParams,
    },
    AmbientLight {
        intensity: f32,
    },
}

impl SceneElement {
    /// Asset URL this element waits on before it reveals, if any
    pub fn asset_url(&self) -> Option<&str> {
        match self {
            SceneElement::Environment { url } => Some(url),
            SceneElement::Ocean { normals_url, .. } => Some(normals_url),
            SceneElement::Ground { texture_url, .. } => Some(texture_url),
            _ => None,
        }
    }
}

impl SceneConfiguration {
    /// Explicit environment URL, or the HDRI under the asset base path
    pub fn environment_url(&self) -> String {
        match &self.environment_url {
            Some(url) => url.clone(),
            None => resolve(&self.asset_base_path, ENVIRONMENT_PATH),
        }
    }

    pub fn ground_texture_url(&self) -> String {
        resolve(&self.asset_base_path, GROUND_TEXTURE_PATH)
    }

    pub fn water_normals_url(&self) -> String {
        resolve(&self.asset_base_path, WATER_NORMALS_PATH)
    }

    /// Visible models with their resolved URLs and highlight flags
    pub fn prepared_models(&self) -> Vec<PreparedModel> {
        prepare_models(&self.models, self.highlight_index, &self.asset_base_path)
    }

    /// Elements to mount. Hidden ground or water is left out entirely, so
    /// its texture is never requested.
    pub fn plan(&self) -> Vec<SceneElement> {
        let mut elements = vec![
            SceneElement::Camera {
                initial: CAMERA_INITIAL,
                lens: LENS,
            },
            SceneElement::CameraIntro {
                from: CAMERA_INITIAL,
                to: CAMERA_START,
                duration_ms: CAMERA_INTRO_MS,
            },
            SceneElement::Models(self.prepared_models()),
            SceneElement::OrbitControls {
                damping: ORBIT_DAMPING,
            },
            SceneElement::Environment {
                url: self.environment_url(),
            },
            SceneElement::Sky(SKY),
        ];

        if self.show_water {
            elements.push(SceneElement::Ocean {
                normals_url: self.water_normals_url(),
                position: self.water_position,
                params: WATER,
            });
        }

        if self.show_ground {
            elements.push(SceneElement::Ground {
                texture_url: self.ground_texture_url(),
                params: GROUND,
            });
        }

        elements.push(SceneElement::AmbientLight {
            intensity: self.ambient_light_intensity,
        });

        elements
    }

    /// Every URL the plan will request, models included
    pub fn asset_urls(&self) -> Vec<String> {
        let mut urls = Vec::new();
        for element in self.plan() {
            match &element {
                SceneElement::Models(models) => urls.extend(models.iter().map(|m| m.url.clone())),
                other => urls.extend(other.asset_url().map(str::to_string)),
            }
        }
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::REMOTE_ENVIRONMENT_URL;

    #[test]
    fn test_defaults() {
        let config = SceneConfiguration::default();
        assert_eq!(config.asset_base_path, "/ddm-files");
        assert_eq!(config.ambient_light_intensity, 0.45);
        assert!(config.show_ground && config.show_water);
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.highlight_index, None);
    }

    #[test]
    fn test_environment_url_derivation() {
        let mut config = SceneConfiguration::default();
        assert_eq!(
            config.environment_url(),
            "/ddm-files/public/autumn_field_puresky_4k.hdr"
        );

        config.environment_url = Some(REMOTE_ENVIRONMENT_URL.to_string());
        assert_eq!(config.environment_url(), REMOTE_ENVIRONMENT_URL);
    }

    #[test]
    fn test_texture_urls_follow_base_path() {
        let config = SceneConfiguration {
            asset_base_path: "/api/plugins/rpatt-3dmodel-app/resources/assets/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.ground_texture_url(),
            "/api/plugins/rpatt-3dmodel-app/resources/assets/public/ground.jpg"
        );
        assert_eq!(
            config.water_normals_url(),
            "/api/plugins/rpatt-3dmodel-app/resources/assets/public/waternormals.jpeg"
        );
    }

    #[test]
    fn test_plan_contains_every_element() {
        let plan = SceneConfiguration::default().plan();

        assert_eq!(plan.len(), 9);
        assert!(matches!(plan[0], SceneElement::Camera { .. }));
        assert!(matches!(
            plan[1],
            SceneElement::CameraIntro { duration_ms: 1200, .. }
        ));
        assert!(plan.iter().any(|e| matches!(e, SceneElement::Sky(_))));
        assert!(matches!(
            plan.last(),
            Some(SceneElement::AmbientLight { intensity }) if *intensity == 0.45
        ));
    }

    #[test]
    fn test_hidden_ground_and_water_request_nothing() {
        let config = SceneConfiguration {
            show_ground: false,
            show_water: false,
            ..Default::default()
        };

        let plan = config.plan();
        assert!(!plan.iter().any(|e| matches!(e, SceneElement::Ground { .. })));
        assert!(!plan.iter().any(|e| matches!(e, SceneElement::Ocean { .. })));

        let urls = config.asset_urls();
        assert!(!urls.iter().any(|u| u.ends_with("ground.jpg")));
        assert!(!urls.iter().any(|u| u.ends_with("waternormals.jpeg")));
        assert!(urls.iter().any(|u| u.ends_with("generic_fou.glb")));
    }

    #[test]
    fn test_ocean_params_are_fixed() {
        let config = SceneConfiguration {
            water_position: [0.0, -10.0, 0.0],
            ..Default::default()
        };
        let ocean = config
            .plan()
            .into_iter()
            .find_map(|e| match e {
                SceneElement::Ocean { position, params, .. } => Some((position, params)),
                _ => None,
            })
            .unwrap();

        assert_eq!(ocean.0, [0.0, -10.0, 0.0]);
        assert_eq!(ocean.1.flow_speed, 0.05);
        assert_eq!(ocean.1.reflectivity, 0.4);
        assert_eq!(ocean.1.scale, 100.0);
    }

    #[test]
    fn test_host_json_contract() {
        let json = r#"{
            "assetBasePath": "/assets",
            "highlightIndex": 0,
            "ambientLight": 0.8,
            "showWater": false,
            "models": [{ "name": "Foundation", "url": "data/demo/generic_fou.glb" }]
        }"#;
        let config: SceneConfiguration = serde_json::from_str(json).unwrap();

        assert_eq!(config.asset_base_path, "/assets");
        assert_eq!(config.highlight_index, Some(0));
        assert_eq!(config.ambient_light_intensity, 0.8);
        assert!(!config.show_water);
        assert!(config.show_ground);
        assert_eq!(config.water_position, DEFAULT_WATER_POSITION);
        assert_eq!(config.models.len(), 1);
        assert!(config.prepared_models()[0].highlighted);
    }
}
