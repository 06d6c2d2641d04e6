//! Host page settings and URL overrides

use bevy::prelude::*;
use ddm_core::{ModelDescriptor, SceneConfiguration, REMOTE_ENVIRONMENT_URL};

/// Plugin id of the hosting dashboard app
pub const PLUGIN_ID: &str = "rpatt-3dmodel-app";

pub const PAGE_TITLE: &str = "Interactive 3D model viewer";

pub const PAGE_DESCRIPTION: &str = "Ground, ocean, sky and HDRI environment around a set of GLB \
models. Drag to orbit, right-drag to pan and scroll to zoom. Models, highlight, lighting and \
visible elements can be changed from the page URL without touching the scene wiring.";

/// Static content of the page around the canvas
#[derive(Debug, Clone, Resource)]
pub struct HostPage {
    pub title: String,
    pub description: String,
    /// Target of the "Back" link
    pub back_url: String,
}

impl Default for HostPage {
    fn default() -> Self {
        Self {
            title: PAGE_TITLE.to_string(),
            description: PAGE_DESCRIPTION.to_string(),
            back_url: format!("/a/{}/one", PLUGIN_ID),
        }
    }
}

/// Scene settings the page starts from, before URL overrides
pub fn host_defaults() -> SceneConfiguration {
    SceneConfiguration {
        environment_url: Some(REMOTE_ENVIRONMENT_URL.to_string()),
        highlight_index: Some(0),
        ..Default::default()
    }
}

/// Apply `?assets=&highlight=&ambient=&ground=&water=&environment=&models=`
/// overrides. Values that do not parse are skipped and reported.
pub fn apply_overrides(
    mut config: SceneConfiguration,
    param: impl Fn(&str) -> Option<String>,
) -> (SceneConfiguration, Vec<String>) {
    let mut rejected = Vec::new();

    if let Some(assets) = param("assets") {
        let assets = assets.trim();
        if assets.is_empty() {
            rejected.push("assets: empty".to_string());
        } else {
            config.asset_base_path = assets.to_string();
        }
    }

    if let Some(highlight) = param("highlight") {
        match highlight.trim() {
            "" | "none" => config.highlight_index = None,
            value => match value.parse::<usize>() {
                Ok(index) => config.highlight_index = Some(index),
                Err(_) => rejected.push(format!("highlight: {}", value)),
            },
        }
    }

    if let Some(ambient) = param("ambient") {
        match ambient.trim().parse::<f32>() {
            Ok(intensity) if intensity.is_finite() && intensity >= 0.0 => {
                config.ambient_light_intensity = intensity;
            }
            _ => rejected.push(format!("ambient: {}", ambient)),
        }
    }

    if let Some(ground) = param("ground") {
        match parse_flag(&ground) {
            Some(show) => config.show_ground = show,
            None => rejected.push(format!("ground: {}", ground)),
        }
    }

    if let Some(water) = param("water") {
        match parse_flag(&water) {
            Some(show) => config.show_water = show,
            None => rejected.push(format!("water: {}", water)),
        }
    }

    if let Some(environment) = param("environment") {
        match environment.trim() {
            // HDRI under the asset base path
            "" | "local" => config.environment_url = None,
            url => config.environment_url = Some(url.to_string()),
        }
    }

    if let Some(models) = param("models") {
        match serde_json::from_str::<Vec<ModelDescriptor>>(&models) {
            Ok(models) => config.models = models,
            Err(e) => rejected.push(format!("models: {}", e)),
        }
    }

    (config, rejected)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Scene settings for this page load
pub fn page_configuration() -> SceneConfiguration {
    let (config, rejected) = apply_overrides(host_defaults(), query_param);
    for reason in rejected {
        tracing::warn!("Ignoring URL parameter {}", reason);
    }
    config
}

#[cfg(target_arch = "wasm32")]
fn query_param(name: &str) -> Option<String> {
    let href = web_sys::window()?.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    url.search_params().get(name)
}

#[cfg(not(target_arch = "wasm32"))]
fn query_param(_name: &str) -> Option<String> {
    None
}
