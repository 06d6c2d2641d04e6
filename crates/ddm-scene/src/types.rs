//! Shared resources and conversions

use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use ddm_core::{is_absolute_url, AssetLoads, SceneConfiguration};

/// Active scene configuration. Changing it re-syncs the models, the
/// highlight and the ambient light.
#[derive(Debug, Clone, Resource, Deref, DerefMut)]
pub struct SceneSettings(pub SceneConfiguration);

/// Load status of every asset the scene has requested
#[derive(Debug, Clone, Default, Resource, Deref, DerefMut)]
pub struct SceneLoads(pub AssetLoads);

/// Set by the host when its own UI owns the pointer this frame; orbit
/// controls ignore input while it is `true`
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct PointerCaptured(pub bool);

/// Map a resolved asset URL onto a Bevy asset path.
///
/// Absolute URLs are passed through to the `https` asset source. Local
/// URLs are relative to the page origin, which is where the asset plugin
/// is rooted, so the leading `/` is dropped.
pub fn bevy_asset_path(url: &str) -> String {
    if is_absolute_url(url) {
        return url.to_string();
    }
    url.strip_prefix('/').unwrap_or(url).to_string()
}

/// Linear sampler that tiles the texture in both directions
pub fn repeat_sampler() -> ImageSampler {
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..ImageSamplerDescriptor::linear()
    })
}

pub fn to_vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

pub fn to_color([r, g, b]: [f32; 3]) -> Color {
    Color::srgb(r, g, b)
}
