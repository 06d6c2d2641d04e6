//! HDRI backdrop and sky lighting

use bevy::prelude::*;
use bevy::render::render_resource::TextureFormat;
use ddm_core::{AssetLoads, SkyParams};

use crate::boundary::{poll_boundaries, AssetBoundary, Revealed};
use crate::types::{bevy_asset_path, to_vec3};

/// Radius of the backdrop sphere; inside the camera far plane and outside
/// the ground corners
pub const BACKDROP_RADIUS: f32 = 9000.0;

const SUN_ILLUMINANCE: f32 = 10_000.0;
const SUN_DISTANCE: f32 = 100.0;

/// Boundary entity for the HDRI environment
#[derive(Component)]
pub struct EnvironmentBackdrop {
    pub image: Handle<Image>,
}

/// Marker for the sun light derived from the sky
#[derive(Component)]
pub struct SkySun;

pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, reveal_environment.after(poll_boundaries));
    }
}

pub fn spawn_environment(
    commands: &mut Commands,
    asset_server: &AssetServer,
    loads: &mut AssetLoads,
    url: String,
) -> Entity {
    let image: Handle<Image> = asset_server.load(bevy_asset_path(&url));
    let boundary = AssetBoundary::request(url, &image, loads);

    commands
        .spawn((
            Name::new("Environment"),
            EnvironmentBackdrop { image },
            boundary,
            Transform::default(),
            Visibility::default(),
        ))
        .id()
}

pub fn spawn_sky(commands: &mut Commands, sky: SkyParams) {
    commands.insert_resource(ClearColor(sky_color(&sky)));

    let direction = to_vec3(sky.sun_direction());
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: SUN_ILLUMINANCE,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(direction * SUN_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        SkySun,
    ));
}

/// Flat stand-in for the sky dome, visible wherever the backdrop is not.
/// More Rayleigh scattering deepens the blue, turbidity washes it out.
pub fn sky_color(sky: &SkyParams) -> Color {
    let blue = (sky.rayleigh / 4.0).clamp(0.0, 1.0);
    let haze = (sky.turbidity / 20.0).clamp(0.0, 1.0);
    let r = 0.75 - 0.35 * blue;
    let g = 0.85 - 0.2 * blue;
    let b = 0.95;
    Color::srgb(r + (0.85 - r) * haze, g + (0.85 - g) * haze, b + (0.85 - b) * haze)
}

/// Copy of a 32-bit float panorama in a format WebGPU can filter when
/// bound as a base color texture. Channels stay linear and are clamped
/// to `0..=1`. Other formats are returned as `None`.
pub fn backdrop_image(image: &Image) -> Option<Image> {
    if image.texture_descriptor.format != TextureFormat::Rgba32Float {
        return None;
    }
    let data = image.data.as_deref()?;
    let narrowed = data
        .chunks_exact(4)
        .map(|bytes| {
            let value = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        })
        .collect();

    let mut converted = Image::new(
        image.texture_descriptor.size,
        image.texture_descriptor.dimension,
        narrowed,
        TextureFormat::Rgba8Unorm,
        image.asset_usage,
    );
    converted.sampler = image.sampler.clone();
    Some(converted)
}

fn reveal_environment(
    mut commands: Commands,
    backdrops: Query<
        (Entity, &AssetBoundary, &EnvironmentBackdrop),
        (Without<Revealed>, Changed<AssetBoundary>),
    >,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, boundary, backdrop) in &backdrops {
        if boundary.failure().is_some() {
            commands.entity(entity).insert(Revealed);
            continue;
        }
        if !boundary.is_ready() {
            continue;
        }

        if let Some(image) = images.get_mut(&backdrop.image) {
            if image.texture_descriptor.format == TextureFormat::Rgba32Float {
                match backdrop_image(image) {
                    Some(converted) => *image = converted,
                    None => tracing::warn!(url = %boundary.url, "Could not convert backdrop to a filterable format"),
                }
            }
        }

        let material = materials.add(StandardMaterial {
            base_color_texture: Some(backdrop.image.clone()),
            unlit: true,
            fog_enabled: false,
            cull_mode: None,
            ..default()
        });

        commands.entity(entity).insert(Revealed).with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Sphere::new(BACKDROP_RADIUS).mesh().uv(64, 32))),
                MeshMaterial3d(material),
                // Seen from inside, so mirror to keep the panorama the right way round
                Transform::from_scale(Vec3::new(-1.0, 1.0, 1.0)),
            ));
        });
        tracing::info!(url = %boundary.url, "Environment revealed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::testing::{child_count, is_revealed, settle};
    use crate::types::SceneLoads;
    use bevy::asset::RenderAssetUsages;
    use bevy::render::render_resource::{Extent3d, TextureDimension};
    use ddm_core::{LoadStatus, SKY};

    fn hdr_pixel(rgba: [f32; 4]) -> Image {
        let bytes: Vec<u8> = rgba.iter().flat_map(|c| c.to_le_bytes()).collect();
        Image::new_fill(
            Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            &bytes,
            TextureFormat::Rgba32Float,
            RenderAssetUsages::default(),
        )
    }

    fn environment_app(image: Image) -> (App, Entity, Handle<Image>) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_resource::<SceneLoads>()
            .add_systems(Update, reveal_environment);

        let handle = app.world_mut().resource_mut::<Assets<Image>>().add(image);
        let boundary = {
            let mut loads = app.world_mut().resource_mut::<SceneLoads>();
            AssetBoundary::request("/ddm-files/public/sky.hdr", &handle, &mut loads)
        };
        let backdrop = app
            .world_mut()
            .spawn((
                EnvironmentBackdrop {
                    image: handle.clone(),
                },
                boundary,
                Transform::default(),
            ))
            .id();
        app.update();
        (app, backdrop, handle)
    }

    #[test]
    fn test_backdrop_narrows_float_panorama() {
        let converted = backdrop_image(&hdr_pixel([1.0, 0.5, 0.0, 1.0])).unwrap();
        assert_eq!(converted.texture_descriptor.format, TextureFormat::Rgba8Unorm);
        let data = converted.data.as_deref().unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data, &[255, 128, 0, 255]);

        assert!(backdrop_image(&Image::default()).is_none());
    }

    #[test]
    fn test_backdrop_revealed_with_filterable_texture() {
        let (mut app, backdrop, handle) = environment_app(hdr_pixel([0.2, 0.4, 0.8, 1.0]));
        assert_eq!(child_count(&app, backdrop), 0);

        settle(&mut app, backdrop, LoadStatus::Ready);
        app.update();

        assert_eq!(child_count(&app, backdrop), 1);
        let image = app.world().resource::<Assets<Image>>().get(&handle).unwrap();
        assert_eq!(image.texture_descriptor.format, TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn test_failed_panorama_leaves_no_backdrop() {
        let (mut app, backdrop, handle) = environment_app(hdr_pixel([1.0; 4]));
        settle(&mut app, backdrop, LoadStatus::Failed("blocked".into()));
        app.update();

        assert_eq!(child_count(&app, backdrop), 0);
        assert!(is_revealed(&app, backdrop));
        let image = app.world().resource::<Assets<Image>>().get(&handle).unwrap();
        assert_eq!(image.texture_descriptor.format, TextureFormat::Rgba32Float);
    }

    #[test]
    fn test_sky_color_is_blue() {
        let Srgba { red, blue, .. } = sky_color(&SKY).to_srgba();
        assert!(blue > red);
    }

    #[test]
    fn test_turbidity_washes_out_sky() {
        let clear = sky_color(&SKY).to_srgba();
        let hazy = sky_color(&SkyParams {
            turbidity: 20.0,
            ..SKY
        })
        .to_srgba();
        assert!(hazy.blue - hazy.red < clear.blue - clear.red);
    }
}
