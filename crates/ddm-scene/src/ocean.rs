//! Ocean surface with flowing normals

use bevy::image::ImageLoaderSettings;
use bevy::math::Affine2;
use bevy::prelude::*;
use ddm_core::{AssetLoads, WaterParams};

use crate::boundary::{poll_boundaries, AssetBoundary, Revealed};
use crate::types::{bevy_asset_path, repeat_sampler, to_color, to_vec3};

/// Boundary entity for the ocean, placed at the configured water position
#[derive(Component)]
pub struct Ocean {
    pub normals: Handle<Image>,
    pub params: WaterParams,
}

/// The visible water mesh, spawned once the normal map has loaded
#[derive(Component)]
pub struct OceanSurface {
    pub params: WaterParams,
}

pub struct OceanPlugin;

impl Plugin for OceanPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (reveal_ocean.after(poll_boundaries), animate_ocean));
    }
}

pub fn spawn_ocean(
    commands: &mut Commands,
    asset_server: &AssetServer,
    loads: &mut AssetLoads,
    url: String,
    position: [f32; 3],
    params: WaterParams,
) -> Entity {
    let normals: Handle<Image> = asset_server.load_with_settings(
        bevy_asset_path(&url),
        |settings: &mut ImageLoaderSettings| {
            settings.is_srgb = false;
            settings.sampler = repeat_sampler();
        },
    );
    let boundary = AssetBoundary::request(url, &normals, loads);

    commands
        .spawn((
            Name::new("Ocean"),
            Ocean { normals, params },
            boundary,
            Transform::from_translation(to_vec3(position)),
            Visibility::default(),
        ))
        .id()
}

/// Normal map placement after `elapsed_secs` of flow
pub fn flow_transform(params: &WaterParams, elapsed_secs: f32) -> Affine2 {
    let tiles = params.size / params.scale.max(f32::EPSILON);
    let offset = params.flow_offset(elapsed_secs);
    Affine2::from_scale_angle_translation(Vec2::splat(tiles), 0.0, Vec2::splat(offset))
}

pub fn ocean_material(normals: Handle<Image>, params: &WaterParams) -> StandardMaterial {
    StandardMaterial {
        base_color: to_color(params.color_rgb()),
        normal_map_texture: Some(normals),
        perceptual_roughness: 0.08,
        reflectance: params.reflectivity,
        uv_transform: flow_transform(params, 0.0),
        ..default()
    }
}

fn reveal_ocean(
    mut commands: Commands,
    oceans: Query<(Entity, &AssetBoundary, &Ocean), (Without<Revealed>, Changed<AssetBoundary>)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, boundary, ocean) in &oceans {
        if boundary.failure().is_some() {
            commands.entity(entity).insert(Revealed);
            continue;
        }
        if !boundary.is_ready() {
            continue;
        }

        let size = ocean.params.size;
        let mut mesh = Mesh::from(Plane3d::default().mesh().size(size, size));
        // Normal mapping needs tangents
        if let Err(err) = mesh.generate_tangents() {
            tracing::warn!("Ocean mesh has no tangents: {}", err);
        }
        let material = materials.add(ocean_material(ocean.normals.clone(), &ocean.params));

        commands.entity(entity).insert(Revealed).with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(material),
                Transform::default(),
                OceanSurface {
                    params: ocean.params,
                },
            ));
        });
        tracing::info!(url = %boundary.url, "Ocean revealed");
    }
}

fn animate_ocean(
    surfaces: Query<(&OceanSurface, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    time: Res<Time>,
) {
    let elapsed = time.elapsed_secs();
    for (surface, material) in &surfaces {
        if let Some(material) = materials.get_mut(&material.0) {
            material.uv_transform = flow_transform(&surface.params, elapsed);
        }
    }
}
