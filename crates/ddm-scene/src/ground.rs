//! Tiled ground plane

use bevy::image::ImageLoaderSettings;
use bevy::math::Affine2;
use bevy::prelude::*;
use ddm_core::{AssetLoads, GroundParams};

use crate::boundary::{poll_boundaries, AssetBoundary, Revealed};
use crate::types::{bevy_asset_path, repeat_sampler};

/// Boundary entity for the ground; sits at the ground elevation
#[derive(Component)]
pub struct GroundPlane {
    pub texture: Handle<Image>,
    pub params: GroundParams,
}

pub struct GroundPlugin;

impl Plugin for GroundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, reveal_ground.after(poll_boundaries));
    }
}

pub fn spawn_ground(
    commands: &mut Commands,
    asset_server: &AssetServer,
    loads: &mut AssetLoads,
    url: String,
    params: GroundParams,
) -> Entity {
    let texture: Handle<Image> = asset_server.load_with_settings(
        bevy_asset_path(&url),
        |settings: &mut ImageLoaderSettings| {
            settings.sampler = repeat_sampler();
        },
    );
    let boundary = AssetBoundary::request(url, &texture, loads);

    commands
        .spawn((
            Name::new("Ground"),
            GroundPlane { texture, params },
            boundary,
            Transform::from_xyz(0.0, params.elevation, 0.0),
            Visibility::default(),
        ))
        .id()
}

pub fn ground_material(texture: Handle<Image>, params: &GroundParams) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        uv_transform: Affine2::from_scale(Vec2::from_array(params.repeat)),
        perceptual_roughness: 1.0,
        reflectance: 0.1,
        ..default()
    }
}

fn reveal_ground(
    mut commands: Commands,
    grounds: Query<(Entity, &AssetBoundary, &GroundPlane), (Without<Revealed>, Changed<AssetBoundary>)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, boundary, ground) in &grounds {
        if boundary.failure().is_some() {
            commands.entity(entity).insert(Revealed);
            continue;
        }
        if !boundary.is_ready() {
            continue;
        }

        let size = ground.params.size;
        let mesh = meshes.add(Plane3d::default().mesh().size(size, size));
        let material = materials.add(ground_material(ground.texture.clone(), &ground.params));

        commands.entity(entity).insert(Revealed).with_children(|parent| {
            parent.spawn((Mesh3d(mesh), MeshMaterial3d(material), Transform::default()));
        });
        tracing::info!(url = %boundary.url, "Ground revealed");
    }
}
