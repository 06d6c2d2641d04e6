//! GLB model loading, placement and highlight outlines

use bevy::prelude::*;
use ddm_core::{PreparedModel, OUTLINE};
use std::collections::HashMap;

use crate::boundary::{poll_boundaries, AssetBoundary, Revealed};
use crate::types::{bevy_asset_path, to_color, to_vec3, SceneLoads, SceneSettings};

/// World-space thickness of an outline edge per unit of outline width
pub const OUTLINE_THICKNESS: f32 = 0.05;
/// Edge length of the box shown in place of a model that failed to load
pub const PLACEHOLDER_SIZE: f32 = 2.0;

/// Boundary entity for one model, placed at the model's position
#[derive(Component, Debug)]
pub struct ModelSlot {
    /// Index in the configured model list, hidden models included
    pub source_index: usize,
    pub name: String,
    pub url: String,
    pub gltf: Handle<Gltf>,
}

/// Marks the slot of the highlighted model
#[derive(Component)]
pub struct HighlightedModel;

/// Set once a highlighted slot has its outline
#[derive(Component)]
pub struct OutlineBuilt;

/// Box shown instead of a model that could not be loaded
#[derive(Component)]
pub struct ModelPlaceholder;

/// One edge of a highlight outline
#[derive(Component)]
pub struct HighlightOutline {
    pub source_index: usize,
}

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, sync_models)
            .add_systems(Update, reveal_models.after(poll_boundaries).after(sync_models))
            .add_systems(Update, build_outlines.after(reveal_models));
    }
}

/// Bring the model slots in line with the configured model list
pub fn sync_models(
    mut commands: Commands,
    settings: Res<SceneSettings>,
    mut loads: ResMut<SceneLoads>,
    asset_server: Res<AssetServer>,
    slots: Query<(Entity, &ModelSlot, Has<HighlightedModel>)>,
    outlines: Query<(Entity, &HighlightOutline)>,
) {
    if !settings.is_changed() {
        return;
    }

    let prepared = settings.prepared_models();
    let wanted: HashMap<(usize, &str), &PreparedModel> = prepared
        .iter()
        .map(|m| ((m.source_index, m.url.as_str()), m))
        .collect();

    let mut existing = HashMap::new();
    for (entity, slot, highlighted) in &slots {
        let key = (slot.source_index, slot.url.as_str());
        let Some(model) = wanted.get(&key) else {
            tracing::debug!(name = %slot.name, "Removing model");
            commands.entity(entity).despawn();
            // Another slot may still share the URL
            if !prepared.iter().any(|m| m.url == slot.url) && loads.forget(&slot.url) {
                tracing::debug!(url = %slot.url, "Released asset");
            }
            continue;
        };

        commands
            .entity(entity)
            .insert(Transform::from_translation(to_vec3(model.descriptor.position)));

        if model.highlighted != highlighted {
            if model.highlighted {
                commands.entity(entity).insert(HighlightedModel);
            } else {
                despawn_outline(&mut commands, &outlines, slot.source_index);
                commands
                    .entity(entity)
                    .remove::<(HighlightedModel, OutlineBuilt)>();
            }
        }
        existing.insert(key, entity);
    }

    for model in &prepared {
        if existing.contains_key(&(model.source_index, model.url.as_str())) {
            continue;
        }

        let gltf: Handle<Gltf> = asset_server.load(bevy_asset_path(&model.url));
        let boundary = AssetBoundary::request(model.url.clone(), &gltf, &mut loads);
        tracing::info!(name = %model.descriptor.name, url = %model.url, "Loading model");

        let mut slot = commands.spawn((
            Name::new(model.descriptor.name.clone()),
            ModelSlot {
                source_index: model.source_index,
                name: model.descriptor.name.clone(),
                url: model.url.clone(),
                gltf,
            },
            boundary,
            Transform::from_translation(to_vec3(model.descriptor.position)),
            Visibility::default(),
        ));
        if model.highlighted {
            slot.insert(HighlightedModel);
        }
    }
}

fn despawn_outline(commands: &mut Commands, outlines: &Query<(Entity, &HighlightOutline)>, source_index: usize) {
    for (entity, outline) in outlines {
        if outline.source_index == source_index {
            commands.entity(entity).despawn();
        }
    }
}

/// Attach the loaded scene, or a placeholder box if the load failed
fn reveal_models(
    mut commands: Commands,
    slots: Query<(Entity, &AssetBoundary, &ModelSlot), (Without<Revealed>, Changed<AssetBoundary>)>,
    gltf_assets: Res<Assets<Gltf>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, boundary, slot) in &slots {
        if boundary.failure().is_none() && !boundary.is_ready() {
            continue;
        }

        let scene = gltf_assets.get(&slot.gltf).and_then(|gltf| {
            gltf.default_scene
                .clone()
                .or_else(|| gltf.scenes.first().cloned())
        });

        match scene {
            Some(scene) => {
                tracing::info!(name = %slot.name, "Model loaded");
                commands.entity(entity).insert(Revealed).with_children(|parent| {
                    parent.spawn(SceneRoot(scene));
                });
            }
            None => {
                if boundary.is_ready() {
                    tracing::error!(name = %slot.name, "Model has no scenes");
                }
                let material = materials.add(StandardMaterial {
                    base_color: Color::srgb(0.5, 0.5, 0.5),
                    perceptual_roughness: 0.9,
                    ..default()
                });
                commands.entity(entity).insert(Revealed).with_children(|parent| {
                    parent.spawn((
                        Mesh3d(meshes.add(Cuboid::from_length(PLACEHOLDER_SIZE))),
                        MeshMaterial3d(material),
                        Transform::default(),
                        ModelPlaceholder,
                    ));
                });
            }
        }
    }
}

/// Outline highlighted models once their meshes are in the world. The
/// edges are children of the slot, so they move with it.
fn build_outlines(
    mut commands: Commands,
    slots: Query<
        (Entity, &ModelSlot, &GlobalTransform),
        (With<HighlightedModel>, With<Revealed>, Without<OutlineBuilt>),
    >,
    children: Query<&Children>,
    mesh_query: Query<(&Mesh3d, &GlobalTransform), Without<HighlightOutline>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, slot, slot_transform) in &slots {
        let to_local = slot_transform.affine().inverse();
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut found = false;

        for descendant in children.iter_descendants(entity) {
            let Ok((mesh_handle, transform)) = mesh_query.get(descendant) else {
                continue;
            };
            let Some(positions) = meshes
                .get(&mesh_handle.0)
                .and_then(|mesh| mesh.attribute(Mesh::ATTRIBUTE_POSITION))
                .and_then(|values| values.as_float3())
            else {
                continue;
            };
            for position in positions {
                let world = transform.transform_point(Vec3::from_array(*position));
                let local = to_local.transform_point3(world);
                min = min.min(local);
                max = max.max(local);
                found = true;
            }
        }

        // Scene not instantiated yet
        if !found {
            continue;
        }

        let color = to_color(OUTLINE.color_rgb());
        let material = materials.add(StandardMaterial {
            base_color: color,
            emissive: LinearRgba::from(color) * OUTLINE.edge_strength,
            unlit: true,
            ..default()
        });

        let thickness = OUTLINE_THICKNESS * OUTLINE.width;
        let edges: Vec<_> = outline_edges(min, max, thickness)
            .into_iter()
            .map(|(center, size)| (center, meshes.add(Cuboid::new(size.x, size.y, size.z))))
            .collect();

        commands
            .entity(entity)
            .insert(OutlineBuilt)
            .with_children(|parent| {
                for (center, mesh) in edges {
                    parent.spawn((
                        Mesh3d(mesh),
                        MeshMaterial3d(material.clone()),
                        Transform::from_translation(center),
                        HighlightOutline {
                            source_index: slot.source_index,
                        },
                    ));
                }
            });
        tracing::debug!(name = %slot.name, ?min, ?max, "Outline built");
    }
}

/// The 12 edges of the box `min..max` padded by `thickness`, as
/// (center, size) pairs of thin cuboids
pub fn outline_edges(min: Vec3, max: Vec3, thickness: f32) -> [(Vec3, Vec3); 12] {
    let min = min - Vec3::splat(thickness);
    let max = max + Vec3::splat(thickness);
    let size = max - min;
    let mid = (min + max) / 2.0;
    let t = thickness;

    let along_x = Vec3::new(size.x, t, t);
    let along_y = Vec3::new(t, size.y, t);
    let along_z = Vec3::new(t, t, size.z);

    [
        (Vec3::new(mid.x, min.y, min.z), along_x),
        (Vec3::new(mid.x, max.y, min.z), along_x),
        (Vec3::new(mid.x, min.y, max.z), along_x),
        (Vec3::new(mid.x, max.y, max.z), along_x),
        (Vec3::new(min.x, mid.y, min.z), along_y),
        (Vec3::new(max.x, mid.y, min.z), along_y),
        (Vec3::new(min.x, mid.y, max.z), along_y),
        (Vec3::new(max.x, mid.y, max.z), along_y),
        (Vec3::new(min.x, min.y, mid.z), along_z),
        (Vec3::new(max.x, min.y, mid.z), along_z),
        (Vec3::new(min.x, max.y, mid.z), along_z),
        (Vec3::new(max.x, max.y, mid.z), along_z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::testing::{child_count, children_with, is_revealed, settle};
    use bevy::transform::TransformPlugin;
    use ddm_core::{LoadStatus, ModelDescriptor, SceneConfiguration};

    fn app_with(config: SceneConfiguration) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Gltf>()
            .insert_resource(SceneSettings(config))
            .init_resource::<SceneLoads>()
            .add_systems(Update, sync_models);
        app.update();
        app
    }

    fn slots(app: &mut App) -> Vec<(usize, bool)> {
        let mut query = app
            .world_mut()
            .query::<(&ModelSlot, Has<HighlightedModel>)>();
        let mut found: Vec<_> = query
            .iter(app.world())
            .map(|(slot, highlighted)| (slot.source_index, highlighted))
            .collect();
        found.sort();
        found
    }

    #[test]
    fn test_spawns_one_slot_per_visible_model() {
        let mut app = app_with(SceneConfiguration::default());
        assert_eq!(slots(&mut app), vec![(0, false), (1, false)]);
        assert_eq!(app.world().resource::<SceneLoads>().len(), 2);
    }

    #[test]
    fn test_highlight_follows_settings() {
        let mut app = app_with(SceneConfiguration::default());

        app.world_mut().resource_mut::<SceneSettings>().highlight_index = Some(1);
        app.update();
        assert_eq!(slots(&mut app), vec![(0, false), (1, true)]);

        app.world_mut().resource_mut::<SceneSettings>().highlight_index = Some(0);
        app.update();
        assert_eq!(slots(&mut app), vec![(0, true), (1, false)]);
    }

    #[test]
    fn test_hidden_model_keeps_original_index() {
        let config = SceneConfiguration {
            models: vec![
                ModelDescriptor::new("a", "data/a.glb").hidden(),
                ModelDescriptor::new("b", "data/b.glb"),
            ],
            highlight_index: Some(1),
            ..Default::default()
        };
        let mut app = app_with(config);
        assert_eq!(slots(&mut app), vec![(1, true)]);

        app.world_mut().resource_mut::<SceneSettings>().models[0].show = true;
        app.update();
        assert_eq!(slots(&mut app), vec![(0, false), (1, true)]);
    }

    #[test]
    fn test_removed_model_releases_its_load() {
        let mut app = app_with(SceneConfiguration::default());
        let removed = app.world().resource::<SceneSettings>().prepared_models()[1].url.clone();

        app.world_mut().resource_mut::<SceneSettings>().models.truncate(1);
        app.update();

        assert_eq!(slots(&mut app), vec![(0, false)]);
        let loads = app.world().resource::<SceneLoads>();
        assert_eq!(loads.outstanding(), 1);
        assert_eq!(loads.status(&removed), None);
    }

    #[test]
    fn test_shared_url_stays_tracked_while_in_use() {
        let config = SceneConfiguration {
            models: vec![
                ModelDescriptor::new("a", "data/same.glb"),
                ModelDescriptor::new("b", "data/same.glb"),
            ],
            ..Default::default()
        };
        let mut app = app_with(config);
        assert_eq!(app.world().resource::<SceneLoads>().len(), 1);

        app.world_mut().resource_mut::<SceneSettings>().models[0].show = false;
        app.update();
        assert_eq!(slots(&mut app), vec![(1, false)]);
        assert_eq!(app.world().resource::<SceneLoads>().outstanding(), 1);

        app.world_mut().resource_mut::<SceneSettings>().models[1].show = false;
        app.update();
        assert!(slots(&mut app).is_empty());
        assert!(app.world().resource::<SceneLoads>().is_empty());
    }

    fn reveal_app(config: SceneConfiguration) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Gltf>()
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .insert_resource(SceneSettings(config))
            .init_resource::<SceneLoads>()
            .add_systems(Update, (sync_models, reveal_models).chain());
        app.update();
        app
    }

    fn slot_entity(app: &mut App, source_index: usize) -> Entity {
        let mut query = app.world_mut().query::<(Entity, &ModelSlot)>();
        query
            .iter(app.world())
            .find(|(_, slot)| slot.source_index == source_index)
            .map(|(entity, _)| entity)
            .unwrap()
    }

    #[test]
    fn test_failed_model_shows_placeholder() {
        let mut app = reveal_app(SceneConfiguration::default());
        let first = slot_entity(&mut app, 0);
        let second = slot_entity(&mut app, 1);
        assert_eq!(child_count(&app, first), 0);

        settle(&mut app, first, LoadStatus::Failed("404".into()));
        app.update();

        assert_eq!(children_with::<ModelPlaceholder>(&app, first), 1);
        assert!(is_revealed(&app, first));
        assert_eq!(child_count(&app, second), 0);
        assert!(!is_revealed(&app, second));
    }

    #[test]
    fn test_model_without_scene_falls_back_to_placeholder() {
        let mut app = reveal_app(SceneConfiguration::default());
        let first = slot_entity(&mut app, 0);

        // Ready, but no Gltf asset ever reached the store
        settle(&mut app, first, LoadStatus::Ready);
        app.update();
        app.update();

        assert_eq!(children_with::<ModelPlaceholder>(&app, first), 1);
        assert_eq!(child_count(&app, first), 1);
    }

    #[test]
    fn test_outline_follows_slot() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), TransformPlugin))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .add_systems(Update, build_outlines);

        let cube = app
            .world_mut()
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::from_length(2.0));
        let slot = app
            .world_mut()
            .spawn((
                ModelSlot {
                    source_index: 0,
                    name: "cube".into(),
                    url: "/cube.glb".into(),
                    gltf: Handle::default(),
                },
                Revealed,
                Transform::from_xyz(10.0, 0.0, 0.0),
                Visibility::default(),
            ))
            .with_child((Mesh3d(cube), Transform::default()))
            .id();
        app.update();

        app.world_mut().entity_mut(slot).insert(HighlightedModel);
        app.update();
        app.update();

        let mut outlines = app
            .world_mut()
            .query_filtered::<(Entity, &ChildOf, &Transform), With<HighlightOutline>>();
        let edges: Vec<_> = outlines
            .iter(app.world())
            .map(|(entity, parent, transform)| (entity, parent.parent(), transform.translation))
            .collect();
        assert_eq!(edges.len(), 12);

        // Local to the slot, so centered on the origin
        let limit = 1.0 + 2.0 * OUTLINE_THICKNESS * OUTLINE.width;
        for (_, parent, translation) in &edges {
            assert_eq!(*parent, slot);
            assert!(translation.abs().cmple(Vec3::splat(limit)).all());
        }

        app.world_mut()
            .entity_mut(slot)
            .insert(Transform::from_xyz(20.0, 0.0, 0.0));
        app.update();

        for (entity, _, _) in edges {
            let x = app.world().get::<GlobalTransform>(entity).unwrap().translation().x;
            assert!((x - 20.0).abs() <= limit, "edge at {x}");
        }
    }

    #[test]
    fn test_outline_edges_enclose_box() {
        let edges = outline_edges(Vec3::ZERO, Vec3::new(4.0, 2.0, 6.0), 0.5);
        for (center, size) in edges {
            let lo = center - size / 2.0;
            let hi = center + size / 2.0;
            assert!(lo.cmpge(Vec3::splat(-0.75)).all());
            assert!(hi.cmple(Vec3::new(4.75, 2.75, 6.75)).all());
        }
        assert_eq!(edges[0].1, Vec3::new(5.0, 0.5, 0.5));
        assert_eq!(edges[11].0, Vec3::new(4.5, 2.5, 3.0));
    }
}
