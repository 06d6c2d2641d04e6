//! DDM Scene - 3D scene plugin
//!
//! Mounts a textured ground plane, an animated ocean, a sky, an HDRI
//! environment and a list of GLB models, one of which can be outlined.
//! Every element that needs a remote asset reveals itself on its own once
//! that asset arrives; the rest of the scene keeps rendering meanwhile.

pub mod boundary;
pub mod camera;
pub mod environment;
pub mod ground;
pub mod models;
pub mod ocean;
pub mod types;

use bevy::prelude::*;
use ddm_core::{SceneConfiguration, SceneElement};

use crate::boundary::BoundaryPlugin;
use crate::camera::CameraPlugin;
use crate::environment::EnvironmentPlugin;
use crate::ground::GroundPlugin;
use crate::models::ModelsPlugin;
use crate::ocean::OceanPlugin;

/// Plugin that mounts the whole scene from a [`SceneConfiguration`]
#[derive(Default)]
pub struct DdmScenePlugin {
    pub configuration: SceneConfiguration,
}

impl DdmScenePlugin {
    pub fn new(configuration: SceneConfiguration) -> Self {
        Self { configuration }
    }
}

impl Plugin for DdmScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SceneSettings(self.configuration.clone()))
            .init_resource::<SceneLoads>()
            .init_resource::<PointerCaptured>()
            .add_plugins(BoundaryPlugin)
            .add_plugins(CameraPlugin)
            .add_plugins(EnvironmentPlugin)
            .add_plugins(GroundPlugin)
            .add_plugins(OceanPlugin)
            .add_plugins(ModelsPlugin)
            .add_systems(Startup, mount_scene);
    }
}

/// Walk the composition plan and spawn each element
fn mount_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
    mut loads: ResMut<SceneLoads>,
) {
    let plan = settings.plan();
    tracing::info!(elements = plan.len(), "Mounting scene");

    let mut camera = None;
    for element in plan {
        match element {
            SceneElement::Camera { initial, lens } => {
                camera = Some(camera::spawn_camera(&mut commands, initial, lens));
            }
            SceneElement::CameraIntro {
                from,
                to,
                duration_ms,
            } => {
                commands.insert_resource(camera::CameraIntro::new(from, to, duration_ms));
            }
            // Models follow the settings resource, see models::sync_models
            SceneElement::Models(_) => {}
            SceneElement::OrbitControls { damping } => {
                commands.insert_resource(camera::OrbitControls::new(damping));
            }
            SceneElement::Environment { url } => {
                environment::spawn_environment(&mut commands, &asset_server, &mut loads, url);
            }
            SceneElement::Sky(sky) => {
                environment::spawn_sky(&mut commands, sky);
            }
            SceneElement::Ocean {
                normals_url,
                position,
                params,
            } => {
                ocean::spawn_ocean(
                    &mut commands,
                    &asset_server,
                    &mut loads,
                    normals_url,
                    position,
                    params,
                );
            }
            SceneElement::Ground {
                texture_url,
                params,
            } => {
                ground::spawn_ground(&mut commands, &asset_server, &mut loads, texture_url, params);
            }
            SceneElement::AmbientLight { intensity } => match camera {
                Some(entity) => {
                    commands.entity(entity).insert(camera::ambient_light(intensity));
                }
                None => tracing::warn!("Ambient light requested without a camera"),
            },
        }
    }
}

pub use boundary::AssetBoundary;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::GroundPlane;
    use crate::ocean::Ocean;

    fn mount(config: SceneConfiguration) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .insert_resource(SceneSettings(config))
            .init_resource::<SceneLoads>()
            .add_systems(Startup, mount_scene);
        app.update();
        app
    }

    fn count<C: Component>(app: &mut App) -> usize {
        let mut query = app.world_mut().query_filtered::<Entity, With<C>>();
        query.iter(app.world()).count()
    }

    #[test]
    fn test_mounts_full_scene() {
        let mut app = mount(SceneConfiguration::default());

        assert_eq!(count::<camera::MainCamera>(&mut app), 1);
        assert_eq!(count::<AmbientLight>(&mut app), 1);
        assert_eq!(count::<environment::SkySun>(&mut app), 1);
        assert_eq!(count::<GroundPlane>(&mut app), 1);
        assert_eq!(count::<Ocean>(&mut app), 1);
        assert!(app.world().contains_resource::<camera::CameraIntro>());
        assert!(app.world().contains_resource::<camera::OrbitControls>());

        let loads = app.world().resource::<SceneLoads>();
        assert_eq!(loads.len(), 3);
        assert!(loads
            .status("/ddm-files/public/autumn_field_puresky_4k.hdr")
            .is_some());
    }

    #[test]
    fn test_hidden_ground_and_water_are_never_requested() {
        let mut app = mount(SceneConfiguration {
            show_ground: false,
            show_water: false,
            ..Default::default()
        });

        assert_eq!(count::<GroundPlane>(&mut app), 0);
        assert_eq!(count::<Ocean>(&mut app), 0);

        let loads = app.world().resource::<SceneLoads>();
        assert_eq!(loads.len(), 1);
        assert!(loads.status("/ddm-files/public/ground.jpg").is_none());
        assert!(loads.status("/ddm-files/public/waternormals.jpeg").is_none());
    }

    #[test]
    fn test_ambient_intensity_scales_brightness() {
        let mut app = mount(SceneConfiguration {
            ambient_light_intensity: 1.0,
            ..Default::default()
        });
        let mut query = app.world_mut().query::<&AmbientLight>();
        let light = query.single(app.world()).unwrap();
        assert_eq!(light.brightness, camera::AMBIENT_BRIGHTNESS_SCALE);
    }
}
