//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use ddm_scene::DdmScenePlugin;

use crate::host;
use crate::ui::HostUiPlugin;

/// Run the Bevy application
pub fn run() {
    let configuration = host::page_configuration();
    tracing::info!(
        base = %configuration.asset_base_path,
        models = configuration.models.len(),
        "Starting scene"
    );

    App::new()
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: host::PAGE_TITLE.to_string(),
                    canvas: Some("#ddm-canvas".to_string()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                // Asset URLs are origin-relative
                file_path: "".to_string(),
                // The asset backend serves no .meta files
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        // EguiPlugin looks for picking when it is built
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(DdmScenePlugin::new(configuration))
        .add_plugins(HostUiPlugin)
        .run();
}
