//! Page chrome and load status overlay using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use ddm_core::AssetLoads;
use ddm_scene::{PointerCaptured, SceneLoads};

use crate::host::HostPage;

pub struct HostUiPlugin;

impl Plugin for HostUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HostPage>()
            // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
            .add_systems(
                EguiPrimaryContextPass,
                (navigation_bar, load_status_overlay, capture_pointer).chain(),
            );
    }
}

/// Top bar: back link, title and the collapsible description
fn navigation_bar(mut contexts: EguiContexts, page: Res<HostPage>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::TopBottomPanel::top("host_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.hyperlink_to("⬅ Back", &page.back_url);
            ui.separator();
            ui.heading(&page.title);
        });
        ui.collapsing("About this page", |ui| {
            ui.label(&page.description);
        });
    });
}

/// Header line of the overlay, `None` once everything has loaded
pub fn overlay_summary(loads: &AssetLoads) -> Option<String> {
    let outstanding = loads.outstanding();
    let failed = loads.failures().count();

    match (outstanding, failed) {
        (0, 0) => None,
        (0, failed) => Some(format!("{} of {} assets failed to load", failed, loads.len())),
        (outstanding, 0) => Some(format!("Loading {} of {} assets", outstanding, loads.len())),
        (outstanding, failed) => Some(format!(
            "Loading {} of {} assets, {} failed",
            outstanding,
            loads.len(),
            failed
        )),
    }
}

fn load_status_overlay(mut contexts: EguiContexts, loads: Res<SceneLoads>) {
    let Some(summary) = overlay_summary(&loads) else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::Window::new("Assets")
        .anchor(egui::Align2::LEFT_BOTTOM, [12.0, -12.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(summary);
            for url in loads.pending() {
                ui.small(url);
            }
            for (url, reason) in loads.failures() {
                ui.colored_label(egui::Color32::RED, url);
                ui.small(reason);
            }
        });
}

/// Keep orbit controls from reacting to drags that belong to the UI
fn capture_pointer(mut contexts: EguiContexts, mut captured: ResMut<PointerCaptured>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    captured.0 = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
}
