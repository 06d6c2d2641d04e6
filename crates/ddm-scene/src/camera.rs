//! Camera, intro transition and orbit navigation

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use ddm_core::{CameraPlacement, LensParams, Tween};
use std::time::Duration;

use crate::types::{to_vec3, PointerCaptured, SceneSettings};

/// Bevy ambient brightness per unit of configured intensity
pub const AMBIENT_BRIGHTNESS_SCALE: f32 = 400.0;

const MIN_POLAR: f32 = 0.01;
const MAX_POLAR: f32 = std::f32::consts::PI - 0.01;
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 5000.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for camera motion
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                advance_camera_intro,
                orbit_camera.after(advance_camera_intro),
                update_ambient_light,
            ),
        );
    }
}

pub fn spawn_camera(commands: &mut Commands, initial: CameraPlacement, lens: LensParams) -> Entity {
    commands
        .spawn((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: lens.fov_degrees.to_radians(),
                far: lens.far,
                ..default()
            }),
            Transform::from_translation(to_vec3(initial.position))
                .looking_at(to_vec3(initial.target), Vec3::Y),
            MainCamera,
        ))
        .id()
}

pub fn ambient_light(intensity: f32) -> AmbientLight {
    AmbientLight {
        color: Color::WHITE,
        brightness: intensity * AMBIENT_BRIGHTNESS_SCALE,
        ..default()
    }
}

/// One-shot camera move played once after mount
#[derive(Resource, Debug, Clone)]
pub struct CameraIntro {
    position: Tween,
    target: Tween,
    elapsed: Duration,
    finished: bool,
}

impl CameraIntro {
    pub fn new(from: CameraPlacement, to: CameraPlacement, duration_ms: u64) -> Self {
        let duration = Duration::from_millis(duration_ms);
        Self {
            position: Tween::new(from.position, to.position, duration),
            target: Tween::new(from.target, to.target, duration),
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    /// Step the transition and return the current (position, target)
    pub fn advance(&mut self, delta: Duration) -> (Vec3, Vec3) {
        self.elapsed += delta;
        if self.position.is_finished(self.elapsed) {
            self.finished = true;
        }
        (
            to_vec3(self.position.sample(self.elapsed)),
            to_vec3(self.target.sample(self.elapsed)),
        )
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Damped orbit around a target point, Y up
#[derive(Resource, Debug, Clone)]
pub struct OrbitControls {
    /// Fraction of the pending motion applied each frame
    pub damping: f32,
    pub target: Vec3,
    pub radius: f32,
    /// Angle around +Y, measured from +Z
    pub azimuth: f32,
    /// Angle down from +Y
    pub polar: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    azimuth_delta: f32,
    polar_delta: f32,
    pan_delta: Vec3,
    active: bool,
}

impl OrbitControls {
    pub fn new(damping: f32) -> Self {
        Self {
            damping: damping.clamp(0.01, 1.0),
            target: Vec3::ZERO,
            radius: 10.0,
            azimuth: 0.0,
            polar: std::f32::consts::FRAC_PI_2,
            rotate_speed: 0.005,
            pan_speed: 0.002,
            zoom_speed: 0.1,
            azimuth_delta: 0.0,
            polar_delta: 0.0,
            pan_delta: Vec3::ZERO,
            active: false,
        }
    }

    /// Take over from a camera at `position` looking at `target`
    pub fn focus_on(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        self.target = target;
        self.radius = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.azimuth = offset.x.atan2(offset.z);
        self.polar = (offset.y / offset.length().max(f32::EPSILON))
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(MIN_POLAR, MAX_POLAR);
        self.azimuth_delta = 0.0;
        self.polar_delta = 0.0;
        self.pan_delta = Vec3::ZERO;
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drag in pixels
    pub fn rotate(&mut self, drag: Vec2) {
        self.azimuth_delta -= drag.x * self.rotate_speed;
        self.polar_delta -= drag.y * self.rotate_speed;
    }

    /// Drag in pixels; the scene follows the pointer
    pub fn pan(&mut self, drag: Vec2) {
        let right = Vec3::new(self.azimuth.cos(), 0.0, -self.azimuth.sin());
        let up = self.direction().cross(right);
        let scale = self.radius * self.pan_speed;
        self.pan_delta += (-right * drag.x + up * drag.y) * scale;
    }

    /// Positive lines zoom in
    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - self.zoom_speed).powf(lines);
        self.radius = (self.radius * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Apply one frame of damped motion
    pub fn update(&mut self) {
        self.azimuth += self.azimuth_delta * self.damping;
        self.polar = (self.polar + self.polar_delta * self.damping).clamp(MIN_POLAR, MAX_POLAR);
        self.target += self.pan_delta * self.damping;

        let decay = 1.0 - self.damping;
        self.azimuth_delta *= decay;
        self.polar_delta *= decay;
        self.pan_delta *= decay;
    }

    /// Unit vector from the target towards the camera
    fn direction(&self) -> Vec3 {
        Vec3::new(
            self.polar.sin() * self.azimuth.sin(),
            self.polar.cos(),
            self.polar.sin() * self.azimuth.cos(),
        )
    }

    pub fn position(&self) -> Vec3 {
        self.target + self.direction() * self.radius
    }
}

fn advance_camera_intro(
    intro: Option<ResMut<CameraIntro>>,
    controls: Option<ResMut<OrbitControls>>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
    time: Res<Time>,
) {
    let Some(mut intro) = intro else { return };
    if intro.is_finished() {
        return;
    }
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };

    let (position, target) = intro.advance(time.delta());
    *transform = Transform::from_translation(position).looking_at(target, Vec3::Y);

    if intro.is_finished() {
        tracing::debug!("Camera intro finished");
        if let Some(mut controls) = controls {
            controls.focus_on(position, target);
        }
    }
}

fn orbit_camera(
    controls: Option<ResMut<OrbitControls>>,
    intro: Option<Res<CameraIntro>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    captured: Res<PointerCaptured>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let Some(mut controls) = controls else { return };
    if intro.is_some_and(|intro| !intro.is_finished()) {
        return;
    }
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };

    if !controls.is_active() {
        controls.focus_on(transform.translation, Vec3::ZERO);
    }

    if !captured.0 {
        if mouse_button.pressed(MouseButton::Left) {
            controls.rotate(mouse_motion.delta);
        }
        if mouse_button.pressed(MouseButton::Right) {
            controls.pan(mouse_motion.delta);
        }
        let lines = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / 100.0,
        };
        if lines != 0.0 {
            controls.zoom(lines);
        }
    }

    controls.update();
    *transform = Transform::from_translation(controls.position()).looking_at(controls.target, Vec3::Y);
}

fn update_ambient_light(
    settings: Res<SceneSettings>,
    mut lights: Query<&mut AmbientLight, With<MainCamera>>,
) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }
    for mut light in &mut lights {
        light.brightness = settings.ambient_light_intensity * AMBIENT_BRIGHTNESS_SCALE;
    }
}
