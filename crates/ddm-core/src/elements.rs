//! Fixed parameters for the individual scene elements
//!
//! These are the named constants behind the ground plane, ocean, sky,
//! environment, and camera. They are not user-configurable; the scene
//! configuration only decides whether an element is present and where its
//! assets come from.

use serde::{Deserialize, Serialize};

/// Ground texture, relative to the asset base path
pub const GROUND_TEXTURE_PATH: &str = "public/ground.jpg";

/// Water normal map, relative to the asset base path
pub const WATER_NORMALS_PATH: &str = "public/waternormals.jpeg";

/// HDRI environment, relative to the asset base path
pub const ENVIRONMENT_PATH: &str = "public/autumn_field_puresky_4k.hdr";

/// Remote copy of the HDRI environment used by the host page
pub const REMOTE_ENVIRONMENT_URL: &str =
    "https://dl.polyhaven.org/file/ph-assets/HDRIs/hdr/4k/autumn_field_puresky_4k.hdr";

/// Ground plane geometry and tiling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundParams {
    pub size: f32,
    pub elevation: f32,
    pub repeat: [f32; 2],
}

pub const GROUND: GroundParams = GroundParams {
    size: 10000.0,
    elevation: -55.0,
    repeat: [20.0, 20.0],
};

/// Water surface parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterParams {
    pub size: f32,
    pub texture_width: u32,
    pub texture_height: u32,
    pub clip_bias: f32,
    pub flow_speed: f32,
    pub reflectivity: f32,
    pub scale: f32,
    /// Tint as 0xRRGGBB
    pub color: u32,
}

pub const WATER: WaterParams = WaterParams {
    size: 10000.0,
    texture_width: 256,
    texture_height: 256,
    clip_bias: 0.0,
    flow_speed: 0.05,
    reflectivity: 0.4,
    scale: 100.0,
    color: 0xbbbbbb,
};

impl WaterParams {
    /// Tint split into linear 0..1 channels
    pub fn color_rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.color)
    }

    /// Normal map offset after `elapsed_secs` of flow, wrapped into 0..1
    pub fn flow_offset(&self, elapsed_secs: f32) -> f32 {
        (elapsed_secs * self.flow_speed).rem_euclid(1.0)
    }
}

/// Physically parameterized sky dome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyParams {
    pub distance: f32,
    pub sun_position: [f32; 3],
    pub inclination: f32,
    pub azimuth: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    pub rayleigh: f32,
    pub turbidity: f32,
}

pub const SKY: SkyParams = SkyParams {
    distance: 45000.0,
    sun_position: [1000.0, 1000.0, 0.0],
    inclination: 10.0,
    azimuth: 5.0,
    mie_coefficient: 0.05,
    mie_directional_g: 10.0,
    rayleigh: 0.7,
    turbidity: 1.0,
};

impl SkyParams {
    /// Unit vector from the origin towards the sun
    pub fn sun_direction(&self) -> [f32; 3] {
        let [x, y, z] = self.sun_position;
        let length = (x * x + y * y + z * z).sqrt();
        if length <= f32::EPSILON {
            [0.0, 1.0, 0.0]
        } else {
            [x / length, y / length, z / length]
        }
    }
}

/// Outline drawn around the highlighted model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlineParams {
    /// Edge color as 0xRRGGBB
    pub visible_edge_color: u32,
    pub edge_strength: f32,
    pub width: f32,
}

pub const OUTLINE: OutlineParams = OutlineParams {
    visible_edge_color: 0xff0000,
    edge_strength: 3.0,
    width: 1.0,
};

impl OutlineParams {
    pub fn color_rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.visible_edge_color)
    }
}

/// A camera position and the point it looks at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPlacement {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

/// Where the camera is spawned
pub const CAMERA_INITIAL: CameraPlacement = CameraPlacement {
    position: [12.0, 8.0, 14.0],
    target: [0.0, 0.0, 0.0],
};

/// Where the intro transition ends
pub const CAMERA_START: CameraPlacement = CameraPlacement {
    position: [12.0, 8.0, 14.0],
    target: [2.0, 0.0, 0.0],
};

/// Perspective lens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensParams {
    pub fov_degrees: f32,
    pub far: f32,
}

pub const LENS: LensParams = LensParams {
    fov_degrees: 50.0,
    far: 10000.0,
};

/// Duration of the intro camera transition in milliseconds
pub const CAMERA_INTRO_MS: u64 = 1200;

/// Orbit controls damping factor
pub const ORBIT_DAMPING: f32 = 0.2;

fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
