//! Model descriptors and the model manager's highlight rules

use serde::{Deserialize, Serialize};

use crate::asset_path::resolve_model_url;

/// A GLB/GLTF model placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Unique within a scene; used as the model's stable identity
    pub name: String,
    /// Relative to the asset base path, or an absolute URL used verbatim
    pub url: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_show")]
    pub show: bool,
}

fn default_show() -> bool {
    true
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            position: [0.0; 3],
            show: true,
        }
    }

    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.show = false;
        self
    }
}

/// The demo models copied from `ddm-files/data/demo`
pub fn demo_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new("Foundation", "data/demo/generic_fou.glb").at([0.0, -2.0, 0.0]),
        ModelDescriptor::new("Pin piles", "data/demo/generic_pin_piles.glb").at([4.0, -3.0, 0.0]),
    ]
}

/// A visible model ready to be mounted, with its derived highlight flag
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedModel {
    pub descriptor: ModelDescriptor,
    /// Position in the caller's original list (before hidden models were dropped)
    pub source_index: usize,
    /// Fully resolved URL to fetch
    pub url: String,
    pub highlighted: bool,
}

/// Drop hidden models and mark the highlighted one.
///
/// `highlight_index` addresses the original list, so hiding an earlier model
/// never moves the highlight onto a different one. A highlight index that
/// points at a hidden model highlights nothing.
pub fn prepare_models(
    models: &[ModelDescriptor],
    highlight_index: Option<usize>,
    asset_base_path: &str,
) -> Vec<PreparedModel> {
    models
        .iter()
        .enumerate()
        .filter(|(_, model)| model.show)
        .map(|(index, model)| PreparedModel {
            descriptor: model.clone(),
            source_index: index,
            url: resolve_model_url(asset_base_path, &model.url),
            highlighted: highlight_index == Some(index),
        })
        .collect()
}
