//! Deferred reveal of asset-backed elements
//!
//! An element that needs a remote asset is spawned as an empty boundary
//! entity carrying an [`AssetBoundary`]. Its visible children are only
//! added once the asset has loaded, so a slow or failing texture never
//! blocks the rest of the scene.

use bevy::asset::LoadState;
use bevy::prelude::*;
use ddm_core::{AssetLoads, LoadStatus};

use crate::types::SceneLoads;

pub struct BoundaryPlugin;

impl Plugin for BoundaryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, poll_boundaries);
    }
}

/// A pending asset request owned by one scene element
#[derive(Component, Debug, Clone)]
pub struct AssetBoundary {
    /// Resolved URL, as tracked in [`SceneLoads`]
    pub url: String,
    pub handle: UntypedHandle,
    pub status: LoadStatus,
}

/// Marks a boundary whose children have been spawned
#[derive(Component)]
pub struct Revealed;

impl AssetBoundary {
    /// Track a freshly requested asset
    pub fn request<A: Asset>(url: impl Into<String>, handle: &Handle<A>, loads: &mut AssetLoads) -> Self {
        let url = url.into();
        if loads.begin(&url) {
            tracing::debug!(url = %url, "Requested asset");
        }
        Self {
            url,
            handle: handle.clone().untyped(),
            status: LoadStatus::Pending,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == LoadStatus::Ready
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Record the outcome of the load. Only the first outcome counts;
    /// returns whether this call changed anything.
    pub fn settle(&mut self, status: LoadStatus, loads: &mut AssetLoads) -> bool {
        if self.status.is_settled() || !status.is_settled() {
            return false;
        }
        match &status {
            LoadStatus::Failed(reason) => loads.mark_failed(&self.url, reason.clone()),
            _ => loads.mark_ready(&self.url),
        }
        self.status = status;
        true
    }
}

/// Move pending boundaries to ready or failed as the asset server reports
pub fn poll_boundaries(
    asset_server: Res<AssetServer>,
    mut boundaries: Query<&mut AssetBoundary>,
    mut loads: ResMut<SceneLoads>,
) {
    for mut boundary in &mut boundaries {
        if boundary.status.is_settled() {
            continue;
        }

        let status = match asset_server.get_load_state(boundary.handle.id()) {
            Some(LoadState::Loaded) => LoadStatus::Ready,
            Some(LoadState::Failed(err)) => LoadStatus::Failed(err.to_string()),
            _ => continue,
        };

        if boundary.settle(status, &mut loads) {
            match boundary.failure() {
                Some(reason) => tracing::error!(url = %boundary.url, "Failed to load asset: {}", reason),
                None => tracing::info!(url = %boundary.url, "Asset loaded"),
            }
            if loads.all_settled() {
                tracing::info!(total = loads.len(), "All scene assets settled");
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(url: &str, loads: &mut AssetLoads) -> AssetBoundary {
        AssetBoundary::request(url, &Handle::<Image>::default(), loads)
    }

    #[test]
    fn test_request_tracks_url() {
        let mut loads = AssetLoads::new();
        let b = boundary("/ddm-files/public/ground.jpg", &mut loads);
        assert_eq!(b.status, LoadStatus::Pending);
        assert_eq!(loads.outstanding(), 1);
    }

    #[test]
    fn test_first_outcome_wins() {
        let mut loads = AssetLoads::new();
        let mut b = boundary("/a.jpg", &mut loads);

        assert!(!b.settle(LoadStatus::Pending, &mut loads));
        assert!(b.settle(LoadStatus::Failed("404".into()), &mut loads));
        assert!(!b.settle(LoadStatus::Ready, &mut loads));

        assert_eq!(b.failure(), Some("404"));
        assert!(!b.is_ready());
        assert_eq!(loads.status("/a.jpg"), Some(&LoadStatus::Failed("404".into())));
        assert!(loads.all_settled());
    }

    #[test]
    fn test_shared_url_counts_once() {
        let mut loads = AssetLoads::new();
        let mut a = boundary("/m.glb", &mut loads);
        let mut b = boundary("/m.glb", &mut loads);
        assert_eq!(loads.len(), 1);

        assert!(a.settle(LoadStatus::Ready, &mut loads));
        assert!(b.settle(LoadStatus::Ready, &mut loads));
        assert!(a.is_ready() && b.is_ready());
        assert_eq!(loads.outstanding(), 0);
    }
}
