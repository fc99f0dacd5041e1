use nalgebra::{UnitQuaternion, Vector3};
use tracing::warn;

use crate::catalog::AssetCatalog;
use crate::resolver::StimulusResolver;
use crate::scene::SceneHost;

/// Uniform scale applied to every spawned stimulus instance.
pub const BASE_STIMULUS_SCALE: f32 = 1.5;

/// Name of the parent node holding all live stimuli for the trial.
pub const STIMULUS_CONTAINER: &str = "StimulusContainer";

/// Materializes and retires stimulus entities for the active trial.
///
/// All spawned entities live under a single named container node, which
/// makes batch clearing a matter of destroying that node's children.
/// Resolution failures are per-item: a bad index is logged and skipped,
/// it never aborts the batch.
pub struct SpawnEngine<S: SceneHost, R: StimulusResolver> {
    scene: S,
    resolver: R,
    catalog: AssetCatalog<S::Asset>,
    container: Option<S::Entity>,
    base_scale: f32,
}

impl<S: SceneHost, R: StimulusResolver> SpawnEngine<S, R> {
    pub fn new(scene: S, resolver: R) -> Self {
        Self {
            scene,
            resolver,
            catalog: AssetCatalog::new(),
            container: None,
            base_scale: BASE_STIMULUS_SCALE,
        }
    }

    /// One-time setup: loads the asset catalog and establishes the
    /// stimulus container, reusing an existing node of that name if the
    /// host scene already has one. Idempotent; a second call is a no-op.
    /// An empty asset set is not fatal, later spawns then fail per item.
    pub fn initialize<I>(&mut self, assets: I)
    where
        I: IntoIterator<Item = (String, S::Asset)>,
    {
        if self.container.is_some() {
            return;
        }
        self.catalog = assets.into_iter().collect();
        if self.catalog.is_empty() {
            warn!("no stimulus assets loaded; every spawn will miss the catalog");
        }
        let container = self
            .scene
            .find_node(STIMULUS_CONTAINER)
            .unwrap_or_else(|| self.scene.create_node(STIMULUS_CONTAINER));
        self.container = Some(container);
    }

    /// Spawns one entity per resolvable index/location pair, returning
    /// handles in input order.
    ///
    /// Always clears previously spawned stimuli first, so the live set
    /// after the call corresponds exactly to this request. A length
    /// mismatch between the two arrays is logged and truncated to the
    /// shorter side rather than rejected; unresolvable indices are
    /// logged and skipped, so the result may be shorter than the input.
    pub fn spawn_stimuli(
        &mut self,
        indices: &[i32],
        locations: &[Vector3<f32>],
    ) -> Vec<S::Entity> {
        self.clear_all();

        let Some(container) = self.container else {
            warn!("spawn engine not initialized; dropping spawn request");
            return Vec::new();
        };

        if indices.len() != locations.len() {
            warn!(
                indices = indices.len(),
                locations = locations.len(),
                "stimulus index/location arrays disagree; truncating to shorter"
            );
        }
        let count = indices.len().min(locations.len());

        let mut spawned = Vec::with_capacity(count);
        for i in 0..count {
            let stim_index = indices[i];
            let Some(asset_name) = self.resolver.lookup(stim_index) else {
                warn!(stim_index, "no asset mapping for stimulus index; skipping");
                continue;
            };
            let Some(asset) = self.catalog.get(asset_name) else {
                warn!(stim_index, asset_name, "asset not in catalog; skipping");
                continue;
            };

            let position = locations[i];
            let entity = self.scene.instantiate(asset, container, position);
            self.scene.set_uniform_scale(entity, self.base_scale);
            // One-shot billboard facing, never updated per frame.
            let facing = billboard_rotation(position, self.scene.camera_position());
            self.scene.set_rotation(entity, facing);
            self.scene.ensure_highlight(entity);
            self.scene.tag_stimulus_index(entity, stim_index);
            if !self.scene.has_collider(entity) {
                self.scene.add_box_collider(entity);
            }
            spawned.push(entity);
        }
        spawned
    }

    /// Destroys every child of the stimulus container back-to-front,
    /// leaving the container itself in place. No-op before `initialize`.
    pub fn clear_all(&mut self) {
        let Some(container) = self.container else {
            return;
        };
        for entity in self.scene.children(container).into_iter().rev() {
            self.scene.destroy(entity);
        }
    }

    /// Live stimulus entities currently under the container.
    pub fn live_stimuli(&self) -> Vec<S::Entity> {
        self.container
            .map(|c| self.scene.children(c))
            .unwrap_or_default()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}

/// Rotation turning an entity's forward axis toward the camera.
fn billboard_rotation(position: Vector3<f32>, camera: Vector3<f32>) -> UnitQuaternion<f32> {
    let dir = camera - position;
    if dir.norm_squared() <= f32::EPSILON {
        return UnitQuaternion::identity();
    }
    UnitQuaternion::face_towards(&dir, &Vector3::y())
}
