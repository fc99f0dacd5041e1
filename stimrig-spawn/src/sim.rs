//! In-memory scene graph used by tests and headless sessions.

use nalgebra::{UnitQuaternion, Vector3};

use crate::scene::SceneHost;

/// Slot index into the sim node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimEntity(usize);

/// Asset handle in the sim: just its catalog name.
#[derive(Debug, Clone, PartialEq)]
pub struct SimAsset {
    pub name: String,
}

impl SimAsset {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug)]
struct SimNode {
    name: String,
    parent: Option<SimEntity>,
    children: Vec<SimEntity>,
    position: Vector3<f32>,
    rotation: UnitQuaternion<f32>,
    scale: f32,
    highlight: bool,
    collider: bool,
    stim_index: Option<i32>,
    alive: bool,
}

impl SimNode {
    fn new(name: String, parent: Option<SimEntity>, position: Vector3<f32>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            position,
            rotation: UnitQuaternion::identity(),
            scale: 1.0,
            highlight: false,
            collider: false,
            stim_index: None,
            alive: true,
        }
    }
}

/// Minimal scene-graph runtime: an arena of nodes plus a camera.
#[derive(Debug)]
pub struct SimScene {
    nodes: Vec<SimNode>,
    roots: Vec<SimEntity>,
    camera: Vector3<f32>,
}

impl SimScene {
    pub fn new() -> Self {
        Self::with_camera(Vector3::new(0.0, 1.5, 0.0))
    }

    pub fn with_camera(camera: Vector3<f32>) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            camera,
        }
    }

    pub fn set_camera(&mut self, camera: Vector3<f32>) {
        self.camera = camera;
    }

    pub fn name(&self, entity: SimEntity) -> &str {
        &self.nodes[entity.0].name
    }

    pub fn position(&self, entity: SimEntity) -> Vector3<f32> {
        self.nodes[entity.0].position
    }

    pub fn rotation(&self, entity: SimEntity) -> UnitQuaternion<f32> {
        self.nodes[entity.0].rotation
    }

    pub fn scale(&self, entity: SimEntity) -> f32 {
        self.nodes[entity.0].scale
    }

    pub fn is_highlighted(&self, entity: SimEntity) -> bool {
        self.nodes[entity.0].highlight
    }

    pub fn is_alive(&self, entity: SimEntity) -> bool {
        self.nodes[entity.0].alive
    }

    /// Count of live nodes across the whole scene.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.alive).count()
    }

    fn push_node(&mut self, node: SimNode) -> SimEntity {
        let entity = SimEntity(self.nodes.len());
        self.nodes.push(node);
        entity
    }
}

impl Default for SimScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost for SimScene {
    type Entity = SimEntity;
    type Asset = SimAsset;

    fn find_node(&self, name: &str) -> Option<SimEntity> {
        self.roots
            .iter()
            .copied()
            .find(|&e| self.nodes[e.0].alive && self.nodes[e.0].name == name)
    }

    fn create_node(&mut self, name: &str) -> SimEntity {
        let entity = self.push_node(SimNode::new(name.to_owned(), None, Vector3::zeros()));
        self.roots.push(entity);
        entity
    }

    fn instantiate(
        &mut self,
        asset: &SimAsset,
        parent: SimEntity,
        position: Vector3<f32>,
    ) -> SimEntity {
        let entity = self.push_node(SimNode::new(asset.name.clone(), Some(parent), position));
        self.nodes[parent.0].children.push(entity);
        entity
    }

    fn set_uniform_scale(&mut self, entity: SimEntity, scale: f32) {
        self.nodes[entity.0].scale = scale;
    }

    fn set_rotation(&mut self, entity: SimEntity, rotation: UnitQuaternion<f32>) {
        self.nodes[entity.0].rotation = rotation;
    }

    fn camera_position(&self) -> Vector3<f32> {
        self.camera
    }

    fn ensure_highlight(&mut self, entity: SimEntity) {
        self.nodes[entity.0].highlight = true;
    }

    fn has_collider(&self, entity: SimEntity) -> bool {
        self.nodes[entity.0].collider
    }

    fn add_box_collider(&mut self, entity: SimEntity) {
        self.nodes[entity.0].collider = true;
    }

    fn tag_stimulus_index(&mut self, entity: SimEntity, stim_index: i32) {
        self.nodes[entity.0].stim_index = Some(stim_index);
    }

    fn stimulus_index(&self, entity: SimEntity) -> Option<i32> {
        self.nodes[entity.0].stim_index
    }

    fn children(&self, entity: SimEntity) -> Vec<SimEntity> {
        self.nodes[entity.0]
            .children
            .iter()
            .copied()
            .filter(|&c| self.nodes[c.0].alive)
            .collect()
    }

    fn destroy(&mut self, entity: SimEntity) {
        if let Some(parent) = self.nodes[entity.0].parent {
            self.nodes[parent.0].children.retain(|&c| c != entity);
        }
        // Children go down with their parent.
        let children = std::mem::take(&mut self.nodes[entity.0].children);
        for child in children {
            self.destroy(child);
        }
        self.nodes[entity.0].alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenting_keeps_attachment_order() {
        let mut scene = SimScene::new();
        let root = scene.create_node("container");
        let a = scene.instantiate(&SimAsset::new("apple"), root, Vector3::zeros());
        let b = scene.instantiate(&SimAsset::new("banana"), root, Vector3::zeros());
        assert_eq!(scene.children(root), vec![a, b]);
    }

    #[test]
    fn destroy_detaches_and_kills_subtree() {
        let mut scene = SimScene::new();
        let root = scene.create_node("container");
        let a = scene.instantiate(&SimAsset::new("apple"), root, Vector3::zeros());
        let nested = scene.instantiate(&SimAsset::new("leaf"), a, Vector3::zeros());

        scene.destroy(a);
        assert!(scene.children(root).is_empty());
        assert!(!scene.is_alive(a));
        assert!(!scene.is_alive(nested));
        assert!(scene.is_alive(root));
    }

    #[test]
    fn find_node_ignores_destroyed_roots() {
        let mut scene = SimScene::new();
        let root = scene.create_node("container");
        assert_eq!(scene.find_node("container"), Some(root));
        scene.destroy(root);
        assert_eq!(scene.find_node("container"), None);
    }
}
