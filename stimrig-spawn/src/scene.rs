use nalgebra::{UnitQuaternion, Vector3};

/// Primitives the host scene-graph runtime exposes to the spawn engine.
///
/// The engine materializes and retires entities exclusively through
/// this trait; rendering, cameras and colliders live on the host side.
/// All calls happen on the single host update thread.
pub trait SceneHost {
    /// Opaque handle to a live scene node.
    type Entity: Copy + PartialEq + std::fmt::Debug;
    /// Loaded asset handle, instantiable any number of times.
    type Asset: Clone;

    /// Finds a root-level node by name.
    fn find_node(&self, name: &str) -> Option<Self::Entity>;
    /// Creates an empty root-level node.
    fn create_node(&mut self, name: &str) -> Self::Entity;

    /// Instantiates `asset` at `position` with identity rotation,
    /// parented under `parent`. Children keep attachment order.
    fn instantiate(
        &mut self,
        asset: &Self::Asset,
        parent: Self::Entity,
        position: Vector3<f32>,
    ) -> Self::Entity;

    fn set_uniform_scale(&mut self, entity: Self::Entity, scale: f32);
    fn set_rotation(&mut self, entity: Self::Entity, rotation: UnitQuaternion<f32>);

    /// Active camera position in world space.
    fn camera_position(&self) -> Vector3<f32>;

    /// Adds a highlight/halo capability if the entity lacks one.
    fn ensure_highlight(&mut self, entity: Self::Entity);

    fn has_collider(&self, entity: Self::Entity) -> bool;
    /// Attaches a default box-shaped bounding volume.
    fn add_box_collider(&mut self, entity: Self::Entity);

    /// Persists the originating stimulus index as inspectable metadata.
    fn tag_stimulus_index(&mut self, entity: Self::Entity, stim_index: i32);
    fn stimulus_index(&self, entity: Self::Entity) -> Option<i32>;

    /// Live children of `entity`, in attachment order.
    fn children(&self, entity: Self::Entity) -> Vec<Self::Entity>;
    /// Destroys `entity` and detaches it from its parent.
    fn destroy(&mut self, entity: Self::Entity);
}
