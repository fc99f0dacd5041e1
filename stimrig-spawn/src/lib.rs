pub mod catalog;
pub mod engine;
pub mod resolver;
pub mod scene;
pub mod sim;

pub use catalog::AssetCatalog;
pub use engine::{BASE_STIMULUS_SCALE, STIMULUS_CONTAINER, SpawnEngine};
pub use resolver::{MapResolver, StimulusResolver};
pub use scene::SceneHost;
pub use sim::{SimAsset, SimEntity, SimScene};
