pub mod error;
pub mod state;
pub mod task;
pub mod trial;

pub use error::ConfigError;
pub use state::{ExperimentDefinition, StateDefinition};
pub use task::TaskCatalog;
pub use trial::TrialConfig;
