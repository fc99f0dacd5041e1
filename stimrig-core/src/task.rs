use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::state::ExperimentDefinition;

/// Catalog of task templates keyed by acronym.
///
/// Definitions are validated on registration and handed out as shared
/// read-only templates; acronyms are unique across the catalog.
#[derive(Debug, Default)]
pub struct TaskCatalog {
    tasks: HashMap<String, Arc<ExperimentDefinition>>,
}

impl TaskCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: ExperimentDefinition) -> Result<(), ConfigError> {
        definition.validate()?;
        if self.tasks.contains_key(&definition.acronym) {
            return Err(ConfigError::DuplicateAcronym(definition.acronym));
        }
        self.tasks
            .insert(definition.acronym.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, acronym: &str) -> Option<Arc<ExperimentDefinition>> {
        self.tasks.get(acronym).cloned()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateDefinition;

    fn task(acronym: &str) -> ExperimentDefinition {
        ExperimentDefinition::new(acronym, vec![StateDefinition::new("start").ttl(10)])
    }

    #[test]
    fn duplicate_acronym_rejected() {
        let mut catalog = TaskCatalog::new();
        assert_eq!(catalog.register(task("VSM")), Ok(()));
        assert_eq!(
            catalog.register(task("VSM")),
            Err(ConfigError::DuplicateAcronym("VSM".into()))
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn registered_task_is_shared() {
        let mut catalog = TaskCatalog::new();
        catalog.register(task("CDM")).unwrap();
        let a = catalog.get("CDM").unwrap();
        let b = catalog.get("CDM").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(catalog.get("XYZ").is_none());
    }

    #[test]
    fn invalid_definition_not_registered() {
        let mut catalog = TaskCatalog::new();
        let bad = ExperimentDefinition::new("BAD", vec![]);
        assert!(catalog.register(bad).is_err());
        assert!(catalog.is_empty());
    }
}
