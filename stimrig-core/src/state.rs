use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One state in a task's finite-state sequence.
///
/// State kinds are modeled as independent capability flags on a single
/// record rather than a subtype hierarchy; a state legitimately combines
/// roles (a stimulus state that also emits a TTL code, for instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateDefinition {
    pub name: String,
    #[serde(rename = "IsTTL", default)]
    pub is_ttl: bool,
    #[serde(default)]
    pub is_stimulus: bool,
    #[serde(default)]
    pub is_delay: bool,
    #[serde(default)]
    pub is_choice: bool,
    #[serde(default)]
    pub is_feedback: bool,
    #[serde(default)]
    pub is_clear_all: bool,
    /// Emitted to the acquisition hardware on entry, meaningful iff `is_ttl`.
    #[serde(rename = "TTLCode", default)]
    pub ttl_code: i32,
    /// Seconds held after the state's primary action before moving on.
    #[serde(default)]
    pub post_state_delay: f64,
}

impl StateDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_ttl: false,
            is_stimulus: false,
            is_delay: false,
            is_choice: false,
            is_feedback: false,
            is_clear_all: false,
            ttl_code: 0,
            post_state_delay: 0.0,
        }
    }

    pub fn ttl(mut self, code: i32) -> Self {
        self.is_ttl = true;
        self.ttl_code = code;
        self
    }

    pub fn stimulus(mut self) -> Self {
        self.is_stimulus = true;
        self
    }

    pub fn delay(mut self) -> Self {
        self.is_delay = true;
        self
    }

    pub fn choice(mut self) -> Self {
        self.is_choice = true;
        self
    }

    pub fn feedback(mut self) -> Self {
        self.is_feedback = true;
        self
    }

    pub fn clear_all(mut self) -> Self {
        self.is_clear_all = true;
        self
    }

    /// Sets `post_state_delay`, in seconds.
    pub fn hold(mut self, seconds: f64) -> Self {
        self.post_state_delay = seconds;
        self
    }
}

/// A named task: the ordered state sequence applied to every trial of
/// that task. Loaded once and shared read-only across trials; linear
/// transitions state\[i\] -> state\[i+1\], any branching is host-owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExperimentDefinition {
    pub acronym: String,
    pub states: Vec<StateDefinition>,
}

impl ExperimentDefinition {
    pub fn new(acronym: impl Into<String>, states: Vec<StateDefinition>) -> Self {
        Self {
            acronym: acronym.into(),
            states,
        }
    }

    /// Rejects empty sequences, duplicate state names and negative delays.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.states.is_empty() {
            return Err(ConfigError::EmptyStateSequence(self.acronym.clone()));
        }
        for (i, state) in self.states.iter().enumerate() {
            if self.states[..i].iter().any(|s| s.name == state.name) {
                return Err(ConfigError::DuplicateStateName {
                    acronym: self.acronym.clone(),
                    name: state.name.clone(),
                });
            }
            if state.post_state_delay < 0.0 {
                return Err(ConfigError::NegativeDuration {
                    field: "PostStateDelay",
                    value: state.post_state_delay,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_on_one_record() {
        let state = StateDefinition::new("sample_on").stimulus().ttl(21).hold(0.5);
        assert!(state.is_stimulus);
        assert!(state.is_ttl);
        assert_eq!(state.ttl_code, 21);
        assert!(!state.is_choice);
        assert_eq!(state.post_state_delay, 0.5);
    }

    #[test]
    fn duplicate_state_name_rejected() {
        let def = ExperimentDefinition::new(
            "VSM",
            vec![
                StateDefinition::new("delay").delay(),
                StateDefinition::new("delay").delay(),
            ],
        );
        assert_eq!(
            def.validate(),
            Err(ConfigError::DuplicateStateName {
                acronym: "VSM".into(),
                name: "delay".into(),
            })
        );
    }

    #[test]
    fn empty_sequence_rejected() {
        let def = ExperimentDefinition::new("EMP", vec![]);
        assert_eq!(
            def.validate(),
            Err(ConfigError::EmptyStateSequence("EMP".into()))
        );
    }

    #[test]
    fn negative_post_state_delay_rejected() {
        let def = ExperimentDefinition::new(
            "NEG",
            vec![StateDefinition::new("wait").delay().hold(-1.0)],
        );
        assert!(matches!(
            def.validate(),
            Err(ConfigError::NegativeDuration {
                field: "PostStateDelay",
                ..
            })
        ));
    }

    #[test]
    fn ttl_code_uses_wire_name() {
        let json = serde_json::to_value(StateDefinition::new("go").ttl(40)).unwrap();
        assert!(json.get("TTLCode").is_some());
        assert!(json.get("IsTTL").is_some());
    }
}
