use std::sync::Arc;
use std::time::Duration;

use nalgebra::Vector3;
use tracing::warn;

use stimrig_core::{ConfigError, ExperimentDefinition, StateDefinition, TrialConfig};
use stimrig_daq::TtlEmitter;
use stimrig_spawn::{SceneHost, SpawnEngine, StimulusResolver};
use stimrig_timing::Clock;

/// Events surfaced to the host per tick, in occurrence order.
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    TrialStarted { trial_id: String },
    StateEntered { name: String, index: usize },
    TtlEmitted { code: i32 },
    TtlFailed { code: i32 },
    Cleared,
    StimuliSpawned { count: usize },
    ChoiceRecorded { state: String },
    TrialComplete { trial_id: String },
    TrialAborted { trial_id: String },
}

struct ActiveTrial {
    config: TrialConfig,
    state_index: usize,
    /// Clock reading at which the current state's hold expires.
    deadline_ns: u64,
    awaiting_choice: bool,
}

/// Drives one task's state sequence over successive trials.
///
/// Tick-driven from the host update loop: `begin_trial` enters state 0,
/// each `update` advances linearly once the active state's
/// `post_state_delay` deadline passes. On state entry the TTL code goes
/// out first, then any clear, then any spawn, and only then is the
/// delay deadline stamped, so hardware markers always precede the
/// countdown they bracket.
pub struct TrialSequencer<S, R, E, C>
where
    S: SceneHost,
    R: StimulusResolver,
    E: TtlEmitter,
    C: Clock,
{
    definition: Arc<ExperimentDefinition>,
    engine: SpawnEngine<S, R>,
    ttl: E,
    clock: C,
    trial: Option<ActiveTrial>,
}

impl<S, R, E, C> TrialSequencer<S, R, E, C>
where
    S: SceneHost,
    R: StimulusResolver,
    E: TtlEmitter,
    C: Clock,
{
    /// Validates the task definition up front; a malformed template
    /// never gets to run a trial.
    pub fn new(
        definition: Arc<ExperimentDefinition>,
        engine: SpawnEngine<S, R>,
        ttl: E,
        clock: C,
    ) -> Result<Self, ConfigError> {
        definition.validate()?;
        Ok(Self {
            definition,
            engine,
            ttl,
            clock,
            trial: None,
        })
    }

    /// Validates and installs the next trial, entering state 0.
    /// A trial still active at this point is aborted and its stimuli
    /// cleared first. `ConfigError` aborts only this trial's setup.
    pub fn begin_trial(
        &mut self,
        config: TrialConfig,
    ) -> Result<Vec<SequencerEvent>, ConfigError> {
        config.validate()?;

        let mut events = Vec::new();
        if let Some(active) = self.trial.take() {
            self.engine.clear_all();
            events.push(SequencerEvent::TrialAborted {
                trial_id: active.config.trial_id,
            });
        }
        events.push(SequencerEvent::TrialStarted {
            trial_id: config.trial_id.clone(),
        });
        self.trial = Some(ActiveTrial {
            config,
            state_index: 0,
            deadline_ns: 0,
            awaiting_choice: false,
        });
        self.enter_state(0, &mut events);
        Ok(events)
    }

    /// One host tick: advances past the current state once its deadline
    /// has elapsed. Choice states time out here too; earlier resolution
    /// comes through [`TrialSequencer::report_choice`].
    pub fn update(&mut self) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        let Some(trial) = &self.trial else {
            return events;
        };
        if self.clock.now_ns() < trial.deadline_ns {
            return events;
        }
        let next = trial.state_index + 1;
        self.advance_to(next, &mut events);
        events
    }

    /// Resolves an active choice state immediately.
    pub fn report_choice(&mut self) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        let Some(trial) = &self.trial else {
            return events;
        };
        if !trial.awaiting_choice {
            return events;
        }
        let state = self.definition.states[trial.state_index].name.clone();
        let next = trial.state_index + 1;
        events.push(SequencerEvent::ChoiceRecorded { state });
        self.advance_to(next, &mut events);
        events
    }

    /// Cancels the active trial, clearing the stimulus container so the
    /// next trial starts from a clean scene wherever the abort landed.
    pub fn abort_trial(&mut self) -> Option<SequencerEvent> {
        let trial = self.trial.take()?;
        self.engine.clear_all();
        Some(SequencerEvent::TrialAborted {
            trial_id: trial.config.trial_id,
        })
    }

    fn advance_to(&mut self, next: usize, events: &mut Vec<SequencerEvent>) {
        if next >= self.definition.states.len() {
            if let Some(trial) = self.trial.take() {
                events.push(SequencerEvent::TrialComplete {
                    trial_id: trial.config.trial_id,
                });
            }
        } else {
            self.enter_state(next, events);
        }
    }

    fn enter_state(&mut self, index: usize, events: &mut Vec<SequencerEvent>) {
        let definition = Arc::clone(&self.definition);
        let state = &definition.states[index];
        events.push(SequencerEvent::StateEntered {
            name: state.name.clone(),
            index,
        });

        // TTL goes out before anything that consumes time in this state.
        if state.is_ttl {
            if self.ttl.emit(state.ttl_code) {
                events.push(SequencerEvent::TtlEmitted {
                    code: state.ttl_code,
                });
            } else {
                warn!(
                    code = state.ttl_code,
                    state = %state.name,
                    "TTL emission failed; continuing with degraded synchronization"
                );
                events.push(SequencerEvent::TtlFailed {
                    code: state.ttl_code,
                });
            }
        }

        if state.is_clear_all {
            self.engine.clear_all();
            events.push(SequencerEvent::Cleared);
        }

        if state.is_stimulus {
            if let Some(trial) = &self.trial {
                let (indices, locations) = stimulus_set(state, &trial.config);
                let spawned = self.engine.spawn_stimuli(&indices, &locations);
                events.push(SequencerEvent::StimuliSpawned {
                    count: spawned.len(),
                });
            }
        }

        let deadline_ns =
            self.clock.now_ns() + Duration::from_secs_f64(state.post_state_delay).as_nanos() as u64;
        if let Some(trial) = &mut self.trial {
            trial.state_index = index;
            trial.deadline_ns = deadline_ns;
            trial.awaiting_choice = state.is_choice;
        }
    }

    pub fn is_idle(&self) -> bool {
        self.trial.is_none()
    }

    pub fn current_state(&self) -> Option<&StateDefinition> {
        self.trial
            .as_ref()
            .map(|t| &self.definition.states[t.state_index])
    }

    pub fn current_trial_id(&self) -> Option<&str> {
        self.trial.as_ref().map(|t| t.config.trial_id.as_str())
    }

    pub fn definition(&self) -> &ExperimentDefinition {
        &self.definition
    }

    pub fn engine(&self) -> &SpawnEngine<S, R> {
        &self.engine
    }

    pub fn ttl(&self) -> &E {
        &self.ttl
    }
}

/// Picks the trial arrays a stimulus state presents. Choice states take
/// the search set; states named after the distractor phase take the
/// post-sample distractors; anything else shows the sample.
fn stimulus_set(
    state: &StateDefinition,
    config: &TrialConfig,
) -> (Vec<i32>, Vec<Vector3<f32>>) {
    let name = state.name.to_ascii_lowercase();
    if name.contains("distractor") {
        (
            config.post_sample_distractor_stim_indices.clone(),
            config.post_sample_distractor_stim_locations.clone(),
        )
    } else if state.is_choice || name.contains("search") || name.contains("target") {
        (
            config.search_stim_indices.clone(),
            config.search_stim_locations.clone(),
        )
    } else {
        (
            vec![config.sample_stim_index],
            vec![config.sample_stim_location],
        )
    }
}
