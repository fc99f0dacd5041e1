//! Session files: one task template plus the trials to run against it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use stimrig_core::{ExperimentDefinition, StateDefinition, TrialConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionFile {
    pub task: ExperimentDefinition,
    /// Stimulus index -> asset name, the resolver table for this session.
    pub stimulus_map: HashMap<i32, String>,
    pub trials: Vec<TrialConfig>,
}

impl SessionFile {
    /// Distinct asset names referenced by the stimulus map, the set the
    /// spawn engine's catalog must carry.
    pub fn asset_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stimulus_map.values().cloned().collect();
        names.sort();
        names.dedup();
        names
    }
}

pub fn load(path: &Path) -> anyhow::Result<SessionFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading session file {}", path.display()))?;
    let session: SessionFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing session file {}", path.display()))?;
    Ok(session)
}

/// Visual-search demo task: sample, delay, distractors, search choice.
pub fn demo_task() -> ExperimentDefinition {
    ExperimentDefinition::new(
        "VSM",
        vec![
            StateDefinition::new("trial_start").ttl(10).hold(0.1),
            StateDefinition::new("sample_on").stimulus().ttl(21).hold(0.5),
            StateDefinition::new("post_sample_delay").delay().hold(1.0),
            StateDefinition::new("distractors_on").stimulus().ttl(22).hold(0.75),
            StateDefinition::new("pre_target_delay")
                .clear_all()
                .delay()
                .hold(0.25),
            StateDefinition::new("search_choice")
                .stimulus()
                .choice()
                .ttl(30)
                .hold(2.0),
            StateDefinition::new("feedback").feedback().ttl(40).hold(0.5),
            StateDefinition::new("trial_end").clear_all().ttl(90),
        ],
    )
}

/// Randomized session used when no file is given on the command line.
pub fn demo_session(trial_count: usize) -> SessionFile {
    let mut rng = rand::rng();

    let stimulus_map: HashMap<i32, String> = (1..=8)
        .map(|i| (i, format!("stim_{i:02}")))
        .collect();

    let trials = (0..trial_count)
        .map(|t| {
            let search_count = 3;
            TrialConfig {
                trial_id: format!("T{:03}", t + 1),
                block_count: 1,
                display_sample_duration: 0.5,
                post_sample_delay_duration: 1.0,
                display_post_sample_distractors_duration: 0.75,
                pre_target_delay_duration: 0.25,
                sample_stim_index: rng.random_range(1..=4),
                sample_stim_location: Vector3::new(0.0, 1.0, 2.0),
                search_stim_indices: (0..search_count)
                    .map(|_| rng.random_range(1..=8))
                    .collect(),
                search_stim_locations: (0..search_count)
                    .map(|i| {
                        Vector3::new(
                            i as f32 - 1.0,
                            rng.random_range(-0.5..0.5),
                            2.0,
                        )
                    })
                    .collect(),
                search_stim_token_reward: (0..search_count)
                    .map(|_| rng.random_range(0..=2) as f32)
                    .collect(),
                post_sample_distractor_stim_indices: vec![
                    rng.random_range(5..=8),
                    rng.random_range(5..=8),
                ],
                post_sample_distractor_stim_locations: vec![
                    Vector3::new(-0.5, 0.5, 2.0),
                    Vector3::new(0.5, 0.5, 2.0),
                ],
            }
        })
        .collect();

    SessionFile {
        task: demo_task(),
        stimulus_map,
        trials,
    }
}
