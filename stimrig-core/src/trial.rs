use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-trial timing and stimulus placement record.
///
/// Deserialized once from the trial-generation source, read-only while
/// the trial runs, and replaced when the next trial begins. Call
/// [`TrialConfig::validate`] before handing it to a sequencer; parallel
/// array mismatches must surface at load time, not at spawn time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrialConfig {
    #[serde(rename = "TrialID")]
    pub trial_id: String,
    pub block_count: u32,
    /// Durations in seconds.
    pub display_sample_duration: f64,
    pub post_sample_delay_duration: f64,
    pub display_post_sample_distractors_duration: f64,
    pub pre_target_delay_duration: f64,
    #[serde(default)]
    pub sample_stim_index: i32,
    pub sample_stim_location: Vector3<f32>,
    /// Parallel with `search_stim_locations` and `search_stim_token_reward`.
    pub search_stim_indices: Vec<i32>,
    pub search_stim_locations: Vec<Vector3<f32>>,
    pub search_stim_token_reward: Vec<f32>,
    /// Parallel with `post_sample_distractor_stim_locations`.
    pub post_sample_distractor_stim_indices: Vec<i32>,
    pub post_sample_distractor_stim_locations: Vec<Vector3<f32>>,
}

impl TrialConfig {
    /// Checks the parallel-array and range invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_parallel(
            "SearchStimIndices",
            self.search_stim_indices.len(),
            "SearchStimLocations",
            self.search_stim_locations.len(),
        )?;
        check_parallel(
            "SearchStimIndices",
            self.search_stim_indices.len(),
            "SearchStimTokenReward",
            self.search_stim_token_reward.len(),
        )?;
        check_parallel(
            "PostSampleDistractorStimIndices",
            self.post_sample_distractor_stim_indices.len(),
            "PostSampleDistractorStimLocations",
            self.post_sample_distractor_stim_locations.len(),
        )?;

        for (field, value) in [
            ("DisplaySampleDuration", self.display_sample_duration),
            ("PostSampleDelayDuration", self.post_sample_delay_duration),
            (
                "DisplayPostSampleDistractorsDuration",
                self.display_post_sample_distractors_duration,
            ),
            ("PreTargetDelayDuration", self.pre_target_delay_duration),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeDuration { field, value });
            }
        }

        if self.block_count < 1 {
            return Err(ConfigError::ZeroBlockCount);
        }

        Ok(())
    }

    /// Number of search stimuli described by this trial.
    pub fn search_count(&self) -> usize {
        self.search_stim_indices.len()
    }
}

fn check_parallel(
    field_a: &'static str,
    len_a: usize,
    field_b: &'static str,
    len_b: usize,
) -> Result<(), ConfigError> {
    if len_a != len_b {
        return Err(ConfigError::ParallelLengthMismatch {
            field_a,
            len_a,
            field_b,
            len_b,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_trial() -> TrialConfig {
        TrialConfig {
            trial_id: "T001".into(),
            block_count: 2,
            display_sample_duration: 0.5,
            post_sample_delay_duration: 1.0,
            display_post_sample_distractors_duration: 0.75,
            pre_target_delay_duration: 0.25,
            sample_stim_index: 4,
            sample_stim_location: Vector3::new(0.0, 1.2, 3.0),
            search_stim_indices: vec![1, 2, 3],
            search_stim_locations: vec![
                Vector3::new(-1.0, 0.0, 2.0),
                Vector3::new(0.0, 0.0, 2.0),
                Vector3::new(1.0, 0.0, 2.0),
            ],
            search_stim_token_reward: vec![1.0, 0.0, 2.0],
            post_sample_distractor_stim_indices: vec![7, 8],
            post_sample_distractor_stim_locations: vec![
                Vector3::new(-0.5, 0.5, 2.0),
                Vector3::new(0.5, 0.5, 2.0),
            ],
        }
    }

    #[test]
    fn valid_trial_passes() {
        let trial = base_trial();
        assert_eq!(trial.validate(), Ok(()));
        assert_eq!(trial.search_count(), 3);
    }

    #[test]
    fn search_array_mismatch_rejected() {
        let mut trial = base_trial();
        trial.search_stim_locations.pop();
        assert_eq!(
            trial.validate(),
            Err(ConfigError::ParallelLengthMismatch {
                field_a: "SearchStimIndices",
                len_a: 3,
                field_b: "SearchStimLocations",
                len_b: 2,
            })
        );
    }

    #[test]
    fn reward_array_mismatch_rejected() {
        let mut trial = base_trial();
        trial.search_stim_token_reward.push(0.5);
        assert!(matches!(
            trial.validate(),
            Err(ConfigError::ParallelLengthMismatch {
                field_b: "SearchStimTokenReward",
                ..
            })
        ));
    }

    #[test]
    fn distractor_array_mismatch_rejected() {
        let mut trial = base_trial();
        trial.post_sample_distractor_stim_indices.push(9);
        assert!(matches!(
            trial.validate(),
            Err(ConfigError::ParallelLengthMismatch {
                field_a: "PostSampleDistractorStimIndices",
                ..
            })
        ));
    }

    #[test]
    fn negative_duration_rejected() {
        let mut trial = base_trial();
        trial.pre_target_delay_duration = -0.1;
        assert_eq!(
            trial.validate(),
            Err(ConfigError::NegativeDuration {
                field: "PreTargetDelayDuration",
                value: -0.1,
            })
        );
    }

    #[test]
    fn zero_block_count_rejected() {
        let mut trial = base_trial();
        trial.block_count = 0;
        assert_eq!(trial.validate(), Err(ConfigError::ZeroBlockCount));
    }

    #[test]
    fn wire_field_names_round_trip() {
        let trial = base_trial();
        let json = serde_json::to_value(&trial).unwrap();
        assert!(json.get("TrialID").is_some());
        assert!(json.get("BlockCount").is_some());
        assert!(json.get("DisplaySampleDuration").is_some());
        assert!(json.get("SearchStimTokenReward").is_some());
        assert!(json.get("PostSampleDistractorStimLocations").is_some());

        let back: TrialConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, trial);
    }

    #[test]
    fn sample_stim_index_defaults_to_zero() {
        let mut json = serde_json::to_value(&base_trial()).unwrap();
        json.as_object_mut().unwrap().remove("SampleStimIndex");
        let back: TrialConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.sample_stim_index, 0);
    }
}
