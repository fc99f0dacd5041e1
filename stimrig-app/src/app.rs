use std::path::Path;

use anyhow::Result;
use nalgebra::Vector3;
use tracing::{info, warn};

use stimrig_core::TaskCatalog;
use stimrig_daq::LogEmitter;
use stimrig_sequencer::{SequencerEvent, TrialSequencer};
use stimrig_spawn::{MapResolver, SimAsset, SimScene, SpawnEngine};
use stimrig_timing::ManualClock;

use crate::session::{self, SessionFile};

const DEMO_TRIALS: usize = 6;

/// Headless session runner: dry-runs every trial of a session against
/// the sim scene, advancing a manual clock through each state's hold
/// instead of waiting in real time.
pub struct App {
    session: SessionFile,
}

#[derive(Debug, Default)]
struct SessionStats {
    trials_completed: usize,
    trials_failed: usize,
    stimuli_spawned: usize,
    ttl_markers: usize,
}

impl App {
    pub fn new(session_path: Option<&str>) -> Result<Self> {
        let session = match session_path {
            Some(path) => session::load(Path::new(path))?,
            None => session::demo_session(DEMO_TRIALS),
        };
        Ok(Self { session })
    }

    pub fn run(self) -> Result<()> {
        println!("=== STIMRIG SESSION RUNNER ===");
        println!("Task: {}", self.session.task.acronym);
        println!(
            "States: {}, trials: {}\n",
            self.session.task.states.len(),
            self.session.trials.len()
        );

        let mut catalog = TaskCatalog::new();
        catalog.register(self.session.task.clone())?;
        let definition = catalog
            .get(&self.session.task.acronym)
            .ok_or_else(|| anyhow::anyhow!("task vanished from catalog"))?;

        let resolver: MapResolver = self
            .session
            .stimulus_map
            .iter()
            .map(|(&index, name)| (index, name.clone()))
            .collect();

        let mut engine = SpawnEngine::new(
            SimScene::with_camera(Vector3::new(0.0, 1.5, -1.0)),
            resolver,
        );
        engine.initialize(
            self.session
                .asset_names()
                .into_iter()
                .map(|name| (name.clone(), SimAsset::new(name))),
        );

        let clock = ManualClock::new();
        let mut sequencer =
            TrialSequencer::new(definition, engine, LogEmitter, clock.clone())?;

        let mut stats = SessionStats::default();
        for trial in &self.session.trials {
            match sequencer.begin_trial(trial.clone()) {
                Ok(events) => record(&events, &mut stats),
                Err(err) => {
                    warn!(trial_id = %trial.trial_id, %err, "skipping malformed trial");
                    stats.trials_failed += 1;
                    continue;
                }
            }
            while !sequencer.is_idle() {
                let hold = sequencer
                    .current_state()
                    .map(|s| s.post_state_delay)
                    .unwrap_or(0.0);
                clock.advance_secs(hold + 0.001);
                record(&sequencer.update(), &mut stats);
            }
        }

        println!("\nSession summary");
        println!("  trials completed: {}", stats.trials_completed);
        println!("  trials skipped:   {}", stats.trials_failed);
        println!("  stimuli spawned:  {}", stats.stimuli_spawned);
        println!("  TTL markers:      {}", stats.ttl_markers);
        Ok(())
    }
}

fn record(events: &[SequencerEvent], stats: &mut SessionStats) {
    for event in events {
        match event {
            SequencerEvent::StateEntered { name, index } => {
                info!(state = %name, index, "entered");
            }
            SequencerEvent::TtlEmitted { .. } => stats.ttl_markers += 1,
            SequencerEvent::TtlFailed { code } => {
                warn!(code, "TTL marker dropped");
            }
            SequencerEvent::StimuliSpawned { count } => stats.stimuli_spawned += count,
            SequencerEvent::TrialComplete { trial_id } => {
                info!(%trial_id, "trial complete");
                stats.trials_completed += 1;
            }
            SequencerEvent::TrialAborted { trial_id } => {
                warn!(%trial_id, "trial aborted");
            }
            _ => {}
        }
    }
}
