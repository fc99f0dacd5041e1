pub mod sequencer;

pub use sequencer::{SequencerEvent, TrialSequencer};
