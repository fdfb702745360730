//! stringfrag-algorithms: Event analysis for quark-string hadronization.
//!
//! This crate provides:
//! - **Primary hadron classification** - time-ordered first-emission
//!   resolution with ancestry grouping and kinematic labels
//! - **Selections** - leading pion and first final-state particle
//! - **Statistics** - summaries over first-hadron and final-state momentum samples
//! - **Processing** - sequential and parallel run drivers
//!
#![warn(missing_docs)]

mod classifier;
mod processing;
mod selection;
mod statistics;

pub use classifier::{
    classify_event, Classification, ClassifierConfig, Direction, FirstEmission,
    FirstEmissionAnalysis, PrimaryHadron, PrimaryHadronClassifier, RankedHadron, TimingSource,
    LONGITUDINAL_THRESHOLD, SIMULTANEITY_TOLERANCE,
};
pub use processing::{
    classify_batch, collect_events, for_each_event, run_analysis, tally_classifications,
    NumberedEvent, RunSummary,
};
pub use selection::{first_final, leading_pion};
pub use statistics::{
    FirstHadronSample, FirstHadronSummary, KinematicSample, KinematicSummary, MomentumSample,
    MomentumSummary, Moments, SpeciesCount,
};

// Re-export core event types
pub use stringfrag_core::{Event, EventGenerator, ParticleRecord};
