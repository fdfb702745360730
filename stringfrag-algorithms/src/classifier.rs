//! Primary hadron and first-emission classification.
//!
//! Given one hadronized event, the classifier:
//! 1. collects the primary hadrons (status magnitude 81-89), in index order;
//! 2. flags the ones whose mothers are the two ordered string endpoints;
//! 3. orders them by production time, falling back to the record index
//!    when the engine did not store a production vertex;
//! 4. takes the maximal prefix produced within [`SIMULTANEITY_TOLERANCE`]
//!    of the earliest one as the first-emission group;
//! 5. groups that prefix by mother pair;
//! 6. classifies each first emission by direction, pT and energy fraction;
//! 7. ranks all primaries by append order.
//!
//! The computation is pure: the event is only read.

use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use stringfrag_core::event::Event;
use stringfrag_core::particle::{MotherPair, ParticleRecord};
use stringfrag_core::seed::SeedString;

/// Production times closer than this are treated as simultaneous.
pub const SIMULTANEITY_TOLERANCE: f64 = 1e-10;

/// |pz| above this labels a hadron as moving along the string axis.
pub const LONGITUDINAL_THRESHOLD: f64 = 0.1;

/// Classifier configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifierConfig {
    /// Total energy of the seed string, the denominator of the z estimate.
    pub string_energy: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::from_seed(&SeedString::default())
    }
}

impl ClassifierConfig {
    /// Derives the string energy from the injected partons.
    #[must_use]
    pub fn from_seed(seed: &SeedString) -> Self {
        Self {
            string_energy: seed.string_energy(),
        }
    }

    /// Sets the string energy explicitly.
    #[must_use]
    pub fn with_string_energy(mut self, string_energy: f64) -> Self {
        self.string_energy = string_energy;
        self
    }
}

/// Where a production time came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingSource {
    /// The `t` component of the production vertex.
    Vertex,
    /// The record index, used when no vertex is stored. Only orders
    /// records by append position; it is not a time.
    IndexProxy,
}

/// Longitudinal direction of a hadron relative to the string axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// `pz` above the threshold.
    Positive,
    /// `pz` below minus the threshold.
    Negative,
    /// Neither.
    Transverse,
}

impl Direction {
    /// Classifies `pz` with strict thresholds: exactly ±0.1 is transverse.
    #[must_use]
    pub fn from_pz(pz: f64) -> Self {
        if pz > LONGITUDINAL_THRESHOLD {
            Self::Positive
        } else if pz < -LONGITUDINAL_THRESHOLD {
            Self::Negative
        } else {
            Self::Transverse
        }
    }

    /// Short label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Transverse => "transverse",
        }
    }
}

/// A primary hadron with its derived ancestry and timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimaryHadron {
    /// Index of the record in the event.
    pub index: usize,
    /// Status code, copied for reporting.
    pub status: i32,
    /// Mothers are the two ordered string endpoints.
    pub from_string_fragmentation: bool,
    /// Production time (vertex `t` or index proxy).
    pub production_time: f64,
    /// Where `production_time` came from.
    pub timing: TimingSource,
}

impl PrimaryHadron {
    #[allow(clippy::cast_precision_loss)]
    fn from_record(index: usize, record: &ParticleRecord) -> Self {
        let (production_time, timing) = match record.production_vertex {
            Some(vertex) => (vertex.t, TimingSource::Vertex),
            None => (index as f64, TimingSource::IndexProxy),
        };
        Self {
            index,
            status: record.status,
            from_string_fragmentation: record.from_string_fragmentation(),
            production_time,
            timing,
        }
    }

    fn time_order(&self, other: &Self) -> Ordering {
        self.production_time
            .total_cmp(&other.production_time)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Kinematics of one member of the first-emission group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FirstEmission {
    /// Index of the record in the event.
    pub index: usize,
    /// Longitudinal direction from `pz`.
    pub direction: Direction,
    /// Transverse momentum.
    pub pt: f64,
    /// Energy over string energy.
    pub z_fraction: f64,
    /// Whether the record carries a production vertex.
    pub has_vertex: bool,
    /// Time used for ordering.
    pub production_time: f64,
}

/// A primary hadron's position in append order (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankedHadron {
    /// 1-based rank.
    pub rank: usize,
    /// Index of the record in the event.
    pub index: usize,
}

/// Full result for an event with at least one primary hadron.
#[derive(Clone, Debug, PartialEq)]
pub struct FirstEmissionAnalysis {
    /// All primary hadrons, in index order.
    pub primaries: Vec<PrimaryHadron>,
    /// The same hadrons ordered by `(production_time, index)`.
    pub time_ordered: Vec<PrimaryHadron>,
    /// Simultaneous earliest emissions; never empty.
    pub first_emission: Vec<FirstEmission>,
    /// First-emission indices grouped by mother pair.
    pub ancestry: BTreeMap<MotherPair, Vec<usize>>,
    /// All primaries ranked by append order.
    pub sequence: Vec<RankedHadron>,
}

impl FirstEmissionAnalysis {
    /// Earliest production time.
    #[must_use]
    pub fn earliest_time(&self) -> f64 {
        self.time_ordered
            .first()
            .map_or(f64::NAN, |h| h.production_time)
    }

    /// True if any primary hadron was timed by the index proxy.
    #[must_use]
    pub fn used_index_proxy(&self) -> bool {
        self.primaries
            .iter()
            .any(|h| h.timing == TimingSource::IndexProxy)
    }

    /// True if more than one hadron was emitted first.
    #[must_use]
    pub fn is_simultaneous(&self) -> bool {
        self.first_emission.len() > 1
    }

    /// Event indices of the first-emission group, in time order.
    pub fn first_emission_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.first_emission.iter().map(|f| f.index)
    }
}

/// Outcome of classifying one event.
#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
    /// The event has no primary hadrons. A normal outcome.
    NoPrimaryHadrons,
    /// At least one primary hadron was found.
    Classified(FirstEmissionAnalysis),
}

impl Classification {
    /// Returns the analysis, if the event had primary hadrons.
    #[must_use]
    pub fn analysis(&self) -> Option<&FirstEmissionAnalysis> {
        match self {
            Self::NoPrimaryHadrons => None,
            Self::Classified(analysis) => Some(analysis),
        }
    }

    /// Number of first-emission hadrons (zero for an empty event).
    #[must_use]
    pub fn first_emission_count(&self) -> usize {
        self.analysis().map_or(0, |a| a.first_emission.len())
    }
}

/// Primary hadron / first-emission classifier.
#[derive(Clone, Debug, Default)]
pub struct PrimaryHadronClassifier {
    config: ClassifierConfig,
}

impl PrimaryHadronClassifier {
    /// Create with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Get current configuration.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies one event.
    #[must_use]
    pub fn classify(&self, event: &Event) -> Classification {
        // Positions, not stored indices, identify records.
        let primaries: Vec<PrimaryHadron> = event
            .iter()
            .enumerate()
            .filter(|(_, record)| record.is_primary_hadron())
            .map(|(index, record)| PrimaryHadron::from_record(index, record))
            .collect();

        if primaries.is_empty() {
            return Classification::NoPrimaryHadrons;
        }

        let mut time_ordered = primaries.clone();
        time_ordered.sort_by(PrimaryHadron::time_order);

        let earliest = time_ordered[0].production_time;
        let first_count = time_ordered
            .iter()
            .take_while(|h| h.production_time - earliest <= SIMULTANEITY_TOLERANCE)
            .count()
            .max(1);

        let mut ancestry: BTreeMap<MotherPair, Vec<usize>> = BTreeMap::new();
        let first_emission: Vec<FirstEmission> = time_ordered[..first_count]
            .iter()
            .map(|hadron| {
                let record = &event[hadron.index];
                ancestry
                    .entry(record.mothers())
                    .or_default()
                    .push(hadron.index);
                FirstEmission {
                    index: hadron.index,
                    direction: Direction::from_pz(record.pz()),
                    pt: record.pt(),
                    z_fraction: record.e() / self.config.string_energy,
                    has_vertex: record.production_vertex.is_some(),
                    production_time: hadron.production_time,
                }
            })
            .collect();

        let sequence = primaries
            .iter()
            .enumerate()
            .map(|(i, hadron)| RankedHadron {
                rank: i + 1,
                index: hadron.index,
            })
            .collect();

        let analysis = FirstEmissionAnalysis {
            primaries,
            time_ordered,
            first_emission,
            ancestry,
            sequence,
        };

        if analysis.used_index_proxy() {
            debug!("production vertex missing, ordering by record index");
        }

        Classification::Classified(analysis)
    }
}

/// Classifies one event with the given configuration.
#[must_use]
pub fn classify_event(event: &Event, config: &ClassifierConfig) -> Classification {
    PrimaryHadronClassifier::with_config(config.clone()).classify(event)
}
