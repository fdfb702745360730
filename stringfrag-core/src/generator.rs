//! Boundary to the external event-generation engine.

use crate::error::GenerationError;
use crate::event::Event;
use std::collections::VecDeque;

/// Source of hadronized events.
///
/// Each call either yields a fully populated event or a
/// [`GenerationError`]. A `Failed` outcome is per-event: callers skip the
/// iteration and ask for the next event.
pub trait EventGenerator {
    /// Produces the next event.
    fn generate_next(&mut self) -> Result<Event, GenerationError>;

    /// Returns the name of the generator.
    fn name(&self) -> &'static str;
}

/// A generator that replays pre-recorded outcomes in order.
///
/// Returns `Exhausted` once every outcome has been handed out.
#[derive(Debug, Clone, Default)]
pub struct RecordedEvents {
    outcomes: VecDeque<Result<Event, GenerationError>>,
}

impl RecordedEvents {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successfully generated event.
    pub fn push_event(&mut self, event: Event) {
        self.outcomes.push_back(Ok(event));
    }

    /// Queues a failed generation call.
    pub fn push_failure(&mut self, reason: impl Into<String>) {
        self.outcomes
            .push_back(Err(GenerationError::Failed(reason.into())));
    }

    /// Number of outcomes not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }
}

impl FromIterator<Event> for RecordedEvents {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().map(Ok).collect(),
        }
    }
}

impl EventGenerator for RecordedEvents {
    fn generate_next(&mut self) -> Result<Event, GenerationError> {
        self.outcomes
            .pop_front()
            .unwrap_or(Err(GenerationError::Exhausted))
    }

    fn name(&self) -> &'static str {
        "Recorded"
    }
}
