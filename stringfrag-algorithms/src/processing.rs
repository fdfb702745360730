//! Run drivers: pull events from a generator and hand them to a sink.
//!
//! Generation failures are logged and skipped; only errors returned by the
//! sink abort a run.

use crate::classifier::{Classification, ClassifierConfig, PrimaryHadronClassifier};
use log::{debug, info, warn};
use rayon::prelude::*;
use stringfrag_core::error::GenerationError;
use stringfrag_core::event::Event;
use stringfrag_core::generator::EventGenerator;

/// Event counts for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Events asked for.
    pub requested: usize,
    /// Events the engine produced.
    pub generated: usize,
    /// Events the engine failed to produce.
    pub failed: usize,
    /// Generated events with at least one primary hadron.
    pub classified: usize,
    /// Generated events without primary hadrons.
    pub empty: usize,
    /// First-emission hadrons over all events.
    pub first_emissions: usize,
}

impl RunSummary {
    fn record_classification(&mut self, classification: &Classification) {
        match classification {
            Classification::NoPrimaryHadrons => self.empty += 1,
            Classification::Classified(analysis) => {
                self.classified += 1;
                self.first_emissions += analysis.first_emission.len();
            }
        }
    }
}

/// An event tagged with its iteration number.
///
/// The number counts generation attempts, so it keeps advancing across
/// failed events.
#[derive(Clone, Debug)]
pub struct NumberedEvent {
    /// Iteration number.
    pub number: usize,
    /// The generated event.
    pub event: Event,
}

/// Requests up to `count` events and calls `sink` for each one generated.
///
/// Stops early if the generator is exhausted.
pub fn for_each_event<G, F, E>(generator: &mut G, count: usize, mut sink: F) -> Result<RunSummary, E>
where
    G: EventGenerator + ?Sized,
    F: FnMut(usize, &Event) -> Result<(), E>,
{
    let mut summary = RunSummary {
        requested: count,
        ..RunSummary::default()
    };

    for number in 0..count {
        match generator.generate_next() {
            Ok(event) => {
                summary.generated += 1;
                sink(number, &event)?;
            }
            Err(GenerationError::Exhausted) => {
                info!(
                    "{} exhausted after {} of {} events",
                    generator.name(),
                    number,
                    count
                );
                break;
            }
            Err(err) => {
                warn!("Event {number}: {err}; skipping");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Generates, classifies and emits events one at a time.
pub fn run_analysis<G, F, E>(
    generator: &mut G,
    count: usize,
    config: &ClassifierConfig,
    mut sink: F,
) -> Result<RunSummary, E>
where
    G: EventGenerator + ?Sized,
    F: FnMut(usize, &Event, &Classification) -> Result<(), E>,
{
    let classifier = PrimaryHadronClassifier::with_config(config.clone());
    let mut counts = RunSummary::default();

    let mut summary = for_each_event(generator, count, |number, event| {
        let classification = classifier.classify(event);
        debug!(
            "Event {number}: {} primary hadron(s) classified, {} first emission(s)",
            classification.analysis().map_or(0, |a| a.primaries.len()),
            classification.first_emission_count()
        );
        counts.record_classification(&classification);
        sink(number, event, &classification)
    })?;

    summary.classified = counts.classified;
    summary.empty = counts.empty;
    summary.first_emissions = counts.first_emissions;
    Ok(summary)
}

/// Drains up to `count` events from the generator into memory.
pub fn collect_events<G>(generator: &mut G, count: usize) -> (Vec<NumberedEvent>, RunSummary)
where
    G: EventGenerator + ?Sized,
{
    let mut events = Vec::with_capacity(count);
    let summary = for_each_event(generator, count, |number, event| {
        events.push(NumberedEvent {
            number,
            event: event.clone(),
        });
        Ok::<(), std::convert::Infallible>(())
    })
    .unwrap_or_else(|never| match never {});
    (events, summary)
}

/// Classifies already generated events in parallel.
///
/// Each event is read-only during classification and results come back in
/// input order.
#[must_use]
pub fn classify_batch(events: &[NumberedEvent], config: &ClassifierConfig) -> Vec<Classification> {
    let classifier = PrimaryHadronClassifier::with_config(config.clone());
    events
        .par_iter()
        .map(|numbered| classifier.classify(&numbered.event))
        .collect()
}

/// Adds the classification counts of a batch to a summary.
pub fn tally_classifications(summary: &mut RunSummary, classifications: &[Classification]) {
    for classification in classifications {
        summary.record_classification(classification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringfrag_core::generator::RecordedEvents;
    use stringfrag_core::particle::{FourVector, ParticleRecord};

    fn event_with_primaries(n: usize) -> Event {
        let mut event = Event::new();
        event.append(ParticleRecord::new(90, -11, FourVector::default(), 10.0));
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64;
            event.append(
                ParticleRecord::new(211, 83, FourVector::new(0.0, 0.0, 1.0, 1.1), 0.14)
                    .with_vertex(FourVector::new(0.0, 0.0, 0.0, t)),
            );
        }
        event
    }

    #[test]
    fn test_failures_are_skipped() {
        let mut generator = RecordedEvents::new();
        generator.push_event(event_with_primaries(2));
        generator.push_failure("no string");
        generator.push_event(event_with_primaries(0));

        let mut seen = Vec::new();
        let summary = run_analysis(
            &mut generator,
            3,
            &ClassifierConfig::default(),
            |number, _, classification| {
                seen.push((number, classification.first_emission_count()));
                Ok::<(), ()>(())
            },
        )
        .unwrap();

        assert_eq!(seen, vec![(0, 1), (2, 0)]);
        assert_eq!(summary.requested, 3);
        assert_eq!(summary.generated, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.classified, 1);
        assert_eq!(summary.empty, 1);
        assert_eq!(summary.first_emissions, 1);
    }

    #[test]
    fn test_exhaustion_stops_early() {
        let mut generator: RecordedEvents = (0..2).map(|_| event_with_primaries(1)).collect();
        let summary = for_each_event(&mut generator, 10, |_, _| Ok::<(), ()>(())).unwrap();
        assert_eq!(summary.requested, 10);
        assert_eq!(summary.generated, 2);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_sink_error_aborts() {
        let mut generator: RecordedEvents = (0..3).map(|_| event_with_primaries(1)).collect();
        let result = for_each_event(&mut generator, 3, |number, _| {
            if number == 1 {
                Err("disk full")
            } else {
                Ok(())
            }
        });
        assert_eq!(result.unwrap_err(), "disk full");
        assert_eq!(generator.remaining(), 1);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let mut generator = RecordedEvents::new();
        for n in [3, 0, 1, 4] {
            generator.push_event(event_with_primaries(n));
        }
        generator.push_failure("hadronization failed");

        let (events, mut summary) = collect_events(&mut generator, 5);
        assert_eq!(events.len(), 4);
        assert_eq!(summary.failed, 1);

        let config = ClassifierConfig::default();
        let parallel = classify_batch(&events, &config);
        let sequential: Vec<Classification> = events
            .iter()
            .map(|e| PrimaryHadronClassifier::with_config(config.clone()).classify(&e.event))
            .collect();
        assert_eq!(parallel, sequential);

        tally_classifications(&mut summary, &parallel);
        assert_eq!(summary.classified, 3);
        assert_eq!(summary.empty, 1);
    }
}
