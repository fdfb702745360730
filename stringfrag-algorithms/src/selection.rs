//! Simple per-event selections used by the auxiliary drivers.

use stringfrag_core::event::Event;
use stringfrag_core::particle::ParticleRecord;
use stringfrag_core::pdg;

/// The most energetic final-state pion (charged or neutral).
///
/// Only a strictly larger energy replaces the current candidate, so the
/// earliest record wins ties, and pions with non-positive energy are never
/// selected.
#[must_use]
pub fn leading_pion(event: &Event) -> Option<&ParticleRecord> {
    let mut best: Option<&ParticleRecord> = None;
    let mut max_energy = 0.0;
    for particle in event
        .iter()
        .filter(|p| pdg::is_pion(p.pdg_id) && p.is_final())
    {
        if particle.e() > max_energy {
            max_energy = particle.e();
            best = Some(particle);
        }
    }
    best
}

/// The first record in append order that reached the final state.
#[must_use]
pub fn first_final(event: &Event) -> Option<&ParticleRecord> {
    event.iter().find(|p| p.is_final())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringfrag_core::particle::FourVector;

    fn particle(pdg_id: i32, status: i32, e: f64) -> ParticleRecord {
        ParticleRecord::new(pdg_id, status, FourVector::new(0.0, 0.0, e * 0.9, e), 0.14)
    }

    #[test]
    fn test_leading_pion_picks_highest_energy() {
        let event = Event::from_records([
            particle(211, 83, 2.0),
            particle(111, 91, 3.5),
            particle(321, 83, 9.0),
            particle(-211, -83, 8.0),
            particle(-211, 84, 3.0),
        ]);
        assert_eq!(leading_pion(&event).map(|p| p.index), Some(1));
    }

    #[test]
    fn test_leading_pion_first_wins_ties() {
        let event = Event::from_records([particle(211, 83, 2.0), particle(-211, 83, 2.0)]);
        assert_eq!(leading_pion(&event).map(|p| p.index), Some(0));
    }

    #[test]
    fn test_leading_pion_none() {
        let event = Event::from_records([particle(321, 83, 2.0), particle(111, -83, 4.0)]);
        assert!(leading_pion(&event).is_none());
    }

    #[test]
    fn test_first_final() {
        let event = Event::from_records([
            particle(90, -11, 10.0),
            particle(1, -23, 5.0),
            particle(22, 91, 0.2),
            particle(211, 83, 1.0),
        ]);
        assert_eq!(first_final(&event).map(|p| p.index), Some(2));
        assert!(first_final(&Event::new()).is_none());
    }
}
