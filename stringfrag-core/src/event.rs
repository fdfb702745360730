//! Event record: a flat, append-only arena of particle records.

use crate::error::{Error, Result};
use crate::particle::ParticleRecord;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

/// All particle records produced by one generation call.
///
/// Records are owned here; every cross-reference between them (mothers,
/// daughters, grouping keys) is a plain index into `particles`. Each
/// record's `index` always equals its position, including after
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Event {
    particles: Vec<ParticleRecord>,
}

impl Event {
    /// Creates an empty event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty event with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    /// Builds an event from records, reassigning indices by position.
    #[must_use]
    pub fn from_records<I: IntoIterator<Item = ParticleRecord>>(records: I) -> Self {
        let mut event = Self::new();
        for record in records {
            event.append(record);
        }
        event
    }

    /// Appends a record and returns the index it was assigned.
    pub fn append(&mut self, mut record: ParticleRecord) -> usize {
        let index = self.particles.len();
        record.index = index;
        self.particles.push(record);
        index
    }

    /// Clears the record for the next event.
    pub fn reset(&mut self) {
        self.particles.clear();
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns true if the event holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Returns the record at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ParticleRecord> {
        self.particles.get(index)
    }

    /// Returns the record at `index`, or an error naming the event size.
    pub fn particle(&self, index: usize) -> Result<&ParticleRecord> {
        self.particles.get(index).ok_or(Error::IndexOutOfRange {
            index,
            size: self.particles.len(),
        })
    }

    /// Returns all records as a slice.
    #[must_use]
    pub fn particles(&self) -> &[ParticleRecord] {
        &self.particles
    }

    /// Returns an iterator over the records in index order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticleRecord> {
        self.particles.iter()
    }

    /// Hadrons produced directly by string fragmentation, in index order.
    pub fn primary_hadrons(&self) -> impl Iterator<Item = &ParticleRecord> {
        self.particles.iter().filter(|p| p.is_primary_hadron())
    }

    /// Final-state hadrons, in index order.
    pub fn final_hadrons(&self) -> impl Iterator<Item = &ParticleRecord> {
        self.particles
            .iter()
            .filter(|p| p.is_final() && p.is_hadron())
    }
}

impl Index<usize> for Event {
    type Output = ParticleRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.particles[index]
    }
}

impl<'a> IntoIterator for &'a Event {
    type Item = &'a ParticleRecord;
    type IntoIter = std::slice::Iter<'a, ParticleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Records {
            particles: Vec<ParticleRecord>,
        }

        let Records { particles } = Records::deserialize(deserializer)?;
        Ok(Self::from_records(particles))
    }
}

impl FromIterator<ParticleRecord> for Event {
    fn from_iter<I: IntoIterator<Item = ParticleRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}
