//! Particle record types.

use crate::pdg;
use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lower bound of the primary-hadron status band.
pub const PRIMARY_STATUS_MIN: i32 = 81;
/// Upper bound of the primary-hadron status band.
pub const PRIMARY_STATUS_MAX: i32 = 89;

/// A Lorentz four-vector.
///
/// Used both for momenta `(px, py, pz, E)` and for space-time points
/// `(x, y, z, t)`; the fourth component is the energy or time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FourVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

impl FourVector {
    /// Creates a new four-vector.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }

    #[inline]
    #[must_use]
    pub fn px(&self) -> f64 {
        self.x
    }

    #[inline]
    #[must_use]
    pub fn py(&self) -> f64 {
        self.y
    }

    #[inline]
    #[must_use]
    pub fn pz(&self) -> f64 {
        self.z
    }

    #[inline]
    #[must_use]
    pub fn e(&self) -> f64 {
        self.t
    }

    /// Transverse component `sqrt(x² + y²)`.
    #[inline]
    #[must_use]
    pub fn pt(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Magnitude of the spatial part.
    #[inline]
    #[must_use]
    pub fn p_abs(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// The `(mother1, mother2)` pair of a record, used as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotherPair(pub i32, pub i32);

impl MotherPair {
    /// True when both mothers are set and ordered, i.e. the record spans
    /// the two endpoint partons of a string.
    #[inline]
    #[must_use]
    pub fn spans_string(&self) -> bool {
        self.0 >= 0 && self.1 >= 0 && self.0 < self.1
    }
}

/// One entry of the engine's flat event record.
///
/// Mother and daughter fields are plain indices into the owning
/// [`Event`](crate::Event); `0` or `-1` mean "none".
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParticleRecord {
    /// Position in the event, assigned at append time.
    #[cfg_attr(feature = "serde", serde(default))]
    pub index: usize,
    /// PDG particle code.
    pub pdg_id: i32,
    /// Engine status code. Positive means final state.
    pub status: i32,
    /// Four-momentum `(px, py, pz, E)`.
    pub momentum: FourVector,
    /// Mass.
    pub mass: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mother1: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mother2: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub daughter1: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub daughter2: i32,
    /// Production point `(x, y, z, t)`, when the engine tracks it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub production_vertex: Option<FourVector>,
    /// Engine-supplied name, if any.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
}

impl ParticleRecord {
    /// Creates a record with no ancestry, vertex or name.
    #[must_use]
    pub fn new(pdg_id: i32, status: i32, momentum: FourVector, mass: f64) -> Self {
        Self {
            index: 0,
            pdg_id,
            status,
            momentum,
            mass,
            mother1: 0,
            mother2: 0,
            daughter1: 0,
            daughter2: 0,
            production_vertex: None,
            name: None,
        }
    }

    /// Sets the mother indices.
    #[must_use]
    pub fn with_mothers(mut self, mother1: i32, mother2: i32) -> Self {
        self.mother1 = mother1;
        self.mother2 = mother2;
        self
    }

    /// Sets the daughter indices.
    #[must_use]
    pub fn with_daughters(mut self, daughter1: i32, daughter2: i32) -> Self {
        self.daughter1 = daughter1;
        self.daughter2 = daughter2;
        self
    }

    /// Sets the production vertex.
    #[must_use]
    pub fn with_vertex(mut self, vertex: FourVector) -> Self {
        self.production_vertex = Some(vertex);
        self
    }

    /// Sets an explicit name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name for display: the engine's name if present, else the PDG table's.
    #[must_use]
    pub fn display_name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => pdg::particle_name(self.pdg_id),
        }
    }

    #[inline]
    #[must_use]
    pub fn px(&self) -> f64 {
        self.momentum.px()
    }

    #[inline]
    #[must_use]
    pub fn py(&self) -> f64 {
        self.momentum.py()
    }

    #[inline]
    #[must_use]
    pub fn pz(&self) -> f64 {
        self.momentum.pz()
    }

    #[inline]
    #[must_use]
    pub fn e(&self) -> f64 {
        self.momentum.e()
    }

    #[inline]
    #[must_use]
    pub fn pt(&self) -> f64 {
        self.momentum.pt()
    }

    /// True if the record is a hadron according to the PDG numbering scheme.
    #[inline]
    #[must_use]
    pub fn is_hadron(&self) -> bool {
        pdg::is_hadron(self.pdg_id)
    }

    /// True if the particle survives to the final state.
    #[inline]
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.status > 0
    }

    /// True for hadrons produced directly by string fragmentation.
    #[must_use]
    pub fn is_primary_hadron(&self) -> bool {
        (PRIMARY_STATUS_MIN..=PRIMARY_STATUS_MAX).contains(&self.status.abs()) && self.is_hadron()
    }

    #[inline]
    #[must_use]
    pub fn mothers(&self) -> MotherPair {
        MotherPair(self.mother1, self.mother2)
    }

    /// True when the record's mothers are the two ordered string endpoints.
    #[inline]
    #[must_use]
    pub fn from_string_fragmentation(&self) -> bool {
        self.mothers().spans_string()
    }

    /// True if the record decayed and has daughters recorded.
    #[inline]
    #[must_use]
    pub fn has_daughters(&self) -> bool {
        self.status < 0 && self.daughter1 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pion(status: i32) -> ParticleRecord {
        ParticleRecord::new(211, status, FourVector::new(0.3, 0.4, 1.2, 1.3), 0.13957)
    }

    #[test]
    fn test_four_vector_components() {
        let p = FourVector::new(3.0, 4.0, 12.0, 13.5);
        assert_relative_eq!(p.pt(), 5.0);
        assert_relative_eq!(p.p_abs(), 13.0);
        assert_relative_eq!(p.e(), 13.5);
    }

    #[test]
    fn test_primary_status_band() {
        assert!(pion(81).is_primary_hadron());
        assert!(pion(-89).is_primary_hadron());
        assert!(pion(83).is_primary_hadron());
        assert!(!pion(80).is_primary_hadron());
        assert!(!pion(-90).is_primary_hadron());
        assert!(!pion(91).is_primary_hadron());
    }

    #[test]
    fn test_primary_requires_hadron() {
        let photon = ParticleRecord::new(22, 83, FourVector::default(), 0.0);
        assert!(!photon.is_primary_hadron());
    }

    #[test]
    fn test_final_and_daughters() {
        let decayed = pion(-83).with_daughters(7, 8);
        assert!(!decayed.is_final());
        assert!(decayed.has_daughters());

        let final_state = pion(83).with_daughters(7, 8);
        assert!(final_state.is_final());
        assert!(!final_state.has_daughters());
    }

    #[test]
    fn test_string_fragmentation_flag() {
        assert!(pion(83).with_mothers(3, 4).from_string_fragmentation());
        assert!(!pion(83).with_mothers(4, 3).from_string_fragmentation());
        assert!(!pion(83).with_mothers(-1, 4).from_string_fragmentation());
        assert!(!pion(83).with_mothers(4, 4).from_string_fragmentation());
    }

    #[test]
    fn test_display_name_prefers_engine_name() {
        assert_eq!(pion(83).display_name(), "pi+");
        assert_eq!(pion(83).with_name("custom").display_name(), "custom");
    }
}
