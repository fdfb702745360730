//! Seed-string configuration: the two partons injected before hadronization.

use crate::error::{Error, Result};
use crate::particle::{FourVector, ParticleRecord};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A back-to-back quark–antiquark pair along the z axis.
///
/// The quark travels along +z, the antiquark along −z, both massless with
/// the configured energy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SeedString {
    /// Quark flavour code (1 = d ... 5 = b); the antiquark is its negative.
    pub quark_id: i32,
    /// Energy of each parton.
    pub energy: f64,
    /// Engine status code given to the injected partons.
    pub status: i32,
}

impl Default for SeedString {
    fn default() -> Self {
        Self {
            quark_id: 1,
            energy: 5.0,
            status: 23,
        }
    }
}

impl SeedString {
    /// Creates a d–dbar string with the given per-parton energy.
    #[must_use]
    pub fn new(energy: f64) -> Self {
        Self {
            energy,
            ..Self::default()
        }
    }

    /// Sets the quark flavour.
    #[must_use]
    pub fn with_quark_id(mut self, quark_id: i32) -> Self {
        self.quark_id = quark_id;
        self
    }

    /// Sets the parton status code.
    #[must_use]
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Checks flavour and energy.
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.quark_id) {
            return Err(Error::InvalidSeed(format!(
                "quark id {} is not a quark flavour (1-5)",
                self.quark_id
            )));
        }
        if !self.energy.is_finite() || self.energy <= 0.0 {
            return Err(Error::InvalidSeed(format!(
                "parton energy must be positive and finite, got {}",
                self.energy
            )));
        }
        Ok(())
    }

    /// The quark and antiquark records, in injection order.
    #[must_use]
    pub fn partons(&self) -> [ParticleRecord; 2] {
        let e = self.energy;
        [
            ParticleRecord::new(self.quark_id, self.status, FourVector::new(0.0, 0.0, e, e), 0.0),
            ParticleRecord::new(
                -self.quark_id,
                self.status,
                FourVector::new(0.0, 0.0, -e, e),
                0.0,
            ),
        ]
    }

    /// Total string energy: the sum of `|E|` over the injected partons.
    #[must_use]
    pub fn string_energy(&self) -> f64 {
        self.partons().iter().map(|p| p.e().abs()).sum()
    }
}
