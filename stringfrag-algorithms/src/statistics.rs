//! Summary statistics over first-hadron and final-state momentum samples.
#![allow(clippy::cast_precision_loss)]

use std::borrow::Cow;
use std::collections::BTreeSet;
use stringfrag_core::particle::ParticleRecord;
use stringfrag_core::pdg;

/// Kinematics of one CSV row.
///
/// Derived quantities have default implementations in terms of the
/// stored momentum components.
pub trait KinematicSample {
    /// PDG code of the particle.
    fn pdg_id(&self) -> i32;
    /// Species label used in breakdowns.
    fn species_name(&self) -> Cow<'_, str>;
    /// `(px, py, pz)` in GeV/c.
    fn momentum(&self) -> (f64, f64, f64);
    /// Energy in GeV.
    fn energy(&self) -> f64;
    /// Mass in GeV/c^2.
    fn mass(&self) -> f64;

    /// Momentum magnitude.
    fn p_abs(&self) -> f64 {
        let (px, py, pz) = self.momentum();
        (px * px + py * py + pz * pz).sqrt()
    }

    /// Transverse momentum.
    fn pt(&self) -> f64 {
        let (px, py, _) = self.momentum();
        px.hypot(py)
    }

    /// Pseudorapidity, regularized so a particle exactly along +z stays finite.
    fn pseudorapidity(&self) -> f64 {
        let (_, _, pz) = self.momentum();
        let p = self.p_abs();
        0.5 * ((p + pz) / (p - pz + 1e-10)).ln()
    }
}

/// One first-emission hadron as stored in the first-hadron CSV.
#[derive(Clone, Debug, PartialEq)]
pub struct FirstHadronSample {
    /// Event key, including the `_k` suffix for simultaneous emissions.
    pub event: String,
    /// Record index within the event.
    pub index: usize,
    /// Particle name.
    pub name: String,
    /// PDG code.
    pub pdg_id: i32,
    /// Engine status code.
    pub status: i32,
    /// Momentum x component.
    pub px: f64,
    /// Momentum y component.
    pub py: f64,
    /// Momentum z component.
    pub pz: f64,
    /// Energy.
    pub e: f64,
    /// Mass.
    pub m: f64,
    /// First mother index.
    pub mother1: i32,
    /// Second mother index.
    pub mother2: i32,
    /// First daughter index.
    pub daughter1: i32,
    /// Last daughter index.
    pub daughter2: i32,
    /// Whether the hadron survived to the final state.
    pub is_final: bool,
}

impl FirstHadronSample {
    /// Builds a sample from an event record.
    #[must_use]
    pub fn from_record(event: impl Into<String>, record: &ParticleRecord) -> Self {
        Self {
            event: event.into(),
            index: record.index,
            name: record.display_name().into_owned(),
            pdg_id: record.pdg_id,
            status: record.status,
            px: record.px(),
            py: record.py(),
            pz: record.pz(),
            e: record.e(),
            m: record.mass,
            mother1: record.mother1,
            mother2: record.mother2,
            daughter1: record.daughter1,
            daughter2: record.daughter2,
            is_final: record.is_final(),
        }
    }
}

impl KinematicSample for FirstHadronSample {
    fn pdg_id(&self) -> i32 {
        self.pdg_id
    }

    fn species_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn momentum(&self) -> (f64, f64, f64) {
        (self.px, self.py, self.pz)
    }

    fn energy(&self) -> f64 {
        self.e
    }

    fn mass(&self) -> f64 {
        self.m
    }
}

/// One row of the final-state momentum dump.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentumSample {
    /// Event number.
    pub event: usize,
    /// PDG code.
    pub pdg_id: i32,
    /// Momentum x component.
    pub px: f64,
    /// Momentum y component.
    pub py: f64,
    /// Momentum z component.
    pub pz: f64,
    /// Energy.
    pub e: f64,
    /// Mass.
    pub mass: f64,
}

impl MomentumSample {
    /// Builds a sample from an event record.
    #[must_use]
    pub fn from_record(event: usize, record: &ParticleRecord) -> Self {
        Self {
            event,
            pdg_id: record.pdg_id,
            px: record.px(),
            py: record.py(),
            pz: record.pz(),
            e: record.e(),
            mass: record.mass,
        }
    }
}

impl KinematicSample for MomentumSample {
    fn pdg_id(&self) -> i32 {
        self.pdg_id
    }

    fn species_name(&self) -> Cow<'_, str> {
        pdg::particle_name(self.pdg_id)
    }

    fn momentum(&self) -> (f64, f64, f64) {
        (self.px, self.py, self.pz)
    }

    fn energy(&self) -> f64 {
        self.e
    }

    fn mass(&self) -> f64 {
        self.mass
    }
}

/// Mean, sample standard deviation and range of a quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moments {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample (n-1) standard deviation; NaN for fewer than two values.
    pub std: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl Moments {
    /// Computes moments of a non-empty slice.
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        let mean = mean(values);
        let std = if values.len() < 2 {
            f64::NAN
        } else {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (values.len() - 1) as f64).sqrt()
        };
        Self {
            mean,
            std,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Number of samples of one species.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesCount {
    /// PDG code.
    pub pdg_id: i32,
    /// Label of the first sample seen with this code.
    pub name: String,
    /// Number of samples.
    pub count: usize,
}

/// Momentum, energy and mass aggregates of a sample set.
#[derive(Clone, Debug, PartialEq)]
pub struct KinematicSummary {
    /// Number of samples.
    pub total: usize,
    /// Mean of `px`.
    pub mean_px: f64,
    /// Mean of `py`.
    pub mean_py: f64,
    /// Mean of `pz`.
    pub mean_pz: f64,
    /// Mean momentum magnitude.
    pub mean_p_abs: f64,
    /// Mean transverse momentum.
    pub mean_pt: f64,
    /// Energy moments.
    pub energy: Moments,
    /// Mass moments.
    pub mass: Moments,
    /// Pseudorapidity moments.
    pub pseudorapidity: Moments,
    /// Species ordered by count, most frequent first; ties keep first appearance.
    pub species: Vec<SpeciesCount>,
    /// Pearson correlation of energy and mass.
    pub corr_energy_mass: f64,
    /// Pearson correlation of energy and |p|.
    pub corr_energy_momentum: f64,
    /// Pearson correlation of mass and |p|.
    pub corr_mass_momentum: f64,
    /// Pearson correlation of energy and pT.
    pub corr_energy_pt: f64,
}

impl KinematicSummary {
    /// Summarizes the samples, `None` when there are none.
    ///
    /// Correlations are NaN when either quantity has zero variance.
    #[must_use]
    pub fn from_samples<S: KinematicSample>(samples: &[S]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let px = column(samples, |s| s.momentum().0);
        let py = column(samples, |s| s.momentum().1);
        let pz = column(samples, |s| s.momentum().2);
        let e = column(samples, S::energy);
        let m = column(samples, S::mass);
        let p_abs = column(samples, S::p_abs);
        let pt = column(samples, S::pt);
        let eta = column(samples, S::pseudorapidity);

        let mut species: Vec<SpeciesCount> = Vec::new();
        for sample in samples {
            let pdg_id = sample.pdg_id();
            match species.iter_mut().find(|s| s.pdg_id == pdg_id) {
                Some(entry) => entry.count += 1,
                None => species.push(SpeciesCount {
                    pdg_id,
                    name: sample.species_name().into_owned(),
                    count: 1,
                }),
            }
        }
        species.sort_by(|a, b| b.count.cmp(&a.count));

        Some(Self {
            total: samples.len(),
            mean_px: mean(&px),
            mean_py: mean(&py),
            mean_pz: mean(&pz),
            mean_p_abs: mean(&p_abs),
            mean_pt: mean(&pt),
            energy: Moments::of(&e),
            mass: Moments::of(&m),
            pseudorapidity: Moments::of(&eta),
            species,
            corr_energy_mass: pearson(&e, &m),
            corr_energy_momentum: pearson(&e, &p_abs),
            corr_mass_momentum: pearson(&m, &p_abs),
            corr_energy_pt: pearson(&e, &pt),
        })
    }

    /// Number of distinct species.
    #[must_use]
    pub fn unique_species(&self) -> usize {
        self.species.len()
    }

    /// `count` as a percentage of all samples.
    #[must_use]
    pub fn percentage(&self, count: usize) -> f64 {
        count as f64 / self.total as f64 * 100.0
    }
}

/// Aggregate statistics of a first-hadron sample set.
#[derive(Clone, Debug, PartialEq)]
pub struct FirstHadronSummary {
    /// Shared kinematic aggregates.
    pub kinematics: KinematicSummary,
    /// Samples still in the final state.
    pub final_count: usize,
}

impl FirstHadronSummary {
    /// Summarizes the samples, `None` when there are none.
    #[must_use]
    pub fn from_samples(samples: &[FirstHadronSample]) -> Option<Self> {
        Some(Self {
            kinematics: KinematicSummary::from_samples(samples)?,
            final_count: samples.iter().filter(|s| s.is_final).count(),
        })
    }

    /// Number of samples that decayed.
    #[must_use]
    pub fn decayed_count(&self) -> usize {
        self.kinematics.total - self.final_count
    }
}

/// Aggregate statistics of the final-state momentum dump.
#[derive(Clone, Debug, PartialEq)]
pub struct MomentumSummary {
    /// Shared kinematic aggregates.
    pub kinematics: KinematicSummary,
    /// Number of distinct event numbers.
    pub events: usize,
}

impl MomentumSummary {
    /// Summarizes the samples, `None` when there are none.
    #[must_use]
    pub fn from_samples(samples: &[MomentumSample]) -> Option<Self> {
        Some(Self {
            kinematics: KinematicSummary::from_samples(samples)?,
            events: samples
                .iter()
                .map(|s| s.event)
                .collect::<BTreeSet<_>>()
                .len(),
        })
    }
}

fn column<S>(samples: &[S], f: impl Fn(&S) -> f64) -> Vec<f64> {
    samples.iter().map(f).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient; NaN when either side has no spread.
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let (mean_a, mean_b) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    cov / (var_a * var_b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use stringfrag_core::particle::FourVector;

    fn sample(pdg_id: i32, status: i32, p: (f64, f64, f64), e: f64, m: f64) -> FirstHadronSample {
        let record = ParticleRecord::new(pdg_id, status, FourVector::new(p.0, p.1, p.2, e), m);
        FirstHadronSample::from_record("0", &record)
    }

    fn momentum(event: usize, pdg_id: i32, pz: f64) -> MomentumSample {
        MomentumSample {
            event,
            pdg_id,
            px: 0.3,
            py: 0.4,
            pz,
            e: (pz * pz + 0.25 + 0.0196).sqrt(),
            mass: 0.14,
        }
    }

    #[test]
    fn test_derived_quantities() {
        let s = sample(211, 83, (3.0, 4.0, 12.0), 13.1, 0.14);
        assert_relative_eq!(s.p_abs(), 13.0);
        assert_relative_eq!(s.pt(), 5.0);
        let expected = 0.5 * (25.0_f64 / (1.0 + 1e-10)).ln();
        assert_relative_eq!(s.pseudorapidity(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_moments() {
        let m = Moments::of(&[1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(m.mean, 2.5);
        assert_relative_eq!(m.std, (5.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(m.min, 1.0);
        assert_relative_eq!(m.max, 4.0);
        assert!(Moments::of(&[2.0]).std.is_nan());
    }

    #[test]
    fn test_pearson() {
        assert_relative_eq!(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0, epsilon = 1e-12);
        assert!(pearson(&[1.0, 1.0], &[1.0, 2.0]).is_nan());
    }

    #[test]
    fn test_summary() {
        let samples = vec![
            sample(211, 83, (0.1, 0.2, 2.0), 2.1, 0.14),
            sample(-211, -83, (0.0, 0.3, -1.0), 1.2, 0.14),
            sample(211, 84, (0.2, 0.0, 3.0), 3.1, 0.14),
            sample(213, -83, (0.0, 0.0, 1.0), 1.4, 0.77),
        ];
        let summary = FirstHadronSummary::from_samples(&samples).unwrap();
        let k = &summary.kinematics;

        assert_eq!(k.total, 4);
        assert_eq!(k.unique_species(), 3);
        assert_eq!(k.species[0].pdg_id, 211);
        assert_eq!(k.species[0].count, 2);
        assert_eq!(k.species[1].pdg_id, -211);
        assert_eq!(k.species[0].name, "pi+");
        assert_eq!(summary.final_count, 2);
        assert_eq!(summary.decayed_count(), 2);
        assert_relative_eq!(k.percentage(1), 25.0);
        assert_relative_eq!(k.mean_pz, 1.25);
        assert_relative_eq!(k.energy.max, 3.1);
        assert_relative_eq!(k.mass.min, 0.14);
    }

    #[test]
    fn test_pseudorapidity_moments() {
        let samples = vec![
            sample(211, 83, (0.3, 0.4, 1.2), 1.4, 0.14),
            sample(-211, 83, (0.3, 0.4, -1.2), 1.4, 0.14),
        ];
        let k = KinematicSummary::from_samples(&samples).unwrap();
        let eta = samples[0].pseudorapidity();
        assert!(eta > 0.0);
        assert_relative_eq!(k.pseudorapidity.max, eta);
        assert_relative_eq!(k.pseudorapidity.min, -eta, epsilon = 1e-9);
        assert_relative_eq!(k.pseudorapidity.mean, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_momentum_summary_counts_distinct_events() {
        let samples = vec![
            momentum(0, 211, 1.0),
            momentum(0, 111, -2.0),
            momentum(3, 211, 0.5),
            momentum(7, 2212, 3.0),
        ];
        let summary = MomentumSummary::from_samples(&samples).unwrap();
        assert_eq!(summary.events, 3);
        assert_eq!(summary.kinematics.total, 4);
        assert_eq!(summary.kinematics.species[0].name, "pi+");
        assert_eq!(summary.kinematics.species[0].count, 2);
        assert_eq!(summary.kinematics.species[2].name, "p+");
        assert_relative_eq!(summary.kinematics.mean_pt, 0.5);
    }

    #[test]
    fn test_empty_summary() {
        assert!(FirstHadronSummary::from_samples(&[]).is_none());
        assert!(MomentumSummary::from_samples(&[]).is_none());
    }
}
