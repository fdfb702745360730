//! Human-readable reports.

use crate::Result;
use std::io::Write;
use stringfrag_algorithms::{
    Classification, FirstEmissionAnalysis, FirstHadronSummary, KinematicSummary, MomentumSummary,
    RunSummary, TimingSource,
};
use stringfrag_core::Event;

/// Line-oriented per-event report writer.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes the full report for one classified event.
    pub fn write_event(
        &mut self,
        number: usize,
        event: &Event,
        classification: &Classification,
    ) -> Result<()> {
        let w = &mut self.writer;
        writeln!(w, "\n=== Event {number} ===")?;
        writeln!(w, "First emitted hadrons (primary from string fragmentation):")?;
        for p in event.primary_hadrons() {
            write!(
                w,
                "  Index {}: {} (ID: {}) Status: {}",
                p.index,
                p.display_name(),
                p.pdg_id,
                p.status
            )?;
            if p.is_final() {
                write!(w, " [Final state]")?;
            } else {
                write!(w, " [Decayed/processed]")?;
            }
            write!(
                w,
                " px={:.3} py={:.3} pz={:.3} E={:.3} m={:.3} Mothers: {}-{}",
                p.px(),
                p.py(),
                p.pz(),
                p.e(),
                p.mass,
                p.mother1,
                p.mother2
            )?;
            if p.has_daughters() {
                write!(w, " Daughters: {}-{}", p.daughter1, p.daughter2)?;
            }
            writeln!(w)?;
        }

        writeln!(w, "\nAdvanced First Hadron Analysis:")?;
        match classification {
            Classification::NoPrimaryHadrons => {
                writeln!(w, "  No primary hadrons found in this event")?;
                Ok(())
            }
            Classification::Classified(analysis) => {
                self.write_analysis(number, event, analysis)?;
                self.write_final_hadrons(event)
            }
        }
    }

    fn write_analysis(
        &mut self,
        number: usize,
        event: &Event,
        analysis: &FirstEmissionAnalysis,
    ) -> Result<()> {
        let w = &mut self.writer;

        writeln!(w, "  Primary hadrons from string fragmentation:")?;
        for hadron in &analysis.primaries {
            let p = &event[hadron.index];
            write!(
                w,
                "    Index {}: {} (mothers: {}-{}, daughters: {}-{})",
                p.index,
                p.display_name(),
                p.mother1,
                p.mother2,
                p.daughter1,
                p.daughter2
            )?;
            if hadron.from_string_fragmentation {
                write!(w, " [String fragmentation]")?;
            }
            writeln!(w)?;
        }

        writeln!(w, "  First hadron(s) analysis using space-time coordinates:")?;
        let proxied = analysis
            .primaries
            .iter()
            .filter(|h| h.timing == TimingSource::IndexProxy)
            .count();
        if proxied > 0 {
            writeln!(
                w,
                "    WARNING: no production vertex for {proxied} of {} primary hadron(s); \
                 ordering by record index (reduced accuracy)",
                analysis.primaries.len()
            )?;
        }
        writeln!(w, "    Earliest production time: {:.6}", analysis.earliest_time())?;
        writeln!(w, "    Time-ordered primary hadrons:")?;
        let first_count = analysis.first_emission.len();
        for (position, hadron) in analysis.time_ordered.iter().enumerate() {
            let source = match hadron.timing {
                TimingSource::Vertex => "vertex",
                TimingSource::IndexProxy => "index proxy",
            };
            write!(
                w,
                "      t={:.6} Index {}: {} [{source}]",
                hadron.production_time,
                hadron.index,
                event[hadron.index].display_name()
            )?;
            if position < first_count {
                write!(w, " [first emission]")?;
            }
            writeln!(w)?;
        }

        writeln!(w, "  String structure analysis:")?;
        writeln!(w, "    Ancestry groups (mother1-mother2 -> indices):")?;
        for (mothers, indices) in &analysis.ancestry {
            let list: Vec<String> = indices.iter().map(ToString::to_string).collect();
            writeln!(w, "      {}-{} -> {}", mothers.0, mothers.1, list.join(", "))?;
        }
        if analysis.ancestry.len() == 1 {
            writeln!(
                w,
                "    All first hadrons share the same mother particles (one fragmenting string)"
            )?;
        }

        writeln!(w, "    Momentum analysis (potential end identification):")?;
        for first in &analysis.first_emission {
            let p = &event[first.index];
            writeln!(
                w,
                "      {} (index {}): pz={:.3} GeV/c, pT={:.3} GeV/c [{} z-direction]",
                p.display_name(),
                first.index,
                p.pz(),
                first.pt,
                first.direction.label()
            )?;
        }

        if analysis.first_emission.iter().any(|f| f.has_vertex) {
            writeln!(w, "    Production vertex analysis:")?;
            for first in analysis.first_emission.iter().filter(|f| f.has_vertex) {
                let p = &event[first.index];
                if let Some(v) = p.production_vertex {
                    writeln!(
                        w,
                        "      {} (index {}): position (x,y,z)=({:.6}, {:.6}, {:.6})",
                        p.display_name(),
                        first.index,
                        v.x,
                        v.y,
                        v.z
                    )?;
                }
            }
        }

        writeln!(w, "  First hadron(s) analysis:")?;
        if analysis.is_simultaneous() {
            writeln!(
                w,
                "    Multiple potential first hadrons detected (simultaneous fragmentation from both ends):"
            )?;
            for first in &analysis.first_emission {
                let p = &event[first.index];
                write!(
                    w,
                    "      {} (index {}): E={:.3} GeV, z~{:.3}",
                    p.display_name(),
                    first.index,
                    p.e(),
                    first.z_fraction
                )?;
                if first.has_vertex {
                    write!(w, ", production time t={:.3}", first.production_time)?;
                }
                writeln!(w)?;
            }
        } else {
            let first = &analysis.first_emission[0];
            let p = &event[first.index];
            writeln!(
                w,
                "    Single first hadron: {} (index {}), E={:.3} GeV, z~{:.3}",
                p.display_name(),
                first.index,
                p.e(),
                first.z_fraction
            )?;
        }

        writeln!(
            w,
            "\nFragmentation sequence (all primary hadrons in order) for event {number}:"
        )?;
        for ranked in &analysis.sequence {
            let p = &event[ranked.index];
            writeln!(
                w,
                "  Rank {}: {} (status {}) E={:.3}",
                ranked.rank,
                p.display_name(),
                p.status,
                p.e()
            )?;
        }
        Ok(())
    }

    /// Lists the final-state hadrons of the event.
    pub fn write_final_hadrons(&mut self, event: &Event) -> Result<()> {
        writeln!(self.writer, "\nFinal-state hadrons:")?;
        for p in event.final_hadrons() {
            writeln!(self.writer, "  {} (ID: {})", p.display_name(), p.pdg_id)?;
        }
        Ok(())
    }

    /// Writes the end-of-run counts.
    pub fn write_run_summary(&mut self, summary: &RunSummary) -> Result<()> {
        let w = &mut self.writer;
        writeln!(w, "\nRun summary:")?;
        writeln!(w, "  Events requested: {}", summary.requested)?;
        writeln!(w, "  Events generated: {}", summary.generated)?;
        writeln!(w, "  Generation failures: {}", summary.failed)?;
        writeln!(w, "  Events with primary hadrons: {}", summary.classified)?;
        writeln!(w, "  Events without primary hadrons: {}", summary.empty)?;
        writeln!(w, "  First-emission hadrons: {}", summary.first_emissions)?;
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes first-hadron summary statistics.
pub fn write_summary<W: Write>(w: &mut W, summary: &FirstHadronSummary) -> Result<()> {
    let k = &summary.kinematics;
    write_title(w, "FIRST HADRON STATISTICS (Primary Hadrons from Fragmentation)")?;
    writeln!(w, "\nTotal first hadrons analyzed: {}", k.total)?;
    writeln!(w, "Unique first hadron types: {}", k.unique_species())?;
    write_kinematics(w, k)?;
    write_species(w, "FIRST HADRON TYPE BREAKDOWN", k)?;

    writeln!(w, "\nFINAL STATE VS DECAYED:")?;
    writeln!(
        w,
        "  Final state: {} ({:.1}%)",
        summary.final_count,
        k.percentage(summary.final_count)
    )?;
    writeln!(
        w,
        "  Decayed: {} ({:.1}%)",
        summary.decayed_count(),
        k.percentage(summary.decayed_count())
    )?;

    write_correlations(w, k)
}

/// Writes statistics of the final-state momentum dump.
pub fn write_momentum_summary<W: Write>(w: &mut W, summary: &MomentumSummary) -> Result<()> {
    let k = &summary.kinematics;
    write_title(w, "COMPREHENSIVE PARTICLE PROPERTIES STATISTICS")?;
    writeln!(w, "\nTotal particles: {}", k.total)?;
    writeln!(w, "Total events: {}", summary.events)?;
    write_kinematics(w, k)?;
    write_species(w, "PARTICLE TYPE BREAKDOWN", k)?;
    write_correlations(w, k)
}

fn write_title<W: Write>(w: &mut W, title: &str) -> Result<()> {
    let rule = "=".repeat(70);
    writeln!(w, "{rule}")?;
    writeln!(w, "{title}")?;
    writeln!(w, "{rule}")?;
    Ok(())
}

fn write_kinematics<W: Write>(w: &mut W, k: &KinematicSummary) -> Result<()> {
    writeln!(w, "\nMOMENTUM STATISTICS:")?;
    writeln!(w, "  p_x Mean: {:.3} GeV/c", k.mean_px)?;
    writeln!(w, "  p_y Mean: {:.3} GeV/c", k.mean_py)?;
    writeln!(w, "  p_z Mean: {:.3} GeV/c", k.mean_pz)?;
    writeln!(w, "  |p| Mean: {:.3} GeV/c", k.mean_p_abs)?;
    writeln!(w, "  p_T Mean: {:.3} GeV/c", k.mean_pt)?;

    for (title, unit, moments) in [
        ("ENERGY", " GeV", &k.energy),
        ("MASS", " GeV/c^2", &k.mass),
        ("PSEUDORAPIDITY", "", &k.pseudorapidity),
    ] {
        writeln!(w, "\n{title} STATISTICS:")?;
        writeln!(w, "  Mean: {:.3}{unit}", moments.mean)?;
        writeln!(w, "  Std:  {:.3}{unit}", moments.std)?;
        writeln!(w, "  Min:  {:.3}{unit}", moments.min)?;
        writeln!(w, "  Max:  {:.3}{unit}", moments.max)?;
    }
    Ok(())
}

fn write_species<W: Write>(w: &mut W, title: &str, k: &KinematicSummary) -> Result<()> {
    writeln!(w, "\n{title}:")?;
    for species in &k.species {
        writeln!(
            w,
            "  {}: {} ({:.1}%)",
            species.name,
            species.count,
            k.percentage(species.count)
        )?;
    }
    Ok(())
}

fn write_correlations<W: Write>(w: &mut W, k: &KinematicSummary) -> Result<()> {
    writeln!(w, "\nKEY CORRELATIONS:")?;
    writeln!(w, "  Energy-Mass: {:.3}", k.corr_energy_mass)?;
    writeln!(w, "  Energy-Momentum: {:.3}", k.corr_energy_momentum)?;
    writeln!(w, "  Mass-Momentum: {:.3}", k.corr_mass_momentum)?;
    writeln!(w, "  Energy-p_T: {:.3}", k.corr_energy_pt)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringfrag_algorithms::{classify_event, ClassifierConfig, FirstHadronSample, MomentumSample};
    use stringfrag_core::particle::{FourVector, ParticleRecord};

    fn report(event: &Event) -> String {
        let classification = classify_event(event, &ClassifierConfig::default());
        let mut writer = ReportWriter::new(Vec::new());
        writer.write_event(0, event, &classification).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    fn hadron(pdg_id: i32, status: i32, pz: f64) -> ParticleRecord {
        ParticleRecord::new(pdg_id, status, FourVector::new(0.0, 0.2, pz, 2.0), 0.14)
            .with_mothers(1, 2)
    }

    #[test]
    fn test_report_simultaneous_with_vertices() {
        let vertex = FourVector::new(0.0, 0.0, 0.0, 0.0);
        let event = Event::from_records([
            ParticleRecord::new(90, -11, FourVector::default(), 10.0),
            ParticleRecord::new(1, -23, FourVector::new(0.0, 0.0, 5.0, 5.0), 0.0),
            ParticleRecord::new(-1, -23, FourVector::new(0.0, 0.0, -5.0, 5.0), 0.0),
            hadron(213, -83, 1.8).with_vertex(vertex).with_daughters(6, 7),
            hadron(-211, 84, -1.9).with_vertex(vertex),
            hadron(111, 83, 0.05).with_vertex(FourVector::new(0.0, 0.0, 0.0, 3.0)),
        ]);
        let text = report(&event);

        assert!(text.contains("=== Event 0 ==="));
        assert!(text.contains("Index 3: rho+ (ID: 213) Status: -83 [Decayed/processed]"));
        assert!(text.contains("Daughters: 6-7"));
        assert!(text.contains("[String fragmentation]"));
        assert!(text.contains("Multiple potential first hadrons detected"));
        assert!(text.contains("[positive z-direction]"));
        assert!(text.contains("[negative z-direction]"));
        assert!(text.contains("1-2 -> 3, 4"));
        assert!(text.contains("Production vertex analysis:"));
        assert!(!text.contains("WARNING"));
        assert!(text.contains("Rank 3: pi0 (status 83)"));
        assert!(text.contains("Final-state hadrons:\n  pi- (ID: -211)\n  pi0 (ID: 111)"));
    }

    #[test]
    fn test_report_flags_index_proxy() {
        let event = Event::from_records([hadron(211, 83, 1.0), hadron(-211, 83, -1.0)]);
        let text = report(&event);
        assert!(text.contains("WARNING: no production vertex for 2 of 2 primary hadron(s)"));
        assert!(text.contains("[index proxy] [first emission]"));
        assert!(text.contains("Single first hadron: pi+ (index 0)"));
        assert!(!text.contains("Production vertex analysis:"));
    }

    #[test]
    fn test_report_without_primaries() {
        let event = Event::from_records([ParticleRecord::new(211, 91, FourVector::default(), 0.14)]);
        let text = report(&event);
        assert!(text.ends_with("Advanced First Hadron Analysis:\n  No primary hadrons found in this event\n"));
    }

    #[test]
    fn test_summary_text() {
        let samples: Vec<FirstHadronSample> = [(211, 83, 2.0), (211, -83, 3.0), (111, 84, 1.0)]
            .iter()
            .map(|&(id, status, e)| {
                let record =
                    ParticleRecord::new(id, status, FourVector::new(0.1, 0.0, e - 0.2, e), 0.14);
                FirstHadronSample::from_record("0", &record)
            })
            .collect();
        let summary = FirstHadronSummary::from_samples(&samples).unwrap();

        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Total first hadrons analyzed: 3"));
        assert!(text.contains("Unique first hadron types: 2"));
        assert!(text.contains("  pi+: 2 (66.7%)"));
        assert!(text.contains("  Final state: 2 (66.7%)"));
        assert!(text.contains("  Max:  3.000 GeV"));
        assert!(text.contains("PSEUDORAPIDITY STATISTICS:"));
    }

    #[test]
    fn test_momentum_summary_text() {
        let samples: Vec<MomentumSample> = [(0, 211, 1.0), (0, -211, -1.0), (2, 211, 2.0)]
            .iter()
            .map(|&(event, id, pz)| {
                let record =
                    ParticleRecord::new(id, 1, FourVector::new(0.2, 0.0, pz, pz.abs() + 0.1), 0.14);
                MomentumSample::from_record(event, &record)
            })
            .collect();
        let summary = MomentumSummary::from_samples(&samples).unwrap();

        let mut out = Vec::new();
        write_momentum_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Total particles: 3"));
        assert!(text.contains("Total events: 2"));
        assert!(text.contains("PARTICLE TYPE BREAKDOWN:\n  pi+: 2 (66.7%)\n  pi-: 1 (33.3%)"));
        assert!(text.contains("  p_T Mean: 0.200 GeV/c"));
        assert!(!text.contains("FINAL STATE VS DECAYED"));
    }
}
