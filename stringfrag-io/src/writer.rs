//! CSV writers for per-event output.
//!
//! Each writer emits its header on construction and one or more rows per
//! event. Floating-point columns use fixed six-decimal formatting. Name
//! columns come from the engine and are quoted whenever they contain a
//! delimiter or quote.

use crate::Result;
use csv::QuoteStyle;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use stringfrag_algorithms::{Classification, FirstHadronSample};
use stringfrag_core::{Event, ParticleRecord};

/// Header of the first-emission CSV.
pub const FIRST_HADRON_HEADER: &str =
    "Event,Index,Name,ID,Status,px,py,pz,E,m,Mother1,Mother2,Daughter1,Daughter2,IsFinal";

/// Header of the final-state momentum dump.
pub const MOMENTUM_HEADER: &str = "# Event,Particle_ID,px,py,pz,E,mass";

/// Header of the leading-pion CSV.
pub const LEADING_PION_HEADER: &str =
    "Event,Particle,Particle_pz,Particle_pT,Particle_px,Particle_py,Particle_E";

/// Header of the first-final-particle CSV.
pub const FIRST_FINAL_HEADER: &str =
    "Event,Name,Pid,Particle_px,Particle_py,Particle_pz,Particle_E,Particle_pT";

/// Event key for member `k` (0-based) of a first-emission group of `group_len`.
///
/// A single first hadron keeps the bare event number; simultaneous ones get
/// `_1`, `_2`, ... in group order.
#[must_use]
pub fn event_key(number: usize, k: usize, group_len: usize) -> String {
    if group_len > 1 {
        format!("{number}_{}", k + 1)
    } else {
        number.to_string()
    }
}

fn fixed(value: f64) -> String {
    format!("{value:.6}")
}

// The header is written verbatim so it is never quoted.
fn with_header<W: Write>(
    mut writer: W,
    header: &str,
    quote: QuoteStyle,
) -> Result<csv::Writer<W>> {
    writeln!(writer, "{header}")?;
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(quote)
        .from_writer(writer))
}

/// Writer for first-emission hadrons, one row per group member.
pub struct FirstEmissionCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl FirstEmissionCsvWriter<File> {
    /// Creates the file and writes the header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> FirstEmissionCsvWriter<W> {
    /// Wraps a writer and writes the header.
    pub fn new(writer: W) -> Result<Self> {
        Ok(Self {
            writer: with_header(writer, FIRST_HADRON_HEADER, QuoteStyle::Necessary)?,
            rows: 0,
        })
    }

    /// Writes the first-emission group of one event; returns the row count.
    ///
    /// An event without primary hadrons writes nothing.
    pub fn write_event(
        &mut self,
        number: usize,
        event: &Event,
        classification: &Classification,
    ) -> Result<usize> {
        let Some(analysis) = classification.analysis() else {
            return Ok(0);
        };
        let group_len = analysis.first_emission.len();
        for (k, index) in analysis.first_emission_indices().enumerate() {
            let record = event.particle(index)?;
            let sample = FirstHadronSample::from_record(event_key(number, k, group_len), record);
            self.write_sample(&sample)?;
        }
        Ok(group_len)
    }

    /// Writes one row.
    pub fn write_sample(&mut self, s: &FirstHadronSample) -> Result<()> {
        self.writer.write_record([
            s.event.clone(),
            s.index.to_string(),
            s.name.clone(),
            s.pdg_id.to_string(),
            s.status.to_string(),
            fixed(s.px),
            fixed(s.py),
            fixed(s.pz),
            fixed(s.e),
            fixed(s.m),
            s.mother1.to_string(),
            s.mother2.to_string(),
            s.daughter1.to_string(),
            s.daughter2.to_string(),
            u8::from(s.is_final).to_string(),
        ])?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, excluding the header.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writer for the momenta of every final-state hadron.
pub struct MomentumCsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl MomentumCsvWriter<File> {
    /// Creates the file and writes the header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> MomentumCsvWriter<W> {
    /// Wraps a writer and writes the header.
    pub fn new(writer: W) -> Result<Self> {
        Ok(Self {
            writer: with_header(writer, MOMENTUM_HEADER, QuoteStyle::Necessary)?,
        })
    }

    /// Writes every final-state hadron of the event; returns the row count.
    pub fn write_event(&mut self, number: usize, event: &Event) -> Result<usize> {
        let mut rows = 0;
        for p in event.final_hadrons() {
            self.writer.write_record([
                number.to_string(),
                p.pdg_id.to_string(),
                fixed(p.px()),
                fixed(p.py()),
                fixed(p.pz()),
                fixed(p.e()),
                fixed(p.mass),
            ])?;
            rows += 1;
        }
        Ok(rows)
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writer for the most energetic final-state pion of each event.
///
/// The particle name is always quoted.
pub struct LeadingPionCsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl LeadingPionCsvWriter<File> {
    /// Creates the file and writes the header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> LeadingPionCsvWriter<W> {
    /// Wraps a writer and writes the header.
    pub fn new(writer: W) -> Result<Self> {
        Ok(Self {
            writer: with_header(writer, LEADING_PION_HEADER, QuoteStyle::NonNumeric)?,
        })
    }

    /// Writes one row; `pz` is stored as its magnitude.
    pub fn write(&mut self, number: usize, pion: &ParticleRecord) -> Result<()> {
        self.writer.write_record([
            number.to_string(),
            pion.display_name().into_owned(),
            fixed(pion.pz().abs()),
            fixed(pion.pt()),
            fixed(pion.px()),
            fixed(pion.py()),
            fixed(pion.e()),
        ])?;
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writer for the first final-state particle of each event.
pub struct FirstFinalCsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl FirstFinalCsvWriter<File> {
    /// Creates the file and writes the header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> FirstFinalCsvWriter<W> {
    /// Wraps a writer and writes the header.
    pub fn new(writer: W) -> Result<Self> {
        Ok(Self {
            writer: with_header(writer, FIRST_FINAL_HEADER, QuoteStyle::Necessary)?,
        })
    }

    /// Writes one row.
    pub fn write(&mut self, number: usize, particle: &ParticleRecord) -> Result<()> {
        self.writer.write_record([
            number.to_string(),
            particle.display_name().into_owned(),
            particle.pdg_id.to_string(),
            fixed(particle.px()),
            fixed(particle.py()),
            fixed(particle.pz()),
            fixed(particle.e()),
            fixed(particle.pt()),
        ])?;
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_first_hadron_csv;
    use stringfrag_algorithms::{classify_event, ClassifierConfig};
    use stringfrag_core::particle::FourVector;
    use tempfile::NamedTempFile;

    fn pion(status: i32, pz: f64, t: f64) -> ParticleRecord {
        ParticleRecord::new(211, status, FourVector::new(0.1, -0.2, pz, 1.5), 0.13957)
            .with_mothers(1, 2)
            .with_vertex(FourVector::new(0.0, 0.0, 0.0, t))
    }

    #[test]
    fn test_event_key() {
        assert_eq!(event_key(4, 0, 1), "4");
        assert_eq!(event_key(4, 0, 2), "4_1");
        assert_eq!(event_key(4, 1, 2), "4_2");
    }

    #[test]
    fn test_first_emission_single_row() {
        let event = Event::from_records([
            ParticleRecord::new(90, -11, FourVector::default(), 10.0),
            pion(83, 1.2, 0.0),
            pion(-84, -1.0, 2.0).with_daughters(5, 6),
        ]);
        let classification = classify_event(&event, &ClassifierConfig::default());

        let mut buffer = Vec::new();
        let mut writer = FirstEmissionCsvWriter::new(&mut buffer).unwrap();
        assert_eq!(writer.write_event(7, &event, &classification).unwrap(), 1);
        assert_eq!(writer.rows(), 1);
        writer.flush().unwrap();
        drop(writer);

        let content = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], FIRST_HADRON_HEADER);
        assert_eq!(
            lines[1],
            "7,1,pi+,211,83,0.100000,-0.200000,1.200000,1.500000,0.139570,1,2,0,0,1"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_first_emission_no_primaries() {
        let event = Event::from_records([ParticleRecord::new(22, 91, FourVector::default(), 0.0)]);
        let classification = classify_event(&event, &ClassifierConfig::default());
        let mut buffer = Vec::new();
        let mut writer = FirstEmissionCsvWriter::new(&mut buffer).unwrap();
        assert_eq!(writer.write_event(0, &event, &classification).unwrap(), 0);
        writer.flush().unwrap();
        drop(writer);
        assert_eq!(String::from_utf8(buffer).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_engine_names_are_quoted_and_read_back() {
        let event = Event::from_records([
            pion(83, 1.2, 0.0).with_name("pi+,x"),
            pion(83, -1.2, 0.0).with_name("say \"pi\""),
        ]);
        let classification = classify_event(&event, &ClassifierConfig::default());

        let mut buffer = Vec::new();
        let mut writer = FirstEmissionCsvWriter::new(&mut buffer).unwrap();
        assert_eq!(writer.write_event(0, &event, &classification).unwrap(), 2);
        writer.flush().unwrap();
        drop(writer);

        let content = String::from_utf8(buffer).unwrap();
        assert!(content.contains("0_1,0,\"pi+,x\",211,"));
        assert!(content.contains("0_2,1,\"say \"\"pi\"\"\",211,"));

        let samples = parse_first_hadron_csv(content.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].name, "pi+,x");
        assert_eq!(samples[0].pdg_id, 211);
        assert_eq!(samples[1].name, "say \"pi\"");
        assert_eq!(samples[1].event, "0_2");
    }

    #[test]
    fn test_momentum_dump() {
        let file = NamedTempFile::new().unwrap();
        let event = Event::from_records([
            ParticleRecord::new(1, -23, FourVector::new(0.0, 0.0, 5.0, 5.0), 0.0),
            pion(-83, 1.0, 0.0),
            pion(91, 2.0, 1.0),
            ParticleRecord::new(22, 91, FourVector::new(0.0, 0.0, 0.3, 0.3), 0.0),
        ]);

        let mut writer = MomentumCsvWriter::create(file.path()).unwrap();
        assert_eq!(writer.write_event(3, &event).unwrap(), 1);
        writer.flush().unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with(MOMENTUM_HEADER));
        assert!(content.contains("3,211,0.100000,-0.200000,2.000000,1.500000,0.139570"));
    }

    #[test]
    fn test_leading_pion_row() {
        let mut buffer = Vec::new();
        let mut writer = LeadingPionCsvWriter::new(&mut buffer).unwrap();
        writer.write(12, &pion(91, -3.0, 0.0)).unwrap();
        writer.write(13, &pion(91, 1.0, 0.0).with_name("pi\"+")).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let content = String::from_utf8(buffer).unwrap();
        assert!(content.starts_with(&format!("{LEADING_PION_HEADER}\n")));
        assert!(content.contains("12,\"pi+\",3.000000,0.223607,0.100000,-0.200000,1.500000"));
        assert!(content.contains("13,\"pi\"\"+\",1.000000,"));
    }

    #[test]
    fn test_first_final_row() {
        let mut buffer = Vec::new();
        let mut writer = FirstFinalCsvWriter::new(&mut buffer).unwrap();
        writer.write(0, &pion(91, 0.5, 0.0)).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let content = String::from_utf8(buffer).unwrap();
        assert_eq!(
            content.lines().nth(1),
            Some("0,pi+,211,0.100000,-0.200000,0.500000,1.500000,0.223607")
        );
    }
}
