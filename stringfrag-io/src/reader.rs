//! Readers: JSON Lines event replay and CSV parsing of the first-hadron
//! and momentum files.

use crate::writer::FIRST_HADRON_HEADER;
use crate::{Error, Result};
use csv::StringRecord;
use log::warn;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use stringfrag_algorithms::{FirstHadronSample, MomentumSample};
use stringfrag_core::{Event, EventGenerator, GenerationError, ParticleRecord};

/// One line of an engine dump.
#[derive(Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum EventLine {
    Generated { particles: Vec<ParticleRecord> },
    Failed {
        #[serde(default)]
        reason: Option<String>,
    },
}

/// Replays events dumped by the engine as JSON Lines.
///
/// Every non-blank line is one generation outcome:
///
/// ```text
/// {"outcome":"generated","particles":[{"pdg_id":211,"status":83,...}, ...]}
/// {"outcome":"failed","reason":"hadronization failed"}
/// ```
///
/// Record indices are reassigned by position. A line that does not parse
/// counts as a failed generation, not as a fatal error.
pub struct JsonlEventSource<R: BufRead> {
    reader: R,
    line: String,
    line_number: usize,
}

impl JsonlEventSource<BufReader<File>> {
    /// Opens a dump file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonlEventSource<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }

    fn parse_line(&self) -> std::result::Result<Event, GenerationError> {
        match serde_json::from_str::<EventLine>(&self.line) {
            Ok(EventLine::Generated { particles }) => Ok(Event::from_records(particles)),
            Ok(EventLine::Failed { reason }) => Err(GenerationError::Failed(
                reason.unwrap_or_else(|| "engine reported failure".to_string()),
            )),
            Err(err) => {
                warn!("line {}: malformed event record: {err}", self.line_number);
                Err(GenerationError::Failed(format!(
                    "line {}: {err}",
                    self.line_number
                )))
            }
        }
    }
}

impl<R: BufRead> EventGenerator for JsonlEventSource<R> {
    fn generate_next(&mut self) -> std::result::Result<Event, GenerationError> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return Err(GenerationError::Exhausted),
                Ok(_) => {
                    self.line_number += 1;
                    if self.line.trim().is_empty() {
                        continue;
                    }
                    return self.parse_line();
                }
                Err(err) => {
                    self.line_number += 1;
                    return Err(GenerationError::Failed(format!(
                        "line {}: {err}",
                        self.line_number
                    )));
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "JsonlReplay"
    }
}

/// One row of the first-emission CSV, keyed by header.
#[derive(Deserialize)]
struct FirstHadronRow {
    #[serde(rename = "Event")]
    event: String,
    #[serde(rename = "Index")]
    index: usize,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "ID")]
    pdg_id: i32,
    #[serde(rename = "Status")]
    status: i32,
    px: f64,
    py: f64,
    pz: f64,
    #[serde(rename = "E")]
    e: f64,
    m: f64,
    #[serde(rename = "Mother1")]
    mother1: i32,
    #[serde(rename = "Mother2")]
    mother2: i32,
    #[serde(rename = "Daughter1")]
    daughter1: i32,
    #[serde(rename = "Daughter2")]
    daughter2: i32,
    #[serde(rename = "IsFinal")]
    is_final: u8,
}

impl FirstHadronRow {
    fn into_sample(self, line: u64) -> Result<FirstHadronSample> {
        let is_final = match self.is_final {
            1 => true,
            0 => false,
            other => {
                return Err(Error::ParseError {
                    line,
                    message: format!("IsFinal must be 0 or 1, found {other}"),
                })
            }
        };
        Ok(FirstHadronSample {
            event: self.event,
            index: self.index,
            name: self.name,
            pdg_id: self.pdg_id,
            status: self.status,
            px: self.px,
            py: self.py,
            pz: self.pz,
            e: self.e,
            m: self.m,
            mother1: self.mother1,
            mother2: self.mother2,
            daughter1: self.daughter1,
            daughter2: self.daughter2,
            is_final,
        })
    }
}

/// One row of the momentum dump; the file has no header row.
#[derive(Deserialize)]
struct MomentumRow {
    event: usize,
    pdg_id: i32,
    px: f64,
    py: f64,
    pz: f64,
    e: f64,
    mass: f64,
}

const MOMENTUM_COLUMNS: usize = 7;

fn record_line(record: &StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

fn row_error(err: csv::Error) -> Error {
    match err.position().map(csv::Position::line) {
        Some(line) => Error::ParseError {
            line,
            message: err.to_string(),
        },
        None => Error::Csv(err),
    }
}

/// Reads a first-emission CSV file.
pub fn read_first_hadron_csv<P: AsRef<Path>>(path: P) -> Result<Vec<FirstHadronSample>> {
    parse_first_hadron_csv(File::open(path)?)
}

/// Parses first-emission CSV content. The header must match exactly.
pub fn parse_first_hadron_csv<R: Read>(reader: R) -> Result<Vec<FirstHadronSample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(Error::InvalidFormat("empty file, expected header".to_string()));
    }
    let header = headers.iter().collect::<Vec<_>>().join(",");
    if header != FIRST_HADRON_HEADER {
        return Err(Error::InvalidFormat(format!("unexpected header: {header}")));
    }

    let mut samples = Vec::new();
    for result in reader.records() {
        let record = result.map_err(row_error)?;
        let line = record_line(&record);
        let row: FirstHadronRow = record
            .deserialize(Some(&headers))
            .map_err(|err| Error::ParseError {
                line,
                message: err.to_string(),
            })?;
        samples.push(row.into_sample(line)?);
    }
    Ok(samples)
}

/// Reads a final-state momentum dump.
pub fn read_momentum_csv<P: AsRef<Path>>(path: P) -> Result<Vec<MomentumSample>> {
    parse_momentum_csv(File::open(path)?)
}

/// Parses momentum-dump content: `#` lines are comments, every other line
/// holds the seven columns of [`MOMENTUM_HEADER`](crate::MOMENTUM_HEADER).
pub fn parse_momentum_csv<R: Read>(reader: R) -> Result<Vec<MomentumSample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(reader);

    let mut samples = Vec::new();
    for result in reader.records() {
        let record = result.map_err(row_error)?;
        let line = record_line(&record);
        if record.len() != MOMENTUM_COLUMNS {
            return Err(Error::ParseError {
                line,
                message: format!(
                    "expected {MOMENTUM_COLUMNS} fields, found {}",
                    record.len()
                ),
            });
        }
        let row: MomentumRow = record.deserialize(None).map_err(|err| Error::ParseError {
            line,
            message: err.to_string(),
        })?;
        samples.push(MomentumSample {
            event: row.event,
            pdg_id: row.pdg_id,
            px: row.px,
            py: row.py,
            pz: row.pz,
            e: row.e,
            mass: row.mass,
        });
    }
    Ok(samples)
}
