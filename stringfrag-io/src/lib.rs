//! stringfrag-io: file formats for stringfrag.
//!
//! Run configuration, replay of engine dumps, per-event CSV writers, the
//! human-readable report, and reading first-emission and momentum CSV files
//! back for summary statistics.

mod config;
mod error;
mod reader;
mod report;
mod writer;

pub use config::RunConfig;
pub use error::{Error, Result};
pub use reader::{
    parse_first_hadron_csv, parse_momentum_csv, read_first_hadron_csv, read_momentum_csv,
    JsonlEventSource,
};
pub use report::{write_momentum_summary, write_summary, ReportWriter};
pub use writer::{
    event_key, FirstEmissionCsvWriter, FirstFinalCsvWriter, LeadingPionCsvWriter,
    MomentumCsvWriter, FIRST_FINAL_HEADER, FIRST_HADRON_HEADER, LEADING_PION_HEADER,
    MOMENTUM_HEADER,
};
