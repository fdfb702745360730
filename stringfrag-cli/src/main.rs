//! stringfrag command-line interface.
//!
//! Replays hadronization events dumped by the engine and writes the
//! first-emission analysis, momentum dumps and summary statistics.
#![allow(clippy::too_many_lines)]

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use stringfrag_algorithms::{
    classify_batch, collect_events, first_final, for_each_event, leading_pion, run_analysis,
    tally_classifications, FirstHadronSummary, MomentumSummary, RunSummary,
};
use stringfrag_io::{
    read_first_hadron_csv, read_momentum_csv, write_momentum_summary, write_summary,
    FirstEmissionCsvWriter, FirstFinalCsvWriter, JsonlEventSource, LeadingPionCsvWriter,
    MomentumCsvWriter, ReportWriter, RunConfig,
};
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    StringfragIo(#[from] stringfrag_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] stringfrag_core::Error),
}

/// First-emission analysis of quark-string hadronization events.
#[derive(Parser)]
#[command(name = "stringfrag")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Event source and run settings shared by the event-processing commands.
#[derive(Args)]
struct RunArgs {
    /// Engine dump, one JSON event outcome per line
    input: PathBuf,

    /// JSON run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of events to process
    #[arg(short = 'n', long)]
    events: Option<usize>,

    /// Energy of each seed parton (GeV)
    #[arg(long)]
    seed_energy: Option<f64>,

    /// String energy used for momentum fractions (GeV)
    #[arg(long)]
    string_energy: Option<f64>,
}

impl RunArgs {
    fn load_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(events) = self.events {
            config = config.with_events(events);
        }
        if let Some(energy) = self.seed_energy {
            config = config.with_seed_energy(energy);
        }
        if let Some(energy) = self.string_energy {
            config = config.with_string_energy(energy);
        }
        config.validate()?;
        info!(
            "{} event(s), string energy {} GeV",
            config.events,
            config.string_energy()
        );
        Ok(config)
    }

    fn open_source(&self) -> Result<JsonlEventSource<io::BufReader<File>>> {
        info!("Replaying events from {}", self.input.display());
        Ok(JsonlEventSource::open(&self.input)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify primary hadrons and write first-emission hadrons
    Analyze {
        #[command(flatten)]
        run: RunArgs,

        /// First-emission CSV output
        #[arg(short, long, default_value = "first_hadrons.csv")]
        output: PathBuf,

        /// Per-event report file (stdout if omitted)
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Load all events, then classify them in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Dump momenta of all final-state hadrons
    Momenta {
        #[command(flatten)]
        run: RunArgs,

        /// Output CSV
        #[arg(short, long, default_value = "final_state_momenta.csv")]
        output: PathBuf,
    },

    /// Write the most energetic final-state pion of each event
    LeadingPion {
        #[command(flatten)]
        run: RunArgs,

        /// Output CSV
        #[arg(short, long, default_value = "leading_pion.csv")]
        output: PathBuf,
    },

    /// Write the first final-state particle of each event
    FirstFinal {
        #[command(flatten)]
        run: RunArgs,

        /// Output CSV
        #[arg(short, long, default_value = "first_final.csv")]
        output: PathBuf,
    },

    /// Summary statistics of a first-emission CSV or a momentum dump
    Stats {
        /// CSV written by `analyze` (or by `momenta` with `--momenta`)
        #[arg(default_value = "first_hadrons.csv")]
        input: PathBuf,

        /// Treat the input as a final-state momentum dump
        #[arg(long)]
        momenta: bool,
    },
}

fn report_sink(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn print_run_summary(summary: &RunSummary, output: &Path, rows: usize) {
    if summary.generated < summary.requested {
        warn!(
            "{} of {} requested events were generated",
            summary.generated, summary.requested
        );
    }
    eprintln!(
        "Processed {} events ({} failed), wrote {} rows to {}",
        summary.generated,
        summary.failed,
        rows,
        output.display()
    );
}

fn analyze(run: &RunArgs, output: &Path, report: Option<&Path>, parallel: bool) -> Result<()> {
    let config = run.load_config()?;
    let classifier_config = config.classifier_config();
    let mut source = run.open_source()?;
    let mut csv = FirstEmissionCsvWriter::create(output)?;
    let mut report = ReportWriter::new(report_sink(report)?);
    let start = Instant::now();

    let summary = if parallel {
        let (events, mut summary) = collect_events(&mut source, config.events);
        let classifications = classify_batch(&events, &classifier_config);
        for (numbered, classification) in events.iter().zip(&classifications) {
            report.write_event(numbered.number, &numbered.event, classification)?;
            csv.write_event(numbered.number, &numbered.event, classification)?;
        }
        tally_classifications(&mut summary, &classifications);
        summary
    } else {
        run_analysis(
            &mut source,
            config.events,
            &classifier_config,
            |number, event, classification| -> stringfrag_io::Result<()> {
                report.write_event(number, event, classification)?;
                csv.write_event(number, event, classification)?;
                Ok(())
            },
        )?
    };

    report.write_run_summary(&summary)?;
    report.flush()?;
    csv.flush()?;
    info!("Analysis finished in {:.2}s", start.elapsed().as_secs_f64());
    print_run_summary(&summary, output, csv.rows());
    Ok(())
}

fn momenta(run: &RunArgs, output: &Path) -> Result<()> {
    let config = run.load_config()?;
    let mut source = run.open_source()?;
    let mut writer = MomentumCsvWriter::create(output)?;
    let mut rows = 0usize;
    let summary = for_each_event(&mut source, config.events, |number, event| {
        rows += writer.write_event(number, event)?;
        Ok::<(), stringfrag_io::Error>(())
    })?;
    writer.flush()?;
    print_run_summary(&summary, output, rows);
    Ok(())
}

fn leading_pions(run: &RunArgs, output: &Path) -> Result<()> {
    let config = run.load_config()?;
    let mut source = run.open_source()?;
    let mut writer = LeadingPionCsvWriter::create(output)?;
    let mut rows = 0usize;
    let summary = for_each_event(&mut source, config.events, |number, event| {
        match leading_pion(event) {
            Some(pion) => {
                writer.write(number, pion)?;
                rows += 1;
            }
            None => info!("Event {number}: no final-state pion"),
        }
        Ok::<(), stringfrag_io::Error>(())
    })?;
    writer.flush()?;
    print_run_summary(&summary, output, rows);
    Ok(())
}

fn first_finals(run: &RunArgs, output: &Path) -> Result<()> {
    let config = run.load_config()?;
    let mut source = run.open_source()?;
    let mut writer = FirstFinalCsvWriter::create(output)?;
    let mut rows = 0usize;
    let summary = for_each_event(&mut source, config.events, |number, event| {
        match first_final(event) {
            Some(particle) => {
                writer.write(number, particle)?;
                rows += 1;
            }
            None => info!("Event {number}: no final-state particle"),
        }
        Ok::<(), stringfrag_io::Error>(())
    })?;
    writer.flush()?;
    print_run_summary(&summary, output, rows);
    Ok(())
}

fn stats(input: &Path) -> Result<()> {
    let samples = read_first_hadron_csv(input)?;
    let Some(summary) = FirstHadronSummary::from_samples(&samples) else {
        println!("No first hadrons found in {}", input.display());
        return Ok(());
    };
    let mut out = io::stdout().lock();
    write_summary(&mut out, &summary)?;
    out.flush()?;
    Ok(())
}

fn momentum_stats(input: &Path) -> Result<()> {
    let samples = read_momentum_csv(input)?;
    let Some(summary) = MomentumSummary::from_samples(&samples) else {
        println!("No particles found in {}", input.display());
        return Ok(());
    };
    info!(
        "Loaded {} particles from {} events",
        summary.kinematics.total, summary.events
    );
    let mut out = io::stdout().lock();
    write_momentum_summary(&mut out, &summary)?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze {
            run,
            output,
            report,
            parallel,
        } => analyze(run, output, report.as_deref(), *parallel),
        Commands::Momenta { run, output } => momenta(run, output),
        Commands::LeadingPion { run, output } => leading_pions(run, output),
        Commands::FirstFinal { run, output } => first_finals(run, output),
        Commands::Stats { input, momenta } => {
            if *momenta {
                momentum_stats(input)
            } else {
                stats(input)
            }
        }
    }
}
