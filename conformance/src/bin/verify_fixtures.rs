//! Verifies a swap-or-not shuffle fixture corpus against the engine.
//!
//! Replays every case through `permuted_index`, `unpermuted_index`,
//! `shuffle_list`, and `unshuffle_list`, reports each failing case, and
//! exits nonzero if any case disagrees. An optional JSON report
//! captures the outcome for CI artifacts.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use swapnot_conformance::{CorpusFormat, FixtureCase, FixtureError, parse_corpus_as};

#[derive(Parser, Debug)]
#[command(
    name = "verify_fixtures",
    version,
    about = "Verifies a swap-or-not shuffle fixture corpus"
)]
struct Cli {
    /// Corpus path
    corpus: PathBuf,

    /// Corpus format
    #[arg(long = "format", value_enum, default_value_t = CorpusFormat::Csv)]
    format: CorpusFormat,

    /// Write a JSON verification report to this path
    #[arg(long = "report")]
    report: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    corpus: String,
    total: usize,
    passed: usize,
    failed: usize,
    failures: Vec<VerifyFailure>,
}

#[derive(Debug, Serialize)]
struct VerifyFailure {
    case: usize,
    seed: String,
    list_size: u64,
    error: String,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(report) if report.failed == 0 => {
            info!(cases = report.total, "corpus verified");
        }
        Ok(report) => {
            error!(
                failed = report.failed,
                total = report.total,
                "corpus verification failed"
            );
            std::process::exit(1);
        }
        Err(err) => {
            error!("could not verify corpus: {err}");
            std::process::exit(2);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<VerifyReport, FixtureError> {
    let text = fs::read_to_string(&cli.corpus)?;
    let cases = parse_corpus_as(&text, cli.format)?;
    let report = verify_cases(&cli.corpus.display().to_string(), &cases);

    for failure in &report.failures {
        error!(
            case = failure.case,
            seed = %failure.seed,
            list_size = failure.list_size,
            "{}",
            failure.error
        );
    }

    if let Some(path) = &cli.report {
        let mut text = serde_json::to_string_pretty(&report)?;
        text.push('\n');
        fs::write(path, text)?;
        info!(path = %path.display(), "wrote verification report");
    }
    Ok(report)
}

fn verify_cases(corpus: &str, cases: &[FixtureCase]) -> VerifyReport {
    let mut failures = Vec::new();
    for (index, case) in cases.iter().enumerate() {
        if let Err(err) = case.verify() {
            failures.push(VerifyFailure {
                case: index + 1,
                seed: hex::encode(case.seed),
                list_size: case.list_size,
                error: err.to_string(),
            });
        }
    }
    VerifyReport {
        corpus: corpus.to_string(),
        total: cases.len(),
        passed: cases.len() - failures.len(),
        failed: failures.len(),
        failures,
    }
}
