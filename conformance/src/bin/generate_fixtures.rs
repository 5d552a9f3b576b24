//! Writes a swap-or-not shuffle fixture corpus.
//!
//! Crosses fixture seeds with list sizes and emits one case per
//! combination, in canonical CSV form by default or as a JSON array of
//! records. The committed reference corpus at
//! `conformance/fixtures/shuffle_vectors.csv` is the default
//! configuration's output.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use swapnot_conformance::{
    CorpusFormat, DEFAULT_LIST_SIZES, DEFAULT_SEED_COUNT, FixtureError, build_corpus,
    encode_corpus_as,
};

#[derive(Parser, Debug)]
#[command(
    name = "generate_fixtures",
    version,
    about = "Writes a swap-or-not shuffle fixture corpus"
)]
struct Cli {
    /// Number of fixture seeds (seed indices 0..count)
    #[arg(long = "seeds", default_value_t = DEFAULT_SEED_COUNT)]
    seeds: u32,

    /// Comma-separated list sizes
    #[arg(long = "sizes", value_delimiter = ',', default_values_t = DEFAULT_LIST_SIZES.iter().copied())]
    sizes: Vec<u64>,

    /// Output path; writes to stdout when omitted
    #[arg(long = "output")]
    output: Option<PathBuf>,

    /// Corpus format
    #[arg(long = "format", value_enum, default_value_t = CorpusFormat::Csv)]
    format: CorpusFormat,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("fixture generation failed: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    // Stdout is the corpus stream in piped mode; diagnostics stay on
    // stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), FixtureError> {
    let cases = build_corpus(cli.seeds, &cli.sizes)?;
    info!(
        cases = cases.len(),
        seeds = cli.seeds,
        sizes = cli.sizes.len(),
        "built fixture corpus"
    );

    let payload = encode_corpus_as(&cases, cli.format)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, payload)?;
            info!(path = %path.display(), "wrote fixture corpus");
        }
        None => io::stdout().write_all(payload.as_bytes())?,
    }
    Ok(())
}
