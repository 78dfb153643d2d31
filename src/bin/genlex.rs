//! Lexicon generator: reads a `count TAB form` frequency list (a file
//! argument or stdin) and writes the sorted pronunciation lexicon to
//! stdout. Exits non-zero if any entry fails inventory validation.

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use unilex_g2p::{G2P, Language, lexicon};

fn run() -> Result<(), unilex_g2p::G2PError> {
    let g2p = G2P::new(Language::Venetian)?;
    let stdout = io::stdout().lock();
    match std::env::args().nth(1) {
        Some(path) => lexicon::generate(&g2p, BufReader::new(File::open(path)?), stdout),
        None => lexicon::generate(&g2p, io::stdin().lock(), stdout),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
