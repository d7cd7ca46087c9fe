//! Thin entry point: parse arguments, initialize logging, hand off to
//! [`uniqseq::cli::run`], and turn any error into a process exit code.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use uniqseq::cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = uniqseq::cli::run(cli) {
        tracing::error!(error = %err, "uniqseq run failed");
        eprintln!("uniqseq: {err}");
        std::process::exit(1);
    }
}
