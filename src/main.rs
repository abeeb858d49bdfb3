use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Assemble a searchable PDF from scanned page images and OCR word boxes.
///
/// Prints `OK` on success, or `ERROR` followed by a one-line message.
#[derive(Parser)]
#[command(name = "scan2pdf", version, about)]
struct Cli {
    /// Document descriptor XML
    input: PathBuf,
    /// Output PDF path
    output: PathBuf,
}

fn main() -> ExitCode {
    // stdout carries the status protocol; logs go to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match scan2pdf::convert_descriptor_to_pdf(&cli.input, &cli.output) {
        Ok(()) => {
            println!("OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:?}");
            println!("ERROR");
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}
