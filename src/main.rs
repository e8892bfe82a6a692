//! Command-line driver for the Enigma simulator.
//!
//! `enigma CONFIG [INPUT] [OUTPUT]` reads a machine description from CONFIG,
//! then processes settings and message lines from INPUT (standard input when
//! omitted), writing converted messages to OUTPUT (standard output when
//! omitted).

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::{fmt, EnvFilter};

use enigma::{MachineConfig, Session};

#[derive(Parser)]
#[command(name = "enigma")]
#[command(about = "Rotor cipher machine simulator")]
#[command(version)]
struct Cli {
    /// Machine description file
    config: PathBuf,

    /// Settings and messages to process (standard input if omitted)
    input: Option<PathBuf>,

    /// Destination for converted messages (standard output if omitted)
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "enigma=warn",
        1 => "enigma=debug",
        _ => "enigma=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let description = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("could not open {}", cli.config.display()))?;
    let config: MachineConfig = description
        .parse()
        .with_context(|| format!("bad machine description in {}", cli.config.display()))?;
    let mut session = Session::new(config.build()?);

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    session
        .run(input, &mut output)
        .with_context(|| format!("input line {}", session.lines_processed()))?;
    Ok(())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("could not open {}", path.display()))
}
