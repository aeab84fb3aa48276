use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::{error, info};
use reviewprep::errors::Result;
use reviewprep::head::{self, DEFAULT_ROWS, HeadArgs};
use reviewprep::settings::StreamOpts;
use reviewprep::summary;
use std::path::PathBuf;
use std::process;

/// Keep the first rows of a CSV file
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input file (CSV)
    infile: PathBuf,
    /// Output file (CSV)
    outfile: PathBuf,
    /// Number of rows to keep, not counting the header
    #[arg(short = 'n', long, default_value_t = DEFAULT_ROWS)]
    rows: u64,
    #[command(flatten)]
    stream: StreamOpts,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn process(args: &Args) -> Result<()> {
    let head_args = HeadArgs {
        infile: &args.infile,
        outfile: &args.outfile,
        rows: args.rows,
        settings: args.stream.settings(),
    };
    let result = head::head_file(&head_args)?;
    info!("done: {result}");
    if let Some(path) = &args.stream.summary_file {
        summary::write_summary_file(path, &result, args.stream.compact)?;
    }
    println!(
        "Created '{}' with the first {} rows.",
        args.outfile.display(),
        result.kept
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(args.verbose.log_level_filter())
        .init();
    match process(&args) {
        Ok(()) => (),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
