use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::{error, info};
use reviewprep::errors::Result;
use reviewprep::sample::{self, DEFAULT_PROBABILITY, SampleArgs};
use reviewprep::settings::StreamOpts;
use reviewprep::summary;
use std::path::PathBuf;
use std::process;

/// Keep a random sample of the rows of a CSV file
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input file (CSV)
    infile: PathBuf,
    /// Output file (CSV)
    outfile: PathBuf,
    /// Probability of keeping each row
    #[arg(short, long, default_value_t = DEFAULT_PROBABILITY)]
    probability: f64,
    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    stream: StreamOpts,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn process(args: &Args) -> Result<()> {
    let sample_args = SampleArgs {
        infile: &args.infile,
        outfile: &args.outfile,
        probability: args.probability,
        seed: args.seed,
        settings: args.stream.settings(),
    };
    let result = sample::sample_file(&sample_args)?;
    info!("done: {result}");
    if let Some(path) = &args.stream.summary_file {
        summary::write_summary_file(path, &result, args.stream.compact)?;
    }
    println!("Processed {} rows.", result.processed);
    println!(
        "Created '{}' with {} rows.",
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
