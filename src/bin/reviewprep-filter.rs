use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::{error, info, warn};
use reviewprep::errors::Result;
use reviewprep::filter::{self, DEFAULT_COLUMN, FilterArgs};
use reviewprep::outliers::OutlierSet;
use reviewprep::settings::StreamOpts;
use reviewprep::summary;
use std::path::PathBuf;
use std::process;

/// Remove the rows of outlier reviewers from a CSV file
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input file (CSV)
    infile: PathBuf,
    /// Output file (CSV)
    outfile: PathBuf,
    /// Identifier column
    #[arg(long, default_value = DEFAULT_COLUMN)]
    column: String,
    /// Identifiers to remove, as a JSON array
    #[arg(long, value_name = "FILE")]
    outliers: Option<PathBuf>,
    /// Identifier to remove (can be repeated)
    #[arg(long = "id", value_name = "ID")]
    ids: Vec<String>,
    #[command(flatten)]
    stream: StreamOpts,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn outlier_set(args: &Args) -> Result<OutlierSet> {
    if args.outliers.is_none() && args.ids.is_empty() {
        info!("using the built-in outlier set");
        return Ok(OutlierSet::builtin());
    }
    let mut set = match &args.outliers {
        Some(path) => OutlierSet::load(path)?,
        None => OutlierSet::default(),
    };
    set.extend(&args.ids);
    if set.is_empty() {
        warn!("outlier set is empty, nothing will be removed");
    }
    Ok(set)
}

fn process(args: &Args) -> Result<()> {
    let outliers = outlier_set(args)?;
    let filter_args = FilterArgs {
        infile: &args.infile,
        outfile: &args.outfile,
        column: &args.column,
        outliers: &outliers,
        settings: args.stream.settings(),
    };
    let result = filter::filter_file(&filter_args)?;
    info!("done: {}", result.read);
    if let Some(path) = &args.stream.summary_file {
        summary::write_summary_file(path, &result, args.stream.compact)?;
    }
    println!(
        "Created '{}' with {} rows ({} removed).",
        args.outfile.display(),
        result.rows,
        result.removed
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
