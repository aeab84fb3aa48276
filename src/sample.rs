//! Bernoulli sampling of rows.
//!
//! Every data row is kept independently with the same probability. This is
//! not reservoir sampling: the number of rows in the output is random.

use crate::errors::{self, Result};
use crate::settings::StreamSettings;
use crate::stream::{self, RowStream, Selector};
use crate::summary::Summary;
use csv::StringRecord;
use log::info;
use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;
use std::path::Path;

/// Default keep-probability.
pub const DEFAULT_PROBABILITY: f64 = 0.01;

pub struct Bernoulli {
    probability: f64,
    rng: Xoshiro256PlusPlus,
}

impl Bernoulli {
    pub fn new(probability: f64, seed: u64) -> Result<Bernoulli> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(errors::invalid_argument(format!(
                "probability must be between 0 and 1, got {probability}"
            )));
        }
        Ok(Bernoulli {
            probability,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        })
    }
}

impl Selector for Bernoulli {
    fn select(&mut self, _record: &StringRecord) -> bool {
        self.rng.r#gen::<f64>() < self.probability
    }
}

/// What to sample.
pub struct SampleArgs<'a> {
    pub infile: &'a Path,
    pub outfile: &'a Path,

    /// Keep-probability of each data row, in `[0, 1]`.
    pub probability: f64,

    /// Random seed; if not given, a random seed is used.
    pub seed: Option<u64>,

    pub settings: StreamSettings,
}

/// Write the header and a random sample of the rows of `infile` to `outfile`.
pub fn sample_file(args: &SampleArgs) -> Result<Summary> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut selector = Bernoulli::new(args.probability, seed)?;
    info!("scanning {}", args.infile.display());
    info!(
        "sampling ~{}% of rows (seed {seed})",
        args.probability * 100.0
    );
    let rows = RowStream::open(args.infile, args.settings)?;
    let writer = stream::create_output(args.outfile)?;
    rows.copy_to(writer, &mut selector)
}
