use std::path::PathBuf;

use clap::Parser;
use log::info;
use scale_table::{
    data::{self, DEFAULT_SPLIT_SEED, DEFAULT_TRAINING_FRACTION},
    table,
};

use crate::{App, CliResult};

#[derive(Parser)]
pub(crate) struct SplitOptions {
    /// JSON scale table to split
    input: PathBuf,

    /// Location of the training table
    #[arg(long = "train")]
    train: PathBuf,

    /// Location of the test table
    #[arg(long = "test")]
    test: PathBuf,

    /// Probability of a row being assigned to the training table
    #[arg(long = "fraction", default_value_t = DEFAULT_TRAINING_FRACTION)]
    fraction: f64,

    /// Seed of the random split
    #[arg(long = "seed", default_value_t = DEFAULT_SPLIT_SEED)]
    seed: u64,
}

impl SplitOptions {
    pub fn run(self, app: &mut App) -> CliResult {
        if !(0.0..=1.0).contains(&self.fraction) {
            return Err(format!("Fraction must lie in [0, 1] but was {}", self.fraction).into());
        }

        let records = table::read_from_path(&self.input)?;
        let (train, test) = data::partition(&records, self.fraction, self.seed);

        table::write_to_path(&train, &self.train)?;
        table::write_to_path(&test, &self.test)?;

        info!(
            "Split {} rows with seed {} and fraction {}",
            records.len(),
            self.seed,
            self.fraction
        );
        app.errln(format_args!(
            "Wrote {} training rows to {} and {} test rows to {}",
            train.len(),
            self.train.display(),
            test.len(),
            self.test.display()
        ))?;
        Ok(())
    }
}
