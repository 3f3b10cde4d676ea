use clap::Parser;
use scale_table::{
    data::Column,
    key::Key,
    table::ScaleTableGenerator,
    training::{self, DEFAULT_FEATURE_COLUMN},
};
use serde_json::json;

use crate::{App, CliResult};

#[derive(Parser)]
pub(crate) struct RowOptions {
    /// Name of the scale type, e.g. "Harmonic Minor" (case-insensitive)
    scale_type: String,

    /// Root of the scale, e.g. C, F# or Bb
    key: Key,
}

impl RowOptions {
    pub fn run(self, app: &mut App, generator: &ScaleTableGenerator) -> CliResult {
        let scale_type = generator
            .scale_types
            .find(&self.scale_type)
            .ok_or_else(|| format!("Unknown scale type `{}`", self.scale_type))?;

        let row = training::prediction_row(scale_type, self.key);
        let features = match row.column(DEFAULT_FEATURE_COLUMN)? {
            Column::IntList(rows) => rows.first().cloned().unwrap_or_default(),
            other => return Err(format!("Unexpected {} feature column", other.kind()).into()),
        };

        app.writeln(json!({ (DEFAULT_FEATURE_COLUMN): features }))?;
        Ok(())
    }
}

pub fn print_list(app: &mut App, generator: &ScaleTableGenerator) -> CliResult {
    for record in generator.records() {
        app.writeln(format_args!(
            "{:>4} | {:<28} | {:?}",
            record.index, record.name, record.octave0
        ))?;
    }
    Ok(())
}
