use std::path::PathBuf;

use clap::Parser;
use log::info;
use scale_table::{data::DataTable, table, table::ScaleTableGenerator};

use crate::{App, CliResult};

pub const DEFAULT_FILE_NAME: &str = "dataTable.json";

#[derive(Parser)]
pub(crate) struct JsonOptions {
    /// Location of the JSON file [default: dataTable.json on the desktop]
    path: Option<PathBuf>,
}

impl JsonOptions {
    pub fn run(self, app: &mut App, generator: &ScaleTableGenerator) -> CliResult {
        let path = self.path.unwrap_or_else(default_output_path);
        let records = generator.records();

        table::write_to_path(&records, &path)?;

        info!("Exported {} scales", records.len());
        app.errln(format_args!(
            "Wrote {} scales to {}",
            records.len(),
            path.display()
        ))?;
        Ok(())
    }
}

/// The desktop directory, the home directory or the working directory, whichever is found first.
pub fn default_output_path() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_default()
        .join(DEFAULT_FILE_NAME)
}

pub fn print_table(app: &mut App, generator: &ScaleTableGenerator) -> CliResult {
    let table = DataTable::from_records(&generator.records());
    app.write(table)?;
    Ok(())
}
