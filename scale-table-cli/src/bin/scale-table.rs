use std::{env, io::ErrorKind};

use env_logger::Env;
use scale_table_cli::{self, CliError, CliResult};

fn main() -> CliResult {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    match scale_table_cli::run_in_shell_env(env::args()) {
        // The reader of stdout has already terminated, e.g. `scale-table list | head`.
        Err(CliError::IoError(err)) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
