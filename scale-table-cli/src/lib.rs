mod export;
mod inspect;
mod split;

use std::{
    fmt::{self, Debug, Display},
    fs::{self, File},
    io::{self, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use export::JsonOptions;
use inspect::RowOptions;
use scale_table::{
    error::TableError,
    key::{KeyCatalog, Notation},
    scale::ScaleTypeCatalog,
    table::ScaleTableGenerator,
};
use split::SplitOptions;

#[derive(Parser)]
#[command(version, about)]
struct MainOptions {
    /// Write output to a file instead of stdout
    #[arg(long = "of", global = true)]
    output_file: Option<PathBuf>,

    #[command(flatten)]
    catalog: CatalogOptions,

    #[command(subcommand)]
    command: MainCommand,
}

#[derive(Subcommand)]
enum MainCommand {
    /// Write the scale table to a JSON file
    #[command(name = "json")]
    Json(JsonOptions),

    /// Print the columns and the first rows of the scale table
    #[command(name = "table")]
    Table,

    /// Split a JSON scale table into a training and a test table
    #[command(name = "split")]
    Split(SplitOptions),

    /// Print the feature row used to predict a single scale
    #[command(name = "row")]
    Row(RowOptions),

    /// Print the index, name and root octave pitches of every scale
    #[command(name = "list")]
    List,
}

#[derive(clap::Args)]
struct CatalogOptions {
    /// Load the scale types from a JSON file instead of using the built-in catalog
    #[arg(long = "scale-types", env = "SCALE_TABLE_SCALE_TYPES", global = true)]
    scale_types_file: Option<PathBuf>,

    /// Render doubled accidentals as 𝄪 and 𝄫
    #[arg(
        long = "double-accidentals",
        env = "SCALE_TABLE_DOUBLE_ACCIDENTALS",
        global = true
    )]
    double_accidentals: bool,
}

impl CatalogOptions {
    fn generator(&self) -> CliResult<ScaleTableGenerator> {
        let scale_types = match &self.scale_types_file {
            Some(file_name) => {
                let context = |err: &dyn Display| {
                    CliError::CommandError(format!(
                        "Could not load scale type file `{}`: {err}",
                        file_name.display()
                    ))
                };
                let json = fs::read(file_name).map_err(|err| context(&err))?;
                serde_json::from_slice::<ScaleTypeCatalog>(&json).map_err(|err| context(&err))?
            }
            None => ScaleTypeCatalog::standard(),
        };

        let keys = KeyCatalog::standard().with_notation(Notation {
            double_accidentals: self.double_accidentals,
        });

        Ok(ScaleTableGenerator::new(keys, scale_types))
    }
}

impl MainOptions {
    fn run(self) -> CliResult {
        let stdout = io::stdout();
        let output: Box<dyn Write> = match self.output_file {
            Some(output_file) => Box::new(File::create(output_file)?),
            None => Box::new(stdout.lock()),
        };

        let stderr = io::stderr();
        let error = Box::new(stderr.lock());

        let mut app = App { output, error };

        self.command.run(&mut app, &self.catalog)
    }
}

impl MainCommand {
    fn run(self, app: &mut App, catalog: &CatalogOptions) -> CliResult {
        match self {
            MainCommand::Json(options) => options.run(app, &catalog.generator()?)?,
            MainCommand::Table => export::print_table(app, &catalog.generator()?)?,
            MainCommand::Split(options) => options.run(app)?,
            MainCommand::Row(options) => options.run(app, &catalog.generator()?)?,
            MainCommand::List => inspect::print_list(app, &catalog.generator()?)?,
        }
        Ok(())
    }
}

pub fn run_in_shell_env(args: impl IntoIterator<Item = String>) -> CliResult {
    let options = match MainOptions::try_parse_from(args) {
        Err(err) => {
            return if err.use_stderr() {
                Err(CliError::CommandError(err.to_string()))
            } else {
                print!("{err}");
                Ok(())
            };
        }
        Ok(options) => options,
    };

    options.run()
}

/// Runs the CLI with the given output and error streams. `--of` is ignored.
pub fn run_with_io(
    args: impl IntoIterator<Item = String>,
    mut output: impl Write,
    error: impl Write,
) -> CliResult {
    let options = match MainOptions::try_parse_from(args) {
        Err(err) => {
            return if err.use_stderr() {
                Err(CliError::CommandError(err.to_string()))
            } else {
                output.write_all(err.to_string().as_bytes())?;
                Ok(())
            }
        }
        Ok(options) => options,
    };

    let mut app = App {
        output: Box::new(output),
        error: Box::new(error),
    };

    options.command.run(&mut app, &options.catalog)
}

struct App<'a> {
    output: Box<dyn 'a + Write>,
    error: Box<dyn 'a + Write>,
}

impl App<'_> {
    pub fn write(&mut self, message: impl Display) -> io::Result<()> {
        write!(&mut self.output, "{message}")
    }

    pub fn writeln(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(&mut self.output, "{message}")
    }

    pub fn errln(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(&mut self.error, "{message}")
    }
}

pub type CliResult<T = ()> = Result<T, CliError>;

pub enum CliError {
    IoError(io::Error),
    CommandError(String),
}

impl Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::IoError(err) => write!(f, "IO error / {err}"),
            CliError::CommandError(err) => write!(f, "The command failed / {err}"),
        }
    }
}

impl From<String> for CliError {
    fn from(v: String) -> Self {
        CliError::CommandError(v)
    }
}

impl From<TableError> for CliError {
    fn from(v: TableError) -> Self {
        CliError::CommandError(v.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(v: io::Error) -> Self {
        CliError::IoError(v)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(args: &[&str]) -> (CliResult, String, String) {
        let mut output = Vec::new();
        let mut error = Vec::new();

        let result = run_with_io(
            ["scale-table"].iter().chain(args).map(|&arg| arg.to_owned()),
            &mut output,
            &mut error,
        );

        (
            result,
            String::from_utf8(output).unwrap(),
            String::from_utf8(error).unwrap(),
        )
    }

    #[test]
    fn row_prints_root_octave_pitches() {
        let (result, output, _) = run(&["row", "Major", "C"]);

        assert!(result.is_ok());
        assert_eq!(output, "{\"octave0\":[12,14,16,17,19,21,23]}\n");
    }

    #[test]
    fn row_accepts_unicode_accidentals() {
        let (_, sharp, _) = run(&["row", "minor", "C#"]);
        let (_, unicode, _) = run(&["row", "minor", "C♯"]);

        assert_eq!(sharp, "{\"octave0\":[13,15,16,18,20,21,23]}\n");
        assert_eq!(sharp, unicode);
    }

    #[test]
    fn unknown_scale_type_is_a_command_error() {
        let (result, output, _) = run(&["row", "Nonexistent", "C"]);

        assert!(matches!(
            result,
            Err(CliError::CommandError(message)) if message.contains("Nonexistent")
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn malformed_key_is_rejected_by_the_parser() {
        let (result, _, _) = run(&["row", "Major", "H"]);

        assert!(matches!(result, Err(CliError::CommandError(_))));
    }

    #[test]
    fn key_with_too_many_accidentals_is_rejected_by_the_parser() {
        let key = format!("C{}", "#".repeat(256));
        let (result, output, _) = run(&["row", "Major", &key]);

        assert!(matches!(
            result,
            Err(CliError::CommandError(message)) if message.contains("more than 255 sharps or flats")
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn malformed_scale_type_file_only_affects_commands_using_it() {
        let dir = tempfile::tempdir().unwrap();
        let scale_types = dir.path().join("scale_types.json");
        let table = dir.path().join("dataTable.json");
        let train = dir.path().join("train.json");
        let test = dir.path().join("test.json");
        fs::write(&scale_types, r#"[{ "name": "Broken", "intervals": [0, 7, 3] }]"#).unwrap();

        let path_arg = |path: &PathBuf| path.to_str().unwrap().to_owned();
        let scale_types = path_arg(&scale_types);

        let (result, output, _) = run(&["list", "--scale-types", &scale_types]);
        assert!(matches!(
            result,
            Err(CliError::CommandError(message)) if message.starts_with("Could not load scale type file")
        ));
        assert!(output.is_empty());

        let (result, _, _) = run(&["json", &path_arg(&table)]);
        assert!(result.is_ok());

        let (result, _, error) = run(&[
            "split",
            &path_arg(&table),
            "--train",
            &path_arg(&train),
            "--test",
            &path_arg(&test),
            "--scale-types",
            &scale_types,
        ]);
        assert!(result.is_ok());
        assert!(error.starts_with("Wrote "));
        assert!(train.exists());
        assert!(test.exists());
    }

    #[test]
    fn missing_scale_type_file_is_a_command_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");

        let (result, _, _) = run(&["table", "--scale-types", missing.to_str().unwrap()]);

        assert!(matches!(
            result,
            Err(CliError::CommandError(message)) if message.contains("missing.json")
        ));
    }

    #[test]
    fn list_prints_one_line_per_scale() {
        let (result, output, _) = run(&["list"]);

        assert!(result.is_ok());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 17 * 36);
        assert_eq!(
            lines[0],
            "   0 | C Major                      | [12, 14, 16, 17, 19, 21, 23]"
        );
        assert!(lines[36].starts_with("  36 | Db Major "));
        assert!(lines[72].starts_with("  72 | C# Major "));
    }

    #[test]
    fn table_prints_description() {
        let (result, output, _) = run(&["table"]);

        assert!(result.is_ok());
        assert!(output.starts_with("Columns:\n"));
        assert!(output.contains("Rows: 612\n"));
        assert!(output.contains("    ... 602 more rows\n"));
    }

    #[test]
    fn help_is_written_to_output() {
        let (result, output, _) = run(&["--help"]);

        assert!(result.is_ok());
        assert!(output.contains("Usage:"));
        assert!(output.contains("split"));
    }
}
