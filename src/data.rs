//! Column-oriented view of a scale table, the shape trainers consume.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::TableError;
use crate::table::ScaleRecord;

/// Fraction of rows used for training in the default split.
pub const DEFAULT_TRAINING_FRACTION: f64 = 0.8;

/// Seed of the default split.
pub const DEFAULT_SPLIT_SEED: u64 = 5;

const PREVIEW_ROWS: usize = 10;

#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Int(Vec<i64>),
    Str(Vec<String>),
    IntList(Vec<Vec<i64>>),
    StrList(Vec<Vec<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Int(values) => values.len(),
            Column::Str(values) => values.len(),
            Column::IntList(values) => values.len(),
            Column::StrList(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Column::Int(_) => "integer",
            Column::Str(_) => "string",
            Column::IntList(_) => "integer list",
            Column::StrList(_) => "string list",
        }
    }

    fn pick(&self, rows: &[usize]) -> Column {
        fn pick<T: Clone>(values: &[T], rows: &[usize]) -> Vec<T> {
            rows.iter().map(|&row| values[row].clone()).collect()
        }

        match self {
            Column::Int(values) => Column::Int(pick(values, rows)),
            Column::Str(values) => Column::Str(pick(values, rows)),
            Column::IntList(values) => Column::IntList(pick(values, rows)),
            Column::StrList(values) => Column::StrList(pick(values, rows)),
        }
    }

    fn fmt_cell(&self, f: &mut Formatter, row: usize) -> fmt::Result {
        match self {
            Column::Int(values) => write!(f, "{}", values[row]),
            Column::Str(values) => write!(f, "{}", values[row]),
            Column::IntList(values) => write!(f, "{:?}", values[row]),
            Column::StrList(values) => write!(f, "{:?}", values[row]),
        }
    }
}

/// Named columns of equal length. Row `i` of every column belongs to the same record.
///
/// # Examples
///
/// ```
/// # use scale_table::data::{Column, DataTable};
/// # use scale_table::error::TableError;
/// let mut table = DataTable::new();
/// table.insert_column("index", Column::Int(vec![0, 1, 2])).unwrap();
///
/// let too_short = table.insert_column("key", Column::Str(vec!["C".to_owned()]));
/// assert!(matches!(too_short, Err(TableError::ColumnLength { expected: 3, actual: 1, .. })));
///
/// assert_eq!(table.num_rows(), 3);
/// assert_eq!(table.column("index").unwrap(), &Column::Int(vec![0, 1, 2]));
/// assert!(matches!(table.column("key"), Err(TableError::UnknownColumn(_))));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<(String, Column)>,
    num_rows: usize,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns `name`, `index`, `key`, `keys`, `pitches` and `octave0`, one row per record.
    pub fn from_records(records: &[ScaleRecord]) -> Self {
        fn int_list(values: &[i32]) -> Vec<i64> {
            values.iter().copied().map(i64::from).collect()
        }

        let columns = vec![
            (
                "name".to_owned(),
                Column::Str(records.iter().map(|r| r.name.clone()).collect()),
            ),
            (
                "index".to_owned(),
                Column::Int(records.iter().map(|r| r.index as i64).collect()),
            ),
            (
                "key".to_owned(),
                Column::Str(records.iter().map(|r| r.key.clone()).collect()),
            ),
            (
                "keys".to_owned(),
                Column::StrList(records.iter().map(|r| r.keys.clone()).collect()),
            ),
            (
                "pitches".to_owned(),
                Column::IntList(records.iter().map(|r| int_list(&r.pitches)).collect()),
            ),
            (
                "octave0".to_owned(),
                Column::IntList(records.iter().map(|r| int_list(&r.octave0)).collect()),
            ),
        ];

        Self {
            columns,
            num_rows: records.len(),
        }
    }

    /// Adds `column` or replaces an existing column of the same name.
    ///
    /// The first column of an empty table determines the number of rows.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), TableError> {
        let name = name.into();

        if self.columns.is_empty() {
            self.num_rows = column.len();
        } else if column.len() != self.num_rows {
            return Err(TableError::ColumnLength {
                column: name,
                expected: self.num_rows,
                actual: column.len(),
            });
        }

        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = column,
            None => self.columns.push((name, column)),
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, column)| column)
            .ok_or_else(|| TableError::UnknownColumn(name.to_owned()))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Projects the table onto the given columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<DataTable, TableError> {
        let mut selected = DataTable::new();
        for &name in names {
            selected.insert_column(name, self.column(name)?.clone())?;
        }
        Ok(selected)
    }

    /// Copies the given rows, in the given order, into a new table.
    pub fn rows(&self, rows: &[usize]) -> DataTable {
        DataTable {
            columns: self
                .columns
                .iter()
                .map(|(name, column)| (name.clone(), column.pick(rows)))
                .collect(),
            num_rows: rows.len(),
        }
    }

    /// Splits the rows into two tables, keeping each row in the first table with probability `fraction`.
    ///
    /// The split only depends on `num_rows`, `fraction` and `seed`.
    pub fn random_split(&self, fraction: f64, seed: u64) -> (DataTable, DataTable) {
        let (first, second) = partition_indices(self.num_rows, fraction, seed);
        (self.rows(&first), self.rows(&second))
    }
}

impl Display for DataTable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name_width = self
            .columns
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);

        writeln!(f, "Columns:")?;
        for (name, column) in &self.columns {
            writeln!(f, "    {name:<name_width$}  {}", column.kind())?;
        }
        writeln!(f, "Rows: {}", self.num_rows)?;
        writeln!(f, "Data:")?;
        for row in 0..self.num_rows.min(PREVIEW_ROWS) {
            write!(f, "    [{row}]")?;
            for (position, (name, column)) in self.columns.iter().enumerate() {
                let separator = if position == 0 { " " } else { ", " };
                write!(f, "{separator}{name}: ")?;
                column.fmt_cell(f, row)?;
            }
            writeln!(f)?;
        }
        if self.num_rows > PREVIEW_ROWS {
            writeln!(f, "    ... {} more rows", self.num_rows - PREVIEW_ROWS)?;
        }
        Ok(())
    }
}

/// Splits `rows` like [`DataTable::random_split`] splits the rows of a table.
pub fn partition<T: Clone>(rows: &[T], fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let (first, second) = partition_indices(rows.len(), fraction, seed);
    let pick = |indices: Vec<usize>| -> Vec<T> {
        indices.into_iter().map(|i| rows[i].clone()).collect()
    };
    (pick(first), pick(second))
}

fn partition_indices(num_rows: usize, fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..num_rows).partition(|_| rng.gen::<f64>() < fraction)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::table::ScaleTableGenerator;

    use super::*;

    #[test]
    fn columns_are_aligned_with_records() {
        let records = ScaleTableGenerator::standard().records();
        let table = DataTable::from_records(&records);

        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            ["name", "index", "key", "keys", "pitches", "octave0"]
        );
        assert_eq!(table.num_rows(), records.len());

        let Column::Str(names) = table.column("name").unwrap() else {
            panic!("name should be a string column");
        };
        let Column::IntList(octave0) = table.column("octave0").unwrap() else {
            panic!("octave0 should be an integer list column");
        };
        for (row, record) in records.iter().enumerate() {
            assert_eq!(names[row], record.name);
            assert_eq!(
                octave0[row],
                record.octave0.iter().map(|&p| i64::from(p)).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn select_projects_and_reports_unknown_columns() {
        let table = DataTable::from_records(&ScaleTableGenerator::standard().records());

        let selected = table.select(&["octave0", "index"]).unwrap();
        assert_eq!(
            selected.column_names().collect::<Vec<_>>(),
            ["octave0", "index"]
        );
        assert_eq!(selected.num_rows(), table.num_rows());

        assert!(matches!(
            table.select(&["octave1"]),
            Err(TableError::UnknownColumn(name)) if name == "octave1"
        ));
    }

    #[test]
    fn insert_column_replaces_existing_column() {
        let mut table = DataTable::new();
        table.insert_column("index", Column::Int(vec![0, 1])).unwrap();
        table.insert_column("index", Column::Int(vec![5, 6])).unwrap();

        assert_eq!(table.column_names().collect::<Vec<_>>(), ["index"]);
        assert_eq!(table.column("index").unwrap(), &Column::Int(vec![5, 6]));
    }

    #[test]
    fn random_split_is_deterministic_and_complete() {
        let table = DataTable::from_records(&ScaleTableGenerator::standard().records());

        let (train, test) = table.random_split(DEFAULT_TRAINING_FRACTION, DEFAULT_SPLIT_SEED);
        let (train_again, test_again) =
            table.random_split(DEFAULT_TRAINING_FRACTION, DEFAULT_SPLIT_SEED);

        assert_eq!(train, train_again);
        assert_eq!(test, test_again);
        assert_eq!(train.num_rows() + test.num_rows(), table.num_rows());
        assert!(train.num_rows() > test.num_rows());

        let Column::Int(train_indices) = train.column("index").unwrap() else {
            panic!("index should be an integer column");
        };
        let Column::Int(test_indices) = test.column("index").unwrap() else {
            panic!("index should be an integer column");
        };
        assert!(train_indices.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(test_indices.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(train_indices
            .iter()
            .all(|index| !test_indices.contains(index)));
    }

    #[test]
    fn extreme_fractions() {
        let rows: Vec<_> = (0..20).collect();

        assert_eq!(partition(&rows, 1.0, 1), (rows.clone(), Vec::new()));
        assert_eq!(partition(&rows, 0.0, 1), (Vec::new(), rows.clone()));
    }

    #[test]
    fn partition_matches_table_split() {
        let records = ScaleTableGenerator::standard().records();
        let table = DataTable::from_records(&records);

        let (train_records, test_records) = partition(&records, 0.5, 42);
        let (train_table, test_table) = table.random_split(0.5, 42);

        assert_eq!(DataTable::from_records(&train_records), train_table);
        assert_eq!(DataTable::from_records(&test_records), test_table);
    }

    #[test]
    fn description_lists_columns_and_preview() {
        let mut table = DataTable::new();
        table
            .insert_column("name", Column::Str(vec!["C Major".to_owned()]))
            .unwrap();
        table
            .insert_column("octave0", Column::IntList(vec![vec![12, 14, 16]]))
            .unwrap();

        assert_eq!(
            table.to_string(),
            "Columns:\n    \
             name     string\n    \
             octave0  integer list\n\
             Rows: 1\n\
             Data:\n    \
             [0] name: C Major, octave0: [12, 14, 16]\n"
        );
    }

    #[test]
    fn description_truncates_long_tables() {
        let table = DataTable::from_records(&ScaleTableGenerator::standard().records());
        let description = table.to_string();

        assert!(description.contains("Rows: 612\n"));
        assert!(description.contains("    [9] name: C Dorian, index: 9, key: C,"));
        assert!(!description.contains("[10]"));
        assert!(description.ends_with("    ... 602 more rows\n"));
    }
}
