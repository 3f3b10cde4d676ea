//! The boundary to the regressor that learns to recognize scales from their pitches.
//!
//! Training, evaluation and persistence are provided by a [`Trainer`] implementation. This module only defines the data it receives.

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::data::Column;
use crate::data::DataTable;
use crate::error::TableError;
use crate::key::Key;
use crate::scale::Scale;
use crate::scale::ScaleType;

pub const DEFAULT_TARGET_COLUMN: &str = "index";
pub const DEFAULT_FEATURE_COLUMN: &str = "octave0";

/// The target and feature columns a model is trained on.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ColumnSelection {
    pub target: String,
    pub features: Vec<String>,
}

impl Default for ColumnSelection {
    /// Predict `index` from `octave0`.
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET_COLUMN.to_owned(),
            features: vec![DEFAULT_FEATURE_COLUMN.to_owned()],
        }
    }
}

impl ColumnSelection {
    /// Checks that `table` provides every selected column.
    pub fn validate(&self, table: &DataTable) -> Result<(), TableError> {
        table.column(&self.target)?;
        for feature in &self.features {
            table.column(feature)?;
        }
        Ok(())
    }

    /// Projects `table` onto the feature columns, e.g. to feed it into [`TrainedModel::predict`].
    pub fn features_of(&self, table: &DataTable) -> Result<DataTable, TableError> {
        let names: Vec<_> = self.features.iter().map(String::as_str).collect();
        table.select(&names)
    }

    /// Reads the target column as regression targets.
    pub fn targets_of(&self, table: &DataTable) -> Result<Vec<f64>, TableError> {
        match table.column(&self.target)? {
            Column::Int(values) => Ok(values.iter().map(|&value| value as f64).collect()),
            _ => Err(TableError::ColumnKind {
                column: self.target.clone(),
                expected: "integer",
            }),
        }
    }
}

/// Creates models from a data table.
pub trait Trainer {
    type Model: TrainedModel<Error = Self::Error>;
    type Error;

    fn train(&self, data: &DataTable, columns: &ColumnSelection)
        -> Result<Self::Model, Self::Error>;
}

pub trait TrainedModel {
    type Error;

    fn evaluate(&self, test_data: &DataTable) -> Result<Metrics, Self::Error>;

    /// Predicts one target value per row of `rows`.
    fn predict(&self, rows: &DataTable) -> Result<Vec<f64>, Self::Error>;

    fn write(&self, path: &Path, metadata: &ModelMetadata) -> Result<(), Self::Error>;
}

/// Regression quality of a model on a test set.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub max_error: f64,
    pub root_mean_squared_error: f64,
}

impl Metrics {
    /// Compares predicted against actual values. Extra elements of the longer slice are ignored.
    ///
    /// ```
    /// # use scale_table::training::Metrics;
    /// let metrics = Metrics::from_predictions(&[1.0, 2.0, 6.0], &[1.0, 3.0, 3.0]);
    /// assert_eq!(metrics.max_error, 3.0);
    /// assert_eq!(metrics.root_mean_squared_error, (10.0f64 / 3.0).sqrt());
    ///
    /// let nothing = Metrics::from_predictions(&[], &[]);
    /// assert_eq!(nothing.max_error, 0.0);
    /// assert_eq!(nothing.root_mean_squared_error, 0.0);
    /// ```
    pub fn from_predictions(predicted: &[f64], actual: &[f64]) -> Self {
        let errors: Vec<_> = predicted
            .iter()
            .zip(actual)
            .map(|(predicted, actual)| (predicted - actual).abs())
            .collect();

        if errors.is_empty() {
            return Self {
                max_error: 0.0,
                root_mean_squared_error: 0.0,
            };
        }

        let max_error = errors.iter().copied().fold(0.0, f64::max);
        let mean_squared_error =
            errors.iter().map(|error| error * error).sum::<f64>() / errors.len() as f64;

        Self {
            max_error,
            root_mean_squared_error: mean_squared_error.sqrt(),
        }
    }
}

/// Descriptive data stored alongside a trained model.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub author: String,
    pub short_description: String,
    pub license: String,
    pub version: String,
    #[serde(default)]
    pub additional: Vec<(String, String)>,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            author: String::new(),
            short_description: "Music Theory Scale Predictor".to_owned(),
            license: "MIT".to_owned(),
            version: "0.0.1".to_owned(),
            additional: Vec::new(),
        }
    }
}

/// A single-row table with the default feature column for `scale_type` rooted at `key`.
///
/// ```
/// # use scale_table::data::Column;
/// # use scale_table::key::Key;
/// # use scale_table::scale::ScaleTypeCatalog;
/// # use scale_table::training;
/// let catalog = ScaleTypeCatalog::standard();
/// let row = training::prediction_row(catalog.find("Minor").unwrap(), "D#".parse::<Key>().unwrap());
///
/// assert_eq!(row.num_rows(), 1);
/// assert_eq!(
///     row.column("octave0").unwrap(),
///     &Column::IntList(vec![vec![15, 17, 18, 20, 22, 23, 25]])
/// );
/// ```
pub fn prediction_row(scale_type: &ScaleType, key: Key) -> DataTable {
    let octave0 = Scale::new(scale_type, key)
        .pitches(0)
        .into_iter()
        .map(|pitch| i64::from(pitch.midi_number()))
        .collect();

    let mut row = DataTable::new();
    // A single column always fits into an empty table
    let _ = row.insert_column(DEFAULT_FEATURE_COLUMN, Column::IntList(vec![octave0]));
    row
}
