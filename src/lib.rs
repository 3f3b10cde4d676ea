//! Enumerate musical scales across all keys and derive tabular data for scale recognition.
//!
//! The [`table::ScaleTableGenerator`] combines every deduplicated key of a [`key::KeyCatalog`] with every scale type of a [`scale::ScaleTypeCatalog`].
//! The resulting [`table::ScaleRecord`]s can be written as JSON or reshaped into a [`data::DataTable`] for a [`training::Trainer`].

pub mod data;
pub mod error;
pub mod key;
pub mod pitch;
pub mod scale;
pub mod table;
pub mod training;
