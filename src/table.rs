//! Enumerate every (key, scale type) combination and turn it into JSON records.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::Path;

use log::debug;
use log::info;
use serde::Deserialize;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::TableError;
use crate::key::Key;
use crate::key::KeyCatalog;
use crate::pitch::Pitch;
use crate::scale::Scale;
use crate::scale::ScaleTypeCatalog;

/// One row of the scale table.
///
/// `index` is the position of the row in the table. `pitches` spans [`RecordLayout::octaves`] while `octave0` only covers [`RecordLayout::feature_octave`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScaleRecord {
    pub name: String,
    pub index: usize,
    pub key: String,
    pub keys: Vec<String>,
    pub pitches: Vec<i32>,
    pub octave0: Vec<i32>,
}

/// Octaves materialized for each [`ScaleRecord`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordLayout {
    pub octaves: RangeInclusive<i32>,
    pub feature_octave: i32,
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            octaves: -1..=8,
            feature_octave: 0,
        }
    }
}

/// Generates the scale table from explicit key and scale type catalogs.
///
/// # Examples
///
/// ```
/// # use scale_table::table::ScaleTableGenerator;
/// let generator = ScaleTableGenerator::standard();
///
/// let records = generator.records();
/// assert_eq!(records.len(), 17 * 36);
///
/// assert_eq!(records[0].name, "C Major");
/// assert_eq!(records[0].octave0, [12, 14, 16, 17, 19, 21, 23]);
/// assert_eq!(records[36].name, "Db Major");
/// assert_eq!(records[72].name, "C# Major");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScaleTableGenerator {
    pub keys: KeyCatalog,
    pub scale_types: ScaleTypeCatalog,
    pub layout: RecordLayout,
}

impl ScaleTableGenerator {
    pub fn new(keys: KeyCatalog, scale_types: ScaleTypeCatalog) -> Self {
        Self {
            keys,
            scale_types,
            layout: RecordLayout::default(),
        }
    }

    pub fn standard() -> Self {
        Self::new(KeyCatalog::standard(), ScaleTypeCatalog::standard())
    }

    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Flats and sharps concatenated, deduplicated by name (first occurrence wins) and sorted by [`Key::ordinal`].
    ///
    /// Both steps are stable, so keys with equal ordinals keep their catalog order.
    pub fn deduplicated_keys(&self) -> Vec<Key> {
        let notation = self.keys.notation;

        let mut seen = HashSet::new();
        let mut keys: Vec<_> = self
            .keys
            .iter()
            .filter(|key| seen.insert(key.name(notation)))
            .collect();

        keys.sort_by_key(|key| key.ordinal());
        keys
    }

    /// Every scale type rooted at every deduplicated key, keys in the outer loop.
    pub fn generate_all_scales(&self) -> Vec<Scale<'_>> {
        let keys = self.deduplicated_keys();

        let scales: Vec<_> = keys
            .iter()
            .flat_map(|&key| {
                self.scale_types
                    .types()
                    .iter()
                    .map(move |scale_type| Scale::new(scale_type, key))
            })
            .collect();

        debug!(
            "Generated {} scales from {} keys and {} scale types",
            scales.len(),
            keys.len(),
            self.scale_types.len()
        );

        scales
    }

    pub fn to_records(&self, scales: &[Scale]) -> Vec<ScaleRecord> {
        let notation = self.keys.notation;

        scales
            .iter()
            .enumerate()
            .map(|(index, scale)| ScaleRecord {
                name: scale.name(notation),
                index,
                key: scale.key.name(notation),
                keys: scale
                    .key
                    .enharmonics()
                    .into_iter()
                    .map(|key| key.name(notation))
                    .collect(),
                pitches: midi_numbers(scale.pitches_in(self.layout.octaves.clone())),
                octave0: midi_numbers(scale.pitches(self.layout.feature_octave)),
            })
            .collect()
    }

    pub fn records(&self) -> Vec<ScaleRecord> {
        self.to_records(&self.generate_all_scales())
    }
}

fn midi_numbers(pitches: Vec<Pitch>) -> Vec<i32> {
    pitches.into_iter().map(Pitch::midi_number).collect()
}

pub fn serialize_to_json(records: &[ScaleRecord]) -> Result<Vec<u8>, TableError> {
    Ok(serde_json::to_vec_pretty(records)?)
}

pub fn deserialize_from_json(json: &[u8]) -> Result<Vec<ScaleRecord>, TableError> {
    Ok(serde_json::from_slice(json)?)
}

/// Replaces the file at `path` with the JSON encoded `records`.
///
/// The data is written to a temporary file next to `path` which is then renamed. Readers either see the old or the complete new file.
pub fn write_to_path(records: &[ScaleRecord], path: impl AsRef<Path>) -> Result<(), TableError> {
    let path = path.as_ref();
    let json = serialize_to_json(records)?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory).map_err(TableError::filesystem(path))?;
    file.write_all(&json)
        .and_then(|()| file.as_file().sync_all())
        .map_err(TableError::filesystem(path))?;
    file.persist(path)
        .map_err(|err| TableError::filesystem(path)(err.error))?;

    info!("Wrote {} scale records to `{}`", records.len(), path.display());
    Ok(())
}

pub fn read_from_path(path: impl AsRef<Path>) -> Result<Vec<ScaleRecord>, TableError> {
    let path = path.as_ref();
    let json = fs::read(path).map_err(TableError::filesystem(path))?;
    deserialize_from_json(&json)
}
