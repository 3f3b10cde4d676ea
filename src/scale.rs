//! Scale types (interval patterns) and scales, i.e. scale types rooted at a [`Key`].

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::RangeInclusive;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ScaleTypeError;
use crate::key::Key;
use crate::key::Notation;
use crate::pitch::Pitch;
use crate::pitch::SEMITONES_PER_OCTAVE;

/// A named interval pattern, e.g. "Major" = 0, 2, 4, 5, 7, 9, 11.
///
/// Intervals are semitones above the root. They start at 0, are strictly ascending and stay within one octave.
///
/// # Examples
///
/// ```
/// # use scale_table::error::ScaleTypeError;
/// # use scale_table::scale::ScaleType;
/// let whole_tone = ScaleType::new("Whole Tone", vec![0, 2, 4, 6, 8, 10]).unwrap();
/// assert_eq!(whole_tone.intervals().len(), 6);
///
/// assert_eq!(ScaleType::new("Empty", vec![]).unwrap_err(), ScaleTypeError::Empty);
/// assert_eq!(ScaleType::new("Rootless", vec![2, 4]).unwrap_err(), ScaleTypeError::MissingRoot);
/// assert_eq!(ScaleType::new("Unsorted", vec![0, 4, 2]).unwrap_err(), ScaleTypeError::NotAscending);
/// assert_eq!(ScaleType::new("Too wide", vec![0, 7, 12]).unwrap_err(), ScaleTypeError::OutOfOctave);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedScaleType")]
pub struct ScaleType {
    name: String,
    intervals: Vec<u8>,
}

impl ScaleType {
    pub fn new(name: impl Into<String>, intervals: Vec<u8>) -> Result<Self, ScaleTypeError> {
        match intervals.first() {
            None => return Err(ScaleTypeError::Empty),
            Some(&first) if first != 0 => return Err(ScaleTypeError::MissingRoot),
            Some(_) => {}
        }
        if intervals.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ScaleTypeError::NotAscending);
        }
        if intervals
            .iter()
            .any(|&interval| i32::from(interval) >= SEMITONES_PER_OCTAVE)
        {
            return Err(ScaleTypeError::OutOfOctave);
        }

        Ok(Self {
            name: name.into(),
            intervals,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intervals(&self) -> &[u8] {
        &self.intervals
    }
}

impl Display for ScaleType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(&self.name)
    }
}

#[derive(Deserialize)]
struct UncheckedScaleType {
    name: String,
    intervals: Vec<u8>,
}

impl TryFrom<UncheckedScaleType> for ScaleType {
    type Error = ScaleTypeError;

    fn try_from(unchecked: UncheckedScaleType) -> Result<Self, Self::Error> {
        ScaleType::new(unchecked.name, unchecked.intervals)
    }
}

/// The ordered list of scale types a scale table is enumerated from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaleTypeCatalog {
    types: Vec<ScaleType>,
}

impl ScaleTypeCatalog {
    pub fn new(types: Vec<ScaleType>) -> Self {
        Self { types }
    }

    /// The built-in catalog, starting with "Major" and "Minor".
    ///
    /// Some patterns appear under more than one name (e.g. "Major" and "Ionian"). Both entries are kept since they are distinct scale types.
    pub fn standard() -> Self {
        let types = STANDARD_SCALE_TYPES
            .iter()
            .map(|&(name, intervals)| ScaleType {
                name: name.to_owned(),
                intervals: intervals.to_vec(),
            })
            .collect();

        Self { types }
    }

    pub fn types(&self) -> &[ScaleType] {
        &self.types
    }

    pub fn find(&self, name: &str) -> Option<&ScaleType> {
        self.types
            .iter()
            .find(|scale_type| scale_type.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for ScaleTypeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

const STANDARD_SCALE_TYPES: &[(&str, &[u8])] = &[
    ("Major", &[0, 2, 4, 5, 7, 9, 11]),
    ("Minor", &[0, 2, 3, 5, 7, 8, 10]),
    ("Harmonic Minor", &[0, 2, 3, 5, 7, 8, 11]),
    ("Melodic Minor", &[0, 2, 3, 5, 7, 9, 11]),
    ("Pentatonic Major", &[0, 2, 4, 7, 9]),
    ("Pentatonic Minor", &[0, 3, 5, 7, 10]),
    ("Pentatonic Blues", &[0, 3, 5, 6, 7, 10]),
    ("Pentatonic Neutral", &[0, 2, 5, 7, 10]),
    ("Ionian", &[0, 2, 4, 5, 7, 9, 11]),
    ("Dorian", &[0, 2, 3, 5, 7, 9, 10]),
    ("Phrygian", &[0, 1, 3, 5, 7, 8, 10]),
    ("Lydian", &[0, 2, 4, 6, 7, 9, 11]),
    ("Mixolydian", &[0, 2, 4, 5, 7, 9, 10]),
    ("Aeolian", &[0, 2, 3, 5, 7, 8, 10]),
    ("Locrian", &[0, 1, 3, 5, 6, 8, 10]),
    ("Whole Tone", &[0, 2, 4, 6, 8, 10]),
    ("Half Whole Diminished", &[0, 1, 3, 4, 6, 7, 9, 10]),
    ("Whole Half Diminished", &[0, 2, 3, 5, 6, 8, 9, 11]),
    ("Augmented", &[0, 3, 4, 7, 8, 11]),
    ("Chromatic", &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
    ("Bebop Major", &[0, 2, 4, 5, 7, 8, 9, 11]),
    ("Bebop Dominant", &[0, 2, 4, 5, 7, 9, 10, 11]),
    ("Bebop Minor", &[0, 2, 3, 4, 5, 7, 9, 10]),
    ("Hungarian Minor", &[0, 2, 3, 6, 7, 8, 11]),
    ("Hungarian Major", &[0, 3, 4, 6, 7, 9, 10]),
    ("Neapolitan Minor", &[0, 1, 3, 5, 7, 8, 11]),
    ("Neapolitan Major", &[0, 1, 3, 5, 7, 9, 11]),
    ("Enigmatic", &[0, 1, 4, 6, 8, 10, 11]),
    ("Spanish Gypsy", &[0, 1, 4, 5, 7, 8, 10]),
    ("Persian", &[0, 1, 4, 5, 6, 8, 11]),
    ("Double Harmonic", &[0, 1, 4, 5, 7, 8, 11]),
    ("Lydian Dominant", &[0, 2, 4, 6, 7, 9, 10]),
    ("Super Locrian", &[0, 1, 3, 4, 6, 8, 10]),
    ("Romanian Minor", &[0, 2, 3, 6, 7, 9, 10]),
    ("Hirajoshi", &[0, 2, 3, 7, 8]),
    ("In Sen", &[0, 1, 5, 7, 10]),
];

/// A [`ScaleType`] rooted at a [`Key`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Scale<'a> {
    pub scale_type: &'a ScaleType,
    pub key: Key,
}

impl<'a> Scale<'a> {
    pub fn new(scale_type: &'a ScaleType, key: Key) -> Self {
        Self { scale_type, key }
    }

    /// The pitches of the scale starting at the key's root in the given octave.
    ///
    /// Only the root is pinned to `octave`. The remaining pitches follow the interval pattern and may cross into the next octave.
    ///
    /// ```
    /// # use scale_table::key::{Key, NoteLetter};
    /// # use scale_table::scale::{Scale, ScaleTypeCatalog};
    /// let catalog = ScaleTypeCatalog::standard();
    /// let major = catalog.find("major").unwrap();
    ///
    /// let c_major = Scale::new(major, Key::natural(NoteLetter::C));
    /// let midi_numbers = |octave| c_major.pitches(octave).iter().map(|p| p.midi_number()).collect::<Vec<_>>();
    ///
    /// assert_eq!(midi_numbers(0), [12, 14, 16, 17, 19, 21, 23]);
    /// assert_eq!(midi_numbers(4), [60, 62, 64, 65, 67, 69, 71]);
    /// ```
    pub fn pitches(&self, octave: i32) -> Vec<Pitch> {
        let root = self.key.root_in_octave(octave);
        self.scale_type
            .intervals
            .iter()
            .map(|&interval| root.plus_semitones(i32::from(interval)))
            .collect()
    }

    /// Concatenates [`Scale::pitches`] for every octave in `octaves`, lowest octave first.
    pub fn pitches_in(&self, octaves: RangeInclusive<i32>) -> Vec<Pitch> {
        octaves.flat_map(|octave| self.pitches(octave)).collect()
    }

    /// `"<key> <scale type>"`, e.g. `"C# Harmonic Minor"`.
    pub fn name(&self, notation: Notation) -> String {
        format!("{} {}", self.key.name(notation), self.scale_type.name)
    }
}

impl Display for Scale<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let notation = Notation {
            double_accidentals: f.alternate(),
        };
        f.pad(&self.name(notation))
    }
}
