//! Musical keys, like the "F#" in "F#&nbsp;minor", and the catalogs they are enumerated from.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::KeyParseError;
use crate::pitch::Pitch;
use crate::pitch::SEMITONES_PER_OCTAVE;

/// The letter of a key without any accidental.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteLetter {
    pub const ALL: [NoteLetter; 7] = [
        NoteLetter::C,
        NoteLetter::D,
        NoteLetter::E,
        NoteLetter::F,
        NoteLetter::G,
        NoteLetter::A,
        NoteLetter::B,
    ];

    /// The number of semitones between C and the natural version of this letter.
    pub fn ordinal(self) -> i32 {
        match self {
            NoteLetter::C => 0,
            NoteLetter::D => 2,
            NoteLetter::E => 4,
            NoteLetter::F => 5,
            NoteLetter::G => 7,
            NoteLetter::A => 9,
            NoteLetter::B => 11,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NoteLetter::C => 'C',
            NoteLetter::D => 'D',
            NoteLetter::E => 'E',
            NoteLetter::F => 'F',
            NoteLetter::G => 'G',
            NoteLetter::A => 'A',
            NoteLetter::B => 'B',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        Some(match c.to_ascii_uppercase() {
            'C' => NoteLetter::C,
            'D' => NoteLetter::D,
            'E' => NoteLetter::E,
            'F' => NoteLetter::F,
            'G' => NoteLetter::G,
            'A' => NoteLetter::A,
            'B' => NoteLetter::B,
            _ => return None,
        })
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Accidental {
    #[default]
    Natural,
    Sharps(u8),
    Flats(u8),
}

impl Accidental {
    /// The number of semitones this accidental raises (positive) or lowers (negative) a letter by.
    pub fn ordinal(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharps(amount) => i32::from(amount),
            Accidental::Flats(amount) => -i32::from(amount),
        }
    }

    fn write_to(self, target: &mut impl Write, notation: Notation) -> fmt::Result {
        let (amount, single, double) = match self {
            Accidental::Natural => return Ok(()),
            Accidental::Sharps(amount) => (amount, '#', '𝄪'),
            Accidental::Flats(amount) => (amount, 'b', '𝄫'),
        };

        if !notation.double_accidentals {
            for _ in 0..amount {
                target.write_char(single)?;
            }
            return Ok(());
        }

        if amount % 2 == 1 {
            target.write_char(single)?;
        }
        for _ in 0..amount / 2 {
            target.write_char(double)?;
        }
        Ok(())
    }
}

/// Controls how accidentals are rendered in key names.
///
/// Key names are compared as strings when deduplicating catalogs, so the notation is part of a key's identity there.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Notation {
    /// Render doubled accidentals as 𝄪 and 𝄫 instead of repeating `#` and `b`.
    pub double_accidentals: bool,
}

/// A musical key identified by its letter and accidental.
///
/// # Examples
///
/// ```
/// # use scale_table::key::{Accidental, Key, NoteLetter};
/// let c_sharp: Key = "C#".parse().unwrap();
/// assert_eq!(c_sharp, Key::new(NoteLetter::C, Accidental::Sharps(1)));
/// assert_eq!(c_sharp.to_string(), "C#");
/// assert_eq!(c_sharp.ordinal(), 1);
///
/// // The alternate flag enables double accidental symbols
/// let d_double_flat = Key::new(NoteLetter::D, Accidental::Flats(2));
/// assert_eq!(d_double_flat.to_string(), "Dbb");
/// assert_eq!(format!("{d_double_flat:#}"), "D𝄫");
/// ```
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub letter: NoteLetter,
    pub accidental: Accidental,
}

impl Key {
    pub const fn new(letter: NoteLetter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    pub const fn natural(letter: NoteLetter) -> Self {
        Self::new(letter, Accidental::Natural)
    }

    pub const fn sharp(letter: NoteLetter) -> Self {
        Self::new(letter, Accidental::Sharps(1))
    }

    pub const fn flat(letter: NoteLetter) -> Self {
        Self::new(letter, Accidental::Flats(1))
    }

    /// Composite ordinal used to sort keys: letter ordinal plus accidental ordinal.
    ///
    /// The result can leave the range `0..12`, e.g. Cb has ordinal -1 and B# has ordinal 12.
    pub fn ordinal(self) -> i32 {
        self.letter.ordinal() + self.accidental.ordinal()
    }

    pub fn pitch_class(self) -> i32 {
        self.ordinal().rem_euclid(SEMITONES_PER_OCTAVE)
    }

    /// The pitch of this key written in the given octave.
    ///
    /// ```
    /// # use scale_table::key::{Key, NoteLetter};
    /// assert_eq!(Key::natural(NoteLetter::C).root_in_octave(0).midi_number(), 12);
    /// assert_eq!(Key::flat(NoteLetter::D).root_in_octave(0).midi_number(), 13);
    /// assert_eq!(Key::flat(NoteLetter::C).root_in_octave(0).midi_number(), 11);
    /// assert_eq!(Key::natural(NoteLetter::A).root_in_octave(4).midi_number(), 69);
    /// ```
    pub fn root_in_octave(self, octave: i32) -> Pitch {
        Pitch::from_octave_and_class(octave, self.ordinal())
    }

    pub fn name(self, notation: Notation) -> String {
        let mut name = String::new();
        name.push(self.letter.as_char());
        // Writing into a String cannot fail
        let _ = self.accidental.write_to(&mut name, notation);
        name
    }

    /// Lists every spelling with at most one accidental that sounds like `self`, ordered by letter.
    ///
    /// ```
    /// # use scale_table::key::{Key, NoteLetter};
    /// let names = |key: Key| key.enharmonics().iter().map(Key::to_string).collect::<Vec<_>>();
    ///
    /// assert_eq!(names(Key::sharp(NoteLetter::C)), ["C#", "Db"]);
    /// assert_eq!(names(Key::natural(NoteLetter::C)), ["C", "B#"]);
    /// assert_eq!(names(Key::natural(NoteLetter::F)), ["E#", "F"]);
    /// assert_eq!(names(Key::sharp(NoteLetter::G)), ["G#", "Ab"]);
    /// ```
    pub fn enharmonics(self) -> Vec<Key> {
        let pitch_class = self.pitch_class();
        NoteLetter::ALL
            .iter()
            .flat_map(|&letter| {
                [
                    Accidental::Natural,
                    Accidental::Sharps(1),
                    Accidental::Flats(1),
                ]
                .map(|accidental| Key::new(letter, accidental))
            })
            .filter(|key| key.pitch_class() == pitch_class)
            .collect()
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let notation = Notation {
            double_accidentals: f.alternate(),
        };
        f.pad(&self.name(notation))
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    /// Parses key names like `C`, `f#`, `Bb`, `Dbb`, `Gx` or `A♯`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();

        let letter = chars
            .next()
            .ok_or(KeyParseError::Empty)
            .and_then(|c| NoteLetter::from_char(c).ok_or(KeyParseError::UnknownLetter(c)))?;

        let mut sharps = 0u8;
        let mut flats = 0u8;
        for c in chars {
            let (count, amount) = match c {
                '#' | '♯' => (&mut sharps, 1),
                'b' | '♭' => (&mut flats, 1),
                'x' | '𝄪' => (&mut sharps, 2),
                '𝄫' => (&mut flats, 2),
                other => return Err(KeyParseError::UnknownAccidental(other)),
            };
            *count = count
                .checked_add(amount)
                .ok_or_else(|| KeyParseError::TooManyAccidentals(trimmed.to_owned()))?;
        }

        let accidental = match (sharps, flats) {
            (0, 0) => Accidental::Natural,
            (sharps, 0) => Accidental::Sharps(sharps),
            (0, flats) => Accidental::Flats(flats),
            _ => return Err(KeyParseError::MixedAccidentals(trimmed.to_owned())),
        };

        Ok(Key::new(letter, accidental))
    }
}

/// The keys a scale table is enumerated from.
///
/// The flats and sharps catalogs are concatenated (flats first) and deduplicated by their names under [`KeyCatalog::notation`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KeyCatalog {
    pub flats: Vec<Key>,
    pub sharps: Vec<Key>,
    #[serde(default)]
    pub notation: Notation,
}

impl KeyCatalog {
    /// All twelve pitch classes spelled with flats and all twelve pitch classes spelled with sharps.
    pub fn standard() -> Self {
        use NoteLetter::*;

        Self {
            flats: vec![
                Key::natural(C),
                Key::flat(D),
                Key::natural(D),
                Key::flat(E),
                Key::natural(E),
                Key::natural(F),
                Key::flat(G),
                Key::natural(G),
                Key::flat(A),
                Key::natural(A),
                Key::flat(B),
                Key::natural(B),
            ],
            sharps: vec![
                Key::natural(C),
                Key::sharp(C),
                Key::natural(D),
                Key::sharp(D),
                Key::natural(E),
                Key::natural(F),
                Key::sharp(F),
                Key::natural(G),
                Key::sharp(G),
                Key::natural(A),
                Key::sharp(A),
                Key::natural(B),
            ],
            notation: Notation::default(),
        }
    }

    pub fn with_notation(mut self, notation: Notation) -> Self {
        self.notation = notation;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        self.flats.iter().chain(&self.sharps).copied()
    }
}

impl Default for KeyCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn names(keys: &[Key]) -> Vec<String> {
        keys.iter().map(Key::to_string).collect()
    }

    #[test]
    fn standard_catalog_spellings() {
        let catalog = KeyCatalog::standard();

        assert_eq!(
            names(&catalog.flats),
            ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"]
        );
        assert_eq!(
            names(&catalog.sharps),
            ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"]
        );

        for keys in [&catalog.flats, &catalog.sharps] {
            let pitch_classes: Vec<_> = keys.iter().map(|key| key.pitch_class()).collect();
            assert_eq!(pitch_classes, (0..12).collect::<Vec<_>>());
        }
    }

    #[test]
    fn names_depend_on_notation() {
        let e_double_sharp = Key::new(NoteLetter::E, Accidental::Sharps(2));
        let b_triple_flat = Key::new(NoteLetter::B, Accidental::Flats(3));

        let plain = Notation::default();
        let symbols = Notation {
            double_accidentals: true,
        };

        assert_eq!(e_double_sharp.name(plain), "E##");
        assert_eq!(e_double_sharp.name(symbols), "E𝄪");
        assert_eq!(b_triple_flat.name(plain), "Bbbb");
        assert_eq!(b_triple_flat.name(symbols), "Bb𝄫");

        // Single accidentals are unaffected
        assert_eq!(Key::flat(NoteLetter::E).name(symbols), "Eb");
    }

    #[test]
    fn parse_key_names() {
        assert_eq!("c".parse::<Key>(), Ok(Key::natural(NoteLetter::C)));
        assert_eq!(" Bb ".parse::<Key>(), Ok(Key::flat(NoteLetter::B)));
        assert_eq!("F♯".parse::<Key>(), Ok(Key::sharp(NoteLetter::F)));
        assert_eq!(
            "Gx".parse::<Key>(),
            Ok(Key::new(NoteLetter::G, Accidental::Sharps(2)))
        );
        assert_eq!(
            "A𝄫".parse::<Key>(),
            Ok(Key::new(NoteLetter::A, Accidental::Flats(2)))
        );

        assert_eq!("".parse::<Key>(), Err(KeyParseError::Empty));
        assert_eq!("H".parse::<Key>(), Err(KeyParseError::UnknownLetter('H')));
        assert_eq!(
            "C?".parse::<Key>(),
            Err(KeyParseError::UnknownAccidental('?'))
        );
        assert_eq!(
            "C#b".parse::<Key>(),
            Err(KeyParseError::MixedAccidentals("C#b".to_owned()))
        );

        let many_sharps = format!("C{}", "#".repeat(255));
        assert_eq!(
            many_sharps.parse::<Key>(),
            Ok(Key::new(NoteLetter::C, Accidental::Sharps(255)))
        );
        let too_many_sharps = format!("C{}", "#".repeat(256));
        assert_eq!(
            too_many_sharps.parse::<Key>(),
            Err(KeyParseError::TooManyAccidentals(too_many_sharps.clone()))
        );
        let too_many_double_flats = format!("E{}", "𝄫".repeat(128));
        assert_eq!(
            too_many_double_flats.parse::<Key>(),
            Err(KeyParseError::TooManyAccidentals(too_many_double_flats.clone()))
        );
    }

    #[test]
    fn every_key_is_among_its_own_enharmonics() {
        for key in KeyCatalog::standard().iter() {
            let enharmonics = key.enharmonics();
            assert!(enharmonics.contains(&key), "{key} missing");
            assert!(enharmonics
                .iter()
                .all(|other| other.pitch_class() == key.pitch_class()));
        }
    }

    #[test]
    fn catalog_from_json() {
        let json = r#"{
            "flats": [{ "letter": "D", "accidental": { "Flats": 1 } }],
            "sharps": [{ "letter": "C", "accidental": "Natural" }]
        }"#;

        let catalog: KeyCatalog = serde_json::from_str(json).unwrap();

        assert_eq!(names(&catalog.flats), ["Db"]);
        assert_eq!(names(&catalog.sharps), ["C"]);
        assert_eq!(catalog.notation, Notation::default());
    }
}
