use serde::Deserialize;
use serde::Serialize;

pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// An absolute pitch in 12-EDO using MIDI numbering.
///
/// Octaves are counted such that C&nbsp;-1 is MIDI number 0, C&nbsp;0 is MIDI number 12 and C&nbsp;4 (middle C) is MIDI number 60.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pitch {
    midi_number: i32,
}

impl Pitch {
    pub fn from_midi_number(midi_number: i32) -> Self {
        Self { midi_number }
    }

    /// Creates the [`Pitch`] `pitch_class` semitones above C in the given octave.
    ///
    /// `pitch_class` is allowed to leave the range `0..12`. In that case, the pitch spills over into the neighbouring octave.
    ///
    /// ```
    /// # use scale_table::pitch::Pitch;
    /// assert_eq!(Pitch::from_octave_and_class(-1, 0).midi_number(), 0);
    /// assert_eq!(Pitch::from_octave_and_class(0, 0).midi_number(), 12);
    /// assert_eq!(Pitch::from_octave_and_class(4, 9).midi_number(), 69);
    /// assert_eq!(Pitch::from_octave_and_class(0, -1).midi_number(), 11);
    /// ```
    pub fn from_octave_and_class(octave: i32, pitch_class: i32) -> Self {
        Self::from_midi_number((octave + 1) * SEMITONES_PER_OCTAVE + pitch_class)
    }

    pub fn midi_number(self) -> i32 {
        self.midi_number
    }

    pub fn plus_semitones(self, num_semitones: i32) -> Self {
        Self::from_midi_number(self.midi_number + num_semitones)
    }
}
