//! Note-to-phase-increment conversion.
//!
//! Converts a MIDI note number + pitch bend + output sample period
//! into the per-sample phase step a voice adds to its accumulator.
//! The scale constants are calibration values baked into the song
//! format; existing songs depend on them bit-exactly.

use core::f32::consts::PI;

/// Concert pitch, the frequency of MIDI note 69.
pub const A440: f32 = 440.0;

/// Phase scale for tonal voices: one unit of phase per source sample
/// at 44100 Hz for an A440 note.
const TUNE_COEFF: f32 = 44100.0 / A440;

/// Twelve-tone equal temperament with bend:
/// `2^((note - 69 + bend) / 12) * 440`.
///
/// `bend` is in semitones (the pitch-wheel value divided by 4096).
pub fn twelve_tet(note: u8, bend: f32) -> f32 {
    2.0f32.powf((note as f32 - 69.0 + bend) / 12.0) * A440
}

/// Per-sample phase step for a tonal voice.
///
/// `frequency` is the output sample period, `1 / sample_rate`.
pub fn tonal_phase_increment(note: u8, bend: f32, frequency: f32) -> f32 {
    twelve_tet(note, bend) * frequency * TUNE_COEFF
}

/// Per-sample phase step for a drum voice. Fixed: drums ignore both
/// note pitch and bend.
pub fn drum_phase_increment(frequency: f32) -> f32 {
    A440 * frequency * 32.0 * PI
}
