//! Voice: a live note instance with a phase accumulator.

/// One sounding note. Voices are appended to a channel on note-on and
/// removed once `active` clears.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voice {
    /// MIDI note; drum voices use it only as the drum-map key.
    pub note: u8,
    /// Velocity scaled to [0, 1].
    pub velocity: f32,
    /// Dimensionless position; scaled by the patch ratio to index the
    /// wavetable.
    pub phase: f32,
    /// Phase added once per output sample.
    pub phase_add_by: f32,
    /// False once the note is released; a released voice never
    /// re-enters the wavetable loop.
    pub key: bool,
    /// Cleared when the voice walks off the end of its wavetable.
    pub active: bool,
}

impl Voice {
    /// Create a voice from a raw 0..=127 velocity.
    pub fn new(note: u8, velocity: u8, phase_add_by: f32) -> Self {
        Self {
            note,
            velocity: velocity as f32 / 127.0,
            phase: 0.0,
            phase_add_by,
            key: true,
            active: true,
        }
    }

    /// Release the key; playback continues until the wavetable ends.
    pub fn release(&mut self) {
        self.key = false;
    }
}
