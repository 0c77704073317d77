//! Command types for the tick-driven playback engine.

/// A decoded song command.
///
/// Note and controller commands fire when the playback cursor reaches
/// their tick. The payload-bearing and meta commands (patch and drum
/// uploads, version, tempo, end-of-track) take effect while the
/// container is decoded; they stay in the command stream as markers
/// and the dispatcher ignores them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start a voice on a channel.
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Release the oldest held voice on a channel.
    NoteOff { channel: u8 },
    /// Bend a tonal channel; `bend / 4096` semitones.
    PitchWheel { channel: u8, bend: i32 },
    /// Assign a patch to a tonal channel.
    ProgramChange { channel: u8, program: u8 },
    /// Marker left by a patch upload record.
    PatchData { program: u8 },
    /// Marker left by a drum upload record.
    DrumData { note: u8 },
    /// Marker left by the container version record.
    Version(u16),
    /// Marker left by the tick-rate record.
    Rate(u32),
    /// Marker left by the end-of-track record.
    EndOfTrack,
}
