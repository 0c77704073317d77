//! AXSD container parser.
//!
//! The container is a 4-byte magic followed by tagged records: a
//! 1-byte command tag, then a fixed-size payload (note and meta
//! commands) or a fixed prefix plus a counted sample payload (patch
//! and drum uploads). All multi-byte integers are little-endian;
//! floats are bit-reinterpreted u32s.

use tracing::debug;

use axsd_ir::{Command, Drum, Patch, Song};

use crate::reader::ByteReader;
use crate::FormatError;

/// The container magic, "AXSD" (0x41585344 read big-endian).
pub const AXSD_MAGIC: &[u8; 4] = b"AXSD";

/// Command tags as they appear on the wire.
mod tag {
    pub const NOTE_ON: u8 = 0x01;
    pub const NOTE_OFF: u8 = 0x02;
    pub const PITCH_WHEEL: u8 = 0x03;
    pub const PROGRAM_CHANGE: u8 = 0x04;
    pub const PATCH_DATA: u8 = 0x80;
    pub const DRUM_DATA: u8 = 0x81;
    pub const VERSION: u8 = 0xFC;
    pub const RATE: u8 = 0xFD;
    pub const END_OF_TRACK: u8 = 0xFE;
}

/// Decode an AXSD container into a [`Song`].
pub fn load_axsd(data: &[u8]) -> Result<Song, FormatError> {
    let mut reader = ByteReader::new(data);

    if reader.take(4).map_err(|_| FormatError::BadMagic)? != AXSD_MAGIC {
        return Err(FormatError::BadMagic);
    }

    let mut song = Song::new();
    while !reader.is_empty() {
        match reader.u8()? {
            tag::NOTE_ON => {
                let tick = reader.u32_le()?;
                let channel = channel_index(reader.u8()?)?;
                let note = reader.u8()?;
                let velocity = reader.u8()?;
                song.insert(
                    tick,
                    Command::NoteOn {
                        channel,
                        note,
                        velocity,
                    },
                );
            }
            tag::NOTE_OFF => {
                let tick = reader.u32_le()?;
                let channel = channel_index(reader.u8()?)?;
                song.insert(tick, Command::NoteOff { channel });
            }
            tag::PITCH_WHEEL => {
                let tick = reader.u32_le()?;
                let channel = channel_index(reader.u8()?)?;
                let bend = reader.s32_le()?;
                song.insert(tick, Command::PitchWheel { channel, bend });
            }
            tag::PROGRAM_CHANGE => {
                let tick = reader.u32_le()?;
                let channel = channel_index(reader.u8()?)?;
                let program = reader.u8()?;
                song.insert(tick, Command::ProgramChange { channel, program });
            }
            tag::PATCH_DATA => parse_patch_data(&mut reader, &mut song)?,
            tag::DRUM_DATA => parse_drum_data(&mut reader, &mut song)?,
            tag::VERSION => {
                let version = reader.u16_le()?;
                song.version = version;
                song.insert(0, Command::Version(version));
            }
            tag::RATE => {
                let rate = reader.u32_le()?;
                song.ticks_per_second = rate;
                song.insert(0, Command::Rate(rate));
            }
            tag::END_OF_TRACK => {
                let end = reader.u32_le()?;
                song.ticks_end = end;
                song.insert(end, Command::EndOfTrack);
            }
            unknown => return Err(FormatError::UnknownTag(unknown)),
        }
    }

    debug!(
        commands = song.command_count(),
        patches = song.patches.len(),
        drums = song.drums.len(),
        ticks_end = song.ticks_end,
        "loaded AXSD song"
    );
    Ok(song)
}

/// Decode a song embedded as a compiled-in byte array.
///
/// # Safety
///
/// `data` must point to `len` bytes valid for reads for the duration
/// of the call.
pub unsafe fn load_axsd_ptr(data: *const u8, len: usize) -> Result<Song, FormatError> {
    load_axsd(core::slice::from_raw_parts(data, len))
}

/// Validate a channel field against the 16 player channels.
fn channel_index(raw: u8) -> Result<u8, FormatError> {
    if raw < 16 {
        Ok(raw)
    } else {
        Err(FormatError::OutOfRangeIndex(raw))
    }
}

/// Parse a patch upload: fixed prefix, then `sample_count` PCM bytes.
fn parse_patch_data(reader: &mut ByteReader, song: &mut Song) -> Result<(), FormatError> {
    let program = reader.u8()?;
    let sample_count = reader.u32_le()? as usize;
    let loop_start = reader.u32_le()?;
    let loop_end = reader.u32_le()?;
    let ratio = reader.f32_le()?;
    let gain_l = reader.f32_le()?;
    let gain_r = reader.f32_le()?;
    let waveform = reader.take(sample_count)?.to_vec();

    song.patches.insert(
        program,
        Patch {
            waveform,
            ratio,
            gain_l,
            gain_r,
            loop_start,
            loop_end,
        },
    );
    song.insert(0, Command::PatchData { program });
    Ok(())
}

/// Parse a drum upload: fixed prefix, then `sample_count` PCM bytes.
fn parse_drum_data(reader: &mut ByteReader, song: &mut Song) -> Result<(), FormatError> {
    let note = reader.u8()?;
    let sample_count = reader.u32_le()? as usize;
    let ratio = reader.f32_le()?;
    let gain_l = reader.f32_le()?;
    let gain_r = reader.f32_le()?;
    let waveform = reader.take(sample_count)?.to_vec();

    song.drums.insert(
        note,
        Drum {
            waveform,
            ratio,
            gain_l,
            gain_r,
        },
    );
    song.insert(0, Command::DrumData { note });
    Ok(())
}
