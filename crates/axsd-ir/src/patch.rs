//! Patch and drum wavetable types.

use alloc::vec::Vec;

/// Sentinel `loop_start` value meaning the patch does not loop.
pub const NO_LOOP: u32 = 0xFFFF_FFFF;

/// Convert one unsigned bias-128 PCM byte to f32 in roughly [-1, 1).
#[inline]
pub fn pcm_to_f32(byte: u8) -> f32 {
    (byte as f32 - 128.0) / 128.0
}

/// A tonal instrument: a wavetable plus loop points, phase ratio, and
/// stereo gains.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    /// Unsigned 8-bit PCM, bias 128.
    pub waveform: Vec<u8>,
    /// Scale from a voice's phase to a wavetable index.
    pub ratio: f32,
    pub gain_l: f32,
    pub gain_r: f32,
    /// First looped sample, or [`NO_LOOP`] for one-shot playback.
    pub loop_start: u32,
    /// Last looped sample.
    pub loop_end: u32,
}

impl Patch {
    /// Returns true if held voices should wrap inside the loop points.
    ///
    /// A degenerate loop (`loop_end <= loop_start`) is treated as
    /// non-looping; the remap would otherwise take a zero modulus.
    pub fn has_loop(&self) -> bool {
        self.loop_start != NO_LOOP && self.loop_end > self.loop_start
    }

    /// Sample the wavetable, or `None` past the end.
    #[inline]
    pub fn sample_at(&self, index: u32) -> Option<f32> {
        self.waveform.get(index as usize).copied().map(pcm_to_f32)
    }
}

/// A one-shot drum: like [`Patch`] but keyed by drum note and without
/// loop points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Drum {
    /// Unsigned 8-bit PCM, bias 128.
    pub waveform: Vec<u8>,
    /// Scale from a voice's phase to a wavetable index.
    pub ratio: f32,
    pub gain_l: f32,
    pub gain_r: f32,
}

impl Drum {
    /// Sample the wavetable, or `None` past the end.
    #[inline]
    pub fn sample_at(&self, index: u32) -> Option<f32> {
        self.waveform.get(index as usize).copied().map(pcm_to_f32)
    }
}
