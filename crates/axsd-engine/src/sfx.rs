//! One-shot sound effects, mixed independently of song playback.

use std::collections::VecDeque;

/// A queued sound effect: raw unsigned 8-bit PCM drained front to
/// back as it plays.
#[derive(Clone, Debug)]
pub struct Sfx {
    /// Remaining PCM bytes; the sound is dropped once empty.
    pub data: VecDeque<u8>,
    /// Fractional resampling accumulator.
    pub accumulator: f32,
    /// Playback rate; larger values consume source bytes faster.
    pub pitch: f32,
    pub pan_l: f32,
    pub pan_r: f32,
}

impl Sfx {
    /// Wrap raw PCM bytes with a pitch and stereo pan.
    pub fn new(data: impl Into<VecDeque<u8>>, pitch: f32, pan_l: f32, pan_r: f32) -> Self {
        Self {
            data: data.into(),
            accumulator: 0.0,
            pitch,
            pan_l,
            pan_r,
        }
    }

    /// Wrap a sound embedded as a compiled-in byte array.
    ///
    /// # Safety
    ///
    /// `data` must point to `len` bytes valid for reads for the
    /// duration of the call.
    pub unsafe fn from_ptr(data: *const u8, len: usize, pitch: f32, pan_l: f32, pan_r: f32) -> Self {
        Self::new(std::slice::from_raw_parts(data, len).to_vec(), pitch, pan_l, pan_r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_with_zero_accumulator() {
        let sfx = Sfx::new(vec![1, 2, 3], 0.5, 1.0, 1.0);
        assert_eq!(sfx.accumulator, 0.0);
        assert_eq!(sfx.data.len(), 3);
    }

    #[test]
    fn from_ptr_copies_the_bytes() {
        let bytes = [10u8, 20, 30];
        let sfx = unsafe { Sfx::from_ptr(bytes.as_ptr(), bytes.len(), 1.0, 0.5, 0.5) };
        assert_eq!(sfx.data, [10, 20, 30]);
    }
}
