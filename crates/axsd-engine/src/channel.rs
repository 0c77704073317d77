//! Channel state: per-channel voice lists and wavetable mix-down.

use std::collections::BTreeMap;

use axsd_ir::{Drum, Patch};

use crate::pitch::tonal_phase_increment;
use crate::voice::Voice;

/// The channel slot reserved for the drum kit.
pub const DRUM_CHANNEL: usize = 9;

/// One of the player's 16 channel slots.
#[derive(Clone, Debug)]
pub enum Channel {
    /// A pitched channel playing its assigned patch.
    Tonal(TonalChannel),
    /// The drum kit; each voice keys the drum map by note.
    Drum(DrumChannel),
}

impl Channel {
    /// Create a tonal channel with voice storage reserved up front.
    pub fn tonal(voice_capacity: usize) -> Self {
        Self::Tonal(TonalChannel {
            voices: Vec::with_capacity(voice_capacity),
            bend: 0.0,
            patch_id: None,
        })
    }

    /// Create the drum channel with voice storage reserved up front.
    pub fn drum(voice_capacity: usize) -> Self {
        Self::Drum(DrumChannel {
            voices: Vec::with_capacity(voice_capacity),
        })
    }

    pub fn is_drum_kit(&self) -> bool {
        matches!(self, Self::Drum(_))
    }

    pub fn voices(&self) -> &[Voice] {
        match self {
            Self::Tonal(group) => &group.voices,
            Self::Drum(group) => &group.voices,
        }
    }

    pub fn voices_mut(&mut self) -> &mut Vec<Voice> {
        match self {
            Self::Tonal(group) => &mut group.voices,
            Self::Drum(group) => &mut group.voices,
        }
    }

    /// Release the first voice still holding its key, if any.
    /// Note-off carries only a channel, so polyphony releases oldest
    /// first rather than by matching note.
    pub fn release_oldest(&mut self) {
        if let Some(voice) = self.voices_mut().iter_mut().find(|v| v.key) {
            voice.release();
        }
    }

    /// Drop voices whose wavetables ran out, preserving the order of
    /// the survivors.
    pub fn retain_active(&mut self) {
        self.voices_mut().retain(|v| v.active);
    }
}

/// Voice list plus pitch-bend state for a pitched channel.
#[derive(Clone, Debug, Default)]
pub struct TonalChannel {
    /// Sounding voices in note-on order.
    pub voices: Vec<Voice>,
    /// Current bend in semitones.
    pub bend: f32,
    /// Patch assigned by program change; an unassigned channel is
    /// silent.
    pub patch_id: Option<u8>,
}

impl TonalChannel {
    /// Apply a raw pitch-wheel value: store the bend and rewrite every
    /// live voice's phase step from its note.
    pub fn set_bend(&mut self, bend: i32, frequency: f32) {
        self.bend = bend as f32 / 4096.0;
        for voice in &mut self.voices {
            voice.phase_add_by = tonal_phase_increment(voice.note, self.bend, frequency);
        }
    }

    /// Mix one sample from every voice into the stereo accumulators.
    pub fn accumulate_into(&mut self, patch: &Patch, l: &mut f32, r: &mut f32) {
        for voice in &mut self.voices {
            let mut sample = 0.0;
            let mut index = (patch.ratio * voice.phase) as u32;

            // Held voices wrap inside the loop; released voices run
            // off the end, which is the only release mechanism.
            if patch.has_loop() && index > patch.loop_end && voice.key {
                index = patch.loop_start
                    + (index - patch.loop_start) % (patch.loop_end - patch.loop_start);
            }
            match patch.sample_at(index) {
                Some(value) => sample = value,
                None => voice.active = false,
            }
            voice.phase += voice.phase_add_by;

            *l += sample * voice.velocity * patch.gain_l;
            *r += sample * voice.velocity * patch.gain_r;
        }
    }
}

/// Voice list for the drum kit.
#[derive(Clone, Debug, Default)]
pub struct DrumChannel {
    /// Sounding drum voices in note-on order.
    pub voices: Vec<Voice>,
}

impl DrumChannel {
    /// Mix one sample from every drum voice into the stereo
    /// accumulators. A voice whose note has no drum mapped is
    /// deactivated silently.
    pub fn accumulate_into(&mut self, drums: &BTreeMap<u8, Drum>, l: &mut f32, r: &mut f32) {
        for voice in &mut self.voices {
            let mut sample = 0.0;
            let mut gain_l = 0.0;
            let mut gain_r = 0.0;

            match drums.get(&voice.note) {
                Some(drum) => {
                    let index = (drum.ratio * voice.phase) as u32;
                    match drum.sample_at(index) {
                        Some(value) => sample = value,
                        None => voice.active = false,
                    }
                    gain_l = drum.gain_l;
                    gain_r = drum.gain_r;
                    voice.phase += voice.phase_add_by;
                }
                None => voice.active = false,
            }

            *l += sample * voice.velocity * gain_l;
            *r += sample * voice.velocity * gain_r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axsd_ir::NO_LOOP;

    fn one_shot_patch(waveform: Vec<u8>) -> Patch {
        Patch {
            waveform,
            ratio: 1.0,
            gain_l: 1.0,
            gain_r: 1.0,
            loop_start: NO_LOOP,
            loop_end: 0,
        }
    }

    fn looping_patch(waveform: Vec<u8>, loop_start: u32, loop_end: u32) -> Patch {
        Patch {
            loop_start,
            loop_end,
            ..one_shot_patch(waveform)
        }
    }

    fn mix_once(channel: &mut TonalChannel, patch: &Patch) -> (f32, f32) {
        let (mut l, mut r) = (0.0, 0.0);
        channel.accumulate_into(patch, &mut l, &mut r);
        (l, r)
    }

    #[test]
    fn first_sample_reads_phase_zero() {
        let patch = one_shot_patch(vec![0, 64, 128, 192]);
        let mut channel = TonalChannel::default();
        channel.voices.push(Voice::new(69, 127, 1.0));

        let (l, r) = mix_once(&mut channel, &patch);
        assert_eq!(l, -1.0);
        assert_eq!(r, -1.0);
        assert_eq!(channel.voices[0].phase, 1.0);
    }

    #[test]
    fn gains_and_velocity_scale_output() {
        let patch = Patch {
            gain_l: 0.5,
            gain_r: 0.25,
            ..one_shot_patch(vec![255; 4])
        };
        let mut channel = TonalChannel::default();
        channel.voices.push(Voice::new(69, 127, 1.0));

        let (l, r) = mix_once(&mut channel, &patch);
        let sample = 127.0 / 128.0;
        assert_eq!(l, sample * 0.5);
        assert_eq!(r, sample * 0.25);
    }

    #[test]
    fn voice_deactivates_past_end_of_wavetable() {
        let patch = one_shot_patch(vec![128; 2]);
        let mut channel = TonalChannel::default();
        channel.voices.push(Voice::new(69, 127, 1.0));

        for _ in 0..3 {
            mix_once(&mut channel, &patch);
        }
        assert!(!channel.voices[0].active);
    }

    #[test]
    fn held_voice_stays_inside_loop() {
        let patch = looping_patch(vec![128; 4], 1, 3);
        let mut channel = TonalChannel::default();
        channel.voices.push(Voice::new(69, 127, 1.0));

        for _ in 0..32 {
            mix_once(&mut channel, &patch);
            let index = channel.voices[0].phase as u32;
            let effective = if patch.has_loop() && index > patch.loop_end {
                patch.loop_start + (index - patch.loop_start) % (patch.loop_end - patch.loop_start)
            } else {
                index
            };
            assert!(effective <= 3);
        }
        assert!(channel.voices[0].active);
    }

    #[test]
    fn released_voice_walks_off_the_loop_and_dies() {
        let patch = looping_patch(vec![128; 4], 1, 3);
        let mut channel = TonalChannel::default();
        channel.voices.push(Voice::new(69, 127, 1.0));

        for _ in 0..16 {
            mix_once(&mut channel, &patch);
        }
        assert!(channel.voices[0].active);

        channel.voices[0].release();
        for _ in 0..16 {
            mix_once(&mut channel, &patch);
        }
        assert!(!channel.voices[0].active);
    }

    #[test]
    fn release_oldest_picks_first_keyed_voice() {
        let mut channel = Channel::tonal(4);
        channel.voices_mut().push(Voice::new(60, 127, 1.0));
        channel.voices_mut().push(Voice::new(64, 127, 1.0));
        channel.voices_mut().push(Voice::new(67, 127, 1.0));

        channel.release_oldest();
        assert!(!channel.voices()[0].key);
        assert!(channel.voices()[1].key);

        channel.release_oldest();
        assert!(!channel.voices()[1].key);
        assert!(channel.voices()[2].key);
    }

    #[test]
    fn retain_active_preserves_survivor_order() {
        let mut channel = Channel::tonal(4);
        for note in [60u8, 62, 64, 65] {
            channel.voices_mut().push(Voice::new(note, 127, 1.0));
        }
        channel.voices_mut()[1].active = false;
        channel.voices_mut()[3].active = false;

        channel.retain_active();
        let notes: Vec<u8> = channel.voices().iter().map(|v| v.note).collect();
        assert_eq!(notes, [60, 64]);
    }

    #[test]
    fn drum_voice_without_mapping_deactivates() {
        let drums = BTreeMap::new();
        let mut channel = DrumChannel::default();
        channel.voices.push(Voice::new(35, 127, 1.0));

        let (mut l, mut r) = (0.0, 0.0);
        channel.accumulate_into(&drums, &mut l, &mut r);
        assert_eq!((l, r), (0.0, 0.0));
        assert!(!channel.voices[0].active);
    }

    #[test]
    fn drum_voice_mixes_with_drum_gains() {
        let mut drums = BTreeMap::new();
        drums.insert(
            35,
            Drum {
                waveform: vec![255; 8],
                ratio: 1.0,
                gain_l: 0.5,
                gain_r: 1.0,
            },
        );
        let mut channel = DrumChannel::default();
        channel.voices.push(Voice::new(35, 127, 1.0));

        let (mut l, mut r) = (0.0, 0.0);
        channel.accumulate_into(&drums, &mut l, &mut r);
        let sample = 127.0 / 128.0;
        assert_eq!(l, sample * 0.5);
        assert_eq!(r, sample * 1.0);
    }

    #[test]
    fn set_bend_rewrites_live_voice_increments() {
        let frequency = 1.0 / 44100.0;
        let mut channel = TonalChannel::default();
        channel
            .voices
            .push(Voice::new(69, 127, tonal_phase_increment(69, 0.0, frequency)));
        let before = channel.voices[0].phase_add_by;

        channel.set_bend(4096, frequency); // one semitone up
        assert_eq!(channel.bend, 1.0);
        let after = channel.voices[0].phase_add_by;
        assert!(after > before);
        assert_eq!(after, tonal_phase_increment(69, 1.0, frequency));
    }
}
