//! The player: owns a song and renders it sample by sample.

use thiserror::Error;
use tracing::debug;

use axsd_ir::{Command, Environment, Song, CURRENT_VERSION};

use crate::channel::{Channel, DRUM_CHANNEL};
use crate::echo::Echo;
use crate::pitch::{drum_phase_increment, tonal_phase_increment};
use crate::sfx::Sfx;
use crate::voice::Voice;

/// Error type for starting playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlayError {
    /// The song's container version is not the one this engine plays.
    #[error("version mismatch in wanted song: 0x{0:04X}")]
    VersionMismatch(u16),
    /// The song has no tick rate; the time cursor cannot advance.
    #[error("song tick rate is zero")]
    ZeroTickRate,
    /// The environment's delay length is zero; the echo cursor cannot
    /// wrap.
    #[error("echo environment has a zero cursor_max")]
    ZeroEchoPeriod,
}

/// Sampler/sequencer playback state.
///
/// `tick` is meant to be called from a single producer (typically an
/// audio callback); nothing on the render path blocks, performs I/O,
/// or allocates.
pub struct Player {
    song: Song,
    channels: [Channel; 16],

    seconds_elapsed: f32,
    seconds_end: f32,
    /// Output sample period, `1 / sample_rate`.
    frequency: f32,

    max_voices: u32,
    on_voices: u32,

    cursor: u32,
    last_cursor: Option<u32>,

    echo: Echo,
    env: Option<Environment>,
    sfx: Vec<Sfx>,

    in_stereo: bool,
    playback: bool,
}

impl Player {
    /// Create an idle player for the given output format. Playback
    /// starts when a song is handed to [`Player::play`].
    pub fn new(max_voices: u32, sample_rate: u32, in_stereo: bool) -> Self {
        debug_assert!(sample_rate > 0, "output sample rate must be nonzero");
        Self {
            song: Song::default(),
            channels: empty_channels(0),
            seconds_elapsed: 0.0,
            seconds_end: 0.0,
            frequency: 1.0 / sample_rate as f32,
            max_voices,
            on_voices: 0,
            cursor: 0,
            last_cursor: None,
            echo: Echo::new(),
            env: None,
            sfx: Vec::new(),
            in_stereo,
            playback: false,
        }
    }

    /// Swap in a song and echo environment and start playback from
    /// the top.
    ///
    /// Channels are rebuilt with voice storage reserved to the voice
    /// cap, so note-ons never allocate on the render path.
    pub fn play(&mut self, song: Song, env: Option<Environment>) -> Result<(), PlayError> {
        if song.version != CURRENT_VERSION {
            return Err(PlayError::VersionMismatch(song.version));
        }
        if song.ticks_per_second == 0 {
            return Err(PlayError::ZeroTickRate);
        }
        if env.is_some_and(|e| e.cursor_max == 0) {
            return Err(PlayError::ZeroEchoPeriod);
        }

        self.song = song;
        self.env = env;
        self.channels = empty_channels(self.max_voices as usize);

        self.seconds_elapsed = 0.0;
        self.seconds_end = self.song.ticks_end as f32 / self.song.ticks_per_second as f32;
        self.on_voices = 0;
        self.cursor = 0;
        self.last_cursor = None;
        self.echo.reset_cursor();
        self.playback = true;

        debug!(
            seconds_end = self.seconds_end,
            max_voices = self.max_voices,
            echo = self.env.is_some(),
            "starting playback"
        );
        Ok(())
    }

    /// Halt at the next frame boundary. Cursors and pending voices
    /// are preserved; a subsequent [`Player::play`] restarts.
    pub fn pause(&mut self) {
        self.playback = false;
    }

    /// Replace the echo environment without touching playback state.
    pub fn put_environment(&mut self, env: Option<Environment>) {
        self.env = env;
    }

    /// Queue a one-shot sound effect. SFX mix even while song
    /// playback is paused.
    pub fn queue_sfx(&mut self, sound: Sfx) {
        self.sfx.push(sound);
    }

    /// Fill `out` with output samples. Stereo players interleave L, R
    /// pairs and need an even buffer length; mono players write
    /// `(l + r) / 2`. Every written sample is in [-1, 1].
    pub fn tick(&mut self, out: &mut [f32]) {
        if self.in_stereo {
            debug_assert!(out.len() % 2 == 0, "stereo buffers interleave L, R pairs");
            for frame in out.chunks_exact_mut(2) {
                let (l, r) = self.render_frame();
                frame[0] = l.clamp(-1.0, 1.0);
                frame[1] = r.clamp(-1.0, 1.0);
            }
        } else {
            for slot in out.iter_mut() {
                let (l, r) = self.render_frame();
                *slot = ((l + r) / 2.0).clamp(-1.0, 1.0);
            }
        }
    }

    /// Produce one unclamped stereo frame: dispatch + mix, then SFX,
    /// then echo.
    fn render_frame(&mut self) -> (f32, f32) {
        let mut l = 0.0;
        let mut r = 0.0;

        if self.playback {
            self.handle_one(&mut l, &mut r);
            self.seconds_elapsed += self.frequency;
            if self.seconds_elapsed > self.seconds_end {
                self.seconds_elapsed = if self.seconds_end > 0.0 {
                    self.seconds_elapsed % self.seconds_end
                } else {
                    0.0
                };
                // Replay from the top of the event stream.
                self.last_cursor = None;
            }
        }

        self.handle_sfx(&mut l, &mut r);
        if let Some(env) = &self.env {
            self.echo.process(env, &mut l, &mut r);
        }
        (l, r)
    }

    /// Advance the tick cursor, dispatch due events, then mix all 16
    /// channels into the accumulators.
    fn handle_one(&mut self, l: &mut f32, r: &mut f32) {
        self.cursor = (self.song.ticks_per_second as f32 * self.seconds_elapsed) as u32;
        if self.last_cursor.map_or(true, |last| self.cursor > last) {
            self.dispatch_events();
            self.last_cursor = Some(self.cursor);
        }

        self.on_voices = 0;
        let Player {
            song,
            channels,
            on_voices,
            ..
        } = self;
        for channel in channels.iter_mut() {
            channel.retain_active();
            match channel {
                Channel::Drum(group) => group.accumulate_into(&song.drums, l, r),
                Channel::Tonal(group) => {
                    if let Some(patch) = group.patch_id.and_then(|id| song.patches.get(&id)) {
                        group.accumulate_into(patch, l, r);
                    }
                }
            }
            *on_voices += channel.voices().len() as u32;
        }
    }

    /// Consume every event in `(last_cursor, cursor]`, or `[0,
    /// cursor]` right after play or a loop wrap, in load order.
    fn dispatch_events(&mut self) {
        let Player {
            song,
            channels,
            frequency,
            max_voices,
            on_voices,
            cursor,
            last_cursor,
            ..
        } = self;

        for command in song.commands_between(*last_cursor, *cursor) {
            match *command {
                Command::NoteOn {
                    channel,
                    note,
                    velocity,
                } => {
                    // Over-cap note-ons drop silently.
                    if *on_voices >= *max_voices {
                        continue;
                    }
                    let Some(slot) = channels.get_mut(channel as usize) else {
                        continue;
                    };
                    let voice = match slot {
                        Channel::Drum(_) => {
                            Voice::new(note, velocity, drum_phase_increment(*frequency))
                        }
                        Channel::Tonal(group) => Voice::new(
                            note,
                            velocity,
                            tonal_phase_increment(note, group.bend, *frequency),
                        ),
                    };
                    slot.voices_mut().push(voice);
                    *on_voices += 1;
                }
                Command::NoteOff { channel } => {
                    if let Some(slot) = channels.get_mut(channel as usize) {
                        slot.release_oldest();
                    }
                }
                Command::PitchWheel { channel, bend } => {
                    // The drum kit ignores the pitch wheel.
                    if let Some(Channel::Tonal(group)) = channels.get_mut(channel as usize) {
                        group.set_bend(bend, *frequency);
                    }
                }
                Command::ProgramChange { channel, program } => {
                    if let Some(Channel::Tonal(group)) = channels.get_mut(channel as usize) {
                        group.patch_id = Some(program);
                    }
                }
                // Load-time markers.
                Command::PatchData { .. }
                | Command::DrumData { .. }
                | Command::Version(_)
                | Command::Rate(_)
                | Command::EndOfTrack => {}
            }
        }
    }

    /// Mix queued one-shot sounds and clamp the accumulators.
    fn handle_sfx(&mut self, l: &mut f32, r: &mut f32) {
        for sound in &mut self.sfx {
            sound.accumulator -= sound.pitch;
            if let Some(&byte) = sound.data.front() {
                let value = (byte as f32 - 127.0) / 128.0;
                *l += value * sound.pan_l;
                *r += value * sound.pan_r;
                sound.data.pop_front();
                while sound.accumulator < 1.0 {
                    if sound.data.pop_front().is_none() {
                        break;
                    }
                    sound.accumulator += 1.0;
                }
            }
        }
        self.sfx.retain(|s| !s.data.is_empty());
        *l = l.clamp(-1.0, 1.0);
        *r = r.clamp(-1.0, 1.0);
    }

    /// Live voice count as of the last rendered frame.
    pub fn on_voices(&self) -> u32 {
        self.on_voices
    }

    pub fn is_playing(&self) -> bool {
        self.playback
    }

    /// Seconds of song time rendered since play, within the current
    /// loop.
    pub fn position_seconds(&self) -> f32 {
        self.seconds_elapsed
    }

    /// Get a channel's state (for testing).
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }
}

/// Build the 16 channel slots: slot 9 is the drum kit, the rest are
/// tonal with no patch assigned.
fn empty_channels(voice_capacity: usize) -> [Channel; 16] {
    core::array::from_fn(|i| {
        if i == DRUM_CHANNEL {
            Channel::drum(voice_capacity)
        } else {
            Channel::tonal(voice_capacity)
        }
    })
}
