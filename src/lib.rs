//! AXSD software sampler/sequencer.
//!
//! Decodes the self-contained AXSD binary song container (an event
//! stream interleaved with the PCM instrument samples it references)
//! and renders it to mono or stereo floating-point audio in real
//! time, with an optional fixed-delay feedback echo.
//!
//! This crate re-exports the workspace members as one surface:
//!
//! - [`axsd_formats`] decodes container bytes into a [`Song`];
//! - [`axsd_ir`] holds the decoded song, patch, and drum types;
//! - [`axsd_engine`] plays a song through a [`Player`].
//!
//! ```no_run
//! use axsd::{load_axsd, Player};
//!
//! # fn demo(bytes: &[u8], out: &mut [f32]) -> Result<(), Box<dyn std::error::Error>> {
//! let song = load_axsd(bytes)?;
//! let mut player = Player::new(32, 44100, true);
//! player.play(song, None)?;
//! player.tick(out);
//! # Ok(())
//! # }
//! ```

pub use axsd_engine::{
    drum_phase_increment, tonal_phase_increment, twelve_tet, Channel, DrumChannel, Echo,
    PlayError, Player, Sfx, TonalChannel, Voice, A440, DRUM_CHANNEL, ECHO_LEN,
};
pub use axsd_formats::{load_axsd, load_axsd_ptr, ByteReader, FormatError, AXSD_MAGIC};
pub use axsd_ir::{
    pcm_to_f32, Command, Drum, Environment, Patch, Song, SongTick, CURRENT_VERSION, NO_LOOP,
};
