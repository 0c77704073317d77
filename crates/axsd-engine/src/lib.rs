//! Playback engine for AXSD songs.
//!
//! Consumes a decoded [`axsd_ir::Song`] and renders floating-point
//! audio one sample at a time: an event dispatcher drives a 16-channel
//! voice pool, followed by the one-shot SFX queue and an optional
//! circular-buffer echo. No I/O happens on the render path; the caller
//! feeds output buffers from wherever its audio frames come from.

mod channel;
mod echo;
mod pitch;
mod player;
mod sfx;
mod voice;

pub use channel::{Channel, DrumChannel, TonalChannel, DRUM_CHANNEL};
pub use echo::{Echo, ECHO_LEN};
pub use pitch::{drum_phase_increment, tonal_phase_increment, twelve_tet, A440};
pub use player::{PlayError, Player};
pub use sfx::Sfx;
pub use voice::Voice;
