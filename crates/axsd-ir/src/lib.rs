//! Core IR types for the AXSD sampler.
//!
//! This crate defines the decoded representation of an AXSD song:
//! the tick-ordered command stream, the patch and drum wavetables it
//! references, and the echo environment. The format decoder emits
//! these types and the playback engine consumes them.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod command;
mod environment;
mod patch;
mod song;

pub use command::Command;
pub use environment::Environment;
pub use patch::{pcm_to_f32, Drum, Patch, NO_LOOP};
pub use song::{Song, SongTick, CURRENT_VERSION};
