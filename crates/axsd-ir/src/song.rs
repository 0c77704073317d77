//! Song structure: the decoded AXSD container.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::ops::Bound;

use crate::command::Command;
use crate::patch::{Drum, Patch};

/// Integer time unit of the event stream; one second is
/// `ticks_per_second` ticks.
pub type SongTick = u32;

/// The container version this engine plays.
pub const CURRENT_VERSION: u16 = 0x0003;

/// A complete song: the tick-ordered command stream plus the patch and
/// drum wavetables it references.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Song {
    /// Container version; playback requires [`CURRENT_VERSION`].
    pub version: u16,
    /// End-of-track tick; playback wraps here.
    pub ticks_end: SongTick,
    /// Tempo, in ticks per second.
    pub ticks_per_second: u32,
    /// Commands keyed by tick. Commands sharing a tick keep their
    /// load order.
    pub commands: BTreeMap<SongTick, Vec<Command>>,
    /// Tonal instruments keyed by program number.
    pub patches: BTreeMap<u8, Patch>,
    /// Drums keyed by drum note.
    pub drums: BTreeMap<u8, Drum>,
}

impl Song {
    /// Create an empty song.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command at the given tick, after any commands already
    /// stored there.
    pub fn insert(&mut self, tick: SongTick, command: Command) {
        self.commands.entry(tick).or_default().push(command);
    }

    /// Iterate the commands in `(after, upto]`, or `[0, upto]` when
    /// `after` is `None`, in tick order and load order within a tick.
    pub fn commands_between(
        &self,
        after: Option<SongTick>,
        upto: SongTick,
    ) -> impl Iterator<Item = &Command> {
        let lower = match after {
            None => Bound::Unbounded,
            Some(tick) => Bound::Excluded(tick),
        };
        self.commands
            .range((lower, Bound::Included(upto)))
            .flat_map(|(_, commands)| commands.iter())
    }

    /// Total number of stored commands, markers included.
    pub fn command_count(&self) -> usize {
        self.commands.values().map(Vec::len).sum()
    }
}
