//! Allocation-free render path tests.
//!
//! `Player::tick` runs inside audio callbacks, so the steady render
//! path must not touch the heap: voice storage is reserved at `play`,
//! the echo lines are preallocated, and event dispatch walks the
//! decoded command map in place. These tests render songs that
//! exercise note-ons, releases, loop wrap, echo, and SFX under an
//! allocation-aborting allocator.
//!
//! Just run `cargo test`; no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use axsd::{Command, Drum, Environment, Patch, Player, Sfx, Song, CURRENT_VERSION};

/// A busy little song: looping patch, drum hits, bends, and a short
/// end tick so the track wraps several times over a render.
fn busy_song() -> Song {
    let mut song = Song::new();
    song.version = CURRENT_VERSION;
    song.ticks_per_second = 1000;
    song.ticks_end = 50;
    song.patches.insert(
        0,
        Patch {
            waveform: vec![0, 64, 128, 192, 255, 192, 128, 64],
            ratio: 1.0,
            gain_l: 0.8,
            gain_r: 0.8,
            loop_start: 1,
            loop_end: 6,
        },
    );
    song.drums.insert(
        35,
        Drum {
            waveform: vec![255; 64],
            ratio: 1.0,
            gain_l: 0.5,
            gain_r: 0.5,
        },
    );
    song.insert(
        0,
        Command::ProgramChange {
            channel: 0,
            program: 0,
        },
    );
    for tick in [0u32, 10, 20, 30] {
        song.insert(
            tick,
            Command::NoteOn {
                channel: 0,
                note: 60 + (tick % 12) as u8,
                velocity: 100,
            },
        );
        song.insert(tick + 5, Command::NoteOff { channel: 0 });
        song.insert(
            tick,
            Command::NoteOn {
                channel: 9,
                note: 35,
                velocity: 127,
            },
        );
    }
    song.insert(
        15,
        Command::PitchWheel {
            channel: 0,
            bend: 2048,
        },
    );
    song.insert(50, Command::EndOfTrack);
    song
}

fn echo_env() -> Environment {
    Environment {
        feedback_l: 0.6,
        feedback_r: 0.6,
        wet_l: 0.4,
        wet_r: 0.4,
        cursor_increment: 1,
        cursor_max: 4096,
        fir_filter: Some(Environment::sfc_echo_filter([
            0x7F, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01,
        ])),
    }
}

#[test]
fn render_is_alloc_free() {
    let mut player = Player::new(16, 44100, true);
    player.play(busy_song(), None).unwrap();

    let mut out = [0.0f32; 512];
    assert_no_alloc(|| {
        for _ in 0..200 {
            player.tick(&mut out);
        }
    });
}

#[test]
fn render_with_echo_is_alloc_free() {
    let mut player = Player::new(16, 44100, false);
    player.play(busy_song(), Some(echo_env())).unwrap();

    let mut out = [0.0f32; 512];
    assert_no_alloc(|| {
        for _ in 0..200 {
            player.tick(&mut out);
        }
    });
}

#[test]
fn render_with_queued_sfx_is_alloc_free() {
    let mut player = Player::new(16, 44100, true);
    player.play(busy_song(), None).unwrap();
    // Enough PCM that the sound outlasts the render; a drained sound
    // would be dropped (and deallocated) on the render path.
    player.queue_sfx(Sfx::new(vec![200; 16384], 0.5, 0.7, 0.7));

    let mut out = [0.0f32; 512];
    assert_no_alloc(|| {
        for _ in 0..20 {
            player.tick(&mut out);
        }
    });
}
