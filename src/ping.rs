use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};

use notify_rust::{Notification, Urgency};

/// Which cue to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingKind {
    /// Non-terminal cue fired on the configured cadence during a set
    Awareness,
    /// Cue fired when a set reaches zero
    Completion,
}

/// Capability interface for the audible cue. The core never knows which
/// backend is behind it; failures are reported, never raised.
pub trait PingSink {
    fn play(&self, kind: PingKind, volume: u8) -> bool;
}

/// Desktop backend: a notification for completions, plus a sound played
/// fire-and-forget through whichever player/sound pair is available.
/// Falls back to the terminal bell when no sound file is found.
pub struct DesktopPingSink;

// Stock freedesktop sounds, most likely to exist first
const AWARENESS_SOUNDS: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/message.oga"),
    ("paplay", "/usr/share/sounds/freedesktop/stereo/bell.oga"),
    ("aplay", "/usr/share/sounds/alsa/Front_Center.wav"),
];

const COMPLETION_SOUNDS: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("paplay", "/usr/share/sounds/freedesktop/stereo/bell.oga"),
    ("aplay", "/usr/share/sounds/alsa/Front_Center.wav"),
];

impl DesktopPingSink {
    fn notify_completion() {
        let _ = Notification::new()
            .summary("Set complete")
            .body("The set timer reached zero.")
            .appname("thirty")
            .icon("alarm-clock")
            .urgency(Urgency::Normal)
            .show();
    }

    fn play_sound(kind: PingKind, volume: u8) -> bool {
        let candidates = match kind {
            PingKind::Awareness => AWARENESS_SOUNDS,
            PingKind::Completion => COMPLETION_SOUNDS,
        };

        for (player, sound_file) in candidates {
            if Path::new(sound_file).exists() {
                let player = player.to_string();
                let sound_file = sound_file.to_string();
                std::thread::spawn(move || {
                    let mut cmd = Command::new(&player);
                    if player == "paplay" {
                        // paplay takes linear volume 0-65536
                        let gain = u32::from(volume.min(100)) * 65536 / 100;
                        cmd.arg(format!("--volume={}", gain));
                    }
                    let _ = cmd.arg(&sound_file).status();
                });
                return true;
            }
        }

        terminal_bell()
    }
}

impl PingSink for DesktopPingSink {
    fn play(&self, kind: PingKind, volume: u8) -> bool {
        if kind == PingKind::Completion {
            Self::notify_completion();
        }
        if volume == 0 {
            return true;
        }
        Self::play_sound(kind, volume)
    }
}

fn terminal_bell() -> bool {
    let mut out = std::io::stdout();
    out.write_all(b"\x07").and_then(|_| out.flush()).is_ok()
}

/// Silent sink that records calls; used for `--mute` and in tests.
/// Clones share the same log so a test can keep a handle after handing
/// the sink to the shell.
#[derive(Debug, Clone, Default)]
pub struct NullPingSink {
    played: Arc<Mutex<Vec<(PingKind, u8)>>>,
}

impl NullPingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<(PingKind, u8)> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl PingSink for NullPingSink {
    fn play(&self, kind: PingKind, volume: u8) -> bool {
        if let Ok(mut played) = self.played.lock() {
            played.push((kind, volume));
        }
        true
    }
}
