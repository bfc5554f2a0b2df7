use serde::{Deserialize, Serialize};

use crate::util::format_hms;

pub const DEFAULT_SET_MINUTES: u32 = 30;
pub const DEFAULT_PING_VALUE: u32 = 5;
pub const DEFAULT_PING_UNIT: PingUnit = PingUnit::Minutes;
pub const DEFAULT_VOLUME: u8 = 50;

/// Cadence unit for the awareness ping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PingUnit {
    Off,
    Seconds,
    Minutes,
}

impl PingUnit {
    pub fn label(&self) -> &'static str {
        match self {
            PingUnit::Off => "Off",
            PingUnit::Seconds => "Seconds",
            PingUnit::Minutes => "Minutes",
        }
    }

    /// Cycle through the variants in settings-form order
    pub fn next(&self) -> Self {
        match self {
            PingUnit::Off => PingUnit::Seconds,
            PingUnit::Seconds => PingUnit::Minutes,
            PingUnit::Minutes => PingUnit::Off,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            PingUnit::Off => PingUnit::Minutes,
            PingUnit::Seconds => PingUnit::Off,
            PingUnit::Minutes => PingUnit::Seconds,
        }
    }
}

pub const MAX_SET_MINUTES: u32 = 999;
pub const MAX_PING_VALUE: u32 = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Length of one work set in minutes, 1-999
    pub set_minutes: u32,
    /// Magnitude of the awareness-ping cadence, 1-3600 when the unit is not Off
    pub ping_value: u32,
    pub ping_unit: PingUnit,
    /// Playback gain for pings, 0-100
    pub volume: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            set_minutes: DEFAULT_SET_MINUTES,
            ping_value: DEFAULT_PING_VALUE,
            ping_unit: DEFAULT_PING_UNIT,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl SessionConfig {
    /// Clamp all fields into their valid ranges. The upper bounds keep the
    /// second conversions comfortably inside `u32`.
    pub fn sanitized(mut self) -> Self {
        self.set_minutes = self.set_minutes.clamp(1, MAX_SET_MINUTES);
        self.ping_value = self.ping_value.clamp(1, MAX_PING_VALUE);
        self.volume = self.volume.min(100);
        self
    }

    pub fn target_seconds(&self) -> u32 {
        self.set_minutes.clamp(1, MAX_SET_MINUTES) * 60
    }

    /// None when pings are off, otherwise the cadence in seconds
    pub fn ping_interval_seconds(&self) -> Option<u32> {
        match self.ping_unit {
            PingUnit::Off => None,
            PingUnit::Seconds => Some(self.ping_value.clamp(1, MAX_PING_VALUE)),
            PingUnit::Minutes => Some(self.ping_value.clamp(1, MAX_PING_VALUE) * 60),
        }
    }
}

/// Something the shell must react to after an `advance()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The awareness-ping cadence landed on this second
    Ping,
    /// The set reached zero; `sets_done` has been incremented and the
    /// countdown stopped, pending the user's next-set decision
    Completed,
}

/// Read-only view for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    /// Zero-clamped remaining time as HH:MM:SS
    pub clock: String,
    pub sets_done: u32,
    pub running: bool,
}

/// The countdown state machine. Holds no clocks and performs no I/O: one
/// `advance()` call means one elapsed second, and side effects are returned
/// as `SessionEvent`s for the shell to act on.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    remaining: u32,
    running: bool,
    sets_done: u32,
}

impl Session {
    pub fn new(config: SessionConfig, sets_done: u32) -> Self {
        let config = config.sanitized();
        let remaining = config.target_seconds();
        Self {
            config,
            remaining,
            running: false,
            sets_done,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sets_done(&self) -> u32 {
        self.sets_done
    }

    pub fn display(&self) -> DisplayState {
        DisplayState {
            clock: format_hms(self.remaining as i64),
            sets_done: self.sets_done,
            running: self.running,
        }
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Begin (or resume) the countdown. A timer parked at zero snaps back to
    /// the full set length instead of completing instantly.
    pub fn start(&mut self) {
        if self.remaining == 0 {
            self.remaining = self.config.target_seconds();
        }
        if self.running {
            return;
        }
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.pause();
        self.remaining = self.config.target_seconds();
    }

    /// Advance the countdown by one second. No-op unless running.
    ///
    /// A `Ping` is emitted when the elapsed time lands on the configured
    /// cadence (never at elapsed 0). When the set reaches zero the countdown
    /// stops, the counter increments, and `Completed` is emitted exactly
    /// once; the next-set decision is the shell's.
    pub fn advance(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }

        if self.remaining > 0 {
            self.remaining -= 1;
        }

        if let Some(interval) = self.config.ping_interval_seconds() {
            let elapsed = self.config.target_seconds() - self.remaining;
            if elapsed > 0 && elapsed % interval == 0 {
                events.push(SessionEvent::Ping);
            }
        }

        if self.remaining == 0 {
            self.running = false;
            self.sets_done += 1;
            events.push(SessionEvent::Completed);
        }

        events
    }

    /// Affirmative answer to the next-set prompt: a fresh set, running.
    pub fn begin_next_set(&mut self) {
        self.remaining = self.config.target_seconds();
        self.running = false;
        self.start();
    }

    /// Install new settings. The countdown is forcibly stopped and reset to
    /// the new full length; there is no seamless resize of a set in flight.
    pub fn apply_settings(&mut self, new_config: SessionConfig) {
        self.config = new_config.sanitized();
        self.reset();
    }

    pub fn increment_sets(&mut self) -> bool {
        self.sets_done += 1;
        true
    }

    /// Decrementing below zero is a no-op, not an error.
    pub fn decrement_sets(&mut self) -> bool {
        if self.sets_done == 0 {
            return false;
        }
        self.sets_done -= 1;
        true
    }

    /// Zero the counter. The shell confirms with the user before calling.
    pub fn reset_sets(&mut self) {
        self.sets_done = 0;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default(), 0)
    }
}
