//! Deterministic stand-ins for driving sessions in tests

use chrono::NaiveDateTime;
use std::collections::VecDeque;
use std::time::Duration;

use crate::clock::Clock;

/// Deterministic clock that replays scripted reaction times
///
/// Readings alternate between cue and response: the first `now()` of a pair
/// returns the current offset, the second advances it by the next scripted
/// reaction time. Sleeps advance the offset without blocking and are recorded.
#[derive(Debug, Clone)]
pub struct ScriptedClock {
    offset: Duration,
    reactions: VecDeque<Duration>,
    awaiting_response: bool,
    sleeps: Vec<Duration>,
    wall: NaiveDateTime,
}

impl ScriptedClock {
    /// Create a clock replaying `reactions_ms` with a fixed wall time
    pub fn new(reactions_ms: &[f64], wall: NaiveDateTime) -> Self {
        Self {
            offset: Duration::ZERO,
            reactions: reactions_ms
                .iter()
                .map(|ms| Duration::from_nanos((ms * 1_000_000.0).round().max(0.0) as u64))
                .collect(),
            awaiting_response: false,
            sleeps: Vec::new(),
            wall,
        }
    }

    /// Delays requested so far, in order
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }
}

impl Clock for ScriptedClock {
    fn now(&mut self) -> Duration {
        if self.awaiting_response {
            self.offset += self.reactions.pop_front().unwrap_or_default();
        }
        self.awaiting_response = !self.awaiting_response;
        self.offset
    }

    fn sleep(&mut self, duration: Duration) {
        self.offset += duration;
        self.sleeps.push(duration);
    }

    fn wall_time(&self) -> NaiveDateTime {
        self.wall
    }
}
