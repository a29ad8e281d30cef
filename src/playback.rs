//! Replay state machine for revealing an already-computed metric series.
//!
//! The machine itself is a pure transition function over tick events;
//! [`PlaybackClock`] converts wall-clock time into a number of due ticks so
//! the frame loop can drive it without a dedicated timer thread, and tests
//! can drive it synchronously.

use std::time::{Duration, Instant};

/// Fixed reveal cadence. Deliberately not derived from the series length:
/// long series play back faster per revealed sample than short ones.
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Upper bound on ticks granted per frame. The backlog carries over, so a
/// stalled frame slows the animation instead of dumping the whole series.
pub const MAX_TICKS_PER_FRAME: u32 = 64;

/// Lifecycle of one replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No series started yet.
    Idle,
    /// Revealing one sample per tick.
    Running,
    /// Every sample revealed; the summary readout is current.
    Finished,
}

/// Cursor over the visible prefix of the current series.
#[derive(Debug)]
pub struct Playback {
    cursor: usize,
    len: usize,
    phase: Phase,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    /// A machine with nothing to replay.
    pub fn new() -> Self {
        Self {
            cursor: 0,
            len: 0,
            phase: Phase::Idle,
        }
    }

    /// Begin replaying a series of `len` samples, discarding any prior run.
    ///
    /// An empty series finishes immediately.
    pub fn start(&mut self, len: usize) {
        self.cursor = 0;
        self.len = len;
        self.phase = if len == 0 { Phase::Finished } else { Phase::Running };
    }

    /// Reveal the next sample.
    ///
    /// Returns the index that became visible, or `None` outside `Running`.
    /// The run finishes on the tick that reveals the last sample.
    pub fn tick(&mut self) -> Option<usize> {
        if self.phase != Phase::Running {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        if self.cursor >= self.len {
            self.phase = Phase::Finished;
        }
        Some(index)
    }

    /// Length of the currently visible prefix.
    pub fn visible(&self) -> usize {
        self.cursor
    }

    /// Total samples in the replayed series.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been started yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether ticks still reveal samples.
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

/// Converts elapsed wall-clock time into due replay ticks.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    anchor: Option<Instant>,
}

impl PlaybackClock {
    /// A stopped clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin counting ticks from `now`.
    pub fn start(&mut self, now: Instant) {
        self.anchor = Some(now);
    }

    /// Stop producing ticks. Idempotent.
    pub fn stop(&mut self) {
        self.anchor = None;
    }

    /// Number of ticks elapsed since the last grant, capped per frame.
    ///
    /// The anchor only advances by the granted ticks, so capped ticks are
    /// deferred rather than lost.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(anchor) = self.anchor else {
            return 0;
        };
        let elapsed = now.saturating_duration_since(anchor);
        let due = (elapsed.as_micros() / TICK_INTERVAL.as_micros()) as u64;
        let granted = due.min(u64::from(MAX_TICKS_PER_FRAME)) as u32;
        if granted > 0 {
            self.anchor = Some(anchor + TICK_INTERVAL * granted);
        }
        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_ticks_do_nothing() {
        let mut playback = Playback::new();
        assert_eq!(playback.phase(), Phase::Idle);
        assert_eq!(playback.tick(), None);
        assert_eq!(playback.visible(), 0);
    }

    #[test]
    fn empty_series_finishes_immediately() {
        let mut playback = Playback::new();
        playback.start(0);
        assert_eq!(playback.phase(), Phase::Finished);
        assert_eq!(playback.tick(), None);
    }

    #[test]
    fn cursor_is_monotonic_and_bounded() {
        let mut playback = Playback::new();
        playback.start(3);
        let mut last = 0;
        for _ in 0..10 {
            let _ = playback.tick();
            assert!(playback.visible() >= last);
            assert!(playback.visible() <= 3);
            last = playback.visible();
        }
        assert_eq!(playback.visible(), 3);
    }

    #[test]
    fn finishes_after_exactly_n_ticks() {
        let mut playback = Playback::new();
        playback.start(5);
        for expected in 0..5 {
            assert_eq!(playback.tick(), Some(expected));
        }
        assert_eq!(playback.phase(), Phase::Finished);
        assert_eq!(playback.tick(), None);
    }

    #[test]
    fn restart_discards_the_previous_run() {
        let mut playback = Playback::new();
        playback.start(2);
        playback.tick();
        playback.tick();
        assert_eq!(playback.phase(), Phase::Finished);

        playback.start(4);
        assert_eq!(playback.phase(), Phase::Running);
        assert_eq!(playback.visible(), 0);
        assert_eq!(playback.tick(), Some(0));
    }

    #[test]
    fn clock_grants_one_tick_per_interval() {
        let mut clock = PlaybackClock::new();
        let t0 = Instant::now();
        clock.start(t0);
        assert_eq!(clock.due_ticks(t0), 0);
        assert_eq!(clock.due_ticks(t0 + TICK_INTERVAL * 3), 3);
        assert_eq!(clock.due_ticks(t0 + TICK_INTERVAL * 3), 0);
        assert_eq!(clock.due_ticks(t0 + TICK_INTERVAL * 4 + Duration::from_millis(5)), 1);
    }

    #[test]
    fn clock_caps_per_frame_and_defers_the_backlog() {
        let mut clock = PlaybackClock::new();
        let t0 = Instant::now();
        clock.start(t0);
        let late = t0 + TICK_INTERVAL * (MAX_TICKS_PER_FRAME + 10);
        assert_eq!(clock.due_ticks(late), MAX_TICKS_PER_FRAME);
        assert_eq!(clock.due_ticks(late), 10);
    }

    #[test]
    fn stopped_clock_grants_nothing() {
        let mut clock = PlaybackClock::new();
        assert_eq!(clock.due_ticks(Instant::now()), 0);
        clock.start(Instant::now());
        clock.stop();
        assert_eq!(clock.due_ticks(Instant::now() + TICK_INTERVAL * 5), 0);
    }
}
