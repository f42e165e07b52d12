//! Cyclic playback of the frame sequence.
//!
//! The scheduler is a polling timer: the owner calls [`PlaybackScheduler::poll`]
//! from its event loop and gets back the index to show when a tick is due.

use std::time::{Duration, Instant};

use crate::frames::FrameSource;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Running(Duration),
}

/// Advances a cursor through a frame source at a fixed interval.
#[derive(Debug, Clone)]
pub struct PlaybackScheduler {
    state: PlaybackState,
    interval: Duration,
    /// `None` until the first advance after a stop.
    cursor: Option<usize>,
    next_tick: Option<Instant>,
}

impl PlaybackScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: PlaybackState::Stopped,
            interval,
            cursor: None,
            next_tick: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PlaybackState::Running(_))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Index of the frame last shown, `None` when not started.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    /// Step the cursor to the next frame, wrapping after the last one.
    ///
    /// A no-op on an empty source.
    pub fn advance<F: FrameSource + ?Sized>(&mut self, frames: &F) -> Option<usize> {
        let count = frames.frame_count();
        if count == 0 {
            return None;
        }
        let next = self.cursor.map_or(0, |i| (i + 1) % count);
        self.cursor = Some(next);
        Some(next)
    }

    /// Start playing: advance once right away, then every interval.
    ///
    /// Starting while running restarts the timer from `now`.
    pub fn start<F: FrameSource + ?Sized>(&mut self, frames: &F, now: Instant) -> Option<usize> {
        self.state = PlaybackState::Running(self.interval);
        self.next_tick = Some(now + self.interval);
        log::info!("Playback started at {:?} per frame", self.interval);
        self.advance(frames)
    }

    /// Stop playing and rewind the cursor.
    pub fn stop(&mut self) {
        if self.is_running() {
            log::info!("Playback stopped");
        }
        self.state = PlaybackState::Stopped;
        self.cursor = None;
        self.next_tick = None;
    }

    /// Change the interval.
    ///
    /// While running, the pending tick is discarded and playback restarts
    /// from the current cursor: one immediate advance, then the new period.
    pub fn set_interval<F: FrameSource + ?Sized>(
        &mut self,
        interval: Duration,
        frames: &F,
        now: Instant,
    ) -> Option<usize> {
        self.interval = interval;
        if self.is_running() {
            self.start(frames, now)
        } else {
            None
        }
    }

    /// Advance if a tick is due at `now`.
    ///
    /// Missed ticks are coalesced into one advance.
    pub fn poll<F: FrameSource + ?Sized>(&mut self, frames: &F, now: Instant) -> Option<usize> {
        let next_tick = self.next_tick?;
        if now < next_tick {
            return None;
        }
        let mut following = next_tick + self.interval;
        if following <= now {
            following = now + self.interval;
        }
        self.next_tick = Some(following);
        self.advance(frames)
    }

    /// Time left until the next tick, zero if it is overdue.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick
            .map(|tick| tick.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{Frame, FrameSequence};

    const INTERVAL: Duration = Duration::from_millis(100);

    fn frames(count: usize) -> FrameSequence {
        let mut frames = FrameSequence::new();
        for _ in 0..count {
            frames.insert_after_current(Frame::new());
        }
        frames
    }

    #[test]
    fn test_advance_wraps() {
        let frames = frames(3);
        let mut scheduler = PlaybackScheduler::new(INTERVAL);

        let seen: Vec<_> = (0..5).map(|_| scheduler.advance(&frames)).collect();
        assert_eq!(seen, vec![Some(0), Some(1), Some(2), Some(0), Some(1)]);
    }

    #[test]
    fn test_empty_sequence_is_noop() {
        let frames = frames(0);
        let mut scheduler = PlaybackScheduler::new(INTERVAL);
        let now = Instant::now();

        assert_eq!(scheduler.start(&frames, now), None);
        assert_eq!(scheduler.poll(&frames, now + INTERVAL), None);
        assert_eq!(scheduler.current_index(), None);
    }

    #[test]
    fn test_start_advances_immediately_then_on_interval() {
        let frames = frames(2);
        let mut scheduler = PlaybackScheduler::new(INTERVAL);
        let now = Instant::now();

        assert_eq!(scheduler.start(&frames, now), Some(0));
        assert_eq!(scheduler.state(), PlaybackState::Running(INTERVAL));
        assert_eq!(scheduler.poll(&frames, now + INTERVAL / 2), None);
        assert_eq!(scheduler.poll(&frames, now + INTERVAL), Some(1));
        assert_eq!(scheduler.poll(&frames, now + INTERVAL * 2), Some(0));
    }

    #[test]
    fn test_missed_ticks_coalesce() {
        let frames = frames(5);
        let mut scheduler = PlaybackScheduler::new(INTERVAL);
        let now = Instant::now();
        scheduler.start(&frames, now);

        let late = now + INTERVAL * 10;
        assert_eq!(scheduler.poll(&frames, late), Some(1));
        assert_eq!(scheduler.poll(&frames, late), None);
        assert_eq!(scheduler.time_until_next_tick(late), Some(INTERVAL));
    }

    #[test]
    fn test_stop_resets_cursor() {
        let frames = frames(3);
        let mut scheduler = PlaybackScheduler::new(INTERVAL);
        let now = Instant::now();
        scheduler.start(&frames, now);
        scheduler.advance(&frames);

        scheduler.stop();
        assert_eq!(scheduler.state(), PlaybackState::Stopped);
        assert_eq!(scheduler.current_index(), None);
        assert_eq!(scheduler.poll(&frames, now + INTERVAL * 3), None);
        assert_eq!(scheduler.start(&frames, now), Some(0));
    }

    #[test]
    fn test_set_interval_restarts_timer() {
        let frames = frames(4);
        let mut scheduler = PlaybackScheduler::new(INTERVAL);
        let now = Instant::now();
        scheduler.start(&frames, now);

        let later = now + INTERVAL / 2;
        let faster = Duration::from_millis(20);
        assert_eq!(scheduler.set_interval(faster, &frames, later), Some(1));
        assert_eq!(scheduler.state(), PlaybackState::Running(faster));
        // The old pending tick is gone.
        assert_eq!(scheduler.poll(&frames, later + faster / 2), None);
        assert_eq!(scheduler.poll(&frames, later + faster), Some(2));
    }

    #[test]
    fn test_set_interval_while_stopped_only_stores() {
        let frames = frames(2);
        let mut scheduler = PlaybackScheduler::new(INTERVAL);
        let faster = Duration::from_millis(20);

        assert_eq!(scheduler.set_interval(faster, &frames, Instant::now()), None);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.interval(), faster);
    }
}
