use std::time::Duration;

use super::clock::{Clock, SystemClock};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Clock reading taken at the tick.
    pub now: Duration,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// The baseline is taken at construction, so the first tick measures the time
/// since the clock was created. Delta time is the raw difference between
/// readings and is never negative.
#[derive(Debug, Clone)]
pub struct FrameClock<C: Clock = SystemClock> {
    clock: C,
    last: Duration,
    frame_index: u64,
}

impl<C: Clock> FrameClock<C> {
    /// Creates a frame clock reading from `clock`.
    pub fn new(clock: C) -> Self {
        let last = clock.now();
        Self {
            clock,
            last,
            frame_index: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.clock.now();
        let dt = now.saturating_sub(self.last);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    #[test]
    fn first_tick_measures_since_construction() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(5));
        let mut fc = FrameClock::new(clock.clone());

        clock.advance(Duration::from_millis(250));
        let ft = fc.tick();

        assert_eq!(ft.dt, 0.25);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(ft.now, Duration::from_millis(5250));
    }

    #[test]
    fn ticks_report_deltas_and_count_frames() {
        let clock = ManualClock::new();
        let mut fc = FrameClock::new(clock.clone());

        clock.advance(Duration::from_millis(500));
        let a = fc.tick();
        clock.advance(Duration::from_secs(1));
        let b = fc.tick();
        let c = fc.tick();

        assert_eq!(a.dt, 0.5);
        assert_eq!(b.dt, 1.0);
        assert_eq!(c.dt, 0.0);
        assert_eq!((a.frame_index, b.frame_index, c.frame_index), (0, 1, 2));
    }

    #[test]
    fn clock_going_backwards_yields_zero_dt() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(10));
        let mut fc = FrameClock::new(clock.clone());

        clock.set(Duration::from_secs(9));
        assert_eq!(fc.tick().dt, 0.0);
    }

    #[test]
    fn long_stall_reports_the_full_gap() {
        let clock = ManualClock::new();
        let mut fc = FrameClock::new(clock.clone());

        clock.advance(Duration::from_secs(30));
        assert_eq!(fc.tick().dt, 30.0);
    }
}
