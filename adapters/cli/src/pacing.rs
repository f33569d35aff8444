//! Converts variable frame times into whole simulation ticks.

use std::time::Duration;

use cowboy_shooter_core::{FrameInput, TICKS_PER_SECOND};

/// Length of one simulation tick.
pub(crate) const TICK: Duration = Duration::from_nanos(1_000_000_000 / TICKS_PER_SECOND);

/// Upper bound on ticks simulated for a single rendered frame.
pub(crate) const MAX_SUBSTEPS: u32 = 8;

/// Accumulates frame time and releases it in fixed ticks.
#[derive(Debug, Default)]
pub(crate) struct FixedStep {
    accumulator: Duration,
}

impl FixedStep {
    /// Adds a frame's duration and returns how many ticks are now due.
    ///
    /// Time beyond [`MAX_SUBSTEPS`] ticks is discarded so a stalled frame
    /// never snowballs into a backlog.
    pub(crate) fn advance(&mut self, frame: Duration) -> u32 {
        self.accumulator += frame.min(TICK * MAX_SUBSTEPS);

        let mut ticks = 0;
        while self.accumulator >= TICK && ticks < MAX_SUBSTEPS {
            self.accumulator -= TICK;
            ticks += 1;
        }
        ticks
    }
}

/// Holds input between frames until a tick consumes it.
///
/// Held keys always reflect the latest frame. Presses and clicks stay latched
/// until the next tick so frames that simulate nothing do not swallow them.
#[derive(Debug, Default)]
pub(crate) struct InputLatch {
    pending: FrameInput,
}

impl InputLatch {
    /// Folds a freshly polled frame into the latch.
    pub(crate) fn merge(&mut self, frame: FrameInput) {
        let FrameInput {
            left,
            right,
            up,
            down,
            fire,
            pause,
            undo,
            clicks,
        } = frame;
        self.pending.left = left;
        self.pending.right = right;
        self.pending.up = up;
        self.pending.down = down;
        self.pending.fire = fire;
        self.pending.pause |= pause;
        self.pending.undo |= undo;
        self.pending.clicks.extend(clicks);
    }

    /// Input for the next tick; presses and clicks are handed out only once.
    pub(crate) fn take(&mut self) -> FrameInput {
        let held = self.pending.held_only();
        std::mem::replace(&mut self.pending, held)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn whole_ticks_are_released_and_remainders_carried() {
        let mut step = FixedStep::default();

        assert_eq!(step.advance(TICK / 2), 0);
        assert_eq!(step.advance(TICK / 2), 1);
        assert_eq!(step.advance(TICK * 3), 3);
    }

    #[test]
    fn stalled_frames_are_capped() {
        let mut step = FixedStep::default();

        assert_eq!(step.advance(Duration::from_secs(2)), MAX_SUBSTEPS);
        assert_eq!(step.advance(Duration::ZERO), 0, "the backlog is discarded");
    }

    #[test]
    fn presses_reach_exactly_one_tick() {
        let mut latch = InputLatch::default();
        latch.merge(FrameInput {
            pause: true,
            fire: true,
            clicks: vec![Vec2::new(1.0, 2.0)],
            ..FrameInput::default()
        });

        let first = latch.take();
        let second = latch.take();

        assert!(first.pause);
        assert_eq!(first.clicks.len(), 1);
        assert!(!second.pause);
        assert!(second.clicks.is_empty());
        assert!(second.fire, "held keys persist across ticks");
    }

    #[test]
    fn presses_survive_frames_without_ticks() {
        let mut latch = InputLatch::default();
        latch.merge(FrameInput {
            undo: true,
            left: true,
            ..FrameInput::default()
        });
        latch.merge(FrameInput::default());

        let input = latch.take();

        assert!(input.undo);
        assert!(!input.left, "held keys follow the latest frame");
    }
}
