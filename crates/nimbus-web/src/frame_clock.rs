//! Animation clock driven by requestAnimationFrame timestamps.

use nimbus_core::constants::FRAME_SKIP_THRESHOLD_MS;

/// What the frame loop should do with one rAF timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameTick {
    /// Gap after a hidden tab; draw nothing this frame.
    Skip,
    Render {
        /// Milliseconds since the previous frame, `None` on the first frame.
        delta_ms: Option<f64>,
        /// Seconds of animation time since the first frame.
        time: f32,
    },
}

/// Tracks the previous timestamp and the animation origin.
#[derive(Debug, Default)]
pub struct FrameClock {
    last_frame_time: Option<f64>,
    start_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `timestamp` (milliseconds, as passed to the rAF callback).
    ///
    /// A gap longer than [`FRAME_SKIP_THRESHOLD_MS`] skips the frame and moves
    /// the animation origin forward by the gap, so the clouds resume where they
    /// stopped.
    pub fn tick(&mut self, timestamp: f64) -> FrameTick {
        let previous = self.last_frame_time.replace(timestamp);
        let start = *self.start_time.get_or_insert(timestamp);

        let Some(previous) = previous else {
            return FrameTick::Render {
                delta_ms: None,
                time: 0.0,
            };
        };

        let delta = timestamp - previous;
        if delta > FRAME_SKIP_THRESHOLD_MS {
            self.start_time = Some(start + delta);
            return FrameTick::Skip;
        }

        FrameTick::Render {
            delta_ms: Some(delta),
            time: ((timestamp - start) / 1000.0) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_time(tick: FrameTick) -> f32 {
        match tick {
            FrameTick::Render { time, .. } => time,
            FrameTick::Skip => panic!("frame was skipped"),
        }
    }

    #[test]
    fn test_first_frame_renders_without_delta() {
        let mut clock = FrameClock::new();
        // Page-load timestamps are large; the first one must never count as a gap.
        assert_eq!(
            clock.tick(5_000.0),
            FrameTick::Render {
                delta_ms: None,
                time: 0.0
            }
        );
    }

    #[test]
    fn test_normal_frame_advances_time() {
        let mut clock = FrameClock::new();
        clock.tick(1_000.0);
        match clock.tick(1_016.0) {
            FrameTick::Render { delta_ms, time } => {
                assert_eq!(delta_ms, Some(16.0));
                assert!((time - 0.016).abs() < 1e-6);
            }
            FrameTick::Skip => panic!("16 ms frame was skipped"),
        }
    }

    #[test]
    fn test_gap_is_skipped_without_time_jump() {
        let mut clock = FrameClock::new();
        clock.tick(1_000.0);
        let before = render_time(clock.tick(1_016.0));

        assert_eq!(clock.tick(6_016.0), FrameTick::Skip);

        let after = render_time(clock.tick(6_032.0));
        assert!((after - before - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_gap_still_renders() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert!(matches!(
            clock.tick(FRAME_SKIP_THRESHOLD_MS),
            FrameTick::Render { .. }
        ));
    }
}
