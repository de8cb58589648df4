//! Frame timing
//!
//! Hosts hand us raw frame timestamps; the simulation wants bounded deltas.

/// Turn a raw frame delta into one the simulation can consume
///
/// Negative or NaN deltas become zero-length ticks; anything above `max_dt`
/// (including infinity) is clamped so a long pause cannot move a car further
/// than one collision check can see.
pub fn sanitize_dt(dt_ms: f32, max_dt: f32) -> f32 {
    if dt_ms.is_nan() || dt_ms <= 0.0 {
        0.0
    } else {
        dt_ms.min(max_dt)
    }
}

/// Converts host frame timestamps into per-tick deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Delta since the previous frame in ms; the first frame after a reset yields 0
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => (now_ms - last) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Forget the previous frame (round start, tab regained focus)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(16.0, 50.0), 16.0);
        assert_eq!(sanitize_dt(-5.0, 50.0), 0.0);
        assert_eq!(sanitize_dt(f32::NAN, 50.0), 0.0);
        assert_eq!(sanitize_dt(500.0, 50.0), 50.0);
        assert_eq!(sanitize_dt(f32::INFINITY, 50.0), 50.0);
    }

    #[test]
    fn test_frame_clock_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), 0.0);
        assert_eq!(clock.delta(1016.5), 16.5);
        assert_eq!(clock.delta(1033.0), 16.5);

        clock.reset();
        assert_eq!(clock.delta(5000.0), 0.0);
        assert_eq!(clock.delta(5020.0), 20.0);
    }
}
