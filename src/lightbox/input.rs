//! Keyboard and touch input mapping.

/// Minimum horizontal travel, in CSS pixels, for a touch to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Direction of a recognised swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved right to left: show the next item.
    Left,
    /// Finger moved left to right: show the previous item.
    Right,
}

/// Tracks one touch from start to end.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    start_x: Option<f64>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn start(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Finish the touch at `x`. Travel at or under the threshold is not a
    /// swipe; neither is an end without a recorded start.
    pub fn end(&mut self, x: f64) -> Option<Swipe> {
        let diff = self.start_x.take()? - x;
        if diff.abs() <= self.threshold {
            return None;
        }
        Some(if diff > 0.0 { Swipe::Left } else { Swipe::Right })
    }

    pub fn reset(&mut self) {
        self.start_x = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("Right"), Key::ArrowRight);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }

    #[test]
    fn test_threshold_boundaries() {
        let mut tracker = SwipeTracker::default();

        tracker.start(200.0);
        assert_eq!(tracker.end(160.0), None);

        tracker.start(200.0);
        assert_eq!(tracker.end(150.0), None, "exactly the threshold is not a swipe");

        tracker.start(200.0);
        assert_eq!(tracker.end(140.0), Some(Swipe::Left));

        tracker.start(100.0);
        assert_eq!(tracker.end(175.0), Some(Swipe::Right));
    }

    #[test]
    fn test_end_without_start() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.end(0.0), None);

        tracker.start(300.0);
        tracker.reset();
        assert_eq!(tracker.end(0.0), None);
    }
}
