//! Canvas layout and resize debouncing

use serde::{Deserialize, Serialize};

use crate::consts::{FLOOR_HEIGHT, MONSTER_SIZE, MONSTER_Y_FRACTION, RESIZE_DEBOUNCE_MS};
use glam::Vec2;

/// Canvas dimensions plus the derived floor line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    /// Y of the floor line (shapes rest here)
    pub floor_y: f32,
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            floor_y: height - FLOOR_HEIGHT,
        }
    }

    /// Top-left corner where the monster rests
    pub fn monster_anchor(&self) -> Vec2 {
        Vec2::new(
            (self.width - MONSTER_SIZE) / 2.0,
            self.height * MONSTER_Y_FRACTION,
        )
    }
}

/// Coalesces bursts of resize notifications into one layout change.
///
/// The host calls `notify` on every resize event and `poll` once per frame.
#[derive(Debug, Default)]
pub struct ResizeDebouncer {
    pending: Option<(Layout, f64)>,
}

impl ResizeDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new size; restarts the quiet period
    pub fn notify(&mut self, layout: Layout, now_ms: f64) {
        self.pending = Some((layout, now_ms + RESIZE_DEBOUNCE_MS));
    }

    /// Returns the latest layout once the quiet period has elapsed
    pub fn poll(&mut self, now_ms: f64) -> Option<Layout> {
        match self.pending {
            Some((layout, due)) if now_ms >= due => {
                self.pending = None;
                Some(layout)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_line() {
        let layout = Layout::new(1024.0, 768.0);
        assert_eq!(layout.floor_y, 568.0);
    }

    #[test]
    fn test_monster_anchor_centered() {
        let layout = Layout::new(1000.0, 800.0);
        let anchor = layout.monster_anchor();
        assert_eq!(anchor, Vec2::new(400.0, 160.0));
    }

    #[test]
    fn test_debounce_fires_once_after_quiet_period() {
        let mut debounce = ResizeDebouncer::new();
        debounce.notify(Layout::new(800.0, 600.0), 0.0);
        debounce.notify(Layout::new(900.0, 700.0), 100.0);

        assert_eq!(debounce.poll(200.0), None);
        let applied = debounce.poll(250.0).expect("layout after quiet period");
        assert_eq!(applied.width, 900.0);
        assert_eq!(debounce.poll(1000.0), None);
    }
}
