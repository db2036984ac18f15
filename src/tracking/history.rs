// Bounded FIFO of processed motion frames

use std::collections::VecDeque;

use super::types::MotionFrame;

/// Default number of frames retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Fixed-capacity frame history; pushing onto a full history evicts the
/// oldest frame.
#[derive(Debug, Clone)]
pub struct FrameHistory {
    frames: VecDeque<MotionFrame>,
    capacity: usize,
}

impl FrameHistory {
    /// # Panics
    /// Panics if `capacity` is 0
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be greater than 0");
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, frame: MotionFrame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Most recent frame
    pub fn latest(&self) -> Option<&MotionFrame> {
        self.frames.back()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Frames from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &MotionFrame> {
        self.frames.iter()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn frame(timestamp_ms: f64) -> MotionFrame {
        MotionFrame {
            timestamp_ms,
            delta_time: 0.033,
            joints: BTreeMap::new(),
            body_world: None,
            body_screen: None,
        }
    }

    #[test]
    fn test_retains_most_recent_frames() {
        let mut history = FrameHistory::new(5);
        for i in 0..10 {
            history.push(frame(i as f64));
        }

        assert_eq!(history.len(), 5);
        let timestamps: Vec<f64> = history.iter().map(|f| f.timestamp_ms).collect();
        assert_eq!(timestamps, vec![5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(history.latest().unwrap().timestamp_ms, 9.0);
    }

    #[test]
    fn test_clear() {
        let mut history = FrameHistory::default();
        history.push(frame(1.0));
        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    #[should_panic(expected = "history capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        FrameHistory::new(0);
    }
}
