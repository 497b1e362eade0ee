//! Rolling pose history shared read-only with every detector
//!
//! Bounded FIFO of the most recent frames, oldest first.

use std::collections::VecDeque;

use super::frame::PoseFrame;

/// Default number of frames kept in the window
pub const DEFAULT_HISTORY_SIZE: usize = 30;

/// Bounded, chronologically ordered window of pose frames
#[derive(Clone, Debug)]
pub struct PoseHistory {
    frames: VecDeque<PoseFrame>,
    capacity: usize,
}

impl PoseHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }

    /// A capacity of 0 is bumped to 1 so the newest frame is always kept
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a history from frames in chronological order
    pub fn from_frames<I: IntoIterator<Item = PoseFrame>>(capacity: usize, frames: I) -> Self {
        let mut history = Self::with_capacity(capacity);
        for frame in frames {
            history.push(frame);
        }
        history
    }

    /// Append the newest frame, returning the evicted oldest one when full
    pub fn push(&mut self, frame: PoseFrame) -> Option<PoseFrame> {
        let evicted = if self.frames.len() == self.capacity {
            self.frames.pop_front()
        } else {
            None
        };
        self.frames.push_back(frame);
        evicted
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

    /// Newest frame
    pub fn latest(&self) -> Option<&PoseFrame> {
        self.frames.back()
    }

    /// Frame `n` steps before the newest (`back(0)` is the newest)
    pub fn back(&self, n: usize) -> Option<&PoseFrame> {
        self.frames
            .len()
            .checked_sub(n + 1)
            .and_then(|idx| self.frames.get(idx))
    }

    /// Up to the last `n` frames, oldest first
    pub fn recent(&self, n: usize) -> impl DoubleEndedIterator<Item = &PoseFrame> + '_ {
        let skip = self.frames.len().saturating_sub(n);
        self.frames.iter().skip(skip)
    }

    /// All frames, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PoseFrame> + '_ {
        self.frames.iter()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for PoseHistory {
    fn default() -> Self {
        Self::new()
    }
}
