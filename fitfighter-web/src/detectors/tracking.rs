//! Tracking primitives reused across detectors
//!
//! Fixed-capacity ring buffer, adaptive range normalization, cooldown
//! counter and the smoothed up/down phase vote.

use std::collections::VecDeque;

/// Fixed-capacity FIFO, oldest first
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Running min/max of one coordinate since the last reset
///
/// Positions are normalized into `[0, 1]` against the observed extent,
/// with the extent floored at 0.001 so a still subject never divides by zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct RangeTracker {
    bounds: Option<(f64, f64)>,
}

pub const MIN_RANGE_DIVISOR: f64 = 0.001;

impl RangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widen the bounds with `value` and return its normalized position
    pub fn observe(&mut self, value: f64) -> f64 {
        self.bounds = Some(match self.bounds {
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
            None => (value, value),
        });
        self.normalized(value)
    }

    /// `(value - min) / max(0.001, max - min)`; 0 before any observation
    pub fn normalized(&self, value: f64) -> f64 {
        match self.bounds {
            Some((lo, hi)) => (value - lo) / (hi - lo).max(MIN_RANGE_DIVISOR),
            None => 0.0,
        }
    }

    /// Observed extent, 0 before any observation
    pub fn range(&self) -> f64 {
        self.bounds.map_or(0.0, |(lo, hi)| hi - lo)
    }

    pub fn min(&self) -> Option<f64> {
        self.bounds.map(|(lo, _)| lo)
    }

    pub fn max(&self) -> Option<f64> {
        self.bounds.map(|(_, hi)| hi)
    }

    pub fn clear(&mut self) {
        self.bounds = None;
    }
}

/// Post-rep suppression counter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cooldown {
    frames: u32,
    remaining: u32,
}

impl Cooldown {
    pub fn new(frames: u32) -> Self {
        Self {
            frames,
            remaining: 0,
        }
    }

    pub fn start(&mut self) {
        self.remaining = self.frames;
    }

    /// Consume one frame; true if the cooldown was still running
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }
}

/// Phase of a position-band exercise (squat, sit-up, lunge, push-up)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandPhase {
    Up,
    Down,
    Transitioning,
}

impl BandPhase {
    pub fn name(&self) -> &'static str {
        match self {
            BandPhase::Up => "up",
            BandPhase::Down => "down",
            BandPhase::Transitioning => "transitioning",
        }
    }
}

/// Smoothing needs at least this many recent classifications
pub const MIN_VOTES: usize = 3;

/// Majority vote over recent classifications, ties resolve to transitioning
///
/// Returns `None` until [`MIN_VOTES`] classifications are available.
pub fn majority_vote(votes: &RingBuffer<BandPhase>) -> Option<BandPhase> {
    if votes.len() < MIN_VOTES {
        return None;
    }
    let count = |phase| votes.iter().filter(|&&v| v == phase).count();
    let (down, up, trans) = (
        count(BandPhase::Down),
        count(BandPhase::Up),
        count(BandPhase::Transitioning),
    );
    Some(if down > up.max(trans) {
        BandPhase::Down
    } else if up > down.max(trans) {
        BandPhase::Up
    } else {
        BandPhase::Transitioning
    })
}

/// Smoothed down → up rep counter over a normalized vertical position
///
/// Raw per-frame classifications are majority-voted over a short window.
/// Reaching the smoothed down phase arms the counter; the next smoothed up
/// phase counts a rep when the observed vertical range exceeds `min_range`.
/// Starting in the down phase counts as having been down.
#[derive(Clone, Debug)]
pub struct BandCounter {
    votes: RingBuffer<BandPhase>,
    range: RangeTracker,
    phase: BandPhase,
    initial: BandPhase,
    armed: bool,
    min_range: f64,
}

impl BandCounter {
    pub fn new(initial: BandPhase, window: usize, min_range: f64) -> Self {
        Self {
            votes: RingBuffer::new(window),
            range: RangeTracker::new(),
            phase: initial,
            initial,
            armed: initial == BandPhase::Down,
            min_range,
        }
    }

    /// Track the reference coordinate, returning its normalized position
    pub fn observe(&mut self, y: f64) -> f64 {
        self.range.observe(y)
    }

    /// Feed this frame's raw classification; true when a rep completes
    pub fn update(&mut self, raw: BandPhase) -> bool {
        self.votes.push(raw);
        let next = majority_vote(&self.votes).unwrap_or(raw);
        let mut completed = false;
        match next {
            BandPhase::Down => self.armed = true,
            BandPhase::Up => {
                completed = self.armed && self.range.range() > self.min_range;
                self.armed = false;
            }
            BandPhase::Transitioning => {}
        }
        self.phase = next;
        completed
    }

    pub fn phase(&self) -> BandPhase {
        self.phase
    }

    pub fn range(&self) -> f64 {
        self.range.range()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Back to the initial phase with no votes and no observed range
    pub fn clear(&mut self) {
        self.votes.clear();
        self.range.clear();
        self.phase = self.initial;
        self.armed = self.initial == BandPhase::Down;
    }
}
