//! Bounded per-cyclist position history.

use std::collections::VecDeque;

use cs_core::{Point2, SimTime};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrajectoryPoint {
    pub time:     SimTime,
    pub position: Point2,
}

/// Ring buffer of sampled positions.  Only every `stride`-th
/// [`record`](Self::record) call is kept; once `capacity` points are held
/// the oldest is dropped.
#[derive(Clone, Debug)]
pub struct Trajectory {
    points:   VecDeque<TrajectoryPoint>,
    capacity: usize,
    stride:   u32,
    counter:  u32,
}

impl Trajectory {
    /// Zero `capacity` or `stride` are raised to 1.
    pub fn new(capacity: usize, stride: u32) -> Self {
        Self {
            points:   VecDeque::new(),
            capacity: capacity.max(1),
            stride:   stride.max(1),
            counter:  0,
        }
    }

    /// Offer an interpolation step; kept on every `stride`-th call.
    pub fn record(&mut self, time: SimTime, position: Point2) {
        if self.counter % self.stride == 0 {
            self.push(time, position);
        }
        self.counter = self.counter.wrapping_add(1);
    }

    /// Keep a point regardless of stride (trip start and end).
    pub fn push(&mut self, time: SimTime, position: Point2) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(TrajectoryPoint { time, position });
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.counter = 0;
    }

    /// Clear and give the buffer's memory back.
    pub fn release_memory(&mut self) {
        self.points = VecDeque::new();
        self.counter = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrajectoryPoint> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn allocated(&self) -> usize {
        self.points.capacity()
    }
}
