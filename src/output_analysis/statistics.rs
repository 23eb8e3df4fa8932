//! Running accumulators of a simulation run.  `TimeAverage` integrates a
//! piecewise-constant level (queue length, busy servers, jobs in system)
//! over simulated time, and `Tally` collects per-job observations (delays).
//! Both are finalized by dividing through `utils::ratio`, so a run without
//! observations reports zeros rather than NaN.

use serde::{Deserialize, Serialize};

use crate::utils::ratio;

/// Area under a piecewise-constant level, plus the highest level observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeAverage {
    area: f64,
    maximum: f64,
}

impl TimeAverage {
    /// Integrate `level`, held constant for `time_delta` time units.
    pub fn accumulate(&mut self, level: f64, time_delta: f64) {
        self.area += level * time_delta;
        self.maximum = self.maximum.max(level);
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn average(&self, total_time: f64) -> f64 {
        ratio(self.area, total_time)
    }
}

/// Sum, count and maximum of a series of observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    sum: f64,
    count: usize,
    maximum: f64,
}

impl Tally {
    pub fn record(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.maximum = self.maximum.max(value);
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn mean(&self) -> f64 {
        ratio(self.sum, self.count as f64)
    }
}
