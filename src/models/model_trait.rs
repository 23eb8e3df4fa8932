use serde::{Deserialize, Serialize};

use crate::simulator::{Job, Services};
use crate::utils::errors::SimulationError;

/// The `QueueingModel` trait defines everything required for a model to
/// operate within the discrete event simulation.  The simulator owns the
/// clock and the pending event set, and calls back into the model once per
/// dequeued event: `time_advance` integrates the time-weighted statistics
/// over the elapsed interval, and then exactly one of `start`, `arrival` or
/// `departure` mutates the state and schedules follow-up events.
pub trait QueueingModel {
    /// The finalized statistics of a run.
    type Report;

    /// Time at which the `Exit` sentinel fires, if the run is time bounded.
    fn horizon(&self) -> Option<f64>;

    fn start(&mut self, services: &mut Services) -> Result<(), SimulationError>;

    fn arrival(&mut self, job: Job, services: &mut Services) -> Result<(), SimulationError>;

    fn departure(&mut self, job: Job, services: &mut Services) -> Result<(), SimulationError>;

    fn time_advance(&mut self, time_delta: f64);

    /// Population counts, for inspection between simulation steps.
    fn occupancy(&self) -> Occupancy;

    /// Convert the accumulated areas, sums and counts into the report, for
    /// a run of `total_time` simulated time units.
    fn finish(&self, total_time: f64) -> Self::Report;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupancy {
    pub admitted: usize,
    pub completed: usize,
    pub in_system: usize,
    pub queued: usize,
    pub in_service: usize,
}

impl Occupancy {
    /// Every admitted job is either completed or still in the system, and
    /// every job waiting or in service belongs to the system.
    pub fn is_conserved(&self) -> bool {
        self.admitted == self.completed + self.in_system
            && self.queued + self.in_service <= self.in_system
    }
}

/// One entry of the optional event trace of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub time: f64,
    pub action: String,
    pub subject: String,
}
