use super::calendar::Calendar;
use super::event::{Event, EventKind};
use crate::input_modeling::UniformRNG;
use crate::utils::errors::SimulationError;

/// The simulator provides the random number generator, the simulation
/// clock and the pending event set to models during the execution of a
/// simulation.  Models read the clock and schedule events through
/// `Services`, but only the simulator advances the clock.
#[derive(Debug, Clone)]
pub struct Services {
    uniform_rng: UniformRNG,
    global_time: f64,
    calendar: Calendar,
    next_job_id: usize,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            uniform_rng: UniformRNG::default(),
            global_time: 0.0,
            calendar: Calendar::new(),
            next_job_id: 0,
        }
    }
}

impl Services {
    pub fn new(seed: u64) -> Self {
        Self {
            uniform_rng: UniformRNG::from_seed(seed),
            ..Self::default()
        }
    }

    pub fn uniform_rng(&mut self) -> &mut UniformRNG {
        &mut self.uniform_rng
    }

    pub fn global_time(&self) -> f64 {
        self.global_time
    }

    pub(crate) fn set_global_time(&mut self, time: f64) {
        self.global_time = time;
    }

    /// Schedule an event at an absolute simulation time.  Scheduling into
    /// the past (or at a NaN time) is an internal logic error, and is
    /// reported instead of silently reordering the event sequence.
    pub fn schedule(&mut self, time: f64, kind: EventKind) -> Result<(), SimulationError> {
        if time.is_nan() || time < self.global_time {
            return Err(SimulationError::EventSchedulingError {
                time,
                now: self.global_time,
            });
        }
        self.calendar.schedule(Event::new(time, kind));
        Ok(())
    }

    /// Schedule an event `delay` time units after the current time.
    pub fn schedule_in(&mut self, delay: f64, kind: EventKind) -> Result<(), SimulationError> {
        self.schedule(self.global_time + delay, kind)
    }

    pub(crate) fn schedule_start(&mut self) {
        self.calendar
            .schedule(Event::new(self.global_time, EventKind::Start));
    }

    pub(crate) fn next_event(&mut self) -> Option<Event> {
        self.calendar.pop()
    }

    pub fn next_event_time(&self) -> Option<f64> {
        self.calendar.peek_time()
    }

    pub fn pending_events(&self) -> usize {
        self.calendar.len()
    }

    /// Issue the next job sequence number.
    pub fn next_job_id(&mut self) -> usize {
        self.next_job_id += 1;
        self.next_job_id
    }
}
