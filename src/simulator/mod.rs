//! The simulator module provides the mechanics of discrete event
//! simulation - the clock, the pending event set, and the run loop that
//! drives a queueing model.  Time advances only when an event is dequeued,
//! never in fixed steps.
//!
//! Every step pops the earliest event, lets the model integrate its
//! time-weighted statistics over the interval since the previous event,
//! advances the clock, and then dispatches the event to the model.  The run
//! ends when the `Exit` sentinel is dequeued, or when no events remain.
//!
//! `step`, `step_n` and `step_until` execute the simulation incrementally,
//! for inspection of the model between events, and `run` executes it to
//! completion and returns the model's report.

use log::{debug, trace};

use crate::models::QueueingModel;
use crate::utils::errors::SimulationError;

pub mod calendar;
pub mod event;
pub mod services;

pub use self::calendar::Calendar;
pub use self::event::{Event, EventKind, Job};
pub use self::services::Services;

/// The `Simulation` struct pairs a queueing model with the services (clock,
/// random number generator, pending events) of a single run.  A simulation
/// is created with a seed, and the same model configuration and seed always
/// produce the same event sequence and statistics.
#[derive(Debug, Clone)]
pub struct Simulation<M: QueueingModel> {
    model: M,
    services: Services,
    finished: bool,
    events_processed: usize,
}

impl<M: QueueingModel> Simulation<M> {
    /// This constructor method creates a simulation of the supplied model,
    /// with the `Start` event scheduled at time zero.
    pub fn post(model: M, seed: u64) -> Self {
        let mut services = Services::new(seed);
        services.schedule_start();
        Self {
            model,
            services,
            finished: false,
            events_processed: 0,
        }
    }

    /// An accessor method for the simulated model, for inspection between
    /// simulation steps.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// An accessor method for the simulation global time.
    pub fn get_global_time(&self) -> f64 {
        self.services.global_time()
    }

    pub fn events_processed(&self) -> usize {
        self.events_processed
    }

    pub fn pending_events(&self) -> usize {
        self.services.pending_events()
    }

    /// A simulation is finished once the `Exit` sentinel was dequeued or
    /// the pending event set ran empty.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The simulation step is foundational for a discrete event simulation.
    /// This method dequeues and processes a single event, and returns it.
    /// `None` is returned once the simulation is finished.
    pub fn step(&mut self) -> Result<Option<Event>, SimulationError> {
        if self.finished {
            return Ok(None);
        }
        let event = match self.services.next_event() {
            Some(event) => event,
            None => {
                self.finished = true;
                debug!(
                    "Event set exhausted at time {} after {} events",
                    self.services.global_time(),
                    self.events_processed
                );
                return Ok(None);
            }
        };
        let now = self.services.global_time();
        if event.time().is_nan() || event.time() < now {
            return Err(SimulationError::EventSchedulingError {
                time: event.time(),
                now,
            });
        }
        self.model.time_advance(event.time() - now);
        self.services.set_global_time(event.time());
        self.events_processed += 1;
        trace!("{} at time {}", event.kind().name(), event.time());
        match event.kind() {
            EventKind::Start => {
                if let Some(horizon) = self.model.horizon() {
                    self.services.schedule(horizon, EventKind::Exit)?;
                }
                self.model.start(&mut self.services)?;
            }
            EventKind::Arrival(job) => self.model.arrival(*job, &mut self.services)?,
            EventKind::Departure(job) => self.model.departure(*job, &mut self.services)?,
            EventKind::Exit => {
                self.finished = true;
                debug!(
                    "Exit at time {} after {} events, {} events discarded",
                    event.time(),
                    self.events_processed,
                    self.services.pending_events()
                );
            }
        }
        Ok(Some(event))
    }

    /// This method executes the specified number of simulation steps, `n`,
    /// or fewer if the simulation finishes first.  The processed events are
    /// returned.
    pub fn step_n(&mut self, n: usize) -> Result<Vec<Event>, SimulationError> {
        let mut events = Vec::new();
        for _ in 0..n {
            match self.step()? {
                Some(event) => events.push(event),
                None => break,
            }
        }
        Ok(events)
    }

    /// This method executes simulation steps for every event scheduled at
    /// or before `until`, and returns the processed events.
    pub fn step_until(&mut self, until: f64) -> Result<Vec<Event>, SimulationError> {
        let mut events = Vec::new();
        while !self.finished {
            match self.services.next_event_time() {
                Some(time) if time <= until => {}
                _ => break,
            }
            match self.step()? {
                Some(event) => events.push(event),
                None => break,
            }
        }
        Ok(events)
    }

    /// Execute the simulation to completion and finalize the statistics.
    pub fn run(&mut self) -> Result<M::Report, SimulationError> {
        debug!("Simulation run started");
        while self.step()?.is_some() {}
        Ok(self.report())
    }

    /// Finalize the statistics accumulated so far - at the current global
    /// time.  Calling this before the run finishes gives a snapshot report.
    pub fn report(&self) -> M::Report {
        self.model.finish(self.services.global_time())
    }
}

/// Independent replications of a model.  Each replication runs a freshly
/// built model with its own seed (`seed`, `seed + 1`, ...), so replication
/// outputs are independent, identically distributed samples - suitable for
/// `output_analysis::IndependentSample`.
pub fn replicate<M, F>(
    replications: usize,
    seed: u64,
    mut build: F,
) -> Result<Vec<M::Report>, SimulationError>
where
    M: QueueingModel,
    F: FnMut() -> Result<M, SimulationError>,
{
    (0..replications)
        .map(|replication| {
            let mut simulation = Simulation::post(build()?, seed.wrapping_add(replication as u64));
            simulation.run()
        })
        .collect()
}
