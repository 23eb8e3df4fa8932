use serde::{Deserialize, Serialize};

/// A `Job` is one entity (customer, job, group member) flowing through the
/// network.  The job carries the routing context needed to resume its
/// journey after service - the route drawn at admission and the current
/// stage on that route - plus the timestamps used for delay statistics.
/// Jobs are plain values: a waiting job lives in a station queue, and a job
/// in service lives only in its scheduled departure event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: usize,
    /// Arrival group (batch) the job was generated with
    pub group: usize,
    pub route: usize,
    pub stage: usize,
    /// Server (and, for per-server queueing, queue) index at the current station
    pub server: usize,
    /// Arrival time at the current stage
    pub arrived_at: f64,
    /// Admission time into the system
    pub entered_at: f64,
    /// Queueing delay accumulated over all stages visited so far
    pub delay: f64,
}

impl Job {
    pub fn new(id: usize, group: usize, route: usize) -> Self {
        Self {
            id,
            group,
            route,
            stage: 0,
            server: 0,
            arrived_at: 0.0,
            entered_at: 0.0,
            delay: 0.0,
        }
    }
}

/// The closed set of event kinds.  `Start` fires once at time zero, `Exit`
/// is the horizon sentinel that stops the run, and `Arrival`/`Departure`
/// move one job through one stage of its route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Start,
    Arrival(Job),
    Departure(Job),
    Exit,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Start => "Start",
            EventKind::Arrival(_) => "Arrival",
            EventKind::Departure(_) => "Departure",
            EventKind::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    time: f64,
    kind: EventKind,
}

impl Event {
    pub fn new(time: f64, kind: EventKind) -> Self {
        Self { time, kind }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }
}
