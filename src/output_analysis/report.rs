use serde::{Deserialize, Serialize};

/// Finalized statistics of one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationReport {
    pub name: String,
    /// `None` for self-service stations, which have no server limit
    pub servers: Option<usize>,
    /// Service completions
    pub served: usize,
    /// Time-average number of waiting jobs, over all queues of the station
    pub average_queue_length: f64,
    /// Time-average number of waiting jobs per queue
    pub average_queue_length_per_queue: f64,
    /// Longest single queue observed
    pub max_queue_length: f64,
    /// Mean delay of the jobs that started service, zero delays included
    pub average_delay: f64,
    pub max_delay: f64,
    pub average_busy_servers: f64,
    /// Fraction of time the server pool was busy, `None` for self-service
    pub utilization: Option<f64>,
}

/// Finalized statistics of one route (job type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReport {
    pub name: String,
    pub completed: usize,
    /// Mean total queueing delay over the whole route
    pub average_delay: f64,
    pub max_delay: f64,
    pub average_time_in_system: f64,
}

/// The flat record of named metrics a network run produces.  Presentation
/// (console, plots) is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkReport {
    pub total_time: f64,
    pub admitted: usize,
    pub completed: usize,
    pub in_system: usize,
    pub average_in_system: f64,
    pub max_in_system: f64,
    /// Mean total queueing delay of the completed jobs
    pub average_delay: f64,
    /// Route average delays, weighted by the route probabilities
    pub weighted_average_delay: f64,
    pub average_time_in_system: f64,
    pub jockey_moves: usize,
    pub stations: Vec<StationReport>,
    pub routes: Vec<RouteReport>,
}

impl NetworkReport {
    pub fn station(&self, name: &str) -> Option<&StationReport> {
        self.stations.iter().find(|station| station.name == name)
    }

    pub fn route(&self, name: &str) -> Option<&RouteReport> {
        self.routes.iter().find(|route| route.name == name)
    }
}
