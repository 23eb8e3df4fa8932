//! Configuration of a queueing network.  A `NetworkConfig` is an immutable
//! value handed to the model at construction.  It can be built in code (see
//! the `scenarios` module) or parsed from a YAML or JSON string, and it is
//! always validated before any event runs.

use serde::{Deserialize, Serialize};

use crate::input_modeling::{ContinuousRandomVariable, IndexRandomVariable};
use crate::utils::errors::SimulationError;
use crate::utils::is_probability_vector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub interarrival: ContinuousRandomVariable,
    #[serde(default)]
    pub group_size: GroupSizeConfig,
    pub stations: Vec<StationConfig>,
    pub routes: Vec<RouteConfig>,
    pub route_weights: Vec<f64>,
    /// Simulated time at which the run stops
    #[serde(default)]
    pub horizon: Option<f64>,
    /// Number of jobs admitted before the arrival process stops
    #[serde(default)]
    pub max_admissions: Option<usize>,
    #[serde(default)]
    pub store_records: bool,
}

/// Arrivals come in groups, with the group size drawn from `sizes` by
/// `weights`.  The default is single arrivals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSizeConfig {
    pub sizes: Vec<usize>,
    pub weights: Vec<f64>,
}

impl Default for GroupSizeConfig {
    fn default() -> Self {
        Self {
            sizes: vec![1],
            weights: vec![1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capacity {
    Servers(usize),
    /// Self-service: every job is served immediately
    Unlimited,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Discipline {
    /// One FIFO queue in front of all servers
    Shared,
    /// One FIFO queue per server
    PerServer,
}

impl Default for Discipline {
    fn default() -> Self {
        Discipline::Shared
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationConfig {
    pub name: String,
    pub capacity: Capacity,
    #[serde(default)]
    pub discipline: Discipline,
    /// Rebalance per-server queues after every departure
    #[serde(default)]
    pub jockeying: bool,
    /// Also rebalance after every arrival that joins a queue
    #[serde(default)]
    pub jockey_on_arrival: bool,
    #[serde(default)]
    pub service: Option<ContinuousRandomVariable>,
    /// Time this station adds to the service of a route-derived station
    #[serde(default)]
    pub activity: Option<ContinuousRandomVariable>,
    /// Service time is the sum of activity samples of every station on the
    /// job's route
    #[serde(default)]
    pub service_from_route_activity: bool,
}

impl StationConfig {
    /// A station with `servers` servers in front of one shared queue.
    pub fn shared(name: &str, servers: usize, service: ContinuousRandomVariable) -> Self {
        Self {
            name: String::from(name),
            capacity: Capacity::Servers(servers),
            discipline: Discipline::Shared,
            jockeying: false,
            jockey_on_arrival: false,
            service: Some(service),
            activity: None,
            service_from_route_activity: false,
        }
    }

    /// A station with one queue per server.
    pub fn per_server(
        name: &str,
        servers: usize,
        service: ContinuousRandomVariable,
        jockeying: bool,
    ) -> Self {
        Self {
            discipline: Discipline::PerServer,
            jockeying,
            ..Self::shared(name, servers, service)
        }
    }

    /// A station without a server limit.
    pub fn self_service(name: &str, service: ContinuousRandomVariable) -> Self {
        Self {
            capacity: Capacity::Unlimited,
            ..Self::shared(name, 1, service)
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        if self.capacity == Capacity::Servers(0) {
            return Err(SimulationError::InvalidModelConfiguration(format![
                "station {} has no servers",
                self.name
            ]));
        }
        if let Some(service) = &self.service {
            service.validate()?;
        }
        if let Some(activity) = &self.activity {
            activity.validate()?;
        }
        if self.jockeying && self.discipline != Discipline::PerServer {
            return Err(SimulationError::InvalidModelConfiguration(format![
                "station {} jockeys without per-server queues",
                self.name
            ]));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    pub name: String,
    pub stages: Vec<StageConfig>,
}

impl RouteConfig {
    /// A route visiting `stations` in order, with station service times.
    pub fn through(name: &str, stations: &[usize]) -> Self {
        Self {
            name: String::from(name),
            stages: stations
                .iter()
                .map(|station| StageConfig {
                    station: *station,
                    service: None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageConfig {
    /// Index into the network's stations
    pub station: usize,
    /// Overrides the station's service time for this stage
    #[serde(default)]
    pub service: Option<ContinuousRandomVariable>,
}

impl NetworkConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, SimulationError> {
        let config: NetworkConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let config: NetworkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, SimulationError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The route choice made at admission.
    pub fn route_choice(&self) -> IndexRandomVariable {
        IndexRandomVariable::WeightedIndex {
            weights: self.route_weights.clone(),
        }
    }

    /// The group size choice made for every arrival group, as an index into
    /// `group_size.sizes`.
    pub fn group_size_choice(&self) -> IndexRandomVariable {
        IndexRandomVariable::WeightedIndex {
            weights: self.group_size.weights.clone(),
        }
    }

    pub fn station_index(&self, name: &str) -> Option<usize> {
        self.stations.iter().position(|station| station.name == name)
    }

    /// Check the topology, probability vectors, distribution parameters and
    /// termination criteria.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.interarrival.validate()?;
        if self.stations.is_empty() {
            return Err(invalid("the network has no stations"));
        }
        if self.routes.is_empty() {
            return Err(invalid("the network has no routes"));
        }
        if self.route_weights.len() != self.routes.len() {
            return Err(invalid("route weights do not match the routes"));
        }
        self.route_choice().validate()?;
        if self.group_size.sizes.len() != self.group_size.weights.len()
            || self.group_size.sizes.iter().any(|size| *size == 0)
        {
            return Err(invalid("group sizes must be positive, one weight each"));
        }
        if !is_probability_vector(&self.group_size.weights) {
            return Err(invalid("group size weights are not a probability vector"));
        }
        self.stations
            .iter()
            .try_for_each(StationConfig::validate)?;
        for route in &self.routes {
            if route.stages.is_empty() {
                return Err(SimulationError::InvalidModelConfiguration(format![
                    "route {} has no stages",
                    route.name
                ]));
            }
            for stage in &route.stages {
                if stage.station >= self.stations.len() {
                    return Err(SimulationError::InvalidModelConfiguration(format![
                        "route {} visits unknown station {}",
                        route.name, stage.station
                    ]));
                }
                if let Some(service) = &stage.service {
                    service.validate()?;
                }
            }
        }
        match (self.horizon, self.max_admissions) {
            (Some(horizon), _) if !horizon.is_finite() || horizon < 0.0 => {
                Err(invalid("the horizon must be a finite, non-negative time"))
            }
            (None, None) => Err(invalid(
                "the run is unbounded, set a horizon or an admission cap",
            )),
            _ => Ok(()),
        }
    }
}

fn invalid(reason: &str) -> SimulationError {
    SimulationError::InvalidModelConfiguration(String::from(reason))
}
