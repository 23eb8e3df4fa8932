//! The network model covers every scenario of the crate with one state
//! machine: jobs are admitted in arrival groups, draw a route, and visit the
//! stations of that route in order.  A single station with one route is the
//! M/M/1 or M/M/k queue, per-server queues with jockeying are the
//! multi-queue bank, and multi-station routes are the cafeteria and the job
//! shop.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::config::NetworkConfig;
use super::model_trait::{ModelRecord, Occupancy, QueueingModel};
use super::station::Resource;
use crate::input_modeling::IndexRandomVariable;
use crate::output_analysis::{NetworkReport, RouteReport, StationReport, Tally, TimeAverage};
use crate::simulator::{EventKind, Job, Services};
use crate::utils::errors::SimulationError;
use crate::utils::ratio;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    config: NetworkConfig,
    route_choice: IndexRandomVariable,
    group_size_choice: IndexRandomVariable,
    stations: Vec<Station>,
    routes: Vec<RouteStatistics>,
    #[serde(default)]
    state: State,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Station {
    resource: Resource,
    served: usize,
    max_queue_length: usize,
    queue_length: TimeAverage,
    busy: TimeAverage,
    delay: Tally,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteStatistics {
    delay: Tally,
    time_in_system: Tally,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct State {
    /// Jobs scheduled by the arrival process, admitted or not
    generated: usize,
    groups_generated: usize,
    admitted: usize,
    completed: usize,
    in_system: usize,
    in_system_level: TimeAverage,
    delay: Tally,
    time_in_system: Tally,
    records: Vec<ModelRecord>,
}

impl Network {
    pub fn new(config: NetworkConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        debug!(
            "Network with {} stations and {} routes",
            config.stations.len(),
            config.routes.len()
        );
        Ok(Self {
            route_choice: config.route_choice(),
            group_size_choice: config.group_size_choice(),
            stations: config
                .stations
                .iter()
                .map(|station| Station {
                    resource: Resource::from_config(station),
                    served: 0,
                    max_queue_length: 0,
                    queue_length: TimeAverage::default(),
                    busy: TimeAverage::default(),
                    delay: Tally::default(),
                })
                .collect(),
            routes: vec![RouteStatistics::default(); config.routes.len()],
            state: State::default(),
            config,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Current queue lengths at a station, one entry per queue.
    pub fn queue_lengths(&self, station: usize) -> Vec<usize> {
        self.stations
            .get(station)
            .map(|station| station.resource.queue_lengths())
            .unwrap_or_default()
    }

    /// Jobs in service at a station.
    pub fn busy_servers(&self, station: usize) -> usize {
        self.stations
            .get(station)
            .map(|station| station.resource.busy())
            .unwrap_or(0)
    }

    pub fn records(&self) -> &[ModelRecord] {
        &self.state.records
    }

    fn record(&mut self, time: f64, action: &str, subject: String) {
        if self.config.store_records {
            self.state.records.push(ModelRecord {
                time,
                action: String::from(action),
                subject,
            });
        }
    }

    fn station_of(&self, job: &Job) -> Result<usize, SimulationError> {
        self.config
            .routes
            .get(job.route)
            .and_then(|route| route.stages.get(job.stage))
            .map(|stage| stage.station)
            .ok_or_else(|| {
                SimulationError::InvalidModelState(format![
                    "job {} has no stage {} on route {}",
                    job.id, job.stage, job.route
                ])
            })
    }

    fn station_name(&self, station: usize) -> &str {
        self.config
            .stations
            .get(station)
            .map(|station| station.name.as_str())
            .unwrap_or("unknown")
    }

    /// Schedule the next arrival group, one interarrival time from now.  The
    /// group is truncated to the jobs left under the admission cap, and no
    /// group is generated once the cap is reached.
    fn schedule_group(&mut self, services: &mut Services) -> Result<(), SimulationError> {
        let remaining = match self.config.max_admissions {
            Some(cap) => cap.saturating_sub(self.state.generated),
            None => usize::MAX,
        };
        if remaining == 0 {
            debug!("Admission cap reached at time {}", services.global_time());
            return Ok(());
        }
        let interarrival = self
            .config
            .interarrival
            .random_variate(services.uniform_rng())?;
        let size_index = self
            .group_size_choice
            .random_variate(services.uniform_rng())?;
        let size = self
            .config
            .group_size
            .sizes
            .get(size_index)
            .copied()
            .ok_or_else(|| {
                SimulationError::InvalidModelState(format!["no group size {}", size_index])
            })?
            .min(remaining);
        self.state.groups_generated += 1;
        self.state.generated += size;
        for _ in 0..size {
            let route = self.route_choice.random_variate(services.uniform_rng())?;
            let job = Job::new(services.next_job_id(), self.state.groups_generated, route);
            services.schedule_in(interarrival, EventKind::Arrival(job))?;
        }
        Ok(())
    }

    /// Service time of a job at its current stage: a stage override, else
    /// the sum of activity times along the route for route-derived stations,
    /// else the station's own service time.  A station without any service
    /// distribution passes jobs through in zero time.
    fn service_time(&self, job: &Job, services: &mut Services) -> Result<f64, SimulationError> {
        let station = self.station_of(job)?;
        let route = &self.config.routes[job.route];
        let station_config = &self.config.stations[station];
        if let Some(service) = &route.stages[job.stage].service {
            service.random_variate(services.uniform_rng())
        } else if station_config.service_from_route_activity {
            route
                .stages
                .iter()
                .filter_map(|stage| self.config.stations[stage.station].activity.as_ref())
                .map(|activity| activity.random_variate(services.uniform_rng()))
                .sum()
        } else if let Some(service) = &station_config.service {
            service.random_variate(services.uniform_rng())
        } else {
            Ok(0.0)
        }
    }

    fn begin_service(
        &mut self,
        mut job: Job,
        services: &mut Services,
    ) -> Result<(), SimulationError> {
        let now = services.global_time();
        let station = self.station_of(&job)?;
        let delay = now - job.arrived_at;
        self.stations[station].delay.record(delay);
        job.delay += delay;
        let duration = self.service_time(&job, services)?;
        self.record(
            now,
            "Service Start",
            format!["job {} at {} server {}", job.id, self.station_name(station), job.server],
        );
        services.schedule_in(duration, EventKind::Departure(job))
    }

    fn complete_job(&mut self, job: &Job, now: f64) -> Result<(), SimulationError> {
        self.state.in_system = self.state.in_system.checked_sub(1).ok_or_else(|| {
            SimulationError::InvalidModelState(format![
                "job {} left an empty system",
                job.id
            ])
        })?;
        self.state.completed += 1;
        let time_in_system = now - job.entered_at;
        self.state.delay.record(job.delay);
        self.state.time_in_system.record(time_in_system);
        if let Some(route) = self.routes.get_mut(job.route) {
            route.delay.record(job.delay);
            route.time_in_system.record(time_in_system);
        }
        Ok(())
    }
}

impl QueueingModel for Network {
    type Report = NetworkReport;

    fn horizon(&self) -> Option<f64> {
        self.config.horizon
    }

    fn start(&mut self, services: &mut Services) -> Result<(), SimulationError> {
        self.schedule_group(services)
    }

    fn arrival(&mut self, mut job: Job, services: &mut Services) -> Result<(), SimulationError> {
        let now = services.global_time();
        if job.stage == 0 {
            self.state.admitted += 1;
            self.state.in_system += 1;
            job.entered_at = now;
            // The first member of the newest group keeps the arrival process going
            if job.group == self.state.groups_generated {
                self.schedule_group(services)?;
            }
        }
        job.arrived_at = now;
        let station = self.station_of(&job)?;
        self.record(
            now,
            "Arrival",
            format!["job {} at {}", job.id, self.station_name(station)],
        );
        if let Some(started) = self.stations[station].resource.arrive(job) {
            self.begin_service(started, services)?;
        }
        Ok(())
    }

    fn departure(&mut self, mut job: Job, services: &mut Services) -> Result<(), SimulationError> {
        let now = services.global_time();
        let station = self.station_of(&job)?;
        let moves_before = self.stations[station].resource.jockey_moves();
        self.stations[station].served += 1;
        let started = self.stations[station].resource.complete(job.server)?;
        let moves = self.stations[station].resource.jockey_moves() - moves_before;
        if moves > 0 {
            trace!("{} jockey moves at {}", moves, self.station_name(station));
            self.record(
                now,
                "Jockey",
                format!["{} jobs at {}", moves, self.station_name(station)],
            );
        }
        for next in started {
            self.begin_service(next, services)?;
        }
        self.record(
            now,
            "Departure",
            format!["job {} from {}", job.id, self.station_name(station)],
        );
        let stages = self.config.routes[job.route].stages.len();
        if job.stage + 1 < stages {
            job.stage += 1;
            services.schedule(now, EventKind::Arrival(job))
        } else {
            self.complete_job(&job, now)
        }
    }

    fn time_advance(&mut self, time_delta: f64) {
        self.stations.iter_mut().for_each(|station| {
            station
                .queue_length
                .accumulate(station.resource.queued() as f64, time_delta);
            station
                .busy
                .accumulate(station.resource.busy() as f64, time_delta);
            station.max_queue_length = station
                .max_queue_length
                .max(station.resource.longest_queue());
        });
        self.state
            .in_system_level
            .accumulate(self.state.in_system as f64, time_delta);
    }

    fn occupancy(&self) -> Occupancy {
        Occupancy {
            admitted: self.state.admitted,
            completed: self.state.completed,
            in_system: self.state.in_system,
            queued: self
                .stations
                .iter()
                .map(|station| station.resource.queued())
                .sum(),
            in_service: self
                .stations
                .iter()
                .map(|station| station.resource.busy())
                .sum(),
        }
    }

    fn finish(&self, total_time: f64) -> NetworkReport {
        let stations: Vec<StationReport> = self
            .stations
            .iter()
            .zip(self.config.stations.iter())
            .map(|(station, station_config)| {
                let average_queue_length = station.queue_length.average(total_time);
                let servers = station.resource.servers();
                StationReport {
                    name: station_config.name.clone(),
                    servers,
                    served: station.served,
                    average_queue_length,
                    average_queue_length_per_queue: ratio(
                        average_queue_length,
                        station.resource.queue_count() as f64,
                    ),
                    max_queue_length: station.max_queue_length as f64,
                    average_delay: station.delay.mean(),
                    max_delay: station.delay.maximum(),
                    average_busy_servers: station.busy.average(total_time),
                    utilization: servers
                        .map(|servers| ratio(station.busy.area(), total_time * servers as f64)),
                }
            })
            .collect();
        let routes: Vec<RouteReport> = self
            .routes
            .iter()
            .zip(self.config.routes.iter())
            .map(|(route, route_config)| RouteReport {
                name: route_config.name.clone(),
                completed: route.delay.count(),
                average_delay: route.delay.mean(),
                max_delay: route.delay.maximum(),
                average_time_in_system: route.time_in_system.mean(),
            })
            .collect();
        let weighted_average_delay = routes
            .iter()
            .zip(self.config.route_weights.iter())
            .map(|(route, weight)| weight * route.average_delay)
            .sum::<f64>();
        NetworkReport {
            total_time,
            admitted: self.state.admitted,
            completed: self.state.completed,
            in_system: self.state.in_system,
            average_in_system: self.state.in_system_level.average(total_time),
            max_in_system: self.state.in_system_level.maximum(),
            average_delay: self.state.delay.mean(),
            weighted_average_delay,
            average_time_in_system: self.state.time_in_system.mean(),
            jockey_moves: self
                .stations
                .iter()
                .map(|station| station.resource.jockey_moves())
                .sum(),
            stations,
            routes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_modeling::ContinuousRandomVariable;
    use crate::models::config::{GroupSizeConfig, RouteConfig, StageConfig, StationConfig};

    fn constant(duration: f64) -> ContinuousRandomVariable {
        ContinuousRandomVariable::Uniform {
            min: duration,
            max: duration,
        }
    }

    /// Arrivals every 10 time units, 4 time units of service.
    fn deterministic_queue() -> NetworkConfig {
        NetworkConfig {
            interarrival: constant(10.0),
            group_size: GroupSizeConfig::default(),
            stations: vec![StationConfig::shared("server", 1, constant(4.0))],
            routes: vec![RouteConfig::through("only", &[0])],
            route_weights: vec![1.0],
            horizon: None,
            max_admissions: Some(3),
            store_records: true,
        }
    }

    fn run(network: &mut Network) -> Result<f64, SimulationError> {
        let mut services = Services::new(1);
        network.start(&mut services)?;
        while let Some(event) = services.next_event() {
            network.time_advance(event.time() - services.global_time());
            services.set_global_time(event.time());
            match event.kind() {
                EventKind::Arrival(job) => network.arrival(*job, &mut services)?,
                EventKind::Departure(job) => network.departure(*job, &mut services)?,
                _ => {}
            }
        }
        Ok(services.global_time())
    }

    #[test]
    fn deterministic_queue_never_waits() -> Result<(), SimulationError> {
        let mut network = Network::new(deterministic_queue())?;
        let end = run(&mut network)?;
        // Arrivals at 10, 20, 30 and the last departure at 34
        assert_eq!(end, 34.0);
        let report = network.finish(end);
        assert_eq!(report.admitted, 3);
        assert_eq!(report.completed, 3);
        assert_eq!(report.average_delay, 0.0);
        let server = &report.stations[0];
        assert_eq!(server.served, 3);
        assert!((server.utilization.unwrap_or(0.0) - 12.0 / 34.0).abs() < 1e-12);
        assert_eq!(report.average_time_in_system, 4.0);
        assert_eq!(network.records().len(), 9);
        Ok(())
    }

    #[test]
    fn group_members_share_the_arrival_instant() -> Result<(), SimulationError> {
        let config = NetworkConfig {
            group_size: GroupSizeConfig {
                sizes: vec![3],
                weights: vec![1.0],
            },
            max_admissions: Some(3),
            ..deterministic_queue()
        };
        let mut network = Network::new(config)?;
        let end = run(&mut network)?;
        // All three arrive at 10 and are served back to back
        assert_eq!(end, 22.0);
        let report = network.finish(end);
        assert_eq!(report.completed, 3);
        // Delays 0, 4 and 8
        assert_eq!(report.stations[0].average_delay, 4.0);
        assert_eq!(report.stations[0].max_delay, 8.0);
        assert_eq!(report.stations[0].max_queue_length, 2.0);
        Ok(())
    }

    #[test]
    fn route_activity_defines_service() -> Result<(), SimulationError> {
        let mut config = deterministic_queue();
        config.max_admissions = Some(1);
        config.stations = vec![
            StationConfig {
                activity: Some(constant(3.0)),
                ..StationConfig::shared("counter", 1, constant(6.0))
            },
            StationConfig {
                activity: Some(constant(1.0)),
                ..StationConfig::self_service("drinks", constant(2.0))
            },
            StationConfig {
                service: None,
                service_from_route_activity: true,
                ..StationConfig::shared("cash", 1, constant(0.0))
            },
        ];
        config.routes = vec![RouteConfig {
            name: String::from("full"),
            stages: vec![
                StageConfig {
                    station: 0,
                    service: None,
                },
                StageConfig {
                    station: 1,
                    service: Some(constant(5.0)),
                },
                StageConfig {
                    station: 2,
                    service: None,
                },
            ],
        }];
        let mut network = Network::new(config)?;
        let end = run(&mut network)?;
        // Arrival 10, counter 6, drinks override 5, cash 3 + 1
        assert_eq!(end, 25.0);
        let report = network.finish(end);
        assert_eq!(report.average_time_in_system, 15.0);
        assert_eq!(report.station("drinks").and_then(|s| s.utilization), None);
        Ok(())
    }

    #[test]
    fn zero_admissions_report_zeros() -> Result<(), SimulationError> {
        let config = NetworkConfig {
            max_admissions: Some(0),
            ..deterministic_queue()
        };
        let mut network = Network::new(config)?;
        let end = run(&mut network)?;
        let report = network.finish(end);
        assert_eq!(report.total_time, 0.0);
        assert_eq!(report.stations[0].served, 0);
        assert_eq!(report.stations[0].utilization, Some(0.0));
        assert_eq!(report.average_delay, 0.0);
        Ok(())
    }
}
