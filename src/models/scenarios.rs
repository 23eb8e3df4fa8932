//! Ready-made network configurations for the classic queueing scenarios:
//! the M/M/k queue with one shared queue, the multi-teller bank with one
//! queue per teller and jockeying, the university cafeteria, and the
//! five-station job shop.  Each builder returns a plain `NetworkConfig`, so
//! callers can adjust any parameter before building the model.

use serde::{Deserialize, Serialize};

use super::config::{
    Capacity, Discipline, GroupSizeConfig, NetworkConfig, RouteConfig, StageConfig, StationConfig,
};
use crate::input_modeling::ContinuousRandomVariable;

impl NetworkConfig {
    /// Poisson arrivals at rate `lambda` into one FIFO queue served by
    /// `servers` exponential servers at rate `mu`, stopping after
    /// `max_admissions` arrivals.
    pub fn single_queue(lambda: f64, mu: f64, servers: usize, max_admissions: usize) -> Self {
        Self {
            interarrival: ContinuousRandomVariable::Exp { lambda },
            group_size: GroupSizeConfig::default(),
            stations: vec![StationConfig::shared(
                "server",
                servers,
                ContinuousRandomVariable::Exp { lambda: mu },
            )],
            routes: vec![RouteConfig::through("customer", &[0])],
            route_weights: vec![1.0],
            horizon: None,
            max_admissions: Some(max_admissions),
            store_records: false,
        }
    }

    /// As `single_queue`, with one queue per server.  Arriving customers join
    /// the leftmost shortest queue, and customers jockey to keep adjacent
    /// queues within one of each other.
    pub fn parallel_queues(lambda: f64, mu: f64, servers: usize, max_admissions: usize) -> Self {
        let mut config = Self::single_queue(lambda, mu, servers, max_admissions);
        config.stations = vec![StationConfig::per_server(
            "tellers",
            servers,
            ContinuousRandomVariable::Exp { lambda: mu },
            true,
        )];
        config
    }

    /// The cafeteria: groups of one to four students arrive every 30
    /// seconds on average, and each student takes hot food or a sandwich
    /// (or neither), then drinks, then pays at one of the cash registers.
    /// The register time is the sum of the accumulated activity times of
    /// the student's route.  Times are in seconds, over a 90 minute lunch.
    pub fn cafeteria(layout: &CafeteriaLayout) -> Self {
        let uniform = |min: f64, max: f64| ContinuousRandomVariable::Uniform { min, max };
        let counter = |name: &str,
                       service: ContinuousRandomVariable,
                       activity: ContinuousRandomVariable,
                       staff: usize| {
            let staff = staff.max(1) as f64;
            StationConfig {
                activity: Some(activity.scaled_down(staff)),
                ..StationConfig::shared(name, 1, service.scaled_down(staff))
            }
        };
        let stations = vec![
            counter(
                "hot food",
                uniform(50.0, 120.0),
                uniform(20.0, 40.0),
                layout.hot_food,
            ),
            counter(
                "sandwich",
                uniform(60.0, 180.0),
                uniform(5.0, 15.0),
                layout.sandwich,
            ),
            StationConfig {
                activity: Some(uniform(5.0, 10.0)),
                ..StationConfig::self_service("drinks", uniform(5.0, 20.0))
            },
            StationConfig {
                name: String::from("cash"),
                capacity: Capacity::Servers(layout.registers),
                discipline: Discipline::PerServer,
                jockeying: false,
                jockey_on_arrival: false,
                service: None,
                activity: None,
                service_from_route_activity: true,
            },
        ];
        Self {
            interarrival: ContinuousRandomVariable::Exp { lambda: 1.0 / 30.0 },
            group_size: GroupSizeConfig {
                sizes: vec![1, 2, 3, 4],
                weights: vec![0.5, 0.3, 0.1, 0.1],
            },
            stations,
            routes: vec![
                RouteConfig::through("hot food", &[0, 2, 3]),
                RouteConfig::through("sandwich", &[1, 2, 3]),
                RouteConfig::through("drinks only", &[2, 3]),
            ],
            route_weights: vec![0.8, 0.15, 0.05],
            horizon: Some(5400.0),
            max_admissions: None,
            store_records: false,
        }
    }

    /// The job shop: jobs arrive at a rate of 4 per hour over an 8 hour
    /// day, are one of three job types, and visit the machine groups of
    /// their type in order.  Service times are Erlang-2, with a mean that
    /// depends on the job type and the stage.
    pub fn job_shop() -> Self {
        const MACHINES: [usize; 5] = [3, 2, 4, 3, 1];
        const ROUTES: [&[usize]; 3] = [&[2, 0, 1, 4], &[3, 0, 2], &[1, 4, 0, 3, 2]];
        const MEAN_SERVICE: [&[f64]; 3] = [
            &[0.5, 0.6, 0.85, 0.5],
            &[1.1, 0.8, 0.75],
            &[1.2, 0.25, 0.7, 0.9, 1.0],
        ];
        let stations = MACHINES
            .iter()
            .enumerate()
            .map(|(index, machines)| StationConfig {
                name: format!["station {}", index + 1],
                capacity: Capacity::Servers(*machines),
                discipline: Discipline::Shared,
                jockeying: false,
                jockey_on_arrival: false,
                service: None,
                activity: None,
                service_from_route_activity: false,
            })
            .collect();
        let routes = ROUTES
            .iter()
            .zip(MEAN_SERVICE.iter())
            .enumerate()
            .map(|(index, (route, means))| RouteConfig {
                name: format!["type {}", index + 1],
                stages: route
                    .iter()
                    .zip(means.iter())
                    .map(|(station, mean)| StageConfig {
                        station: *station,
                        service: Some(ContinuousRandomVariable::Erlang {
                            shape: 2,
                            mean: *mean,
                        }),
                    })
                    .collect(),
            })
            .collect();
        Self {
            interarrival: ContinuousRandomVariable::Exp { lambda: 4.0 },
            group_size: GroupSizeConfig::default(),
            stations,
            routes,
            route_weights: vec![0.3, 0.5, 0.2],
            horizon: Some(8.0),
            max_admissions: None,
            store_records: false,
        }
    }
}

/// Staffing of the cafeteria.  Extra hot food or sandwich employees speed
/// up the single line of their counter, and every cash register has its
/// own queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeteriaLayout {
    pub hot_food: usize,
    pub sandwich: usize,
    pub registers: usize,
}

impl Default for CafeteriaLayout {
    fn default() -> Self {
        Self {
            hot_food: 1,
            sandwich: 1,
            registers: 2,
        }
    }
}

impl CafeteriaLayout {
    /// Every staffing alternative of one or two employees at the hot food
    /// and sandwich counters, with two or three cash registers.
    pub fn alternatives() -> Vec<CafeteriaLayout> {
        let mut layouts = Vec::new();
        for hot_food in 1..=2 {
            for sandwich in 1..=2 {
                for registers in 2..=3 {
                    layouts.push(CafeteriaLayout {
                        hot_food,
                        sandwich,
                        registers,
                    });
                }
            }
        }
        layouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenarios_are_valid() {
        assert!(NetworkConfig::single_queue(5.0 / 60.0, 8.0 / 60.0, 1, 1000)
            .validate()
            .is_ok());
        assert!(NetworkConfig::parallel_queues(0.5, 0.2, 3, 1000)
            .validate()
            .is_ok());
        assert!(NetworkConfig::job_shop().validate().is_ok());
        CafeteriaLayout::alternatives()
            .iter()
            .for_each(|layout| assert!(NetworkConfig::cafeteria(layout).validate().is_ok()));
    }

    #[test]
    fn extra_employees_halve_counter_times() {
        let layout = CafeteriaLayout {
            hot_food: 2,
            ..CafeteriaLayout::default()
        };
        let config = NetworkConfig::cafeteria(&layout);
        assert_eq!(
            config.stations[0].service,
            Some(ContinuousRandomVariable::Uniform {
                min: 25.0,
                max: 60.0
            })
        );
        assert_eq!(
            config.stations[0].activity,
            Some(ContinuousRandomVariable::Uniform {
                min: 10.0,
                max: 20.0
            })
        );
        assert_eq!(config.stations[3].capacity, Capacity::Servers(2));
    }

    #[test]
    fn job_shop_routes_match_mean_service() {
        let config = NetworkConfig::job_shop();
        let stages: Vec<usize> = config.routes.iter().map(|route| route.stages.len()).collect();
        assert_eq!(stages, vec![4, 3, 5]);
        assert_eq!(config.routes[2].stages[1].station, 4);
        assert_eq!(CafeteriaLayout::alternatives().len(), 8);
    }
}
