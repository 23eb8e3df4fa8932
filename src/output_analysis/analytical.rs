//! Closed-form steady-state measures of Markovian queues, used as the
//! reference for simulated M/M/1 and M/M/k runs.

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMeasures {
    pub average_queue_length: f64,
    pub average_delay: f64,
    pub utilization: f64,
    pub average_in_system: f64,
    pub average_time_in_system: f64,
}

/// The M/M/1 queue: `Lq = λ² / (μ(μ - λ))`, `Wq = λ / (μ(μ - λ))`,
/// `ρ = λ / μ`.
pub fn mm1(arrival_rate: f64, service_rate: f64) -> Result<QueueMeasures, SimulationError> {
    mmk(arrival_rate, service_rate, 1)
}

/// The M/M/k queue with a single shared queue, through the Erlang C
/// probability of waiting.
pub fn mmk(
    arrival_rate: f64,
    service_rate: f64,
    servers: usize,
) -> Result<QueueMeasures, SimulationError> {
    let offered_load = arrival_rate / service_rate;
    let utilization = offered_load / servers as f64;
    if servers == 0 || !(arrival_rate > 0.0 && service_rate > 0.0) || utilization >= 1.0 {
        return Err(SimulationError::InvalidModelConfiguration(format![
            "no steady state for arrival rate {}, service rate {}, {} servers",
            arrival_rate, service_rate, servers
        ]));
    }
    // Terms a^n / n! for n = 0..=k
    let mut terms = Vec::with_capacity(servers + 1);
    terms.push(1.0);
    for n in 1..=servers {
        let previous = terms[n - 1];
        terms.push(previous * offered_load / n as f64);
    }
    let saturated = terms[servers] / (1.0 - utilization);
    let empty = 1.0 / (terms[..servers].iter().sum::<f64>() + saturated);
    let waiting = saturated * empty;
    let average_queue_length = waiting * utilization / (1.0 - utilization);
    let average_delay = average_queue_length / arrival_rate;
    Ok(QueueMeasures {
        average_queue_length,
        average_delay,
        utilization,
        average_in_system: average_queue_length + offered_load,
        average_time_in_system: average_delay + 1.0 / service_rate,
    })
}
