//! Server resources of a station.  A station serves jobs with one of three
//! resource kinds: a pool of interchangeable servers sharing one FIFO
//! queue, a row of servers each with its own queue (optionally rebalanced
//! by jockeying), or self-service with an unlimited number of servers.
//!
//! Resources only track who is waiting and who is being served.  Timing,
//! delay statistics and event scheduling belong to the model.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::config::{Capacity, Discipline, StationConfig};
use crate::simulator::Job;
use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Pool(ServerPool),
    Parallel(ParallelQueues),
    SelfService(SelfService),
}

/// `k` interchangeable servers in front of a single FIFO queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPool {
    servers: usize,
    busy: usize,
    queue: VecDeque<Job>,
}

/// One queue per server.  Arrivals take the lowest-indexed idle server, or
/// join the leftmost shortest queue when every server is busy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelQueues {
    queues: Vec<VecDeque<Job>>,
    busy: Vec<bool>,
    jockeying: bool,
    jockey_on_arrival: bool,
    moves: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfService {
    busy: usize,
}

impl Resource {
    pub fn from_config(config: &StationConfig) -> Self {
        match (&config.capacity, &config.discipline) {
            (Capacity::Unlimited, _) => Resource::SelfService(SelfService::default()),
            (Capacity::Servers(servers), Discipline::Shared) => {
                Resource::Pool(ServerPool::new(*servers))
            }
            (Capacity::Servers(servers), Discipline::PerServer) => {
                Resource::Parallel(ParallelQueues::new(
                    *servers,
                    config.jockeying,
                    config.jockey_on_arrival,
                ))
            }
        }
    }

    /// Offer a job to the resource.  The job is returned (with its server
    /// assigned) when it starts service immediately, and `None` is returned
    /// when it joins a queue.
    pub fn arrive(&mut self, job: Job) -> Option<Job> {
        match self {
            Resource::Pool(pool) => pool.arrive(job),
            Resource::Parallel(parallel) => parallel.arrive(job),
            Resource::SelfService(self_service) => Some(self_service.arrive(job)),
        }
    }

    /// Release `server` after a service completion.  The returned jobs
    /// leave a queue and start service now.
    pub fn complete(&mut self, server: usize) -> Result<Vec<Job>, SimulationError> {
        match self {
            Resource::Pool(pool) => Ok(pool.complete()?.into_iter().collect()),
            Resource::Parallel(parallel) => parallel.complete(server),
            Resource::SelfService(self_service) => {
                self_service.complete()?;
                Ok(Vec::new())
            }
        }
    }

    /// Number of waiting jobs, over all queues of the resource.
    pub fn queued(&self) -> usize {
        match self {
            Resource::Pool(pool) => pool.queue.len(),
            Resource::Parallel(parallel) => parallel.queues.iter().map(VecDeque::len).sum(),
            Resource::SelfService(_) => 0,
        }
    }

    /// Number of jobs in service.
    pub fn busy(&self) -> usize {
        match self {
            Resource::Pool(pool) => pool.busy,
            Resource::Parallel(parallel) => parallel.busy.iter().filter(|busy| **busy).count(),
            Resource::SelfService(self_service) => self_service.busy,
        }
    }

    pub fn longest_queue(&self) -> usize {
        self.queue_lengths().into_iter().max().unwrap_or(0)
    }

    pub fn queue_lengths(&self) -> Vec<usize> {
        match self {
            Resource::Pool(pool) => vec![pool.queue.len()],
            Resource::Parallel(parallel) => parallel.queues.iter().map(VecDeque::len).collect(),
            Resource::SelfService(_) => Vec::new(),
        }
    }

    /// Number of queues jobs can wait in.
    pub fn queue_count(&self) -> usize {
        match self {
            Resource::Pool(_) => 1,
            Resource::Parallel(parallel) => parallel.queues.len(),
            Resource::SelfService(_) => 0,
        }
    }

    /// Server count, `None` for self-service.
    pub fn servers(&self) -> Option<usize> {
        match self {
            Resource::Pool(pool) => Some(pool.servers),
            Resource::Parallel(parallel) => Some(parallel.busy.len()),
            Resource::SelfService(_) => None,
        }
    }

    pub fn jockey_moves(&self) -> usize {
        match self {
            Resource::Parallel(parallel) => parallel.moves,
            _ => 0,
        }
    }
}

impl ServerPool {
    pub fn new(servers: usize) -> Self {
        Self {
            servers,
            busy: 0,
            queue: VecDeque::new(),
        }
    }

    fn arrive(&mut self, mut job: Job) -> Option<Job> {
        if self.busy < self.servers {
            job.server = self.busy;
            self.busy += 1;
            Some(job)
        } else {
            self.queue.push_back(job);
            None
        }
    }

    fn complete(&mut self) -> Result<Option<Job>, SimulationError> {
        if self.busy == 0 {
            return Err(SimulationError::InvalidModelState(String::from(
                "service completion at an idle server pool",
            )));
        }
        match self.queue.pop_front() {
            Some(mut next) => {
                next.server = self.busy - 1;
                Ok(Some(next))
            }
            None => {
                self.busy -= 1;
                Ok(None)
            }
        }
    }
}

impl ParallelQueues {
    pub fn new(servers: usize, jockeying: bool, jockey_on_arrival: bool) -> Self {
        Self {
            queues: vec![VecDeque::new(); servers],
            busy: vec![false; servers],
            jockeying,
            jockey_on_arrival,
            moves: 0,
        }
    }

    fn arrive(&mut self, mut job: Job) -> Option<Job> {
        if let Some(idle) = self.busy.iter().position(|busy| !busy) {
            self.busy[idle] = true;
            job.server = idle;
            return Some(job);
        }
        // min_by_key keeps the first of equal elements, the leftmost queue
        let shortest = self
            .queues
            .iter()
            .enumerate()
            .min_by_key(|(_, queue)| queue.len())
            .map(|(index, _)| index)?;
        job.server = shortest;
        self.queues[shortest].push_back(job);
        if self.jockeying && self.jockey_on_arrival {
            self.sweep();
        }
        None
    }

    fn complete(&mut self, server: usize) -> Result<Vec<Job>, SimulationError> {
        if !self.busy.get(server).copied().unwrap_or(false) {
            return Err(SimulationError::InvalidModelState(format![
                "service completion at idle or unknown server {}",
                server
            ]));
        }
        let mut started = Vec::new();
        self.busy[server] = false;
        if self.jockeying {
            self.pull_into(server);
            started.extend(self.take_next(server));
            self.sweep();
        }
        // Any idle server facing a non-empty queue of its own starts now
        started.extend((0..self.busy.len()).filter_map(|index| self.take_next(index)));
        Ok(started)
    }

    fn take_next(&mut self, server: usize) -> Option<Job> {
        if self.busy[server] {
            return None;
        }
        let mut next = self.queues[server].pop_front()?;
        next.server = server;
        self.busy[server] = true;
        Some(next)
    }

    fn move_tail(&mut self, from: usize, to: usize) {
        if let Some(mut job) = self.queues[from].pop_back() {
            job.server = to;
            self.queues[to].push_back(job);
            self.moves += 1;
        }
    }

    /// The queue of `server` takes tail jobs from a longer left neighbor,
    /// then from a longer right neighbor, while the lengths differ by two
    /// or more.
    fn pull_into(&mut self, server: usize) {
        if server > 0 {
            while self.queues[server - 1].len() >= self.queues[server].len() + 2 {
                self.move_tail(server - 1, server);
            }
        }
        if server + 1 < self.queues.len() {
            while self.queues[server + 1].len() >= self.queues[server].len() + 2 {
                self.move_tail(server + 1, server);
            }
        }
    }

    /// Move tail jobs between adjacent queues until no two adjacent queues
    /// differ by more than one.  Every move lowers the sum of squared queue
    /// lengths, so the sweep terminates.
    fn sweep(&mut self) {
        loop {
            let mut moved = false;
            for right in 1..self.queues.len() {
                let left = right - 1;
                if self.queues[left].len() >= self.queues[right].len() + 2 {
                    self.move_tail(left, right);
                    moved = true;
                } else if self.queues[right].len() >= self.queues[left].len() + 2 {
                    self.move_tail(right, left);
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }
    }
}

impl SelfService {
    fn arrive(&mut self, mut job: Job) -> Job {
        job.server = self.busy;
        self.busy += 1;
        job
    }

    fn complete(&mut self) -> Result<(), SimulationError> {
        if self.busy == 0 {
            return Err(SimulationError::InvalidModelState(String::from(
                "service completion at an empty self-service station",
            )));
        }
        self.busy -= 1;
        Ok(())
    }
}
