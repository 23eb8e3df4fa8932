//! # Overview
//! "queue_sim" provides a discrete event simulation engine for stochastic
//! queueing networks.  Time advances only when a scheduled event occurs,
//! and every event mutates the network state and may schedule further
//! events.
//!
//! This repository contains:
//!
//! * Random variable framework, for specification of interarrival times,
//! service times, group sizes and route choices.
//! * Queueing network model, covering single-queue multi-server systems,
//! per-server queues with jockeying, and multi-stage routed networks.
//! * Output analysis framework, for time-weighted and per-job statistics,
//! analytical reference values, and confidence intervals over independent
//! replications.
//! * Simulator engine, for managing and executing discrete event
//! simulations, to completion or step by step.
//!
//! A run is fully determined by its configuration and seed.
pub mod input_modeling;
pub mod models;
pub mod output_analysis;
pub mod simulator;
pub mod utils;
