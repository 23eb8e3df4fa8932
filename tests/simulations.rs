use queue_sim::input_modeling::ContinuousRandomVariable;
use queue_sim::models::{
    CafeteriaLayout, GroupSizeConfig, Network, NetworkConfig, QueueingModel, RouteConfig,
    StationConfig,
};
use queue_sim::output_analysis::analytical::{mm1, mmk};
use queue_sim::output_analysis::{IndependentSample, NetworkReport};
use queue_sim::simulator::{replicate, EventKind, Simulation};
use queue_sim::utils::errors::SimulationError;

fn init_logging() {
    let _ = simplelog::TestLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
    );
}

fn relative_error(observed: f64, expected: f64) -> f64 {
    (observed - expected).abs() / expected
}

fn run_checked(config: NetworkConfig, seed: u64) -> Result<NetworkReport, SimulationError> {
    let mut simulation = Simulation::post(Network::new(config)?, seed);
    let mut clock = simulation.get_global_time();
    while simulation.step()?.is_some() {
        assert!(simulation.get_global_time() >= clock);
        clock = simulation.get_global_time();
        assert!(simulation.model().occupancy().is_conserved());
    }
    Ok(simulation.report())
}

fn assert_sane(report: &NetworkReport) {
    assert_eq!(report.admitted, report.completed + report.in_system);
    report.stations.iter().for_each(|station| {
        assert!(station.average_queue_length >= 0.0);
        if let Some(utilization) = station.utilization {
            assert!((0.0..=1.0).contains(&utilization));
        }
    });
}

#[test]
fn mm1_delay_matches_analytical() -> Result<(), SimulationError> {
    init_logging();
    let (lambda, mu) = (5.0 / 60.0, 8.0 / 60.0);
    let config = NetworkConfig::single_queue(lambda, mu, 1, 80000);
    let report = Simulation::post(Network::new(config)?, 110).run()?;
    let expected = mm1(lambda, mu)?;
    // lambda / (mu * (mu - lambda)) = 12.5
    assert!((expected.average_delay - 12.5).abs() < 1e-9);
    let server = &report.stations[0];
    assert_eq!(server.served, 80000);
    assert_eq!(report.completed, 80000);
    assert!(relative_error(server.average_delay, expected.average_delay) < 0.1);
    assert!(relative_error(server.utilization.unwrap_or(0.0), expected.utilization) < 0.05);
    assert!(
        relative_error(server.average_queue_length, expected.average_queue_length) < 0.15
    );
    assert_sane(&report);
    Ok(())
}

#[test]
fn mmk_delay_matches_analytical() -> Result<(), SimulationError> {
    init_logging();
    let (lambda, mu, servers) = (1.0, 0.8, 2);
    let config = NetworkConfig::single_queue(lambda, mu, servers, 50000);
    let report = Simulation::post(Network::new(config)?, 7).run()?;
    let expected = mmk(lambda, mu, servers)?;
    let station = &report.stations[0];
    assert!(relative_error(station.average_delay, expected.average_delay) < 0.15);
    assert!(relative_error(station.utilization.unwrap_or(0.0), expected.utilization) < 0.05);
    assert_sane(&report);
    Ok(())
}

#[test]
fn zero_admissions_produce_an_empty_report() -> Result<(), SimulationError> {
    let config = NetworkConfig::single_queue(5.0 / 60.0, 8.0 / 60.0, 1, 0);
    let mut simulation = Simulation::post(Network::new(config)?, 110);
    let report = simulation.run()?;
    assert!(simulation.is_finished());
    assert_eq!(report.admitted, 0);
    assert_eq!(report.stations[0].served, 0);
    assert_eq!(report.stations[0].utilization, Some(0.0));
    assert_eq!(report.stations[0].average_delay, 0.0);
    assert_eq!(report.stations[0].average_queue_length, 0.0);
    Ok(())
}

#[test]
fn jockeying_keeps_adjacent_queues_balanced() -> Result<(), SimulationError> {
    init_logging();
    let config = NetworkConfig {
        interarrival: ContinuousRandomVariable::Uniform { min: 0.0, max: 0.0 },
        group_size: GroupSizeConfig {
            sizes: vec![10],
            weights: vec![1.0],
        },
        stations: vec![StationConfig::per_server(
            "tellers",
            2,
            ContinuousRandomVariable::Exp { lambda: 0.1 },
            true,
        )],
        routes: vec![RouteConfig::through("customer", &[0])],
        route_weights: vec![1.0],
        horizon: None,
        max_admissions: Some(10),
        store_records: true,
    };
    let mut simulation = Simulation::post(Network::new(config)?, 3);
    let mut departures = 0;
    while let Some(event) = simulation.step()? {
        let lengths = simulation.model().queue_lengths(0);
        assert_eq!(lengths.len(), 2);
        assert!((lengths[0] as i64 - lengths[1] as i64).abs() <= 1);
        assert!(simulation.model().busy_servers(0) <= 2);
        if let EventKind::Departure(_) = event.kind() {
            departures += 1;
        }
    }
    assert_eq!(departures, 10);
    let report = simulation.report();
    assert_eq!(report.completed, 10);
    // Every burst arrival happened at time zero
    assert!(simulation
        .model()
        .records()
        .iter()
        .filter(|record| record.action == "Arrival")
        .all(|record| record.time == 0.0));
    Ok(())
}

#[test]
fn parallel_queues_with_jockeying() -> Result<(), SimulationError> {
    init_logging();
    let config = NetworkConfig::parallel_queues(1.0, 0.5, 3, 20000);
    let report = run_checked(config, 42)?;
    assert!(report.jockey_moves > 0);
    assert_eq!(report.completed, 20000);
    let tellers = &report.stations[0];
    assert!(tellers.average_queue_length_per_queue <= tellers.average_queue_length);
    // Per-server queues with jockeying come close to the shared-queue M/M/3
    let shared = mmk(1.0, 0.5, 3)?;
    assert!(tellers.average_delay >= 0.8 * shared.average_delay);
    assert_sane(&report);
    Ok(())
}

#[test]
fn runs_are_reproducible() -> Result<(), SimulationError> {
    let first = Simulation::post(
        Network::new(NetworkConfig::cafeteria(&CafeteriaLayout::default()))?,
        101,
    )
    .run()?;
    let second = Simulation::post(
        Network::new(NetworkConfig::cafeteria(&CafeteriaLayout::default()))?,
        101,
    )
    .run()?;
    assert_eq!(first, second);
    let other_seed = Simulation::post(
        Network::new(NetworkConfig::cafeteria(&CafeteriaLayout::default()))?,
        102,
    )
    .run()?;
    assert_ne!(first, other_seed);
    Ok(())
}

#[test]
fn cafeteria_lunch_period() -> Result<(), SimulationError> {
    init_logging();
    for layout in CafeteriaLayout::alternatives() {
        let report = run_checked(NetworkConfig::cafeteria(&layout), 101)?;
        assert_eq!(report.total_time, 5400.0);
        assert!(report.admitted > 0);
        let drinks = report.station("drinks").ok_or(SimulationError::PrerequisiteCalcError)?;
        assert_eq!(drinks.utilization, None);
        assert_eq!(drinks.average_delay, 0.0);
        let cash = report.station("cash").ok_or(SimulationError::PrerequisiteCalcError)?;
        assert_eq!(cash.servers, Some(layout.registers));
        assert!(cash.served > 0);
        assert!(report.weighted_average_delay >= 0.0);
        assert_eq!(report.jockey_moves, 0);
        assert_sane(&report);
    }
    Ok(())
}

#[test]
fn horizon_discards_pending_events() -> Result<(), SimulationError> {
    let mut simulation = Simulation::post(Network::new(NetworkConfig::job_shop())?, 5);
    simulation.step_until(4.0)?;
    assert!(simulation.get_global_time() <= 4.0);
    assert!(!simulation.is_finished());
    let report = simulation.run()?;
    assert!(simulation.is_finished());
    assert_eq!(report.total_time, 8.0);
    assert!(simulation.step()?.is_none());
    Ok(())
}

#[test]
fn stepping_matches_running() -> Result<(), SimulationError> {
    let config = NetworkConfig::single_queue(1.0, 1.5, 1, 500);
    let mut stepped = Simulation::post(Network::new(config.clone())?, 9);
    let first_events = stepped.step_n(10)?;
    assert_eq!(first_events.len(), 10);
    assert!(matches!(first_events[0].kind(), EventKind::Start));
    assert_eq!(stepped.events_processed(), 10);
    let stepped_report = stepped.run()?;
    let ran_report = Simulation::post(Network::new(config)?, 9).run()?;
    assert_eq!(stepped_report, ran_report);
    Ok(())
}

#[test]
fn job_shop_replications() -> Result<(), SimulationError> {
    init_logging();
    let reports = replicate(30, 1000, || Network::new(NetworkConfig::job_shop()))?;
    assert_eq!(reports.len(), 30);
    reports.iter().for_each(assert_sane);
    let average_in_system =
        IndependentSample::post(reports.iter().map(|report| report.average_in_system).collect())?;
    let interval = average_in_system.confidence_interval_mean(0.1)?;
    assert!(interval.lower() <= average_in_system.point_estimate_mean());
    assert!(average_in_system.point_estimate_mean() <= interval.upper());
    assert!(average_in_system.point_estimate_mean() > 0.0);
    reports.iter().for_each(|report| {
        assert_eq!(report.total_time, 8.0);
        let weighted: f64 = report
            .routes
            .iter()
            .zip([0.3, 0.5, 0.2].iter())
            .map(|(route, weight)| route.average_delay * weight)
            .sum();
        assert!((report.weighted_average_delay - weighted).abs() < 1e-9);
    });
    Ok(())
}
