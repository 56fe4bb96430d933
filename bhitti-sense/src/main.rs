//! bhitti-sense daemon
//!
//! Runs the wall-sensing service against the simulated depth device and logs
//! every published distance.
//!
//! # Usage
//!
//! ```bash
//! # With default config (configs/bhitti-sense.toml if present)
//! cargo run --release
//!
//! # Custom config, interactive preset, stop after 50 clouds
//! cargo run --release -- --config my.toml --interactive --cycles 50
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::RecvTimeoutError;

use bhitti_sense::{
    BhittiConfig, Error, LocalPlaneFitter, PointCloudFeed, ServiceNotice, ServiceOptions,
    SimulatedDevice, SinkEvent, TrackerConfig, WallSensingService,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config file (default: configs/bhitti-sense.toml if it exists)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many point clouds (default: run until Ctrl-C)
    #[arg(long)]
    cycles: Option<u64>,

    /// Use the interactive preset (5×5 grid, verticality 0.04)
    #[arg(long)]
    interactive: bool,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("bhitti-sense starting");
    log::info!(
        "  Grid: {}×{} (verticality < {})",
        config.tracker.grid_u.len(),
        config.tracker.grid_v.len(),
        config.tracker.verticality_threshold
    );
    log::info!("  Offset check: {:?}", config.tracker.offset_check);
    log::info!(
        "  Simulated room: {} × {} m, {} Hz",
        config.simulation.room_size[0],
        config.simulation.room_size[1],
        config.simulation.frame_rate_hz
    );

    // Setup signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    }) {
        log::warn!("Error setting Ctrl-C handler: {}", e);
    }

    if let Err(e) = run(&config, args.cycles, running) {
        log::error!("Daemon error: {}", e);
    }

    log::info!("bhitti-sense shutdown complete");
}

/// An explicit `--config` must load; the default path falls back to defaults.
fn load_config(args: &Args) -> Result<BhittiConfig, Error> {
    let mut config = match &args.config {
        Some(path) => BhittiConfig::load(path)?,
        None => BhittiConfig::load_default().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({}), using defaults", e);
            BhittiConfig::default()
        }),
    };
    if args.interactive {
        config.tracker = TrackerConfig::interactive();
    }
    Ok(config)
}

fn run(config: &BhittiConfig, cycles: Option<u64>, running: Arc<AtomicBool>) -> Result<(), Error> {
    let device = Arc::new(SimulatedDevice::new(config.simulation.clone())?);
    let (event_tx, event_rx) = crossbeam_channel::unbounded::<SinkEvent>();

    let mut service = WallSensingService::connect(
        ServiceOptions::from_config(config),
        device.clone(),
        Box::new(LocalPlaneFitter::new(config.fitter.clone())),
        Box::new(event_tx),
    )?;

    let sensor_done = Arc::new(AtomicBool::new(false));
    let sensor = {
        let feed = service.feed();
        let device = Arc::clone(&device);
        let running = Arc::clone(&running);
        let done = Arc::clone(&sensor_done);
        thread::Builder::new()
            .name("depth-sim".into())
            .spawn(move || {
                run_sensor_loop(&device, &feed, cycles, &running);
                done.store(true, Ordering::Relaxed);
            })
            .map_err(|source| Error::ThreadSpawn {
                name: "depth-sim",
                source,
            })?
    };

    while running.load(Ordering::Relaxed) {
        match event_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(SinkEvent::Measurement(m)) => match m.distance {
                Some(d) => log::info!("t={:.2}s  wall distance {:.3} m", m.timestamp, d),
                None => log::info!("t={:.2}s  no wall", m.timestamp),
            },
            Ok(SinkEvent::Notice(ServiceNotice::PermissionDenied(msg))) => {
                log::warn!("Sensor permission denied: {}", msg);
            }
            Err(RecvTimeoutError::Timeout) if sensor_done.load(Ordering::Relaxed) => break,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    running.store(false, Ordering::Relaxed);
    if sensor.join().is_err() {
        log::error!("Sensor thread panicked");
    }
    service.disconnect();

    let status = service.status().read().clone();
    log::info!(
        "{} cycles: {} measured, {} without candidate, {} pose failures, {} wall replacements",
        status.cycles,
        status.measured_cycles,
        status.cycles_without_candidate,
        status.pose_failures,
        status.wall_replacements
    );
    Ok(())
}

/// Deliver one simulated cloud per frame period.
fn run_sensor_loop(
    device: &SimulatedDevice,
    feed: &PointCloudFeed,
    cycles: Option<u64>,
    running: &AtomicBool,
) {
    let period = device.frame_period();
    let mut frame = 0u64;

    while running.load(Ordering::Relaxed) && cycles.is_none_or(|n| frame < n) {
        let timestamp = frame as f64 * period.as_secs_f64();
        feed.on_point_cloud(device.capture(timestamp));
        frame += 1;
        thread::sleep(period);
    }
    log::debug!("Sensor loop delivered {} clouds", frame);
}
