//! arena — headless run of one swarm preset.
//!
//! ```text
//! arena [PRESET] [TRIALS] [OUTPUT_CSV]
//! arena sort 3 output/sort.csv
//! ```
//!
//! Runs the preset with its default controller for `TRIALS` trials, prints
//! the averaged metric every sample, and writes every sample to the CSV file.
//! `RUST_LOG` controls logging (default `info`).

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use swarm_analysis::{Analyzer, SeriesCsvWriter};
use swarm_core::{ObjectKind, ScenarioConfig};
use swarm_sim::{SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_PRESET: &str = "simple_cluster";
const DEFAULT_TRIALS: u32  = 1;
const MAX_STEP:       u64  = 2_000;
const SEED:           u64  = 42;

// ── Observer wrapper to count ticks and status changes ───────────────────────

struct CountingObserver {
    inner:    Analyzer,
    ticks:    u64,
    statuses: usize,
}

impl SimObserver for CountingObserver {
    fn on_tick_end(&mut self, step: swarm_core::Tick) {
        self.ticks += 1;
        self.inner.on_tick_end(step);
    }

    fn on_sample(&mut self, view: &swarm_sim::WorldView<'_>) {
        self.inner.on_sample(view);
    }

    fn on_reset(&mut self, trial: u32) {
        self.inner.on_reset(trial);
    }

    fn on_status(&mut self, message: &str) {
        self.statuses += 1;
        tracing::info!(message, "controller status");
    }

    fn on_sim_end(&mut self, final_step: swarm_core::Tick) {
        self.inner.on_sim_end(final_step);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();

    let mut args = std::env::args().skip(1);
    let preset_name = args.next().unwrap_or_else(|| DEFAULT_PRESET.to_string());
    let trials: u32 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("bad trial count {s:?}"))?,
        None => DEFAULT_TRIALS,
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("output/{preset_name}.csv")));

    // 1. Scenario.
    let mut config = ScenarioConfig::from_preset_name(&preset_name)?;
    config.max_step = MAX_STEP;
    config.seed = SEED;
    config.do_analysis = true;
    config.reset_after_max_step = trials > 1;
    config.max_trials = trials.saturating_sub(1);

    println!("=== arena — {} ===", config.preset);
    println!(
        "Robots: {}  |  Pucks: {} red, {} green  |  Steps: {}  |  Trials: {}",
        config.n_robots, config.n_red_pucks, config.n_green_pucks, config.max_step, trials
    );
    println!();

    // 2. Sim.
    let mut sim = SimBuilder::headless(config).build()?;
    println!("Controller: {}", sim.controller_kind());

    // 3. Output.
    if let Some(dir) = output.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let writer = SeriesCsvWriter::new(&output)?;
    let analyzer = Analyzer::for_preset(sim.config.preset).with_writer(writer);
    let mut obs = CountingObserver { inner: analyzer, ticks: 0, statuses: 0 };

    // 4. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  ticks           : {}", obs.ticks);
    println!("  status changes  : {}", obs.statuses);
    println!("  last status     : {}", sim.status_message());
    println!("  samples written : {}", output.display());
    println!();

    let metric = obs.inner.metric();
    println!("{:<10} {:<12}", "Step", metric.title());
    println!("{}", "-".repeat(24));
    for (step, average) in obs.inner.series().averages() {
        println!("{step:<10} {average:<12.2}");
    }
    println!();
    println!(
        "Final world: {} robots, {} red pucks, {} green pucks",
        sim.robots().len(),
        sim.puck_count(ObjectKind::RedPuck),
        sim.puck_count(ObjectKind::GreenPuck),
    );

    Ok(())
}
