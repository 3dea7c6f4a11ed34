use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use crate::agent::Species;
use crate::config::ecology::EcologyParams;
use crate::config::simulation::SimulationConfig;
use crate::export::{render_ascii, RecordWriter};
use crate::simulation::statistics::{compute_statistics, PopulationStatistics};
use crate::simulation::Simulation;

/// Run one simulation to completion, streaming tick records to `output_path`.
pub fn run_simulation(config: &SimulationConfig, ecology: &EcologyParams) -> Result<(), String> {
    let mut sim = Simulation::new(ecology, config)
        .map_err(|e| format!("Failed to seed population: {}", e))?;
    eprintln!(
        "Run {} (seed {}): {} agents on a {}x{} grid",
        sim.run_id(),
        sim.seed(),
        sim.population().len(),
        ecology.map_size,
        ecology.map_size
    );

    let output = Path::new(&config.output_path);
    let mut writer = RecordWriter::create(output)
        .map_err(|e| format!("Cannot open {}: {}", output.display(), e))?;

    let mut last: Option<PopulationStatistics> = None;
    while sim.is_running() {
        let result = sim
            .tick()
            .map_err(|e| format!("Tick {} failed: {}", sim.tick_count() + 1, e))?;
        writer
            .write_tick(sim.tick_count() - 1, &sim.agents())
            .map_err(|e| format!("Cannot write tick records: {}", e))?;
        last = Some(result.statistics);
    }

    let records = writer
        .finish()
        .map_err(|e| format!("Cannot flush {}: {}", output.display(), e))?;
    info!(
        ticks = sim.tick_count(),
        records,
        path = %output.display(),
        "Run complete"
    );

    if let Some(stats) = last {
        println!("{}", stats.summary_line());
    }
    eprintln!(
        "Simulation stopped at tick {}; {} records written to {}",
        sim.tick_count(),
        records,
        output.display()
    );
    Ok(())
}

/// Final state of one batch replicate.
#[derive(Debug, Clone)]
pub struct ReplicateOutcome {
    pub replicate: usize,
    pub seed: u64,
    pub statistics: PopulationStatistics,
}

/// Run `replicates` independently seeded simulations in parallel.
///
/// Replicate `i` uses `base_seed + i`; a base seed of 0 is drawn at random.
pub fn run_batch(
    config: &SimulationConfig,
    ecology: &EcologyParams,
    replicates: usize,
) -> Result<Vec<ReplicateOutcome>, String> {
    let base_seed = if config.seed == 0 {
        rand::random::<u64>().max(1)
    } else {
        config.seed
    };
    info!(replicates, base_seed, "Starting batch");

    (0..replicates)
        .into_par_iter()
        .map(|replicate| -> Result<ReplicateOutcome, String> {
            let replicate_config = SimulationConfig {
                seed: base_seed.wrapping_add(replicate as u64),
                ..config.clone()
            };
            let mut sim = Simulation::new(ecology, &replicate_config)
                .map_err(|e| format!("Replicate {}: {}", replicate, e))?;
            let catches = {
                let mut total = 0;
                sim.run(|_, result| total += result.catches.len() as u32)
                    .map_err(|e| format!("Replicate {}: {}", replicate, e))?;
                total
            };
            let statistics = compute_statistics(sim.tick_count(), sim.population(), catches, 0.0);
            Ok(ReplicateOutcome {
                replicate,
                seed: sim.seed(),
                statistics,
            })
        })
        .collect()
}

pub fn print_batch(outcomes: &[ReplicateOutcome]) {
    println!(
        "{:>9} {:>20} {:>6} {:>9} {:>9} {:>6} {:>8}",
        "Replicate", "Seed", "Ticks", "Fish", "Penguins", "Seals", "Catches"
    );
    println!("{}", "-".repeat(73));
    for o in outcomes {
        let s = &o.statistics;
        println!(
            "{:>9} {:>20} {:>6} {:>9} {:>9} {:>6} {:>8}",
            o.replicate,
            o.seed,
            s.tick,
            format!("{}/{}", s.live(Species::Fish), s.registered(Species::Fish)),
            format!("{}/{}", s.live(Species::Penguin), s.registered(Species::Penguin)),
            s.registered(Species::Seal),
            s.catches
        );
    }
}

/// Run a short simulation and return an ASCII frame of its final state.
pub fn preview(
    config: &SimulationConfig,
    ecology: &EcologyParams,
    cell: usize,
) -> Result<String, String> {
    let mut sim = Simulation::new(ecology, config)
        .map_err(|e| format!("Failed to seed population: {}", e))?;
    let mut catches = 0;
    sim.run(|_, result| catches += result.catches.len() as u32)
        .map_err(|e| format!("Simulation error: {}", e))?;

    let stats = compute_statistics(sim.tick_count(), sim.population(), catches, 0.0);
    let mut frame = render_ascii(sim.world(), &sim.agents(), cell);
    frame.push_str(&stats.summary_line());
    frame.push('\n');
    Ok(frame)
}
