pub mod config;
pub mod error;
pub mod fault;
pub mod memory;
pub mod page;
pub mod policy;
pub mod reference;
pub mod report;
pub mod simulation;
pub mod tracker;

use config::{Config, Parameters};
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use memory::MemoryStore;
use policy::Algorithm;
use rand::rngs::StdRng;
use rand::SeedableRng;
use report::{Summary, Table};
use simulation::{RunReport, Simulation};

/// Build the initial RAM and swap for a seed. Every algorithm of a comparison starts from a copy
/// of this snapshot.
pub fn prepare_snapshot(params: &Parameters, seed: u64) -> MemoryStore {
    MemoryStore::initialize(params, &mut StdRng::seed_from_u64(seed))
}

/// Run each algorithm, in order, on its own copy of `snapshot` and the same reference stream.
///
/// # Errors
///
/// Stops at the first run that fails and returns its error.
pub fn compare(
    params: &Parameters,
    algorithms: &[Algorithm],
    snapshot: &MemoryStore,
    seed: u64,
    progress: &ProgressBar,
) -> Result<Vec<RunReport>> {
    let mut reports = Vec::with_capacity(algorithms.len());
    for &algorithm in algorithms {
        progress.set_message(algorithm.to_string());
        reports.push(Simulation::build(params, algorithm, snapshot, seed).run()?);
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(reports)
}

pub fn run_simulation(config: Config) -> Result<()> {
    let params = config.parameters();
    let algorithms = config.algorithms();
    let seed = config.seed();
    println!("seed: {}", seed);

    let snapshot = prepare_snapshot(&params, seed);
    println!("\n--- INITIAL STATE ---");
    println!("{}", Table::ram("RAM", snapshot.ram()));
    println!(
        "{}",
        Table::swap("SWAP", snapshot.swap(), !config.full_swap)
    );

    let progress = ProgressBar::new(algorithms.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}") {
        progress.set_style(style);
    }
    let reports = compare(&params, &algorithms, &snapshot, seed, &progress)?;

    for report in &reports {
        println!("\n##################################################");
        println!("ALGORITHM: {}", report.algorithm);
        println!("##################################################");
        println!("{}", report.tracker);
        println!(
            "{}",
            Table::ram(format!("FINAL RAM {}", report.algorithm), report.store.ram())
        );
        println!(
            "{}",
            Table::swap(
                format!("FINAL SWAP {}", report.algorithm),
                report.store.swap(),
                !config.full_swap
            )
        );
    }
    println!("{}", Summary(&reports));
    Ok(())
}
