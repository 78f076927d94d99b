use std::{io::Write, time::Instant};

use rand::{rngs::SmallRng, SeedableRng};
use relief_structs::config::Config;
use serde::Serialize;

const SEEDS: u64 = 20;

#[derive(Debug, Serialize)]
struct Row {
    seed: u64,
    time: f32,
    initial: f32,
    best: f32,
    improvement: f32,
    swap_improved: usize,
    substitute_improved: usize,
}

pub fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut config = Config::default();
    if let Some(path) = std::env::args().nth(1) {
        config = Config::load_from_file(&path)?;
    }

    println!("-----------------------------");
    println!("relief planner benchmarking");
    println!("-----------------------------");
    println!();
    println!(
        "  targets: {}, storms: {}, iterations: {}",
        config.scenario.num_targets, config.scenario.num_risk_zones, config.search.iterations
    );
    println!();

    println!("# RUNNING {} SEEDS", SEEDS);
    let mut rows = Vec::new();
    for seed in 0..SEEDS {
        #[cfg(feature = "prof")]
        let _p = hprof::enter("instance");

        config.seed = Some(seed);
        let mut rng = SmallRng::seed_from_u64(seed);
        let scenario = relief_sim::generate_scenario(&config.scenario, &mut rng);

        let t0 = Instant::now();
        let report = relief_planner::solve(&scenario, &config, &mut rng)?;
        let time = t0.elapsed().as_secs_f32();

        let improved = |name: &str| {
            report
                .operators
                .iter()
                .find(|o| o.name == name)
                .map(|o| o.improvements)
                .unwrap_or(0)
        };
        println!(" * seed {} solved in {:.3}s", seed, time);
        rows.push(Row {
            seed,
            time,
            initial: report.initial.fitness.score,
            best: report.best.fitness.score,
            improvement: report.improvement_percent(),
            swap_improved: improved("swap"),
            substitute_improved: improved("substitute"),
        });
    }
    println!();

    #[cfg(feature = "prof")]
    {
        println!("# PROFILER");
        hprof::profiler().print_timing();
        println!();
    }

    println!("# RESULTS");
    let mut tablewriter = tabwriter::TabWriter::new(Vec::new());
    writeln!(&mut tablewriter, "seed\ttime\tinitial\tbest\timpr%\tswap\tsubst")?;
    writeln!(&mut tablewriter, "---\t---\t---\t---\t---\t---\t---")?;
    for r in rows.iter() {
        writeln!(
            &mut tablewriter,
            "{}\t{:.3}\t{:.2}\t{:.2}\t{:.1}\t{}\t{}",
            r.seed, r.time, r.initial, r.best, r.improvement, r.swap_improved, r.substitute_improved
        )?;
    }
    let mean = rows.iter().map(|r| r.improvement).sum::<f32>() / rows.len().max(1) as f32;
    writeln!(&mut tablewriter, "mean\t\t\t\t{:.1}\t\t", mean)?;
    let table = tablewriter
        .into_inner()
        .map_err(|e| anyhow::anyhow!("table: {}", e.error()))?;
    let written = String::from_utf8(table)?;
    println!("{}", written);

    let mut csv = csv::Writer::from_path("benchmark.csv")?;
    for r in rows.iter() {
        csv.serialize(r)?;
    }
    csv.flush()?;
    println!("wrote benchmark.csv");

    Ok(())
}
