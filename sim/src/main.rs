use anyhow::Context;
use log::info;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use relief_planner::qlearning::MetaState;
use relief_structs::config::Config;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut json = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            s if s.starts_with("--") => anyhow::bail!("unknown flag {}", s),
            _ if config_path.is_none() => config_path = Some(arg),
            _ => anyhow::bail!("unexpected argument {}", arg),
        }
    }

    let mut config = match &config_path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config from {}", path))?,
        None => Config::default(),
    };

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("seed {}", seed);
    config.seed = Some(seed);

    let mut rng = SmallRng::seed_from_u64(seed);
    let scenario = relief_sim::generate_scenario(&config.scenario, &mut rng);
    let report = relief_planner::solve(&scenario, &config, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("seed: {}", seed);
    println!(
        "targets: {}  storms: {}  iterations: {}",
        scenario.num_targets(),
        scenario.risk_zones.len(),
        report.iterations
    );
    println!();
    println!(
        "initial score: {:.2}  (distance {:.2}, time {:.2}, risk {:.2})",
        report.initial.fitness.score,
        report.initial.fitness.breakdown.distance,
        report.initial.fitness.breakdown.time,
        report.initial.fitness.breakdown.risk
    );
    println!(
        "final score:   {:.2}  (distance {:.2}, time {:.2}, risk {:.2})",
        report.best.fitness.score,
        report.best.fitness.breakdown.distance,
        report.best.fitness.breakdown.time,
        report.best.fitness.breakdown.risk
    );
    println!("improvement:   {:.2}%", report.improvement_percent());
    println!();

    for op in report.operators.iter() {
        println!(
            "{:<10} calls {:>5}  failed {:>5}  rejected {:>5}  improved {:>4}",
            op.name, op.calls, op.failures, op.rejections, op.improvements
        );
    }
    println!();

    for (label, state) in [("improved", MetaState::Improved), ("stagnant", MetaState::Stagnant)] {
        let row = report.q_table[state.index()];
        println!(
            "Q[{}]: swap {:.3}  substitute {:.3}",
            label, row[0], row[1]
        );
    }
    println!();
    println!("{}", report.best.plan);

    Ok(())
}
