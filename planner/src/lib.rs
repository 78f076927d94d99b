use log::info;
use rand::Rng;
use relief_structs::{
    config::Config,
    problem::Scenario,
    report::{PlanSummary, Report},
};

pub mod construct;
pub mod error;
pub mod objective;
pub mod operators;
pub mod qlearning;
pub mod search;
pub mod validate;


use error::SearchError;
use search::Search;

/// Builds a random feasible plan for `scenario` and improves it for
/// `config.search.iterations` iterations, drawing everything from `rng`.
pub fn solve<R: Rng>(scenario: &Scenario, config: &Config, rng: &mut R) -> Result<Report, SearchError> {
    config.validate()?;

    let initial_plan =
        construct::random_feasible_plan(scenario, &config.fleet, config.search.cost_range, rng)?;
    let initial_fitness = objective::evaluate(&initial_plan, scenario, &config.weights)?;
    info!(
        "initial plan: score {:.2} (distance {:.2}, time {:.2}, risk {:.2})",
        initial_fitness.score,
        initial_fitness.breakdown.distance,
        initial_fitness.breakdown.time,
        initial_fitness.breakdown.risk
    );

    let initial = PlanSummary {
        fitness: initial_fitness,
        plan: initial_plan.clone(),
    };

    let mut search = Search::new(
        scenario,
        &config.fleet,
        config.weights,
        &config.learning,
        initial_plan,
    )?;
    search.run(config.search.iterations, config.search.progress_interval, rng)?;

    let q_table = *search.learner().q_table();
    let operators = search.operator_reports();
    let iterations = search.iterations();
    let (plan, fitness) = search.into_plan();
    info!("final plan: score {:.2}", fitness.score);

    Ok(Report {
        seed: config.seed,
        iterations,
        initial,
        best: PlanSummary { fitness, plan },
        q_table,
        operators,
    })
}
