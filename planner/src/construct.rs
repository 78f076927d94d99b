use log::debug;
use rand::{seq::SliceRandom, Rng};
use relief_structs::{
    plan::{Plan, Step},
    problem::{Fleet, Scenario},
    Stage, TargetId,
};

use crate::error::SearchError;

/// Rounds to one decimal, the resolution task costs are quoted in.
pub fn round_cost(cost: f32) -> f32 {
    (cost * 10.0).round() / 10.0
}

/// Builds a random plan that satisfies precedence and capability by construction.
///
/// Per step the generator draws: a target from the active pool, a unit from the
/// stage's capability pool, then a cost in `[cost_range.0, cost_range.1)`.
pub fn random_feasible_plan<R: Rng>(
    scenario: &Scenario,
    fleet: &Fleet,
    cost_range: (f32, f32),
    rng: &mut R,
) -> Result<Plan, SearchError> {
    #[cfg(feature = "prof")]
    let _p = hprof::enter("construct");

    if let Some(id) = scenario.bad_target_id() {
        return Err(SearchError::BadTargetId { id });
    }

    let mut active: Vec<(TargetId, Stage)> =
        scenario.target_ids().map(|t| (t, Stage::Locate)).collect();
    let mut steps = Vec::with_capacity(active.len() * Stage::ALL.len());

    while !active.is_empty() {
        let idx = rng.gen_range(0..active.len());
        let (target, stage) = active[idx];

        let unit = *fleet
            .units_for(stage)
            .choose(rng)
            .ok_or(SearchError::NoCapableUnit { stage })?;
        let cost = round_cost(rng.gen_range(cost_range.0..cost_range.1));
        steps.push(Step::new(target, stage, unit, cost));

        match stage.next() {
            Some(next) => active[idx].1 = next,
            None => {
                active.remove(idx);
            }
        }
    }

    debug!("constructed initial plan with {} steps", steps.len());
    Ok(Plan::new(steps))
}
