use std::collections::BTreeMap;

use relief_structs::{
    config::Weights,
    plan::Plan,
    problem::Scenario,
    report::{Breakdown, Fitness},
    Point, RiskZone, TargetId, UnitId,
};
use tinyvec::TinyVec;

use crate::error::SearchError;

pub type Route = TinyVec<[TargetId; 16]>;

const RISK_PENALTY: f32 = 10.0;

/// Each unit's targets in the order the unit appears in the plan.
pub fn unit_routes(plan: &Plan) -> BTreeMap<UnitId, Route> {
    let mut routes: BTreeMap<UnitId, Route> = BTreeMap::new();
    for step in plan.steps.iter() {
        routes.entry(step.unit_id).or_default().push(step.target_id);
    }
    routes
}

/// Exposure of the straight leg `p1 -> p2`, sampled at its midpoint.
pub fn risk_exposure(p1: &Point, p2: &Point, zones: &[RiskZone]) -> f32 {
    let mid = p1.midpoint(p2);
    zones
        .iter()
        .filter_map(|z| {
            let d = mid.dist(&z.center);
            (d < z.radius).then(|| (z.radius - d) * RISK_PENALTY)
        })
        .sum()
}

/// Fails if a step names a target the scenario does not contain.
pub fn breakdown(plan: &Plan, scenario: &Scenario) -> Result<Breakdown, SearchError> {
    #[cfg(feature = "prof")]
    let _p = hprof::enter("evaluate");

    let time = plan.total_cost();
    let mut distance = 0.0;
    let mut risk = 0.0;

    for (_unit, route) in unit_routes(plan) {
        let mut curr = scenario.base;
        for target in route {
            let next = scenario
                .target_loc(target)
                .ok_or(SearchError::UnknownTarget { id: target })?;
            distance += curr.dist(&next);
            risk += risk_exposure(&curr, &next, &scenario.risk_zones);
            curr = next;
        }
        distance += curr.dist(&scenario.base);
    }

    Ok(Breakdown {
        distance,
        time,
        risk,
    })
}

pub fn score(b: &Breakdown, weights: &Weights) -> f32 {
    weights.distance * b.distance + weights.time * b.time + weights.risk * b.risk
}

pub fn evaluate(plan: &Plan, scenario: &Scenario, weights: &Weights) -> Result<Fitness, SearchError> {
    let breakdown = breakdown(plan, scenario)?;
    Ok(Fitness {
        score: score(&breakdown, weights),
        breakdown,
    })
}
