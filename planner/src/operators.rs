use log::trace;
use rand::{seq::SliceRandom, Rng};
use relief_structs::{plan::Plan, problem::Fleet};

use crate::{error::SearchError, validate};

/// Mutation operators. Both read the current plan and build a fresh candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// Exchange two whole steps, then re-validate.
    Swap = 0,
    /// Reassign one step to another unit of the required capability.
    Substitute = 1,
}

impl Operator {
    pub const ALL: [Operator; 2] = [Operator::Swap, Operator::Substitute];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Operator> {
        Self::ALL.get(idx).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Swap => "swap",
            Operator::Substitute => "substitute",
        }
    }

    /// `Ok(None)` is a rejected candidate, not an error.
    pub fn apply<R: Rng>(
        self,
        plan: &Plan,
        fleet: &Fleet,
        rng: &mut R,
    ) -> Result<Option<Plan>, SearchError> {
        match self {
            Operator::Swap => swap(plan, fleet, rng),
            Operator::Substitute => substitute(plan, fleet, rng).map(Some),
        }
    }
}

pub fn swap<R: Rng>(plan: &Plan, fleet: &Fleet, rng: &mut R) -> Result<Option<Plan>, SearchError> {
    let n = plan.len();
    if n < 2 {
        return Err(SearchError::PlanTooShort { len: n });
    }

    let idxs = rand::seq::index::sample(rng, n, 2);
    let (i, j) = (idxs.index(0), idxs.index(1));

    let mut candidate = plan.clone();
    candidate.steps.swap(i, j);

    if validate::is_valid(&candidate, fleet) {
        Ok(Some(candidate))
    } else {
        trace!("swap {} <-> {} broke the plan", i, j);
        Ok(None)
    }
}

/// Never re-validates: the replacement is drawn from the capability pool of the
/// step's stage, and the draw may return the unit already assigned.
pub fn substitute<R: Rng>(plan: &Plan, fleet: &Fleet, rng: &mut R) -> Result<Plan, SearchError> {
    if plan.is_empty() {
        return Err(SearchError::EmptyPlan);
    }

    let idx = rng.gen_range(0..plan.len());
    let stage = plan.steps[idx].stage();

    let mut candidate = plan.clone();
    if let Some(unit) = fleet.units_for(stage).choose(rng) {
        candidate.steps[idx].unit_id = *unit;
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};
    use relief_structs::{plan::Step, Stage};

    fn two_target_plan() -> Plan {
        Plan::new(vec![
            Step::new(1, Stage::Locate, 0, 11.0),
            Step::new(2, Stage::Locate, 1, 12.0),
            Step::new(1, Stage::Deliver, 2, 13.0),
            Step::new(2, Stage::Deliver, 3, 14.0),
            Step::new(1, Stage::Assess, 0, 15.0),
            Step::new(2, Stage::Assess, 1, 16.0),
        ])
    }

    fn sorted_steps(plan: &Plan) -> Vec<(u32, u32, u32)> {
        let mut v = plan
            .steps
            .iter()
            .map(|s| (s.task_id.0, s.unit_id, s.cost.to_bits()))
            .collect::<Vec<_>>();
        v.sort();
        v
    }

    #[test]
    fn swap_preserves_step_multiset_or_fails() {
        let fleet = Fleet::default();
        let plan = two_target_plan();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut produced = 0;
        let mut failed = 0;
        for _ in 0..500 {
            match swap(&plan, &fleet, &mut rng).unwrap() {
                Some(c) => {
                    produced += 1;
                    assert_eq!(c.len(), plan.len());
                    assert_eq!(sorted_steps(&c), sorted_steps(&plan));
                    assert!(validate::is_valid(&c, &fleet));
                    assert_ne!(c, plan);
                }
                None => failed += 1,
            }
        }
        // Swapping the two Locate steps is always legal, most other pairs are not.
        assert!(produced > 0);
        assert!(failed > 0);
    }

    #[test]
    fn swap_leaves_input_untouched() {
        let plan = two_target_plan();
        let before = plan.clone();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..50 {
            let _ = swap(&plan, &Fleet::default(), &mut rng);
        }
        assert_eq!(plan, before);
    }

    #[test]
    fn swap_needs_two_steps() {
        let plan = Plan::new(vec![Step::new(1, Stage::Locate, 0, 10.0)]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            swap(&plan, &Fleet::default(), &mut rng),
            Err(SearchError::PlanTooShort { len: 1 })
        );
        assert_eq!(
            Operator::Swap.apply(&Plan::default(), &Fleet::default(), &mut rng),
            Err(SearchError::PlanTooShort { len: 0 })
        );
    }

    #[test]
    fn substitute_keeps_capability_and_other_fields() {
        let fleet = Fleet::default();
        let plan = two_target_plan();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let c = substitute(&plan, &fleet, &mut rng).unwrap();
            assert_eq!(c.len(), plan.len());
            let changed = plan
                .steps
                .iter()
                .zip(c.steps.iter())
                .filter(|(a, b)| a != b)
                .collect::<Vec<_>>();
            assert!(changed.len() <= 1);
            for (old, new) in changed {
                assert_eq!(old.task_id, new.task_id);
                assert_eq!(old.target_id, new.target_id);
                assert_eq!(old.cost, new.cost);
                assert!(fleet.can_perform(new.unit_id, new.stage()));
            }
            assert!(validate::is_valid(&c, &fleet));
        }
    }

    #[test]
    fn substitute_always_produces_a_candidate() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let out = Operator::Substitute
                .apply(&two_target_plan(), &Fleet::default(), &mut rng)
                .unwrap();
            assert!(out.is_some());
        }
    }

    #[test]
    fn substitute_rejects_empty_plan() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            substitute(&Plan::default(), &Fleet::default(), &mut rng),
            Err(SearchError::EmptyPlan)
        );
    }

    #[test]
    fn operator_indices() {
        assert_eq!(Operator::from_index(0), Some(Operator::Swap));
        assert_eq!(Operator::from_index(1), Some(Operator::Substitute));
        assert_eq!(Operator::from_index(2), None);
        assert_eq!(Operator::Substitute.index(), 1);
    }
}
