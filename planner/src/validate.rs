use std::collections::HashMap;

use log::trace;
use relief_structs::{plan::Plan, problem::Fleet, Stage, TargetId, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A target's stage appeared before its predecessor, or was repeated.
    OutOfOrder {
        position: usize,
        target: TargetId,
        expected: Option<Stage>,
        found: Stage,
    },
    /// The assigned unit lacks the capability the stage requires.
    IncapableUnit {
        position: usize,
        unit: UnitId,
        stage: Stage,
    },
}

/// Walks the plan once and reports the first precedence or capability violation.
/// Targets never seen before start with no completed stage.
pub fn check(plan: &Plan, fleet: &Fleet) -> Result<(), Violation> {
    let mut progress: HashMap<TargetId, Stage> = HashMap::new();

    for (position, step) in plan.steps.iter().enumerate() {
        let stage = step.stage();
        let expected = match progress.get(&step.target_id) {
            None => Some(Stage::Locate),
            Some(last) => last.next(),
        };

        if expected != Some(stage) {
            return Err(Violation::OutOfOrder {
                position,
                target: step.target_id,
                expected,
                found: stage,
            });
        }

        if !fleet.can_perform(step.unit_id, stage) {
            return Err(Violation::IncapableUnit {
                position,
                unit: step.unit_id,
                stage,
            });
        }

        progress.insert(step.target_id, stage);
    }

    Ok(())
}

pub fn is_valid(plan: &Plan, fleet: &Fleet) -> bool {
    match check(plan, fleet) {
        Ok(()) => true,
        Err(v) => {
            trace!("plan rejected: {:?}", v);
            false
        }
    }
}
