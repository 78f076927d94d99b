use serde::{Deserialize, Serialize};

use crate::{Stage, TargetId, TaskId, UnitId};

/// One task assignment. `cost` is the time spent on the task.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Step {
    pub task_id: TaskId,
    pub unit_id: UnitId,
    pub cost: f32,
    pub target_id: TargetId,
}

impl Step {
    pub fn new(target_id: TargetId, stage: Stage, unit_id: UnitId, cost: f32) -> Self {
        Self {
            task_id: TaskId::new(target_id, stage),
            unit_id,
            cost,
            target_id,
        }
    }

    pub fn stage(&self) -> Stage {
        self.task_id.stage()
    }
}

/// Steps in global execution order. Each unit's route is the subsequence of
/// steps assigned to it.
#[derive(Debug, Clone, PartialEq, Default)]
#[derive(Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_cost(&self) -> f32 {
        self.steps.iter().map(|s| s.cost).sum()
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, s) in self.steps.iter().enumerate() {
            writeln!(
                f,
                "{:>3}: {} target {} {:?} by unit {} ({:.1})",
                i,
                s.task_id,
                s.target_id,
                s.stage(),
                s.unit_id,
                s.cost
            )?;
        }
        Ok(())
    }
}
