use serde::{Deserialize, Serialize};

use crate::plan::Plan;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Breakdown {
    pub distance: f32,
    pub time: f32,
    pub risk: f32,
}

/// Weighted-sum score together with the objectives it was built from. Lower is better.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Fitness {
    pub score: f32,
    pub breakdown: Breakdown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct OperatorReport {
    pub name: String,
    pub calls: usize,
    pub failures: usize,
    pub rejections: usize,
    pub improvements: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlanSummary {
    pub fitness: Fitness,
    pub plan: Plan,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Report {
    pub seed: Option<u64>,
    pub iterations: usize,
    pub initial: PlanSummary,
    pub best: PlanSummary,
    /// Rows are meta-states (initial, improved, stagnant), columns are operators.
    pub q_table: [[f32; 2]; 3],
    pub operators: Vec<OperatorReport>,
}

impl Report {
    pub fn improvement_percent(&self) -> f32 {
        let initial = self.initial.fitness.score;
        if initial == 0.0 {
            return 0.0;
        }
        (initial - self.best.fitness.score) / initial * 100.0
    }
}
