use log::{debug, info, warn};
use rand::Rng;
use relief_structs::{
    config::{LearningConfig, Weights},
    plan::Plan,
    problem::{Fleet, Scenario},
    report::{Fitness, OperatorReport},
};

use crate::{
    error::SearchError,
    objective,
    operators::Operator,
    qlearning::{MetaState, QLearner, NUM_ACTIONS},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The operator could not produce a legal candidate.
    Failed,
    /// A candidate was produced but did not lower the score.
    Rejected,
    Improved,
}

impl MoveOutcome {
    pub fn reward(self) -> f32 {
        match self {
            MoveOutcome::Improved => 1.0,
            MoveOutcome::Failed | MoveOutcome::Rejected => 0.0,
        }
    }

    pub fn next_state(self) -> MetaState {
        match self {
            MoveOutcome::Improved => MetaState::Improved,
            MoveOutcome::Failed | MoveOutcome::Rejected => MetaState::Stagnant,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorStats {
    pub calls: usize,
    pub failures: usize,
    pub rejections: usize,
    pub improvements: usize,
}

impl OperatorStats {
    fn record(&mut self, outcome: MoveOutcome) {
        self.calls += 1;
        match outcome {
            MoveOutcome::Failed => self.failures += 1,
            MoveOutcome::Rejected => self.rejections += 1,
            MoveOutcome::Improved => self.improvements += 1,
        }
    }

    pub fn report(&self, op: Operator) -> OperatorReport {
        OperatorReport {
            name: op.name().to_string(),
            calls: self.calls,
            failures: self.failures,
            rejections: self.rejections,
            improvements: self.improvements,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Improvement {
    pub iteration: usize,
    pub operator: Operator,
    pub score: f32,
}

/// Greedy hill climbing over plans, with the operator for each move picked by a
/// [`QLearner`]. Only strictly improving candidates replace the current plan.
pub struct Search<'a> {
    scenario: &'a Scenario,
    fleet: &'a Fleet,
    weights: Weights,
    current: Plan,
    fitness: Fitness,
    learner: QLearner,
    state: MetaState,
    iterations: usize,
    stats: [OperatorStats; NUM_ACTIONS],
    improvements: Vec<Improvement>,
}

impl<'a> Search<'a> {
    pub fn new(
        scenario: &'a Scenario,
        fleet: &'a Fleet,
        weights: Weights,
        learning: &LearningConfig,
        initial: Plan,
    ) -> Result<Self, SearchError> {
        let fitness = objective::evaluate(&initial, scenario, &weights)?;
        Ok(Self {
            scenario,
            fleet,
            weights,
            current: initial,
            fitness,
            learner: QLearner::new(learning),
            state: MetaState::Stagnant,
            iterations: 0,
            stats: Default::default(),
            improvements: Vec::new(),
        })
    }

    pub fn current(&self) -> &Plan {
        &self.current
    }

    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    pub fn learner(&self) -> &QLearner {
        &self.learner
    }

    pub fn state(&self) -> MetaState {
        self.state
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn stats(&self, op: Operator) -> OperatorStats {
        self.stats[op.index()]
    }

    pub fn improvements(&self) -> &[Improvement] {
        &self.improvements
    }

    /// One iteration: choose an operator, try it, accept or reject, and feed the
    /// outcome back to the learner.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Result<MoveOutcome, SearchError> {
        let op = self.learner.choose_action(self.state, rng);

        let outcome = match op.apply(&self.current, self.fleet, rng)? {
            None => MoveOutcome::Failed,
            Some(candidate) => {
                let fitness = objective::evaluate(&candidate, self.scenario, &self.weights)?;
                if fitness.score < self.fitness.score {
                    debug!(
                        "iter {}: {} improved {:.2} -> {:.2}",
                        self.iterations,
                        op.name(),
                        self.fitness.score,
                        fitness.score
                    );
                    self.current = candidate;
                    self.fitness = fitness;
                    self.improvements.push(Improvement {
                        iteration: self.iterations,
                        operator: op,
                        score: fitness.score,
                    });
                    MoveOutcome::Improved
                } else {
                    MoveOutcome::Rejected
                }
            }
        };

        self.stats[op.index()].record(outcome);
        self.learner.learn(outcome.next_state(), outcome.reward());
        self.state = outcome.next_state();
        self.iterations += 1;
        Ok(outcome)
    }

    pub fn run<R: Rng>(
        &mut self,
        iterations: usize,
        progress_interval: usize,
        rng: &mut R,
    ) -> Result<(), SearchError> {
        #[cfg(feature = "prof")]
        let _p = hprof::enter("search");

        info!(
            "searching {} iterations from score {:.2}",
            iterations, self.fitness.score
        );
        for i in 0..iterations {
            self.step(rng)?;
            if progress_interval > 0 && (i + 1) % progress_interval == 0 {
                info!(
                    "iter {}: score {:.2} ({} improvements)",
                    i + 1,
                    self.fitness.score,
                    self.improvements.len()
                );
            }
        }

        for op in Operator::ALL {
            let s = self.stats(op);
            info!(
                "{}: {} calls, {} failed, {} rejected, {} improved",
                op.name(),
                s.calls,
                s.failures,
                s.rejections,
                s.improvements
            );
        }
        if self.improvements.is_empty() {
            warn!(
                "no improving move in {} iterations, plan left at score {:.2}",
                self.iterations, self.fitness.score
            );
        }
        Ok(())
    }

    pub fn operator_reports(&self) -> Vec<OperatorReport> {
        Operator::ALL
            .iter()
            .map(|op| self.stats(*op).report(*op))
            .collect()
    }

    pub fn into_plan(self) -> (Plan, Fitness) {
        (self.current, self.fitness)
    }
}
