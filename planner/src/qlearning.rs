use log::trace;
use ordered_float::OrderedFloat;
use rand::Rng;
use relief_structs::config::LearningConfig;

use crate::operators::Operator;

/// Outcome of the previous search move, as seen by the learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetaState {
    /// Table row that exists but is never visited.
    Initial = 0,
    Improved = 1,
    Stagnant = 2,
}

impl MetaState {
    pub fn index(self) -> usize {
        self as usize
    }
}

pub const NUM_STATES: usize = 3;
pub const NUM_ACTIONS: usize = Operator::ALL.len();

pub type QTable = [[f32; NUM_ACTIONS]; NUM_STATES];

/// Tabular one-step Q-learner choosing which operator to try next.
///
/// Random draws per `choose_action`: one `f64` for the epsilon test, plus one
/// action index when exploring. Greedy ties go to the lowest action index.
#[derive(Debug, Clone)]
pub struct QLearner {
    q: QTable,
    alpha: f32,
    gamma: f32,
    epsilon: f32,
    last_state: Option<MetaState>,
    last_action: Option<Operator>,
}

impl QLearner {
    pub fn new(cfg: &LearningConfig) -> Self {
        Self {
            q: [[0.0; NUM_ACTIONS]; NUM_STATES],
            alpha: cfg.alpha,
            gamma: cfg.gamma,
            epsilon: cfg.epsilon,
            last_state: None,
            last_action: None,
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q
    }

    pub fn value(&self, state: MetaState, action: Operator) -> f32 {
        self.q[state.index()][action.index()]
    }

    pub fn last_state(&self) -> Option<MetaState> {
        self.last_state
    }

    pub fn last_action(&self) -> Option<Operator> {
        self.last_action
    }

    pub fn best_action(&self, state: MetaState) -> Operator {
        let row = &self.q[state.index()];
        let mut best = Operator::ALL[0];
        for op in Operator::ALL.iter().skip(1) {
            if row[op.index()] > row[best.index()] {
                best = *op;
            }
        }
        best
    }

    pub fn choose_action<R: Rng>(&mut self, state: MetaState, rng: &mut R) -> Operator {
        let action = if rng.gen::<f64>() < self.epsilon as f64 {
            Operator::ALL[rng.gen_range(0..NUM_ACTIONS)]
        } else {
            self.best_action(state)
        };
        self.last_action = Some(action);
        action
    }

    /// Updates the retained (state, action) pair, then moves to `next_state`.
    /// The first call only records the state.
    pub fn learn(&mut self, next_state: MetaState, reward: f32) {
        if let (Some(s), Some(a)) = (self.last_state, self.last_action) {
            let next_max = self.q[next_state.index()]
                .iter()
                .copied()
                .map(OrderedFloat)
                .max()
                .map(|x| x.0)
                .unwrap_or(0.0);

            let old = self.q[s.index()][a.index()];
            let new = old + self.alpha * (reward + self.gamma * next_max - old);
            self.q[s.index()][a.index()] = new;
            trace!("Q[{:?}, {:?}] {:.4} -> {:.4}", s, a, old, new);
        }
        self.last_state = Some(next_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn greedy() -> LearningConfig {
        LearningConfig {
            epsilon: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        let mut agent = QLearner::new(&greedy());
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..20 {
            assert_eq!(agent.choose_action(MetaState::Stagnant, &mut rng), Operator::Swap);
        }
    }

    #[test]
    fn greedy_picks_the_larger_value() {
        let mut agent = QLearner::new(&greedy());
        agent.q[MetaState::Improved.index()][Operator::Substitute.index()] = 0.25;
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(agent.choose_action(MetaState::Improved, &mut rng), Operator::Substitute);
        assert_eq!(agent.choose_action(MetaState::Stagnant, &mut rng), Operator::Swap);
    }

    #[test]
    fn first_learn_only_records_state() {
        let mut agent = QLearner::new(&greedy());
        let mut rng = SmallRng::seed_from_u64(0);
        agent.choose_action(MetaState::Stagnant, &mut rng);
        agent.learn(MetaState::Improved, 1.0);
        assert_eq!(agent.q_table(), &[[0.0; 2]; 3]);
        assert_eq!(agent.last_state(), Some(MetaState::Improved));
    }

    #[test]
    fn one_step_update() {
        let mut agent = QLearner::new(&greedy());
        let mut rng = SmallRng::seed_from_u64(0);

        agent.choose_action(MetaState::Stagnant, &mut rng);
        agent.learn(MetaState::Stagnant, 0.0);

        // Q[2, swap] += 0.5 * (1 + 0.9 * 0 - 0) = 0.5
        let a = agent.choose_action(MetaState::Stagnant, &mut rng);
        assert_eq!(a, Operator::Swap);
        agent.learn(MetaState::Improved, 1.0);
        assert!((agent.value(MetaState::Stagnant, Operator::Swap) - 0.5).abs() < 1e-6);

        // Q[1, swap] += 0.5 * (0 + 0.9 * 0.5 - 0) = 0.225
        agent.choose_action(MetaState::Improved, &mut rng);
        agent.learn(MetaState::Stagnant, 0.0);
        assert!((agent.value(MetaState::Improved, Operator::Swap) - 0.225).abs() < 1e-6);

        assert_eq!(agent.value(MetaState::Initial, Operator::Swap), 0.0);
        assert_eq!(agent.value(MetaState::Initial, Operator::Substitute), 0.0);
    }

    #[test]
    fn full_exploration_tries_both_actions() {
        let mut agent = QLearner::new(&LearningConfig {
            epsilon: 1.0,
            ..Default::default()
        });
        let mut rng = SmallRng::seed_from_u64(5);
        let mut seen = [false; NUM_ACTIONS];
        for _ in 0..100 {
            seen[agent.choose_action(MetaState::Stagnant, &mut rng).index()] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn repeated_reward_raises_value() {
        let mut agent = QLearner::new(&greedy());
        let mut rng = SmallRng::seed_from_u64(0);
        agent.learn(MetaState::Improved, 0.0);
        let mut prev = 0.0;
        for _ in 0..10 {
            agent.choose_action(MetaState::Improved, &mut rng);
            agent.learn(MetaState::Improved, 1.0);
            let v = agent.value(MetaState::Improved, Operator::Swap);
            assert!(v > prev);
            prev = v;
        }
        // Bounded by 1 / (1 - gamma)
        assert!(prev < 10.0);
    }
}
