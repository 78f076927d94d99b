use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Capability, Point, RiskZone, Stage, Target, TargetId, UnitId};

/// Read-only scenario data. Target ids are positive and unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub base: Point,
    pub targets: Vec<Target>,
    pub risk_zones: Vec<RiskZone>,
}

impl Scenario {
    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }

    pub fn target_ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.targets.iter().map(|t| t.id)
    }

    pub fn target_loc(&self, id: TargetId) -> Option<Point> {
        self.targets.iter().find(|t| t.id == id).map(|t| t.loc)
    }

    /// First target id that is zero or already used by an earlier target.
    pub fn bad_target_id(&self) -> Option<TargetId> {
        let mut seen = BTreeSet::new();
        self.target_ids().find(|id| *id == 0 || !seen.insert(*id))
    }
}

/// Static unit registry together with the stage -> capability map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Fleet {
    pub units: BTreeMap<Capability, Vec<UnitId>>,
    pub stage_capability: [Capability; 3],
}

impl Default for Fleet {
    fn default() -> Self {
        Self {
            units: BTreeMap::from([
                (Capability::Search, vec![0, 1]),
                (Capability::Cargo, vec![2, 3]),
            ]),
            stage_capability: [Capability::Search, Capability::Cargo, Capability::Search],
        }
    }
}

impl Fleet {
    pub fn required_capability(&self, stage: Stage) -> Capability {
        self.stage_capability[stage.index()]
    }

    /// Units able to perform `stage`. Empty if the registry lacks the class.
    pub fn units_for(&self, stage: Stage) -> &[UnitId] {
        self.units
            .get(&self.required_capability(stage))
            .map(|u| u.as_slice())
            .unwrap_or(&[])
    }

    pub fn can_perform(&self, unit: UnitId, stage: Stage) -> bool {
        self.units_for(stage).contains(&unit)
    }

    pub fn all_units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.values().flatten().copied()
    }

    pub fn num_units(&self) -> usize {
        self.units.values().map(|u| u.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fleet_capabilities() {
        let fleet = Fleet::default();
        assert_eq!(fleet.units_for(Stage::Locate), &[0, 1]);
        assert_eq!(fleet.units_for(Stage::Deliver), &[2, 3]);
        assert_eq!(fleet.units_for(Stage::Assess), &[0, 1]);
        assert!(fleet.can_perform(1, Stage::Assess));
        assert!(!fleet.can_perform(2, Stage::Locate));
        assert!(!fleet.can_perform(0, Stage::Deliver));
        assert_eq!(fleet.num_units(), 4);
    }

    #[test]
    fn target_lookup_by_id() {
        let scenario = Scenario {
            base: Point::ORIGIN,
            targets: vec![
                Target { id: 1, loc: Point::new(1.0, 2.0) },
                Target { id: 2, loc: Point::new(3.0, 4.0) },
            ],
            risk_zones: vec![],
        };
        assert_eq!(scenario.target_loc(2), Some(Point::new(3.0, 4.0)));
        assert_eq!(scenario.target_loc(3), None);
        assert_eq!(scenario.target_ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(scenario.bad_target_id(), None);
    }

    #[test]
    fn sparse_ids_are_looked_up_by_id() {
        let mut scenario = Scenario {
            base: Point::ORIGIN,
            targets: vec![
                Target { id: 7, loc: Point::new(1.0, 2.0) },
                Target { id: 2, loc: Point::new(3.0, 4.0) },
            ],
            risk_zones: vec![],
        };
        assert_eq!(scenario.target_loc(7), Some(Point::new(1.0, 2.0)));
        assert_eq!(scenario.target_loc(2), Some(Point::new(3.0, 4.0)));
        assert_eq!(scenario.bad_target_id(), None);

        scenario.targets.push(Target { id: 2, loc: Point::ORIGIN });
        assert_eq!(scenario.bad_target_id(), Some(2));
        scenario.targets[2].id = 0;
        assert_eq!(scenario.bad_target_id(), Some(0));
    }
}
