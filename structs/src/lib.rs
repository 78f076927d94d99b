use serde::{Deserialize, Serialize};

pub mod config;
pub mod plan;
pub mod problem;
pub mod report;

pub type TargetId = u32;
pub type UnitId = u32;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dist(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn eq_xy(&self, other: &Point) -> bool {
        self.dist(other) < 1e-3
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub loc: Point,
}

/// A storm cell. Legs whose midpoint falls strictly inside `radius` are penalized.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct RiskZone {
    pub center: Point,
    pub radius: f32,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    Search,
    Cargo,
}

/// The three phases every target passes through, in this order.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Locate = 0,
    Deliver = 1,
    Assess = 2,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Locate, Stage::Deliver, Stage::Assess];
    pub const COUNT: u32 = 3;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Stage> {
        Self::ALL.get(idx).copied()
    }

    pub fn next(self) -> Option<Stage> {
        Self::from_index(self.index() + 1)
    }
}

/// Task label derived from `(target, stage)` as `(target - 1) * 3 + stage + 1`.
/// Target ids start at 1; `new` panics on 0.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TaskId(pub u32);

impl TaskId {
    pub fn new(target: TargetId, stage: Stage) -> Self {
        assert!(target >= 1, "target ids start at 1");
        TaskId((target - 1) * Stage::COUNT + stage as u32 + 1)
    }

    pub fn stage(self) -> Stage {
        match (self.0 - 1) % Stage::COUNT {
            0 => Stage::Locate,
            1 => Stage::Deliver,
            _ => Stage::Assess,
        }
    }

    pub fn target(self) -> TargetId {
        (self.0 - 1) / Stage::COUNT + 1
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.0)
    }
}
