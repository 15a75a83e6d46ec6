// Detection System Types
use super::graph::ResourceAllocationGraph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of units of one resource type. Validated inputs are never negative,
/// but a multi-instance Need (`Max - Allocation`) may be.
pub type Units = i64;

/// One entry per resource type.
pub type ResourceVector = Vec<Units>;

/// `P` rows of `R` entries.
pub type Matrix = Vec<ResourceVector>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every resource type has at most one unit; deadlock is a RAG cycle.
    Single,
    /// Resource types may have several units; deadlock is a failed reduction.
    Multi,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Single
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Single => write!(f, "single"),
            Mode::Multi => write!(f, "multi"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "single-instance" => Ok(Mode::Single),
            "multi" | "multi-instance" => Ok(Mode::Multi),
            _ => Err(format!("Invalid mode: {} (expected single or multi)", s)),
        }
    }
}

/// Names the matrix a validation failure points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixKind {
    Allocation,
    Request,
    Max,
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixKind::Allocation => write!(f, "allocated"),
            MatrixKind::Request => write!(f, "requested"),
            MatrixKind::Max => write!(f, "max"),
        }
    }
}

/// The mode-specific demand matrix. Exactly one exists per state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Demand {
    SingleInstance { request: Matrix },
    MultiInstance { max: Matrix },
}

impl Demand {
    pub fn mode(&self) -> Mode {
        match self {
            Demand::SingleInstance { .. } => Mode::Single,
            Demand::MultiInstance { .. } => Mode::Multi,
        }
    }

    pub fn matrix(&self) -> &Matrix {
        match self {
            Demand::SingleInstance { request } => request,
            Demand::MultiInstance { max } => max,
        }
    }

    pub fn kind(&self) -> MatrixKind {
        match self {
            Demand::SingleInstance { .. } => MatrixKind::Request,
            Demand::MultiInstance { .. } => MatrixKind::Max,
        }
    }
}

/// A validated snapshot of allocation state for one detection run.
///
/// Only [`SystemState::from_raw`] builds one, so every instance satisfies the
/// shape and range invariants of its mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemState {
    pub(crate) processes: usize,
    pub(crate) resources: usize,
    pub(crate) allocation: Matrix,
    pub(crate) available: ResourceVector,
    pub(crate) demand: Demand,
}

impl SystemState {
    pub fn mode(&self) -> Mode {
        self.demand.mode()
    }

    pub fn processes(&self) -> usize {
        self.processes
    }

    pub fn resources(&self) -> usize {
        self.resources
    }

    pub fn allocation(&self) -> &Matrix {
        &self.allocation
    }

    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    pub fn demand(&self) -> &Demand {
        &self.demand
    }

    /// Outstanding demand of process `i`: its Request row in single mode,
    /// `Max[i] - Allocation[i]` in multi mode.
    pub fn need(&self, i: usize) -> ResourceVector {
        match &self.demand {
            Demand::SingleInstance { request } => request[i].clone(),
            Demand::MultiInstance { max } => max[i]
                .iter()
                .zip(&self.allocation[i])
                .map(|(m, a)| m - a)
                .collect(),
        }
    }
}

/// One process becoming satisfiable during reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionStep {
    pub process: usize,
    /// Need (multi) or Request (single) that was satisfied.
    pub need: ResourceVector,
    pub allocation: ResourceVector,
    pub available_before: ResourceVector,
    pub available_after: ResourceVector,
}

impl ReductionStep {
    pub fn description(&self) -> String {
        format!("Process P{} can proceed and release resources.", self.process)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub mode: Mode,
    pub is_deadlock: bool,
    /// Ascending process indices that never became satisfiable.
    pub deadlocked_processes: Vec<usize>,
    pub steps: Vec<ReductionStep>,
    /// Work vector after the last pass.
    pub work: ResourceVector,
    /// Passes over the process list the reduction executed.
    pub passes: usize,
    /// Present in single-instance mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<ResourceAllocationGraph>,
}

impl DetectionResult {
    /// Process indices in the order they finished.
    pub fn safe_sequence(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.process).collect()
    }

    pub fn is_finished(&self, process: usize) -> bool {
        self.steps.iter().any(|s| s.process == process)
    }
}

impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::report::summary(self))
    }
}
