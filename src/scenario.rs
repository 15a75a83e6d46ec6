//! Scenario interchange format
//!
//! The JSON record used to save and load a detection input:
//!
//! ```json
//! {
//!   "mode": "single",
//!   "allocated": [[1, 0], [0, 1]],
//!   "available": [0, 0],
//!   "requested": [[0, 1], [1, 0]]
//! }
//! ```
//!
//! Multi-instance scenarios carry `max` instead of `requested`.

use crate::detection::{Demand, Matrix, Mode, RawMatrices, ResourceVector, SystemState};
use crate::error::{Error, Result, ScenarioError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub mode: Mode,

    pub allocated: Matrix,

    pub available: ResourceVector,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested: Option<Matrix>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Matrix>,
}

impl Scenario {
    /// Zero-filled scenario of the given shape.
    pub fn blank(mode: Mode, processes: usize, resources: usize) -> Self {
        let zeros = vec![vec![0; resources]; processes];
        let (requested, max) = match mode {
            Mode::Single => (Some(zeros.clone()), None),
            Mode::Multi => (None, Some(zeros.clone())),
        };
        Scenario {
            mode,
            allocated: zeros,
            available: vec![0; resources],
            requested,
            max,
        }
    }

    pub fn from_state(state: &SystemState) -> Self {
        let (requested, max) = match state.demand() {
            Demand::SingleInstance { request } => (Some(request.clone()), None),
            Demand::MultiInstance { max } => (None, Some(max.clone())),
        };
        Scenario {
            mode: state.mode(),
            allocated: state.allocation().clone(),
            available: state.available().clone(),
            requested,
            max,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedScenario(ScenarioError::Json(e)))
    }

    /// Pretty-printed with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::SerializationError(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Process count, taken from the allocation matrix.
    pub fn processes(&self) -> usize {
        self.allocated.len()
    }

    /// Resource count, taken from the first allocation row.
    pub fn resources(&self) -> usize {
        self.allocated.first().map_or(0, Vec::len)
    }

    /// The matrices as raw input. The matrix that does not belong to the
    /// mode is dropped when it is empty.
    pub fn raw(&self) -> RawMatrices {
        let keep = |m: &Option<Matrix>, own: bool| match m {
            Some(m) if own || !m.is_empty() => m.clone(),
            _ => Vec::new(),
        };
        RawMatrices {
            max: keep(&self.max, self.mode == Mode::Multi),
            allocated: self.allocated.clone(),
            requested: keep(&self.requested, self.mode == Mode::Single),
            available: self.available.clone(),
        }
    }

    /// Validate and convert. Any failure is reported as a malformed scenario.
    pub fn to_state(&self) -> Result<SystemState> {
        SystemState::from_raw(self.raw(), self.mode, self.processes(), self.resources())
            .map_err(|e| Error::MalformedScenario(ScenarioError::Invalid(e)))
    }
}

impl TryFrom<Scenario> for SystemState {
    type Error = Error;

    fn try_from(scenario: Scenario) -> Result<Self> {
        scenario.to_state()
    }
}

impl From<&SystemState> for Scenario {
    fn from(state: &SystemState) -> Self {
        Scenario::from_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ValidationError;

    #[test]
    fn test_blank_scenario_is_valid() {
        let scenario = Scenario::blank(Mode::Multi, 3, 2);
        let state = scenario.to_state().unwrap();
        assert_eq!(state.processes(), 3);
        assert_eq!(state.resources(), 2);
        assert_eq!(state.mode(), Mode::Multi);
    }

    #[test]
    fn test_mode_defaults_to_single() {
        let scenario = Scenario::from_json(r#"{"allocated": [[0]], "available": [1], "requested": [[1]]}"#).unwrap();
        assert_eq!(scenario.mode, Mode::Single);
        assert!(scenario.to_state().is_ok());
    }

    #[test]
    fn test_empty_requested_ignored_in_multi_mode() {
        let json = r#"{"mode": "multi", "allocated": [[1]], "available": [0], "max": [[2]], "requested": []}"#;
        let state = Scenario::from_json(json).unwrap().to_state().unwrap();
        assert_eq!(state.mode(), Mode::Multi);
    }

    #[test]
    fn test_non_empty_stray_matrix_rejected() {
        let json = r#"{"mode": "multi", "allocated": [[1]], "available": [0], "max": [[2]], "requested": [[1]]}"#;
        let err = Scenario::from_json(json).unwrap().to_state().unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedScenario(ScenarioError::Invalid(ValidationError::UnexpectedMatrix { .. }))
        ));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = Scenario::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::MalformedScenario(ScenarioError::Json(_))));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_export_omits_other_mode_matrix() {
        let json = Scenario::blank(Mode::Single, 1, 1).to_json().unwrap();
        assert!(json.contains("\"requested\""));
        assert!(!json.contains("\"max\""));
        assert!(json.contains("\n  \"mode\": \"single\""));
    }
}
