//! One-shot analysis of a scenario: limits, validation, reduction.

use crate::config::LimitsConfig;
use crate::detection::{self, report, DetectionResult, Mode, SystemState};
use crate::error::Result;
use crate::scenario::Scenario;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// A detection result plus run metadata, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    pub run_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub mode: Mode,
    pub processes: usize,
    pub resources: usize,
    pub summary: String,
    pub result: DetectionResult,
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    limits: LimitsConfig,
}

impl Analyzer {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Limit-check and validate a scenario.
    pub fn prepare(&self, scenario: &Scenario) -> Result<SystemState> {
        self.limits
            .check_dimensions(scenario.processes(), scenario.resources())?;
        scenario.to_state().map_err(|e| {
            warn!(error = %e, "rejected scenario");
            e
        })
    }

    /// Limit-check and validate without building a state or running detection.
    pub fn validate(&self, scenario: &Scenario) -> Result<()> {
        self.limits
            .check_dimensions(scenario.processes(), scenario.resources())?;
        detection::validate(
            &scenario.raw(),
            scenario.mode,
            scenario.processes(),
            scenario.resources(),
        )?;
        Ok(())
    }

    pub fn analyze(&self, scenario: &Scenario) -> Result<DetectionReport> {
        let state = self.prepare(scenario)?;
        Ok(self.analyze_state(&state))
    }

    pub fn analyze_json(&self, json: &str) -> Result<DetectionReport> {
        self.analyze(&Scenario::from_json(json)?)
    }

    pub fn analyze_state(&self, state: &SystemState) -> DetectionReport {
        let run_id = Uuid::new_v4();
        debug!(%run_id, mode = %state.mode(), "analyzing system state");

        let result = detection::detect(state);
        DetectionReport {
            run_id,
            analyzed_at: Utc::now(),
            mode: state.mode(),
            processes: state.processes(),
            resources: state.resources(),
            summary: report::summary(&result),
            result,
        }
    }

    /// Zero-filled scenario, subject to the same limits as analysis.
    pub fn template(&self, mode: Mode, processes: usize, resources: usize) -> Result<Scenario> {
        self.limits.check_dimensions(processes, resources)?;
        let scenario = Scenario::blank(mode, processes, resources);
        detection::validate(&scenario.raw(), mode, processes, resources)?;
        Ok(scenario)
    }
}
