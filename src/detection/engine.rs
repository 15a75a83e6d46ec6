// Reduction Engine
//
// Work-vector reduction (the Banker's safety check) used as a deadlock
// detector. Pure: every run owns its Work and Finish vectors.
use super::graph::ResourceAllocationGraph;
use super::types::*;
use tracing::{debug, info};

pub struct ReductionEngine;

impl ReductionEngine {
    pub fn detect(state: &SystemState) -> DetectionResult {
        let processes = state.processes();
        let mut work = state.available().clone();
        let mut finish = vec![false; processes];
        let mut steps = Vec::with_capacity(processes);
        let mut passes = 0;

        loop {
            passes += 1;
            let mut progress = false;

            for i in 0..processes {
                if finish[i] {
                    continue;
                }

                let need = state.need(i);
                if !Self::satisfiable(&need, &work) {
                    continue;
                }

                let allocation = &state.allocation()[i];
                let available_before = work.clone();
                // Need never exceeds i64::MAX, so a saturated Work still satisfies it.
                for (w, a) in work.iter_mut().zip(allocation) {
                    *w = w.saturating_add(*a);
                }

                debug!(process = i, ?need, ?work, "process can proceed and release resources");

                finish[i] = true;
                progress = true;
                steps.push(ReductionStep {
                    process: i,
                    need,
                    allocation: allocation.clone(),
                    available_before,
                    available_after: work.clone(),
                });
            }

            if !progress || steps.len() == processes {
                break;
            }
        }

        let deadlocked_processes: Vec<usize> = finish
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(i, _)| i)
            .collect();
        let is_deadlock = !deadlocked_processes.is_empty();

        let graph = match state.demand() {
            Demand::SingleInstance { .. } => Some(ResourceAllocationGraph::from_state(state, &finish)),
            Demand::MultiInstance { .. } => None,
        };

        info!(
            mode = %state.mode(),
            processes,
            passes,
            is_deadlock,
            deadlocked = ?deadlocked_processes,
            "deadlock detection finished"
        );

        DetectionResult {
            mode: state.mode(),
            is_deadlock,
            deadlocked_processes,
            steps,
            work,
            passes,
            graph,
        }
    }

    /// A negative Need component is always satisfiable.
    fn satisfiable(need: &[Units], work: &[Units]) -> bool {
        need.iter().zip(work).all(|(n, w)| n <= w)
    }
}

/// Run the reduction over `state`. The mode is the tag of `state.demand()`.
pub fn detect(state: &SystemState) -> DetectionResult {
    ReductionEngine::detect(state)
}
