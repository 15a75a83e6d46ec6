// Text rendering of detection results
use super::types::*;
use std::fmt::Write;

pub fn summary(result: &DetectionResult) -> String {
    if result.is_deadlock {
        format!(
            "Deadlock Detected! Processes {} are in a deadlock.",
            process_list(&result.deadlocked_processes)
        )
    } else {
        "No Deadlock. The system is in a safe state.".to_string()
    }
}

pub fn timeline(result: &DetectionResult) -> String {
    let need_label = match result.mode {
        Mode::Single => "Request",
        Mode::Multi => "Need",
    };

    let mut out = String::new();
    for (n, step) in result.steps.iter().enumerate() {
        let _ = writeln!(out, "Step {} - Process P{}", n + 1, step.process);
        let _ = writeln!(out, "  {}: {}", need_label, resource_row(&step.need));
        let _ = writeln!(out, "  Allocated: {}", resource_row(&step.allocation));
        let _ = writeln!(out, "  Before Available: {}", resource_row(&step.available_before));
        let _ = writeln!(out, "  After Available: {}", resource_row(&step.available_after));
        let _ = writeln!(out, "  {}", step.description());
    }
    out
}

/// Summary followed by the step timeline.
pub fn render(result: &DetectionResult) -> String {
    let mut out = summary(result);
    out.push('\n');
    if !result.steps.is_empty() {
        out.push('\n');
        out.push_str(&timeline(result));
    }
    out
}

pub fn process_list(processes: &[usize]) -> String {
    processes
        .iter()
        .map(|p| format!("P{}", p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `R0: 1 | R1: 0`
pub fn resource_row(values: &[Units]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(j, v)| format!("R{}: {}", j, v))
        .collect::<Vec<_>>()
        .join(" | ")
}
