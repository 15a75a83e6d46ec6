// Input Validation
//
// The precondition layer in front of the reduction engine. Checks run in a
// fixed order and the first failure wins.
use super::types::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Matrices as entered by the user. A matrix that does not belong to the
/// mode is left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatrices {
    #[serde(default)]
    pub max: Matrix,
    #[serde(default)]
    pub allocated: Matrix,
    #[serde(default)]
    pub requested: Matrix,
    #[serde(default)]
    pub available: ResourceVector,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Number of processes and resources must be positive (processes: {processes}, resources: {resources})")]
    EmptyDimensions { processes: usize, resources: usize },

    #[error("{matrix} matrix dimensions ({rows}x{cols}) do not match specified processes ({processes}) and resources ({resources})")]
    MatrixShape {
        matrix: MatrixKind,
        rows: usize,
        cols: usize,
        processes: usize,
        resources: usize,
    },

    #[error("Available vector length ({len}) does not match specified resources ({resources})")]
    AvailableLength { len: usize, resources: usize },

    #[error("{matrix} matrix is not allowed in {mode} mode")]
    UnexpectedMatrix { matrix: MatrixKind, mode: Mode },

    #[error("Negative value in {matrix} matrix at P{process}, R{resource} (found {value})")]
    NegativeValue {
        matrix: MatrixKind,
        process: usize,
        resource: usize,
        value: Units,
    },

    #[error("Negative value in available vector for R{resource} (found {value})")]
    NegativeAvailable { resource: usize, value: Units },

    #[error("In single mode, {matrix} values must be 0 or 1 (found {value} at P{process}, R{resource})")]
    NotSingleUnit {
        matrix: MatrixKind,
        process: usize,
        resource: usize,
        value: Units,
    },

    #[error("In single mode, available values must be 0 or 1 (found {value} for R{resource})")]
    AvailableNotSingleUnit { resource: usize, value: Units },

    #[error("In single mode, the sum of allocated and available instances for R{resource} must not exceed 1 (found allocated: {allocated}, available: {available})")]
    InstanceOverflow {
        resource: usize,
        allocated: Units,
        available: Units,
    },
}

impl ValidationError {
    /// The `(process, resource)` cell the failure points at, if any.
    pub fn cell(&self) -> Option<(usize, usize)> {
        match self {
            ValidationError::NegativeValue { process, resource, .. }
            | ValidationError::NotSingleUnit { process, resource, .. } => {
                Some((*process, *resource))
            }
            _ => None,
        }
    }

    /// The resource column the failure points at, if any.
    pub fn resource(&self) -> Option<usize> {
        match self {
            ValidationError::NegativeValue { resource, .. }
            | ValidationError::NotSingleUnit { resource, .. }
            | ValidationError::NegativeAvailable { resource, .. }
            | ValidationError::AvailableNotSingleUnit { resource, .. }
            | ValidationError::InstanceOverflow { resource, .. } => Some(*resource),
            _ => None,
        }
    }
}

/// Check `raw` against the invariants of `mode` for `processes x resources`.
///
/// No cross-check between Allocation and Max is made in multi mode.
pub fn validate(
    raw: &RawMatrices,
    mode: Mode,
    processes: usize,
    resources: usize,
) -> Result<(), ValidationError> {
    if processes == 0 || resources == 0 {
        return Err(ValidationError::EmptyDimensions { processes, resources });
    }

    let (demand_kind, demand, stray_kind, stray) = match mode {
        Mode::Single => (MatrixKind::Request, &raw.requested, MatrixKind::Max, &raw.max),
        Mode::Multi => (MatrixKind::Max, &raw.max, MatrixKind::Request, &raw.requested),
    };

    check_shape(MatrixKind::Allocation, &raw.allocated, processes, resources)?;
    check_shape(demand_kind, demand, processes, resources)?;
    if raw.available.len() != resources {
        return Err(ValidationError::AvailableLength {
            len: raw.available.len(),
            resources,
        });
    }
    if !stray.is_empty() {
        return Err(ValidationError::UnexpectedMatrix {
            matrix: stray_kind,
            mode,
        });
    }

    // Same scan order as the matrices are read: max, allocated, requested, available
    if mode == Mode::Multi {
        check_non_negative(MatrixKind::Max, &raw.max)?;
    }
    check_non_negative(MatrixKind::Allocation, &raw.allocated)?;
    if mode == Mode::Single {
        check_non_negative(MatrixKind::Request, &raw.requested)?;
    }
    if let Some((resource, &value)) = raw.available.iter().enumerate().find(|(_, v)| **v < 0) {
        return Err(ValidationError::NegativeAvailable { resource, value });
    }

    if mode == Mode::Single {
        check_single_unit(MatrixKind::Request, &raw.requested)?;
        check_single_unit(MatrixKind::Allocation, &raw.allocated)?;
        if let Some((resource, &value)) = raw.available.iter().enumerate().find(|(_, v)| **v > 1) {
            return Err(ValidationError::AvailableNotSingleUnit { resource, value });
        }
        for (resource, &available) in raw.available.iter().enumerate() {
            let allocated: Units = raw.allocated.iter().map(|row| row[resource]).sum();
            if allocated + available > 1 {
                return Err(ValidationError::InstanceOverflow {
                    resource,
                    allocated,
                    available,
                });
            }
        }
    }

    Ok(())
}

fn check_shape(
    matrix: MatrixKind,
    rows: &Matrix,
    processes: usize,
    resources: usize,
) -> Result<(), ValidationError> {
    let bad_cols = if rows.len() != processes {
        Some(rows.first().map_or(0, Vec::len))
    } else {
        rows.iter().map(Vec::len).find(|&len| len != resources)
    };

    match bad_cols {
        Some(cols) => Err(ValidationError::MatrixShape {
            matrix,
            rows: rows.len(),
            cols,
            processes,
            resources,
        }),
        None => Ok(()),
    }
}

fn check_non_negative(matrix: MatrixKind, rows: &Matrix) -> Result<(), ValidationError> {
    match find_cell(rows, |v| v < 0) {
        Some((process, resource, value)) => Err(ValidationError::NegativeValue {
            matrix,
            process,
            resource,
            value,
        }),
        None => Ok(()),
    }
}

fn check_single_unit(matrix: MatrixKind, rows: &Matrix) -> Result<(), ValidationError> {
    match find_cell(rows, |v| v > 1) {
        Some((process, resource, value)) => Err(ValidationError::NotSingleUnit {
            matrix,
            process,
            resource,
            value,
        }),
        None => Ok(()),
    }
}

fn find_cell(rows: &Matrix, pred: impl Fn(Units) -> bool) -> Option<(usize, usize, Units)> {
    rows.iter().enumerate().find_map(|(i, row)| {
        row.iter()
            .enumerate()
            .find(|(_, v)| pred(**v))
            .map(|(j, v)| (i, j, *v))
    })
}

impl SystemState {
    /// Validate `raw` and take ownership of the matrices the mode needs.
    pub fn from_raw(
        raw: RawMatrices,
        mode: Mode,
        processes: usize,
        resources: usize,
    ) -> Result<Self, ValidationError> {
        validate(&raw, mode, processes, resources)?;

        let demand = match mode {
            Mode::Single => Demand::SingleInstance { request: raw.requested },
            Mode::Multi => Demand::MultiInstance { max: raw.max },
        };

        Ok(SystemState {
            processes,
            resources,
            allocation: raw.allocated,
            available: raw.available,
            demand,
        })
    }

    /// Hand the matrices back in raw form, leaving the other mode's matrix empty.
    pub fn to_raw(&self) -> RawMatrices {
        let (max, requested) = match &self.demand {
            Demand::SingleInstance { request } => (Vec::new(), request.clone()),
            Demand::MultiInstance { max } => (max.clone(), Vec::new()),
        };
        RawMatrices {
            max,
            allocated: self.allocation.clone(),
            requested,
            available: self.available.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(allocated: Matrix, requested: Matrix, available: ResourceVector) -> RawMatrices {
        RawMatrices {
            allocated,
            requested,
            available,
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_valid_single_state() {
        let raw = single(vec![vec![1, 0], vec![0, 1]], vec![vec![0, 1], vec![1, 0]], vec![0, 0]);
        assert_eq!(validate(&raw, Mode::Single, 2, 2), Ok(()));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let raw = RawMatrices::default();
        assert_eq!(
            validate(&raw, Mode::Multi, 0, 3),
            Err(ValidationError::EmptyDimensions { processes: 0, resources: 3 })
        );
    }

    #[test]
    fn test_rejects_ragged_allocation() {
        let raw = single(vec![vec![0, 0], vec![0]], vec![vec![0, 0], vec![0, 0]], vec![0, 0]);
        let err = validate(&raw, Mode::Single, 2, 2).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MatrixShape {
                matrix: MatrixKind::Allocation,
                rows: 2,
                cols: 1,
                processes: 2,
                resources: 2,
            }
        );
    }

    #[test]
    fn test_rejects_stray_matrix() {
        let mut raw = single(vec![vec![0]], vec![vec![0]], vec![1]);
        raw.max = vec![vec![1]];
        assert_eq!(
            validate(&raw, Mode::Single, 1, 1),
            Err(ValidationError::UnexpectedMatrix {
                matrix: MatrixKind::Max,
                mode: Mode::Single,
            })
        );
    }

    #[test]
    fn test_shape_checked_before_values() {
        let raw = single(vec![vec![-1]], vec![], vec![0]);
        let err = validate(&raw, Mode::Single, 1, 1).unwrap_err();
        assert!(matches!(err, ValidationError::MatrixShape { matrix: MatrixKind::Request, .. }));
    }

    #[test]
    fn test_negative_cell_is_pinpointed() {
        let raw = RawMatrices {
            max: vec![vec![3, 2], vec![1, -4]],
            allocated: vec![vec![0, 0], vec![0, 0]],
            available: vec![1, 1],
            ..Default::default()
        };
        let err = validate(&raw, Mode::Multi, 2, 2).unwrap_err();
        assert_eq!(err.cell(), Some((1, 1)));
        assert_eq!(err.to_string(), "Negative value in max matrix at P1, R1 (found -4)");
    }

    #[test]
    fn test_single_mode_rejects_two() {
        let raw = single(vec![vec![0, 0]], vec![vec![0, 2]], vec![0, 0]);
        let err = validate(&raw, Mode::Single, 1, 2).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotSingleUnit {
                matrix: MatrixKind::Request,
                process: 0,
                resource: 1,
                value: 2,
            }
        );
        assert_eq!(
            err.to_string(),
            "In single mode, requested values must be 0 or 1 (found 2 at P0, R1)"
        );
    }

    #[test]
    fn test_multi_mode_accepts_large_values() {
        let raw = RawMatrices {
            max: vec![vec![7, 5]],
            allocated: vec![vec![9, 2]],
            available: vec![3, 3],
            ..Default::default()
        };
        assert!(validate(&raw, Mode::Multi, 1, 2).is_ok());
    }

    #[test]
    fn test_single_mode_rejects_column_overflow() {
        let raw = single(vec![vec![1], vec![0]], vec![vec![0], vec![1]], vec![1]);
        assert_eq!(
            validate(&raw, Mode::Single, 2, 1),
            Err(ValidationError::InstanceOverflow {
                resource: 0,
                allocated: 1,
                available: 1,
            })
        );
    }

    #[test]
    fn test_from_raw_round_trips() {
        let raw = single(vec![vec![1], vec![0]], vec![vec![0], vec![1]], vec![0]);
        let state = SystemState::from_raw(raw.clone(), Mode::Single, 2, 1).unwrap();
        assert_eq!(state.mode(), Mode::Single);
        assert_eq!(state.to_raw(), raw);
    }
}
