//! Deadlock Analyzer
//!
//! One-shot static deadlock detection over a snapshot of resource
//! allocation state, in two modes:
//!
//! - **single**: every resource type has at most one unit. The result also
//!   carries a resource-allocation graph for rendering.
//! - **multi**: resource types have several units; processes declare their
//!   maximum demand and are reduced Banker's-style.
//!
//! ```
//! use deadlock_analyzer::detection::{detect, Mode, RawMatrices, SystemState};
//!
//! let raw = RawMatrices {
//!     allocated: vec![vec![1, 0], vec![0, 1]],
//!     requested: vec![vec![0, 1], vec![1, 0]],
//!     available: vec![0, 0],
//!     ..Default::default()
//! };
//! let state = SystemState::from_raw(raw, Mode::Single, 2, 2).unwrap();
//! let result = detect(&state);
//! assert_eq!(result.deadlocked_processes, vec![0, 1]);
//! ```

#![allow(clippy::missing_safety_doc)]

pub mod analysis;
pub mod config;
pub mod detection;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod rest_api;
pub mod scenario;

pub use analysis::{Analyzer, DetectionReport};
pub use config::DetectorConfig;
pub use detection::{detect, validate, DetectionResult, Mode, SystemState};
pub use error::{Error, Result};
pub use scenario::Scenario;
