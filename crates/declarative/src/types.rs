//! Core types for declarative resource management

use crate::error::Diagnostic;
use serde::{Serialize, Serializer};

/// A config-side value: known, explicitly null, or not yet computed.
///
/// `Unknown` is what a planned attribute looks like before the remote
/// round trip that produces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Tristate<T> {
    /// Value is set
    Known(T),
    /// Value is explicitly absent
    #[default]
    Null,
    /// Value will only be known after apply
    Unknown,
}

impl<T> Tristate<T> {
    /// Check if the value is known
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if the value is unknown
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Borrow the value if known
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Take the value if known
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Tristate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }
}

impl From<&str> for Tristate<String> {
    fn from(value: &str) -> Self {
        Self::Known(value.to_string())
    }
}

/// Known values serialize as themselves; null and unknown as `null`.
impl<T: Serialize> Serialize for Tristate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(v) => v.serialize(serializer),
            Self::Null | Self::Unknown => serializer.serialize_none(),
        }
    }
}

/// Result of running one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TaskOutcome {
    /// Remote record was deleted
    Deleted,
    /// Remote record was read
    Read,
    /// Remote record no longer exists
    Gone,
    /// Task failed
    Failed { diagnostic: Diagnostic },
}

impl TaskOutcome {
    /// Check if the outcome represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecuteSummary {
    pub deleted: usize,
    pub read: usize,
    pub gone: usize,
    pub failed: usize,
    /// Task id and diagnostic of every failure, in completion order
    pub failures: Vec<(String, Diagnostic)>,
}

impl ExecuteSummary {
    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of tasks processed
    pub fn total(&self) -> usize {
        self.deleted + self.read + self.gone + self.failed
    }

    /// Add an outcome to the summary
    pub fn add_outcome(&mut self, id: &str, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Deleted => self.deleted += 1,
            TaskOutcome::Read => self.read += 1,
            TaskOutcome::Gone => self.gone += 1,
            TaskOutcome::Failed { diagnostic } => {
                self.failed += 1;
                self.failures.push((id.to_string(), diagnostic.clone()));
            }
        }
    }
}

/// Options for execution
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Number of parallel jobs
    pub jobs: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { jobs: 4 }
    }
}
