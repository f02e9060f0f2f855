//! Variant context and provider traits
//!
//! The appliance ships as two products sharing one API. Which one we are
//! talking to decides which resource types and fields exist, so the
//! active variant is passed explicitly into every mapping and lifecycle
//! call instead of living in a global.

use crate::types::TaskOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product variant of the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Privileged Remote Access
    Pra,
    /// Remote Support
    Rs,
}

impl Variant {
    /// Lowercase short name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pra => "pra",
            Self::Rs => "rs",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pra" => Ok(Self::Pra),
            "rs" => Ok(Self::Rs),
            other => Err(format!("unknown product variant: {other}")),
        }
    }
}

/// The variant in effect for a run.
///
/// Set once before any lifecycle call and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantContext {
    variant: Variant,
}

impl VariantContext {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    /// The active variant
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Whether something gated to `gate` is visible. `None` means ungated.
    pub fn allows(&self, gate: Option<Variant>) -> bool {
        gate.is_none_or(|v| v == self.variant)
    }
}

impl Default for VariantContext {
    fn default() -> Self {
        Self::new(Variant::Pra)
    }
}

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback: Send {
    /// Called when starting a batch of tasks
    fn on_batch_start(&mut self, count: usize);

    /// Called when starting a single task
    fn on_task_start(&mut self, id: &str, description: &str);

    /// Called when a task completes
    fn on_task_complete(&mut self, id: &str, outcome: &TaskOutcome);

    /// Called when a batch completes
    fn on_batch_complete(&mut self);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&mut self, _count: usize) {}
    fn on_task_start(&mut self, _id: &str, _description: &str) {}
    fn on_task_complete(&mut self, _id: &str, _outcome: &TaskOutcome) {}
    fn on_batch_complete(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse() {
        assert_eq!("pra".parse::<Variant>().unwrap(), Variant::Pra);
        assert_eq!(" RS ".parse::<Variant>().unwrap(), Variant::Rs);
        assert!("ras".parse::<Variant>().is_err());
    }

    #[test]
    fn test_variant_display() {
        assert_eq!(Variant::Pra.to_string(), "pra");
        assert_eq!(Variant::Rs.to_string(), "rs");
    }

    #[test]
    fn test_context_allows() {
        let ctx = VariantContext::new(Variant::Rs);
        assert!(ctx.allows(None));
        assert!(ctx.allows(Some(Variant::Rs)));
        assert!(!ctx.allows(Some(Variant::Pra)));
        assert_eq!(ctx.variant(), Variant::Rs);
    }
}
