//! # Declarative
//!
//! Reconciliation engine between declarative resource configs and a REST
//! configuration API.
//!
//! A declarative tool describes records with three-valued fields (known,
//! null, not yet known). The API speaks plain JSON with optional fields.
//! This crate maps between the two and drives the remote calls.
//!
//! ## Core Concepts
//!
//! - **Config model**: a record of [`Tristate`] fields, see [`ConfigModel`]
//! - **Wire model**: the JSON record, see [`WireModel`]
//! - **Field mapper**: copies fields by name in both directions
//! - **Lifecycle**: create/read/update/delete/import for a [`ResourceType`]
//! - **Set reconciler**: diffs membership lists and applies the edges
//! - **Executor**: runs independent [`Task`]s on a thread pool
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{Lifecycle, LockRegistry, Variant, VariantContext};
//! use std::sync::Arc;
//!
//! let transport = srakit::HttpTransport::new(config)?;
//! let lifecycle = Lifecycle::new(
//!     &transport,
//!     VariantContext::new(Variant::Pra),
//!     Arc::new(LockRegistry::new()),
//! );
//!
//! let config = lifecycle.import::<JumpGroupResource>("12")?;
//! let config = lifecycle.read::<JumpGroupResource>(&config)?;
//! ```
//!
//! ## Variants
//!
//! The active product [`Variant`] is passed in through a
//! [`VariantContext`]. Resource types and single fields can be gated to
//! one variant; gated-off fields always map as absent.

pub mod client;
pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod lock;
pub mod mapper;
pub mod model;
pub mod reconcile;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use client::{Filter, ResourceClient};
pub use context::{NoProgress, ProgressCallback, Variant, VariantContext};
pub use diff::{Partition, partition};
pub use error::{Diagnostic, Error, ErrorCategory, Result};
pub use executor::{Task, execute};
pub use lock::LockRegistry;
pub use mapper::{copy_config_to_wire, copy_wire_to_config, import_config, parse_id};
pub use model::{
    ConfigField, ConfigModel, ConfigSlot, FieldKind, FieldSpec, WireField, WireModel, WireSlot,
};
pub use reconcile::{Relationship, SetReconciler};
pub use resource::{Applied, Lifecycle, ResourceType};
pub use types::{ExecuteOptions, ExecuteSummary, TaskOutcome, Tristate};
