//! # Flowlens Core
//!
//! Shared foundation for the Flowlens workspace: the data model for
//! composed workflow records, the error enum, configuration loading,
//! and the `WorkflowSource` trait that fetch backends implement.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::FlowlensConfig;
pub use error::{FlowlensError, Result};
pub use traits::WorkflowSource;
pub use types::{ComposedWorkflow, RepoKey, WorkflowIndicators, WorkflowSummary};
