//! # Flowlens Engine
//!
//! The data-aggregation core: join the workflow list with the raw
//! definition files, cache the composed mapping per repository with a
//! stale-while-revalidate policy, and resolve per-workflow indicators.
//!
//! ## Architecture
//! ```text
//! WorkflowSource (list + definitions, fetched concurrently)
//!   └── aggregate: strict intersection by filename
//!         └── FreshnessCache: 1 day fresh / +10 days stale-while-revalidate
//!               ├── SnapshotStore: best-effort JSON persistence
//!               └── IndicatorService: (repo, row) → disabled / dispatchable / next run
//! ```

pub mod aggregate;
pub mod cache;
pub mod resolve;
pub mod service;
pub mod store;

pub use aggregate::aggregate;
pub use cache::FreshnessCache;
pub use resolve::resolve_indicators;
pub use service::IndicatorService;
pub use store::SnapshotStore;
