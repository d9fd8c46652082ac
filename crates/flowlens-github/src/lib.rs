//! # Flowlens GitHub
//!
//! The two GitHub REST fetches behind the `WorkflowSource` seam:
//! the Actions workflow list (enabled/disabled state) and the raw
//! definition files under `.github/workflows` at the default branch tip.

pub mod source;

pub use source::GithubSource;
