//! Image freshness checks
//!
//! For each container: parse the image reference, resolve `latest` (and the
//! container's own tag when needed), then compare digests.

mod checker;
pub mod compare;
mod types;

pub use checker::FreshnessChecker;
pub use compare::{decide, Comparison, Decision};
pub use types::{CheckResult, ContainerObservation, Verdict};
