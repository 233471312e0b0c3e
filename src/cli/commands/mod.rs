//! CLI command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod resolve;

pub use check::execute as check;
pub use completions::execute as completions;
pub use config::execute as config;
pub use resolve::execute as resolve;
