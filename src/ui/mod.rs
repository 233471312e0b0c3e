//! Terminal feedback for interactive runs
//!
//! Uses `cliclack` spinners and log lines when stderr is a terminal and
//! falls back to plain tagged lines in CI. Everything here writes to stderr
//! so stdout carries only the report.
//!
//! # Example
//!
//! ```rust,ignore
//! use imgfresh::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect();
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Listing containers...");
//! // ... do work ...
//! spinner.stop("Found 4 containers");
//!
//! ui::step_warn_hint(&ctx, "Config already exists", "Use --force to overwrite");
//! ```

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{step_ok, step_ok_detail, step_warn_hint};
pub use progress::TaskSpinner;
