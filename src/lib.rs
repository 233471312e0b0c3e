//! imgfresh - Container image freshness checker
//!
//! Lists the containers on a host and reports, for each one, whether the
//! image it runs is the one its registry currently publishes as `latest`.

pub mod cli;
pub mod config;
pub mod error;
pub mod freshness;
pub mod orchestration;
pub mod reference;
pub mod registry;
pub mod report;
pub mod ui;

pub use error::{ImgfreshError, ImgfreshResult};
