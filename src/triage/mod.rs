//! Analysis stages and the pipeline that runs them.
//!
//! - [`packed`]: packed/unpacked verdict from section statistics
//! - [`behavior`]: rule-based alerts over a sandbox behavior report
//! - [`score`]: trust score and risk level
//! - [`report`], [`iocs`]: metrics and indicators read from reports
//! - [`scanners`]: YARA and ssdeep output parsing
//! - [`api`]: the [`Analyzer`] pipeline

pub mod api;
pub mod behavior;
pub mod config;
pub mod iocs;
pub mod packed;
pub mod report;
pub mod scanners;
pub mod score;

pub use api::{Analyzer, ExternalFindings};
pub use config::AnalysisConfig;
