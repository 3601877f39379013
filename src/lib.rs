//! Risk assessment for binary artifacts.
//!
//! Combines byte entropy, normalized PE header metadata, a packed-binary
//! heuristic, rule-based alerts over sandbox behavior reports and an
//! optional ML risk score into an [`core::AnalysisSummary`] carrying a
//! 0-100 trust score and a risk level.

/// Core data types module
pub mod core;
/// Byte entropy
pub mod entropy;
/// Error types
pub mod error;
/// Content hashing
pub mod hashing;
/// Tracing setup and macros
pub mod logging;
/// External ML scorer contract and fallback
pub mod ml;
/// PE header providers and normalization
pub mod pe;
/// String extraction and static indicators
pub mod strings;
/// Deadlines for collaborator calls
pub mod timeout;
/// Analysis stages and pipeline
pub mod triage;

pub use error::{Result, TrustScanError};
pub use triage::{AnalysisConfig, Analyzer, ExternalFindings};
