//! Core data types shared by the analysis stages.
//!
//! Everything here is plain owned data: analyzers take read-only views of
//! these types and return freshly built values.

pub mod alert;
pub mod artifact;
pub mod pe;
pub mod summary;
pub mod trust;

pub use alert::{Alert, Severity};
pub use artifact::BinaryArtifact;
pub use pe::{PeHeader, PeSection};
pub use summary::AnalysisSummary;
pub use trust::{RiskLevel, TrustScore};
