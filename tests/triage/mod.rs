//! Integration tests for the analysis pipeline.
//!
//! These tests validate the stages end-to-end and focus on integration
//! between components rather than isolated unit testing.

mod config_io;
mod deadline;
mod pe_object;
mod reports;
mod scenarios;
