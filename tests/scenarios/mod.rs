//! Scenario-based tests for pipeline-tool

mod concurrent_group;
