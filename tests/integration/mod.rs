//! Integration test modules.

mod planner_persistence_test;
mod session_invariants_test;
