//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Conflict detection tests
//! - Validation tests
//! - Type tests (Modifiers, Binding, Profile, Config resolution)
//! - Hotkey notation parser tests

#[cfg(test)]
mod types_tests;
