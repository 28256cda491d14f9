// Copyright 2025 bakri (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/mod.rs
//!
//! Core binding model
//!
//! This module contains the data structures and pure algorithms the rest
//! of the engine builds on:
//! - Binding, profile and config types
//! - Conflict detection over signatures
//! - Hotkey notation parsing and formatting
//! - Binding and profile validation
//!
//! Nothing in here touches the OS, threads, or the filesystem, so every
//! piece can be unit tested without a desktop session.

pub mod actions;
pub mod conflict;
pub mod parser;
pub mod settings;
pub mod types;
pub mod validator;

pub use conflict::{detect_conflicts, get_conflicting_bindings, has_conflict, Conflict, ConflictDetector};
pub use settings::{Config, CursorDetectionSettings, PlaybackSettings, WindowSettings};
pub use types::*;
pub use validator::{validate_binding, ValidationError};

#[cfg(test)]
mod tests;
