// Copyright 2025 Eric Jingryd (tidynest@proton.me)
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

//! Cursor detection
//!
//! Watches whether the tracked game has captured the cursor and reports
//! `Shown`/`Hidden` changes, which drive the auto click-through channel.

pub mod detector;
pub mod service;

pub use detector::{CursorDetector, CursorTarget, CursorVisibility};
pub use service::{
    clamp_interval, CursorChange, CursorDetectionService, CursorError, CursorSink, ServiceState, MIN_INTERVAL_MS,
};
