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

//! Overlay Hotkeys
//!
//! Global hotkey dispatch and click-through state engine for a floating
//! video overlay used while gaming.
//!
//! # Features
//!
//! - **Profile-scoped bindings:** Keyboard keys and mouse side buttons,
//!   chosen by the foreground process
//! - **Conflict Detection:** Bindings sharing a signature are reported
//! - **Observer-only hooks:** Input is never swallowed; handling is queued
//!   onto the UI context
//! - **Two-channel click-through:** User toggle and cursor detection
//!   combine without overwriting each other
//! - **Cursor detection:** Polls whether the tracked game has captured
//!   the cursor
//! - **Atomic Operations:** Config saves are backed up and written atomically
//!
//! # Architecture
//!
//! - **`core`:** Binding model, conflict detection, hotkey notation, validation
//! - **`dispatch`:** Case-insensitive action registry
//! - **`engine`:** Hotkey engine and OS collaborator traits
//! - **`mailbox`:** Hook/poller thread to UI context queue
//! - **`window`:** Click-through coordinator, opacity and playback
//! - **`cursor`:** Cursor detection service
//! - **`config`:** JSON persistence, transactions, file watching
//! - **`app`:** UI-context wiring
//!
//! # Examples
//!
//! ## Detecting conflicts
//!
//! ```
//! use overlay_hotkeys::core::{detect_conflicts, Binding, Modifiers};
//!
//! let a = Binding::keyboard(0x35, Modifiers::NONE, "SeekForward");
//! let mut b = Binding::keyboard(0x35, Modifiers::NONE, "SeekBackward");
//!
//! assert_eq!(detect_conflicts([&a, &b]).len(), 1);
//!
//! b.key = 0x36;
//! assert!(detect_conflicts([&a, &b]).is_empty());
//! ```
//!
//! ## Parsing hotkey notation
//!
//! ```
//! use overlay_hotkeys::core::parser::parse_hotkey;
//! use overlay_hotkeys::core::Modifiers;
//!
//! let signature = parse_hotkey("Ctrl+Alt+Right")?;
//! assert_eq!(signature.modifiers, Modifiers::CTRL | Modifiers::ALT);
//! # Ok::<(), overlay_hotkeys::core::parser::ParseError>(())
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod cursor;
pub mod dispatch;
pub mod engine;
pub mod logging;
pub mod mailbox;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use core::{Binding, Config, InputType, Modifiers, Profile, Signature};
