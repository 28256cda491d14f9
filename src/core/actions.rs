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

//! Built-in action names
//!
//! Action names are plain strings and are compared case-insensitively
//! everywhere (`"ResetOpacity"`, `"resetopacity"` and `"RESETOPACITY"`
//! name the same action). The constants below are the canonical spellings
//! written to new config files.

pub const SEEK_BACKWARD: &str = "SeekBackward";
pub const SEEK_FORWARD: &str = "SeekForward";
pub const TOGGLE_PLAY: &str = "TogglePlay";
pub const INCREASE_OPACITY: &str = "IncreaseOpacity";
pub const DECREASE_OPACITY: &str = "DecreaseOpacity";
pub const RESET_OPACITY: &str = "ResetOpacity";
pub const TOGGLE_CLICK_THROUGH: &str = "ToggleClickThrough";
pub const TOGGLE_MAXIMIZE: &str = "ToggleMaximize";
pub const INCREASE_PLAYBACK_RATE: &str = "IncreasePlaybackRate";
pub const DECREASE_PLAYBACK_RATE: &str = "DecreasePlaybackRate";
pub const RESET_PLAYBACK_RATE: &str = "ResetPlaybackRate";
pub const TOGGLE_WINDOW_VISIBILITY: &str = "ToggleWindowVisibility";

/// The suspend toggle. Always reachable, even while hotkeys are suspended.
pub const SUSPEND_HOTKEYS: &str = "SuspendHotkeys";

/// Every action the dispatcher knows about from construction.
pub const BUILTIN_ACTIONS: &[&str] = &[
    SEEK_BACKWARD,
    SEEK_FORWARD,
    TOGGLE_PLAY,
    INCREASE_OPACITY,
    DECREASE_OPACITY,
    RESET_OPACITY,
    TOGGLE_CLICK_THROUGH,
    TOGGLE_MAXIMIZE,
    INCREASE_PLAYBACK_RATE,
    DECREASE_PLAYBACK_RATE,
    RESET_PLAYBACK_RATE,
    TOGGLE_WINDOW_VISIBILITY,
    SUSPEND_HOTKEYS,
];

/// Case-insensitive action name comparison.
pub fn same_action(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Returns true if `name` is one of the built-in actions (any casing).
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_ACTIONS.iter().any(|builtin| same_action(builtin, name))
}

/// Returns true if `name` is the suspend toggle (any casing).
pub fn is_suspend_action(name: &str) -> bool {
    same_action(name, SUSPEND_HOTKEYS)
}
