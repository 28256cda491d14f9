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

//! Global input hook abstraction
//!
//! The platform layer implements `InputHook` on top of its low-level
//! keyboard/mouse hook. The callback it receives returns `()`: there is no
//! way for the engine to mark an event as handled, so every event keeps
//! propagating to whichever application would have received it anyway.

use thiserror::Error;

use crate::core::{VK_XBUTTON1, VK_XBUTTON2};

/// Errors from installing the OS hook
#[derive(Debug, Error, PartialEq)]
pub enum HookError {
    /// The OS refused to install the hook
    #[error("Failed to install input hook: {0}")]
    InstallFailed(String),

    /// The hook is already owned by another engine
    #[error("Input hook already in use")]
    AlreadyInstalled,
}

/// Mouse buttons reported by the hook
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// First side button (usually "back")
    X1,
    /// Second side button (usually "forward")
    X2,
}

impl MouseButton {
    /// Virtual key code for side buttons; `None` for buttons the engine ignores.
    pub fn side_button_key(self) -> Option<u32> {
        match self {
            MouseButton::X1 => Some(VK_XBUTTON1),
            MouseButton::X2 => Some(VK_XBUTTON2),
            MouseButton::Left | MouseButton::Right | MouseButton::Middle => None,
        }
    }
}

/// Raw press events delivered on the hook thread
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RawInput {
    /// Keyboard key down (virtual key code)
    KeyDown(u32),
    /// Mouse button down
    MouseDown(MouseButton),
}

/// Callback invoked on the hook thread for every raw press.
pub type HookCallback = Box<dyn Fn(RawInput) + Send + Sync>;

/// An OS-level global input hook
pub trait InputHook {
    /// Installs the hook, routing every raw press to `callback`.
    fn install(&mut self, callback: HookCallback) -> Result<(), HookError>;

    /// Removes the hook. Must be safe to call when not installed.
    fn uninstall(&mut self);
}

/// A hook that never delivers input, for embeddings without global hotkeys.
pub struct NullHook;

impl InputHook for NullHook {
    fn install(&mut self, _callback: HookCallback) -> Result<(), HookError> {
        Ok(())
    }

    fn uninstall(&mut self) {}
}
