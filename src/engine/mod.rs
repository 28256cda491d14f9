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

//! Hotkey engine
//!
//! Turns raw global key/side-button presses into action dispatches.
//!
//! # Threading
//!
//! The OS delivers presses on its hook thread. The hook callback does the
//! minimum there: it snapshots the modifier mask, wraps the press in a
//! [`HotkeyEvent`], and posts it to the UI mailbox without waiting. All
//! resolution work (foreground process, profile, binding lookup, suspend
//! gate, text-focus check, dispatch) happens later in
//! [`HotkeyEngine::handle_event`] on the UI context, so the focus check
//! always agrees with the UI's own state.
//!
//! # Matching
//!
//! 1. Resolve the active profile for the foreground process
//! 2. Take the first enabled, bound binding whose signature equals the
//!    event's exactly (no superset modifier matching)
//! 3. While suspended, drop everything except the suspend toggle
//! 4. While a text box has focus, drop everything
//! 5. Otherwise dispatch the binding's action
//!
//! When several enabled bindings share a signature, the first one in
//! profile order wins and the rest are never dispatched.

pub mod hook;
pub mod system;

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Arc;

use crate::core::{actions, Config, InputType, Modifiers, Signature};
use crate::dispatch::ActionDispatcher;
use crate::mailbox::{UiMessage, UiSender};

pub use hook::{HookCallback, HookError, InputHook, MouseButton, NullHook, RawInput};
pub use system::{FocusQuery, NoTextInput, ProcessQuery};

/// A press captured on the hook thread, queued for the UI context
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HotkeyEvent {
    pub input_type: InputType,
    pub key: u32,
    /// Modifier mask at the moment of the press
    pub modifiers: Modifiers,
}

impl HotkeyEvent {
    /// Builds an event from a raw press, ignoring non-side mouse buttons.
    pub fn from_raw(input: RawInput, modifiers: Modifiers) -> Option<Self> {
        let (input_type, key) = match input {
            RawInput::KeyDown(0) => return None,
            RawInput::KeyDown(vk) => (InputType::Keyboard, vk),
            RawInput::MouseDown(button) => (InputType::Mouse, button.side_button_key()?),
        };
        Some(Self {
            input_type,
            key,
            modifiers,
        })
    }

    pub fn signature(&self) -> Signature {
        Signature {
            input_type: self.input_type,
            key: self.key,
            modifiers: self.modifiers,
        }
    }
}

/// What the engine did with one event
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HotkeyOutcome {
    /// Config has no profiles
    NoProfile,
    /// Active profile has no matching enabled binding
    NoBinding,
    /// Matched, but hotkeys are suspended
    Suspended { action: String },
    /// Matched, but a text box has focus
    TextInputFocused { action: String },
    /// Dispatched; `registered` is the dispatcher's answer
    Dispatched { action: String, registered: bool },
}

/// Shared handle to the engine's suspend flag
///
/// Cloned into the `SuspendHotkeys` action handler so the handler can
/// flip the gate the engine checks.
#[derive(Clone, Debug, Default)]
pub struct SuspendSwitch {
    suspended: Rc<Cell<bool>>,
}

impl SuspendSwitch {
    pub fn is_suspended(&self) -> bool {
        self.suspended.get()
    }

    pub fn set(&self, suspended: bool) {
        self.suspended.set(suspended);
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self) -> bool {
        let next = !self.suspended.get();
        self.suspended.set(next);
        next
    }
}

/// Global hotkey engine
///
/// Owns the OS hook for its whole lifetime; dropping the engine stops it.
pub struct HotkeyEngine {
    config: Config,
    hook: Box<dyn InputHook>,
    system: Arc<dyn ProcessQuery>,
    focus: Box<dyn FocusQuery>,
    ui: UiSender,
    started: bool,
    suspend: SuspendSwitch,
}

impl HotkeyEngine {
    /// Creates a stopped engine.
    ///
    /// Every collaborator is required; there is no partially wired engine.
    pub fn new(
        config: Config,
        hook: Box<dyn InputHook>,
        system: Arc<dyn ProcessQuery>,
        focus: Box<dyn FocusQuery>,
        ui: UiSender,
    ) -> Self {
        Self {
            config,
            hook,
            system,
            focus,
            ui,
            started: false,
            suspend: SuspendSwitch::default(),
        }
    }

    /// Installs the OS hook. Calling it while started is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the hook's installation error; the engine stays stopped.
    pub fn start(&mut self) -> Result<(), HookError> {
        if self.started {
            return Ok(());
        }

        let system = Arc::clone(&self.system);
        let ui = self.ui.clone();
        let callback: HookCallback = Box::new(move |input| {
            // Nothing may unwind into the OS hook chain.
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                if let Some(event) = HotkeyEvent::from_raw(input, system.modifier_mask()) {
                    ui.post(UiMessage::Hotkey(event));
                }
            }));
            if result.is_err() {
                tracing::error!(?input, "panic in input hook callback");
            }
        });

        self.hook.install(callback)?;
        self.started = true;
        tracing::info!(profiles = self.config.profiles.len(), "hotkey engine started");
        Ok(())
    }

    /// Removes the OS hook. Safe to call repeatedly or before `start`.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.hook.uninstall();
        self.started = false;
        tracing::info!("hotkey engine stopped");
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_suspended(&self) -> bool {
        self.suspend.is_suspended()
    }

    /// Flips the suspend gate.
    pub fn toggle_suspend(&self) {
        let suspended = self.suspend.toggle();
        tracing::info!(suspended, "hotkeys suspend toggled");
    }

    /// Handle for the suspend-toggle action handler.
    pub fn suspend_switch(&self) -> SuspendSwitch {
        self.suspend.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the profile set. Takes effect for the next event.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Resolves and dispatches one queued event. Runs on the UI context.
    pub fn handle_event(&self, event: &HotkeyEvent, dispatcher: &ActionDispatcher) -> HotkeyOutcome {
        let process = self.system.foreground_process_name();

        let Some(profile) = self.config.active_profile(&process) else {
            return HotkeyOutcome::NoProfile;
        };

        let signature = event.signature();
        let Some(binding) = profile.find_binding(&signature) else {
            return HotkeyOutcome::NoBinding;
        };
        let action = binding.action.clone();

        if self.is_suspended() && !actions::is_suspend_action(&action) {
            tracing::debug!(%signature, %action, "hotkeys suspended; ignoring");
            return HotkeyOutcome::Suspended { action };
        }

        if self.focus.is_text_input_focused() {
            tracing::debug!(%signature, %action, "text input focused; ignoring");
            return HotkeyOutcome::TextInputFocused { action };
        }

        tracing::debug!(%signature, %action, profile = %profile.name, %process, "hotkey matched");
        let registered = dispatcher.dispatch(&action);
        if !registered {
            tracing::warn!(%action, "hotkey bound to unregistered action");
        }
        HotkeyOutcome::Dispatched { action, registered }
    }
}

impl Drop for HotkeyEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
