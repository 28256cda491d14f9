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

//! UI-context wiring
//!
//! `OverlayApp` owns every stateful piece and lives on the UI context:
//!
//! - the hotkey engine and its action dispatcher
//! - window behaviour (opacity and click-through) and playback
//! - the cursor detection service
//! - the mailbox that background threads post into
//!
//! Background threads never touch this state. The input hook and the
//! cursor poller post messages; [`OverlayApp::pump`] drains them here, so
//! both click-through channels are written from the same context.
//!
//! # Example
//!
//! ```no_run
//! use overlay_hotkeys::app::{OverlayApp, Platform};
//! use overlay_hotkeys::core::Config;
//! # fn platform() -> Platform { unimplemented!() }
//!
//! let mut app = OverlayApp::new(Config::default(), platform());
//! app.start();
//! loop {
//!     app.pump_timeout(std::time::Duration::from_millis(16));
//! }
//! ```

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ConfigManager;
use crate::core::Config;
use crate::cursor::{CursorChange, CursorDetectionService, CursorSink, CursorTarget, CursorVisibility, ServiceState};
use crate::dispatch::{actions, ActionDispatcher};
use crate::engine::{FocusQuery, HotkeyEngine, HotkeyOutcome, InputHook, ProcessQuery};
use crate::mailbox::{UiMailbox, UiMessage, UiSender};
use crate::window::{MediaPlayer, PlaybackController, WindowBehavior, WindowSurface};

/// Platform collaborators handed to the app at construction
pub struct Platform {
    pub hook: Box<dyn InputHook>,
    pub system: Arc<dyn ProcessQuery>,
    pub focus: Box<dyn FocusQuery>,
    pub surface: Box<dyn WindowSurface>,
    pub player: Box<dyn MediaPlayer>,
}

/// The overlay's UI-context state
pub struct OverlayApp {
    engine: HotkeyEngine,
    dispatcher: ActionDispatcher,
    window: Rc<RefCell<WindowBehavior>>,
    playback: Rc<RefCell<PlaybackController>>,
    cursor: CursorDetectionService,
    mailbox: UiMailbox,
    ui: UiSender,
    config_manager: Option<ConfigManager>,
}

impl OverlayApp {
    /// Builds the app with every built-in action wired. Nothing runs until
    /// [`start`](Self::start).
    pub fn new(mut config: Config, platform: Platform) -> Self {
        config.ensure_profile();

        let (ui, mailbox) = UiMailbox::new();

        let window = Rc::new(RefCell::new(WindowBehavior::new(
            platform.surface,
            config.window.clone(),
        )));
        let playback = Rc::new(RefCell::new(PlaybackController::new(
            platform.player,
            config.playback.clone(),
        )));

        let cursor_ui = ui.clone();
        let sink: CursorSink = Arc::new(move |change| {
            cursor_ui.post(UiMessage::Cursor(change));
        });
        let cursor = CursorDetectionService::new(
            Arc::clone(&platform.system),
            sink,
            config.cursor_detection.override_key,
        );

        let engine = HotkeyEngine::new(
            config,
            platform.hook,
            platform.system,
            platform.focus,
            ui.clone(),
        );

        let mut app = Self {
            engine,
            dispatcher: ActionDispatcher::new(),
            window,
            playback,
            cursor,
            mailbox,
            ui,
            config_manager: None,
        };
        app.wire_builtin_actions();
        app
    }

    /// Reloads from `manager` whenever a `ConfigChanged` message arrives.
    pub fn with_config_manager(mut self, manager: ConfigManager) -> Self {
        self.config_manager = Some(manager);
        self
    }

    fn wire_builtin_actions(&mut self) {
        let window_actions: [(&str, fn(&mut WindowBehavior)); 6] = [
            (actions::INCREASE_OPACITY, WindowBehavior::increase_opacity),
            (actions::DECREASE_OPACITY, WindowBehavior::decrease_opacity),
            (actions::RESET_OPACITY, WindowBehavior::reset_opacity),
            (actions::TOGGLE_MAXIMIZE, WindowBehavior::toggle_maximize),
            (actions::TOGGLE_WINDOW_VISIBILITY, WindowBehavior::toggle_visibility),
            (actions::TOGGLE_CLICK_THROUGH, |w: &mut WindowBehavior| {
                w.toggle_manual_click_through();
            }),
        ];
        for (name, action) in window_actions {
            let window = Rc::clone(&self.window);
            self.dispatcher
                .subscribe(name, move || action(&mut window.borrow_mut()));
        }

        let playback_actions: [(&str, fn(&mut PlaybackController)); 6] = [
            (actions::SEEK_BACKWARD, PlaybackController::seek_backward),
            (actions::SEEK_FORWARD, PlaybackController::seek_forward),
            (actions::TOGGLE_PLAY, PlaybackController::toggle_play),
            (actions::INCREASE_PLAYBACK_RATE, PlaybackController::increase_rate),
            (actions::DECREASE_PLAYBACK_RATE, PlaybackController::decrease_rate),
            (actions::RESET_PLAYBACK_RATE, PlaybackController::reset_rate),
        ];
        for (name, action) in playback_actions {
            let playback = Rc::clone(&self.playback);
            self.dispatcher
                .subscribe(name, move || action(&mut playback.borrow_mut()));
        }

        let suspend = self.engine.suspend_switch();
        self.dispatcher.subscribe(actions::SUSPEND_HOTKEYS, move || {
            let suspended = suspend.toggle();
            tracing::info!(suspended, "hotkeys suspend toggled");
        });
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Installs the input hook and starts cursor detection if enabled.
    ///
    /// A hook that fails to install is logged and the app keeps running
    /// with hotkeys inactive. Returns whether hotkeys are active.
    pub fn start(&mut self) -> bool {
        let hotkeys_active = match self.engine.start() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "hotkeys unavailable");
                false
            }
        };
        self.apply_cursor_detection();
        hotkeys_active
    }

    /// Removes the hook and stops cursor polling. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.engine.stop();
        self.cursor.dispose();
    }

    /// Stops or (re)starts cursor detection to match the config.
    ///
    /// Either way the detector starts over assuming a visible cursor, so
    /// the auto channel is cleared to match; changes still queued from the
    /// previous session are dropped in [`handle_message`](Self::handle_message).
    fn apply_cursor_detection(&mut self) {
        let settings = &self.engine.config().cursor_detection;
        if settings.enabled {
            self.cursor.set_override_key(settings.override_key);
            let target = CursorTarget::from_processes(&settings.process_whitelist);
            if let Err(e) = self
                .cursor
                .start(target, settings.interval_ms, settings.debug_log)
            {
                tracing::error!(error = %e, "cursor detection unavailable");
            }
        } else {
            self.cursor.stop();
        }
        self.window.borrow_mut().reset_auto_click_through();
    }

    /// Swaps in a new config: profiles, tuning and cursor detection.
    ///
    /// Click-through flags and the suspend state carry over.
    pub fn reload_config(&mut self, mut config: Config) {
        config.ensure_profile();
        self.window.borrow_mut().set_settings(config.window.clone());
        self.playback.borrow_mut().set_settings(config.playback.clone());
        self.engine.set_config(config);
        self.apply_cursor_detection();
        tracing::info!(profiles = self.engine.config().profiles.len(), "config reloaded");
    }

    /// Clears the auto click-through channel; the plugin driving it is gone.
    pub fn plugin_unloaded(&mut self) {
        self.window.borrow_mut().reset_auto_click_through();
    }

    /// Window left the screen (minimised, hidden): pause cursor polling.
    pub fn window_hidden(&self) {
        self.cursor.suspend();
    }

    /// Window is back: resume polling with an immediate check.
    pub fn window_restored(&self) {
        self.cursor.resume();
    }

    // ========================================================================
    // Message loop
    // ========================================================================

    /// Handles every queued message. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let messages = self.mailbox.drain();
        let count = messages.len();
        for message in messages {
            self.handle_message(message);
        }
        count
    }

    /// Waits up to `timeout` for a message, then handles everything queued.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.mailbox.next_timeout(timeout) {
            Some(first) => {
                self.handle_message(first);
                1 + self.pump()
            }
            None => 0,
        }
    }

    /// Handles one message on the UI context.
    ///
    /// Returns the engine's outcome for hotkey messages.
    pub fn handle_message(&mut self, message: UiMessage) -> Option<HotkeyOutcome> {
        match message {
            UiMessage::Hotkey(event) => Some(self.engine.handle_event(&event, &self.dispatcher)),
            UiMessage::Cursor(change) => {
                self.apply_cursor_change(change);
                None
            }
            UiMessage::ConfigChanged => {
                self.reload_from_disk();
                None
            }
        }
    }

    fn apply_cursor_change(&mut self, change: CursorChange) {
        let current = self.cursor.session();
        if change.session != current {
            tracing::debug!(session = change.session, current, "dropping cursor change from earlier session");
            return;
        }
        let captured = change.visibility == CursorVisibility::Hidden;
        self.window.borrow_mut().set_auto_click_through(captured);
    }

    fn reload_from_disk(&mut self) {
        let Some(manager) = &self.config_manager else {
            tracing::debug!("config change ignored; no config manager");
            return;
        };
        match manager.load() {
            Ok(config) => self.reload_config(config),
            Err(e) => tracing::warn!(error = %e, "keeping previous config"),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Sender for other producers (e.g. a config watcher).
    pub fn sender(&self) -> UiSender {
        self.ui.clone()
    }

    pub fn config(&self) -> &Config {
        self.engine.config()
    }

    pub fn engine(&self) -> &HotkeyEngine {
        &self.engine
    }

    /// Dispatcher, for plugins registering their own actions.
    pub fn dispatcher_mut(&mut self) -> &mut ActionDispatcher {
        &mut self.dispatcher
    }

    pub fn window(&self) -> Ref<'_, WindowBehavior> {
        self.window.borrow()
    }

    pub fn playback(&self) -> Ref<'_, PlaybackController> {
        self.playback.borrow()
    }

    pub fn cursor_state(&self) -> ServiceState {
        self.cursor.state()
    }

    /// Session that incoming cursor changes must carry to be applied.
    pub fn cursor_session(&self) -> u64 {
        self.cursor.session()
    }
}

impl Drop for OverlayApp {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests;
