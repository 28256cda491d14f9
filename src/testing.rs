//! Test doubles for the OS-facing collaborator traits

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use crate::core::Modifiers;
use crate::engine::{FocusQuery, HookCallback, HookError, InputHook, ProcessQuery, RawInput};
use crate::window::{MediaPlayer, WindowSurface};

/// Scriptable foreground/keyboard/cursor state
#[derive(Default)]
pub struct FakeSystem {
    state: Mutex<FakeSystemState>,
}

#[derive(Default)]
struct FakeSystemState {
    process: String,
    modifiers: Modifiers,
    confined: bool,
    pressed: HashSet<u32>,
    cursor_queries: usize,
}

impl FakeSystem {
    pub fn new(process: &str) -> Arc<Self> {
        let system = Self::default();
        system.set_process(process);
        Arc::new(system)
    }

    pub fn set_process(&self, process: &str) {
        self.state.lock().unwrap().process = process.to_string();
    }

    pub fn set_modifiers(&self, modifiers: Modifiers) {
        self.state.lock().unwrap().modifiers = modifiers;
    }

    pub fn set_confined(&self, confined: bool) {
        self.state.lock().unwrap().confined = confined;
    }

    pub fn set_key(&self, vk: u32, down: bool) {
        let mut state = self.state.lock().unwrap();
        if down {
            state.pressed.insert(vk);
        } else {
            state.pressed.remove(&vk);
        }
    }

    pub fn cursor_queries(&self) -> usize {
        self.state.lock().unwrap().cursor_queries
    }
}

impl ProcessQuery for FakeSystem {
    fn foreground_process_name(&self) -> String {
        self.state.lock().unwrap().process.clone()
    }

    fn modifier_mask(&self) -> Modifiers {
        self.state.lock().unwrap().modifiers
    }

    fn is_cursor_confined_to_center(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        state.cursor_queries += 1;
        state.confined
    }

    fn is_key_pressed(&self, vk_code: u32) -> bool {
        self.state.lock().unwrap().pressed.contains(&vk_code)
    }
}

/// Focus query controlled from the test
#[derive(Clone, Default)]
pub struct FakeFocus {
    pub text_focused: Rc<Cell<bool>>,
}

impl FocusQuery for FakeFocus {
    fn is_text_input_focused(&self) -> bool {
        self.text_focused.get()
    }
}

#[derive(Default)]
struct HookState {
    callback: Option<HookCallback>,
    installs: usize,
    uninstalls: usize,
    fail_install: bool,
}

/// Hook that records lifecycle calls and lets the test inject presses
#[derive(Clone, Default)]
pub struct FakeHook {
    state: Arc<Mutex<HookState>>,
}

impl FakeHook {
    pub fn failing() -> Self {
        let hook = Self::default();
        hook.state.lock().unwrap().fail_install = true;
        hook
    }

    /// Delivers a press as the OS would, on the calling thread.
    pub fn press(&self, input: RawInput) {
        let state = self.state.lock().unwrap();
        if let Some(callback) = &state.callback {
            callback(input);
        }
    }

    pub fn is_installed(&self) -> bool {
        self.state.lock().unwrap().callback.is_some()
    }

    pub fn installs(&self) -> usize {
        self.state.lock().unwrap().installs
    }

    pub fn uninstalls(&self) -> usize {
        self.state.lock().unwrap().uninstalls
    }
}

impl InputHook for FakeHook {
    fn install(&mut self, callback: HookCallback) -> Result<(), HookError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_install {
            return Err(HookError::InstallFailed("access denied".to_string()));
        }
        state.callback = Some(callback);
        state.installs += 1;
        Ok(())
    }

    fn uninstall(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.callback = None;
        state.uninstalls += 1;
    }
}

/// Window surface call log
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Opacity(f64),
    ClickThrough(bool),
    ToggleMaximize,
    ToggleVisibility,
}

/// Window surface that records every call
#[derive(Clone, Default)]
pub struct RecordingSurface {
    calls: Rc<RefCell<Vec<SurfaceCall>>>,
}

impl RecordingSurface {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl WindowSurface for RecordingSurface {
    fn set_opacity(&mut self, opacity: f64) {
        self.calls.borrow_mut().push(SurfaceCall::Opacity(opacity));
    }

    fn set_click_through(&mut self, enabled: bool) {
        self.calls.borrow_mut().push(SurfaceCall::ClickThrough(enabled));
    }

    fn toggle_maximize(&mut self) {
        self.calls.borrow_mut().push(SurfaceCall::ToggleMaximize);
    }

    fn toggle_visibility(&mut self) {
        self.calls.borrow_mut().push(SurfaceCall::ToggleVisibility);
    }
}

/// Media player call log
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerCall {
    Seek(f64),
    TogglePlay,
    Rate(f64),
}

/// Media player that records every call
#[derive(Clone, Default)]
pub struct RecordingPlayer {
    calls: Rc<RefCell<Vec<PlayerCall>>>,
}

impl RecordingPlayer {
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.borrow().clone()
    }
}

impl MediaPlayer for RecordingPlayer {
    fn seek_by(&mut self, seconds: f64) {
        self.calls.borrow_mut().push(PlayerCall::Seek(seconds));
    }

    fn toggle_play(&mut self) {
        self.calls.borrow_mut().push(PlayerCall::TogglePlay);
    }

    fn set_rate(&mut self, rate: f64) {
        self.calls.borrow_mut().push(PlayerCall::Rate(rate));
    }
}
