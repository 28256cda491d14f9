use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use super::*;
use crate::core::{Binding, InputType, Modifiers, Profile, VK_XBUTTON2};
use crate::cursor::CursorChange;
use crate::engine::{HotkeyEvent, MouseButton, RawInput};
use crate::testing::{FakeFocus, FakeHook, FakeSystem, PlayerCall, RecordingPlayer, RecordingSurface, SurfaceCall};

const CTRL_ALT: Modifiers = Modifiers::from_bits_truncate(0b011);

struct Harness {
    app: OverlayApp,
    hook: FakeHook,
    system: Arc<FakeSystem>,
    surface: RecordingSurface,
    player: RecordingPlayer,
}

impl Harness {
    /// Delivers a cursor change from the current detection session.
    fn cursor(&mut self, visibility: CursorVisibility) {
        let change = CursorChange {
            visibility,
            session: self.app.cursor_session(),
        };
        self.app.handle_message(UiMessage::Cursor(change));
    }
}

fn harness_with(config: Config, hook: FakeHook) -> Harness {
    let system = FakeSystem::new("browser.exe");
    let surface = RecordingSurface::default();
    let player = RecordingPlayer::default();
    let app = OverlayApp::new(
        config,
        Platform {
            hook: Box::new(hook.clone()),
            system: system.clone(),
            focus: Box::new(FakeFocus::default()),
            surface: Box::new(surface.clone()),
            player: Box::new(player.clone()),
        },
    );
    Harness {
        app,
        hook,
        system,
        surface,
        player,
    }
}

fn harness() -> Harness {
    harness_with(Config::default(), FakeHook::default())
}

/// Presses a key with modifiers held, as the OS hook would.
fn press(h: &Harness, vk: u32, modifiers: Modifiers) {
    h.system.set_modifiers(modifiers);
    h.hook.press(RawInput::KeyDown(vk));
    h.system.set_modifiers(Modifiers::NONE);
}

#[test]
fn test_hotkey_toggles_manual_click_through() {
    let mut h = harness();
    assert!(h.app.start());

    // Ctrl+Alt+T
    press(&h, 0x54, CTRL_ALT);
    assert!(!h.app.window().click_through().manual(), "nothing runs before pump");

    assert_eq!(h.app.pump(), 1);
    assert!(h.app.window().click_through().manual());
    assert!(h.app.window().click_through().effective());
    assert!(h.surface.calls().contains(&SurfaceCall::ClickThrough(true)));
}

#[test]
fn test_side_button_seeks() {
    let mut h = harness();
    h.app.start();

    h.hook.press(RawInput::MouseDown(MouseButton::X2));
    h.hook.press(RawInput::MouseDown(MouseButton::Right));
    h.app.pump();

    assert_eq!(h.player.calls(), vec![PlayerCall::Seek(5.0)]);
}

#[test]
fn test_every_builtin_action_is_wired() {
    let h = harness();
    for name in actions::BUILTIN_ACTIONS {
        assert_eq!(h.app.dispatcher.handler_count(name), 1, "{}", name);
    }
}

#[test]
fn test_cursor_messages_drive_auto_channel() {
    let mut h = harness();

    h.cursor(CursorVisibility::Hidden);
    assert!(h.app.window().click_through().auto());
    assert!(h.app.window().click_through().effective());

    h.cursor(CursorVisibility::Shown);
    assert!(!h.app.window().click_through().auto());
    assert!(!h.app.window().click_through().effective());
}

#[test]
fn test_manual_and_auto_do_not_clobber_each_other() {
    let mut h = harness();
    h.app.start();

    press(&h, 0x54, CTRL_ALT);
    h.app.pump();
    h.cursor(CursorVisibility::Hidden);
    h.cursor(CursorVisibility::Shown);

    assert!(h.app.window().click_through().manual());
    assert!(h.app.window().click_through().effective());
}

#[test]
fn test_plugin_unloaded_resets_auto_only() {
    let mut h = harness();
    h.app.start();

    press(&h, 0x54, CTRL_ALT);
    h.app.pump();
    h.cursor(CursorVisibility::Hidden);

    h.app.plugin_unloaded();
    assert!(!h.app.window().click_through().auto());
    assert!(h.app.window().click_through().manual());
    assert!(h.app.window().click_through().effective());
}

#[test]
fn test_suspend_hotkey_gates_other_actions() {
    let mut h = harness();
    h.app.start();

    // Ctrl+Alt+P suspends
    press(&h, 0x50, CTRL_ALT);
    h.app.pump();
    assert!(h.app.engine().is_suspended());

    press(&h, 0x20, CTRL_ALT);
    h.app.pump();
    assert!(h.player.calls().is_empty());

    press(&h, 0x50, CTRL_ALT);
    h.app.pump();
    assert!(!h.app.engine().is_suspended());

    press(&h, 0x20, CTRL_ALT);
    h.app.pump();
    assert_eq!(h.player.calls(), vec![PlayerCall::TogglePlay]);
}

#[test]
fn test_opacity_and_rate_actions() {
    let mut h = harness();
    let event = |key| {
        UiMessage::Hotkey(HotkeyEvent {
            input_type: InputType::Keyboard,
            key,
            modifiers: CTRL_ALT,
        })
    };

    h.app.handle_message(event(0x28));
    assert_eq!(h.app.window().opacity(), 0.9);

    h.app.handle_message(event(0xBE));
    assert_eq!(h.app.playback().rate(), 1.25);

    h.app.handle_message(event(0x30));
    assert_eq!(h.app.window().opacity(), 1.0);
}

#[test]
fn test_failed_hook_degrades_without_panicking() {
    let mut h = harness_with(Config::default(), FakeHook::failing());

    assert!(!h.app.start());
    assert!(!h.app.engine().is_started());

    // Everything else still works
    h.cursor(CursorVisibility::Hidden);
    assert!(h.app.window().click_through().effective());
}

#[test]
fn test_custom_action_from_plugin() {
    let mut h = harness_with(
        Config {
            profiles: vec![Profile::new("Default").with_binding(Binding::keyboard(0x41, Modifiers::NONE, "Screenshot"))],
            ..Config::default()
        },
        FakeHook::default(),
    );
    let fired = std::rc::Rc::new(std::cell::Cell::new(0));
    let seen = std::rc::Rc::clone(&fired);
    h.app.dispatcher_mut().subscribe("screenshot", move || seen.set(seen.get() + 1));
    h.app.start();

    press(&h, 0x41, Modifiers::NONE);
    h.app.pump();
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_reload_config_swaps_profiles_and_keeps_flags() {
    let mut h = harness();
    h.app.start();
    press(&h, 0x54, CTRL_ALT);
    h.app.pump();

    h.app.reload_config(Config {
        profiles: vec![Profile::new("Minimal").with_binding(Binding::mouse(VK_XBUTTON2, Modifiers::NONE, actions::TOGGLE_PLAY))],
        ..Config::default()
    });

    assert_eq!(h.app.config().profiles[0].name, "Minimal");
    assert!(h.app.window().click_through().manual());

    h.hook.press(RawInput::MouseDown(MouseButton::X2));
    h.app.pump();
    assert_eq!(h.player.calls(), vec![PlayerCall::TogglePlay]);
}

#[test]
fn test_reload_with_no_profiles_uses_builtin() {
    let mut h = harness();
    h.app.reload_config(Config {
        profiles: Vec::new(),
        ..Config::default()
    });
    assert_eq!(h.app.config().profiles.len(), 1);
}

#[test]
fn test_cursor_detection_follows_config() {
    let mut h = harness();
    h.app.start();
    assert_eq!(h.app.cursor_state(), ServiceState::Stopped);

    let mut config = Config::default();
    config.cursor_detection.enabled = true;
    config.cursor_detection.process_whitelist = vec!["game.exe".to_string()];
    config.cursor_detection.interval_ms = 60_000;
    h.app.reload_config(config);
    assert_eq!(h.app.cursor_state(), ServiceState::Running);

    h.app.window_hidden();
    assert_eq!(h.app.cursor_state(), ServiceState::Suspended);

    // Game took the cursor while the window was away
    h.system.set_process("game.exe");
    h.system.set_confined(true);
    h.app.window_restored();
    assert_eq!(h.app.cursor_state(), ServiceState::Running);

    assert_eq!(h.app.pump(), 1);
    assert!(h.app.window().click_through().auto());

    h.app.reload_config(Config::default());
    assert_eq!(h.app.cursor_state(), ServiceState::Stopped);
}

fn detection_for(process: &str) -> Config {
    let mut config = Config::default();
    config.cursor_detection.enabled = true;
    config.cursor_detection.process_whitelist = vec![process.to_string()];
    config.cursor_detection.interval_ms = 60_000;
    config
}

/// Drives the auto channel on through a real detection tick.
fn capture_cursor(h: &mut Harness) {
    h.system.set_process("game.exe");
    h.system.set_confined(true);
    h.app.window_hidden();
    h.app.window_restored();
    assert_eq!(h.app.pump(), 1);
    assert!(h.app.window().click_through().auto());
}

#[test]
fn test_disabling_detection_clears_auto_channel() {
    let mut h = harness();
    h.app.start();
    h.app.reload_config(detection_for("game.exe"));
    capture_cursor(&mut h);
    h.surface.clear();

    h.app.reload_config(Config::default());
    assert!(!h.app.window().click_through().auto());
    assert!(!h.app.window().click_through().effective());
    assert!(h.surface.calls().contains(&SurfaceCall::ClickThrough(false)));

    // The user toggle works normally again
    press(&h, 0x54, CTRL_ALT);
    h.app.pump();
    assert!(h.app.window().click_through().effective());
    press(&h, 0x54, CTRL_ALT);
    h.app.pump();
    assert!(!h.app.window().click_through().effective());
}

#[test]
fn test_restarting_detection_clears_auto_channel() {
    let mut h = harness();
    h.app.start();
    h.app.reload_config(detection_for("game.exe"));
    capture_cursor(&mut h);

    // Cursor freed while the service restarts: the new session assumes
    // visible and never reports Shown
    h.system.set_confined(false);
    h.app.reload_config(detection_for("game.exe"));
    assert_eq!(h.app.cursor_state(), ServiceState::Running);
    assert!(!h.app.window().click_through().auto());
}

#[test]
fn test_change_from_earlier_session_is_dropped() {
    let mut h = harness();
    h.app.start();
    h.app.reload_config(detection_for("game.exe"));

    h.system.set_process("game.exe");
    h.system.set_confined(true);
    h.app.window_hidden();
    h.app.window_restored();

    // Hidden is still queued when detection restarts
    h.system.set_confined(false);
    h.app.reload_config(detection_for("game.exe"));
    assert_eq!(h.app.pump(), 1);
    assert!(!h.app.window().click_through().auto());
    assert!(!h.app.window().click_through().effective());
}

#[test]
fn test_manual_survives_detection_reload() {
    let mut h = harness();
    h.app.start();
    press(&h, 0x54, CTRL_ALT);
    h.app.pump();

    h.app.reload_config(detection_for("game.exe"));
    capture_cursor(&mut h);
    h.app.reload_config(Config::default());

    assert!(h.app.window().click_through().manual());
    assert!(h.app.window().click_through().effective());
}

#[test]
fn test_config_changed_reloads_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    let manager = ConfigManager::new(config_path.clone());

    let mut h = harness();
    h.app = h.app.with_config_manager(manager);

    // Unreadable file keeps the previous config
    fs::write(&config_path, "{ broken").unwrap();
    h.app.handle_message(UiMessage::ConfigChanged);
    assert_eq!(h.app.config().profiles[0].bindings.len(), Config::default().profiles[0].bindings.len());

    fs::write(&config_path, r#"{ "profiles": [ { "name": "FromDisk" } ] }"#).unwrap();
    h.app.sender().post(UiMessage::ConfigChanged);
    assert_eq!(h.app.pump_timeout(Duration::from_secs(1)), 1);
    assert_eq!(h.app.config().profiles[0].name, "FromDisk");
}

#[test]
fn test_shutdown_is_idempotent() {
    let mut h = harness();
    h.app.start();
    h.app.shutdown();
    h.app.shutdown();
    assert!(!h.hook.is_installed());
    assert_eq!(h.hook.uninstalls(), 1);
}
