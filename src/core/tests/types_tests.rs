use crate::core::{
    actions, Binding, InputType, Modifiers, Profile, DEFAULT_PROFILE_NAME, VK_XBUTTON1,
};

#[test]
fn test_modifier_bits_are_exact() {
    let ctrl_alt = Modifiers::CTRL | Modifiers::ALT;
    assert_ne!(ctrl_alt, Modifiers::CTRL);
    assert_ne!(ctrl_alt, Modifiers::ALT);
    assert_eq!(ctrl_alt.bits(), Modifiers::CTRL.bits() | Modifiers::ALT.bits());
    assert!(ctrl_alt.contains(Modifiers::CTRL));
    assert!(!ctrl_alt.contains(Modifiers::SHIFT));
}

#[test]
fn test_modifier_truncates_unknown_bits() {
    assert_eq!(Modifiers::from_bits_truncate(0xFF), Modifiers::CTRL | Modifiers::ALT | Modifiers::SHIFT);
    assert!(Modifiers::from_bits_truncate(0b1000).is_empty());
}

#[test]
fn test_modifier_iteration_order_and_default() {
    let all: Vec<Modifiers> = (Modifiers::SHIFT | Modifiers::ALT | Modifiers::CTRL).iter().collect();
    assert_eq!(all, vec![Modifiers::CTRL, Modifiers::ALT, Modifiers::SHIFT]);
    assert_eq!(Modifiers::default(), Modifiers::NONE);
    assert_eq!(Modifiers::NONE.iter().count(), 0);

    let mut mask = Modifiers::NONE;
    mask |= Modifiers::ALT;
    assert_eq!(mask.bits(), 0b010);
}

#[test]
fn test_modifier_display() {
    assert_eq!(Modifiers::NONE.to_string(), "None");
    assert_eq!((Modifiers::SHIFT | Modifiers::CTRL).to_string(), "Ctrl+Shift");
}

#[test]
fn test_modifiers_deserialize_from_number_and_text() {
    let from_number: Modifiers = serde_json::from_str("3").unwrap();
    assert_eq!(from_number, Modifiers::CTRL | Modifiers::ALT);

    let from_text: Modifiers = serde_json::from_str("\"alt, CTRL\"").unwrap();
    assert_eq!(from_text, Modifiers::CTRL | Modifiers::ALT);

    let none: Modifiers = serde_json::from_str("\"None\"").unwrap();
    assert!(none.is_empty());

    assert!(serde_json::from_str::<Modifiers>("\"Hyper\"").is_err());
}

#[test]
fn test_input_type_case_insensitive() {
    let mouse: InputType = serde_json::from_str("\"MOUSE\"").unwrap();
    assert_eq!(mouse, InputType::Mouse);
    let keyboard: InputType = serde_json::from_str("\"Keyboard\"").unwrap();
    assert_eq!(keyboard, InputType::Keyboard);
    assert!(serde_json::from_str::<InputType>("\"gamepad\"").is_err());
}

#[test]
fn test_unbound_binding_never_matches() {
    let binding = Binding::keyboard(0, Modifiers::NONE, actions::TOGGLE_PLAY);
    assert!(!binding.is_bound());
    assert!(!binding.matches(&binding.signature()));
}

#[test]
fn test_disabled_binding_never_matches() {
    let mut binding = Binding::keyboard(0x41, Modifiers::NONE, actions::TOGGLE_PLAY);
    binding.enabled = false;
    assert!(!binding.matches(&binding.signature()));
}

#[test]
fn test_binding_requires_exact_modifiers() {
    let binding = Binding::keyboard(0x41, Modifiers::CTRL, actions::TOGGLE_PLAY);
    let mut superset = binding.signature();
    superset.modifiers = Modifiers::CTRL | Modifiers::SHIFT;
    assert!(binding.matches(&binding.signature()));
    assert!(!binding.matches(&superset));
}

#[test]
fn test_binding_display() {
    let mut binding = Binding::mouse(VK_XBUTTON1, Modifiers::NONE, actions::SEEK_BACKWARD);
    assert_eq!(binding.to_string(), "Mouse4 → SeekBackward");
    binding.enabled = false;
    assert!(binding.to_string().ends_with("(disabled)"));
}

#[test]
fn test_binding_defaults_on_missing_fields() {
    let binding: Binding = serde_json::from_str(r#"{"key": 65}"#).unwrap();
    assert_eq!(binding.input_type, InputType::Keyboard);
    assert_eq!(binding.modifiers, Modifiers::NONE);
    assert!(binding.enabled);
    assert!(binding.action.is_empty());
}

#[test]
fn test_profile_process_match_normalises() {
    let profile = Profile::new("Game").for_process("Game.EXE");
    assert!(profile.matches_process("game.exe"));
    assert!(profile.matches_process("GAME"));
    assert!(profile.matches_process("  game.exe "));
    assert!(!profile.matches_process("launcher.exe"));
    assert!(!profile.matches_process(""));
}

#[test]
fn test_profile_find_binding_first_enabled_wins() {
    let mut disabled = Binding::keyboard(0x41, Modifiers::NONE, "Disabled");
    disabled.enabled = false;
    let profile = Profile::new("P")
        .with_binding(disabled)
        .with_binding(Binding::keyboard(0x41, Modifiers::NONE, "First"))
        .with_binding(Binding::keyboard(0x41, Modifiers::NONE, "Second"));

    let signature = profile.bindings[1].signature();
    let found = profile.find_binding(&signature).unwrap();
    assert_eq!(found.action, "First");
}

#[test]
fn test_builtin_default_covers_every_action() {
    let profile = Profile::builtin_default();
    assert_eq!(profile.name, DEFAULT_PROFILE_NAME);
    for action in actions::BUILTIN_ACTIONS {
        assert!(
            profile.bindings.iter().any(|b| actions::same_action(&b.action, action)),
            "default profile should bind {}",
            action
        );
    }
    assert!(crate::core::detect_conflicts(&profile.bindings).is_empty());
}

#[test]
fn test_custom_actions_deduplicated_case_insensitively() {
    let profile = Profile::new("P")
        .with_binding(Binding::keyboard(0x41, Modifiers::NONE, "PluginNext"))
        .with_binding(Binding::keyboard(0x42, Modifiers::NONE, "pluginnext"))
        .with_binding(Binding::keyboard(0x43, Modifiers::NONE, actions::TOGGLE_PLAY));

    assert_eq!(profile.custom_actions(), vec!["PluginNext"]);
}

#[test]
fn test_action_name_helpers() {
    assert!(actions::is_builtin("RESETOPACITY"));
    assert!(actions::is_builtin("resetopacity"));
    assert!(actions::is_suspend_action("suspendHOTKEYS"));
    assert!(!actions::is_suspend_action(actions::TOGGLE_PLAY));
}
