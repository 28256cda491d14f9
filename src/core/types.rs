//! src/core/types.rs
//!
//! Core type definitions for hotkey bindings
//!
//! This module defines the fundamental types used throughout the engine:
//! - `InputType`: Whether a binding is triggered by the keyboard or a mouse side button
//! - `Modifiers`: Fixed-width bitmask of held modifier keys (CTRL, ALT, SHIFT)
//! - `Signature`: The `(input type, key, modifiers)` triple used for matching and conflicts
//! - `Binding`: One shortcut, mapping a signature to a named action
//! - `Profile`: A named, optionally process-scoped, ordered list of bindings
//!
//! All types implement serialization for config persistence. Deserialization
//! is lenient: enum values are accepted in any casing and modifiers may be
//! written either as a raw bitmask or as `"Ctrl+Alt"` style text.

use bitflags::bitflags;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::core::actions;
use crate::core::parser;

/// Virtual key code of the first mouse side button (XButton1 / "Mouse4").
pub const VK_XBUTTON1: u32 = 0x05;
/// Virtual key code of the second mouse side button (XButton2 / "Mouse5").
pub const VK_XBUTTON2: u32 = 0x06;
/// Virtual key code of the Alt (menu) key.
pub const VK_MENU: u32 = 0x12;

/// Source device of a binding or raw input event
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Keyboard key down
    #[default]
    Keyboard,
    /// Mouse side button down
    Mouse,
}

impl<'de> Deserialize<'de> for InputType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InputTypeVisitor;

        impl de::Visitor<'_> for InputTypeVisitor {
            type Value = InputType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "\"keyboard\", \"mouse\", 0 or 1")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<InputType, E> {
                match v {
                    0 => Ok(InputType::Keyboard),
                    1 => Ok(InputType::Mouse),
                    _ => Err(E::custom(format!("unknown input type {}", v))),
                }
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<InputType, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("unknown input type {}", v)))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<InputType, E> {
                match v.trim().to_lowercase().as_str() {
                    "keyboard" | "key" => Ok(InputType::Keyboard),
                    "mouse" => Ok(InputType::Mouse),
                    other => Err(E::unknown_variant(other, &["keyboard", "mouse"])),
                }
            }
        }

        deserializer.deserialize_any(InputTypeVisitor)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputType::Keyboard => write!(f, "keyboard"),
            InputType::Mouse => write!(f, "mouse"),
        }
    }
}

bitflags! {
    /// Modifier key bitmask
    ///
    /// Equality is exact integer comparison: CTRL+ALT never equals CTRL, and a
    /// binding with no modifiers never matches an event with SHIFT held.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
    pub struct Modifiers: u8 {
        const CTRL = 0b001;
        const ALT = 0b010;
        const SHIFT = 0b100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers::empty();

    fn name(self) -> &'static str {
        if self == Modifiers::CTRL {
            "Ctrl"
        } else if self == Modifiers::ALT {
            "Alt"
        } else if self == Modifiers::SHIFT {
            "Shift"
        } else {
            "None"
        }
    }

    /// Parses a single modifier name (case-insensitive).
    pub fn parse_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifiers::CTRL),
            "alt" | "menu" => Some(Modifiers::ALT),
            "shift" => Some(Modifiers::SHIFT),
            "none" | "" => Some(Modifiers::NONE),
            _ => None,
        }
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        let names = self.iter().map(Modifiers::name).collect::<Vec<_>>();
        write!(f, "{}", names.join("+"))
    }
}

impl Serialize for Modifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for Modifiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ModifiersVisitor;

        impl de::Visitor<'_> for ModifiersVisitor {
            type Value = Modifiers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a modifier bitmask or a string such as \"Ctrl+Alt\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Modifiers, E> {
                u8::try_from(v)
                    .map(Modifiers::from_bits_truncate)
                    .map_err(|_| E::custom(format!("modifier mask out of range: {}", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Modifiers, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("negative modifier mask: {}", v)))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Modifiers, E> {
                let mut mask = Modifiers::NONE;
                for part in v.split(['+', ',', '|']) {
                    match Modifiers::parse_name(part) {
                        Some(m) => mask |= m,
                        None => return Err(E::custom(format!("unknown modifier '{}'", part.trim()))),
                    }
                }
                Ok(mask)
            }
        }

        deserializer.deserialize_any(ModifiersVisitor)
    }
}

/// The `(input type, key, modifiers)` triple
///
/// Two bindings with the same signature fire on the same physical input.
/// The action name plays no part in it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Signature {
    pub input_type: InputType,
    pub key: u32,
    pub modifiers: Modifiers,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", parser::format_hotkey(self.input_type, self.key, self.modifiers))
    }
}

/// One shortcut definition
///
/// A binding with `key == 0` is "unbound": it never matches an input event
/// and never takes part in conflict detection, whatever its other fields say.
///
/// # Example
/// ```
/// use overlay_hotkeys::core::{Binding, InputType, Modifiers};
///
/// let binding = Binding::new(InputType::Keyboard, 0x35, Modifiers::CTRL, "SeekForward");
/// assert!(binding.is_bound());
/// assert_eq!(binding.to_string(), "Ctrl+5 → SeekForward");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Binding {
    /// Keyboard or mouse side button
    pub input_type: InputType,

    /// Virtual key code (0 = unbound)
    pub key: u32,

    /// Exact modifier mask required
    pub modifiers: Modifiers,

    /// Action name, matched case-insensitively
    pub action: String,

    /// Disabled bindings never match
    pub enabled: bool,
}

impl Default for Binding {
    fn default() -> Self {
        Self {
            input_type: InputType::Keyboard,
            key: 0,
            modifiers: Modifiers::NONE,
            action: String::new(),
            enabled: true,
        }
    }
}

impl Binding {
    /// Creates an enabled binding.
    pub fn new(input_type: InputType, key: u32, modifiers: Modifiers, action: &str) -> Self {
        Self {
            input_type,
            key,
            modifiers,
            action: action.to_string(),
            enabled: true,
        }
    }

    pub fn keyboard(key: u32, modifiers: Modifiers, action: &str) -> Self {
        Self::new(InputType::Keyboard, key, modifiers, action)
    }

    pub fn mouse(key: u32, modifiers: Modifiers, action: &str) -> Self {
        Self::new(InputType::Mouse, key, modifiers, action)
    }

    pub fn signature(&self) -> Signature {
        Signature {
            input_type: self.input_type,
            key: self.key,
            modifiers: self.modifiers,
        }
    }

    /// False for the `key == 0` placeholder.
    pub fn is_bound(&self) -> bool {
        self.key != 0
    }

    /// True if this binding fires for the given signature.
    pub fn matches(&self, signature: &Signature) -> bool {
        self.enabled && self.is_bound() && self.signature() == *signature
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.signature(), self.action)?;
        if !self.enabled {
            write!(f, " (disabled)")?;
        }
        Ok(())
    }
}

/// Normalises a process name for comparison
///
/// Trims whitespace, lowercases, and strips a trailing `.exe` so that
/// `"Game.exe"`, `"game"` and `" GAME.EXE "` compare equal.
pub fn normalize_process_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lowered,
    }
}

/// A named set of bindings, optionally restricted to some processes
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,

    /// Process names this profile applies to (empty = no process filter)
    pub process_filter: Vec<String>,

    /// Ordered bindings; earlier bindings win on identical signatures
    pub bindings: Vec<Binding>,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new("")
    }
}

impl Profile {
    /// Creates an empty profile with no process filter.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            process_filter: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Adds a process to the filter, returning self for chaining.
    pub fn for_process(mut self, process: &str) -> Self {
        self.process_filter.push(process.to_string());
        self
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// True if the filter names this process (case-insensitive, `.exe` optional).
    pub fn matches_process(&self, process_name: &str) -> bool {
        let wanted = normalize_process_name(process_name);
        if wanted.is_empty() {
            return false;
        }
        self.process_filter
            .iter()
            .any(|p| normalize_process_name(p) == wanted)
    }

    /// First enabled, bound binding with exactly this signature.
    pub fn find_binding(&self, signature: &Signature) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.matches(signature))
    }

    /// The profile written to fresh config files.
    pub fn builtin_default() -> Self {
        use crate::core::actions::*;

        let hyper = Modifiers::CTRL | Modifiers::ALT;
        let bindings = vec![
            Binding::keyboard(0x25, hyper, SEEK_BACKWARD),
            Binding::keyboard(0x27, hyper, SEEK_FORWARD),
            Binding::keyboard(0x20, hyper, TOGGLE_PLAY),
            Binding::keyboard(0x26, hyper, INCREASE_OPACITY),
            Binding::keyboard(0x28, hyper, DECREASE_OPACITY),
            Binding::keyboard(0x30, hyper, RESET_OPACITY),
            Binding::keyboard(0x54, hyper, TOGGLE_CLICK_THROUGH),
            Binding::keyboard(0x4D, hyper, TOGGLE_MAXIMIZE),
            Binding::keyboard(0xBE, hyper, INCREASE_PLAYBACK_RATE),
            Binding::keyboard(0xBC, hyper, DECREASE_PLAYBACK_RATE),
            Binding::keyboard(0xBF, hyper, RESET_PLAYBACK_RATE),
            Binding::keyboard(0x48, hyper, TOGGLE_WINDOW_VISIBILITY),
            Binding::keyboard(0x50, hyper, SUSPEND_HOTKEYS),
            Binding::mouse(VK_XBUTTON1, Modifiers::NONE, SEEK_BACKWARD),
            Binding::mouse(VK_XBUTTON2, Modifiers::NONE, SEEK_FORWARD),
        ];

        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            process_filter: Vec::new(),
            bindings,
        }
    }

    /// Names of actions referenced by this profile that are not built in.
    pub fn custom_actions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .bindings
            .iter()
            .map(|b| b.action.as_str())
            .filter(|a| !a.is_empty() && !actions::is_builtin(a))
            .collect();
        names.sort_by_key(|a| a.to_lowercase());
        names.dedup_by(|a, b| actions::same_action(a, b));
        names
    }
}

/// Name of the built-in profile
pub const DEFAULT_PROFILE_NAME: &str = "Default";

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.process_filter.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} [{}]", self.name, self.process_filter.join(", "))
        }
    }
}
