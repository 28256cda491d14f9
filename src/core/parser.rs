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

//! src/core/parser.rs
//!
//! Human-readable hotkey notation
//!
//! Converts between signatures and strings such as:
//! - `"Ctrl+Alt+Left"` (modifiers, then one key)
//! - `"Shift+F5"`
//! - `"Alt+0x35"` (raw virtual key code in hex)
//! - `"Mouse4"` / `"XButton1"` (mouse side buttons)
//!
//! # Architecture
//! The parser uses nom combinators to split the input into `+`-separated
//! tokens. Every token but the last must be a modifier (in any order and
//! casing); the last token names the key. Mouse side-button names switch
//! the input type to `Mouse`.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::all_consuming,
    multi::separated_list1,
    sequence::delimited,
    IResult, Parser,
};
use thiserror::Error;

use crate::core::types::{InputType, Modifiers, Signature, VK_XBUTTON1, VK_XBUTTON2};

/// Hotkey notation errors
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid hotkey syntax: '{0}'")]
    InvalidSyntax(String),

    #[error("Unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    #[error("Key code 0 cannot be bound")]
    ZeroKey,
}

/// Named keys beyond letters, digits, F-keys and numpad digits.
const NAMED_KEYS: &[(&str, u32)] = &[
    ("Backspace", 0x08),
    ("Tab", 0x09),
    ("Enter", 0x0D),
    ("Pause", 0x13),
    ("Escape", 0x1B),
    ("Space", 0x20),
    ("PageUp", 0x21),
    ("PageDown", 0x22),
    ("End", 0x23),
    ("Home", 0x24),
    ("Left", 0x25),
    ("Up", 0x26),
    ("Right", 0x27),
    ("Down", 0x28),
    ("Insert", 0x2D),
    ("Delete", 0x2E),
    ("Multiply", 0x6A),
    ("Add", 0x6B),
    ("Subtract", 0x6D),
    ("Decimal", 0x6E),
    ("Divide", 0x6F),
    ("MediaNext", 0xB0),
    ("MediaPrev", 0xB1),
    ("MediaStop", 0xB2),
    ("MediaPlayPause", 0xB3),
    (";", 0xBA),
    ("=", 0xBB),
    (",", 0xBC),
    ("-", 0xBD),
    (".", 0xBE),
    ("/", 0xBF),
    ("`", 0xC0),
    ("[", 0xDB),
    ("\\", 0xDC),
    ("]", 0xDD),
    ("'", 0xDE),
];

/// Key aliases accepted on input only.
const KEY_ALIASES: &[(&str, u32)] = &[
    ("Return", 0x0D),
    ("Esc", 0x1B),
    ("Del", 0x2E),
    ("Ins", 0x2D),
    ("PgUp", 0x21),
    ("PgDn", 0x22),
    ("Comma", 0xBC),
    ("Period", 0xBE),
    ("Slash", 0xBF),
    ("Minus", 0xBD),
    ("Plus", 0xBB),
];

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ',' | '.' | '/' | ';' | '=' | '-' | '`' | '[' | ']' | '\\' | '\'')
}

/// Splits `"Ctrl + Alt+K"` into `["Ctrl", "Alt", "K"]`.
pub fn hotkey_tokens(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(delimited(space0, char('+'), space0), take_while1(is_token_char)).parse(input)
}

/// Parses hotkey notation into a signature.
///
/// # Example
/// ```
/// use overlay_hotkeys::core::parser::parse_hotkey;
/// use overlay_hotkeys::core::{InputType, Modifiers};
///
/// let sig = parse_hotkey("ctrl+ALT+Left")?;
/// assert_eq!(sig.input_type, InputType::Keyboard);
/// assert_eq!(sig.key, 0x25);
/// assert_eq!(sig.modifiers, Modifiers::CTRL | Modifiers::ALT);
/// # Ok::<(), overlay_hotkeys::core::parser::ParseError>(())
/// ```
pub fn parse_hotkey(input: &str) -> Result<Signature, ParseError> {
    let (_, tokens) = all_consuming(delimited(space0, hotkey_tokens, space0))
        .parse(input)
        .map_err(|_| ParseError::InvalidSyntax(input.to_string()))?;

    let (key_token, modifier_tokens) = tokens
        .split_last()
        .ok_or_else(|| ParseError::InvalidSyntax(input.to_string()))?;

    let mut modifiers = Modifiers::NONE;
    for token in modifier_tokens {
        match Modifiers::parse_name(token) {
            Some(m) if !m.is_empty() => modifiers |= m,
            _ => return Err(ParseError::UnknownModifier(token.to_string())),
        }
    }

    let (input_type, key) = parse_key(key_token)?;

    Ok(Signature {
        input_type,
        key,
        modifiers,
    })
}

/// Parses a single key token into its input type and virtual key code.
pub fn parse_key(token: &str) -> Result<(InputType, u32), ParseError> {
    let lowered = token.to_lowercase();

    match lowered.as_str() {
        "mouse4" | "xbutton1" => return Ok((InputType::Mouse, VK_XBUTTON1)),
        "mouse5" | "xbutton2" => return Ok((InputType::Mouse, VK_XBUTTON2)),
        _ => {}
    }

    if let Some(hex) = lowered.strip_prefix("0x") {
        let code = u32::from_str_radix(hex, 16).map_err(|_| ParseError::UnknownKey(token.to_string()))?;
        if code == 0 {
            return Err(ParseError::ZeroKey);
        }
        return Ok((InputType::Keyboard, code));
    }

    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Ok((InputType::Keyboard, c.to_ascii_uppercase() as u32));
        }
    }

    if let Some(n) = lowered.strip_prefix('f').and_then(|n| n.parse::<u32>().ok()) {
        if (1..=24).contains(&n) {
            return Ok((InputType::Keyboard, 0x70 + n - 1));
        }
    }

    if let Some(n) = lowered.strip_prefix("numpad").and_then(|n| n.parse::<u32>().ok()) {
        if n <= 9 {
            return Ok((InputType::Keyboard, 0x60 + n));
        }
    }

    NAMED_KEYS
        .iter()
        .chain(KEY_ALIASES.iter())
        .find(|(name, _)| name.to_lowercase() == lowered)
        .map(|(_, code)| (InputType::Keyboard, *code))
        .ok_or_else(|| ParseError::UnknownKey(token.to_string()))
}

/// Display name of a key, falling back to hex for unnamed codes.
pub fn key_name(input_type: InputType, key: u32) -> String {
    match (input_type, key) {
        (_, 0) => "Unbound".to_string(),
        (InputType::Mouse, VK_XBUTTON1) => "Mouse4".to_string(),
        (InputType::Mouse, VK_XBUTTON2) => "Mouse5".to_string(),
        (InputType::Mouse, other) => format!("Mouse:0x{:02X}", other),
        (InputType::Keyboard, 0x30..=0x39) | (InputType::Keyboard, 0x41..=0x5A) => {
            char::from_u32(key).map(String::from).unwrap_or_default()
        }
        (InputType::Keyboard, 0x60..=0x69) => format!("NumPad{}", key - 0x60),
        (InputType::Keyboard, 0x70..=0x87) => format!("F{}", key - 0x70 + 1),
        (InputType::Keyboard, _) => NAMED_KEYS
            .iter()
            .find(|(_, code)| *code == key)
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| format!("0x{:02X}", key)),
    }
}

/// Formats a signature as hotkey notation (`"Ctrl+Alt+Left"`).
///
/// The output of this function parses back to the same signature.
pub fn format_hotkey(input_type: InputType, key: u32, modifiers: Modifiers) -> String {
    let key = key_name(input_type, key);
    if modifiers.is_empty() {
        key
    } else {
        format!("{}+{}", modifiers, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotkey_tokens_with_spaces() {
        let (rest, tokens) = hotkey_tokens("Ctrl + Alt+K").unwrap();
        assert_eq!(rest, "");
        assert_eq!(tokens, vec!["Ctrl", "Alt", "K"]);
    }

    #[test]
    fn test_letter_is_uppercased() {
        assert_eq!(parse_key("k").unwrap(), (InputType::Keyboard, 0x4B));
    }
}
