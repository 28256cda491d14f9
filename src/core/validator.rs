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

//! Binding and profile validation
//!
//! Checks that loaded bindings are well-formed before they reach the engine:
//! - Action names are identifiers (letters, digits, underscores)
//! - Mouse bindings use a side button (XButton1/XButton2)
//! - Process filter entries are plain file names, not paths or patterns
//!
//! Unknown-but-well-formed action names are *not* rejected here: plugins
//! may register extra actions with the dispatcher at runtime.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::types::{Binding, InputType, Profile, VK_XBUTTON1, VK_XBUTTON2};

/// Validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Action name is empty or contains characters outside `[A-Za-z0-9_]`
    #[error("Invalid action name '{0}'")]
    InvalidActionName(String),

    /// Mouse binding on a button other than the two side buttons
    #[error("Mouse bindings must use a side button (Mouse4/Mouse5), got key 0x{0:02X}")]
    UnsupportedMouseButton(u32),

    /// Profile has an empty name
    #[error("Profile name must not be empty")]
    EmptyProfileName,

    /// Process filter entry is not a plain executable name
    #[error("Invalid process name '{0}': expected a file name such as 'game.exe'")]
    InvalidProcessName(String),
}

#[allow(clippy::expect_used)]
fn action_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("action name pattern should be valid regex")
    })
}

#[allow(clippy::expect_used)]
fn process_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^[^\\/:*?"<>|]+$"#).expect("process name pattern should be valid regex")
    })
}

/// Validates an action name's format (not whether it is registered).
pub fn validate_action_name(name: &str) -> Result<(), ValidationError> {
    if action_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidActionName(name.to_string()))
    }
}

/// Validates a process filter entry.
pub fn validate_process_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if !trimmed.is_empty() && process_name_pattern().is_match(trimmed) {
        Ok(())
    } else {
        Err(ValidationError::InvalidProcessName(name.to_string()))
    }
}

/// Validates a single binding
///
/// Unbound bindings (`key == 0`) are valid placeholders as long as their
/// action name is well-formed.
pub fn validate_binding(binding: &Binding) -> Result<(), ValidationError> {
    validate_action_name(&binding.action)?;

    if binding.input_type == InputType::Mouse
        && binding.is_bound()
        && !matches!(binding.key, VK_XBUTTON1 | VK_XBUTTON2)
    {
        return Err(ValidationError::UnsupportedMouseButton(binding.key));
    }

    Ok(())
}

/// Validates a profile's name and process filter (not its bindings).
pub fn validate_profile_header(profile: &Profile) -> Result<(), ValidationError> {
    if profile.name.trim().is_empty() {
        return Err(ValidationError::EmptyProfileName);
    }
    for process in &profile.process_filter {
        validate_process_name(process)?;
    }
    Ok(())
}
