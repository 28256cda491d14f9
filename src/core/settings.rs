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

//! Configuration root
//!
//! `Config` owns every profile plus the tuning sections consumed by the
//! window, playback, and cursor-detection collaborators. Every field has a
//! default so a partially written file still loads.

use serde::{Deserialize, Serialize};

use crate::core::types::{normalize_process_name, Binding, Profile, VK_MENU};

/// Top-level configuration document
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub profiles: Vec<Profile>,

    /// Profile used when no process filter matches (falls back to the first profile)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    pub cursor_detection: CursorDetectionSettings,
    pub window: WindowSettings,
    pub playback: PlaybackSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profiles: vec![Profile::builtin_default()],
            default_profile: None,
            cursor_detection: CursorDetectionSettings::default(),
            window: WindowSettings::default(),
            playback: PlaybackSettings::default(),
        }
    }
}

impl Config {
    /// Resolves the profile for the given foreground process.
    ///
    /// Resolution order:
    /// 1. First profile whose process filter contains the process
    /// 2. The profile named by `default_profile` (case-insensitive)
    /// 3. The first profile
    ///
    /// Returns `None` only when there are no profiles at all.
    pub fn active_profile(&self, process_name: &str) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.matches_process(process_name))
            .or_else(|| self.fallback_profile())
    }

    fn fallback_profile(&self) -> Option<&Profile> {
        self.default_profile
            .as_deref()
            .and_then(|name| self.profile(name))
            .or_else(|| self.profiles.first())
    }

    /// Looks up a profile by name (case-insensitive).
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        let wanted = name.to_lowercase();
        self.profiles.iter().find(|p| p.name.to_lowercase() == wanted)
    }

    /// Every binding across every profile, in profile order.
    pub fn all_bindings(&self) -> impl Iterator<Item = &Binding> {
        self.profiles.iter().flat_map(|p| p.bindings.iter())
    }

    /// Replaces an empty profile list with the built-in default profile.
    pub fn ensure_profile(&mut self) {
        if self.profiles.is_empty() {
            self.profiles.push(Profile::builtin_default());
        }
    }
}

/// Cursor-visibility detection tuning
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CursorDetectionSettings {
    pub enabled: bool,

    /// Game processes whose cursor capture drives the auto click-through channel
    pub process_whitelist: Vec<String>,

    /// Polling interval (clamped to a 50ms minimum at start)
    pub interval_ms: u64,

    /// Log every tick decision
    pub debug_log: bool,

    /// Held key that forces "cursor hidden" (0 disables the override)
    pub override_key: u32,
}

impl Default for CursorDetectionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            process_whitelist: Vec::new(),
            interval_ms: 100,
            debug_log: false,
            override_key: VK_MENU,
        }
    }
}

impl CursorDetectionSettings {
    /// Whitelist entries normalised for comparison, blanks dropped.
    pub fn normalized_whitelist(&self) -> Vec<String> {
        self.process_whitelist
            .iter()
            .map(|p| normalize_process_name(p))
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Window opacity tuning
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowSettings {
    /// Opacity at startup and after ResetOpacity
    pub opacity: f64,
    pub opacity_step: f64,
    pub min_opacity: f64,

    /// Opacity applied while click-through is in effect
    pub click_through_opacity: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            opacity_step: 0.1,
            min_opacity: 0.1,
            click_through_opacity: 0.5,
        }
    }
}

/// Playback tuning
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackSettings {
    pub seek_seconds: f64,
    pub rate_step: f64,
    pub min_rate: f64,
    pub max_rate: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            seek_seconds: 5.0,
            rate_step: 0.25,
            min_rate: 0.25,
            max_rate: 4.0,
        }
    }
}
