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

//! Window behaviour: opacity and click-through applied to the overlay window
//!
//! `WindowBehavior` is the only writer of the window's opacity and
//! click-through style. It keeps two opacity values apart:
//!
//! - the user opacity, changed by the opacity actions and restored when
//!   click-through ends
//! - the click-through opacity, applied while effective click-through is on
//!
//! While click-through is effective, opacity actions adjust the user value
//! without touching the window, so the change shows up once it turns off.

use crate::core::WindowSettings;
use crate::window::click_through::ClickThroughState;

/// Upper bound for any opacity value
pub const MAX_OPACITY: f64 = 1.0;

/// The platform window the overlay draws into
pub trait WindowSurface {
    fn set_opacity(&mut self, opacity: f64);
    fn set_click_through(&mut self, enabled: bool);
    fn toggle_maximize(&mut self);
    fn toggle_visibility(&mut self);
}

/// Opacity and click-through controller for one window
pub struct WindowBehavior {
    surface: Box<dyn WindowSurface>,
    settings: WindowSettings,
    click_through: ClickThroughState,
    /// Opacity to show whenever click-through is not effective
    user_opacity: f64,
    /// Last values pushed to the surface
    applied_opacity: f64,
    applied_click_through: bool,
}

impl WindowBehavior {
    /// Wraps a surface and pushes the initial state to it.
    pub fn new(surface: Box<dyn WindowSurface>, settings: WindowSettings) -> Self {
        let user_opacity = clamp_opacity(settings.opacity, settings.min_opacity);
        let mut behavior = Self {
            surface,
            settings,
            click_through: ClickThroughState::new(),
            user_opacity,
            applied_opacity: user_opacity,
            applied_click_through: false,
        };
        behavior.surface.set_opacity(user_opacity);
        behavior.surface.set_click_through(false);
        behavior
    }

    pub fn click_through(&self) -> &ClickThroughState {
        &self.click_through
    }

    /// Opacity currently shown on the window.
    pub fn opacity(&self) -> f64 {
        self.applied_opacity
    }

    /// Opacity restored when click-through is not effective.
    pub fn user_opacity(&self) -> f64 {
        self.user_opacity
    }

    pub fn settings(&self) -> &WindowSettings {
        &self.settings
    }

    /// Swaps tuning values, keeping click-through flags.
    pub fn set_settings(&mut self, settings: WindowSettings) {
        self.user_opacity = clamp_opacity(self.user_opacity, settings.min_opacity);
        self.settings = settings;
        self.apply();
    }

    // ========================================================================
    // Click-through channels
    // ========================================================================

    /// ToggleClickThrough action. Returns the new manual flag.
    pub fn toggle_manual_click_through(&mut self) -> bool {
        let manual = self.click_through.toggle_manual();
        tracing::debug!(manual, "manual click-through toggled");
        self.apply();
        manual
    }

    pub fn set_manual_click_through(&mut self, value: bool) {
        self.click_through.set_manual(value);
        self.apply();
    }

    /// Auto channel, driven by cursor detection.
    pub fn set_auto_click_through(&mut self, value: bool) {
        self.click_through.set_auto(value);
        self.apply();
    }

    /// Clears the auto channel, e.g. when its plugin unloads.
    pub fn reset_auto_click_through(&mut self) {
        self.click_through.reset_auto();
        self.apply();
    }

    // ========================================================================
    // Opacity actions
    // ========================================================================

    pub fn increase_opacity(&mut self) {
        self.set_user_opacity(self.user_opacity + self.settings.opacity_step);
    }

    pub fn decrease_opacity(&mut self) {
        self.set_user_opacity(self.user_opacity - self.settings.opacity_step);
    }

    /// Back to the configured startup opacity.
    pub fn reset_opacity(&mut self) {
        self.set_user_opacity(self.settings.opacity);
    }

    fn set_user_opacity(&mut self, opacity: f64) {
        self.user_opacity = clamp_opacity(opacity, self.settings.min_opacity);
        tracing::debug!(opacity = self.user_opacity, "user opacity changed");
        self.apply();
    }

    // ========================================================================
    // Pass-through actions
    // ========================================================================

    pub fn toggle_maximize(&mut self) {
        self.surface.toggle_maximize();
    }

    pub fn toggle_visibility(&mut self) {
        self.surface.toggle_visibility();
    }

    /// Pushes whatever changed to the surface.
    fn apply(&mut self) {
        let effective = self.click_through.effective();
        let opacity = if effective {
            clamp_opacity(self.settings.click_through_opacity, self.settings.min_opacity)
        } else {
            self.user_opacity
        };

        if effective != self.applied_click_through {
            self.surface.set_click_through(effective);
            self.applied_click_through = effective;
            tracing::info!(
                effective,
                manual = self.click_through.manual(),
                auto = self.click_through.auto(),
                "click-through changed"
            );
        }

        if opacity != self.applied_opacity {
            self.surface.set_opacity(opacity);
            self.applied_opacity = opacity;
        }
    }
}

/// Clamps to `[min, 1.0]`, rounding away float drift from repeated steps.
fn clamp_opacity(opacity: f64, min: f64) -> f64 {
    let min = min.clamp(0.0, MAX_OPACITY);
    let rounded = (opacity * 1000.0).round() / 1000.0;
    rounded.clamp(min, MAX_OPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSurface, SurfaceCall};

    fn behavior() -> (WindowBehavior, RecordingSurface) {
        let surface = RecordingSurface::default();
        let behavior = WindowBehavior::new(Box::new(surface.clone()), WindowSettings::default());
        surface.clear();
        (behavior, surface)
    }

    #[test]
    fn test_new_pushes_initial_state() {
        let surface = RecordingSurface::default();
        let _behavior = WindowBehavior::new(Box::new(surface.clone()), WindowSettings::default());
        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::Opacity(1.0), SurfaceCall::ClickThrough(false)]
        );
    }

    #[test]
    fn test_opacity_steps_and_clamps() {
        let (mut behavior, _surface) = behavior();

        behavior.increase_opacity();
        assert_eq!(behavior.opacity(), 1.0);

        behavior.decrease_opacity();
        behavior.decrease_opacity();
        assert_eq!(behavior.opacity(), 0.8);

        for _ in 0..20 {
            behavior.decrease_opacity();
        }
        assert_eq!(behavior.opacity(), 0.1);

        behavior.reset_opacity();
        assert_eq!(behavior.opacity(), 1.0);
    }

    #[test]
    fn test_click_through_applies_dimmed_opacity_and_restores() {
        let (mut behavior, surface) = behavior();
        behavior.decrease_opacity();
        surface.clear();

        assert!(behavior.toggle_manual_click_through());
        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::ClickThrough(true), SurfaceCall::Opacity(0.5)]
        );

        surface.clear();
        assert!(!behavior.toggle_manual_click_through());
        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::ClickThrough(false), SurfaceCall::Opacity(0.9)]
        );
    }

    #[test]
    fn test_opacity_change_while_click_through_updates_restore_value() {
        let (mut behavior, surface) = behavior();
        behavior.set_auto_click_through(true);
        surface.clear();

        behavior.decrease_opacity();
        behavior.decrease_opacity();

        assert!(surface.calls().is_empty());
        assert_eq!(behavior.opacity(), 0.5);
        assert_eq!(behavior.user_opacity(), 0.8);

        behavior.set_auto_click_through(false);
        assert_eq!(behavior.opacity(), 0.8);
    }

    #[test]
    fn test_auto_does_not_undo_manual() {
        let (mut behavior, surface) = behavior();
        behavior.set_manual_click_through(true);
        behavior.set_auto_click_through(true);
        surface.clear();

        behavior.set_auto_click_through(false);
        assert!(behavior.click_through().effective());
        assert!(surface.calls().is_empty());

        behavior.set_auto_click_through(true);
        behavior.reset_auto_click_through();
        assert!(behavior.click_through().manual());
        assert!(behavior.click_through().effective());
    }

    #[test]
    fn test_surface_only_sees_effective_transitions() {
        let (mut behavior, surface) = behavior();

        behavior.set_auto_click_through(true);
        behavior.set_manual_click_through(true);
        behavior.set_auto_click_through(false);
        behavior.set_manual_click_through(false);

        let toggles: Vec<_> = surface
            .calls()
            .into_iter()
            .filter(|c| matches!(c, SurfaceCall::ClickThrough(_)))
            .collect();
        assert_eq!(
            toggles,
            vec![SurfaceCall::ClickThrough(true), SurfaceCall::ClickThrough(false)]
        );
    }

    #[test]
    fn test_pass_through_actions() {
        let (mut behavior, surface) = behavior();
        behavior.toggle_maximize();
        behavior.toggle_visibility();
        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::ToggleMaximize, SurfaceCall::ToggleVisibility]
        );
    }

    #[test]
    fn test_clamp_opacity() {
        assert_eq!(clamp_opacity(1.3, 0.1), 1.0);
        assert_eq!(clamp_opacity(-1.0, 0.1), 0.1);
        assert_eq!(clamp_opacity(0.7000000001, 0.1), 0.7);
        assert_eq!(clamp_opacity(0.05, 2.0), 1.0);
    }
}
