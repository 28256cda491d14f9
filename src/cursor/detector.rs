//! Per-tick cursor visibility decision
//!
//! Pure state machine: each call to [`CursorDetector::evaluate`] reads the
//! process query once and reports at most one visibility change. The
//! polling service calls it on its timer; tests call it directly.

use crate::core::normalize_process_name;
use crate::engine::ProcessQuery;

/// Cursor visibility as seen in the tracked game
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CursorVisibility {
    /// Cursor is free (menus, UI)
    Shown,
    /// Cursor is captured by the game
    Hidden,
}

/// Which foreground processes are tracked
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum CursorTarget {
    /// Nothing is tracked; every tick is a non-match
    #[default]
    None,
    Single(String),
    Whitelist(Vec<String>),
}

impl CursorTarget {
    /// Builds a target from raw process names, normalising each and
    /// dropping blanks.
    pub fn from_processes<I, S>(processes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = processes
            .into_iter()
            .map(|p| normalize_process_name(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        names.dedup();

        match names.len() {
            0 => CursorTarget::None,
            1 => CursorTarget::Single(names.remove(0)),
            _ => CursorTarget::Whitelist(names),
        }
    }

    /// Case-insensitive, `.exe`-agnostic process match.
    pub fn matches(&self, process_name: &str) -> bool {
        let process = normalize_process_name(process_name);
        if process.is_empty() {
            return false;
        }
        match self {
            CursorTarget::None => false,
            CursorTarget::Single(name) => normalize_process_name(name) == process,
            CursorTarget::Whitelist(names) => names.iter().any(|n| normalize_process_name(n) == process),
        }
    }
}

/// Tick state for cursor detection
#[derive(Clone, Debug)]
pub struct CursorDetector {
    target: CursorTarget,
    /// Held key forcing "hidden"; 0 disables
    override_key: u32,
    debug_log: bool,
    last_visible: bool,
    last_matched: bool,
}

impl CursorDetector {
    pub fn new(target: CursorTarget, override_key: u32, debug_log: bool) -> Self {
        Self {
            target,
            override_key,
            debug_log,
            last_visible: true,
            last_matched: false,
        }
    }

    /// Back to the start-of-run state: cursor assumed visible, no match yet.
    pub fn reset(&mut self) {
        self.last_visible = true;
        self.last_matched = false;
    }

    pub fn target(&self) -> &CursorTarget {
        &self.target
    }

    pub fn set_target(&mut self, target: CursorTarget) {
        self.target = target;
    }

    pub fn set_override_key(&mut self, vk_code: u32) {
        self.override_key = vk_code;
    }

    pub fn set_debug_log(&mut self, debug_log: bool) {
        self.debug_log = debug_log;
    }

    pub fn last_visible(&self) -> bool {
        self.last_visible
    }

    /// Runs one tick. Returns the change to report, if any.
    pub fn evaluate(&mut self, system: &dyn ProcessQuery) -> Option<CursorVisibility> {
        let process = system.foreground_process_name();

        if !self.target.matches(&process) {
            let left_target = self.last_matched && self.last_visible;
            self.last_matched = false;
            if left_target {
                // Switched away from the game with the cursor showing
                self.last_visible = false;
                if self.debug_log {
                    tracing::debug!(%process, "left tracked process; reporting hidden");
                }
                return Some(CursorVisibility::Hidden);
            }
            if self.debug_log {
                tracing::trace!(%process, "foreground not tracked");
            }
            return None;
        }
        self.last_matched = true;

        let confined = system.is_cursor_confined_to_center();
        let overridden = self.override_key != 0 && system.is_key_pressed(self.override_key);
        let visible = !confined && !overridden;

        if self.debug_log {
            tracing::debug!(%process, confined, overridden, visible, "cursor tick");
        }

        if visible == self.last_visible {
            return None;
        }
        self.last_visible = visible;

        Some(if visible {
            CursorVisibility::Shown
        } else {
            CursorVisibility::Hidden
        })
    }
}
