//! OS query collaborators
//!
//! The engine and the cursor detection service never call platform APIs
//! directly. They go through these traits so the platform layer can be
//! swapped (or faked in tests).

use crate::core::Modifiers;

/// Foreground-process, keyboard, and cursor queries
///
/// Called from the hook thread (modifier mask only), the cursor polling
/// thread, and the UI context, hence `Send + Sync`.
pub trait ProcessQuery: Send + Sync {
    /// Executable name of the process owning the foreground window (empty if unknown).
    fn foreground_process_name(&self) -> String;

    /// Modifier keys currently held down.
    fn modifier_mask(&self) -> Modifiers;

    /// True while the OS cursor is clipped to a small region (game has captured it).
    fn is_cursor_confined_to_center(&self) -> bool;

    /// True while the given virtual key is held down.
    fn is_key_pressed(&self, vk_code: u32) -> bool;
}

/// Text-entry focus query, answered on the UI context
pub trait FocusQuery {
    /// True if keyboard focus is in a text box, where typing must not trigger shortcuts.
    fn is_text_input_focused(&self) -> bool;
}

/// A focus query for embeddings with no text inputs.
pub struct NoTextInput;

impl FocusQuery for NoTextInput {
    fn is_text_input_focused(&self) -> bool {
        false
    }
}
