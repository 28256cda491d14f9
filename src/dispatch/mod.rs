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

//! Action dispatcher
//!
//! A registry mapping case-insensitive action names to zero or more
//! subscribed handlers. Dispatching an action invokes every handler
//! subscribed to it; dispatching a name that was never registered is a
//! no-op that reports `false`.
//!
//! The dispatcher lives on the UI context and is not `Send`: handlers
//! typically capture `Rc<RefCell<_>>` handles to UI-owned collaborators.
//!
//! # Example
//! ```
//! use overlay_hotkeys::dispatch::ActionDispatcher;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut dispatcher = ActionDispatcher::new();
//! let count = Rc::new(Cell::new(0));
//!
//! let seen = Rc::clone(&count);
//! dispatcher.subscribe("ResetOpacity", move || seen.set(seen.get() + 1));
//!
//! assert!(dispatcher.dispatch("RESETOPACITY"));
//! assert!(!dispatcher.dispatch("NoSuchAction"));
//! assert_eq!(count.get(), 1);
//! ```

use std::collections::HashMap;

pub use crate::core::actions;

/// A subscribed action handler.
pub type ActionHandler = Box<dyn Fn()>;

struct RegisteredAction {
    /// Spelling used when the action was first registered
    display_name: String,
    handlers: Vec<ActionHandler>,
}

/// Case-insensitive action registry
pub struct ActionDispatcher {
    /// Keyed by lowercased action name
    actions: HashMap<String, RegisteredAction>,
}

fn registry_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ActionDispatcher {
    /// Creates a dispatcher with every built-in action registered (no handlers yet).
    pub fn new() -> Self {
        let mut dispatcher = Self::empty();
        for name in actions::BUILTIN_ACTIONS {
            dispatcher.register_action(name);
        }
        dispatcher
    }

    /// Creates a dispatcher with no actions at all.
    pub fn empty() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Registers an action name. Returns false if it already existed (any casing).
    pub fn register_action(&mut self, name: &str) -> bool {
        let key = registry_key(name);
        if key.is_empty() || self.actions.contains_key(&key) {
            return false;
        }
        tracing::debug!(action = name, "registered action");
        self.actions.insert(
            key,
            RegisteredAction {
                display_name: name.trim().to_string(),
                handlers: Vec::new(),
            },
        );
        true
    }

    /// Removes an action and all of its handlers. Returns false if it was not registered.
    pub fn unregister_action(&mut self, name: &str) -> bool {
        let removed = self.actions.remove(&registry_key(name)).is_some();
        if removed {
            tracing::debug!(action = name, "unregistered action");
        }
        removed
    }

    /// Subscribes a handler, registering the action first if needed.
    pub fn subscribe<F>(&mut self, name: &str, handler: F)
    where
        F: Fn() + 'static,
    {
        self.register_action(name);
        if let Some(action) = self.actions.get_mut(&registry_key(name)) {
            action.handlers.push(Box::new(handler));
        }
    }

    /// Drops every handler of an action but keeps the action registered.
    pub fn clear_handlers(&mut self, name: &str) {
        if let Some(action) = self.actions.get_mut(&registry_key(name)) {
            action.handlers.clear();
        }
    }

    /// Pure case-insensitive existence check.
    pub fn is_action_registered(&self, name: &str) -> bool {
        self.actions.contains_key(&registry_key(name))
    }

    /// Number of handlers subscribed to an action (0 if unknown).
    pub fn handler_count(&self, name: &str) -> usize {
        self.actions
            .get(&registry_key(name))
            .map(|action| action.handlers.len())
            .unwrap_or(0)
    }

    /// Invokes every handler of `name`.
    ///
    /// Returns true iff the action is registered, even when it has no
    /// handlers. Unknown names are a silent no-op returning false.
    pub fn dispatch(&self, name: &str) -> bool {
        match self.actions.get(&registry_key(name)) {
            Some(action) => {
                tracing::debug!(
                    action = %action.display_name,
                    handlers = action.handlers.len(),
                    "dispatching action"
                );
                for handler in &action.handlers {
                    handler();
                }
                true
            }
            None => {
                tracing::debug!(action = name, "no such action");
                false
            }
        }
    }

    /// Registered action names in their original spelling, sorted.
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .actions
            .values()
            .map(|action| action.display_name.as_str())
            .collect();
        names.sort_by_key(|name| name.to_lowercase());
        names
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
