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

//! File system watcher for live config file monitoring
//!
//! Uses OS-level file watching via the notify crate. The parent directory
//! is watched rather than the file itself, since atomic saves replace the
//! file with a new inode.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::mpsc::{channel, Receiver},
};

use crate::config::ConfigError;
use crate::mailbox::{UiMessage, UiSender};

/// Watches the config file for modifications
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: Option<Receiver<notify::Result<Event>>>,
    file_name: OsString,
}

fn is_change_to(event: &Event, file_name: &OsString) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

fn split_path(path: &Path) -> Result<(PathBuf, OsString), ConfigError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ConfigError::InvalidPath(path.to_path_buf()))?
        .to_os_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}

impl ConfigWatcher {
    /// Watches `path`; poll with [`check_for_changes`](Self::check_for_changes).
    pub fn new(path: &Path) -> Result<Self, ConfigError> {
        let (dir, file_name) = split_path(path)?;
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx: Some(rx),
            file_name,
        })
    }

    /// Watches `path` and posts `UiMessage::ConfigChanged` for every change.
    ///
    /// The message is posted from notify's thread; nothing is queued here.
    pub fn forward_to(path: &Path, ui: UiSender) -> Result<Self, ConfigError> {
        let (dir, file_name) = split_path(path)?;
        let watched = file_name.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_change_to(&event, &watched) => {
                    ui.post(UiMessage::ConfigChanged);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "config watch error"),
            },
            notify::Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::debug!(dir = %dir.display(), "watching config directory");
        Ok(Self {
            _watcher: watcher,
            rx: None,
            file_name,
        })
    }

    /// Checks for file modification events (non-blocking)
    ///
    /// Always false for watchers created with [`forward_to`](Self::forward_to).
    pub fn check_for_changes(&self) -> bool {
        let Some(rx) = &self.rx else {
            return false;
        };

        let mut changed = false;
        while let Ok(event_result) = rx.try_recv() {
            match event_result {
                Ok(event) => changed |= is_change_to(&event, &self.file_name),
                Err(e) => tracing::warn!(error = %e, "config watch error"),
            }
        }
        changed
    }
}
