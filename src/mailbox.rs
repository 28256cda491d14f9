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

//! UI-context mailbox
//!
//! Single-consumer message queue between background producers (the OS input
//! hook thread and the cursor polling thread) and the UI context that owns
//! all mutable application state.
//!
//! Producers only ever enqueue: `UiSender::post` never blocks and never
//! waits for the message to be handled, so a hook callback returns to the
//! OS immediately.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::cursor::CursorChange;
use crate::engine::HotkeyEvent;

/// Messages handled on the UI context
#[derive(Clone, Debug, PartialEq)]
pub enum UiMessage {
    /// A key or side-button press captured by the input hook
    Hotkey(HotkeyEvent),
    /// A cursor visibility change from the detection service
    Cursor(CursorChange),
    /// Config file on disk changed
    ConfigChanged,
}

/// Cloneable producer handle
#[derive(Clone, Debug)]
pub struct UiSender {
    tx: Sender<UiMessage>,
}

impl UiSender {
    /// Enqueues a message. Returns false if the UI side has gone away.
    pub fn post(&self, message: UiMessage) -> bool {
        self.tx.send(message).is_ok()
    }
}

/// Consumer side, owned by the UI context
#[derive(Debug)]
pub struct UiMailbox {
    rx: Receiver<UiMessage>,
}

impl UiMailbox {
    /// Creates a connected sender/mailbox pair.
    pub fn new() -> (UiSender, UiMailbox) {
        let (tx, rx) = channel();
        (UiSender { tx }, UiMailbox { rx })
    }

    /// Next pending message without blocking.
    pub fn try_next(&self) -> Option<UiMessage> {
        match self.rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Waits up to `timeout` for the next message.
    pub fn next_timeout(&self, timeout: Duration) -> Option<UiMessage> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Takes every message queued so far, in arrival order.
    pub fn drain(&self) -> Vec<UiMessage> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InputType, Modifiers};
    use crate::cursor::CursorVisibility;

    #[test]
    fn test_drain_preserves_order() {
        let (tx, mailbox) = UiMailbox::new();
        let event = HotkeyEvent {
            input_type: InputType::Keyboard,
            key: 0x41,
            modifiers: Modifiers::CTRL,
        };

        let hidden = CursorChange {
            visibility: CursorVisibility::Hidden,
            session: 1,
        };

        assert!(tx.post(UiMessage::Hotkey(event)));
        assert!(tx.post(UiMessage::Cursor(hidden)));

        assert_eq!(
            mailbox.drain(),
            vec![UiMessage::Hotkey(event), UiMessage::Cursor(hidden)]
        );
        assert!(mailbox.try_next().is_none());
    }

    #[test]
    fn test_post_from_other_thread() {
        let (tx, mailbox) = UiMailbox::new();
        let handle = std::thread::spawn(move || tx.post(UiMessage::ConfigChanged));

        assert!(handle.join().unwrap());
        assert_eq!(
            mailbox.next_timeout(Duration::from_secs(1)),
            Some(UiMessage::ConfigChanged)
        );
    }

    #[test]
    fn test_post_after_mailbox_dropped() {
        let (tx, mailbox) = UiMailbox::new();
        drop(mailbox);
        assert!(!tx.post(UiMessage::ConfigChanged));
    }
}
