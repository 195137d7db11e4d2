/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Advisory messages from the layout engine to the user interface.
//!
//! The controller never acts on these itself. A host either hands the
//! controller a [`UserMessageBus`] and subscribes to it, or passes a
//! [`Callback`] that is invoked synchronously.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use videocall_layout::{StreamLayoutController, UserMessageBus};
//!
//! let bus = Arc::new(UserMessageBus::new());
//! let _messages = bus.subscribe();
//! let _controller = StreamLayoutController::new(bus.clone());
//! ```

use async_broadcast::{broadcast, InactiveReceiver, Receiver, Sender};
use serde::{Deserialize, Serialize};
use videocall_layout_types::Callback;

/// Capacity of the message bus channel. A subscriber that falls further
/// behind loses the oldest messages.
pub const MESSAGE_BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserMessage {
    /// A remote participant started sharing their screen while the layout is
    /// under manual control. The UI may offer to pin it, typically by calling
    /// `pin_stream(stream_id, true, true)`.
    PinScreenShare { stream_id: String, username: String },
}

/// Receives the controller's advisory messages. Must not block.
pub trait UserMessageSink: Send + Sync {
    fn send_user_message(&self, message: UserMessage);
}

impl UserMessageSink for Callback<UserMessage> {
    fn send_user_message(&self, message: UserMessage) {
        self.emit(message);
    }
}

/// Sink that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMessageSink;

impl UserMessageSink for NoopMessageSink {
    fn send_user_message(&self, _message: UserMessage) {}
}

/// Broadcast channel for [`UserMessage`]s. Every subscriber receives every
/// message sent after it subscribed.
pub struct UserMessageBus {
    sender: Sender<UserMessage>,
    // Keeps the channel open while nobody is subscribed.
    _inactive: InactiveReceiver<UserMessage>,
}

impl UserMessageBus {
    pub fn new() -> Self {
        let (mut sender, receiver) = broadcast(MESSAGE_BUS_CAPACITY);
        // Slow subscribers lose the oldest messages instead of blocking the sender.
        sender.set_overflow(true);
        Self {
            sender,
            _inactive: receiver.deactivate(),
        }
    }

    pub fn subscribe(&self) -> Receiver<UserMessage> {
        self.sender.new_receiver()
    }

    /// Non-blocking. Messages sent while nobody is subscribed are dropped.
    pub fn emit(&self, message: UserMessage) {
        let _ = self.sender.try_broadcast(message);
    }
}

impl Default for UserMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl UserMessageSink for UserMessageBus {
    fn send_user_message(&self, message: UserMessage) {
        self.emit(message);
    }
}
