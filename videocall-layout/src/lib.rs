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

//! This crate decides how the participants' streams of a call are arranged on screen: which
//! streams are featured, pinned or fullscreen, which are shown as thumbnails and which are
//! collapsed into a "more participants" tile.
//!
//! It makes no assumptions about the UI toolkit. The host pushes the current streams,
//! constraints and settings in, and observes an ordered list of [`StreamItem`]s to render.
//!
//! # Outline of usage
//!
//! For more detailed documentation see the doc for each struct.
//!
//! ## Controller creation:
//! ```
//! use std::sync::Arc;
//! use videocall_layout::{StreamLayoutController, UserMessageBus};
//! use videocall_layout_types::{StreamLayoutConstraints, WindowSizeClass};
//!
//! let bus = Arc::new(UserMessageBus::new());
//! let controller = StreamLayoutController::new(bus.clone());
//! controller.apply_constraints(StreamLayoutConstraints::for_window(WindowSizeClass::Compact));
//! ```
//!
//! ## Feeding streams and pinning:
//! ```
//! # use std::sync::Arc;
//! # use videocall_layout::{NoopMessageSink, StreamLayoutController};
//! # use videocall_layout_types::{StreamLayoutConstraints, StreamUi, UserInfo};
//! # let controller = StreamLayoutController::new(Arc::new(NoopMessageSink));
//! # controller.apply_constraints(StreamLayoutConstraints::new(8, 2, 3));
//! controller.apply_streams(vec![
//!     StreamUi::new("1", UserInfo::new("alice", "Alice")),
//!     StreamUi::new("2", UserInfo::new("bob", "Bob")),
//! ]);
//! assert!(controller.pin_stream("2", false, false));
//! assert!(controller.current_stream_items()[0].is_pinned());
//! ```
//!
//! ## Observing the result:
//! ```no_run
//! # use videocall_layout::StreamLayoutController;
//! # async fn observe(controller: StreamLayoutController) {
//! let mut items = controller.stream_items();
//! while items.changed().await.is_ok() {
//!     let _to_render = items.borrow_and_update().clone();
//! }
//! # }
//! ```

pub mod controller;
pub mod error;
pub mod layout;
pub mod messages;
pub mod provider;

pub use controller::StreamLayoutController;
pub use error::PinError;
pub use layout::{
    AutoLayout, LayoutInputSource, LayoutInputs, LayoutKind, ManualLayout, StreamLayout,
};
pub use messages::{
    NoopMessageSink, UserMessage, UserMessageBus, UserMessageSink, MESSAGE_BUS_CAPACITY,
};
pub use provider::{
    FeaturedStreamItems, FeaturedStreamItemsProvider, MosaicStreamItems, MosaicStreamItemsProvider,
};
pub use videocall_layout_types::{StreamItem, StreamItemState};
