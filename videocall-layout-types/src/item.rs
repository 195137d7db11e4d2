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

//! Renderable slots produced by a stream layout.

use crate::stream::StreamUi;
use serde::{Deserialize, Serialize};

/// Id of the trailing "more participants" tile.
pub const MORE_STREAMS_ITEM_ID: &str = "more_streams";

/// Id of the overflow tile used in picture-in-picture.
pub const HIDDEN_STREAMS_ITEM_ID: &str = "hidden_streams";

/// Flavour of a featured (prominently placed) stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeaturedState {
    /// Featured by the automatic layout heuristics.
    Plain,
    /// Pinned by the user (or on their behalf).
    Pinned,
    /// Occupies the whole viewport.
    Fullscreen,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamItemState {
    #[default]
    Standard,
    Featured(FeaturedState),
}

impl StreamItemState {
    pub fn is_featured(&self) -> bool {
        matches!(self, StreamItemState::Featured(_))
    }
}

/// Preview of a participant collapsed into an overflow tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoreStreamsUserPreview {
    /// Id of the collapsed stream.
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<&StreamUi> for MoreStreamsUserPreview {
    fn from(stream: &StreamUi) -> Self {
        Self {
            id: stream.id.clone(),
            username: stream.username().to_string(),
            avatar: stream.avatar().map(str::to_string),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamItem {
    Stream {
        id: String,
        stream: StreamUi,
        state: StreamItemState,
    },
    MoreStreams {
        users: Vec<MoreStreamsUserPreview>,
    },
    HiddenStreams {
        users: Vec<MoreStreamsUserPreview>,
    },
}

impl StreamItem {
    /// A `Standard` item for `stream`.
    pub fn stream(stream: StreamUi) -> Self {
        Self::with_state(stream, StreamItemState::Standard)
    }

    pub fn featured(stream: StreamUi, state: FeaturedState) -> Self {
        Self::with_state(stream, StreamItemState::Featured(state))
    }

    pub fn with_state(stream: StreamUi, state: StreamItemState) -> Self {
        StreamItem::Stream {
            id: stream.id.clone(),
            stream,
            state,
        }
    }

    /// Overflow tile summarizing `streams`.
    pub fn more_streams<'a>(streams: impl IntoIterator<Item = &'a StreamUi>) -> Self {
        StreamItem::MoreStreams {
            users: streams.into_iter().map(MoreStreamsUserPreview::from).collect(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            StreamItem::Stream { id, .. } => id,
            StreamItem::MoreStreams { .. } => MORE_STREAMS_ITEM_ID,
            StreamItem::HiddenStreams { .. } => HIDDEN_STREAMS_ITEM_ID,
        }
    }

    pub fn state(&self) -> Option<StreamItemState> {
        match self {
            StreamItem::Stream { state, .. } => Some(*state),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&StreamUi> {
        match self {
            StreamItem::Stream { stream, .. } => Some(stream),
            _ => None,
        }
    }

    pub fn is_featured(&self) -> bool {
        self.state().is_some_and(|state| state.is_featured())
    }

    pub fn is_pinned(&self) -> bool {
        self.state() == Some(StreamItemState::Featured(FeaturedState::Pinned))
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state() == Some(StreamItemState::Featured(FeaturedState::Fullscreen))
    }

    /// Turns a `MoreStreams` tile into its picture-in-picture counterpart.
    pub fn into_hidden(self) -> Self {
        match self {
            StreamItem::MoreStreams { users } => StreamItem::HiddenStreams { users },
            other => other,
        }
    }
}
