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

//! Layout constraints and settings.
//!
//! Constraints describe how much room the host has (how many streams fit in a
//! mosaic, how many can be pinned, how many thumbnails fit next to featured
//! content). Settings describe the call itself. Both are plain values that the
//! host pushes into the layout engine whenever they change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_THUMBNAIL_STREAMS: i32 = 3;
pub const MAX_MOSAIC_STREAMS_COMPACT: i32 = 8;
pub const MAX_MOSAIC_STREAMS_EXPANDED: i32 = 15;
pub const MAX_PINNED_STREAMS_COMPACT: i32 = 2;
pub const MAX_PINNED_STREAMS_EXPANDED: i32 = 6;

pub const PIP_MOSAIC_STREAMS: i32 = 2;
pub const PIP_PINNED_STREAMS: i32 = 2;
pub const PIP_THUMBNAIL_STREAMS: i32 = 0;

/// Errors raised while loading layout configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment override is set but is not an integer.
    #[error("invalid value for {name}: {value:?} is not an integer")]
    InvalidThreshold { name: String, value: String },

    /// A JSON document could not be decoded.
    #[error("invalid layout configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the overflow tile is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowTile {
    /// Regular "+N participants" tile.
    #[default]
    MoreStreams,
    /// Compact tile for picture-in-picture windows.
    HiddenStreams,
}

/// Coarse window size, used to pick constraint presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowSizeClass {
    /// Compact in at least one dimension (phones, split screen).
    Compact,
    Expanded,
}

/// Size limits for the layout.
///
/// Zero or negative thresholds are accepted and mean "show nothing" for the
/// corresponding slot kind. The default is all zeros: nothing is rendered until
/// the host applies real constraints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamLayoutConstraints {
    /// Maximum number of tiles in the mosaic arrangement.
    pub mosaic_stream_threshold: i32,
    /// Maximum number of featured (pinned) streams.
    pub featured_stream_threshold: i32,
    /// Maximum number of thumbnails next to featured content.
    pub thumbnail_stream_threshold: i32,
    pub overflow_tile: OverflowTile,
}

impl StreamLayoutConstraints {
    pub fn new(mosaic: i32, featured: i32, thumbnail: i32) -> Self {
        Self {
            mosaic_stream_threshold: mosaic,
            featured_stream_threshold: featured,
            thumbnail_stream_threshold: thumbnail,
            overflow_tile: OverflowTile::MoreStreams,
        }
    }

    /// Preset for a regular call window of the given size class.
    pub fn for_window(size_class: WindowSizeClass) -> Self {
        match size_class {
            WindowSizeClass::Compact => Self::new(
                MAX_MOSAIC_STREAMS_COMPACT,
                MAX_PINNED_STREAMS_COMPACT,
                MAX_THUMBNAIL_STREAMS,
            ),
            WindowSizeClass::Expanded => Self::new(
                MAX_MOSAIC_STREAMS_EXPANDED,
                MAX_PINNED_STREAMS_EXPANDED,
                MAX_THUMBNAIL_STREAMS,
            ),
        }
    }

    /// Preset for picture-in-picture.
    pub fn pip() -> Self {
        Self {
            overflow_tile: OverflowTile::HiddenStreams,
            ..Self::new(PIP_MOSAIC_STREAMS, PIP_PINNED_STREAMS, PIP_THUMBNAIL_STREAMS)
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Call metadata consumed by the automatic layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamLayoutSettings {
    pub is_group_call: bool,
    /// The local camera starts on the back lens, so it is usually showing
    /// something the remote side should see.
    pub default_camera_is_back: bool,
}

impl StreamLayoutSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
