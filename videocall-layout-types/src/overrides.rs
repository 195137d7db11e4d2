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
 */

//! Environment overrides for layout thresholds.
//!
//! Useful for kiosks, room systems and QA builds that want a fixed number of
//! tiles regardless of the window size reported by the UI. Overrides are read
//! from environment variables with the `STREAM_LAYOUT_` prefix:
//!
//! - `STREAM_LAYOUT_MOSAIC_THRESHOLD`
//! - `STREAM_LAYOUT_FEATURED_THRESHOLD`
//! - `STREAM_LAYOUT_THUMBNAIL_THRESHOLD`

use crate::config::{ConfigError, StreamLayoutConstraints};
use log::warn;
use std::sync::OnceLock;

/// Environment variable prefix for layout overrides
const ENV_PREFIX: &str = "STREAM_LAYOUT_";

const MOSAIC: &str = "MOSAIC_THRESHOLD";
const FEATURED: &str = "FEATURED_THRESHOLD";
const THUMBNAIL: &str = "THUMBNAIL_THRESHOLD";

/// Thresholds forced by the environment. `None` leaves the host's value alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConstraintOverrides {
    pub mosaic_stream_threshold: Option<i32>,
    pub featured_stream_threshold: Option<i32>,
    pub thumbnail_stream_threshold: Option<i32>,
}

impl ConstraintOverrides {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup`, which maps a full variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            mosaic_stream_threshold: read_threshold(&lookup, MOSAIC)?,
            featured_stream_threshold: read_threshold(&lookup, FEATURED)?,
            thumbnail_stream_threshold: read_threshold(&lookup, THUMBNAIL)?,
        })
    }

    /// Process-wide overrides, read once on first access.
    /// Malformed values are logged and ignored.
    pub fn global() -> &'static Self {
        static OVERRIDES: OnceLock<ConstraintOverrides> = OnceLock::new();
        OVERRIDES.get_or_init(|| {
            Self::from_env().unwrap_or_else(|e| {
                warn!("Ignoring stream layout overrides: {e}");
                Self::default()
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Replace the thresholds that are overridden, keep the rest.
    pub fn apply(&self, constraints: StreamLayoutConstraints) -> StreamLayoutConstraints {
        StreamLayoutConstraints {
            mosaic_stream_threshold: self
                .mosaic_stream_threshold
                .unwrap_or(constraints.mosaic_stream_threshold),
            featured_stream_threshold: self
                .featured_stream_threshold
                .unwrap_or(constraints.featured_stream_threshold),
            thumbnail_stream_threshold: self
                .thumbnail_stream_threshold
                .unwrap_or(constraints.thumbnail_stream_threshold),
            overflow_tile: constraints.overflow_tile,
        }
    }
}

fn read_threshold<F>(lookup: &F, name: &str) -> Result<Option<i32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let full_name = format!("{ENV_PREFIX}{name}");
    match lookup(&full_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidThreshold {
                name: full_name,
                value,
            }),
    }
}
