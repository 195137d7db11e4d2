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

//! Pure functions turning a stream list into ordered [`StreamItem`]s.
//!
//! Providers hold no state; layouts decide *which* provider to call and with
//! which limits, providers decide *how* the items are ordered and where the
//! overflow tile goes.

mod featured;
mod mosaic;

pub use featured::FeaturedStreamItems;
pub use mosaic::MosaicStreamItems;

use videocall_layout_types::{FeaturedState, StreamItem, StreamUi};

/// Builds an arrangement with no featured distinction.
pub trait MosaicStreamItemsProvider: Send + Sync {
    /// At most `max_streams` items; the local stream is placed last among the
    /// visible ones and overflow is summarized in a trailing `MoreStreams` tile.
    fn build_stream_items(&self, streams: &[StreamUi], max_streams: i32) -> Vec<StreamItem>;
}

/// Builds an arrangement where some streams are featured.
pub trait FeaturedStreamItemsProvider: Send + Sync {
    /// Featured streams first, in `featured_stream_ids` order, followed by up to
    /// `max_non_featured_streams` slots for the rest.
    fn build_stream_items(
        &self,
        streams: &[StreamUi],
        featured_stream_ids: &[String],
        max_non_featured_streams: i32,
        featured_state: FeaturedState,
    ) -> Vec<StreamItem>;
}

/// Splits `candidates` into the ones that fit in `max_slots` and the overflow.
///
/// When everything fits there is no overflow. Otherwise one slot is reserved
/// for the overflow tile, so only `max_slots - 1` candidates stay visible.
fn split_visible<T>(candidates: Vec<T>, max_slots: usize) -> (Vec<T>, Vec<T>) {
    if candidates.len() <= max_slots {
        return (candidates, Vec::new());
    }
    let mut visible = candidates;
    let overflow = visible.split_off(max_slots.saturating_sub(1));
    (visible, overflow)
}
