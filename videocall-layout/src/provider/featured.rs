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

use super::{split_visible, FeaturedStreamItemsProvider};
use std::collections::HashSet;
use videocall_layout_types::{FeaturedState, StreamItem, StreamUi};

/// Default [`FeaturedStreamItemsProvider`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FeaturedStreamItems;

impl FeaturedStreamItemsProvider for FeaturedStreamItems {
    fn build_stream_items(
        &self,
        streams: &[StreamUi],
        featured_stream_ids: &[String],
        max_non_featured_streams: i32,
        featured_state: FeaturedState,
    ) -> Vec<StreamItem> {
        if featured_stream_ids.is_empty() || max_non_featured_streams < 0 {
            return Vec::new();
        }

        // Resolve in the order of `featured_stream_ids`, first occurrence wins.
        let mut featured_ids: HashSet<&str> = HashSet::new();
        let featured: Vec<&StreamUi> = featured_stream_ids
            .iter()
            .map(String::as_str)
            .filter(|&id| featured_ids.insert(id))
            .filter_map(|id| streams.iter().find(|s| s.id == id))
            .collect();

        let non_featured: Vec<&StreamUi> = streams
            .iter()
            .filter(|s| !featured_ids.contains(s.id.as_str()))
            .collect();

        let (visible, remaining) = match max_non_featured_streams as usize {
            0 => (Vec::new(), Vec::new()),
            max => split_visible(non_featured, max),
        };

        let mut items: Vec<StreamItem> = featured
            .into_iter()
            .map(|s| StreamItem::featured(s.clone(), featured_state))
            .chain(visible.into_iter().cloned().map(StreamItem::stream))
            .collect();
        if !remaining.is_empty() {
            items.push(StreamItem::more_streams(remaining));
        }
        items
    }
}
