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

use super::MosaicStreamItemsProvider;
use std::collections::HashSet;
use videocall_layout_types::{StreamItem, StreamUi};

/// Default [`MosaicStreamItemsProvider`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MosaicStreamItems;

impl MosaicStreamItemsProvider for MosaicStreamItems {
    fn build_stream_items(&self, streams: &[StreamUi], max_streams: i32) -> Vec<StreamItem> {
        if streams.is_empty() || max_streams <= 0 {
            return Vec::new();
        }
        let max_streams = max_streams as usize;

        let (local, remote): (Vec<&StreamUi>, Vec<&StreamUi>) =
            streams.iter().partition(|s| s.is_mine);

        if streams.len() <= max_streams {
            return remote
                .into_iter()
                .chain(local)
                .cloned()
                .map(StreamItem::stream)
                .collect();
        }

        // One slot goes to the overflow tile. The local stream keeps the last
        // stream slot so the user always sees themselves.
        let slots = max_streams - 1;
        let visible_local = local.len().min(slots);
        let visible_remote = slots - visible_local;

        let visible: Vec<&StreamUi> = remote
            .iter()
            .take(visible_remote)
            .chain(local.iter().take(visible_local))
            .copied()
            .collect();
        let visible_ids: HashSet<&str> = visible.iter().map(|&s| s.id.as_str()).collect();

        let mut items: Vec<StreamItem> = visible
            .into_iter()
            .cloned()
            .map(StreamItem::stream)
            .collect();
        items.push(StreamItem::more_streams(
            streams.iter().filter(|s| !visible_ids.contains(s.id.as_str())),
        ));
        items
    }
}
