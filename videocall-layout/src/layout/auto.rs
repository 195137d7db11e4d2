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

//! Hands-off layout driven by call heuristics.

use super::{
    publish, run_layout, with_overflow_tile, InputSnapshot, LayoutInputs, LayoutKind, StreamLayout,
};
use crate::provider::{
    FeaturedStreamItems, FeaturedStreamItemsProvider, MosaicStreamItems, MosaicStreamItemsProvider,
};
use log::debug;
use std::cmp::Reverse;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use videocall_layout_types::{FeaturedState, StreamItem, StreamUi};

/// Layout that features a stream on its own in 1:1 calls and when a remote
/// participant shares their screen, and falls back to a mosaic otherwise.
pub struct AutoLayout {
    inputs: LayoutInputs,
    mosaic: Arc<dyn MosaicStreamItemsProvider>,
    featured: Arc<dyn FeaturedStreamItemsProvider>,
    // Serializes recomputations, which read the previously published items.
    refresh_lock: Mutex<()>,
    output: watch::Sender<Vec<StreamItem>>,
}

impl AutoLayout {
    pub fn new(inputs: LayoutInputs) -> Self {
        Self::with_providers(
            inputs,
            Arc::new(MosaicStreamItems),
            Arc::new(FeaturedStreamItems),
        )
    }

    pub fn with_providers(
        inputs: LayoutInputs,
        mosaic: Arc<dyn MosaicStreamItemsProvider>,
        featured: Arc<dyn FeaturedStreamItemsProvider>,
    ) -> Self {
        let (output, _) = watch::channel(Vec::new());
        let layout = Self {
            inputs,
            mosaic,
            featured,
            refresh_lock: Mutex::new(()),
            output,
        };
        layout.refresh();
        layout
    }

    fn build_stream_items(
        &self,
        inputs: &InputSnapshot,
        previous: &[StreamItem],
    ) -> Vec<StreamItem> {
        let constraints = &inputs.constraints;
        let streams = &inputs.streams;

        let showed_remote_screen_share = previous
            .iter()
            .filter_map(StreamItem::as_stream)
            .any(StreamUi::is_remote_screen_share);
        let remote_screen_shares = streams.iter().filter(|s| s.is_remote_screen_share()).count();
        let is_one_to_one = !inputs.settings.is_group_call && streams.len() <= 2;

        let use_featured = is_one_to_one
            || remote_screen_shares == 1
            || (remote_screen_shares > 1 && showed_remote_screen_share);

        let items = if use_featured {
            // Keep whichever screen share is already featured so a new share
            // does not take over the stage.
            let featured_screen_share = previous
                .iter()
                .filter(|item| item.is_featured())
                .filter_map(StreamItem::as_stream)
                .find(|s| s.is_remote_screen_share() || s.is_local_screen_share())
                .map(|s| s.id.clone());

            let mut sorted = streams.clone();
            sorted.sort_by_key(|s| {
                Reverse((
                    featured_screen_share.as_deref() == Some(s.id.as_str()),
                    s.is_remote_screen_share(),
                    s.is_my_camera_stream() && inputs.settings.default_camera_is_back,
                    s.is_remote_camera_stream(),
                ))
            });

            let featured_ids: Vec<String> = if constraints.featured_stream_threshold >= 1 {
                sorted.first().map(|s| s.id.clone()).into_iter().collect()
            } else {
                Vec::new()
            };
            self.featured.build_stream_items(
                &sorted,
                &featured_ids,
                constraints.thumbnail_stream_threshold.max(0),
                FeaturedState::Plain,
            )
        } else {
            self.mosaic
                .build_stream_items(streams, constraints.mosaic_stream_threshold.max(0))
        };
        with_overflow_tile(items, constraints.overflow_tile)
    }

    /// Keep the items up to date until the input source is dropped.
    pub async fn run(&self) {
        run_layout(self, &self.inputs).await
    }
}

impl StreamLayout for AutoLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Auto
    }

    fn stream_items(&self) -> watch::Receiver<Vec<StreamItem>> {
        self.output.subscribe()
    }

    fn current_stream_items(&self) -> Vec<StreamItem> {
        self.output.borrow().clone()
    }

    fn refresh(&self) -> bool {
        let _guard = self.refresh_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let inputs = self.inputs.snapshot();
        let previous = self.current_stream_items();
        let items = self.build_stream_items(&inputs, &previous);
        debug!("Auto layout recomputed {} items", items.len());
        publish(&self.output, items)
    }
}
