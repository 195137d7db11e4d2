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

//! User-driven layout: pinned streams and a fullscreen stream.

use super::{
    publish, run_layout, with_overflow_tile, InputSnapshot, LayoutInputs, LayoutKind, StreamLayout,
};
use crate::error::PinError;
use crate::provider::{
    FeaturedStreamItems, FeaturedStreamItemsProvider, MosaicStreamItems, MosaicStreamItemsProvider,
};
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use videocall_layout_types::{FeaturedState, StreamItem};

#[derive(Debug, Default)]
struct ManualState {
    pinned: Vec<String>,
    fullscreen: Option<String>,
}

impl ManualState {
    /// Drop references to streams that are gone and pins above the limit.
    fn reconcile(&mut self, inputs: &InputSnapshot) {
        let is_present = |id: &str| inputs.streams.iter().any(|s| s.id == id);
        self.pinned.retain(|id| is_present(id.as_str()));
        self.pinned
            .truncate(inputs.constraints.featured_stream_threshold.max(0) as usize);
        if self.fullscreen.as_deref().is_some_and(|id| !is_present(id)) {
            self.fullscreen = None;
        }
    }
}

/// Layout where the user decides what is featured.
///
/// Rendering precedence is fullscreen, then pinned streams, then a plain
/// mosaic. Pins survive fullscreen and come back once it is cleared.
pub struct ManualLayout {
    inputs: LayoutInputs,
    mosaic: Arc<dyn MosaicStreamItemsProvider>,
    featured: Arc<dyn FeaturedStreamItemsProvider>,
    state: Mutex<ManualState>,
    output: watch::Sender<Vec<StreamItem>>,
}

impl ManualLayout {
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
            state: Mutex::new(ManualState::default()),
            output,
        };
        layout.refresh();
        layout
    }

    fn state(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pin `stream_id`, at the front when `prepend` is set.
    ///
    /// With `force` a pin at the limit evicts another one: the oldest pin when
    /// appending, the last one when prepending.
    pub fn try_pin_stream(
        &self,
        stream_id: &str,
        prepend: bool,
        force: bool,
    ) -> Result<(), PinError> {
        let inputs = self.inputs.snapshot();
        {
            let mut state = self.state();
            state.reconcile(&inputs);

            let threshold = inputs.constraints.featured_stream_threshold;
            if threshold < 1 {
                return Err(PinError::PinningDisabled);
            }
            if !inputs.streams.iter().any(|s| s.id == stream_id) {
                return Err(PinError::StreamNotFound(stream_id.to_string()));
            }
            if state.pinned.iter().any(|id| id == stream_id) {
                return Err(PinError::AlreadyPinned(stream_id.to_string()));
            }
            let limit = threshold as usize;
            if state.pinned.len() >= limit && !force {
                return Err(PinError::LimitReached { limit });
            }

            if prepend {
                state.pinned.insert(0, stream_id.to_string());
                state.pinned.truncate(limit);
            } else {
                state.pinned.push(stream_id.to_string());
                let excess = state.pinned.len().saturating_sub(limit);
                state.pinned.drain(..excess);
            }
            debug!("Pinned stream {stream_id}, pinned: {:?}", state.pinned);
        }
        self.refresh();
        Ok(())
    }

    /// Same as [`ManualLayout::try_pin_stream`], reporting only whether the
    /// stream got pinned.
    pub fn pin_stream(&self, stream_id: &str, prepend: bool, force: bool) -> bool {
        match self.try_pin_stream(stream_id, prepend, force) {
            Ok(()) => true,
            Err(e) => {
                debug!("Pin rejected: {e}");
                false
            }
        }
    }

    pub fn unpin_stream(&self, stream_id: &str) {
        self.state().pinned.retain(|id| id != stream_id);
        self.refresh();
    }

    pub fn clear_pinned_streams(&self) {
        self.state().pinned.clear();
        self.refresh();
    }

    pub fn set_fullscreen_stream(&self, stream_id: &str) {
        self.state().fullscreen = Some(stream_id.to_string());
        self.refresh();
    }

    pub fn clear_fullscreen_stream(&self) {
        self.state().fullscreen = None;
        self.refresh();
    }

    pub fn pinned_stream_ids(&self) -> Vec<String> {
        self.state().pinned.clone()
    }

    pub fn fullscreen_stream_id(&self) -> Option<String> {
        self.state().fullscreen.clone()
    }

    fn build_stream_items(&self, state: &ManualState, inputs: &InputSnapshot) -> Vec<StreamItem> {
        let constraints = &inputs.constraints;
        let items = if let Some(fullscreen) = &state.fullscreen {
            inputs
                .streams
                .iter()
                .find(|s| &s.id == fullscreen)
                .map(|s| vec![StreamItem::featured(s.clone(), FeaturedState::Fullscreen)])
                .unwrap_or_default()
        } else if !state.pinned.is_empty() {
            self.featured.build_stream_items(
                &inputs.streams,
                &state.pinned,
                constraints.thumbnail_stream_threshold.max(0),
                FeaturedState::Pinned,
            )
        } else {
            self.mosaic
                .build_stream_items(&inputs.streams, constraints.mosaic_stream_threshold.max(0))
        };
        with_overflow_tile(items, constraints.overflow_tile)
    }

    /// Keep the items up to date until the input source is dropped.
    pub async fn run(&self) {
        run_layout(self, &self.inputs).await
    }
}

impl StreamLayout for ManualLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Manual
    }

    fn stream_items(&self) -> watch::Receiver<Vec<StreamItem>> {
        self.output.subscribe()
    }

    fn current_stream_items(&self) -> Vec<StreamItem> {
        self.output.borrow().clone()
    }

    fn refresh(&self) -> bool {
        let inputs = self.inputs.snapshot();
        let mut state = self.state();
        state.reconcile(&inputs);
        let items = self.build_stream_items(&state, &inputs);
        debug!("Manual layout recomputed {} items", items.len());
        publish(&self.output, items)
    }
}
