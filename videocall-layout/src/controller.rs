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

//! Entry point of the layout engine.
//!
//! [`StreamLayoutController`] owns an [`AutoLayout`] and a [`ManualLayout`]
//! fed by the same inputs and surfaces the items of whichever is active.
//! Pin and fullscreen requests always go to the manual layout; they decide
//! what is rendered by moving the controller into manual mode.

use crate::error::PinError;
use crate::layout::{AutoLayout, LayoutInputSource, LayoutKind, ManualLayout, StreamLayout};
use crate::messages::{UserMessage, UserMessageSink};
use crate::provider::{
    FeaturedStreamItems, FeaturedStreamItemsProvider, MosaicStreamItems, MosaicStreamItemsProvider,
};
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use videocall_layout_types::{
    ConstraintOverrides, StreamItem, StreamLayoutConstraints, StreamLayoutSettings, StreamUi,
};

#[derive(Debug)]
struct ControllerState {
    active: LayoutKind,
    /// Layout to go back to when fullscreen is cleared.
    previous: Option<LayoutKind>,
    /// Remote screen shares present in the last stream update.
    remote_screen_shares: Vec<String>,
}

/// Chooses between automatic and manual arrangement and exposes the result.
///
/// Every operation runs under one lock, so each update is applied and
/// published atomically. None of the operations fail: invalid requests are
/// no-ops, except [`StreamLayoutController::try_pin_stream`] which reports why.
pub struct StreamLayoutController {
    inputs: LayoutInputSource,
    auto_layout: AutoLayout,
    manual_layout: ManualLayout,
    overrides: ConstraintOverrides,
    messages: Arc<dyn UserMessageSink>,
    state: Mutex<ControllerState>,
    stream_items: watch::Sender<Vec<StreamItem>>,
    is_in_auto_mode: watch::Sender<bool>,
    is_pinned_stream_limit_reached: watch::Sender<bool>,
}

impl StreamLayoutController {
    /// Controller with the default providers, starting in auto mode.
    ///
    /// Thresholds set through `STREAM_LAYOUT_*` environment variables replace
    /// the ones passed to [`StreamLayoutController::apply_constraints`].
    pub fn new(messages: Arc<dyn UserMessageSink>) -> Self {
        Self::with_providers(
            messages,
            Arc::new(MosaicStreamItems),
            Arc::new(FeaturedStreamItems),
        )
    }

    pub fn with_providers(
        messages: Arc<dyn UserMessageSink>,
        mosaic: Arc<dyn MosaicStreamItemsProvider>,
        featured: Arc<dyn FeaturedStreamItemsProvider>,
    ) -> Self {
        let overrides = *ConstraintOverrides::global();
        if !overrides.is_empty() {
            info!("Stream layout threshold overrides from the environment: {overrides:?}");
        }
        let inputs = LayoutInputSource::default();
        let auto_layout =
            AutoLayout::with_providers(inputs.subscribe(), mosaic.clone(), featured.clone());
        let manual_layout = ManualLayout::with_providers(inputs.subscribe(), mosaic, featured);
        let (stream_items, _) = watch::channel(auto_layout.current_stream_items());
        let (is_in_auto_mode, _) = watch::channel(true);
        let (is_pinned_stream_limit_reached, _) = watch::channel(false);

        let controller = Self {
            inputs,
            auto_layout,
            manual_layout,
            overrides,
            messages,
            state: Mutex::new(ControllerState {
                active: LayoutKind::Auto,
                previous: None,
                remote_screen_shares: Vec::new(),
            }),
            stream_items,
            is_in_auto_mode,
            is_pinned_stream_limit_reached,
        };
        controller.publish(&controller.state());
        controller
    }

    /// Replace the environment overrides applied to constraint updates.
    pub fn with_overrides(mut self, overrides: ConstraintOverrides) -> Self {
        if !overrides.is_empty() {
            info!("Applying stream layout threshold overrides: {overrides:?}");
        }
        self.overrides = overrides;
        self
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn layout(&self, kind: LayoutKind) -> &dyn StreamLayout {
        match kind {
            LayoutKind::Auto => &self.auto_layout,
            LayoutKind::Manual => &self.manual_layout,
        }
    }

    fn set_mode(&self, state: &mut ControllerState, kind: LayoutKind) {
        if state.active != kind {
            info!("Stream layout switched from {} to {kind} mode", state.active);
            state.active = kind;
        }
    }

    fn refresh_layouts(&self) {
        self.auto_layout.refresh();
        self.manual_layout.refresh();
    }

    /// Push the active layout's items and the derived flags to observers.
    fn publish(&self, state: &ControllerState) {
        let items = self.layout(state.active).current_stream_items();
        // Only pins the user can see count towards the limit.
        let pinned = items.iter().filter(|item| item.is_pinned()).count() as i64;
        let limit_reached =
            pinned >= i64::from(self.inputs.constraints().featured_stream_threshold);
        let is_auto = state.active == LayoutKind::Auto;

        self.stream_items.send_if_modified(|current| {
            if *current == items {
                return false;
            }
            debug!("Publishing {} stream items from {} layout", items.len(), state.active);
            *current = items;
            true
        });
        self.is_in_auto_mode.send_if_modified(|current| {
            let changed = *current != is_auto;
            *current = is_auto;
            changed
        });
        self.is_pinned_stream_limit_reached.send_if_modified(|current| {
            let changed = *current != limit_reached;
            *current = limit_reached;
            changed
        });
    }

    pub fn apply_streams(&self, streams: Vec<StreamUi>) {
        let suggestion = {
            let mut state = self.state();
            let remote_screen_shares: Vec<&StreamUi> = streams
                .iter()
                .filter(|s| s.is_remote_screen_share())
                .collect();
            let suggestion = if state.active == LayoutKind::Manual {
                remote_screen_shares
                    .iter()
                    .find(|s| !state.remote_screen_shares.contains(&s.id))
                    .map(|s| UserMessage::PinScreenShare {
                        stream_id: s.id.clone(),
                        username: s.username().to_string(),
                    })
            } else {
                None
            };
            state.remote_screen_shares = remote_screen_shares
                .into_iter()
                .map(|s| s.id.clone())
                .collect();

            self.inputs.apply_streams(streams);
            self.refresh_layouts();
            self.publish(&state);
            suggestion
        };

        // Sent without holding the lock so the sink may call back into the controller.
        if let Some(message) = suggestion {
            debug!("Suggesting to pin {message:?}");
            self.messages.send_user_message(message);
        }
    }

    pub fn apply_constraints(&self, constraints: StreamLayoutConstraints) {
        let state = self.state();
        self.inputs.apply_constraints(self.overrides.apply(constraints));
        self.refresh_layouts();
        self.publish(&state);
    }

    pub fn apply_settings(&self, settings: StreamLayoutSettings) {
        let state = self.state();
        self.inputs.apply_settings(settings);
        self.refresh_layouts();
        self.publish(&state);
    }

    /// Render the manual layout, starting without pins.
    pub fn switch_to_manual_mode(&self) {
        let mut state = self.state();
        self.manual_layout.clear_pinned_streams();
        self.set_mode(&mut state, LayoutKind::Manual);
        self.publish(&state);
    }

    /// Render the automatic layout. Pins of the manual layout are dropped.
    pub fn switch_to_auto_mode(&self) {
        let mut state = self.state();
        self.manual_layout.clear_pinned_streams();
        self.set_mode(&mut state, LayoutKind::Auto);
        self.publish(&state);
    }

    /// Pin `stream_id` and render the manual layout, even if the pin is
    /// rejected.
    pub fn try_pin_stream(
        &self,
        stream_id: &str,
        prepend: bool,
        force: bool,
    ) -> Result<(), PinError> {
        let mut state = self.state();
        let result = self.manual_layout.try_pin_stream(stream_id, prepend, force);
        // Pins made behind a fullscreen stream show up once it is cleared.
        if self.manual_layout.fullscreen_stream_id().is_some() {
            state.previous = Some(LayoutKind::Manual);
        }
        self.set_mode(&mut state, LayoutKind::Manual);
        self.publish(&state);
        result
    }

    /// Returns `true` if `stream_id` got pinned.
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
        let state = self.state();
        self.manual_layout.unpin_stream(stream_id);
        self.publish(&state);
    }

    pub fn clear_pinned_streams(&self) {
        let state = self.state();
        self.manual_layout.clear_pinned_streams();
        self.publish(&state);
    }

    /// Show `stream_id` alone and render the manual layout. The layout active
    /// before entering fullscreen comes back with
    /// [`StreamLayoutController::clear_fullscreen_stream`].
    pub fn set_fullscreen_stream(&self, stream_id: &str) {
        let mut state = self.state();
        if self.manual_layout.fullscreen_stream_id().is_none() {
            state.previous = Some(state.active);
        }
        self.manual_layout.set_fullscreen_stream(stream_id);
        self.set_mode(&mut state, LayoutKind::Manual);
        self.publish(&state);
    }

    pub fn clear_fullscreen_stream(&self) {
        let mut state = self.state();
        self.manual_layout.clear_fullscreen_stream();
        if let Some(previous) = state.previous.take() {
            self.set_mode(&mut state, previous);
        }
        self.publish(&state);
    }

    pub fn stream_items(&self) -> watch::Receiver<Vec<StreamItem>> {
        self.stream_items.subscribe()
    }

    pub fn is_in_auto_mode(&self) -> watch::Receiver<bool> {
        self.is_in_auto_mode.subscribe()
    }

    pub fn is_pinned_stream_limit_reached(&self) -> watch::Receiver<bool> {
        self.is_pinned_stream_limit_reached.subscribe()
    }

    pub fn current_stream_items(&self) -> Vec<StreamItem> {
        self.stream_items.borrow().clone()
    }

    pub fn current_mode(&self) -> LayoutKind {
        self.state().active
    }

    pub fn pinned_stream_ids(&self) -> Vec<String> {
        self.manual_layout.pinned_stream_ids()
    }

    pub fn fullscreen_stream_id(&self) -> Option<String> {
        self.manual_layout.fullscreen_stream_id()
    }

    pub fn constraints(&self) -> StreamLayoutConstraints {
        self.inputs.constraints()
    }

    pub fn settings(&self) -> StreamLayoutSettings {
        self.inputs.settings()
    }
}
