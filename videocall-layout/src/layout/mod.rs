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

//! Layout strategies.
//!
//! A layout combines the latest stream list, constraints and settings into a
//! list of [`StreamItem`]s. Inputs are `tokio::sync::watch` channels: writers
//! always replace the whole value and readers always see a complete one, so a
//! recomputation works on a consistent snapshot without extra locking.

mod auto;
mod manual;

pub use auto::AutoLayout;
pub use manual::ManualLayout;

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;
use videocall_layout_types::{
    OverflowTile, StreamItem, StreamLayoutConstraints, StreamLayoutSettings, StreamUi,
};

/// Which strategy produced a list of items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutKind {
    Auto,
    Manual,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Auto => write!(f, "auto"),
            LayoutKind::Manual => write!(f, "manual"),
        }
    }
}

/// A strategy turning [`LayoutInputs`] into renderable items.
pub trait StreamLayout: Send + Sync {
    fn kind(&self) -> LayoutKind;

    /// Observe the computed items. The receiver only wakes up when the list
    /// actually changes.
    fn stream_items(&self) -> watch::Receiver<Vec<StreamItem>>;

    fn current_stream_items(&self) -> Vec<StreamItem>;

    /// Recompute from the latest inputs. Returns `true` if the items changed.
    fn refresh(&self) -> bool;
}

/// Read side of the layout inputs, shared by every layout of a controller.
#[derive(Clone, Debug)]
pub struct LayoutInputs {
    streams: watch::Receiver<Vec<StreamUi>>,
    constraints: watch::Receiver<StreamLayoutConstraints>,
    settings: watch::Receiver<StreamLayoutSettings>,
}

/// Latest value of every input, taken together.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct InputSnapshot {
    pub streams: Vec<StreamUi>,
    pub constraints: StreamLayoutConstraints,
    pub settings: StreamLayoutSettings,
}

impl LayoutInputs {
    pub(crate) fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            streams: self.streams.borrow().clone(),
            constraints: *self.constraints.borrow(),
            settings: *self.settings.borrow(),
        }
    }

    /// Wait until any input changes. Returns `false` once the
    /// [`LayoutInputSource`] is gone.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            res = self.streams.changed() => res.is_ok(),
            res = self.constraints.changed() => res.is_ok(),
            res = self.settings.changed() => res.is_ok(),
        }
    }

    fn mark_seen(&mut self) {
        self.streams.borrow_and_update();
        self.constraints.borrow_and_update();
        self.settings.borrow_and_update();
    }
}

/// Write side of the layout inputs. Each setter replaces its input
/// (last write wins) independently of the others.
#[derive(Debug)]
pub struct LayoutInputSource {
    streams: watch::Sender<Vec<StreamUi>>,
    constraints: watch::Sender<StreamLayoutConstraints>,
    settings: watch::Sender<StreamLayoutSettings>,
}

impl LayoutInputSource {
    pub fn new(constraints: StreamLayoutConstraints, settings: StreamLayoutSettings) -> Self {
        let (streams, _) = watch::channel(Vec::new());
        let (constraints, _) = watch::channel(constraints);
        let (settings, _) = watch::channel(settings);
        Self {
            streams,
            constraints,
            settings,
        }
    }

    pub fn subscribe(&self) -> LayoutInputs {
        LayoutInputs {
            streams: self.streams.subscribe(),
            constraints: self.constraints.subscribe(),
            settings: self.settings.subscribe(),
        }
    }

    pub fn apply_streams(&self, streams: Vec<StreamUi>) {
        self.streams.send_replace(streams);
    }

    pub fn apply_constraints(&self, constraints: StreamLayoutConstraints) {
        self.constraints.send_replace(constraints);
    }

    pub fn apply_settings(&self, settings: StreamLayoutSettings) {
        self.settings.send_replace(settings);
    }

    pub fn constraints(&self) -> StreamLayoutConstraints {
        *self.constraints.borrow()
    }

    pub fn settings(&self) -> StreamLayoutSettings {
        *self.settings.borrow()
    }
}

impl Default for LayoutInputSource {
    fn default() -> Self {
        Self::new(StreamLayoutConstraints::default(), StreamLayoutSettings::default())
    }
}

/// Refresh `layout` every time an input changes, until the input source is
/// dropped.
pub(crate) async fn run_layout<L: StreamLayout + ?Sized>(layout: &L, inputs: &LayoutInputs) {
    let mut inputs = inputs.clone();
    loop {
        inputs.mark_seen();
        layout.refresh();
        if !inputs.changed().await {
            break;
        }
    }
}

/// Replace the published items if they differ from `items`.
pub(crate) fn publish(output: &watch::Sender<Vec<StreamItem>>, items: Vec<StreamItem>) -> bool {
    output.send_if_modified(|current| {
        if *current == items {
            return false;
        }
        *current = items;
        true
    })
}

/// Swap the overflow tile for the kind the constraints ask for.
pub(crate) fn with_overflow_tile(items: Vec<StreamItem>, tile: OverflowTile) -> Vec<StreamItem> {
    match tile {
        OverflowTile::MoreStreams => items,
        OverflowTile::HiddenStreams => items.into_iter().map(StreamItem::into_hidden).collect(),
    }
}
