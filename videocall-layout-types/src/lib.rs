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

//! Model types shared by the stream layout engine and its hosts.
//!
//! Nothing in here knows how to arrange streams; this crate only describes the
//! participants' streams, the renderable items a layout produces and the knobs
//! (constraints, settings) that steer the arrangement.

pub mod callback;
pub mod config;
pub mod item;
pub mod overrides;
pub mod stream;

pub use callback::Callback;
pub use config::{
    ConfigError, OverflowTile, StreamLayoutConstraints, StreamLayoutSettings, WindowSizeClass,
};
pub use item::{FeaturedState, MoreStreamsUserPreview, StreamItem, StreamItemState};
pub use overrides::ConstraintOverrides;
pub use stream::{AudioUi, StreamUi, UserInfo, VideoUi};
