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

use thiserror::Error;

/// Why a pin request was rejected. A rejected request leaves the pinned
/// streams untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinError {
    #[error("Pinning is disabled by the current constraints")]
    PinningDisabled,

    #[error("Stream {0} is not in the current stream list")]
    StreamNotFound(String),

    #[error("Stream {0} is already pinned")]
    AlreadyPinned(String),

    #[error("Pinned stream limit reached ({limit})")]
    LimitReached { limit: usize },
}
