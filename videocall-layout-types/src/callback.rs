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

//! Host-supplied function the layout engine can call from any thread.
//!
//! The engine only ever calls it. Hosts that need mapping or filtering do it
//! inside the closure they pass in.

use std::fmt;
use std::sync::Arc;

/// Shared handle to a host function taking `IN`.
pub struct Callback<IN, OUT = ()> {
    func: Arc<dyn Fn(IN) -> OUT + Send + Sync>,
}

impl<IN, OUT, F> From<F> for Callback<IN, OUT>
where
    F: Fn(IN) -> OUT + Send + Sync + 'static,
{
    fn from(func: F) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

impl<IN, OUT> Clone for Callback<IN, OUT> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<IN, OUT> fmt::Debug for Callback<IN, OUT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

impl<IN, OUT> Callback<IN, OUT> {
    pub fn emit(&self, value: IN) -> OUT {
        (self.func)(value)
    }
}
