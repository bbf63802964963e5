// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failures, timeouts and non-success HTTP statuses.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body matched neither the bare-list nor the wrapped shape.
    #[error("could not decode report response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode(_))
    }
}
