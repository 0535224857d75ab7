// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use super::MAX_NSIDE;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HealpixError {
    #[error("HEALPix nside must be between 1 and {MAX_NSIDE}, but got {0}")]
    BadNside(u32),
}
