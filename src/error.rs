// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 oneslot contributors
//
// Error type for slot operations.

use thiserror::Error;

/// Why a blocking slot operation returned without completing.
///
/// None of these variants indicate corruption: whenever an operation fails,
/// the slot's value and full flag are exactly as they were before the call
/// and the lock has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    /// The wait was cancelled by [`SharedSlot::interrupt`]. Recoverable:
    /// the caller may retry the operation or exit its loop.
    ///
    /// [`SharedSlot::interrupt`]: crate::SharedSlot::interrupt
    #[error("wait interrupted")]
    Interrupted,

    /// The slot was shut down by [`SharedSlot::close`].
    ///
    /// [`SharedSlot::close`]: crate::SharedSlot::close
    #[error("slot closed")]
    Closed,

    /// A bounded wait expired before the slot reached the needed state.
    /// Only returned by the `_timeout` variants.
    #[error("timed out waiting for the slot")]
    TimedOut,
}

/// Result alias used throughout the crate.
pub type SlotResult<T> = Result<T, SlotError>;
