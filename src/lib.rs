// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 oneslot contributors
//
// Single-slot producer/consumer handoff: a mutex-guarded one-item cell with
// a condition variable implementing the classic monitor blocking protocol.
// One producer, one consumer, exactly-once in-order delivery.

mod error;
pub use error::{SlotError, SlotResult};

mod slot;
pub use slot::SharedSlot;
