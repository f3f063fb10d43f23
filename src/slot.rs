// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 oneslot contributors
//
// The single-slot monitor: a mutex-guarded one-item cell plus a condition
// variable coordinating exactly one pending value between a producer and a
// consumer. Waiting releases the lock and re-checks the predicate on every
// wakeup (spurious wakeups included).

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{SlotError, SlotResult};

/// Everything guarded by the slot's mutex.
///
/// The full flag of the classic monitor formulation is `value.is_some()`,
/// so the flag can never disagree with the cell contents.
struct SlotState<T> {
    /// The pending item. `Some` means full.
    value: Option<T>,
    /// Terminal shutdown flag, set once by `close`.
    closed: bool,
    /// Bumped by `interrupt`. A waiter that observes a bump while blocked
    /// abandons its wait; calls entered after the bump are unaffected.
    interrupt_epoch: u64,
}

/// A mutex-guarded one-item cell with a blocking handoff protocol.
///
/// One producer repeatedly calls [`put`], one consumer repeatedly calls
/// [`take`]. `put` blocks while the slot is full, `take` blocks while it is
/// empty; each state transition wakes the other side. Under that
/// single-producer/single-consumer usage every value is delivered exactly
/// once, in order.
///
/// Blocked waiters can be cancelled without disturbing the slot:
/// [`interrupt`] wakes current waiters with [`SlotError::Interrupted`]
/// (recoverable, the slot stays usable), [`close`] shuts the slot down for
/// good.
///
/// [`put`]: SharedSlot::put
/// [`take`]: SharedSlot::take
/// [`interrupt`]: SharedSlot::interrupt
/// [`close`]: SharedSlot::close
pub struct SharedSlot<T> {
    state: Mutex<SlotState<T>>,
    cond: Condvar,
}

impl<T> SharedSlot<T> {
    /// Create an empty, open slot.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                value: None,
                closed: false,
                interrupt_epoch: 0,
            }),
            cond: Condvar::new(),
        }
    }

    /// Store `item`, blocking while the slot is full.
    ///
    /// Wakes any waiting taker once the item is stored.
    ///
    /// # Errors
    /// [`SlotError::Interrupted`] if [`interrupt`] fires while this call is
    /// blocked, [`SlotError::Closed`] if the slot is closed. In both cases
    /// `item` is dropped and the slot is untouched.
    ///
    /// [`interrupt`]: SharedSlot::interrupt
    pub fn put(&self, item: T) -> SlotResult<()> {
        self.put_inner(item, None)
    }

    /// Store `item`, waiting at most `timeout` for the slot to empty.
    ///
    /// # Errors
    /// [`SlotError::TimedOut`] if the slot is still full when the timeout
    /// expires; otherwise as [`put`](SharedSlot::put).
    pub fn put_timeout(&self, item: T, timeout: Duration) -> SlotResult<()> {
        self.put_inner(item, Some(Instant::now() + timeout))
    }

    fn put_inner(&self, item: T, deadline: Option<Instant>) -> SlotResult<()> {
        let mut st = self.state.lock();
        let epoch = st.interrupt_epoch;
        loop {
            if st.closed {
                return Err(SlotError::Closed);
            }
            if st.value.is_none() {
                break;
            }
            let timed_out = self.wait(&mut st, deadline);
            if st.interrupt_epoch != epoch {
                return Err(SlotError::Interrupted);
            }
            // A notify can race the deadline: report a timeout only if the
            // predicate still fails, otherwise the loop top completes the
            // operation.
            if timed_out && st.value.is_some() && !st.closed {
                return Err(SlotError::TimedOut);
            }
        }
        st.value = Some(item);
        drop(st);
        self.cond.notify_all();
        Ok(())
    }

    /// Take the pending value, blocking while the slot is empty.
    ///
    /// Returns exactly the value most recently stored by `put`, and wakes
    /// any waiting putter once the slot is cleared.
    ///
    /// # Errors
    /// [`SlotError::Interrupted`] if [`interrupt`] fires while this call is
    /// blocked. [`SlotError::Closed`] if the slot is closed and empty; a
    /// value already pending at close time is still delivered.
    ///
    /// [`interrupt`]: SharedSlot::interrupt
    pub fn take(&self) -> SlotResult<T> {
        self.take_inner(None)
    }

    /// Take the pending value, waiting at most `timeout` for one to arrive.
    ///
    /// # Errors
    /// [`SlotError::TimedOut`] if the slot is still empty when the timeout
    /// expires; otherwise as [`take`](SharedSlot::take).
    pub fn take_timeout(&self, timeout: Duration) -> SlotResult<T> {
        self.take_inner(Some(Instant::now() + timeout))
    }

    fn take_inner(&self, deadline: Option<Instant>) -> SlotResult<T> {
        let mut st = self.state.lock();
        let epoch = st.interrupt_epoch;
        loop {
            // Drain before honouring `closed` so a value put just before
            // shutdown is not lost.
            if let Some(v) = st.value.take() {
                drop(st);
                self.cond.notify_all();
                return Ok(v);
            }
            if st.closed {
                return Err(SlotError::Closed);
            }
            let timed_out = self.wait(&mut st, deadline);
            if st.interrupt_epoch != epoch {
                return Err(SlotError::Interrupted);
            }
            // A notify can race the deadline: report a timeout only if the
            // slot is still empty, otherwise the loop top takes the value.
            if timed_out && st.value.is_none() && !st.closed {
                return Err(SlotError::TimedOut);
            }
        }
    }

    /// One condition-variable wait, bounded by `deadline` when present.
    /// Returns whether the wait timed out. The caller re-checks its
    /// predicate either way, since a notify can race the deadline.
    fn wait(
        &self,
        st: &mut parking_lot::MutexGuard<'_, SlotState<T>>,
        deadline: Option<Instant>,
    ) -> bool {
        match deadline {
            None => {
                self.cond.wait(st);
                false
            }
            Some(d) => self.cond.wait_until(st, d).timed_out(),
        }
    }

    /// Store `item` without blocking.
    ///
    /// Hands `item` back as `Err` if the slot is full or closed.
    pub fn try_put(&self, item: T) -> Result<(), T> {
        let mut st = self.state.lock();
        if st.closed || st.value.is_some() {
            return Err(item);
        }
        st.value = Some(item);
        drop(st);
        self.cond.notify_all();
        Ok(())
    }

    /// Take the pending value without blocking. `None` if the slot is empty.
    pub fn try_take(&self) -> Option<T> {
        let mut st = self.state.lock();
        let v = st.value.take()?;
        drop(st);
        self.cond.notify_all();
        Some(v)
    }

    /// Cancel every wait currently blocked in `put`/`take`.
    ///
    /// Each such waiter returns [`SlotError::Interrupted`] with the slot
    /// state untouched. The slot stays usable: calls entered after this
    /// returns proceed normally, and an interrupted caller may simply retry.
    pub fn interrupt(&self) {
        let mut st = self.state.lock();
        st.interrupt_epoch = st.interrupt_epoch.wrapping_add(1);
        drop(st);
        self.cond.notify_all();
    }

    /// Shut the slot down and wake all waiters.
    ///
    /// Blocked and future `put`s fail with [`SlotError::Closed`]; `take`
    /// still delivers a value pending at close time, then fails the same
    /// way. Idempotent.
    pub fn close(&self) {
        let mut st = self.state.lock();
        st.closed = true;
        drop(st);
        self.cond.notify_all();
    }

    /// Whether the slot currently holds an undelivered value.
    pub fn is_full(&self) -> bool {
        self.state.lock().value.is_some()
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl<T> Default for SharedSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
