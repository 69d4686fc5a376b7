//! Per-thread re-entrancy guard.
//!
//! The guard is held for the whole time a trace line is being built and written. Any
//! instrumented code reached from there (an instrumented logger, libc built with
//! `-finstrument-functions`) calls back into the hooks, which see the guard held and
//! return without doing anything. Each thread has its own flag, so a thread never
//! swallows another thread's events.

use core::cell::Cell;
use core::marker::PhantomData;

std::thread_local! {
    static HELD: Cell<bool> = const { Cell::new(false) };
}

/// Proof that this thread holds the guard. Dropping it releases the guard.
#[must_use]
pub struct Entered {
    // tied to the thread that took it
    _not_send: PhantomData<*const ()>,
}

/// Take the guard, or `None` if this thread already holds it.
///
/// Also `None` once the thread's locals are torn down: there is no safe place left to
/// record that we are tracing, so the event is skipped.
pub fn try_enter() -> Option<Entered> {
    let was_held = HELD.try_with(|held| held.replace(true)).unwrap_or(true);
    if was_held {
        return None;
    }
    Some(Entered {
        _not_send: PhantomData,
    })
}

pub fn is_held() -> bool {
    HELD.try_with(Cell::get).unwrap_or(true)
}

impl Drop for Entered {
    fn drop(&mut self) {
        let _ = HELD.try_with(|held| held.set(false));
    }
}
