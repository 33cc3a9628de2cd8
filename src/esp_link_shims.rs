//! ESP-IDF runtime symbol providers for third-party crates.
//!
//! `embassy-sync`'s `CriticalSectionRawMutex` links against the
//! `critical-section` 1.x ABI.  On device the lock is a process-wide
//! mutex with per-thread nesting depth; host tests get the
//! `critical-section/std` implementation instead.

use core::cell::{Cell, RefCell};
use std::sync::{Mutex, MutexGuard, PoisonError};

static CRITICAL_SECTION_MUTEX: Mutex<()> = Mutex::new(());

thread_local! {
    static DEPTH: Cell<u8> = const { Cell::new(0) };
    static GUARD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    let depth = DEPTH.get();
    if depth == 0 {
        // A panic inside a critical section cannot leave `()` inconsistent.
        let lock = CRITICAL_SECTION_MUTEX
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        GUARD.with(|g| *g.borrow_mut() = Some(lock));
    }
    DEPTH.set(depth.saturating_add(1));
    depth
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    let depth = DEPTH.get();
    if depth == 0 {
        return;
    }
    DEPTH.set(depth - 1);
    if depth == 1 {
        GUARD.with(|g| *g.borrow_mut() = None);
    }
}
