//! Blocking wait for external state changes
//!
//! Some steps cannot finish until the operator does something outside the
//! tool (clicks through an installer, unlocks an app). They block here.
//! There is no timeout and no cancellation; killing the process is the only
//! way out, and rerunning from the top is always safe.

use std::thread;
use std::time::Duration;

/// Poll `ready` until it returns true
///
/// `on_tick` receives the number of failed polls so far, which callers use
/// to remind the operator what they are waiting for. Returns the number of
/// failed polls before `ready` succeeded.
pub fn block_until<R, T>(poll: Duration, mut ready: R, mut on_tick: T) -> u64
where
    R: FnMut() -> bool,
    T: FnMut(u64),
{
    let mut attempts = 0;
    while !ready() {
        attempts += 1;
        on_tick(attempts);
        thread::sleep(poll);
    }
    attempts
}
