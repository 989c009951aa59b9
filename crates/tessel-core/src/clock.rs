//! Time source and wait primitive used by the executor.
//!
//! The executor never calls `std::thread::sleep` directly. Production code
//! passes [`SystemClock`]; tests and the simulator pass [`VirtualClock`],
//! whose sleeps advance a shared counter instantly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic clock that can suspend the caller.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;

    /// Suspend for `duration`.
    fn sleep(&mut self, duration: Duration);
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Wall-clock time with blocking sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock whose time only moves when someone sleeps on it.
///
/// Clones share the same timeline, so a simulated surface can hold one handle
/// and observe the time the executor has "waited".
#[derive(Debug, Clone)]
pub struct VirtualClock {
    start: Instant,
    elapsed: Rc<Cell<Duration>>,
    sleeps: Rc<Cell<u64>>,
}

impl VirtualClock {
    /// A clock starting at zero elapsed time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
            sleeps: Rc::new(Cell::new(0)),
        }
    }

    /// Total virtual time slept so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }

    /// Number of `sleep` calls so far.
    #[must_use]
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.get()
    }

    /// Move time forward without counting a sleep.
    pub fn advance(&self, duration: Duration) {
        self.elapsed.set(self.elapsed.get().saturating_add(duration));
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
        self.sleeps.set(self.sleeps.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock_shared_timeline() {
        let mut clock = VirtualClock::new();
        let observer = clock.clone();
        let before = observer.now();

        clock.sleep(Duration::from_millis(250));
        clock.sleep(Duration::from_millis(750));

        assert_eq!(observer.elapsed(), Duration::from_secs(1));
        assert_eq!(observer.sleep_count(), 2);
        assert_eq!(observer.now() - before, Duration::from_secs(1));
    }
}
