//! Rendering-clock abstraction used to defer passes to the next frame.

use std::fmt;
use std::time::Duration;

#[cfg(any(test, feature = "testing"))]
use std::cell::RefCell;
#[cfg(any(test, feature = "testing"))]
use std::rc::Rc;

/// A one-shot wake-up handed to a [`Clock`].
///
/// Firing it only queues a message for the render root that created it, so a
/// clock may fire wakes from inside its own callbacks without re-entering the root.
pub struct Wake(Box<dyn FnOnce()>);

impl Wake {
    pub fn new<F>(wake: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self(Box::new(wake))
    }

    pub fn fire(self) {
        (self.0)()
    }
}

impl fmt::Debug for Wake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Wake")
    }
}

/// The external rendering clock.
///
/// This abstraction lets you drive frames from whatever your display surface
/// offers (`requestAnimationFrame`, a vsync callback, a fixed-rate terminal tick, ...).
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// Fire `wake` on the next display refresh.
    fn request_frame(&self, wake: Wake);

    /// Fire `wake` once after `delay`.
    fn set_timeout(&self, delay: Duration, wake: Wake);
}

#[cfg(any(test, feature = "testing"))]
#[derive(Default)]
struct ClockQueue {
    now: Duration,
    frames: Vec<Wake>,
    timers: Vec<(Duration, Wake)>,
}

#[cfg(any(test, feature = "testing"))]
/// Clock that only advances when told to.
///
/// Only available with the `testing` feature.
///
/// Clones share the same queue, so hand one clone to the render root and keep
/// another to drive it.
pub struct ManualClock {
    queue: Rc<RefCell<ClockQueue>>,
}

#[cfg(any(test, feature = "testing"))]
impl Clone for ManualClock {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(ClockQueue::default())),
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.queue.borrow().timers.len()
    }

    /// Fire every frame wake requested so far. Returns how many fired.
    pub fn tick(&self) -> usize {
        let frames = std::mem::take(&mut self.queue.borrow_mut().frames);
        let fired = frames.len();
        for wake in frames {
            wake.fire();
        }
        fired
    }

    /// Move time forward and fire every timer that came due.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut queue = self.queue.borrow_mut();
            queue.now += by;
            let now = queue.now;
            let (due, pending) = std::mem::take(&mut queue.timers)
                .into_iter()
                .partition::<Vec<_>, _>(|(deadline, _)| *deadline <= now);
            queue.timers = pending;
            due
        };
        let fired = due.len();
        for (_, wake) in due {
            wake.fire();
        }
        fired
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for ManualClock {
    fn request_frame(&self, wake: Wake) {
        self.queue.borrow_mut().frames.push(wake);
    }

    fn set_timeout(&self, delay: Duration, wake: Wake) {
        let mut queue = self.queue.borrow_mut();
        let deadline = queue.now + delay;
        queue.timers.push((deadline, wake));
    }
}
