//! Readiness tracking and frame coalescing for a render root.
//!
//! The scheduler never touches the host or the clock itself. It answers what the
//! root should do next, and the root carries that out.

use std::fmt;

/// One of the inputs a root needs before it can produce output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    Target,
    Producer,
    State,
    Normalizer,
}

impl Input {
    pub const ALL: [Input; 4] = [Input::Target, Input::Producer, Input::State, Input::Normalizer];
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Input::Target => "target",
            Input::Producer => "producer",
            Input::State => "state",
            Input::Normalizer => "normalizer",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Ready,
}

/// What the root must do after an update request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Inputs are missing. `start_timer` is set when no diagnostic timer is running yet.
    Wait { start_timer: bool },
    /// A pass is scheduled. `request_frame` is set when no frame was pending yet;
    /// otherwise the request is absorbed into the pending one.
    Scheduled { request_frame: bool },
}

/// The kind of pass to run when a frame fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// Clear the target and attach a freshly rendered tree.
    Draw,
    /// Reconcile against the stored tree.
    Patch,
}

#[derive(Debug)]
pub struct Scheduler {
    present: [bool; 4],
    phase: Phase,
    frame_pending: bool,
    force_pending: bool,
    timer_pending: bool,
    drawn: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            present: [false; 4],
            phase: Phase::Waiting,
            frame_pending: false,
            force_pending: false,
            timer_pending: false,
            drawn: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Record that `input` is now available. Readiness is monotonic.
    pub fn provide(&mut self, input: Input) {
        self.present[Self::slot(input)] = true;
        if self.present.iter().all(|present| *present) {
            self.phase = Phase::Ready;
        }
    }

    pub fn missing(&self) -> Vec<Input> {
        Input::ALL
            .into_iter()
            .filter(|input| !self.present[Self::slot(*input)])
            .collect()
    }

    pub fn request(&mut self, force: bool) -> Request {
        if self.phase == Phase::Waiting {
            let start_timer = !self.timer_pending;
            self.timer_pending = true;
            return Request::Wait { start_timer };
        }

        self.force_pending |= force;
        let request_frame = !self.frame_pending;
        self.frame_pending = true;
        Request::Scheduled { request_frame }
    }

    /// Consume the pending frame. `None` if no frame was requested.
    ///
    /// The first pass after becoming ready is always a draw.
    pub fn take_frame(&mut self) -> Option<Pass> {
        if !self.frame_pending {
            return None;
        }
        self.frame_pending = false;

        let force = std::mem::take(&mut self.force_pending) || !self.drawn;
        self.drawn = true;
        Some(if force { Pass::Draw } else { Pass::Patch })
    }

    /// Consume the diagnostic timer. Returns the missing inputs if still waiting.
    pub fn take_timer(&mut self) -> Option<Vec<Input>> {
        self.timer_pending = false;
        match self.phase {
            Phase::Waiting => Some(self.missing()),
            Phase::Ready => None,
        }
    }

    fn slot(input: Input) -> usize {
        match input {
            Input::Target => 0,
            Input::Producer => 1,
            Input::State => 2,
            Input::Normalizer => 3,
        }
    }
}
