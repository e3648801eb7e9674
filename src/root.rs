//! The render root that schedules and applies passes against one mount target.

use std::rc::Rc;

use flume::Receiver;

use crate::build::build;
use crate::clock::{Clock, Wake};
use crate::config::RootConfig;
use crate::dispatcher::{Dispatcher, Message, Normalizer};
use crate::error::{ConfigurationError, Error};
use crate::host::Host;
use crate::patch::patch;
use crate::producer::Producer;
use crate::render::{render, LiveNode};
use crate::scheduler::{Input, Pass, Request, Scheduler};

#[cfg(any(test, feature = "testing"))]
use crate::clock::ManualClock;
#[cfg(any(test, feature = "testing"))]
use crate::host::{TestHost, TestNode};

/// Owner of one mounted live tree.
///
/// A root collects its inputs (target, producer, state and normalizer) through
/// its [`Dispatcher`], and once all four are present it renders on the next
/// frame of its [`Clock`]:
///
/// 1. The first pass, and any forced pass, clears the target and attaches a
///    freshly rendered tree.
/// 2. Every other pass builds the latest description and patches the stored
///    tree in place.
///
/// Update requests that arrive while a frame is pending are absorbed into it,
/// and the pass uses whatever state is newest when the frame fires. Passes never
/// overlap: the root is driven from a single thread and the tree is only
/// touched while draining the queue.
///
/// Errors in a pass are logged and kept in [`last_error`](Self::last_error);
/// later passes still run.
///
/// # Type Parameters
///
/// * `State` - The application state handed to the producer
/// * `H` - The presentation layer (implements [`Host`])
/// * `C` - The rendering clock (implements [`Clock`])
pub struct RenderRoot<State, H, C>
where
    H: Host,
    C: Clock,
{
    host: H,
    clock: C,
    config: RootConfig,
    scheduler: Scheduler,
    target: Option<H::Node>,
    producer: Option<Rc<dyn Producer<State>>>,
    normalizer: Option<Normalizer>,
    state: Option<State>,
    tree: Option<LiveNode<H::Node>>,
    receiver: Receiver<Message<State, H::Node>>,
    dispatcher: Dispatcher<State, H::Node>,
    last_error: Option<Error>,
}

impl<State, H, C> RenderRoot<State, H, C>
where
    State: 'static,
    H: Host,
    H::Node: 'static,
    C: Clock,
{
    /// Create a root with the default [`RootConfig`].
    ///
    /// Nothing is drawn until the root's queue is drained and its clock fires.
    pub fn new(host: H, clock: C) -> Self {
        Self::with_config(host, clock, RootConfig::default())
    }

    pub fn with_config(host: H, clock: C, config: RootConfig) -> Self {
        let (sender, receiver) = flume::unbounded();
        let mut scheduler = Scheduler::new();

        let normalizer = if config.install_normalizer {
            scheduler.provide(Input::Normalizer);
            Some(Rc::new(build) as Normalizer)
        } else {
            None
        };

        Self {
            host,
            clock,
            config,
            scheduler,
            target: None,
            producer: None,
            normalizer,
            state: None,
            tree: None,
            receiver,
            dispatcher: Dispatcher::new(sender),
            last_error: None,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher<State, H::Node> {
        self.dispatcher.clone()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The live tree currently on screen, if a draw has succeeded.
    pub fn tree(&self) -> Option<&LiveNode<H::Node>> {
        self.tree.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.scheduler.is_ready()
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<Error> {
        self.last_error.take()
    }

    /// Process messages until [`Dispatcher::shutdown`] is received.
    ///
    /// Await this on the thread that owns the host. Frames still only run when
    /// the clock fires the wakes this root hands it.
    pub async fn run(&mut self) {
        while let Ok(message) = self.receiver.recv_async().await {
            if !self.handle(message) {
                break;
            }
        }
    }

    /// Process every message queued so far without waiting for more.
    ///
    /// For hosts that run their own loop. Returns the number of messages handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.receiver.try_recv() {
            handled += 1;
            if !self.handle(message) {
                break;
            }
        }
        handled
    }

    fn handle(&mut self, message: Message<State, H::Node>) -> bool {
        match message {
            Message::State {
                state,
                action,
                params,
            } => {
                tracing::debug!(action = %action, "state received");
                tracing::trace!(?params, "action params");
                self.state = Some(state);
                self.scheduler.provide(Input::State);
                self.request(false);
            }
            Message::Producer(producer) => {
                self.producer = Some(producer);
                self.scheduler.provide(Input::Producer);
                self.request(false);
            }
            Message::Normalizer(normalizer) => {
                self.normalizer = Some(normalizer);
                self.scheduler.provide(Input::Normalizer);
                self.request(true);
            }
            Message::Mount(target) => {
                self.target = Some(target);
                self.scheduler.provide(Input::Target);
                self.request(true);
            }
            Message::Update { force } => self.request(force),
            Message::Frame => self.on_frame(),
            Message::DiagnosticTimeout => self.on_diagnostic_timeout(),
            Message::Shutdown => return false,
        }
        true
    }

    fn request(&mut self, force: bool) {
        match self.scheduler.request(force) {
            Request::Wait { start_timer: true } => {
                let wake = self.wake(Message::DiagnosticTimeout);
                self.clock.set_timeout(self.config.diagnostic_delay, wake);
            }
            Request::Scheduled {
                request_frame: true,
            } => {
                let wake = self.wake(Message::Frame);
                self.clock.request_frame(wake);
            }
            Request::Wait { .. } | Request::Scheduled { .. } => {}
        }
    }

    fn wake(&self, message: Message<State, H::Node>) -> Wake {
        let dispatcher = self.dispatcher.clone();
        Wake::new(move || dispatcher.send(message))
    }

    fn on_frame(&mut self) {
        let Some(pass) = self.scheduler.take_frame() else {
            return;
        };
        match self.run_pass(pass) {
            Ok(()) => self.last_error = None,
            Err(error) => {
                tracing::error!(%error, ?pass, "render pass failed");
                self.last_error = Some(error);
            }
        }
    }

    fn run_pass(&mut self, pass: Pass) -> Result<(), Error> {
        let (Some(target), Some(producer), Some(normalizer), Some(state)) = (
            self.target.clone(),
            self.producer.clone(),
            self.normalizer.clone(),
            self.state.as_ref(),
        ) else {
            return Ok(());
        };

        let description = producer.describe(state);
        let next = normalizer(&description, &self.config.ancestry_root)?;

        match (pass, self.tree.as_mut()) {
            (Pass::Patch, Some(tree)) => {
                tracing::debug!("patching live tree");
                patch(&mut self.host, &target, tree, next)?;
            }
            _ => {
                tracing::debug!("drawing fresh tree");
                let tree = render(&mut self.host, next)?;
                self.host.clear(&target)?;
                self.host.append_child(&target, tree.handle())?;
                self.tree = Some(tree);
            }
        }
        Ok(())
    }

    fn on_diagnostic_timeout(&mut self) {
        if let Some(missing) = self.scheduler.take_timer() {
            let error = ConfigurationError { missing };
            tracing::warn!(%error, "render root is still waiting for inputs");
            self.last_error = Some(error.into());
        }
    }
}

#[cfg(any(test, feature = "testing"))]
/// A render root wired to a [`TestHost`] and a [`ManualClock`].
///
/// Only available with the `testing` feature or during tests.
///
/// The root is created with a `body` target that is not yet mounted, so tests
/// can decide when the target arrives.
///
/// ```rust
/// use keyed_vdom::{TestDriver, Value};
///
/// let mut driver = TestDriver::<&'static str>::new();
/// let dispatcher = driver.dispatcher();
/// dispatcher.mount(driver.target);
/// dispatcher.set_producer(|name: &&'static str| Value::list([Value::from("h1"), Value::Null, Value::list([*name])]));
/// dispatcher.notify("world", "GREET", Value::Null);
///
/// driver.flush();
/// assert_eq!(driver.markup(), "<body><h1>world</h1></body>");
/// ```
pub struct TestDriver<State: 'static> {
    pub root: RenderRoot<State, TestHost, ManualClock>,
    pub host: TestHost,
    pub clock: ManualClock,
    pub target: TestNode,
}

#[cfg(any(test, feature = "testing"))]
impl<State: 'static> Default for TestDriver<State> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl<State: 'static> TestDriver<State> {
    pub fn new() -> Self {
        Self::with_config(RootConfig::default())
    }

    pub fn with_config(config: RootConfig) -> Self {
        let host = TestHost::new();
        let clock = ManualClock::new();
        let target = host.create_target("body");
        let root = RenderRoot::with_config(host.clone(), clock.clone(), config);
        Self {
            root,
            host,
            clock,
            target,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher<State, TestNode> {
        self.root.dispatcher()
    }

    /// Drain the queue and fire frames until nothing is pending.
    pub fn flush(&mut self) {
        self.root.process_pending();
        while self.clock.tick() > 0 {
            self.root.process_pending();
        }
    }

    /// Run the async loop to completion on the current thread.
    ///
    /// Returns once a shutdown message is processed, so queue one first.
    pub fn run_until_shutdown(&mut self) {
        futures::executor::block_on(self.root.run());
    }

    pub fn markup(&self) -> String {
        self.host.markup(&self.target)
    }
}
