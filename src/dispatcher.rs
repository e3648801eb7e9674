//! Handle through which collaborators talk to a render root.

use std::rc::Rc;

use flume::Sender;

use crate::error::DescriptionError;
use crate::node::VNode;
use crate::producer::Producer;
use crate::value::Value;

/// The build step a root runs on every produced description.
pub type Normalizer = Rc<dyn Fn(&Value, &str) -> Result<VNode, DescriptionError>>;

pub(crate) enum Message<State, Node> {
    State { state: State, action: String, params: Value },
    Producer(Rc<dyn Producer<State>>),
    Normalizer(Normalizer),
    Mount(Node),
    Update { force: bool },
    Frame,
    DiagnosticTimeout,
    Shutdown,
}

/// Cloneable handle for feeding a [`RenderRoot`](crate::RenderRoot).
///
/// Every call only queues a message; the root picks it up the next time it
/// drains its queue. Hand clones to the state container, the router and any
/// event callbacks that need to request a redraw.
///
/// Messages are processed on the thread that drives the root, in the order
/// they were sent.
///
/// # Example
///
/// ```rust
/// use keyed_vdom::{RenderRoot, TestHost, ManualClock, Value};
///
/// let host = TestHost::new();
/// let clock = ManualClock::new();
/// let target = host.create_target("body");
/// let mut root: RenderRoot<u32, _, _> = RenderRoot::new(host.clone(), clock.clone());
///
/// let dispatcher = root.dispatcher();
/// dispatcher.mount(target);
/// dispatcher.set_producer(|count: &u32| Value::list([Value::from("b"), Value::Null, Value::list([*count])]));
/// dispatcher.notify(7, "INIT", Value::Null);
///
/// root.process_pending();
/// clock.tick();
/// root.process_pending();
///
/// assert_eq!(host.markup(&target), "<body><b>7</b></body>");
/// ```
pub struct Dispatcher<State, Node>(pub(crate) Sender<Message<State, Node>>);

impl<State, Node> Clone for Dispatcher<State, Node> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<State, Node> Dispatcher<State, Node> {
    pub(crate) fn new(sender: Sender<Message<State, Node>>) -> Self {
        Self(sender)
    }

    /// Deliver a committed state change.
    ///
    /// The latest state wins if several arrive before the next frame. `action`
    /// is only logged and `params` are not interpreted.
    pub fn notify(&self, state: State, action: impl Into<String>, params: Value) {
        self.send(Message::State {
            state,
            action: action.into(),
            params,
        });
    }

    /// Replace the function that turns state into a description.
    pub fn set_producer<P>(&self, producer: P)
    where
        P: Producer<State> + 'static,
    {
        self.send(Message::Producer(Rc::new(producer)));
    }

    /// Replace the build step. Forces a redraw.
    pub fn set_normalizer<F>(&self, normalizer: F)
    where
        F: Fn(&Value, &str) -> Result<VNode, DescriptionError> + 'static,
    {
        self.send(Message::Normalizer(Rc::new(normalizer)));
    }

    /// Supply or replace the node the tree is attached to. Forces a redraw.
    pub fn mount(&self, target: Node) {
        self.send(Message::Mount(target));
    }

    /// Request a reconciliation pass.
    pub fn update(&self) {
        self.send(Message::Update { force: false });
    }

    /// Request a pass that discards the current tree and draws from scratch.
    pub fn redraw(&self) {
        self.send(Message::Update { force: true });
    }

    /// Stop [`RenderRoot::run`](crate::RenderRoot::run) after the messages queued before this one.
    pub fn shutdown(&self) {
        self.send(Message::Shutdown);
    }

    pub(crate) fn send(&self, message: Message<State, Node>) {
        self.0.send(message).ok();
    }
}
