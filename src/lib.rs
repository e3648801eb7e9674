//! A keyed virtual-tree reconciliation engine for declarative UIs.
//!
//! UI is described as plain data ([`Value`]): `null`/booleans render nothing,
//! numbers and strings render as text, and `[tag, attributes?, children?]`
//! lists describe elements. Tags use a compact shorthand,
//! `name[#id][.class]*[| inline-style]`, and the head of a list may also be a
//! [`Component`] that expands into another description.
//!
//! The pipeline:
//!
//! 1. [`build`] normalizes a description into an intermediate [`VNode`] tree with
//!    keyed children.
//! 2. [`render`] materializes that tree into host nodes through the injected
//!    [`Host`], returning a [`LiveNode`] tree that records what is on screen.
//! 3. [`patch`] reconciles a live tree against a newly built one, touching only
//!    what changed and reordering keyed children with a cheap heuristic.
//! 4. [`RenderRoot`] ties it together: it collects a mount target, a
//!    [`Producer`], state and a normalizer through its [`Dispatcher`], and runs
//!    at most one pass per frame of the injected [`Clock`].
//!
//! ## Example
//!
//! ```rust
//! use keyed_vdom::{build, patch, render, Host, TestHost, Value};
//!
//! fn list(keys: &[&str]) -> Value {
//!     let items = keys
//!         .iter()
//!         .map(|key| Value::list([Value::from("li"), Value::map([("key", *key)]), Value::list([*key])]))
//!         .collect::<Vec<_>>();
//!     Value::list([Value::from("ul#items"), Value::Null, Value::List(items)])
//! }
//!
//! let mut host = TestHost::new();
//! let target = host.create_target("body");
//!
//! let mut live = render(&mut host, build(&list(&["a", "b", "c"]), "root").unwrap()).unwrap();
//! host.append_child(&target, live.handle()).unwrap();
//!
//! patch(&mut host, &target, &mut live, build(&list(&["c", "a", "b"]), "root").unwrap()).unwrap();
//!
//! assert_eq!(live.child_order(), ["c", "a", "b"]);
//! assert_eq!(
//!     host.markup(&target),
//!     r#"<body><ul id="items"><li key="c">c</li><li key="a">a</li><li key="b">b</li></ul></body>"#
//! );
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber. Failed
//! passes are logged at `error`, missing inputs at `warn`, pass starts at
//! `debug` and individual child moves at `trace`.

// Module declarations
mod build;
mod clock;
mod config;
mod dispatcher;
mod error;
mod host;
mod node;
mod patch;
mod producer;
mod render;
mod root;
mod scheduler;
mod value;

// Public re-exports
pub use build::{build, Tag};
pub use clock::{Clock, Wake};
pub use config::RootConfig;
pub use dispatcher::{Dispatcher, Normalizer};
pub use error::{
    ConfigurationError, DescriptionCause, DescriptionError, Error, HostError, ReconciliationError,
};
pub use host::Host;
pub use node::{VElement, VNode};
pub use patch::{changed_attributes, longest_run, patch, Run};
pub use producer::{constant, Producer};
pub use render::{render, LiveNode};
pub use root::RenderRoot;
pub use scheduler::{Input, Pass, Phase, Request, Scheduler};
pub use value::{Attributes, Callback, Component, Value};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;
#[cfg(any(test, feature = "testing"))]
pub use host::{Mutation, TestHost, TestNode};
#[cfg(any(test, feature = "testing"))]
pub use root::TestDriver;
