//! Presentation-layer capability injected into a render root.

#[cfg(any(test, feature = "testing"))]
use std::collections::BTreeMap;

#[cfg(any(test, feature = "testing"))]
use std::cell::RefCell;
#[cfg(any(test, feature = "testing"))]
use std::rc::Rc;

use crate::error::HostError;
use crate::value::Value;

/// Presentation-layer operations the materializer and reconciler need.
///
/// Implement this for your display surface (a browser DOM binding, a terminal
/// cell tree, a native widget toolkit, ...). `Node` is a cheap handle to one
/// presentation node; the engine clones it freely and never inspects it.
///
/// Inserting a node that is already attached somewhere must move it, never
/// duplicate it. The reconciler relies on this when reordering children.
///
/// # Example
///
/// ```rust
/// use keyed_vdom::{Host, HostError, Value};
///
/// /// Prints every mutation instead of applying it.
/// struct LoggingHost { next: usize }
///
/// impl Host for LoggingHost {
///     type Node = usize;
///
///     fn create_text(&mut self, text: &str) -> Result<usize, HostError> {
///         self.next += 1;
///         println!("#{} = text {:?}", self.next, text);
///         Ok(self.next)
///     }
///     fn create_element(&mut self, tag: &str) -> Result<usize, HostError> {
///         self.next += 1;
///         println!("#{} = <{}>", self.next, tag);
///         Ok(self.next)
///     }
///     fn set_attribute(&mut self, node: &usize, name: &str, value: &Value) -> Result<(), HostError> {
///         println!("#{node}.{name} = {value:?}");
///         Ok(())
///     }
///     fn set_text(&mut self, node: &usize, text: &str) -> Result<(), HostError> {
///         println!("#{node}.text = {text:?}");
///         Ok(())
///     }
///     fn append_child(&mut self, parent: &usize, child: &usize) -> Result<(), HostError> {
///         println!("#{parent} append #{child}");
///         Ok(())
///     }
///     fn prepend_child(&mut self, parent: &usize, child: &usize) -> Result<(), HostError> {
///         println!("#{parent} prepend #{child}");
///         Ok(())
///     }
///     fn replace_child(&mut self, parent: &usize, new: &usize, old: &usize) -> Result<(), HostError> {
///         println!("#{parent} replace #{old} with #{new}");
///         Ok(())
///     }
///     fn remove_child(&mut self, parent: &usize, child: &usize) -> Result<(), HostError> {
///         println!("#{parent} remove #{child}");
///         Ok(())
///     }
///     fn clear(&mut self, target: &usize) -> Result<(), HostError> {
///         println!("#{target} clear");
///         Ok(())
///     }
/// }
/// ```
pub trait Host {
    type Node: Clone;

    fn create_text(&mut self, text: &str) -> Result<Self::Node, HostError>;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, HostError>;

    /// Set an attribute. [`Value::Null`] removes it.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &Value)
        -> Result<(), HostError>;

    fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), HostError>;

    /// Attach `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    /// Attach `child` before the first child of `parent`.
    fn prepend_child(&mut self, parent: &Self::Node, child: &Self::Node)
        -> Result<(), HostError>;

    /// Put `new` where `old` currently sits and detach `old`.
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new: &Self::Node,
        old: &Self::Node,
    ) -> Result<(), HostError>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    /// Detach every child of `target`.
    fn clear(&mut self, target: &Self::Node) -> Result<(), HostError>;
}

#[cfg(any(test, feature = "testing"))]
/// Handle to a node inside a [`TestHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TestNode(usize);

#[cfg(any(test, feature = "testing"))]
/// A host mutation recorded by [`TestHost`].
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    CreateText(TestNode),
    CreateElement(TestNode, String),
    SetAttribute(TestNode, String),
    SetText(TestNode, String),
    Append { parent: TestNode, child: TestNode },
    Prepend { parent: TestNode, child: TestNode },
    Replace { parent: TestNode, new: TestNode, old: TestNode },
    Remove { parent: TestNode, child: TestNode },
    Clear(TestNode),
}

#[cfg(any(test, feature = "testing"))]
enum TestContent {
    Text(String),
    Element {
        tag: String,
        attributes: BTreeMap<String, Value>,
        children: Vec<TestNode>,
    },
}

#[cfg(any(test, feature = "testing"))]
struct TestEntry {
    content: TestContent,
    parent: Option<TestNode>,
}

#[cfg(any(test, feature = "testing"))]
#[derive(Default)]
struct TestDocument {
    nodes: Vec<TestEntry>,
    mutations: Vec<Mutation>,
    failure: Option<(usize, String)>,
}

#[cfg(any(test, feature = "testing"))]
/// In-memory host that records every mutation for assertions.
///
/// Only available with the `testing` feature.
///
/// Clones share the same document, so keep one clone for inspection and hand
/// another to the render root.
///
/// # Example
///
/// ```rust
/// use keyed_vdom::{build, render, Host, TestHost, Value};
///
/// let mut host = TestHost::new();
/// let target = host.create_target("body");
///
/// let node = build(&Value::list([Value::from("p.note"), Value::Null, Value::list(["hi"])]), "root").unwrap();
/// let live = render(&mut host, node).unwrap();
/// host.append_child(&target, live.handle()).unwrap();
///
/// assert_eq!(host.markup(&target), r#"<body><p className="note">hi</p></body>"#);
/// ```
pub struct TestHost {
    document: Rc<RefCell<TestDocument>>,
}

#[cfg(any(test, feature = "testing"))]
impl Clone for TestHost {
    fn clone(&self) -> Self {
        Self {
            document: self.document.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl TestHost {
    pub fn new() -> Self {
        Self {
            document: Rc::new(RefCell::new(TestDocument::default())),
        }
    }

    /// Create a detached element to mount into. Not recorded as a mutation.
    pub fn create_target(&self, tag: &str) -> TestNode {
        self.document.borrow_mut().insert(TestContent::Element {
            tag: tag.to_owned(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        })
    }

    /// Make the next host operation fail with `message`.
    pub fn fail_next(&self, message: &str) {
        self.fail_after(0, message);
    }

    /// Let `successes` more operations through, then fail the one after with `message`.
    pub fn fail_after(&self, successes: usize, message: &str) {
        self.document.borrow_mut().failure = Some((successes, message.to_owned()));
    }

    /// Drop a scheduled failure that has not fired yet.
    pub fn cancel_failure(&self) {
        self.document.borrow_mut().failure = None;
    }

    pub fn mutation_count(&self) -> usize {
        self.document.borrow().mutations.len()
    }

    /// Access the recorded mutations with a closure.
    pub fn with_mutations<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Vec<Mutation>) -> R,
    {
        let document = self.document.borrow();
        f(&document.mutations)
    }

    pub fn clear_mutations(&self) {
        self.document.borrow_mut().mutations.clear();
    }

    pub fn children(&self, node: &TestNode) -> Vec<TestNode> {
        match &self.document.borrow().entry(*node).content {
            TestContent::Element { children, .. } => children.clone(),
            TestContent::Text(_) => Vec::new(),
        }
    }

    pub fn parent(&self, node: &TestNode) -> Option<TestNode> {
        self.document.borrow().entry(*node).parent
    }

    pub fn attribute(&self, node: &TestNode, name: &str) -> Option<Value> {
        match &self.document.borrow().entry(*node).content {
            TestContent::Element { attributes, .. } => attributes.get(name).cloned(),
            TestContent::Text(_) => None,
        }
    }

    /// Serialize the subtree under `node` as markup.
    ///
    /// Attributes print in key order, functions print as `<fn>`, and text is
    /// written verbatim.
    pub fn markup(&self, node: &TestNode) -> String {
        let document = self.document.borrow();
        let mut out = String::new();
        document.write_markup(*node, &mut out);
        out
    }

    fn apply<T>(
        &self,
        operation: impl FnOnce(&mut TestDocument) -> (T, Mutation),
    ) -> Result<T, HostError> {
        let mut document = self.document.borrow_mut();
        match document.failure.take() {
            Some((0, message)) => return Err(HostError::new(message)),
            Some((successes, message)) => document.failure = Some((successes - 1, message)),
            None => {}
        }
        let (result, mutation) = operation(&mut *document);
        document.mutations.push(mutation);
        Ok(result)
    }
}

#[cfg(any(test, feature = "testing"))]
impl TestDocument {
    fn insert(&mut self, content: TestContent) -> TestNode {
        self.nodes.push(TestEntry {
            content,
            parent: None,
        });
        TestNode(self.nodes.len() - 1)
    }

    fn entry(&self, node: TestNode) -> &TestEntry {
        &self.nodes[node.0]
    }

    fn children_mut(&mut self, node: TestNode) -> &mut Vec<TestNode> {
        match &mut self.nodes[node.0].content {
            TestContent::Element { children, .. } => children,
            TestContent::Text(_) => panic!("text node {node:?} cannot hold children"),
        }
    }

    fn detach(&mut self, child: TestNode) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            self.children_mut(parent).retain(|sibling| *sibling != child);
        }
    }

    fn attach(&mut self, parent: TestNode, child: TestNode, index: Option<usize>) {
        self.detach(child);
        let children = self.children_mut(parent);
        match index {
            Some(index) => children.insert(index, child),
            None => children.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    fn write_markup(&self, node: TestNode, out: &mut String) {
        match &self.entry(node).content {
            TestContent::Text(text) => out.push_str(text),
            TestContent::Element {
                tag,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let text = match value {
                        Value::Component(_) | Value::Callback(_) => "<fn>".to_owned(),
                        other => other.as_text().unwrap_or_else(|| format!("{other:?}")),
                    };
                    out.push_str(&format!(" {name}=\"{text}\""));
                }
                out.push('>');
                for child in children {
                    self.write_markup(*child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Host for TestHost {
    type Node = TestNode;

    fn create_text(&mut self, text: &str) -> Result<TestNode, HostError> {
        self.apply(|document| {
            let node = document.insert(TestContent::Text(text.to_owned()));
            (node, Mutation::CreateText(node))
        })
    }

    fn create_element(&mut self, tag: &str) -> Result<TestNode, HostError> {
        self.apply(|document| {
            let node = document.insert(TestContent::Element {
                tag: tag.to_owned(),
                attributes: BTreeMap::new(),
                children: Vec::new(),
            });
            (node, Mutation::CreateElement(node, tag.to_owned()))
        })
    }

    fn set_attribute(&mut self, node: &TestNode, name: &str, value: &Value) -> Result<(), HostError> {
        self.apply(|document| {
            if let TestContent::Element { attributes, .. } = &mut document.nodes[node.0].content {
                if value.is_null() {
                    attributes.remove(name);
                } else {
                    attributes.insert(name.to_owned(), value.clone());
                }
            }
            ((), Mutation::SetAttribute(*node, name.to_owned()))
        })
    }

    fn set_text(&mut self, node: &TestNode, text: &str) -> Result<(), HostError> {
        self.apply(|document| {
            if let TestContent::Text(current) = &mut document.nodes[node.0].content {
                *current = text.to_owned();
            }
            ((), Mutation::SetText(*node, text.to_owned()))
        })
    }

    fn append_child(&mut self, parent: &TestNode, child: &TestNode) -> Result<(), HostError> {
        self.apply(|document| {
            document.attach(*parent, *child, None);
            ((), Mutation::Append { parent: *parent, child: *child })
        })
    }

    fn prepend_child(&mut self, parent: &TestNode, child: &TestNode) -> Result<(), HostError> {
        self.apply(|document| {
            document.attach(*parent, *child, Some(0));
            ((), Mutation::Prepend { parent: *parent, child: *child })
        })
    }

    fn replace_child(&mut self, parent: &TestNode, new: &TestNode, old: &TestNode) -> Result<(), HostError> {
        self.apply(|document| {
            document.detach(*new);
            let children = document.children_mut(*parent);
            match children.iter().position(|sibling| sibling == old) {
                Some(index) => {
                    children[index] = *new;
                    document.nodes[old.0].parent = None;
                    document.nodes[new.0].parent = Some(*parent);
                }
                None => document.attach(*parent, *new, None),
            }
            ((), Mutation::Replace { parent: *parent, new: *new, old: *old })
        })
    }

    fn remove_child(&mut self, parent: &TestNode, child: &TestNode) -> Result<(), HostError> {
        self.apply(|document| {
            if document.nodes[child.0].parent == Some(*parent) {
                document.detach(*child);
            }
            ((), Mutation::Remove { parent: *parent, child: *child })
        })
    }

    fn clear(&mut self, target: &TestNode) -> Result<(), HostError> {
        self.apply(|document| {
            for child in std::mem::take(document.children_mut(*target)) {
                document.nodes[child.0].parent = None;
            }
            ((), Mutation::Clear(*target))
        })
    }
}
