//! Materializes intermediate nodes into live host nodes.

use std::collections::HashMap;

use crate::error::ReconciliationError;
use crate::host::Host;
use crate::node::{VElement, VNode};
use crate::value::{Attributes, Value};

/// A rendered node: the shape it was last rendered with plus its host handle.
///
/// A live tree mirrors what is currently on screen and is the reconciler's only
/// record of it. Nodes are patched in place; when a node is replaced wholesale
/// the value behind the same `&mut LiveNode` slot is overwritten, so whoever owns
/// the slot sees the new content without refreshing anything.
#[derive(Debug)]
pub struct LiveNode<N> {
    pub(crate) handle: N,
    pub(crate) kind: LiveKind<N>,
}

#[derive(Debug)]
pub(crate) enum LiveKind<N> {
    Text(String),
    Element(LiveElement<N>),
}

#[derive(Debug)]
pub(crate) struct LiveElement<N> {
    pub(crate) tag_name: String,
    pub(crate) attributes: Attributes,
    pub(crate) children: HashMap<String, LiveNode<N>>,
    pub(crate) child_order: Vec<String>,
}

impl<N> LiveNode<N> {
    pub fn handle(&self) -> &N {
        &self.handle
    }

    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            LiveKind::Text(_) => None,
            LiveKind::Element(element) => Some(&element.tag_name),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            LiveKind::Text(text) => Some(text),
            LiveKind::Element(_) => None,
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match &self.kind {
            LiveKind::Text(_) => None,
            LiveKind::Element(element) => Some(&element.attributes),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes().and_then(|attributes| attributes.get(name))
    }

    pub fn child(&self, key: &str) -> Option<&LiveNode<N>> {
        match &self.kind {
            LiveKind::Text(_) => None,
            LiveKind::Element(element) => element.children.get(key),
        }
    }

    /// Keys of the children in the order they sit on screen.
    pub fn child_order(&self) -> &[String] {
        match &self.kind {
            LiveKind::Text(_) => &[],
            LiveKind::Element(element) => &element.child_order,
        }
    }

    /// Rebuild the intermediate shape this node was last rendered with.
    pub fn shape(&self) -> VNode {
        match &self.kind {
            LiveKind::Text(text) => VNode::Text(text.clone()),
            LiveKind::Element(element) => VNode::Element(VElement {
                tag_name: element.tag_name.clone(),
                attributes: element.attributes.clone(),
                children: element
                    .children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.shape()))
                    .collect(),
                child_order: element.child_order.clone(),
            }),
        }
    }
}

/// Create host nodes for `node` and everything below it.
///
/// Children are appended in `child_order`. The returned root is not attached
/// anywhere; the caller decides when to put it on screen.
///
/// A key listed in `child_order` but absent from `children` fails with
/// [`ReconciliationError::MissingChild`], as it does when patching.
pub fn render<H: Host>(
    host: &mut H,
    node: VNode,
) -> Result<LiveNode<H::Node>, ReconciliationError> {
    match node {
        VNode::Text(text) => Ok(LiveNode {
            handle: host.create_text(&text)?,
            kind: LiveKind::Text(text),
        }),
        VNode::Element(element) => {
            let VElement {
                tag_name,
                attributes,
                mut children,
                child_order,
            } = element;

            let handle = host.create_element(&tag_name)?;
            for (name, value) in &attributes {
                host.set_attribute(&handle, name, value)?;
            }

            let mut live_children = HashMap::with_capacity(child_order.len());
            for key in &child_order {
                let child = children
                    .remove(key)
                    .ok_or_else(|| ReconciliationError::MissingChild(key.clone()))?;
                let child = render(host, child)?;
                host.append_child(&handle, &child.handle)?;
                live_children.insert(key.clone(), child);
            }

            Ok(LiveNode {
                handle,
                kind: LiveKind::Element(LiveElement {
                    tag_name,
                    attributes,
                    children: live_children,
                    child_order,
                }),
            })
        }
    }
}
