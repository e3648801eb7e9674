//! Intermediate nodes produced by the builder.

use std::collections::HashMap;

use crate::value::{Attributes, Value};

/// A normalized description node.
///
/// Produced by [`build`](crate::build) and consumed exactly once, either by
/// [`render`](crate::render) on a fresh draw or by [`patch`](crate::patch) when
/// reconciling against a live tree.
#[derive(Clone, Debug, PartialEq)]
pub enum VNode {
    Text(String),
    Element(VElement),
}

/// An element node with keyed children.
///
/// `children` is only used for keyed lookup; `child_order` alone defines the
/// order children are rendered and traversed in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VElement {
    pub tag_name: String,
    pub attributes: Attributes,
    pub children: HashMap<String, VNode>,
    pub child_order: Vec<String>,
}

impl VNode {
    pub fn text(text: impl Into<String>) -> Self {
        VNode::Text(text.into())
    }

    /// `None` for text nodes, so a text/element swap reads as a tag change.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            VNode::Text(_) => None,
            VNode::Element(element) => Some(&element.tag_name),
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            VNode::Text(_) => None,
            VNode::Element(element) => Some(&element.attributes),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes().and_then(|attributes| attributes.get(name))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VNode::Text(text) => Some(text),
            VNode::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&VElement> {
        match self {
            VNode::Text(_) => None,
            VNode::Element(element) => Some(element),
        }
    }

    /// Children in render order. Empty for text nodes.
    pub fn ordered_children(&self) -> impl Iterator<Item = (&str, &VNode)> {
        self.as_element().into_iter().flat_map(|element| {
            element
                .child_order
                .iter()
                .filter_map(|key| element.children.get(key).map(|child| (key.as_str(), child)))
        })
    }
}

impl VElement {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Append a child under `key`, keeping `child_order` in step with `children`.
    pub fn push_child(&mut self, key: impl Into<String>, child: VNode) {
        let key = key.into();
        self.child_order.push(key.clone());
        self.children.insert(key, child);
    }
}
