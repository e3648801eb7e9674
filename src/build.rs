//! Normalizes UI description values into intermediate nodes.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DescriptionCause, DescriptionError};
use crate::node::{VElement, VNode};
use crate::value::{Attributes, Component, Value};

// name[#id][.class]*[| inline-style], with ASCII word characters only
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^ *([A-Za-z0-9_]+)(?:#([-A-Za-z0-9_]+))?((?:\.[-A-Za-z0-9_]+)*)(?:\|\s*(\S.*?))?\s*$")
        .expect("tag pattern compiles")
});

static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-A-Za-z0-9_]+$").expect("key pattern compiles"));

/// The id, class and style parts of a shorthand tag such as `div#app.red.big|color:red`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub style: Option<String>,
}

impl Tag {
    /// Parse the shorthand tag grammar. `None` if `raw` does not match it.
    pub fn parse(raw: &str) -> Option<Self> {
        let captures = TAG_PATTERN.captures(raw)?;
        let part = |index| captures.get(index).map(|found| found.as_str().to_owned());

        Some(Self {
            name: part(1)?,
            id: part(2),
            classes: captures
                .get(3)
                .map(|found| {
                    found
                        .as_str()
                        .split('.')
                        .filter(|class| !class.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            style: part(4),
        })
    }

    /// Fold the shorthand parts into explicit attributes.
    ///
    /// An explicit `id` wins, classes are merged and deduplicated with shorthand
    /// classes first, and the shorthand style is prepended to an explicit one.
    fn merge_into(self, attributes: &mut Attributes) {
        if let Some(id) = self.id {
            let explicit = attributes.get("id").is_some_and(|value| !value.is_null());
            if !explicit {
                attributes.insert("id".into(), Value::String(id));
            }
        }

        let explicit_classes = attributes.get("className").and_then(Value::as_text);
        if !self.classes.is_empty() || explicit_classes.is_some() {
            let mut merged: Vec<String> = Vec::new();
            let explicit = explicit_classes.unwrap_or_default();
            for class in self
                .classes
                .iter()
                .map(String::as_str)
                .chain(explicit.split_whitespace())
            {
                if !merged.iter().any(|seen| seen == class) {
                    merged.push(class.to_owned());
                }
            }
            attributes.insert("className".into(), Value::String(merged.join(" ")));
        }

        if let Some(style) = self.style {
            let merged = match attributes.get("style").and_then(Value::as_text) {
                Some(explicit) => format!("{style};{explicit}"),
                None => style,
            };
            attributes.insert("style".into(), Value::String(merged));
        }
    }
}

/// Normalize a description into an intermediate node.
///
/// `ancestry` labels where in the tree the description sits; every element
/// appends ` -> {tag}` before descending so errors can say where they happened.
///
/// # Example
///
/// ```rust
/// use keyed_vdom::{build, Value, VNode};
///
/// let node = build(
///     &Value::list([Value::from("div#app.red"), Value::Map(Default::default()), Value::list(["hello"])]),
///     "root",
/// )
/// .unwrap();
///
/// assert_eq!(node.tag_name(), Some("div"));
/// assert_eq!(node.attribute("id"), Some(&Value::from("app")));
/// assert_eq!(node.attribute("className"), Some(&Value::from("red")));
/// assert_eq!(node.as_element().unwrap().children["0"], VNode::text("hello"));
/// ```
pub fn build(description: &Value, ancestry: &str) -> Result<VNode, DescriptionError> {
    match description {
        Value::Null | Value::Bool(_) => Ok(VNode::text("")),
        Value::Number(number) => Ok(VNode::Text(number.to_string())),
        Value::String(text) => Ok(VNode::Text(text.clone())),
        Value::List(items) => build_sequence(description, items, ancestry),
        Value::Map(_) | Value::Component(_) | Value::Callback(_) => Err(DescriptionError::new(
            ancestry,
            description,
            DescriptionCause::UnrecognizedShape,
        )),
    }
}

fn build_sequence(
    description: &Value,
    items: &[Value],
    ancestry: &str,
) -> Result<VNode, DescriptionError> {
    let fail = |cause| DescriptionError::new(ancestry, description, cause);

    if items.is_empty() || items.len() > 3 {
        return Err(fail(DescriptionCause::SequenceLength(items.len())));
    }

    let attributes = match items.get(1) {
        None | Some(Value::Null) => Attributes::new(),
        Some(Value::Map(attributes)) => attributes.clone(),
        Some(_) => return Err(fail(DescriptionCause::AttributesNotMapping)),
    };
    let children: &[Value] = match items.get(2) {
        None | Some(Value::Null) => &[],
        Some(Value::List(children)) => children,
        Some(_) => return Err(fail(DescriptionCause::ChildrenNotSequence)),
    };

    match &items[0] {
        Value::Component(component) => expand(component, attributes, children, ancestry),
        Value::String(raw) => {
            let tag = Tag::parse(raw).ok_or_else(|| fail(DescriptionCause::InvalidTag(raw.clone())))?;
            build_element(tag, attributes, children, &format!("{ancestry} -> {raw}"))
        }
        _ => Err(fail(DescriptionCause::UnexpectedHead)),
    }
}

fn expand(
    component: &Component,
    mut props: Attributes,
    children: &[Value],
    ancestry: &str,
) -> Result<VNode, DescriptionError> {
    props.insert("children".into(), Value::List(children.to_vec()));
    let produced = component.call(&props, ancestry);
    build(&produced, ancestry)
}

fn build_element(
    tag: Tag,
    mut attributes: Attributes,
    children: &[Value],
    ancestry: &str,
) -> Result<VNode, DescriptionError> {
    let mut element = VElement {
        tag_name: tag.name.clone(),
        children: HashMap::with_capacity(children.len()),
        child_order: Vec::with_capacity(children.len()),
        ..VElement::default()
    };
    tag.merge_into(&mut attributes);
    element.attributes = attributes;

    for (index, description) in children.iter().enumerate() {
        let child = build(description, ancestry)?;
        let key = match child.attribute("key") {
            Some(explicit) => child_key(explicit, description, ancestry)?,
            None => index.to_string(),
        };
        if element.children.contains_key(&key) {
            return Err(DescriptionError::new(
                ancestry,
                description,
                DescriptionCause::DuplicateKey(key),
            ));
        }
        element.push_child(key, child);
    }

    Ok(VNode::Element(element))
}

fn child_key(key: &Value, description: &Value, ancestry: &str) -> Result<String, DescriptionError> {
    let key = match key {
        Value::String(_) | Value::Number(_) => key.as_text().unwrap_or_default(),
        _ => {
            return Err(DescriptionError::new(
                ancestry,
                description,
                DescriptionCause::KeyNotScalar,
            ))
        }
    };
    if !KEY_PATTERN.is_match(&key) {
        return Err(DescriptionError::new(
            ancestry,
            description,
            DescriptionCause::InvalidKey(key),
        ));
    }
    Ok(key)
}
