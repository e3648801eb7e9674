//! Reconciles a live tree against a freshly built intermediate tree.
//!
//! Cases, in priority order, for each slot:
//!
//! 1. nothing before and nothing now: no-op
//! 2. nothing before: render and append
//! 3. nothing now: detach and forget
//! 4. tag or kind changed: render and splice in place of the old node
//! 5. text: update the text if it differs
//! 6. element: update changed attributes, patch children by key, then reorder
//!
//! Reordering keeps the longest run of keys that already sit in the same
//! relative positions and moves everything else around it. The final order is
//! always exactly the new `child_order`; only the number of moves varies.

use std::collections::{HashMap, HashSet};

use crate::error::ReconciliationError;
use crate::host::Host;
use crate::node::{VElement, VNode};
use crate::render::{render, LiveElement, LiveKind, LiveNode};
use crate::value::{Attributes, Value};

/// Bring `live` in sync with `next`, mutating the host tree and `live` in place.
///
/// `parent` is the host node `live` is attached to; it is only touched when
/// `live` has to be replaced.
pub fn patch<H: Host>(
    host: &mut H,
    parent: &H::Node,
    live: &mut LiveNode<H::Node>,
    next: VNode,
) -> Result<(), ReconciliationError> {
    let next = match (&mut live.kind, next) {
        (LiveKind::Text(text), VNode::Text(next_text)) => {
            if *text != next_text {
                host.set_text(&live.handle, &next_text)?;
                *text = next_text;
            }
            return Ok(());
        }
        (LiveKind::Element(element), VNode::Element(next_element))
            if element.tag_name == next_element.tag_name =>
        {
            return patch_element(host, &live.handle, element, next_element);
        }
        (_, next) => next,
    };

    let replacement = render(host, next)?;
    host.replace_child(parent, &replacement.handle, &live.handle)?;
    *live = replacement;
    Ok(())
}

/// Patch the child slot `key` of an element.
///
/// Handles the cases where either side is absent. `order` is the element's
/// recorded on-screen order and is updated right after each host mutation, so
/// a pass that fails halfway still leaves every attached child listed.
fn patch_slot<H: Host>(
    host: &mut H,
    handle: &H::Node,
    children: &mut HashMap<String, LiveNode<H::Node>>,
    order: &mut Vec<String>,
    key: &str,
    next: Option<VNode>,
) -> Result<(), ReconciliationError> {
    if let Some(child) = children.get_mut(key) {
        match next {
            Some(next) => patch(host, handle, child, next)?,
            None => {
                host.remove_child(handle, &child.handle)?;
                children.remove(key);
                order.retain(|existing| existing != key);
            }
        }
    } else if let Some(next) = next {
        let child = render(host, next)?;
        host.append_child(handle, &child.handle)?;
        children.insert(key.to_owned(), child);
        order.push(key.to_owned());
    }
    Ok(())
}

fn patch_element<H: Host>(
    host: &mut H,
    handle: &H::Node,
    live: &mut LiveElement<H::Node>,
    next: VElement,
) -> Result<(), ReconciliationError> {
    let VElement {
        attributes,
        mut children,
        child_order,
        ..
    } = next;

    for name in changed_attributes(&live.attributes, &attributes) {
        match attributes.get(&name) {
            Some(value) => {
                host.set_attribute(handle, &name, value)?;
                live.attributes.insert(name, value.clone());
            }
            None => {
                host.set_attribute(handle, &name, &Value::Null)?;
                live.attributes.remove(&name);
            }
        }
    }

    for key in key_union(&live.child_order, &child_order) {
        let incoming = children.remove(&key);
        patch_slot(host, handle, &mut live.children, &mut live.child_order, &key, incoming)?;
    }

    reorder(host, handle, &live.children, &mut live.child_order, &child_order)
}

/// Attribute names whose value differs between `old` and `new`.
///
/// A name present on one side only counts as changed, and so does any name
/// holding a function on either side.
pub fn changed_attributes(old: &Attributes, new: &Attributes) -> Vec<String> {
    let mut changed: Vec<String> = old
        .iter()
        .filter(|(name, value)| match new.get(*name) {
            Some(other) => value.is_function() || other.is_function() || *value != other,
            None => true,
        })
        .map(|(name, _)| name.clone())
        .collect();
    changed.extend(
        new.keys()
            .filter(|name| !old.contains_key(*name))
            .cloned(),
    );
    changed
}

/// Old keys in their order, followed by new keys that were not there before.
fn key_union(old: &[String], new: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = old.iter().map(String::as_str).collect();
    let mut union = old.to_vec();
    for key in new {
        if seen.insert(key) {
            union.push(key.clone());
        }
    }
    union
}

/// A run of keys kept in place while reordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    /// Index of the first kept key in the new order.
    pub start: usize,
    pub len: usize,
}

/// Longest run of keys occupying consecutive positions in both orders.
///
/// For each start index in `target` the run is extended while both sequences
/// keep agreeing key by key. The first longest run wins. This is not a longest
/// common subsequence, and for some permutations it keeps less than the optimum.
pub fn longest_run(current: &[String], target: &[String]) -> Run {
    let positions: HashMap<&str, usize> = current
        .iter()
        .enumerate()
        .map(|(index, key)| (key.as_str(), index))
        .collect();

    let mut best = Run { start: 0, len: 0 };
    for start in 0..target.len() {
        let Some(&origin) = positions.get(target[start].as_str()) else {
            continue;
        };
        let len = target[start..]
            .iter()
            .zip(&current[origin..])
            .take_while(|(wanted, present)| wanted == present)
            .count();
        if len > best.len {
            best = Run { start, len };
        }
    }
    best
}

/// Move children around the longest run until `current` matches `target`.
///
/// `current` mirrors every move as soon as the host applied it.
fn reorder<H: Host>(
    host: &mut H,
    handle: &H::Node,
    children: &HashMap<String, LiveNode<H::Node>>,
    current: &mut Vec<String>,
    target: &[String],
) -> Result<(), ReconciliationError> {
    let run = longest_run(current, target);
    let child_handle = |key: &String| {
        children
            .get(key)
            .map(LiveNode::handle)
            .ok_or_else(|| ReconciliationError::MissingChild(key.clone()))
    };

    for key in target[..run.start].iter().rev() {
        tracing::trace!(key = %key, "moving child to front");
        host.prepend_child(handle, child_handle(key)?)?;
        current.retain(|existing| existing != key);
        current.insert(0, key.clone());
    }
    for key in &target[run.start + run.len..] {
        tracing::trace!(key = %key, "moving child to back");
        host.append_child(handle, child_handle(key)?)?;
        current.retain(|existing| existing != key);
        current.push(key.clone());
    }
    Ok(())
}
