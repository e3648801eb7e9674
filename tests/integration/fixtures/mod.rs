use keyed_vdom::{build, render, Attributes, Host, LiveNode, TestHost, TestNode, VNode, Value};

/// `[tag, attributes, children]`
pub(crate) fn el(tag: &str, attributes: Value, children: Value) -> Value {
    Value::list([Value::from(tag), attributes, children])
}

pub(crate) fn no_attributes() -> Value {
    Value::Map(Attributes::new())
}

/// A `ul` whose `li` children are keyed and labelled by `keys`.
pub(crate) fn keyed_list(keys: &[&str]) -> Value {
    let items = keys
        .iter()
        .map(|key| el("li", Value::map([("key", *key)]), Value::list([*key])))
        .collect::<Vec<_>>();
    el("ul", no_attributes(), Value::List(items))
}

pub(crate) fn built(description: &Value) -> VNode {
    build(description, "root").expect("fixture descriptions are well formed")
}

/// Render `description` into a fresh host and attach it to a `body` target.
pub(crate) fn mounted(description: &Value) -> (TestHost, TestNode, LiveNode<TestNode>) {
    let mut host = TestHost::new();
    let target = host.create_target("body");
    let live = render(&mut host, built(description)).expect("test host does not fail");
    host.append_child(&target, live.handle()).expect("test host does not fail");
    host.clear_mutations();
    (host, target, live)
}

/// Markup as read directly off an intermediate tree, in the test host's format.
pub(crate) fn markup_of(node: &VNode) -> String {
    match node {
        VNode::Text(text) => text.clone(),
        VNode::Element(element) => {
            let mut out = format!("<{}", element.tag_name);
            for (name, value) in &element.attributes {
                let text = value.as_text().unwrap_or_default();
                out.push_str(&format!(" {name}=\"{text}\""));
            }
            out.push('>');
            for (_, child) in node.ordered_children() {
                out.push_str(&markup_of(child));
            }
            out.push_str(&format!("</{}>", element.tag_name));
            out
        }
    }
}
