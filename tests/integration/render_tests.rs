use super::{built, el, keyed_list, markup_of, mounted, no_attributes};
use keyed_vdom::{render, Mutation, TestHost, Value};

#[test]
fn given_description_should_render_matching_markup() {
    let description = el(
        "div#app.red",
        no_attributes(),
        Value::list([
            Value::from("hello "),
            el("b|font-weight:bold", Value::map([("title", "greeting")]), Value::list(["world"])),
            Value::from(3),
            Value::Bool(false),
        ]),
    );

    let (host, target, live) = mounted(&description);

    assert_eq!(
        host.markup(&target),
        r#"<body><div className="red" id="app">hello <b style="font-weight:bold" title="greeting">world</b>3</div></body>"#
    );
    assert_eq!(markup_of(&built(&description)), host.markup(live.handle()));
}

#[test]
fn given_keyed_children_should_record_order_and_handles() {
    let (host, _, live) = mounted(&keyed_list(&["x", "y"]));

    assert_eq!(live.child_order(), ["x", "y"]);
    let children = host.children(live.handle());
    assert_eq!(children.len(), 2);
    assert_eq!(live.child("x").map(|child| *child.handle()), Some(children[0]));
    assert_eq!(live.child("y").map(|child| *child.handle()), Some(children[1]));
}

#[test]
fn given_element_should_create_before_attaching() {
    let mut host = TestHost::new();
    let live = render(
        &mut host,
        built(&el("p", Value::map([("lang", "en")]), Value::list(["hi"]))),
    )
    .unwrap();

    let paragraph = *live.handle();
    let text = *live.child("0").unwrap().handle();
    host.with_mutations(|mutations| {
        assert_eq!(
            mutations,
            &vec![
                Mutation::CreateElement(paragraph, "p".to_owned()),
                Mutation::SetAttribute(paragraph, "lang".to_owned()),
                Mutation::CreateText(text),
                Mutation::Append {
                    parent: paragraph,
                    child: text,
                },
            ]
        );
    });
}

#[test]
fn given_sentinel_values_should_render_empty_text() {
    for description in [Value::Null, Value::Bool(true), Value::Bool(false)] {
        let (host, target, live) = mounted(&description);
        assert_eq!(live.text(), Some(""));
        assert_eq!(host.markup(&target), "<body></body>");
    }
}

#[test]
fn given_mounted_root_should_sit_under_target() {
    let (host, target, live) = mounted(&el("main", no_attributes(), Value::Null));
    assert_eq!(host.parent(live.handle()), Some(target));
    assert_eq!(host.children(&target), vec![*live.handle()]);
}
