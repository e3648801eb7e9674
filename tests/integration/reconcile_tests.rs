use super::{built, el, keyed_list, mounted, no_attributes};
use keyed_vdom::{patch, Callback, Mutation, ReconciliationError, TestHost, TestNode, Value};

fn moves(host: &TestHost) -> Vec<Mutation> {
    host.with_mutations(|mutations| {
        mutations
            .iter()
            .filter(|mutation| matches!(mutation, Mutation::Prepend { .. } | Mutation::Append { .. }))
            .cloned()
            .collect()
    })
}

fn item_handle(live: &keyed_vdom::LiveNode<TestNode>, key: &str) -> TestNode {
    *live.child(key).expect("child exists").handle()
}

#[test]
fn given_same_description_should_not_mutate_the_host() {
    let description = el(
        "section#s.a.b|color:red",
        Value::map([("title", "t")]),
        Value::list([Value::from("text"), keyed_list(&["a", "b"]), Value::from(1)]),
    );
    let (mut host, target, mut live) = mounted(&description);

    patch(&mut host, &target, &mut live, built(&description)).unwrap();

    assert_eq!(host.mutation_count(), 0);
}

#[test]
fn given_changed_text_should_only_set_text() {
    let (mut host, target, mut live) = mounted(&Value::from("before"));
    let handle = *live.handle();

    patch(&mut host, &target, &mut live, built(&Value::from("after"))).unwrap();

    assert_eq!(live.text(), Some("after"));
    host.with_mutations(|mutations| {
        assert_eq!(mutations, &vec![Mutation::SetText(handle, "after".to_owned())]);
    });
}

#[test]
fn given_changed_attributes_should_update_only_the_difference() {
    let (mut host, target, mut live) = mounted(&el(
        "a",
        Value::map([("href", "/old"), ("title", "same"), ("rel", "gone")]),
        Value::Null,
    ));
    let handle = *live.handle();

    patch(
        &mut host,
        &target,
        &mut live,
        built(&el(
            "a",
            Value::map([("href", "/new"), ("title", "same"), ("target", "_blank")]),
            Value::Null,
        )),
    )
    .unwrap();

    assert_eq!(live.attribute("href"), Some(&Value::from("/new")));
    assert_eq!(live.attribute("rel"), None);
    assert_eq!(live.attribute("target"), Some(&Value::from("_blank")));
    assert_eq!(host.attribute(&handle, "rel"), None);
    assert_eq!(
        host.markup(&handle),
        r#"<a href="/new" target="_blank" title="same"></a>"#
    );
    host.with_mutations(|mutations| {
        let mut names: Vec<_> = mutations
            .iter()
            .map(|mutation| match mutation {
                Mutation::SetAttribute(_, name) => name.as_str(),
                other => panic!("unexpected mutation {other:?}"),
            })
            .collect();
        names.sort_unstable();
        assert_eq!(names, ["href", "rel", "target"]);
    });
}

#[test]
fn given_function_attribute_should_always_be_reapplied() {
    let button = |handler: Callback| el("button", Value::map([("onClick", handler)]), Value::list(["go"]));
    let handler = Callback::new(|_| {});
    let (mut host, target, mut live) = mounted(&button(handler.clone()));
    let handle = *live.handle();

    patch(&mut host, &target, &mut live, built(&button(handler))).unwrap();

    host.with_mutations(|mutations| {
        assert_eq!(mutations, &vec![Mutation::SetAttribute(handle, "onClick".to_owned())]);
    });
}

#[test]
fn given_new_tag_should_replace_in_place() {
    let (mut host, target, mut live) = mounted(&el("div", no_attributes(), Value::list(["x"])));
    let old = *live.handle();

    patch(&mut host, &target, &mut live, built(&el("span", no_attributes(), Value::list(["x"])))).unwrap();

    assert_eq!(live.tag_name(), Some("span"));
    assert_ne!(*live.handle(), old);
    assert_eq!(host.parent(&old), None);
    assert_eq!(host.markup(&target), "<body><span>x</span></body>");
}

#[test]
fn given_element_becoming_a_sentinel_should_replace_with_empty_text() {
    for sentinel in [Value::Null, Value::Bool(false), Value::Bool(true)] {
        let (mut host, target, mut live) = mounted(&keyed_list(&["a"]));
        let old = *live.handle();

        patch(&mut host, &target, &mut live, built(&sentinel)).unwrap();

        assert_eq!(live.text(), Some(""));
        host.with_mutations(|mutations| {
            assert!(mutations.iter().any(|mutation| matches!(
                mutation,
                Mutation::Replace { old: replaced, .. } if *replaced == old
            )));
        });
        assert_eq!(host.markup(&target), "<body></body>");
    }
}

#[test]
fn given_text_becoming_an_element_should_replace() {
    let (mut host, target, mut live) = mounted(&Value::from("plain"));

    patch(&mut host, &target, &mut live, built(&el("em", no_attributes(), Value::list(["rich"])))).unwrap();

    assert_eq!(live.tag_name(), Some("em"));
    assert_eq!(host.markup(&target), "<body><em>rich</em></body>");
}

#[test]
fn given_replaced_child_should_keep_its_slot() {
    let (mut host, target, mut live) = mounted(&el(
        "div",
        no_attributes(),
        Value::list([Value::from("a"), el("i", no_attributes(), Value::Null), Value::from("c")]),
    ));

    patch(
        &mut host,
        &target,
        &mut live,
        built(&el(
            "div",
            no_attributes(),
            Value::list([Value::from("a"), el("u", no_attributes(), Value::Null), Value::from("c")]),
        )),
    )
    .unwrap();

    assert_eq!(live.child("1").and_then(|child| child.tag_name()), Some("u"));
    assert_eq!(host.markup(&target), "<body><div>a<u></u>c</div></body>");
    assert!(moves(&host).is_empty());
}

#[test]
fn given_added_and_removed_keys_should_update_children() {
    let (mut host, target, mut live) = mounted(&keyed_list(&["a", "b", "c"]));
    let removed = item_handle(&live, "b");

    patch(&mut host, &target, &mut live, built(&keyed_list(&["a", "c", "d"]))).unwrap();

    assert_eq!(live.child_order(), ["a", "c", "d"]);
    assert!(live.child("b").is_none());
    assert_eq!(host.parent(&removed), None);
    assert_eq!(
        host.markup(&target),
        r#"<body><ul><li key="a">a</li><li key="c">c</li><li key="d">d</li></ul></body>"#
    );
}

#[test]
fn given_rotated_keys_should_move_only_the_key_outside_the_run() {
    let (mut host, target, mut live) = mounted(&keyed_list(&["a", "b", "c"]));
    let list = *live.handle();
    let moved = item_handle(&live, "c");

    patch(&mut host, &target, &mut live, built(&keyed_list(&["c", "a", "b"]))).unwrap();

    assert_eq!(live.child_order(), ["c", "a", "b"]);
    assert_eq!(
        moves(&host),
        vec![Mutation::Prepend {
            parent: list,
            child: moved,
        }]
    );
    assert_eq!(
        host.markup(&target),
        r#"<body><ul><li key="c">c</li><li key="a">a</li><li key="b">b</li></ul></body>"#
    );
}

#[test]
fn given_reordered_keys_should_keep_child_handles() {
    let (mut host, target, mut live) = mounted(&keyed_list(&["a", "b", "c", "d"]));
    let before: Vec<_> = ["a", "b", "c", "d"].iter().map(|key| item_handle(&live, key)).collect();

    patch(&mut host, &target, &mut live, built(&keyed_list(&["d", "b", "a", "c"]))).unwrap();

    let after: Vec<_> = ["a", "b", "c", "d"].iter().map(|key| item_handle(&live, key)).collect();
    assert_eq!(before, after);
    assert_eq!(
        host.children(live.handle()),
        vec![before[3], before[1], before[0], before[2]]
    );
}

#[test]
fn given_keys_moved_after_the_run_should_append_them_in_order() {
    let (mut host, target, mut live) = mounted(&keyed_list(&["a", "b", "c", "d", "e"]));
    let list = *live.handle();

    patch(&mut host, &target, &mut live, built(&keyed_list(&["c", "d", "e", "b", "a"]))).unwrap();

    assert_eq!(
        moves(&host),
        vec![
            Mutation::Append {
                parent: list,
                child: item_handle(&live, "b"),
            },
            Mutation::Append {
                parent: list,
                child: item_handle(&live, "a"),
            },
        ]
    );
    assert_eq!(live.child_order(), ["c", "d", "e", "b", "a"]);
}

#[test]
fn given_nested_changes_should_patch_recursively() {
    let page = |title: &str, items: &[&str]| {
        el(
            "main",
            no_attributes(),
            Value::list([el("h1", no_attributes(), Value::list([title])), keyed_list(items)]),
        )
    };
    let (mut host, target, mut live) = mounted(&page("Todo", &["a", "b"]));
    let heading_text = *live.child("0").and_then(|h1| h1.child("0")).unwrap().handle();

    patch(&mut host, &target, &mut live, built(&page("Done", &["b"]))).unwrap();

    assert_eq!(
        host.markup(&target),
        r#"<body><main><h1>Done</h1><ul><li key="b">b</li></ul></main></body>"#
    );
    host.with_mutations(|mutations| {
        assert!(mutations.contains(&Mutation::SetText(heading_text, "Done".to_owned())));
    });
}

#[test]
fn given_host_failure_should_report_reconciliation_error() {
    let (mut host, target, mut live) = mounted(&Value::from("before"));
    host.fail_next("surface lost");

    let error = patch(&mut host, &target, &mut live, built(&Value::from("after"))).unwrap_err();

    assert!(matches!(error, ReconciliationError::Host(ref host_error) if host_error.message == "surface lost"));
    assert_eq!(live.text(), Some("before"));
}

#[test]
fn given_failure_after_a_child_was_added_should_still_track_that_child() {
    let (mut host, target, mut live) = mounted(&keyed_list(&["a"]));
    // b is created, labelled and appended in five calls; creating c fails
    host.fail_after(5, "out of nodes");

    let error = patch(&mut host, &target, &mut live, built(&keyed_list(&["a", "b", "c"])));

    assert!(matches!(error, Err(ReconciliationError::Host(_))));
    assert_eq!(live.child_order(), ["a", "b"]);
    assert!(live.child("c").is_none());

    patch(&mut host, &target, &mut live, built(&keyed_list(&["a"]))).unwrap();

    assert_eq!(live.child_order(), ["a"]);
    assert_eq!(host.markup(&target), r#"<body><ul><li key="a">a</li></ul></body>"#);
}

#[test]
fn given_failure_while_reordering_should_record_the_moves_already_made() {
    let (mut host, target, mut live) = mounted(&keyed_list(&["a", "b", "c"]));
    host.fail_after(1, "surface lost");

    let error = patch(&mut host, &target, &mut live, built(&keyed_list(&["c", "b", "a"])));

    assert!(matches!(error, Err(ReconciliationError::Host(_))));
    assert_eq!(live.child_order(), ["a", "c", "b"]);
    assert_eq!(
        host.markup(&target),
        r#"<body><ul><li key="a">a</li><li key="c">c</li><li key="b">b</li></ul></body>"#
    );

    patch(&mut host, &target, &mut live, built(&keyed_list(&["c", "b", "a"]))).unwrap();

    assert_eq!(live.child_order(), ["c", "b", "a"]);
    assert_eq!(
        host.markup(&target),
        r#"<body><ul><li key="c">c</li><li key="b">b</li><li key="a">a</li></ul></body>"#
    );
}

#[test]
fn given_failure_while_removing_should_keep_the_child_listed() {
    let (mut host, target, mut live) = mounted(&keyed_list(&["a", "b", "c"]));
    host.fail_after(1, "surface lost");

    let error = patch(&mut host, &target, &mut live, built(&keyed_list(&["c"])));

    assert!(matches!(error, Err(ReconciliationError::Host(_))));
    assert_eq!(live.child_order(), ["b", "c"]);

    patch(&mut host, &target, &mut live, built(&keyed_list(&["c"]))).unwrap();

    assert_eq!(host.markup(&target), r#"<body><ul><li key="c">c</li></ul></body>"#);
}
