//! End-to-end rendering behavior on small hand-built trees.

use mdtext::ast::{Node, NodeKind};
use mdtext::render::UNRESOLVED;
use mdtext::{NestingPolicy, RenderError, RenderOptions, Renderer, convert, convert_json, resolve};
use serde_json::{Value, json};

fn render(tree: Value) -> String {
    convert_json(&tree.to_string(), &RenderOptions::default()).expect("render")
}

fn text(v: &str) -> Value {
    json!({"type": "text", "value": v})
}

fn header(level: u8, children: Vec<Value>) -> Value {
    json!({"type": "header", "level": level, "children": children})
}

fn para(children: Vec<Value>) -> Value {
    json!({"type": "paragraph", "children": children})
}

fn root(children: Vec<Value>) -> Value {
    json!({"type": "root", "children": children})
}

#[test]
fn title_and_paragraph() {
    let out = render(root(vec![
        header(1, vec![text("Title")]),
        json!({"type": "blank"}),
        para(vec![text("Some text.")]),
    ]));
    assert_eq!(out, "1) Title\nSome text.\n");
}

#[test]
fn unknown_label_renders_placeholder() {
    let out = render(root(vec![para(vec![
        text("See "),
        json!({"type": "reference", "value": "id"}),
        text("."),
    ])]));
    assert_eq!(out, format!("See {UNRESOLVED}.\n"));
}

#[test]
fn double_plus_reaches_third_header() {
    let out = render(root(vec![
        header(1, vec![text("One "), json!({"type": "reference", "value": "++"})]),
        header(1, vec![text("Two")]),
        header(1, vec![text("Three")]),
    ]));
    assert_eq!(out, "1) One (3)\n2) Two\n3) Three\n");
}

#[test]
fn relative_reference_out_of_range() {
    let out = render(root(vec![
        header(1, vec![text("Only "), json!({"type": "reference", "value": "-"})]),
    ]));
    assert_eq!(out, "1) Only (???)\n");
}

#[test]
fn label_resolves_forward_and_last_definition_wins() {
    let out = render(root(vec![
        para(vec![text("see "), json!({"type": "reference", "value": "x"})]),
        header(1, vec![text("A"), json!({"type": "label", "value": "x"})]),
        header(2, vec![text("B"), json!({"type": "label", "value": "x"})]),
    ]));
    assert_eq!(out, "see (1.1)\n1) A\n1.1) B\n");
}

#[test]
fn item_reference_stays_within_its_list() {
    let item = |children: Vec<Value>| json!({"type": "list-item", "children": children});
    let out = render(root(vec![json!({
        "type": "ordered-list",
        "style": "lower-alpha",
        "children": [
            item(vec![para(vec![text("go to "), json!({"type": "reference", "value": "+"})])]),
            item(vec![para(vec![text("back to "), json!({"type": "reference", "value": "-"})])]),
        ]
    })]));
    assert_eq!(out, "a) go to (b)\nb) back to (a)\n");
}

#[test]
fn header_inside_item_takes_precedence_for_relative_refs() {
    let out = render(root(vec![
        header(1, vec![text("Top")]),
        json!({"type": "unordered-list", "children": [
            {"type": "list-item", "children": [
                header(1, vec![text("Inner "), json!({"type": "reference", "value": "+"})]),
                header(1, vec![text("Next")]),
            ]},
            {"type": "list-item", "children": [para(vec![text("second")])]},
        ]}),
    ]));
    // `+` counts headers in the item's own scope, not the second list item
    assert_eq!(out, "1) Top\n* 1) Inner (2)\n  2) Next\n* second\n");
}

#[test]
fn codeblock_with_separator_lookalike_is_verbatim() {
    let code = "---\n  keep   this  \n---";
    let out = render(root(vec![json!({"type": "codeblock", "value": code})]));
    let rule = "-".repeat(80);
    assert_eq!(out, format!("{rule}\n{code}\n{rule}\n"));
}

#[test]
fn inline_code_is_ruled_and_not_substituted() {
    let code = "a -- b ... \"c\"";
    let out = render(root(vec![para(vec![
        text("run "),
        json!({"type": "inline-code", "value": code}),
        text(" now"),
    ])]));
    let rule = "-".repeat(80);
    assert_eq!(out, format!("run\n{rule}\n{code}\n{rule}\nnow\n"));
}

#[test]
fn inline_code_wider_than_the_line_is_kept_whole() {
    let code = "x".repeat(100);
    let out = render(root(vec![para(vec![
        text("run "),
        json!({"type": "inline-code", "value": code}),
    ])]));
    assert!(out.lines().any(|line| line == code), "{out}");
}

#[test]
fn inline_code_inside_emphasis_is_kept_whole() {
    let code = "y ".repeat(60);
    let out = render(root(vec![para(vec![json!({"type": "strong", "children": [
        text("see"),
        {"type": "inline-code", "value": code},
        text("done"),
    ]})])]));
    let rule = "-".repeat(80);
    assert_eq!(out, format!("see\n{rule}\n{code}\n{rule}\ndone\n"));
}

#[test]
fn inline_code_in_table_cells_stays_on_the_row() {
    let out = render(root(vec![json!({"type": "table", "children": [
        {"type": "table-row", "children": [
            {"type": "table-cell", "children": [text("cmd "), {"type": "inline-code", "value": "ls -l"}]},
            {"type": "table-cell", "children": [text("list")]},
        ]},
    ]})]));
    assert_eq!(out, "cmd ls -l | list\n");
}

#[test]
fn control_characters_survive_in_text_and_code() {
    let raw = "a\u{1F}b c";
    let out = render(root(vec![
        para(vec![text(raw)]),
        para(vec![json!({"type": "inline-code", "value": raw})]),
    ]));
    let rule = "-".repeat(80);
    assert_eq!(out, format!("{raw}\n{rule}\n{raw}\n{rule}\n"));
}

#[test]
fn huge_list_start_renders() {
    let out = render(root(vec![json!({
        "type": "ordered-list",
        "start": 18446744073709551615u64,
        "children": [
            {"type": "list-item", "children": [text("a")]},
            {"type": "list-item", "children": [text("b")]},
        ]
    })]));
    assert_eq!(out, "18446744073709551615) a\n18446744073709551615) b\n");
}

#[test]
fn rules_end_within_the_width_when_indented() {
    let out = render(root(vec![json!({"type": "unordered-list", "children": [
        {"type": "list-item", "children": [
            {"type": "blockquote", "children": [
                para(vec![text("q")]),
                {"type": "horizontal-rule"},
            ]},
            {"type": "codeblock", "value": "code"},
        ]},
    ]})]));
    for line in out.lines() {
        assert!(line.chars().count() <= 80, "{line:?}");
    }
    let outer = format!("  {}", "-".repeat(78));
    let inner = format!("      {}", "-".repeat(74));
    assert!(out.lines().any(|line| line == outer), "{out}");
    assert!(out.lines().any(|line| line == inner), "{out}");
}

#[test]
fn multiline_inline_code_becomes_a_verbatim_block() {
    let out = render(root(vec![para(vec![
        text("before"),
        json!({"type": "inline-code", "value": "x\ny"}),
        text("after"),
    ])]));
    let rule = "-".repeat(80);
    assert_eq!(out, format!("before\n{rule}\nx\ny\n{rule}\nafter\n"));
}

#[test]
fn blockquote_is_indented_and_ruled() {
    let out = render(root(vec![json!({"type": "blockquote", "children": [
        para(vec![text("quoted")]),
    ]})]));
    let rule = "-".repeat(80);
    assert_eq!(out, format!("{rule}\n    quoted\n{rule}\n"));
}

#[test]
fn blockquote_text_is_not_wrapped() {
    let long = "word ".repeat(30);
    let out = render(root(vec![json!({"type": "blockquote", "children": [
        para(vec![text(long.trim())]),
    ]})]));
    assert!(out.contains(&format!("    {}\n", long.trim())), "{out}");
}

#[test]
fn nested_lists_hang_under_bullets() {
    let out = render(root(vec![json!({"type": "ordered-list", "children": [
        {"type": "list-item", "children": [
            para(vec![text("first")]),
            {"type": "ordered-list", "style": "lower-roman", "children": [
                {"type": "list-item", "children": [para(vec![text("inner")])]},
                {"type": "list-item", "children": [para(vec![text("inner two")])]},
            ]},
        ]},
        {"type": "list-item", "children": [para(vec![text("second")])]},
    ]})]));
    assert_eq!(
        out,
        "1) first\n   1.i) inner\n   1.ii) inner two\n2) second\n"
    );
}

#[test]
fn list_directly_inside_list_is_indented() {
    let out = render(root(vec![json!({"type": "unordered-list", "children": [
        {"type": "list-item", "children": [text("a")]},
        {"type": "unordered-list", "children": [
            {"type": "list-item", "children": [text("b")]},
        ]},
    ]})]));
    assert_eq!(out, "* a\n  * b\n");
}

#[test]
fn typographic_symbols_and_quotes() {
    let sym = |v: &str| json!({"type": "typographic-symbol", "value": v});
    let q = |v: &str| json!({"type": "smart-quote", "value": v});
    let out = render(root(vec![para(vec![
        sym("laquo-space"),
        q("lsquo"),
        text("a"),
        q("rsquo"),
        sym("ndash"),
        q("ldquo"),
        text("b"),
        q("rdquo"),
        sym("raquo-space"),
    ])]));
    assert_eq!(out, "<< 'a'--\"b\" >>\n");
}

#[test]
fn links_and_images() {
    let out = render(root(vec![para(vec![
        json!({"type": "link", "attr": {"href": "https://a.test"}, "children": [text("label")]}),
        text(" "),
        json!({"type": "link", "attr": {"href": "https://b.test"}, "children": [
            {"type": "emphasis", "children": [text("styled")]},
        ]}),
        text(" "),
        json!({"type": "image", "attr": {"src": "pic.png", "alt": "alt text"}}),
    ])]));
    assert_eq!(out, "[label] https://b.test pic.png\n");
}

#[test]
fn suppressed_kinds_render_nothing() {
    let out = render(root(vec![
        para(vec![
            text("a"),
            json!({"type": "footnote", "value": "1"}),
            json!({"type": "label", "value": "l"}),
            json!({"type": "raw-html-element", "value": "span", "children": [text("hidden")]}),
            json!({"type": "xml-comment", "value": "<!-- c -->"}),
            json!({"type": "xml-processing-instruction", "value": "<?php ?>"}),
            text("b"),
        ]),
        json!({"type": "xml-comment", "value": "<!-- block -->", "options": {"category": "block"}}),
    ]));
    assert_eq!(out, "ab\n");
}

#[test]
fn raw_passthrough_span_and_block() {
    let out = render(root(vec![
        para(vec![text("x "), json!({"type": "raw-passthrough", "value": "<b>raw</b>"})]),
        json!({"type": "raw-passthrough", "value": "RAW BLOCK", "options": {"category": "block"}}),
    ]));
    assert_eq!(out, "x <b>raw</b>\nRAW BLOCK\n");
}

#[test]
fn entities_math_and_abbreviations() {
    let out = render(root(vec![para(vec![
        json!({"type": "emphasis-entity", "value": "&amp;"}),
        json!({"type": "emphasis-entity", "value": "copy"}),
        text(" "),
        json!({"type": "math", "value": "x^2"}),
        text(" "),
        json!({"type": "abbreviation", "value": "HTML", "children": [text("HTML")]}),
    ])]));
    assert_eq!(out, "&© x^2 HTML\n");
}

#[test]
fn emphasis_strips_line_breaks() {
    let out = render(root(vec![para(vec![json!({"type": "strong", "children": [
        text("one"),
        {"type": "line-break"},
        text("two"),
    ]})])]));
    assert_eq!(out, "one two\n");
}

#[test]
fn line_break_starts_a_new_line() {
    let out = render(root(vec![para(vec![
        text("one"),
        json!({"type": "line-break"}),
        text("two"),
    ])]));
    assert_eq!(out, "one\ntwo\n");
}

#[test]
fn action_items_and_issue_links() {
    let out = render(root(vec![para(vec![
        text("fix "),
        json!({"type": "issue-link", "value": "GH-7"}),
        text(" "),
        json!({"type": "action-item", "value": "sam"}),
    ])]));
    assert_eq!(out, "fix GH-7 -->(sam)\n");
}

#[test]
fn block_inside_span_is_flattened_by_default() {
    let tree = Node::with_children(
        NodeKind::Root,
        vec![Node::with_children(
            NodeKind::Paragraph,
            vec![Node::with_children(
                NodeKind::Emphasis,
                vec![Node::with_children(
                    NodeKind::Paragraph,
                    vec![Node::text("inner"), Node::new(NodeKind::LineBreak), Node::text("text")],
                )],
            )],
        )],
    );
    assert_eq!(convert(tree, &RenderOptions::default()).unwrap(), "inner text\n");
}

#[test]
fn block_inside_span_can_be_rejected() {
    let tree = Node::with_children(
        NodeKind::Root,
        vec![Node::with_children(
            NodeKind::Strong,
            vec![Node::new(NodeKind::HorizontalRule)],
        )],
    );
    let opts = RenderOptions {
        nesting: NestingPolicy::Reject,
        ..RenderOptions::default()
    };
    assert_eq!(
        convert(tree, &opts),
        Err(RenderError::MalformedNesting {
            parent: "strong",
            child: "horizontal-rule"
        })
    );
}

/// Drops `<kind>` / `</kind>` markers.
fn strip_markers(s: &str) -> String {
    let mut out = String::new();
    let mut rest = s;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let name = tail.strip_prefix('/').unwrap_or(tail);
        let len = name
            .find(|c: char| !(c.is_ascii_lowercase() || c == '-'))
            .unwrap_or(name.len());
        if len > 0 && name[len..].starts_with('>') {
            let skipped = (tail.len() - name.len()) + len + 1;
            rest = &tail[skipped..];
        } else {
            out.push('<');
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

#[test]
fn debug_markers_do_not_change_text() {
    let tree = root(vec![
        header(1, vec![text("Title")]),
        para(vec![text("Hello "), json!({"type": "strong", "children": [text("world")]})]),
        json!({"type": "unordered-list", "children": [
            {"type": "list-item", "children": [para(vec![text("item")])]},
        ]}),
        json!({"type": "table", "children": [
            {"type": "table-row", "children": [
                {"type": "table-cell", "children": [text("c1")]},
                {"type": "table-cell", "children": [text("c2")]},
            ]},
        ]}),
    ]);
    let plain = render(tree.clone());
    let debug_opts = RenderOptions {
        debug: true,
        ..RenderOptions::default()
    };
    let debug = convert_json(&tree.to_string(), &debug_opts).unwrap();

    for kind in ["root", "header", "paragraph", "text", "strong", "unordered-list", "list-item", "table"] {
        assert!(debug.contains(&format!("<{kind}>")), "missing <{kind}> in:\n{debug}");
        assert!(debug.contains(&format!("</{kind}>")), "missing </{kind}> in:\n{debug}");
    }

    let words = |s: &str| s.split_whitespace().map(str::to_string).collect::<Vec<_>>();
    assert_eq!(words(&strip_markers(&debug)), words(&plain));
}

#[test]
fn renderer_instances_are_independent() {
    let tree = Node::with_children(
        NodeKind::Root,
        vec![Node::with_children(NodeKind::Paragraph, vec![Node::text("same")])],
    );
    let resolved = resolve::resolve(tree);
    let plain = RenderOptions::default();
    let debug = RenderOptions {
        debug: true,
        ..RenderOptions::default()
    };
    let a = Renderer::new(&resolved, &plain).render().unwrap();
    let b = Renderer::new(&resolved, &debug).render().unwrap();
    let c = Renderer::new(&resolved, &plain).render().unwrap();
    assert_eq!(a, "same\n");
    assert_ne!(a, b);
    assert_eq!(a, c);
}

#[test]
fn extra_indentation_shifts_every_line() {
    let tree = root(vec![
        header(1, vec![text("Head")]),
        json!({"type": "ordered-list", "children": [
            {"type": "list-item", "children": [para(vec![text("one")])]},
            {"type": "list-item", "children": [
                para(vec![text("two")]),
                {"type": "unordered-list", "children": [
                    {"type": "list-item", "children": [text("deep")]},
                ]},
            ]},
        ]}),
        json!({"type": "blockquote", "children": [para(vec![text("q")])]}),
        json!({"type": "codeblock", "value": "let x = 1;"}),
        json!({"type": "table", "children": [
            {"type": "table-row", "children": [
                {"type": "table-cell", "children": [text("k")]},
                {"type": "table-cell", "children": [text("v")]},
            ]},
        ]}),
    ]);
    let node = mdtext::load_tree(&tree.to_string()).unwrap();
    let resolved = resolve::resolve(node);
    let opts = RenderOptions {
        rule_width: 10,
        ..RenderOptions::default()
    };
    let renderer = Renderer::new(&resolved, &opts);

    let base = renderer.render_node(&resolved.root, 0).unwrap();
    for k in [1usize, 4] {
        let shifted = renderer.render_node(&resolved.root, k).unwrap();
        let want: String = base
            .lines()
            .map(|line| format!("{}{line}\n", " ".repeat(k)))
            .collect();
        assert_eq!(shifted, want, "indent {k}");
    }
}
