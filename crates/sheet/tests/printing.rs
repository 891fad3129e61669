//! Integration tests for the compact printer.

use sheet::{AtRule, Comment, Declaration, Node, Root, Rule, parse_stylesheet};

#[test]
fn test_print_round_trip_compacts_whitespace() {
    let source = r#"
        a {
            color: red;
            top: 0
        }

        @media screen {
            b { }
        }
    "#;
    let root = parse_stylesheet(source).unwrap();
    insta::assert_snapshot!(root.to_css(), @"a { color: red; top: 0; } @media screen { b {} }");
}

#[test]
fn test_print_statement_and_empty_at_rules() {
    let root = parse_stylesheet("@import \"x.css\"; @font-face {} @phone { }").unwrap();
    assert_eq!(root.to_css(), "@import \"x.css\"; @font-face {} @phone {}");
}

#[test]
fn test_print_built_tree() {
    let mut rule = Rule::new("a:hover, a:active");
    rule.append(Node::Comment(Comment::new("B")));
    rule.append(Node::Declaration(Declaration::new("color", "black")));

    let mut media = AtRule::new("media", "print");
    media.append(Node::Rule(rule));

    let root = Root::new(vec![Node::AtRule(media)]);
    assert_eq!(
        root.to_string(),
        "@media print { a:hover, a:active { /*B*/ color: black; } }"
    );
}

#[test]
fn test_declarations_listing() {
    let root = parse_stylesheet("a { x: 1; b { y: 2 } } @media q { z: 3 }").unwrap();
    assert_eq!(
        root.declarations(),
        vec![
            ("x".to_string(), "1".to_string()),
            ("y".to_string(), "2".to_string()),
            ("z".to_string(), "3".to_string()),
        ]
    );
}
