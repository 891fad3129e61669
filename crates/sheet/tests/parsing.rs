//! Integration tests for stylesheet parsing.
//!
//! Covers item classification (rules, at-rules, declarations, comments),
//! nested blocks, source positions and parse errors.

use sheet::{Node, Position, SheetError, parse_stylesheet};

// ============================================================================
// ITEM CLASSIFICATION
// ============================================================================

#[test]
fn test_rule_with_declarations() {
    let root = parse_stylesheet("a { color: red; top: 0 }").unwrap();
    assert_eq!(root.nodes.len(), 1);

    let rule = root.nodes[0].as_rule().unwrap();
    assert_eq!(rule.selectors, vec!["a"]);
    assert_eq!(rule.nodes.len(), 2);

    let Node::Declaration(decl) = &rule.nodes[1] else {
        panic!("expected declaration, got {:?}", rule.nodes[1]);
    };
    assert_eq!(decl.prop, "top");
    assert_eq!(decl.value, "0");
}

#[test]
fn test_selector_list_is_split() {
    let root = parse_stylesheet(".one, .two { }").unwrap();
    let rule = root.nodes[0].as_rule().unwrap();
    assert_eq!(rule.selectors, vec![".one", ".two"]);
}

#[test]
fn test_nested_rule_inside_rule() {
    let root = parse_stylesheet("a { &:hover { color: blue } b { } }").unwrap();
    let rule = root.nodes[0].as_rule().unwrap();
    assert_eq!(rule.nodes.len(), 2);
    assert_eq!(rule.nodes[0].as_rule().unwrap().selectors, vec!["&:hover"]);
    assert_eq!(rule.nodes[1].as_rule().unwrap().selectors, vec!["b"]);
}

#[test]
fn test_block_at_rule() {
    let root = parse_stylesheet("@media (max-width: 500px) { a { } }").unwrap();
    let at_rule = root.nodes[0].as_at_rule().unwrap();
    assert_eq!(at_rule.name, "media");
    assert_eq!(at_rule.params, "(max-width: 500px)");
    assert_eq!(at_rule.nodes.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_statement_at_rule() {
    let root = parse_stylesheet(".one { @mixin test; color: red }").unwrap();
    let rule = root.nodes[0].as_rule().unwrap();
    let at_rule = rule.nodes[0].as_at_rule().unwrap();
    assert_eq!(at_rule.name, "mixin");
    assert_eq!(at_rule.params, "test");
    assert!(!at_rule.has_block());
    assert!(matches!(rule.nodes[1], Node::Declaration(_)));
}

#[test]
fn test_at_rule_without_params() {
    let root = parse_stylesheet("a { @at-root { b {} } }").unwrap();
    let rule = root.nodes[0].as_rule().unwrap();
    let at_rule = rule.nodes[0].as_at_rule().unwrap();
    assert_eq!(at_rule.name, "at-root");
    assert_eq!(at_rule.params, "");
}

#[test]
fn test_comments_are_nodes() {
    let root = parse_stylesheet("/* head */ a { /*B*/ b {} }").unwrap();
    assert!(root.nodes[0].is_comment());
    let rule = root.nodes[1].as_rule().unwrap();
    let Node::Comment(comment) = &rule.nodes[0] else {
        panic!("expected comment");
    };
    assert_eq!(comment.text, "B");
}

#[test]
fn test_quoted_values_keep_semicolons() {
    let root = parse_stylesheet(r#"a { content: "a;b"; src: url() format("woff"); }"#).unwrap();
    let rule = root.nodes[0].as_rule().unwrap();
    assert_eq!(rule.nodes.len(), 2);
    let Node::Declaration(decl) = &rule.nodes[0] else {
        panic!("expected declaration");
    };
    assert_eq!(decl.value, r#""a;b""#);
}

#[test]
fn test_attribute_selector_with_ampersand_string() {
    let root = parse_stylesheet(r#"div { &[data-category="sound & vision"] {} }"#).unwrap();
    let rule = root.nodes[0].as_rule().unwrap();
    assert_eq!(
        rule.nodes[0].as_rule().unwrap().selectors,
        vec![r#"&[data-category="sound & vision"]"#]
    );
}

#[test]
fn test_missing_semicolon_becomes_rule() {
    let root = parse_stylesheet("a{\n  color: black\n  @mixin b { }\n}\n").unwrap();
    let rule = root.nodes[0].as_rule().unwrap();
    let nested = rule.nodes[0].as_rule().unwrap();
    assert_eq!(nested.selectors, vec!["color: black\n  @mixin b"]);
    assert_eq!(nested.source, Some(Position::new(2, 3)));
}

// ============================================================================
// POSITIONS
// ============================================================================

#[test]
fn test_positions_are_recorded() {
    let root = parse_stylesheet("a {\n  b {}\n}").unwrap();
    assert_eq!(root.nodes[0].source(), Some(Position::new(1, 1)));
    let rule = root.nodes[0].as_rule().unwrap();
    assert_eq!(rule.nodes[0].source(), Some(Position::new(2, 3)));
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_unclosed_block() {
    let err = parse_stylesheet("a {\n  b { color: red; }").unwrap_err();
    assert_eq!(
        err,
        SheetError::Unclosed {
            what: "block",
            position: Position::new(1, 1)
        }
    );
}

#[test]
fn test_unclosed_comment() {
    let err = parse_stylesheet("a {} /* never").unwrap_err();
    assert!(matches!(err, SheetError::Unclosed { what: "comment", .. }));
}

#[test]
fn test_unclosed_string() {
    let err = parse_stylesheet("a { content: \"x }").unwrap_err();
    assert!(matches!(err, SheetError::Unclosed { what: "string", .. }));
}

#[test]
fn test_declaration_without_colon() {
    let err = parse_stylesheet("a { color red }").unwrap_err();
    assert_eq!(err.to_string(), "1:5: Unknown word color");
}

#[test]
fn test_stray_closing_brace() {
    let err = parse_stylesheet("a {} }").unwrap_err();
    assert_eq!(err.position(), Position::new(1, 6));
}
