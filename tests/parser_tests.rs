// tests/parser_tests.rs

mod common;

use common::{only_line, parse, tokens};
use kettle_lang::ast::{Callee, Node};
use kettle_lang::{CompileError, ParseError, Token};

fn op(node: &Node) -> (&str, &Node, Option<&Node>) {
    match node {
        Node::Op(op) => (op.operator.as_str(), &op.first, op.second.as_deref()),
        other => panic!("expected an operator, got {:?}", other),
    }
}

fn name(node: &Node) -> &str {
    match node.unwrap_value() {
        Node::Literal(literal) => literal.value.as_str(),
        other => panic!("expected a name, got {:?}", other),
    }
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    let root = parse("a + b * c");
    let (operator, first, second) = op(only_line(&root));

    assert_eq!(operator, "+");
    assert_eq!(name(first), "a");
    let (inner, left, right) = op(second.unwrap());
    assert_eq!(inner, "*");
    assert_eq!(name(left), "b");
    assert_eq!(name(right.unwrap()), "c");
}

#[test]
fn test_parentheses() {
    let root = parse("( a + b ) * c");
    let (operator, first, _) = op(only_line(&root));

    assert_eq!(operator, "*");
    match first.unwrap_value() {
        Node::Parenthetical(parens) => assert_eq!(op(&parens.expression).0, "+"),
        other => panic!("expected parentheses, got {:?}", other),
    }
}

#[test]
fn test_subtraction_is_left_associative() {
    let root = parse("a - b - c");
    let (_, first, second) = op(only_line(&root));

    assert_eq!(op(first).0, "-");
    assert_eq!(name(second.unwrap()), "c");
}

#[test]
fn test_assignment_is_right_associative() {
    let root = parse("a = b = c");
    match only_line(&root) {
        Node::Assign(outer) => {
            assert_eq!(name(&outer.variable), "a");
            assert!(matches!(&*outer.value, Node::Assign(inner) if name(&inner.variable) == "b"));
        }
        other => panic!("expected an assignment, got {:?}", other),
    }
}

#[test]
fn test_word_operators_translate() {
    let root = parse("a IS b AND NOT c");
    let (operator, first, second) = op(only_line(&root));

    assert_eq!(operator, "&&");
    assert_eq!(op(first).0, "===");
    assert_eq!(op(second.unwrap()).0, "!");
}

#[test]
fn test_postfix_increment() {
    let root = parse("x ++");
    assert!(matches!(only_line(&root), Node::Op(op) if op.flip && op.operator == "++"));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_multiple_lines() {
    let root = parse("a = 1 ; b = 2 ;");
    match root {
        Node::Expressions(block) => assert_eq!(block.expressions.len(), 2),
        other => panic!("expected a block, got {:?}", other),
    }
}

#[test]
fn test_empty_program() {
    assert_eq!(kettle_lang::parse(&[]).unwrap(), Node::Expressions(Default::default()));
}

#[test]
fn test_postfix_if_is_a_statement() {
    let root = parse("x IF y");
    match only_line(&root) {
        Node::If(node) => {
            assert!(node.statement);
            assert_eq!(name(&node.conditions[0]), "y");
            assert_eq!(name(&node.body), "x");
        }
        other => panic!("expected a conditional, got {:?}", other),
    }
}

#[test]
fn test_else_if_chain() {
    let root = parse("IF a INDENT b OUTDENT ELSE IF c INDENT d OUTDENT ELSE INDENT e OUTDENT");
    let Node::If(head) = only_line(&root) else {
        panic!("expected a conditional");
    };
    assert!(head.is_chain());
    let Some(Node::If(chained)) = head.else_body.as_deref() else {
        panic!("expected a chained conditional");
    };
    assert_eq!(name(chained.else_body.as_deref().unwrap()), "e");
}

#[test]
fn test_switch_arms() {
    let root = parse(
        "SWITCH x INDENT LEADING_WHEN 1 INDENT a OUTDENT \
         LEADING_WHEN 2 , 3 INDENT b OUTDENT ELSE INDENT c OUTDENT OUTDENT",
    );
    let Node::If(first) = only_line(&root) else {
        panic!("expected a switch");
    };
    assert!(first.switcher.is_some());
    assert_eq!(first.conditions.len(), 1);

    let Some(Node::If(second)) = first.else_body.as_deref() else {
        panic!("expected a second arm");
    };
    assert_eq!(second.conditions.len(), 2);
    assert_eq!(name(second.else_body.as_deref().unwrap()), "c");
}

#[test]
fn test_class_with_parent() {
    let root = parse("CLASS Dog EXTENDS Animal INDENT speak : -> INDENT \"woof\" OUTDENT OUTDENT");
    match only_line(&root) {
        Node::Class(class) => {
            assert_eq!(name(&class.variable), "Dog");
            assert_eq!(name(class.parent.as_deref().unwrap()), "Animal");
            assert_eq!(class.properties.len(), 1);
        }
        other => panic!("expected a class, got {:?}", other),
    }
}

#[test]
fn test_comprehension() {
    let root = parse("x * 2 FOR x IN list");
    match only_line(&root) {
        Node::For(node) => {
            assert!(!node.object);
            assert_eq!(name(node.name.as_deref().unwrap()), "x");
            assert_eq!(name(&node.source), "list");
        }
        other => panic!("expected a loop, got {:?}", other),
    }
}

#[test]
fn test_object_loop_binds_key_to_index() {
    let root = parse("FOR k , v OF obj INDENT k OUTDENT");
    match only_line(&root) {
        Node::For(node) => {
            assert!(node.object);
            assert_eq!(name(node.name.as_deref().unwrap()), "v");
            assert_eq!(name(node.index.as_deref().unwrap()), "k");
        }
        other => panic!("expected a loop, got {:?}", other),
    }
}

#[test]
fn test_calls() {
    let root = parse("NEW Point( 1 , 2 ) ; f( args ... ) ; SUPER( x )");
    let Node::Expressions(block) = root else {
        panic!("expected a block");
    };

    assert!(matches!(&block.expressions[0], Node::Call(call) if call.is_new && call.args.len() == 2));
    assert!(matches!(&block.expressions[1], Node::Call(call) if call.has_splat()));
    assert!(matches!(&block.expressions[2], Node::Call(call) if call.callee == Callee::Super));
}

#[test]
fn test_soak_access() {
    let root = parse("a ?.b .c");
    match only_line(&root) {
        Node::Value(value) => {
            assert_eq!(value.properties.len(), 2);
            assert!(matches!(&value.properties[0], Node::Accessor(accessor) if accessor.soak));
            assert!(matches!(&value.properties[1], Node::Accessor(accessor) if !accessor.soak));
        }
        other => panic!("expected a value, got {:?}", other),
    }
}

#[test]
fn test_tree_outline() {
    let root = parse("a = 1");
    assert_eq!(
        root.to_tree_string(),
        "Expressions\n  Assign\n    Value\n      Literal \"a\"\n    Value\n      Literal \"1\"\n"
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unexpected_token() {
    let err = kettle_lang::parse(&tokens("a = = 1")).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Parse(ParseError::UnexpectedToken { ref tag, position: 2, .. }) if tag == "ASSIGN"
    ));
}

#[test]
fn test_unknown_tag() {
    let err = kettle_lang::parse(&[Token::new("BOGUS", "?").at_line(7)]).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Parse(ParseError::UnexpectedToken { position: 0, line: 7, .. })
    ));
    assert!(err.to_string().contains("BOGUS"));
}

#[test]
fn test_unexpected_end() {
    let err = kettle_lang::parse(&tokens("a =")).unwrap_err();
    assert!(matches!(err, CompileError::Parse(ParseError::UnexpectedEnd { position: 2 })));
}

#[test]
fn test_end_marker_tag_is_rejected() {
    let stream = [
        Token::new("IDENTIFIER", "a"),
        Token::new("$end", ""),
        Token::new("IDENTIFIER", "b"),
    ];
    let err = kettle_lang::parse(&stream).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Parse(ParseError::UnexpectedToken { ref tag, position: 1, .. }) if tag == "$end"
    ));
}
