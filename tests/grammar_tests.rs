// tests/grammar_tests.rs

use kettle_lang::grammar::{
    grammar, Alternative, Args, Assoc, ConflictKind, GrammarBuilder, StackValue,
};
use kettle_lang::{GrammarError, Node, ParseError, Parser, Token};

fn number(a: &mut Args<'_>) -> Result<StackValue, ParseError> {
    Ok(StackValue::Node(Node::literal(a.text(1)?)))
}

fn binary(a: &mut Args<'_>) -> Result<StackValue, ParseError> {
    let operator = a.text(2)?;
    let first = a.node(1)?;
    let second = a.node(3)?;
    Ok(StackValue::Node(Node::op(&operator, first, second)))
}

/// `E → E op E | NUMBER` for the given operators.
fn arithmetic(operators: &[&str]) -> GrammarBuilder {
    let mut alternatives = vec![Alternative::new("NUMBER", number)];
    for operator in operators {
        alternatives.push(Alternative::new(format!("E {} E", operator), binary));
    }
    GrammarBuilder::new("E").rule("E", alternatives)
}

fn stream(source: &str) -> Vec<Token> {
    source
        .split_whitespace()
        .map(|word| {
            if word.starts_with(|c: char| c.is_ascii_digit()) {
                Token::new("NUMBER", word)
            } else {
                Token::new(word, word)
            }
        })
        .collect()
}

/// Fully parenthesized rendering of a toy tree.
fn shape(node: &Node) -> String {
    match node {
        Node::Op(op) => match op.second.as_deref() {
            Some(second) => format!("({} {} {})", shape(&op.first), op.operator, shape(second)),
            None => format!("({} {})", op.operator, shape(&op.first)),
        },
        Node::Literal(literal) => literal.value.clone(),
        other => other.kind().to_string(),
    }
}

fn parse_with(builder: GrammarBuilder, source: &str) -> String {
    let parser = Parser::from_table(builder.build().unwrap());
    shape(&parser.parse(&stream(source)).unwrap())
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_levels_order_operators() {
    let builder = arithmetic(&["+", "*"])
        .operators(&[(Assoc::Left, &["+"]), (Assoc::Left, &["*"])]);
    assert!(builder.build().unwrap().conflicts().is_empty());
    assert_eq!(parse_with(builder, "1 + 2 * 3"), "(1 + (2 * 3))");
}

#[test]
fn test_left_associativity() {
    let builder = arithmetic(&["-"]).operators(&[(Assoc::Left, &["-"])]);
    assert_eq!(parse_with(builder, "1 - 2 - 3"), "((1 - 2) - 3)");
}

#[test]
fn test_right_associativity() {
    let builder = arithmetic(&["^"]).operators(&[(Assoc::Right, &["^"])]);
    assert_eq!(parse_with(builder, "1 ^ 2 ^ 3"), "(1 ^ (2 ^ 3))");
}

#[test]
fn test_explicit_rule_precedence() {
    fn negative(a: &mut Args<'_>) -> Result<StackValue, ParseError> {
        Ok(StackValue::Node(Node::Op(kettle_lang::ast::Op::new("-", a.node(2)?, None))))
    }
    let builder = arithmetic(&["-", "*"])
        .rule("E", vec![Alternative::new("- E", negative).prec("UMINUS")])
        .operators(&[
            (Assoc::Left, &["-"]),
            (Assoc::Left, &["*"]),
            (Assoc::NonAssoc, &["UMINUS"]),
        ]);
    let table = builder.build().unwrap();

    assert!(table.conflicts().is_empty());
    assert!(table.terminal("UMINUS").is_none());
    assert_eq!(parse_with(builder, "- 1 * 2"), "((- 1) * 2)");
}

// ============================================================================
// Conflicts
// ============================================================================

#[test]
fn test_unranked_conflict_shifts_and_is_recorded() {
    let builder = arithmetic(&["+"]);
    let table = builder.build().unwrap();

    assert!(!table.conflicts().is_empty());
    let conflict = &table.conflicts()[0];
    assert_eq!(conflict.kind, ConflictKind::ShiftReduce);
    assert_eq!(conflict.token, "+");
    assert!(conflict.to_string().contains("shift/reduce"));
    assert_eq!(parse_with(builder, "1 + 2 + 3"), "(1 + (2 + 3))");
}

#[test]
fn test_strict_mode_rejects_unranked_conflicts() {
    let result = arithmetic(&["+"]).strict(true).build();
    assert!(matches!(result, Err(GrammarError::Unresolved { ref token, .. }) if token == "+"));
}

#[test]
fn test_reduce_reduce_prefers_earlier_rule() {
    fn tagged(a: &mut Args<'_>) -> Result<StackValue, ParseError> {
        Ok(StackValue::Node(Node::literal(format!("first {}", a.text(1)?))))
    }
    fn other(a: &mut Args<'_>) -> Result<StackValue, ParseError> {
        Ok(StackValue::Node(Node::literal(format!("second {}", a.text(1)?))))
    }
    let builder = GrammarBuilder::new("S")
        .rule("S", vec![Alternative::passthrough("A"), Alternative::passthrough("B")])
        .rule("A", vec![Alternative::new("X", tagged)])
        .rule("B", vec![Alternative::new("X", other)]);
    let table = builder.build().unwrap();

    assert!(table
        .conflicts()
        .iter()
        .any(|conflict| conflict.kind == ConflictKind::ReduceReduce));
    let parser = Parser::from_table(table);
    assert_eq!(
        parser.parse(&[Token::new("X", "x")]).unwrap(),
        Node::literal("first x")
    );
}

#[test]
fn test_non_associative_operator() {
    let result = arithmetic(&["<"]).operators(&[(Assoc::NonAssoc, &["<"])]).build();
    assert!(matches!(result, Err(GrammarError::NonAssociative { ref token, .. }) if token == "<"));
}

// ============================================================================
// Definition errors
// ============================================================================

#[test]
fn test_unknown_start_symbol() {
    let result = GrammarBuilder::new("Missing")
        .rule("E", vec![Alternative::new("NUMBER", number)])
        .build();
    assert!(matches!(result, Err(GrammarError::UnknownStart(ref name)) if name == "Missing"));
}

#[test]
fn test_empty_rule() {
    let result = GrammarBuilder::new("E").rule("E", Vec::new()).build();
    assert!(matches!(result, Err(GrammarError::EmptyRule { ref nonterminal }) if nonterminal == "E"));
}

#[test]
fn test_unknown_precedence_tag() {
    let result = GrammarBuilder::new("E")
        .rule("E", vec![Alternative::new("NUMBER", number).prec("NOWHERE")])
        .build();
    assert!(matches!(result, Err(GrammarError::UnknownPrecedence { ref tag, .. }) if tag == "NOWHERE"));
}

// ============================================================================
// The language grammar
// ============================================================================

#[test]
fn test_language_table_builds() {
    let table = grammar().build().unwrap();

    assert!(table.state_count() > 100);
    assert!(table.terminal("IDENTIFIER").is_some());
    assert!(table.terminal("UMINUS").is_some());
    assert!(table.terminal("Expression").is_none());
}

#[test]
fn test_language_conflicts_are_described() {
    let table = grammar().build().unwrap();
    for conflict in table.conflicts() {
        assert!(conflict.chosen.starts_with("shift") || conflict.chosen.starts_with("reduce"));
    }
}
