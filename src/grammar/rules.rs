//! The language grammar: every nonterminal, its alternatives, and the node
//! each alternative builds.
//!
//! Alternatives without an action are renamings and pass their first value
//! through unchanged. Everything else constructs a node (or a list, block or
//! loop header that a later reduction folds into a node).

use super::builder::{Alternative, Assoc, GrammarBuilder};
use super::values::{Args, StackValue};
use crate::ast::{
    Array, Assign, AssignContext, Call, Class, Code, Comment, Existence, Expressions, Extends,
    For, ForSource, If, Index, Node, Object, Op, Range, Slice, Splat, Throw, Try, While,
};
use crate::error::ParseError;

macro_rules! o {
    ($pattern:expr) => {
        Alternative::passthrough($pattern)
    };
    ($pattern:expr, $action:expr) => {
        Alternative::new($pattern, $action)
    };
}

/// Operator precedence, lowest first.
pub const OPERATORS: &[(Assoc, &[&str])] = &[
    (Assoc::Right, &["IF", "ELSE", "UNLESS", "->", "=>"]),
    (Assoc::Right, &["ASSIGN", "RETURN", "-=", "+=", "/=", "*=", "%=", "||=", "&&=", "?="]),
    (Assoc::Left, &["EXTENDS"]),
    (Assoc::Right, &["FOR", "WHILE", "UNTIL", "LOOP", "NEW", "SUPER", "CLASS"]),
    (Assoc::Right, &["WHEN", "LEADING_WHEN", "IN", "OF", "BY", "THROW"]),
    (Assoc::Left, &["OUTDENT"]),
    (Assoc::Right, &["INDENT"]),
    (Assoc::Left, &["&&", "||", "AND", "OR"]),
    (Assoc::Left, &["==", "!=", "IS", "ISNT"]),
    (Assoc::Right, &["DELETE", "INSTANCEOF", "TYPEOF"]),
    (Assoc::Left, &["<=", "<", ">", ">="]),
    (Assoc::Left, &["&", "|", "^"]),
    (Assoc::Left, &["<<", ">>", ">>>"]),
    (Assoc::Left, &["+", "-"]),
    (Assoc::Left, &["*", "/", "%"]),
    (Assoc::NonAssoc, &["UMINUS", "UPLUS", "NOT", "!", "!!", "~"]),
    (Assoc::Left, &["++", "--"]),
    (Assoc::Left, &["?"]),
];

const UNARY: &[&str] = &[
    "UMINUS", "UPLUS", "NOT", "!", "!!", "~", "--", "++", "DELETE", "TYPEOF",
];

const BINARY: &[&str] = &[
    "*", "/", "%", "+", "-", "<<", ">>", ">>>", "&", "|", "^", "<=", "<", ">", ">=", "==", "!=",
    "IS", "ISNT", "&&", "||", "AND", "OR", "?", "INSTANCEOF", "-=", "+=", "/=", "*=", "%=",
    "||=", "&&=", "?=",
];

type Reduced = Result<StackValue, ParseError>;

fn node(node: Node) -> Reduced {
    Ok(StackValue::Node(node))
}

fn nodes(nodes: Vec<Node>) -> Reduced {
    Ok(StackValue::Nodes(nodes))
}

fn block(block: Expressions) -> Reduced {
    Ok(StackValue::Block(block))
}

fn literal(a: &mut Args<'_>) -> Reduced {
    node(Node::literal(a.text(1)?))
}

fn value_of(a: &mut Args<'_>) -> Reduced {
    node(Node::value(a.node(1)?))
}

fn this() -> Node {
    Node::value(Node::literal("this"))
}

fn negate(condition: Node) -> Node {
    Node::Op(Op::new("!", Node::parens(condition), None))
}

/// Operator text for an operator token; layout-free token streams may leave
/// the value empty, in which case the tag decides.
fn operator(a: &mut Args<'_>, position: usize) -> Result<String, ParseError> {
    match a.take(position)? {
        StackValue::Token(token) if !token.value.is_empty() => Ok(token.value),
        StackValue::Token(token) => Ok(match token.tag.as_str() {
            "UMINUS" => "-".to_string(),
            "UPLUS" => "+".to_string(),
            "NOT" => "!".to_string(),
            other => other.to_lowercase(),
        }),
        _ => Err(a.fail(format!("expected an operator at position {}", position))),
    }
}

fn unary(a: &mut Args<'_>) -> Reduced {
    let op = operator(a, 1)?;
    node(Node::Op(Op::new(&op, a.node(2)?, None)))
}

fn postfix(a: &mut Args<'_>) -> Reduced {
    let operand = a.node(1)?;
    let op = operator(a, 2)?;
    node(Node::Op(Op::new(&op, operand, None).flipped()))
}

fn binary(a: &mut Args<'_>) -> Reduced {
    let first = a.node(1)?;
    let op = operator(a, 2)?;
    node(Node::Op(Op::new(&op, first, Some(a.node(3)?))))
}

fn if_node(a: &mut Args<'_>, position: usize) -> Result<If, ParseError> {
    match a.node(position)? {
        Node::If(node) => Ok(node),
        other => Err(a.fail(format!("expected a conditional, found {}", other.kind()))),
    }
}

fn is_bound(a: &mut Args<'_>, position: usize) -> Result<bool, ParseError> {
    match a.take(position)? {
        StackValue::Token(token) => Ok(token.tag == "=>"),
        _ => Ok(false),
    }
}

fn push(a: &mut Args<'_>, list: usize, item: usize) -> Reduced {
    let mut list = a.nodes(list)?;
    list.push(a.node(item)?);
    nodes(list)
}

fn concat(a: &mut Args<'_>, first: usize, second: usize) -> Reduced {
    let mut list = a.nodes(first)?;
    list.extend(a.nodes(second)?);
    nodes(list)
}

fn range(a: &mut Args<'_>, from: usize, to: usize, exclusive: bool) -> Result<Range, ParseError> {
    Ok(Range {
        from: Box::new(a.node(from)?),
        to: Box::new(a.node(to)?),
        exclusive,
    })
}

fn accessor(name: String, prototype: bool, soak: bool) -> Node {
    Node::Accessor(crate::ast::Accessor {
        name,
        prototype,
        soak,
    })
}

/// Append an access to a value chain, starting a chain if needed.
fn push_property(base: Node, property: Node) -> Node {
    match base {
        Node::Value(value) => Node::Value(value.push(property)),
        other => Node::value_with(other, vec![property]),
    }
}

fn class(variable: Node, parent: Option<Node>, properties: Vec<Node>) -> Reduced {
    node(Node::Class(Class {
        variable: Box::new(variable),
        parent: parent.map(Box::new),
        properties,
        returns: false,
    }))
}

fn attempt(attempt: Expressions, catch: Option<(Node, Expressions)>, ensure: Option<Expressions>) -> Reduced {
    let (error, recovery) = match catch {
        Some((error, recovery)) => (Some(error), Some(recovery)),
        None => (None, None),
    };
    node(Node::Try(Try {
        attempt: Box::new(Node::Expressions(attempt)),
        error: error.map(Box::new),
        recovery: recovery.map(|block| Box::new(Node::Expressions(block))),
        ensure: ensure.map(|block| Box::new(Node::Expressions(block))),
    }))
}

fn looping(condition: Node, body: Option<Expressions>) -> Reduced {
    node(Node::While(While {
        condition: Box::new(condition),
        body: body.map(|body| Box::new(Node::Expressions(body))),
        returns: false,
    }))
}

fn comprehension(body: Expressions, variables: Vec<Node>, head: ForSource) -> Reduced {
    let mut variables = variables.into_iter();
    let name = variables.next();
    let index = variables.next();
    node(Node::For(For::new(body, head, name, index)))
}

fn loop_source(source: Node, object: bool) -> Reduced {
    Ok(StackValue::Source(ForSource {
        source,
        filter: None,
        step: None,
        object,
    }))
}

/// The complete rule table for the language.
pub fn grammar() -> GrammarBuilder {
    let mut operation: Vec<Alternative> = UNARY
        .iter()
        .map(|op| Alternative::new(format!("{} Expression", op), unary))
        .collect();
    operation.push(o!("Expression --", postfix));
    operation.push(o!("Expression ++", postfix));
    operation.extend(
        BINARY
            .iter()
            .map(|op| Alternative::new(format!("Expression {} Expression", op), binary)),
    );

    GrammarBuilder::new("Root")
        .rule("Root", vec![
            o!("", |_| block(Expressions::new())),
            o!("TERMINATOR", |_| block(Expressions::new())),
            o!("Body"),
            o!("Block TERMINATOR"),
        ])
        .rule("Body", vec![
            o!("Line", |a| block(Expressions::wrap(vec![a.node(1)?]))),
            o!("Body TERMINATOR Line", |a| {
                let body = a.block(1)?;
                block(body.push(a.node(3)?))
            }),
            o!("Body TERMINATOR"),
        ])
        .rule("Line", vec![o!("Expression"), o!("Comment")])
        .rule("Expression", vec![
            o!("Value"),
            o!("Call"),
            o!("Code"),
            o!("Operation"),
            o!("Assign"),
            o!("If"),
            o!("Try"),
            o!("Throw"),
            o!("Return"),
            o!("While"),
            o!("For"),
            o!("Switch"),
            o!("Extends"),
            o!("Class"),
            o!("Splat"),
            o!("Existence"),
        ])
        .rule("Block", vec![
            o!("INDENT Body OUTDENT", |a| block(a.block(2)?)),
            o!("INDENT OUTDENT", |_| block(Expressions::new())),
        ])
        .rule("Identifier", vec![o!("IDENTIFIER", literal)])
        .rule("AlphaNumeric", vec![o!("NUMBER", literal), o!("STRING", literal)])
        .rule("Literal", vec![
            o!("AlphaNumeric"),
            o!("JS", literal),
            o!("REGEX", literal),
            o!("BREAK", |_| node(Node::literal("break"))),
            o!("CONTINUE", |_| node(Node::literal("continue"))),
            o!("TRUE", |_| node(Node::literal("true"))),
            o!("FALSE", |_| node(Node::literal("false"))),
            o!("YES", |_| node(Node::literal("true"))),
            o!("NO", |_| node(Node::literal("false"))),
            o!("ON", |_| node(Node::literal("true"))),
            o!("OFF", |_| node(Node::literal("false"))),
        ])
        .rule("Assign", vec![o!("Assignable ASSIGN Expression", |a| {
            let variable = a.node(1)?;
            node(Node::assign(variable, a.node(3)?))
        })])
        .rule("AssignObj", vec![
            o!("Identifier", value_of),
            o!("AlphaNumeric"),
            o!("Identifier ASSIGN Expression", |a| {
                let key = Node::value(a.node(1)?);
                node(Node::Assign(Assign::with_context(key, a.node(3)?, AssignContext::Object)))
            }),
            o!("AlphaNumeric ASSIGN Expression", |a| {
                let key = Node::value(a.node(1)?);
                node(Node::Assign(Assign::with_context(key, a.node(3)?, AssignContext::Object)))
            }),
            o!("Comment"),
        ])
        .rule("Return", vec![
            o!("RETURN Expression", |a| node(Node::returning(a.node(2)?))),
            o!("RETURN", |_| node(Node::returning(Node::value(Node::literal("null"))))),
        ])
        .rule("Comment", vec![o!("COMMENT", |a| {
            let text = a.text(1)?;
            node(Node::Comment(Comment {
                lines: text.lines().map(str::to_string).collect(),
            }))
        })])
        .rule("Existence", vec![o!("Expression ?", |a| {
            node(Node::Existence(Existence {
                expression: Box::new(a.node(1)?),
            }))
        })])
        .rule("Code", vec![
            o!("PARAM_START ParamList PARAM_END FuncGlyph Block", |a| {
                let params = a.nodes(2)?;
                let bound = is_bound(a, 4)?;
                node(Node::Code(Code::new(params, a.block(5)?, bound)))
            }),
            o!("FuncGlyph Block", |a| {
                let bound = is_bound(a, 1)?;
                node(Node::Code(Code::new(Vec::new(), a.block(2)?, bound)))
            }),
        ])
        .rule("FuncGlyph", vec![o!("->"), o!("=>")])
        .rule("ParamList", vec![
            o!("", |_| nodes(Vec::new())),
            o!("Param", |a| nodes(vec![a.node(1)?])),
            o!("ParamList , Param", |a| push(a, 1, 3)),
        ])
        .rule("Param", vec![
            o!("PARAM", literal),
            o!("PARAM ...", |a| {
                node(Node::Splat(Splat {
                    name: Box::new(Node::literal(a.text(1)?)),
                    param: None,
                }))
            }),
        ])
        .rule("Splat", vec![o!("Expression ...", |a| {
            node(Node::Splat(Splat {
                name: Box::new(a.node(1)?),
                param: None,
            }))
        })])
        .rule("SimpleAssignable", vec![
            o!("Identifier", value_of),
            o!("Value Accessor", |a| {
                let base = a.node(1)?;
                node(push_property(base, a.node(2)?))
            }),
            o!("Invocation Accessor", |a| {
                let call = a.node(1)?;
                node(Node::value_with(call, vec![a.node(2)?]))
            }),
            o!("ThisProperty"),
        ])
        .rule("Assignable", vec![
            o!("SimpleAssignable"),
            o!("Array", value_of),
            o!("Object", value_of),
        ])
        .rule("Value", vec![
            o!("Assignable"),
            o!("Literal", value_of),
            o!("Parenthetical", value_of),
            o!("Range", value_of),
            o!("This"),
            o!("NULL", |_| node(Node::value(Node::literal("null")))),
        ])
        .rule("Accessor", vec![
            o!("PROPERTY_ACCESS IDENTIFIER", |a| node(accessor(a.text(2)?, false, false))),
            o!("PROTOTYPE_ACCESS IDENTIFIER", |a| node(accessor(a.text(2)?, true, false))),
            o!("::", |_| node(Node::accessor("prototype"))),
            o!("SOAK_ACCESS IDENTIFIER", |a| node(accessor(a.text(2)?, false, true))),
            o!("Index"),
            o!("Slice"),
        ])
        .rule("Index", vec![
            o!("INDEX_START Expression INDEX_END", |a| node(Node::index(a.node(2)?))),
            o!("SOAKED_INDEX_START Expression SOAKED_INDEX_END", |a| {
                node(Node::Index(Index {
                    index: Box::new(a.node(2)?),
                    soak: true,
                }))
            }),
        ])
        .rule("Slice", vec![
            o!("INDEX_START Expression .. Expression INDEX_END", |a| {
                node(Node::Slice(Slice {
                    range: range(a, 2, 4, false)?,
                }))
            }),
            o!("INDEX_START Expression ... Expression INDEX_END", |a| {
                node(Node::Slice(Slice {
                    range: range(a, 2, 4, true)?,
                }))
            }),
        ])
        .rule("Object", vec![o!("{ AssignList OptComma }", |a| {
            node(Node::Object(Object {
                properties: a.nodes(2)?,
            }))
        })])
        .rule("OptComma", vec![o!("", |_| Ok(StackValue::Empty)), o!(",")])
        .rule("AssignList", vec![
            o!("", |_| nodes(Vec::new())),
            o!("AssignObj", |a| nodes(vec![a.node(1)?])),
            o!("AssignList , AssignObj", |a| push(a, 1, 3)),
            o!("AssignList OptComma TERMINATOR AssignObj", |a| push(a, 1, 4)),
            o!("AssignList OptComma INDENT AssignList OptComma OUTDENT", |a| concat(a, 1, 4)),
        ])
        .rule("Class", vec![
            o!("CLASS SimpleAssignable", |a| class(a.node(2)?, None, Vec::new())),
            o!("CLASS SimpleAssignable EXTENDS Value", |a| {
                let variable = a.node(2)?;
                class(variable, Some(a.node(4)?), Vec::new())
            }),
            o!("CLASS SimpleAssignable INDENT ClassBody OUTDENT", |a| {
                let variable = a.node(2)?;
                class(variable, None, a.nodes(4)?)
            }),
            o!("CLASS SimpleAssignable EXTENDS Value INDENT ClassBody OUTDENT", |a| {
                let variable = a.node(2)?;
                let parent = a.node(4)?;
                class(variable, Some(parent), a.nodes(6)?)
            }),
        ])
        .rule("ClassAssign", vec![
            o!("AssignObj"),
            o!("ThisProperty ASSIGN Expression", |a| {
                let variable = a.node(1)?;
                node(Node::Assign(Assign::with_context(variable, a.node(3)?, AssignContext::This)))
            }),
        ])
        .rule("ClassBody", vec![
            o!("", |_| nodes(Vec::new())),
            o!("ClassAssign", |a| nodes(vec![a.node(1)?])),
            o!("ClassBody TERMINATOR ClassAssign", |a| push(a, 1, 3)),
        ])
        .rule("Call", vec![
            o!("Invocation"),
            o!("NEW Invocation", |a| match a.node(2)? {
                Node::Call(call) => node(Node::Call(call.new_instance())),
                other => node(Node::Call(Call::new(other, Vec::new()).new_instance())),
            }),
            o!("Super"),
        ])
        .rule("Extends", vec![o!("SimpleAssignable EXTENDS Value", |a| {
            let child = a.node(1)?;
            node(Node::Extends(Extends {
                child: Box::new(child),
                parent: Box::new(a.node(3)?),
            }))
        })])
        .rule("Invocation", vec![
            o!("Value Arguments", |a| {
                let callee = a.node(1)?;
                node(Node::call(callee, a.nodes(2)?))
            }),
            o!("Invocation Arguments", |a| {
                let callee = a.node(1)?;
                node(Node::call(callee, a.nodes(2)?))
            }),
        ])
        .rule("Arguments", vec![o!("CALL_START ArgList CALL_END", |a| nodes(a.nodes(2)?))])
        .rule("Super", vec![o!("SUPER CALL_START ArgList CALL_END", |a| {
            node(Node::Call(Call::to_super(a.nodes(3)?)))
        })])
        .rule("This", vec![o!("THIS", |_| node(this())), o!("@", |_| node(this()))])
        .rule("ThisProperty", vec![o!("@ IDENTIFIER", |a| {
            node(Node::value_with(Node::literal("this"), vec![Node::accessor(a.text(2)?)]))
        })])
        .rule("Range", vec![
            o!("[ Expression .. Expression ]", |a| node(Node::Range(range(a, 2, 4, false)?))),
            o!("[ Expression ... Expression ]", |a| node(Node::Range(range(a, 2, 4, true)?))),
        ])
        .rule("Array", vec![o!("[ ArgList OptComma ]", |a| {
            node(Node::Array(Array {
                objects: a.nodes(2)?,
            }))
        })])
        .rule("ArgList", vec![
            o!("", |_| nodes(Vec::new())),
            o!("Expression", |a| nodes(vec![a.node(1)?])),
            o!("ArgList , Expression", |a| push(a, 1, 3)),
            o!("ArgList OptComma TERMINATOR Expression", |a| push(a, 1, 4)),
            o!("ArgList OptComma INDENT ArgList OptComma OUTDENT", |a| concat(a, 1, 4)),
        ])
        .rule("SimpleArgs", vec![
            o!("Expression", |a| nodes(vec![a.node(1)?])),
            o!("SimpleArgs , Expression", |a| push(a, 1, 3)),
        ])
        .rule("Try", vec![
            o!("TRY Block Catch", |a| {
                let body = a.block(2)?;
                attempt(body, Some(a.catch(3)?), None)
            }),
            o!("TRY Block FINALLY Block", |a| {
                let body = a.block(2)?;
                attempt(body, None, Some(a.block(4)?))
            }),
            o!("TRY Block Catch FINALLY Block", |a| {
                let body = a.block(2)?;
                let catch = a.catch(3)?;
                attempt(body, Some(catch), Some(a.block(5)?))
            }),
        ])
        .rule("Catch", vec![o!("CATCH Identifier Block", |a| {
            let error = a.node(2)?;
            Ok(StackValue::Catch(error, a.block(3)?))
        })])
        .rule("Throw", vec![o!("THROW Expression", |a| {
            node(Node::Throw(Throw {
                expression: Box::new(a.node(2)?),
            }))
        })])
        .rule("Parenthetical", vec![o!("( Expression )", |a| node(Node::parens(a.node(2)?)))])
        .rule("While", vec![
            o!("WHILE Expression Block", |a| {
                let condition = a.node(2)?;
                looping(condition, Some(a.block(3)?))
            }),
            o!("UNTIL Expression Block", |a| {
                let condition = negate(a.node(2)?);
                looping(condition, Some(a.block(3)?))
            }),
            o!("LOOP Block", |a| looping(Node::literal("true"), Some(a.block(2)?))),
            o!("WHILE Expression", |a| looping(a.node(2)?, None)),
            o!("Expression WHILE Expression", |a| {
                let body = Expressions::wrap(vec![a.node(1)?]);
                looping(a.node(3)?, Some(body))
            }),
            o!("Expression UNTIL Expression", |a| {
                let body = Expressions::wrap(vec![a.node(1)?]);
                looping(negate(a.node(3)?), Some(body))
            }),
        ])
        .rule("For", vec![
            o!("Expression FOR ForVariables ForSource", |a| {
                let body = Expressions::wrap(vec![a.node(1)?]);
                let variables = a.nodes(3)?;
                comprehension(body, variables, a.source(4)?)
            }),
            o!("FOR ForVariables ForSource Block", |a| {
                let variables = a.nodes(2)?;
                let head = a.source(3)?;
                comprehension(a.block(4)?, variables, head)
            }),
        ])
        .rule("ForVariables", vec![
            o!("Identifier", |a| nodes(vec![a.node(1)?])),
            o!("Identifier , Identifier", |a| {
                let name = a.node(1)?;
                nodes(vec![name, a.node(3)?])
            }),
        ])
        .rule("ForSource", vec![
            o!("IN Expression", |a| loop_source(a.node(2)?, false)),
            o!("OF Expression", |a| loop_source(a.node(2)?, true)),
            o!("ForSource WHEN Expression", |a| {
                let mut head = a.source(1)?;
                head.filter = Some(a.node(3)?);
                Ok(StackValue::Source(head))
            }),
            o!("ForSource BY Expression", |a| {
                let mut head = a.source(1)?;
                head.step = Some(a.node(3)?);
                Ok(StackValue::Source(head))
            }),
        ])
        .rule("Switch", vec![
            o!("SWITCH Expression INDENT Whens OUTDENT", |a| {
                let subject = a.node(2)?;
                let whens = if_node(a, 4)?;
                node(Node::If(whens.with_switcher(subject)))
            }),
            o!("SWITCH Expression INDENT Whens ELSE Block OUTDENT", |a| {
                let subject = a.node(2)?;
                let whens = if_node(a, 4)?;
                let otherwise = Node::Expressions(a.block(6)?);
                node(Node::If(whens.with_switcher(subject).add_else(otherwise)))
            }),
        ])
        .rule("Whens", vec![
            o!("When"),
            o!("Whens When", |a| {
                let chain = if_node(a, 1)?;
                node(Node::If(chain.add_else(a.node(2)?)))
            }),
        ])
        .rule("When", vec![
            o!("LEADING_WHEN SimpleArgs Block", |a| {
                let conditions = a.nodes(2)?;
                node(Node::If(If::with_conditions(conditions, a.block(3)?).force_statement()))
            }),
            o!("LEADING_WHEN SimpleArgs Block TERMINATOR", |a| {
                let conditions = a.nodes(2)?;
                node(Node::If(If::with_conditions(conditions, a.block(3)?).force_statement()))
            }),
            o!("Comment TERMINATOR When", |a| {
                let comment = a.node(1)?;
                let when = if_node(a, 3)?;
                node(Node::If(when.with_comment(comment)))
            }),
        ])
        .rule("IfStart", vec![
            o!("IF Expression Block", |a| {
                let condition = a.node(2)?;
                node(Node::If(If::new(condition, a.block(3)?)))
            }),
            o!("UNLESS Expression Block", |a| {
                let condition = a.node(2)?;
                node(Node::If(If::new(condition, a.block(3)?).inverted()))
            }),
            o!("IfStart ELSE IF Expression Block", |a| {
                let head = if_node(a, 1)?;
                let condition = a.node(4)?;
                let branch = If::new(condition, a.block(5)?).force_statement();
                node(Node::If(head.add_else(Node::If(branch))))
            }),
        ])
        .rule("If", vec![
            o!("IfStart"),
            o!("IfStart ELSE Block", |a| {
                let head = if_node(a, 1)?;
                node(Node::If(head.add_else(Node::Expressions(a.block(3)?))))
            }),
            o!("Expression IF Expression", |a| {
                let body = Expressions::wrap(vec![a.node(1)?]);
                node(Node::If(If::new(a.node(3)?, body).force_statement()))
            }),
            o!("Expression UNLESS Expression", |a| {
                let body = Expressions::wrap(vec![a.node(1)?]);
                node(Node::If(If::new(a.node(3)?, body).inverted().force_statement()))
            }),
        ])
        .rule("Operation", operation)
        .operators(OPERATORS)
}
