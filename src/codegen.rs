//! # Kettle - Code Generator
//!
//! Lowers the syntax tree to JavaScript text in a single recursive pass.
//!
//! ## Organization
//!
//! - **this module** - `Compiler`, the per-call `Context`, `compile` dispatch,
//!   closure wrapping, hoisted declarations and the program wrapper
//! - **[values]** - literals, value chains with soaks, collections, ranges
//! - **[calls]** - calls, `super`, functions, splats, classes, `extends`
//! - **[assign]** - plain assignment, destructuring and slice assignment
//! - **[operators]** - unary, binary, chained and existential operators
//! - **[control]** - `return`, `if`/`switch`, loops, comprehensions, `try`
//!
//! ## Contexts
//!
//! Every `compile` call receives a [`Context`] by reference and clones it
//! before changing anything, so a node's adjustments never leak into its
//! siblings. The flags that matter most:
//!
//! - `top` - the node is a line of a body, so a statement can stay a statement
//! - `operation` - the node is an operator operand (soaks get parenthesized)
//! - `returns` - the node is compiled in return position
//!
//! A statement compiled anywhere else is wrapped in an immediately invoked
//! closure, unless it contains a `return`, `break` or `continue` whose
//! meaning the closure would change.
//!
//! ## Scopes and temporaries
//!
//! One [`Scopes`] stack per compilation. Function literals push a scope and
//! pop it once their body is emitted; the names a body assigned come out as
//! one hoisted `var` line at its top. Temporaries (`_a`, `_b`, ...) come from
//! the same stack and never collide with anything visible.

mod assign;
mod calls;
mod control;
mod operators;
mod values;

use crate::ast::{Expressions, Node};
use crate::error::LowerError;
use crate::scope::Scopes;
use regex::Regex;
use std::sync::LazyLock;

const TAB: &str = "  ";

static TRAILING_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").expect("trailing whitespace pattern"));

pub(crate) static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_$][\w$]*$").expect("identifier pattern"));

/// Options for one compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Emit the program without the `(function(){ ... })();` wrapper
    pub no_wrap: bool,
    /// Leave top-level names undeclared, for callers that manage globals
    pub globals: bool,
    /// Return the value of the program's last expression from the wrapper
    pub request_return: bool,
}

/// Per-call compilation state.
#[derive(Debug, Clone, Default)]
pub(crate) struct Context {
    pub indent: String,
    pub top: bool,
    pub returns: bool,
    pub as_statement: bool,
    pub operation: bool,
    /// An `if` compiled as the `else` branch of another `if`
    pub chain_child: bool,
    /// The next function literal reuses the current scope (closure wrappers)
    pub shared_scope: bool,
}

impl Context {
    pub fn idt(&self, tabs: usize) -> String {
        format!("{}{}", self.indent, TAB.repeat(tabs))
    }

    pub fn indented(&self, tabs: usize) -> Context {
        let mut o = self.clone();
        o.indent = self.idt(tabs);
        o
    }

    /// The same indentation, in plain expression position.
    pub fn expression(&self) -> Context {
        Context {
            indent: self.indent.clone(),
            ..Context::default()
        }
    }

    /// A line of a body at `tabs` deeper than this node.
    pub fn body(&self, tabs: usize) -> Context {
        Context {
            indent: self.idt(tabs),
            top: true,
            ..Context::default()
        }
    }
}

/// One compilation: the options and the scope chain.
#[derive(Debug)]
pub struct Compiler {
    options: CompileOptions,
    scopes: Scopes,
}

/// Lower a program.
///
/// # Examples
/// ```
/// use kettle_lang::ast::Node;
/// use kettle_lang::codegen::{lower, CompileOptions};
///
/// let program = Node::block(vec![Node::assign(
///     Node::value(Node::literal("answer")),
///     Node::value(Node::literal("42")),
/// )]);
/// let options = CompileOptions { no_wrap: true, ..Default::default() };
/// assert_eq!(lower(&program, &options).unwrap(), "var answer;\nanswer = 42;");
/// ```
pub fn lower(root: &Node, options: &CompileOptions) -> Result<String, LowerError> {
    Compiler::new(*options).compile_root(root)
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Compiler {
            options,
            scopes: Scopes::new(),
        }
    }

    /// Compile a whole program. Consumes the compiler: temporaries and
    /// declarations belong to exactly one output.
    pub fn compile_root(mut self, root: &Node) -> Result<String, LowerError> {
        let indent = if self.options.no_wrap { "" } else { TAB };
        let mut body = match root {
            Node::Expressions(block) => block.clone(),
            other => Expressions::wrap(vec![other.clone()]),
        };
        if self.options.request_return {
            body = body.make_return();
        }

        let o = Context {
            indent: indent.to_string(),
            top: true,
            ..Context::default()
        };
        let declare = !self.options.globals;
        let code = self.compile_with_declarations(&body, &o, declare)?;
        let code = TRAILING_WHITESPACE.replace_all(&code, "").into_owned();

        if self.options.no_wrap {
            Ok(code)
        } else {
            Ok(format!("(function(){{\n{}\n}})();\n", code))
        }
    }

    /// The single entry point for every node: decides between closure
    /// wrapping and the node's own lowering.
    pub(crate) fn compile(&mut self, node: &Node, o: &Context) -> Result<String, LowerError> {
        let mut o = o.clone();
        if !node.is_operation_sensitive() {
            o.operation = false;
        }
        let top = o.top;
        if !keeps_top(node) {
            o.top = false;
        }

        let closure = node.is_statement()
            && !node.is_pure_statement()
            && !top
            && !o.as_statement
            && !o.returns
            && !matches!(node, Node::Comment(_))
            && !node.contains_pure_statement();

        if !handles_returns(node) {
            o.returns = false;
        }
        if !matches!(node, Node::Assign(_)) {
            o.as_statement = false;
        }

        if closure {
            self.compile_closure(node, &o)
        } else {
            self.lower(node, &o)
        }
    }

    fn lower(&mut self, node: &Node, o: &Context) -> Result<String, LowerError> {
        match node {
            Node::Expressions(block) => self.compile_expressions(block, o),
            Node::Literal(literal) => Ok(self.lower_literal(literal, o)),
            Node::Return(node) => self.lower_return(node, o),
            Node::Value(value) => self.lower_value(value, o),
            Node::Comment(comment) => Ok(self.lower_comment(comment, o)),
            Node::Call(call) => self.lower_call(call, o),
            Node::Extends(node) => self.lower_extends(node, o),
            Node::Accessor(accessor) => Ok(self.lower_accessor(accessor)),
            Node::Index(index) => self.lower_index(index, o),
            Node::Range(range) => self.lower_range(range, o),
            Node::Slice(slice) => self.lower_slice(slice, o),
            Node::Object(object) => self.lower_object(object, o),
            Node::Array(array) => self.lower_array(array, o),
            Node::Class(class) => self.lower_class(class, o),
            Node::Assign(assign) => self.lower_assign(assign, o),
            Node::Code(code) => self.lower_code(code, o),
            Node::Splat(splat) => self.lower_splat(splat, o),
            Node::While(node) => self.lower_while(node, o),
            Node::Op(op) => self.lower_op(op, o),
            Node::Try(node) => self.lower_try(node, o),
            Node::Throw(node) => self.lower_throw(node, o),
            Node::Existence(node) => self.lower_existence(node, o),
            Node::Parenthetical(node) => self.lower_parenthetical(node, o),
            Node::For(node) => self.lower_for(node, o),
            Node::If(node) => self.lower_if(node, o),
        }
    }

    /// `(function(){ <statement> }).call(this)`, sharing the current scope.
    fn compile_closure(&mut self, node: &Node, o: &Context) -> Result<String, LowerError> {
        let mut o = o.clone();
        o.shared_scope = true;
        let call = Node::closure_call(Expressions::wrap(vec![node.clone()]));
        self.compile(&call, &o)
    }

    /// Each expression on its own line; expressions get a trailing `;`.
    /// Only the last line is in return position.
    pub(crate) fn compile_expressions(
        &mut self,
        block: &Expressions,
        o: &Context,
    ) -> Result<String, LowerError> {
        let mut line = o.clone();
        line.top = true;
        let last = block.expressions.len().saturating_sub(1);
        let mut lines = Vec::with_capacity(block.expressions.len());
        for (i, node) in block.expressions.iter().enumerate() {
            line.returns = o.returns && i == last;
            let code = self.compile(node, &line)?;
            if lowers_to_statement(node) {
                lines.push(code);
            } else {
                lines.push(format!("{}{};", o.indent, code));
            }
        }
        Ok(lines.join("\n"))
    }

    /// A branch or loop body, which may be a lone expression.
    pub(crate) fn compile_block(&mut self, node: &Node, o: &Context) -> Result<String, LowerError> {
        self.compile_expressions(&Expressions::wrap(vec![node.clone()]), o)
    }

    /// A body preceded by its scope's hoisted `var` lines.
    pub(crate) fn compile_with_declarations(
        &mut self,
        block: &Expressions,
        o: &Context,
        declare: bool,
    ) -> Result<String, LowerError> {
        let mut code = self.compile_expressions(block, o)?;
        let scope = self.scopes.current();
        if scope.has_assignments() {
            code = format!("{}var {};\n{}", o.indent, scope.compiled_assignments(), code);
        }
        if declare && scope.has_declarations() {
            code = format!("{}var {};\n{}", o.indent, scope.compiled_declarations(), code);
        }
        Ok(code)
    }

    /// Evaluate `node` once into a fresh temporary: the assignment to use
    /// first, and the temporary to use afterwards.
    pub(crate) fn compile_reference(
        &mut self,
        node: &Node,
        o: &Context,
    ) -> Result<(String, String), LowerError> {
        let temp = self.scopes.free_variable();
        let code = self.compile(node, o)?;
        Ok((format!("({} = {})", temp, code), temp))
    }
}

/// Nodes that still see `top` after `compile` looks at it. A bare value
/// passes it on to the node it wraps.
fn keeps_top(node: &Node) -> bool {
    match node {
        Node::If(_) => true,
        Node::Value(value) => !value.has_properties(),
        other => other.is_top_sensitive(),
    }
}

fn handles_returns(node: &Node) -> bool {
    matches!(
        node,
        Node::Expressions(_)
            | Node::If(_)
            | Node::While(_)
            | Node::For(_)
            | Node::Class(_)
            | Node::Try(_)
            | Node::Parenthetical(_)
            | Node::Return(_)
    )
}

/// Lines that carry their own indentation and terminator. An `if` on a line
/// of its own always takes the block form.
fn lowers_to_statement(node: &Node) -> bool {
    node.is_statement() || matches!(node, Node::If(_))
}

/// Whether a function literal appears anywhere in `node`.
fn contains_code(node: &Node) -> bool {
    if matches!(node, Node::Code(_)) {
        return true;
    }
    let mut found = false;
    node.traverse(&mut |child, _| {
        if matches!(child, Node::Code(_)) {
            found = true;
        }
    });
    found
}
