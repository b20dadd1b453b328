use super::nodes::{Callee, Node};
use std::fmt::Write;

impl Node {
    /// Direct children, stopping at function literals.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Code(_) => Vec::new(),
            _ => self.walk_children(),
        }
    }

    /// Direct children including the parameters and body of a function.
    fn walk_children(&self) -> Vec<&Node> {
        let mut out: Vec<&Node> = Vec::new();
        match self {
            Node::Expressions(block) => out.extend(block.expressions.iter()),
            Node::Literal(_) | Node::Comment(_) | Node::Accessor(_) => {}
            Node::Return(node) => out.push(&node.expression),
            Node::Value(value) => {
                out.push(&value.base);
                out.extend(value.properties.iter());
            }
            Node::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    out.push(callee);
                }
                out.extend(call.args.iter());
            }
            Node::Extends(node) => {
                out.push(&node.child);
                out.push(&node.parent);
            }
            Node::Index(node) => out.push(&node.index),
            Node::Range(range) => {
                out.push(&range.from);
                out.push(&range.to);
            }
            Node::Slice(slice) => {
                out.push(&slice.range.from);
                out.push(&slice.range.to);
            }
            Node::Object(object) => out.extend(object.properties.iter()),
            Node::Array(array) => out.extend(array.objects.iter()),
            Node::Class(class) => {
                out.push(&class.variable);
                out.extend(class.parent.as_deref());
                out.extend(class.properties.iter());
            }
            Node::Assign(assign) => {
                out.push(&assign.variable);
                out.push(&assign.value);
            }
            Node::Code(code) => {
                out.extend(code.params.iter());
                out.extend(code.body.expressions.iter());
            }
            Node::Splat(splat) => out.push(&splat.name),
            Node::While(node) => {
                out.push(&node.condition);
                out.extend(node.body.as_deref());
            }
            Node::Op(op) => {
                out.push(&op.first);
                out.extend(op.second.as_deref());
            }
            Node::Try(node) => {
                out.push(&node.attempt);
                out.extend(node.recovery.as_deref());
                out.extend(node.ensure.as_deref());
            }
            Node::Throw(node) => out.push(&node.expression),
            Node::Existence(node) => out.push(&node.expression),
            Node::Parenthetical(node) => out.push(&node.expression),
            Node::For(node) => {
                out.push(&node.body);
                out.push(&node.source);
                out.extend(node.filter.as_deref());
                out.extend(node.step.as_deref());
            }
            Node::If(node) => {
                out.extend(node.switcher.as_deref());
                out.extend(node.conditions.iter());
                out.push(&node.body);
                out.extend(node.else_body.as_deref());
            }
        }
        out
    }

    /// Depth-first, pre-order walk over every descendant, entering function
    /// bodies. The visitor receives each node and its depth below `self`.
    pub fn traverse<F>(&self, visitor: &mut F)
    where
        F: FnMut(&Node, usize),
    {
        self.traverse_at(1, visitor);
    }

    fn traverse_at<F>(&self, depth: usize, visitor: &mut F)
    where
        F: FnMut(&Node, usize),
    {
        for child in self.walk_children() {
            visitor(child, depth);
            child.traverse_at(depth + 1, visitor);
        }
    }

    /// An indented outline of the tree, one node per line.
    ///
    /// # Examples
    /// ```text
    /// Expressions
    ///   Assign
    ///     Value
    ///       Literal "a"
    ///     Value
    ///       Literal "1"
    /// ```
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        self.describe(0, &mut out);
        self.traverse(&mut |node, depth| node.describe(depth, &mut out));
        out
    }

    fn describe(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let _ = match self {
            Node::Literal(literal) => writeln!(out, "{}Literal \"{}\"", indent, literal.value),
            Node::Accessor(accessor) => writeln!(
                out,
                "{}Accessor \"{}\"{}",
                indent,
                accessor.name,
                if accessor.soak { " ?" } else { "" }
            ),
            Node::Op(op) => writeln!(out, "{}Op \"{}\"", indent, op.operator),
            Node::Comment(comment) => writeln!(out, "{}Comment \"{}\"", indent, comment.lines.join("\\n")),
            Node::Code(code) if code.bound => writeln!(out, "{}Code =>", indent),
            _ => writeln!(out, "{}{}", indent, self.kind()),
        };
    }
}
