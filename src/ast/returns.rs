use super::nodes::{Expressions, Node};

impl Node {
    /// Rewrite this node so that, as the last expression of a function body,
    /// its value is returned.
    ///
    /// Statements that cannot be returned directly push the return inward:
    /// into both arms of an `if`, into a `try` and its `catch`, or onto the
    /// accumulator of a loop.
    pub fn make_return(self) -> Node {
        if self.is_pure_statement() {
            return self;
        }
        match self {
            Node::Expressions(block) => Node::Expressions(block.make_return()),
            Node::Comment(_) | Node::Throw(_) => self,
            Node::Class(mut class) => {
                class.returns = true;
                Node::Class(class)
            }
            Node::While(mut node) => {
                node.returns = true;
                Node::While(node)
            }
            Node::For(mut node) => {
                node.returns = true;
                Node::For(node)
            }
            Node::Assign(assign) if assign.escapes() => assign.value.make_return(),
            Node::Assign(assign) => {
                let variable = (*assign.variable).clone();
                Node::block(vec![Node::Assign(assign), Node::returning(variable)])
            }
            Node::Value(value) if !value.has_properties() && value.base.is_statement() => {
                value.base.make_return()
            }
            Node::Parenthetical(parens) => parens.expression.make_return(),
            Node::Try(mut node) => {
                node.attempt = Box::new(node.attempt.make_return());
                node.recovery = node.recovery.map(|recovery| Box::new(recovery.make_return()));
                Node::Try(node)
            }
            Node::If(mut node) => {
                if !node.is_statement() {
                    return Node::returning(Node::If(node));
                }
                node.body = Box::new(node.body.make_return());
                node.else_body = node.else_body.map(|body| Box::new(body.make_return()));
                Node::If(node)
            }
            other => Node::returning(other),
        }
    }
}

impl Expressions {
    /// Return the value of the last non-comment expression.
    pub fn make_return(mut self) -> Expressions {
        let Some(mut idx) = self.expressions.len().checked_sub(1) else {
            return self;
        };
        if matches!(self.expressions[idx], Node::Comment(_)) {
            match idx.checked_sub(1) {
                Some(previous) => idx = previous,
                None => return self,
            }
        }
        let last = &self.expressions[idx];
        if matches!(last, Node::Return(_)) || last.contains_pure_statement() {
            return self;
        }
        let last = std::mem::replace(&mut self.expressions[idx], Node::literal(""));
        self.expressions[idx] = last.make_return();
        self
    }
}
