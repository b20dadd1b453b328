use super::nodes::Node;

impl Node {
    /// Short name of the variant, used in error messages and tree dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Expressions(_) => "Expressions",
            Node::Literal(_) => "Literal",
            Node::Return(_) => "Return",
            Node::Value(_) => "Value",
            Node::Comment(_) => "Comment",
            Node::Call(_) => "Call",
            Node::Extends(_) => "Extends",
            Node::Accessor(_) => "Accessor",
            Node::Index(_) => "Index",
            Node::Range(_) => "Range",
            Node::Slice(_) => "Slice",
            Node::Object(_) => "Object",
            Node::Array(_) => "Array",
            Node::Class(_) => "Class",
            Node::Assign(_) => "Assign",
            Node::Code(_) => "Code",
            Node::Splat(_) => "Splat",
            Node::While(_) => "While",
            Node::Op(_) => "Op",
            Node::Try(_) => "Try",
            Node::Throw(_) => "Throw",
            Node::Existence(_) => "Existence",
            Node::Parenthetical(_) => "Parenthetical",
            Node::For(_) => "For",
            Node::If(_) => "If",
        }
    }

    /// Lowers to a target-language statement rather than an expression.
    pub fn is_statement(&self) -> bool {
        match self {
            Node::Expressions(_)
            | Node::Return(_)
            | Node::Comment(_)
            | Node::Class(_)
            | Node::While(_)
            | Node::Try(_)
            | Node::Throw(_)
            | Node::For(_) => true,
            Node::Literal(literal) => literal.is_control(),
            Node::Value(value) => !value.has_properties() && value.base.is_statement(),
            Node::Assign(assign) => assign.is_pattern() || assign.escapes(),
            Node::Parenthetical(parens) => parens.expression.is_statement(),
            Node::If(node) => node.is_statement(),
            _ => false,
        }
    }

    /// Control transfer (`return`, `break`, `continue`). Never closure-wrapped.
    pub fn is_pure_statement(&self) -> bool {
        match self {
            Node::Return(_) => true,
            Node::Literal(literal) => literal.is_control(),
            Node::Value(value) => !value.has_properties() && value.base.is_pure_statement(),
            _ => false,
        }
    }

    pub fn is_top_sensitive(&self) -> bool {
        matches!(
            self,
            Node::Return(_) | Node::Assign(_) | Node::Code(_) | Node::While(_) | Node::For(_)
        )
    }

    /// Nodes whose lowering changes when they are an operand: soaked
    /// values, ternaries and binary `?` need parentheses there.
    pub fn is_operation_sensitive(&self) -> bool {
        matches!(self, Node::Value(_) | Node::Op(_) | Node::If(_))
    }

    /// Whether any node below this one is a pure statement. Function bodies
    /// are opaque: their `return`s belong to them.
    pub fn contains_pure_statement(&self) -> bool {
        self.children()
            .into_iter()
            .any(|child| child.is_pure_statement() || child.contains_pure_statement())
    }

    /// A statement holding a `return`, `break` or `continue` that would
    /// leave a closure instead of the enclosing function or loop.
    pub fn traps_pure_statement(&self) -> bool {
        self.is_statement() && !self.is_pure_statement() && self.contains_pure_statement()
    }

    /// A value chain without accesses stands for its base.
    pub fn unwrap_value(&self) -> &Node {
        match self {
            Node::Value(value) if !value.has_properties() => &value.base,
            other => other,
        }
    }

    /// Evaluating this more than once could repeat work or side effects.
    pub fn is_complex(&self) -> bool {
        match self {
            Node::Literal(_) => false,
            Node::Value(value) => value.base.is_complex() || value.properties.iter().any(Node::is_complex),
            Node::Accessor(_) => false,
            Node::Index(index) => index.index.is_complex(),
            _ => true,
        }
    }

    pub fn is_splat(&self) -> bool {
        matches!(self, Node::Splat(_))
    }
}
