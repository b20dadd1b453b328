/// A node of the syntax tree.
///
/// The tree is strict: every node owns its children and no node is shared.
/// Lowering never mutates the tree it is given; rewrites such as return
/// injection or class desugaring build new nodes from clones.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A sequence of expressions: a program body, a block, a function body.
    Expressions(Expressions),

    /// Verbatim text: identifiers, numbers, strings, `this`, `break`.
    ///
    /// # Examples
    /// ```text
    /// square
    /// 42
    /// "hello"
    /// break
    /// ```
    Literal(Literal),

    /// `return expr`
    Return(Return),

    /// A base expression followed by property, index and slice accesses.
    ///
    /// # Examples
    /// ```text
    /// a.b[0].c
    /// a?.b
    /// list[1..2]
    /// ```
    Value(Value),

    /// A source comment, carried through to the output.
    Comment(Comment),

    /// A function call, a `new` expression or a `super` call.
    ///
    /// # Examples
    /// ```text
    /// f(a, b)
    /// new Point(1, 2)
    /// super(name)
    /// f(args...)
    /// ```
    Call(Call),

    /// `Child extends Parent` as a standalone expression.
    Extends(Extends),

    /// `.name`, `::name` or `?.name`
    Accessor(Accessor),

    /// `[expr]` or `?[expr]`
    Index(Index),

    /// `[a..b]` (inclusive) or `[a...b]` (exclusive)
    Range(Range),

    /// An index access holding a range: `list[a..b]`
    Slice(Slice),

    /// `{key: value, ...}`
    Object(Object),

    /// `[a, b, c]`
    Array(Array),

    /// A class definition with an optional parent and prototype properties.
    ///
    /// # Examples
    /// ```text
    /// class Dog extends Animal
    ///   constructor: (name) -> super(name)
    ///   speak: -> "woof"
    /// ```
    Class(Class),

    /// Assignment, object property definition or destructuring.
    ///
    /// # Examples
    /// ```text
    /// a = 1
    /// key: value
    /// [a, b] = pair
    /// list[1..2] = other
    /// ```
    Assign(Assign),

    /// A function literal, plain (`->`) or bound to the outer receiver (`=>`).
    Code(Code),

    /// A rest parameter or a spread argument: `args...`
    Splat(Splat),

    /// `while`, `until` and `loop`.
    While(While),

    /// Unary, binary and compound-assignment operators.
    Op(Op),

    /// `try` / `catch` / `finally`
    Try(Try),

    /// `throw expr`
    Throw(Throw),

    /// The postfix existence check `expr?`
    Existence(Existence),

    /// `(expr)`
    Parenthetical(Parenthetical),

    /// A comprehension over a range, an array or an object's own keys.
    ///
    /// # Examples
    /// ```text
    /// x * 2 for x in list
    /// for key, value of object
    /// i for i in [0..10] when i % 2 by 2
    /// ```
    For(For),

    /// `if`, `unless`, postfix conditionals and `switch` arms.
    If(If),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expressions {
    pub expressions: Vec<Node>,
}

impl Expressions {
    pub fn new() -> Self {
        Expressions::default()
    }

    /// Build a block from nodes, collapsing a lone nested block into itself.
    pub fn wrap(mut nodes: Vec<Node>) -> Self {
        if nodes.len() == 1 && matches!(nodes[0], Node::Expressions(_)) {
            if let Some(Node::Expressions(inner)) = nodes.pop() {
                return inner;
            }
        }
        Expressions { expressions: nodes }
    }

    pub fn push(mut self, node: Node) -> Self {
        self.expressions.push(node);
        self
    }

    pub fn unshift(mut self, node: Node) -> Self {
        self.expressions.insert(0, node);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// A block of exactly one expression is that expression.
    pub fn unwrap(mut self) -> Node {
        if self.expressions.len() == 1 {
            if let Some(node) = self.expressions.pop() {
                return node;
            }
        }
        Node::Expressions(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: String,
}

impl Literal {
    pub fn is_control(&self) -> bool {
        self.value == "break" || self.value == "continue"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub expression: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub base: Box<Node>,
    pub properties: Vec<Node>,
}

impl Value {
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    pub fn is_array(&self) -> bool {
        !self.has_properties() && matches!(*self.base, Node::Array(_))
    }

    pub fn is_object(&self) -> bool {
        !self.has_properties() && matches!(*self.base, Node::Object(_))
    }

    pub fn is_splice(&self) -> bool {
        matches!(self.properties.last(), Some(Node::Slice(_)))
    }

    pub fn push(mut self, property: Node) -> Self {
        self.properties.push(property);
        self
    }

    /// The same chain without its last access.
    pub fn without_last(&self) -> Value {
        let keep = self.properties.len().saturating_sub(1);
        Value {
            base: self.base.clone(),
            properties: self.properties[..keep].to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    Super,
    Expr(Box<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Callee,
    pub args: Vec<Node>,
    pub is_new: bool,
}

impl Call {
    pub fn new(callee: Node, args: Vec<Node>) -> Self {
        Call {
            callee: Callee::Expr(Box::new(callee)),
            args,
            is_new: false,
        }
    }

    pub fn to_super(args: Vec<Node>) -> Self {
        Call {
            callee: Callee::Super,
            args,
            is_new: false,
        }
    }

    pub fn new_instance(mut self) -> Self {
        self.is_new = true;
        self
    }

    pub fn has_splat(&self) -> bool {
        self.args.iter().any(|arg| matches!(arg, Node::Splat(_)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extends {
    pub child: Box<Node>,
    pub parent: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub name: String,
    pub prototype: bool,
    pub soak: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub index: Box<Node>,
    pub soak: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub from: Box<Node>,
    pub to: Box<Node>,
    pub exclusive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub properties: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub objects: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub variable: Box<Node>,
    pub parent: Option<Box<Node>>,
    pub properties: Vec<Node>,
    pub returns: bool,
}

/// Where an assignment appears, which changes what it lowers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignContext {
    /// `a = b`
    #[default]
    Plain,
    /// `key: value` inside an object literal or class body
    Object,
    /// `@key: value` inside a class body (a static property)
    This,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub variable: Box<Node>,
    pub value: Box<Node>,
    pub context: AssignContext,
}

impl Assign {
    pub fn new(variable: Node, value: Node) -> Self {
        Assign::with_context(variable, value, AssignContext::Plain)
    }

    pub fn with_context(variable: Node, value: Node, context: AssignContext) -> Self {
        Assign {
            variable: Box::new(variable),
            value: Box::new(value),
            context,
        }
    }

    /// The value can leave the enclosing body, so the assignment is lowered
    /// as that statement.
    pub fn escapes(&self) -> bool {
        self.context != AssignContext::Object && self.value.traps_pure_statement()
    }

    /// Destructuring: the target is an array or object literal.
    pub fn is_pattern(&self) -> bool {
        match &*self.variable {
            Node::Value(value) => value.is_array() || value.is_object(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub params: Vec<Node>,
    pub body: Expressions,
    pub bound: bool,
    /// Method name, filled in when the function is assigned to a name
    pub name: Option<String>,
    /// Owner of the prototype the method is assigned onto
    pub proto: Option<String>,
}

impl Code {
    pub fn new(params: Vec<Node>, body: Expressions, bound: bool) -> Self {
        Code {
            params,
            body,
            bound,
            name: None,
            proto: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplatParam {
    /// Position of the splat in the parameter list
    pub index: usize,
    /// Parameters declared after the splat
    pub trailings: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Splat {
    pub name: Box<Node>,
    pub param: Option<SplatParam>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Box<Node>,
    pub body: Option<Box<Node>>,
    pub returns: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Op {
    pub operator: String,
    pub first: Box<Node>,
    pub second: Option<Box<Node>>,
    /// Postfix form of `++` / `--`
    pub flip: bool,
}

const CHAINABLE: [&str; 6] = ["<", ">", ">=", "<=", "===", "!=="];
const ASSIGNMENT: [&str; 3] = ["||=", "&&=", "?="];

impl Op {
    /// Build an operator node, translating source spellings to target ones.
    pub fn new(operator: &str, first: Node, second: Option<Node>) -> Self {
        let operator = match operator {
            "==" | "is" | "IS" => "===",
            "!=" | "isnt" | "ISNT" => "!==",
            "and" | "AND" => "&&",
            "or" | "OR" => "||",
            "not" | "NOT" => "!",
            other => other,
        };
        Op {
            operator: operator.to_string(),
            first: Box::new(first),
            second: second.map(Box::new),
            flip: false,
        }
    }

    pub fn flipped(mut self) -> Self {
        self.flip = true;
        self
    }

    pub fn is_unary(&self) -> bool {
        self.second.is_none()
    }

    pub fn is_chainable(&self) -> bool {
        CHAINABLE.contains(&self.operator.as_str())
    }

    /// `a < b < c`: a comparison whose left side is itself a comparison.
    pub fn is_chain(&self) -> bool {
        self.is_chainable() && matches!(&*self.first, Node::Op(inner) if inner.is_chainable())
    }

    pub fn is_mutation(&self) -> bool {
        ASSIGNMENT.contains(&self.operator.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub attempt: Box<Node>,
    pub error: Option<Box<Node>>,
    pub recovery: Option<Box<Node>>,
    pub ensure: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Throw {
    pub expression: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Existence {
    pub expression: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parenthetical {
    pub expression: Box<Node>,
}

/// The `in`/`of` clause of a comprehension, with its optional guard and step.
#[derive(Debug, Clone, PartialEq)]
pub struct ForSource {
    pub source: Node,
    pub filter: Option<Node>,
    pub step: Option<Node>,
    pub object: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub body: Box<Node>,
    pub source: Box<Node>,
    pub name: Option<Box<Node>>,
    pub index: Option<Box<Node>>,
    pub filter: Option<Box<Node>>,
    pub step: Option<Box<Node>>,
    pub object: bool,
    pub returns: bool,
}

impl For {
    /// `for name, index in source`. Object iteration binds the key to
    /// `index` and the value to `name`, so the two are swapped for `of`.
    pub fn new(body: Expressions, head: ForSource, name: Option<Node>, index: Option<Node>) -> Self {
        let (name, index) = if head.object { (index, name) } else { (name, index) };
        For {
            body: Box::new(Node::Expressions(body)),
            source: Box::new(head.source),
            name: name.map(Box::new),
            index: index.map(Box::new),
            filter: head.filter.map(Box::new),
            step: head.step.map(Box::new),
            object: head.object,
            returns: false,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(&*self.source, Node::Value(value) if !value.has_properties() && matches!(*value.base, Node::Range(_)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    /// One condition, or several `when` alternatives joined with `||`
    pub conditions: Vec<Node>,
    pub body: Box<Node>,
    pub else_body: Option<Box<Node>>,
    /// Subject of a `switch`; conditions are compared against it
    pub switcher: Option<Box<Node>>,
    pub comment: Option<Box<Node>>,
    /// Forces the block form even when a ternary would do
    pub statement: bool,
}

impl If {
    pub fn new(condition: Node, body: Expressions) -> Self {
        If::with_conditions(vec![condition], body)
    }

    pub fn with_conditions(conditions: Vec<Node>, body: Expressions) -> Self {
        If {
            conditions,
            body: Box::new(body.unwrap()),
            else_body: None,
            switcher: None,
            comment: None,
            statement: false,
        }
    }

    /// `unless cond`: negate the (single) condition.
    pub fn inverted(mut self) -> Self {
        self.conditions = std::mem::take(&mut self.conditions)
            .into_iter()
            .map(|condition| Node::Op(Op::new("!", Node::parens(condition), None)))
            .collect();
        self
    }

    pub fn force_statement(mut self) -> Self {
        self.statement = true;
        self
    }

    pub fn with_comment(mut self, comment: Node) -> Self {
        self.comment = Some(Box::new(comment));
        self
    }

    /// Needs the block form: forced, commented, or an arm is a statement.
    pub fn is_statement(&self) -> bool {
        self.statement
            || self.comment.is_some()
            || self.body.is_statement()
            || self.else_body.as_ref().is_some_and(|body| body.is_statement())
    }

    /// An `else` branch that is itself an `if` makes an `else if` chain.
    pub fn is_chain(&self) -> bool {
        matches!(self.else_body.as_deref(), Some(Node::If(_)))
    }

    /// Attach an else branch at the end of the chain.
    pub fn add_else(mut self, else_body: Node) -> Self {
        let next = match self.else_body.take().map(|inner| *inner) {
            Some(Node::If(chained)) => Node::If(chained.add_else(else_body)),
            _ => unwrap_block(else_body),
        };
        self.else_body = Some(Box::new(next));
        self
    }

    /// Make this a `switch` arm chain comparing against `subject`.
    pub fn with_switcher(mut self, subject: Node) -> Self {
        self.switcher = Some(Box::new(subject));
        self
    }
}

fn unwrap_block(node: Node) -> Node {
    match node {
        Node::Expressions(block) => block.unwrap(),
        other => other,
    }
}

// ============================================================================
// Construction helpers
// ============================================================================

impl Node {
    pub fn literal(value: impl Into<String>) -> Node {
        Node::Literal(Literal {
            value: value.into(),
        })
    }

    /// A value chain with no accesses yet.
    pub fn value(base: Node) -> Node {
        Node::value_with(base, Vec::new())
    }

    pub fn value_with(base: Node, properties: Vec<Node>) -> Node {
        Node::Value(Value {
            base: Box::new(base),
            properties,
        })
    }

    pub fn accessor(name: impl Into<String>) -> Node {
        Node::Accessor(Accessor {
            name: name.into(),
            prototype: false,
            soak: false,
        })
    }

    pub fn index(index: Node) -> Node {
        Node::Index(Index {
            index: Box::new(index),
            soak: false,
        })
    }

    pub fn parens(expression: Node) -> Node {
        Node::Parenthetical(Parenthetical {
            expression: Box::new(expression),
        })
    }

    pub fn returning(expression: Node) -> Node {
        Node::Return(Return {
            expression: Box::new(expression),
        })
    }

    pub fn assign(variable: Node, value: Node) -> Node {
        Node::Assign(Assign::new(variable, value))
    }

    pub fn call(callee: Node, args: Vec<Node>) -> Node {
        Node::Call(Call::new(callee, args))
    }

    pub fn op(operator: &str, first: Node, second: Node) -> Node {
        Node::Op(Op::new(operator, first, Some(second)))
    }

    pub fn block(nodes: Vec<Node>) -> Node {
        Node::Expressions(Expressions::wrap(nodes))
    }

    /// `(function(){ body }).call(this)`, used to evaluate statements inline.
    pub fn closure_call(body: Expressions) -> Node {
        let func = Node::Code(Code::new(Vec::new(), body, false));
        let callee = Node::value_with(Node::parens(func), vec![Node::accessor("call")]);
        Node::call(callee, vec![Node::literal("this")])
    }

    /// `accumulator.push(expr)` around the last value of a comprehension body.
    pub fn push_into(accumulator: &str, body: Node) -> Node {
        let expr = match body {
            Node::Expressions(mut block) if block.expressions.len() > 1 => {
                if let Some(last) = block.expressions.pop() {
                    block.expressions.push(Node::push_into(accumulator, last));
                }
                return Node::Expressions(block);
            }
            Node::Expressions(block) if block.is_empty() => return Node::Expressions(block),
            Node::Expressions(block) => block.unwrap(),
            other => other,
        };
        if matches!(expr, Node::Comment(_)) || expr.is_pure_statement() || expr.contains_pure_statement() {
            return expr;
        }
        let callee = Node::value_with(Node::literal(accumulator), vec![Node::accessor("push")]);
        Node::block(vec![Node::call(callee, vec![expr])])
    }
}
