use super::{contains_code, Compiler, Context};
use crate::ast::{Code, Expressions, For, If, Node, Return, Throw, Try, While};
use crate::error::LowerError;

impl Compiler {
    /// A returned statement pushes the return into itself instead.
    pub(super) fn lower_return(&mut self, node: &Return, o: &Context) -> Result<String, LowerError> {
        if node.expression.is_statement() {
            let mut o = o.clone();
            o.returns = true;
            let inner = (*node.expression).clone().make_return();
            return self.compile(&inner, &o);
        }
        let expression = self.compile(&node.expression, &o.expression())?;
        Ok(format!("{}return {};", o.indent, expression))
    }

    pub(super) fn lower_if(&mut self, node: &If, o: &Context) -> Result<String, LowerError> {
        let rewritten;
        let node = match &node.switcher {
            Some(subject) => {
                rewritten = self.rewrite_switch(node, subject);
                &rewritten
            }
            None => node,
        };
        if node.is_statement() || o.top {
            self.compile_if_statement(node, o)
        } else {
            self.compile_ternary(node, o)
        }
    }

    /// Turn `switch` arms into comparisons against the subject, which is
    /// evaluated once, in the first comparison.
    fn rewrite_switch(&mut self, node: &If, subject: &Node) -> If {
        let (assigner, reference) = match subject.unwrap_value() {
            Node::Literal(_) => (subject.clone(), subject.clone()),
            _ => {
                let temp = Node::literal(self.scopes.free_variable());
                (Node::assign(temp.clone(), subject.clone()), temp)
            }
        };

        let mut rewritten = node.clone();
        rewritten.switcher = None;
        rewritten.conditions = node
            .conditions
            .iter()
            .enumerate()
            .map(|(i, condition)| {
                let condition = match condition {
                    Node::Op(_) => Node::parens(condition.clone()),
                    other => other.clone(),
                };
                let left = if i == 0 { assigner.clone() } else { reference.clone() };
                Node::op("==", left, condition)
            })
            .collect();
        if let Some(Node::If(chained)) = rewritten.else_body.as_deref() {
            let chained = chained.clone().with_switcher(reference);
            rewritten.else_body = Some(Box::new(Node::If(chained)));
        }
        rewritten
    }

    fn compile_conditions(&mut self, node: &If, o: &Context) -> Result<String, LowerError> {
        let mut conditions = Vec::with_capacity(node.conditions.len());
        for condition in &node.conditions {
            conditions.push(self.compile(condition, o)?);
        }
        Ok(conditions.join(" || "))
    }

    fn compile_if_statement(&mut self, node: &If, o: &Context) -> Result<String, LowerError> {
        let comment = match &node.comment {
            Some(comment) => {
                let text = self.compile(comment, &o.expression())?;
                let text = if o.chain_child { text.trim_start().to_string() } else { text };
                format!("{}\n", text)
            }
            None => String::new(),
        };
        let if_dent = if o.chain_child && comment.is_empty() { "" } else { o.indent.as_str() };
        let condition = self.compile_conditions(node, &o.expression())?;

        let mut body_context = o.body(1);
        body_context.returns = o.returns;
        let body = self.compile_block(&node.body, &body_context)?;
        let mut code = format!("{}{}if ({}) {{\n{}\n{}}}", comment, if_dent, condition, body, o.indent);

        match node.else_body.as_deref() {
            None => {}
            Some(chained @ Node::If(_)) => {
                let mut else_context = o.body(0);
                else_context.chain_child = true;
                else_context.returns = o.returns;
                code.push_str(" else ");
                code.push_str(&self.compile(chained, &else_context)?);
            }
            Some(else_body) => {
                let otherwise = self.compile_block(else_body, &body_context)?;
                code.push_str(&format!(" else {{\n{}\n{}}}", otherwise, o.indent));
            }
        }
        Ok(code)
    }

    /// `cond ? a : b`; a missing else branch is `null`. Parenthesized when
    /// it is an operand.
    fn compile_ternary(&mut self, node: &If, o: &Context) -> Result<String, LowerError> {
        let operand = o.operation;
        let mut o = o.expression();
        o.operation = true;
        let condition = self.compile_conditions(node, &o)?;
        let body = self.compile(&node.body, &o)?;
        let otherwise = match node.else_body.as_deref() {
            Some(else_body) => self.compile(else_body, &o)?,
            None => "null".to_string(),
        };
        let code = format!("{} ? {} : {}", condition, body, otherwise);
        Ok(if operand { format!("({})", code) } else { code })
    }

    /// A loop used for its value collects each iteration's last expression
    /// into a fresh array.
    pub(super) fn lower_while(&mut self, node: &While, o: &Context) -> Result<String, LowerError> {
        let returns = node.returns || o.returns;
        let top_level = o.top && !returns;
        let condition = self.compile(&node.condition, &o.expression())?;

        let mut body = node.body.as_deref().cloned();
        let mut set = String::new();
        let mut result = None;
        if !top_level {
            let rvar = self.scopes.free_variable();
            set = format!("{}{} = [];\n", o.indent, rvar);
            body = body.map(|body| Node::push_into(&rvar, body));
            result = Some(rvar);
        }

        let pre = format!("{}{}while ({})", set, o.indent, condition);
        let Some(body) = body else {
            return Ok(format!("{} null;", pre));
        };
        let body = self.compile_block(&body, &o.body(1))?;
        let post = match result {
            Some(rvar) if returns => format!("\n{}return {};", o.indent, rvar),
            _ => String::new(),
        };
        Ok(format!("{} {{\n{}\n{}}}{}", pre, body, o.indent, post))
    }

    /// Comprehensions over ranges, arrays and the own keys of objects.
    pub(super) fn lower_for(&mut self, node: &For, o: &Context) -> Result<String, LowerError> {
        let returns = node.returns || o.returns;
        let top_level = o.top && !returns;
        let expression = o.expression();
        let tab = o.indent.as_str();
        let body_dent = o.idt(1);

        let name = match node.name.as_deref() {
            Some(name) => Some(self.compile(name, &expression)?),
            None => None,
        };
        let index = match node.index.as_deref() {
            Some(index) => Some(self.compile(index, &expression)?),
            None => None,
        };
        if let Some(name) = &name {
            self.scopes.find(name);
        }
        if let Some(index) = &index {
            self.scopes.find(index);
        }

        let rvar = if top_level {
            None
        } else {
            Some(self.scopes.free_variable())
        };
        let code_in_body = contains_code(&node.body);

        let mut source_part = String::new();
        let mut var_part = String::new();
        let for_part;
        let ivar;
        let element;

        if let (true, Node::Value(value)) = (node.is_range(), &*node.source) {
            let Node::Range(range) = &*value.base else {
                return Err(LowerError::InvalidNode {
                    kind: value.base.kind(),
                    context: "as the source of a range loop",
                });
            };
            ivar = match &name {
                Some(name) => name.clone(),
                None => self.scopes.free_variable(),
            };
            let from = self.compile_bound(&range.from, &expression, &mut source_part, tab)?;
            let to = self.compile_bound(&range.to, &expression, &mut source_part, tab)?;
            let equals = if range.exclusive { "" } else { "=" };
            let compare = format!(
                "({f} <= {t} ? {i} <{e} {t} : {i} >{e} {t})",
                f = from,
                t = to,
                i = ivar,
                e = equals
            );
            let step = match node.step.as_deref() {
                Some(step) => format!("{} += {}", ivar, self.compile(step, &expression)?),
                None => format!("({f} <= {t} ? {i} += 1 : {i} -= 1)", f = from, t = to, i = ivar),
            };
            for_part = format!("{} = {}; {}; {}", ivar, from, compare, step);
            element = ivar.clone();
        } else {
            let svar = self.scopes.free_variable();
            let source = self.compile(&node.source, &expression)?;
            source_part = format!("{} = {};\n{}", svar, source, tab);
            ivar = match &index {
                Some(index) => index.clone(),
                None => self.scopes.free_variable(),
            };
            element = format!("{}[{}]", svar, ivar);
            if let (Some(name), false) = (&name, code_in_body) {
                var_part = format!("{}{} = {};\n", body_dent, name, element);
            }
            if node.object {
                self.scopes.root_assign("__hasProp", super::calls::HAS_PROP);
                for_part = format!("{} in {}) {{ if (__hasProp.call({}, {})", ivar, svar, svar, ivar);
            } else {
                let lvar = self.scopes.free_variable();
                let step = match node.step.as_deref() {
                    Some(step) => format!("{} += {}", ivar, self.compile(step, &expression)?),
                    None => format!("{}++", ivar),
                };
                for_part = format!("{} = 0, {} = {}.length; {} < {}; {}", ivar, lvar, svar, ivar, lvar, step);
            }
        }

        let mut body = (*node.body).clone();
        if code_in_body {
            body = close_over(body, node, name.as_deref(), &element, &ivar);
        }
        if let Some(rvar) = &rvar {
            body = Node::push_into(rvar, body);
        }
        if let Some(filter) = node.filter.as_deref() {
            let guard = If::new(filter.clone(), Expressions::wrap(vec![body]));
            body = Node::If(guard.force_statement());
        }

        let body = self.compile_block(&body, &o.body(1))?;
        let set_result = match &rvar {
            Some(rvar) => format!("{}{} = []; ", tab, rvar),
            None => tab.to_string(),
        };
        let close = if node.object { "}}" } else { "}" };
        let return_result = match &rvar {
            Some(rvar) if returns => format!("\n{}return {};", tab, rvar),
            _ => String::new(),
        };
        Ok(format!(
            "{}{}for ({}) {{\n{}{}\n{}{}{}",
            set_result, source_part, for_part, var_part, body, tab, close, return_result
        ))
    }

    /// A range bound used as-is when it is cheap, or cached in a temporary
    /// assigned before the loop.
    fn compile_bound(
        &mut self,
        bound: &Node,
        o: &Context,
        source_part: &mut String,
        tab: &str,
    ) -> Result<String, LowerError> {
        let code = self.compile(bound, o)?;
        if !bound.is_complex() {
            return Ok(code);
        }
        let temp = self.scopes.free_variable();
        source_part.push_str(&format!("{} = {};\n{}", temp, code, tab));
        Ok(temp)
    }

    pub(super) fn lower_try(&mut self, node: &Try, o: &Context) -> Result<String, LowerError> {
        let tab = &o.indent;
        let mut inner = o.body(1);
        inner.returns = o.returns;

        let attempt = self.compile_block(&node.attempt, &inner)?;
        let catch_part = match (node.error.as_deref(), node.recovery.as_deref()) {
            (Some(error), Some(recovery)) => {
                let error = self.compile(error, &o.expression())?;
                let recovery = self.compile_block(recovery, &inner)?;
                format!(" catch ({}) {{\n{}\n{}}}", error, recovery, tab)
            }
            _ => String::new(),
        };
        let finally_part = match node.ensure.as_deref() {
            Some(ensure) => {
                let ensure = self.compile_block(ensure, &o.body(1))?;
                format!(" finally {{\n{}\n{}}}", ensure, tab)
            }
            None => String::new(),
        };
        Ok(format!("{}try {{\n{}\n{}}}{}{}", tab, attempt, tab, catch_part, finally_part))
    }

    pub(super) fn lower_throw(&mut self, node: &Throw, o: &Context) -> Result<String, LowerError> {
        let expression = self.compile(&node.expression, &o.expression())?;
        Ok(format!("{}throw {};", o.indent, expression))
    }
}

/// Function literals in a loop body must see each iteration's values,
/// so the body runs in a closure taking them as arguments.
fn close_over(body: Node, node: &For, name: Option<&str>, element: &str, ivar: &str) -> Node {
    let mut params = Vec::new();
    let mut args = vec![Node::literal("this")];
    if let Some(name) = name {
        params.push(Node::literal(name));
        args.push(Node::literal(element));
    }
    if let (false, Some(index)) = (node.is_range(), node.index.as_deref()) {
        params.push(index.clone());
        args.push(Node::literal(ivar));
    }
    let block = Expressions::wrap(vec![body]);
    let func = Node::Code(Code::new(params, block, false));
    let callee = Node::value_with(Node::parens(func), vec![Node::accessor("call")]);
    Node::call(callee, args)
}
