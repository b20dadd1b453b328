use super::{Compiler, Context};
use crate::ast::{
    Assign, AssignContext, Call, Callee, Class, Code, Expressions, Extends, Node, Splat, SplatParam,
};
use crate::error::LowerError;
use crate::scope::Method;

pub(super) const SLICE: &str = "Array.prototype.slice";
pub(super) const HAS_PROP: &str = "Object.prototype.hasOwnProperty";
const EXTENDS: &str = "function(child, parent) { for (var key in parent) { if (Object.prototype.hasOwnProperty.call(parent, key)) child[key] = parent[key]; } var ctor = function() {}; ctor.prototype = parent.prototype; child.prototype = new ctor(); child.prototype.constructor = child; child.__superClass__ = parent.prototype; return child; }";
const CONSTRUCT: &str = "function(func, args) { var ctor = function() {}; ctor.prototype = func.prototype; var child = new ctor(), result = func.apply(child, args), t = typeof result; return t === \"object\" || t === \"function\" ? result || child : child; }";

impl Compiler {
    pub(super) fn lower_call(&mut self, call: &Call, o: &Context) -> Result<String, LowerError> {
        if call.has_splat() {
            return self.compile_splat_call(call, o);
        }
        let args = self.compile_arguments(&call.args, o)?;
        let callee = match &call.callee {
            Callee::Super => return self.compile_super(&args),
            Callee::Expr(callee) => self.compile(callee, o)?,
        };
        let prefix = if call.is_new { "new " } else { "" };
        Ok(format!("{}{}({})", prefix, callee, args))
    }

    fn compile_arguments(&mut self, args: &[Node], o: &Context) -> Result<String, LowerError> {
        let o = o.expression();
        let mut compiled = Vec::with_capacity(args.len());
        for arg in args {
            compiled.push(self.compile(arg, &o)?);
        }
        Ok(compiled.join(", "))
    }

    /// The method of the parent class that the current method overrides.
    fn super_reference(&self) -> Result<String, LowerError> {
        let method = self.scopes.method().ok_or(LowerError::SuperOutsideMethod)?;
        Ok(match &method.proto {
            Some(proto) => format!("{}.__superClass__.{}", proto, method.name),
            None => format!("{}.__superClass__.constructor", method.name),
        })
    }

    fn compile_super(&mut self, args: &str) -> Result<String, LowerError> {
        let reference = self.super_reference()?;
        if args.is_empty() {
            Ok(format!("{}.call(this)", reference))
        } else {
            Ok(format!("{}.call(this, {})", reference, args))
        }
    }

    /// `f(a, rest...)` becomes `f.apply(receiver, [a].concat(rest))`. A method
    /// call keeps its receiver; a receiver that makes calls of its own is
    /// evaluated once into a temporary.
    fn compile_splat_call(&mut self, call: &Call, o: &Context) -> Result<String, LowerError> {
        if call.is_new {
            return self.compile_splat_new(call, o);
        }
        let (method, receiver) = match &call.callee {
            Callee::Super => (self.super_reference()?, "this".to_string()),
            Callee::Expr(callee) => match &**callee {
                Node::Value(value) if value.has_properties() => {
                    let expression = o.expression();
                    let source = self.compile(&Node::Value(value.without_last()), &expression)?;
                    let last = match value.properties.last() {
                        Some(Node::Accessor(accessor)) => self.lower_accessor(accessor),
                        Some(Node::Index(index)) => self.lower_index(index, &expression)?,
                        Some(other) => self.compile(other, &expression)?,
                        None => String::new(),
                    };
                    if source.contains('(') {
                        let temp = self.scopes.free_variable();
                        (format!("({} = {}){}", temp, source, last), temp)
                    } else {
                        (format!("{}{}", source, last), source)
                    }
                }
                other => (self.compile(other, o)?, "this".to_string()),
            },
        };
        let args = self.compile_mixed_array(&call.args, o)?;
        Ok(format!("{}.apply({}, {})", method, receiver, args))
    }

    /// `new F(args...)` has no `apply` form; a helper links a fresh object to
    /// the constructor's prototype and applies the constructor to it.
    fn compile_splat_new(&mut self, call: &Call, o: &Context) -> Result<String, LowerError> {
        let Callee::Expr(constructor) = &call.callee else {
            return Err(LowerError::InvalidNode {
                kind: "Call",
                context: "as a splatted super constructor",
            });
        };
        self.scopes.root_assign("__construct", CONSTRUCT);
        let constructor = self.compile(constructor, &o.expression())?;
        let args = self.compile_mixed_array(&call.args, o)?;
        Ok(format!("__construct({}, {})", constructor, args))
    }

    pub(super) fn lower_extends(&mut self, node: &Extends, o: &Context) -> Result<String, LowerError> {
        self.scopes.root_assign("__extends", EXTENDS);
        let o = o.expression();
        let child = self.compile(&node.child, &o)?;
        let parent = self.compile(&node.parent, &o)?;
        Ok(format!("__extends({}, {})", child, parent))
    }

    /// A function literal. Its body gets a scope of its own unless it is a
    /// closure wrapper, which shares the enclosing one.
    pub(super) fn lower_code(&mut self, code: &Code, o: &Context) -> Result<String, LowerError> {
        let shared = o.shared_scope;
        if !shared {
            let method = code.name.as_ref().map(|name| Method {
                name: name.clone(),
                proto: code.proto.clone(),
            });
            self.scopes.push(method);
        }
        let compiled = self.compile_function(code, o, shared);
        if !shared {
            self.scopes.pop();
        }
        let (params, body) = compiled?;

        let name_part = code.name.as_ref().map(|name| format!(" {}", name)).unwrap_or_default();
        if !code.bound {
            let func = format!("function{}({}) {{{}{}}}", name_part, params, body, o.indent);
            return Ok(if o.top { format!("({})", func) } else { func });
        }

        let func = format!("function({}) {{{}{}}}", params, body, o.idt(1));
        Ok(format!(
            "(function(__this) {{\n{inner}var __func = {func};\n{inner}return (function{name}() {{\n\
             {deeper}return __func.apply(__this, arguments);\n{inner}}});\n{tab}}})(this)",
            inner = o.idt(1),
            deeper = o.idt(2),
            func = func,
            name = name_part,
            tab = o.indent,
        ))
    }

    /// The parameter list and the `\n`-framed body of a function.
    fn compile_function(&mut self, code: &Code, o: &Context, shared: bool) -> Result<(String, String), LowerError> {
        let body_context = o.body(if code.bound { 2 } else { 1 });

        let mut params = Vec::new();
        let mut splat: Option<SplatParam> = None;
        let mut splat_name = None;
        for (index, param) in code.params.iter().enumerate() {
            if let Some(rest) = splat.as_mut() {
                rest.trailings.push(param.clone());
            } else if let Node::Splat(found) = param {
                splat_name = Some(found.name.clone());
                splat = Some(SplatParam {
                    index,
                    trailings: Vec::new(),
                });
            } else {
                params.push(param);
            }
        }

        let mut body = code.body.clone().make_return();
        if let (Some(name), Some(param)) = (splat_name, splat) {
            body = body.unshift(Node::Splat(Splat {
                name,
                param: Some(param),
            }));
        }

        let expression = o.expression();
        let mut names = Vec::with_capacity(params.len());
        for param in params {
            names.push(self.compile(param, &expression)?);
        }
        for name in &names {
            self.scopes.parameter(name);
        }

        let text = if body.is_empty() {
            String::new()
        } else if shared {
            format!("\n{}\n", self.compile_expressions(&body, &body_context)?)
        } else {
            format!("\n{}\n", self.compile_with_declarations(&body, &body_context, true)?)
        };
        Ok((names.join(", "), text))
    }

    pub(super) fn lower_splat(&mut self, splat: &Splat, o: &Context) -> Result<String, LowerError> {
        let Some(param) = &splat.param else {
            return self.compile(&splat.name, &o.expression());
        };
        let name = self.compile(&splat.name, &o.expression())?;
        self.scopes.find(&name);
        self.scopes.root_assign("__slice", SLICE);

        let count = param.trailings.len();
        for (i, trailing) in param.trailings.iter().enumerate() {
            let trailing = self.compile(trailing, &o.expression())?;
            self.scopes
                .assign(&trailing, format!("arguments[arguments.length - {}]", count - i));
        }
        let end = if count > 0 {
            format!(", arguments.length - {}", count)
        } else {
            String::new()
        };
        Ok(format!("{} = __slice.call(arguments, {}{})", name, param.index, end))
    }

    /// Desugar a class into its constructor, the `__extends` call and one
    /// assignment per prototype property.
    pub(super) fn lower_class(&mut self, class: &Class, o: &Context) -> Result<String, LowerError> {
        let variable = (*class.variable).clone();
        let mut constructor = None;
        let mut properties = Vec::with_capacity(class.properties.len());

        for property in &class.properties {
            let Node::Assign(assign) = property else {
                properties.push(property.clone());
                continue;
            };
            match &*assign.value {
                Node::Code(code) if is_constructor(&assign.variable) => {
                    let mut code = code.clone();
                    code.body = code.body.push(Node::returning(Node::literal("this")));
                    constructor = Some(Node::assign(variable.clone(), Node::Code(code)));
                }
                value => {
                    let access = match assign.context {
                        AssignContext::This => match &*assign.variable {
                            Node::Value(this) => this.properties.first().cloned(),
                            _ => None,
                        },
                        _ => None,
                    };
                    let target = match access {
                        Some(access) => with_properties(&variable, vec![access]),
                        None => with_properties(&variable, prototype_access(&assign.variable)),
                    };
                    properties.push(Node::Assign(Assign::new(target, value.clone())));
                }
            }
        }

        let constructor = match (constructor, &class.parent) {
            (Some(constructor), _) => constructor,
            (None, Some(parent)) => {
                let apply = with_properties(parent, vec![Node::accessor("apply")]);
                let call = Node::call(apply, vec![Node::literal("this"), Node::literal("arguments")]);
                let body = Expressions::wrap(vec![call]);
                Node::assign(variable.clone(), Node::Code(Code::new(Vec::new(), body, false)))
            }
            (None, None) => {
                let empty = Code::new(Vec::new(), Expressions::new(), false);
                Node::assign(variable.clone(), Node::Code(empty))
            }
        };

        let line = o.body(0);
        let mut lines = vec![format!("{}{};", o.indent, self.compile(&constructor, &line)?)];
        if let Some(parent) = &class.parent {
            let extends = Node::Extends(Extends {
                child: Box::new(variable.clone()),
                parent: parent.clone(),
            });
            lines.push(format!("{}{};", o.indent, self.compile(&extends, &o.expression())?));
        }
        if !properties.is_empty() {
            let block = Expressions::wrap(properties);
            lines.push(self.compile_expressions(&block, &line)?);
        }
        if class.returns {
            lines.push(self.compile(&Node::returning(variable), &line)?);
        }
        Ok(lines.join("\n"))
    }
}

fn is_constructor(variable: &Node) -> bool {
    matches!(variable.unwrap_value(), Node::Literal(literal) if literal.value == "constructor")
}

/// `.prototype.key` for names, `.prototype["key"]` for anything else.
fn prototype_access(key: &Node) -> Vec<Node> {
    match key.unwrap_value() {
        Node::Literal(literal) if super::IDENTIFIER.is_match(&literal.value) => {
            vec![Node::Accessor(crate::ast::Accessor {
                name: literal.value.clone(),
                prototype: true,
                soak: false,
            })]
        }
        other => vec![Node::accessor("prototype"), Node::index(other.clone())],
    }
}

/// Extend a chain with more accesses, starting one if needed.
fn with_properties(base: &Node, properties: Vec<Node>) -> Node {
    match base {
        Node::Value(value) => {
            let mut value = value.clone();
            value.properties.extend(properties);
            Node::Value(value)
        }
        other => Node::value_with(other.clone(), properties),
    }
}
