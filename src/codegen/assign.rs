use super::{Compiler, Context, IDENTIFIER};
use crate::ast::{Assign, AssignContext, Code, Node, Value};
use crate::error::LowerError;
use regex::Regex;
use std::sync::LazyLock;

static PROTO_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\.prototype\.").expect("prototype pattern"));

static LEADING_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.(prototype\.)?").expect("leading dot pattern"));

impl Compiler {
    pub(super) fn lower_assign(&mut self, assign: &Assign, o: &Context) -> Result<String, LowerError> {
        if let Node::Value(target) = &*assign.variable {
            if target.is_array() || target.is_object() {
                return self.compile_pattern(target, &assign.value, o);
            }
            if target.is_splice() {
                return self.compile_splice(target, &assign.value, o);
            }
        }

        if assign.escapes() {
            return self.compile_escaping(&assign.value, o);
        }

        let expression = o.expression();
        let name = self.compile(&assign.variable, &expression)?;
        let value = match &*assign.value {
            Node::Code(code) => {
                let named = self.name_function(code, &assign.variable, &name);
                self.compile(&Node::Code(named), &expression)?
            }
            other => self.compile(other, &expression)?,
        };

        if assign.context == AssignContext::Object {
            return Ok(format!("{}: {}", name, value));
        }
        if IDENTIFIER.is_match(&name) {
            self.scopes.find(&name);
        }

        let code = format!("{} = {}", name, value);
        if o.as_statement {
            Ok(format!("{}{};", o.indent, code))
        } else if o.top {
            Ok(code)
        } else {
            Ok(format!("({})", code))
        }
    }

    /// A value that can `return`, `break` or `continue` out of its
    /// enclosing body cannot be wrapped in a closure. It is lowered as a
    /// statement in return position instead, and the target is never bound.
    fn compile_escaping(&mut self, value: &Node, o: &Context) -> Result<String, LowerError> {
        let mut line = o.clone();
        line.top = true;
        line.returns = true;
        line.as_statement = false;
        self.compile(&value.clone().make_return(), &line)
    }

    /// Give a function literal the name it is assigned to, and the class it
    /// is a prototype method of, so `super` can find its way.
    fn name_function(&self, code: &Code, variable: &Node, name: &str) -> Code {
        let last = match variable {
            Node::Value(value) if value.has_properties() => match value.properties.last() {
                Some(Node::Accessor(accessor)) => {
                    LEADING_DOT.replace(&self.lower_accessor(accessor), "").into_owned()
                }
                _ => String::new(),
            },
            _ => name.to_string(),
        };

        let mut named = code.clone();
        if IDENTIFIER.is_match(&last) {
            named.name = Some(last);
        }
        if let Some(captures) = PROTO_ASSIGN.captures(name) {
            named.proto = Some(captures[1].to_string());
        }
        named
    }

    /// `[a, b] = value` and `{a, b: c} = value`: evaluate the value once into
    /// a temporary, then assign each target from it.
    fn compile_pattern(&mut self, pattern: &Value, value: &Node, o: &Context) -> Result<String, LowerError> {
        let (objects, is_object) = match &*pattern.base {
            Node::Array(array) => (&array.objects, false),
            Node::Object(object) => (&object.properties, true),
            other => return Err(LowerError::InvalidPattern { kind: other.kind() }),
        };

        let holder = self.scopes.free_variable();
        let source = self.compile(value, &o.expression())?;
        let mut lines = vec![format!("{}{} = {};", o.indent, holder, source)];

        let mut line = o.clone();
        line.top = true;
        line.as_statement = true;

        let count = objects.len();
        let mut splatted = false;
        for (i, object) in objects.iter().enumerate() {
            let (target, key) = match object {
                Node::Comment(_) => continue,
                Node::Assign(pair) if is_object => ((*pair.value).clone(), Some(&*pair.variable)),
                shorthand if is_object => (shorthand.clone(), Some(shorthand)),
                element => (element.clone(), None),
            };

            let (target, access) = match target {
                Node::Splat(splat) if !splatted => {
                    splatted = true;
                    self.scopes.root_assign("__slice", super::calls::SLICE);
                    let trailing = count - i - 1;
                    let end = if trailing > 0 {
                        format!(", {}.length - {}", holder, trailing)
                    } else {
                        String::new()
                    };
                    let slice = format!("__slice.call({}, {}{})", holder, i, end);
                    (*splat.name, Node::literal(slice))
                }
                target @ Node::Value(_) => {
                    let property = match key {
                        Some(key) => key_access(key),
                        None if splatted => {
                            Node::index(Node::literal(format!("{}.length - {}", holder, count - i)))
                        }
                        None => Node::index(Node::literal(i.to_string())),
                    };
                    (target, Node::value_with(Node::literal(holder.as_str()), vec![property]))
                }
                other => return Err(LowerError::InvalidPattern { kind: other.kind() }),
            };
            lines.push(self.compile(&Node::assign(target, access), &line)?);
        }
        Ok(lines.join("\n"))
    }

    /// `list[a..b] = value` becomes a `splice` call. The list and the start
    /// are each used twice, so complex ones are evaluated once into a
    /// temporary.
    fn compile_splice(&mut self, target: &Value, value: &Node, o: &Context) -> Result<String, LowerError> {
        let Some(Node::Slice(slice)) = target.properties.last() else {
            return Err(LowerError::InvalidNode {
                kind: "Value",
                context: "as a slice assignment target",
            });
        };
        let o = o.expression();
        let list = Node::Value(target.without_last());
        let (name, receiver) = self.compile_once(&list, &o)?;
        let (from, start) = self.compile_once(&slice.range.from, &o)?;
        let to = self.compile(&slice.range.to, &o)?;
        let plus = if slice.range.exclusive { "" } else { " + 1" };
        let value = self.compile(value, &o)?;
        Ok(format!(
            "{}.splice.apply({}, [{}, {} - {}{}].concat({}))",
            name, receiver, from, to, start, plus, value
        ))
    }

    /// The code for the first use of `node` and for the uses after it.
    fn compile_once(&mut self, node: &Node, o: &Context) -> Result<(String, String), LowerError> {
        if node.is_complex() {
            return self.compile_reference(node, o);
        }
        let code = self.compile(node, o)?;
        Ok((code.clone(), code))
    }
}

/// `.key` for names, `[key]` for strings and numbers.
fn key_access(key: &Node) -> Node {
    match key.unwrap_value() {
        Node::Literal(literal) if IDENTIFIER.is_match(&literal.value) => {
            Node::accessor(literal.value.as_str())
        }
        other => Node::index(other.clone()),
    }
}
