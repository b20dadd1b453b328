use super::{Compiler, Context};
use crate::ast::{
    Accessor, Array, Comment, Existence, Index, Literal, Node, Object, Parenthetical, Range,
    Slice, Value,
};
use crate::error::LowerError;
use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0x[\da-fA-F]+|\d*\.?\d+(?:[eE][+-]?\d+)?)$").expect("number pattern")
});

impl Compiler {
    pub(super) fn lower_literal(&self, literal: &Literal, o: &Context) -> String {
        if literal.is_control() {
            format!("{}{};", o.indent, literal.value)
        } else {
            literal.value.clone()
        }
    }

    pub(super) fn lower_comment(&self, comment: &Comment, o: &Context) -> String {
        let separator = format!("\n{}//", o.indent);
        format!("{}//{}", o.indent, comment.lines.join(&separator))
    }

    /// A base followed by its accesses. Each soak link guards the rest of the
    /// chain; a base that is expensive to evaluate is cached in a temporary
    /// at the soak so it runs exactly once.
    pub(super) fn lower_value(&mut self, value: &Value, o: &Context) -> Result<String, LowerError> {
        if !value.has_properties() {
            return self.compile(&value.base, o);
        }
        let operation = o.operation;
        let shared_scope = o.shared_scope;
        let mut o = o.expression();
        o.shared_scope = shared_scope;

        let mut baseline = self.compile(&value.base, &o)?;
        o.shared_scope = false;
        if needs_parens_for_access(&value.base) {
            baseline = format!("({})", baseline);
        }

        let mut guards = String::new();
        let mut complex = value.base.is_complex();
        for property in &value.properties {
            let (part, soak) = match property {
                Node::Accessor(accessor) => (self.lower_accessor(accessor), accessor.soak),
                Node::Index(index) => (self.lower_index(index, &o)?, index.soak),
                Node::Slice(slice) => (self.lower_slice(slice, &o)?, false),
                other => {
                    return Err(LowerError::InvalidNode {
                        kind: other.kind(),
                        context: "in a property chain",
                    });
                }
            };
            if soak {
                let test = if complex {
                    let temp = self.scopes.free_variable();
                    let test = format!("({} = {})", temp, baseline);
                    baseline = temp;
                    complex = false;
                    test
                } else {
                    baseline.clone()
                };
                guards.push_str(&format!("{} == undefined ? undefined : ", test));
            }
            baseline.push_str(&part);
            complex = complex || property.is_complex();
        }

        if guards.is_empty() {
            Ok(baseline)
        } else if operation {
            Ok(format!("({}{})", guards, baseline))
        } else {
            Ok(format!("{}{}", guards, baseline))
        }
    }

    pub(super) fn lower_accessor(&self, accessor: &Accessor) -> String {
        if accessor.prototype {
            format!(".prototype.{}", accessor.name)
        } else {
            format!(".{}", accessor.name)
        }
    }

    pub(super) fn lower_index(&mut self, index: &Index, o: &Context) -> Result<String, LowerError> {
        let inner = self.compile(&index.index, &o.expression())?;
        Ok(format!("[{}]", inner))
    }

    pub(super) fn lower_slice(&mut self, slice: &Slice, o: &Context) -> Result<String, LowerError> {
        let o = o.expression();
        let from = self.compile(&slice.range.from, &o)?;
        let to = self.compile(&slice.range.to, &o)?;
        let plus = if slice.range.exclusive { "" } else { " + 1" };
        Ok(format!(".slice({}, {}{})", from, to, plus))
    }

    /// A range used as a value: an immediately invoked function that counts
    /// from one end to the other in either direction.
    pub(super) fn lower_range(&mut self, range: &Range, o: &Context) -> Result<String, LowerError> {
        let body = o.idt(1);
        let inner = o.expression();
        let from_code = self.compile(&range.from, &inner)?;
        let to_code = self.compile(&range.to, &inner)?;
        let from = self.scopes.free_variable();
        let to = self.scopes.free_variable();
        let result = self.scopes.free_variable();
        let counter = self.scopes.free_variable();
        let equals = if range.exclusive { "" } else { "=" };
        let clause = format!("{} <= {} ?", from, to);

        Ok(format!(
            "(function(){{\n{body}{result} = [];\n{body}{from} = {from_code}; {to} = {to_code};\n\
             {body}for ({counter} = {from}; ({clause} {counter} <{equals} {to} : {counter} >{equals} {to}); \
             ({clause} {counter} += 1 : {counter} -= 1)) {{\n{body}{tab}{result}.push({counter});\n{body}}}\n\
             {body}return {result};\n{indent}}}).call(this)",
            body = body,
            result = result,
            from = from,
            to = to,
            from_code = from_code,
            to_code = to_code,
            counter = counter,
            clause = clause,
            equals = equals,
            tab = super::TAB,
            indent = o.indent,
        ))
    }

    pub(super) fn lower_object(&mut self, object: &Object, o: &Context) -> Result<String, LowerError> {
        let inner = o.indented(1).expression();
        let last_property = object
            .properties
            .iter()
            .rposition(|property| !matches!(property, Node::Comment(_)));
        let count = object.properties.len();

        let mut code = String::new();
        for (i, property) in object.properties.iter().enumerate() {
            let is_comment = matches!(property, Node::Comment(_));
            let join = if i + 1 == count {
                ""
            } else if Some(i) == last_property || is_comment {
                "\n"
            } else {
                ",\n"
            };
            let compiled = match property {
                Node::Comment(_) => self.compile(property, &inner)?,
                Node::Assign(_) => format!("{}{}", inner.indent, self.compile(property, &inner)?),
                shorthand => {
                    let pair = Node::Assign(crate::ast::Assign::with_context(
                        shorthand.clone(),
                        shorthand.clone(),
                        crate::ast::AssignContext::Object,
                    ));
                    format!("{}{}", inner.indent, self.compile(&pair, &inner)?)
                }
            };
            code.push_str(&compiled);
            code.push_str(join);
        }

        if code.is_empty() {
            Ok("{}".to_string())
        } else {
            Ok(format!("{{\n{}\n{}}}", code, o.indent))
        }
    }

    pub(super) fn lower_array(&mut self, array: &Array, o: &Context) -> Result<String, LowerError> {
        if array.objects.iter().any(Node::is_splat) {
            let mixed = self.compile_mixed_array(&array.objects, o)?;
            return Ok(match array.objects.as_slice() {
                [Node::Splat(_)] => format!("[].concat({})", mixed),
                _ => mixed,
            });
        }

        let inner = o.indented(1).expression();
        let count = array.objects.len();
        let mut code = String::new();
        for (i, object) in array.objects.iter().enumerate() {
            let compiled = self.compile(object, &inner)?;
            if matches!(object, Node::Comment(_)) {
                code.push_str(&format!("\n{}\n{}", compiled, inner.indent));
            } else if i + 1 == count {
                code.push_str(&compiled);
            } else {
                code.push_str(&compiled);
                code.push_str(", ");
            }
        }
        let ending = if code.contains('\n') {
            format!("\n{}]", o.indent)
        } else {
            "]".to_string()
        };
        Ok(format!("[{}{}", code, ending))
    }

    /// Fixed items and spread items joined into one array expression:
    /// `[a, b].concat(rest, [c])`.
    pub(super) fn compile_mixed_array(&mut self, nodes: &[Node], o: &Context) -> Result<String, LowerError> {
        let o = o.expression();
        let mut groups: Vec<String> = Vec::new();
        let mut fixed: Vec<String> = Vec::new();
        for node in nodes {
            match node {
                Node::Splat(splat) => {
                    if !fixed.is_empty() {
                        groups.push(format!("[{}]", fixed.join(", ")));
                        fixed.clear();
                    }
                    groups.push(self.compile(&splat.name, &o)?);
                }
                other => fixed.push(self.compile(other, &o)?),
            }
        }
        if !fixed.is_empty() {
            groups.push(format!("[{}]", fixed.join(", ")));
        }

        let mut groups = groups.into_iter();
        let first = groups.next().unwrap_or_else(|| "[]".to_string());
        let rest: Vec<String> = groups.collect();
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(format!("{}.concat({})", first, rest.join(", ")))
        }
    }

    pub(super) fn lower_parenthetical(
        &mut self,
        parens: &Parenthetical,
        o: &Context,
    ) -> Result<String, LowerError> {
        let code = self.compile(&parens.expression, o)?;
        if parens.expression.is_statement() {
            return Ok(code);
        }
        let code = code.strip_suffix(';').unwrap_or(&code);
        if matches!(*parens.expression, Node::Assign(_)) {
            Ok(code.to_string())
        } else {
            Ok(format!("({})", code))
        }
    }

    pub(super) fn lower_existence(&mut self, node: &Existence, o: &Context) -> Result<String, LowerError> {
        let (test, _) = self.existence_test(&node.expression, o)?;
        Ok(test)
    }

    /// `(typeof x !== "undefined" && x !== null)`, plus the text to use for
    /// the value afterwards. Calls and access chains go through a temporary.
    pub(super) fn existence_test(&mut self, node: &Node, o: &Context) -> Result<(String, String), LowerError> {
        let o = o.expression();
        let (first, second) = match node {
            Node::Call(_) => self.compile_reference(node, &o)?,
            Node::Value(value) if value.has_properties() => self.compile_reference(node, &o)?,
            _ => {
                let code = self.compile(node, &o)?;
                (code.clone(), code)
            }
        };
        Ok((
            format!("(typeof {} !== \"undefined\" && {} !== null)", first, second),
            second,
        ))
    }
}

/// `{a: 1}.a` and `1.toString()` need parentheses before an access.
fn needs_parens_for_access(base: &Node) -> bool {
    match base {
        Node::Object(_) => true,
        Node::Literal(literal) => NUMBER.is_match(&literal.value),
        _ => false,
    }
}
