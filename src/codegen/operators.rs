use super::{Compiler, Context, IDENTIFIER};
use crate::ast::{Index, Node, Op};
use crate::error::LowerError;

/// Unary operators written as words, which need a space before the operand.
const PREFIX_WORDS: [&str; 2] = ["typeof", "delete"];

impl Compiler {
    pub(super) fn lower_op(&mut self, op: &Op, o: &Context) -> Result<String, LowerError> {
        let operand = o.operation;
        let mut o = o.expression();
        o.operation = true;

        if op.is_chain() {
            return self.compile_chain(op, &o);
        }
        if op.is_mutation() {
            return self.compile_mutation(op, &o);
        }
        let Some(second) = op.second.as_deref() else {
            return self.compile_unary(op, &o);
        };
        if op.operator == "?" {
            let (test, reference) = self.existence_test(&op.first, &o)?;
            let fallback = self.compile(second, &o)?;
            let code = format!("{} ? {} : {}", test, reference, fallback);
            return Ok(if operand { format!("({})", code) } else { code });
        }

        let first = self.compile(&op.first, &o)?;
        let second = self.compile(second, &o)?;
        Ok(format!("{} {} {}", first, op.operator, second))
    }

    /// `a < b < c` becomes `(a < b) && (b < c)`, caching `b` when evaluating
    /// it twice could differ.
    fn compile_chain(&mut self, op: &Op, o: &Context) -> Result<String, LowerError> {
        let (Node::Op(inner), Some(last)) = (&*op.first, op.second.as_deref()) else {
            return Err(LowerError::InvalidNode {
                kind: op.first.kind(),
                context: "as the left side of a chained comparison",
            });
        };
        let Some(shared) = inner.second.as_deref() else {
            return Err(LowerError::InvalidNode {
                kind: "Op",
                context: "without a right operand in a chained comparison",
            });
        };

        let (first, shared) = if is_plain_name(shared) {
            (self.compile(&op.first, o)?, self.compile(shared, o)?)
        } else {
            let (assign, temp) = self.compile_reference(shared, o)?;
            let mut cached = inner.clone();
            cached.second = Some(Box::new(Node::literal(assign)));
            (self.compile(&Node::Op(cached), o)?, temp)
        };
        let last = self.compile(last, o)?;
        Ok(format!("({}) && ({} {} {})", first, shared, op.operator, last))
    }

    /// `||=`, `&&=` and `?=`. The target is evaluated once: a complex base
    /// or index is cached on the assigning side and read back from the
    /// temporary afterwards.
    fn compile_mutation(&mut self, op: &Op, o: &Context) -> Result<String, LowerError> {
        let Some(second) = op.second.as_deref() else {
            return Err(LowerError::InvalidNode {
                kind: "Op",
                context: "without a value in a conditional assignment",
            });
        };
        let (target, reuse) = self.cache_target(&op.first, o)?;
        let first = self.compile(&target, o)?;
        if IDENTIFIER.is_match(&first) {
            self.scopes.find(&first);
        }
        if op.operator == "?=" {
            let (test, reference) = self.existence_test(&reuse, o)?;
            let value = self.compile(second, o)?;
            return Ok(format!("{} = {} ? {} : {}", first, test, reference, value));
        }
        let current = self.compile(&reuse, o)?;
        let value = self.compile(second, o)?;
        Ok(format!("{} = {} {} {}", first, current, &op.operator[..2], value))
    }

    /// Split an assignment target into the form to assign through and the
    /// form to read it back with.
    fn cache_target(&mut self, target: &Node, o: &Context) -> Result<(Node, Node), LowerError> {
        let Node::Value(value) = target else {
            return Ok((target.clone(), target.clone()));
        };
        let (base, reuse_base) = if value.base.is_complex() {
            let (assign, temp) = self.compile_reference(&value.base, o)?;
            (Node::literal(assign), Node::literal(temp))
        } else {
            (*value.base.clone(), *value.base.clone())
        };
        let mut properties = Vec::with_capacity(value.properties.len());
        let mut reuse_properties = Vec::with_capacity(value.properties.len());
        for property in &value.properties {
            match property {
                Node::Index(index) if index.index.is_complex() => {
                    let (assign, temp) = self.compile_reference(&index.index, o)?;
                    properties.push(Node::Index(Index {
                        index: Box::new(Node::literal(assign)),
                        soak: index.soak,
                    }));
                    reuse_properties.push(Node::Index(Index {
                        index: Box::new(Node::literal(temp)),
                        soak: index.soak,
                    }));
                }
                other => {
                    properties.push(other.clone());
                    reuse_properties.push(other.clone());
                }
            }
        }
        Ok((
            Node::value_with(base, properties),
            Node::value_with(reuse_base, reuse_properties),
        ))
    }

    fn compile_unary(&mut self, op: &Op, o: &Context) -> Result<String, LowerError> {
        let operand = self.compile(&op.first, o)?;
        if op.flip {
            return Ok(format!("{}{}", operand, op.operator));
        }
        let space = PREFIX_WORDS.contains(&op.operator.as_str())
            || ((op.operator == "-" || op.operator == "+") && operand.starts_with(op.operator.as_str()));
        if space {
            Ok(format!("{} {}", op.operator, operand))
        } else {
            Ok(format!("{}{}", op.operator, operand))
        }
    }
}

/// Names and constants can be repeated without caching.
fn is_plain_name(node: &Node) -> bool {
    matches!(node.unwrap_value(), Node::Literal(_))
}
