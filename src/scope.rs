//! Lexical scopes for the code generator.
//!
//! Every function body gets a [`Scope`] recording the names it declares,
//! receives as parameters, or assigns up front (runtime helpers and splat
//! bookkeeping). Scopes live on a [`Scopes`] stack owned by one compilation,
//! which also owns the counter behind temporary names, so separate
//! compilations never share state.

use itertools::Itertools;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    /// Needs a `var` declaration
    Var,
    Param,
    /// Declared with an initial value on the assignments line
    Assigned(String),
}

/// The method a function body implements, used to resolve `super`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    /// `Klass` for a function assigned to `Klass.prototype.name`
    pub proto: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    variables: Vec<(String, Binding)>,
    method: Option<Method>,
}

impl Scope {
    pub fn new(method: Option<Method>) -> Self {
        Scope {
            variables: Vec::new(),
            method,
        }
    }

    fn binding(&self, name: &str) -> Option<&Binding> {
        self.variables
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, binding)| binding)
    }

    fn set(&mut self, name: &str, binding: Binding) {
        match self.variables.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = binding,
            None => self.variables.push((name.to_string(), binding)),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.binding(name).is_some()
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn has_declarations(&self) -> bool {
        self.variables.iter().any(|(_, binding)| *binding == Binding::Var)
    }

    pub fn has_assignments(&self) -> bool {
        self.variables
            .iter()
            .any(|(_, binding)| matches!(binding, Binding::Assigned(_)))
    }

    /// `a, b, c`: the names to declare, sorted.
    pub fn compiled_declarations(&self) -> String {
        self.variables
            .iter()
            .filter(|(_, binding)| *binding == Binding::Var)
            .map(|(name, _)| name.as_str())
            .sorted()
            .join(", ")
    }

    /// `a = 1, b = 2`, in the order they were assigned.
    pub fn compiled_assignments(&self) -> String {
        self.variables
            .iter()
            .filter_map(|(name, binding)| match binding {
                Binding::Assigned(value) => Some(format!("{} = {}", name, value)),
                _ => None,
            })
            .join(", ")
    }
}

/// The scope chain of one compilation, innermost last.
#[derive(Debug, Clone)]
pub struct Scopes {
    stack: Vec<Scope>,
    temporaries: usize,
}

impl Default for Scopes {
    fn default() -> Self {
        Scopes::new()
    }
}

impl Scopes {
    /// A chain holding only the top-level scope.
    pub fn new() -> Self {
        Scopes {
            stack: vec![Scope::default()],
            temporaries: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, method: Option<Method>) {
        self.stack.push(Scope::new(method));
    }

    /// Leave the innermost scope. The top-level scope is never popped.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    pub fn current(&self) -> &Scope {
        // The stack is never empty: `pop` keeps the top-level scope.
        &self.stack[self.stack.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn root(&self) -> &Scope {
        &self.stack[0]
    }

    pub fn method(&self) -> Option<&Method> {
        self.current().method()
    }

    /// Mark `name` as declared in the innermost scope.
    pub fn declare(&mut self, name: &str) {
        if !self.current().has(name) {
            self.current_mut().set(name, Binding::Var);
        }
    }

    /// Declared in the innermost scope itself.
    pub fn is_declared(&self, name: &str) -> bool {
        self.current().has(name)
    }

    /// Visible anywhere along the chain.
    pub fn check(&self, name: &str) -> bool {
        self.stack.iter().rev().any(|scope| scope.has(name))
    }

    /// Look `name` up along the chain and declare it locally if it is not
    /// visible. Returns whether it already existed.
    pub fn find(&mut self, name: &str) -> bool {
        if self.check(name) {
            return true;
        }
        self.declare(name);
        false
    }

    pub fn parameter(&mut self, name: &str) {
        self.current_mut().set(name, Binding::Param);
    }

    /// Declare `name` with an initial value in the innermost scope.
    pub fn assign(&mut self, name: &str, value: impl Into<String>) {
        self.current_mut().set(name, Binding::Assigned(value.into()));
    }

    /// Declare a runtime helper once, at the top level.
    pub fn root_assign(&mut self, name: &str, value: impl Into<String>) {
        if !self.stack[0].has(name) {
            self.stack[0].set(name, Binding::Assigned(value.into()));
        }
    }

    /// A fresh temporary (`_a`, `_b`, ... `_z`, `_ba`, ...) that no scope in
    /// the chain uses yet, declared in the innermost scope.
    pub fn free_variable(&mut self) -> String {
        loop {
            let name = temporary_name(self.temporaries);
            self.temporaries += 1;
            if !self.check(&name) {
                self.declare(&name);
                return name;
            }
        }
    }
}

fn temporary_name(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'a' + (index % 26) as u8) as char);
        index /= 26;
        if index == 0 {
            break;
        }
    }
    let mut name = String::from("_");
    name.extend(letters.into_iter().rev());
    name
}
